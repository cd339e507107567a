//! Board and todo operations, scoped to the requesting user
//!
//! Every operation takes the caller's id and resolves the ownership chain
//! Todo → Board → User before reading or writing. A missing entity is reported
//! before an ownership mismatch.

pub mod board_service;
pub mod ownership;
pub mod todo_service;

pub use board_service::BoardService;
pub use todo_service::TodoService;
