//! TaskMaster client
//!
//! A typed client for the TaskMaster REST API together with the pieces of the
//! `taskmaster` command-line tool: an explicit, file-backed [`Session`],
//! text views (dashboard, board, calendar) and command execution.

pub mod api_client;
pub mod cli;
pub mod commands;
pub mod error;
pub mod models;
pub mod session;
pub mod views;

pub use crate::{
    api_client::ApiClient,
    error::{ClientError, ClientResult},
    session::{Session, SessionStore},
};
