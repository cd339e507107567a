//! Authentication service models

pub mod user;

pub use user::{
    AuthResponse, CurrentUser, LoginRequest, NewUser, RegisterRequest, User, UserResponse,
};
