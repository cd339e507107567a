//! Error type for the TaskMaster client
//!
//! Every failure, whether from the network, the server, the session file or
//! user input, ends up as a [`ClientError`] and is reported once by `main`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport-level failure (connection refused, timeout, bad body)
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an error status
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid session file: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not logged in; run `taskmaster login` first")]
    NotLoggedIn,

    #[error("Session expired; log in again")]
    SessionExpired,

    #[error("{0}")]
    InvalidInput(String),
}

impl ClientError {
    /// HTTP status of a server-side rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
