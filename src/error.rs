//! Client error type.

use std::fmt;

use crate::models::ItemKey;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The request never got a response
    Transport(String),
    /// The server answered with an error status
    Api { status: u16, message: String },
    NotFound(ItemKey),
    InvalidState(String),
    /// The target is still provisional and has no server id yet
    NotSynced(ItemKey),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Transport(msg) => write!(f, "Transport error: {}", msg),
            ClientError::Api { status, message } => write!(f, "Server error {}: {}", status, message),
            ClientError::NotFound(key) => write!(f, "Not found: {}", key),
            ClientError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ClientError::NotSynced(key) => write!(f, "Not yet saved: {}", key),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(e.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
