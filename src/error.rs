use std::io;

use thiserror::Error;

/// Error type for data retrieval, storage, and boundary loading failures.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("request to {url} failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("{url} answered HTTP {status}{}", message_suffix(.message))]
    Status {
        url: String,
        status: u16,
        message: Option<String>,
    },
    #[error("malformed {what}: {reason}")]
    Decode { what: &'static str, reason: String },
    #[error("document store unavailable: {0}")]
    Store(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl DashError {
    pub fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        DashError::Decode {
            what,
            reason: err.to_string(),
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

pub type Result<T, E = DashError> = std::result::Result<T, E>;
