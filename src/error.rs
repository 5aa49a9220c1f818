//! Error types
//!
//! Routing misses are not errors: they become 404 responses inside the
//! dispatcher. The types here cover setup-time registration, failing
//! actions, and fatal server startup.

use thiserror::Error;

/// Rejected controller registration
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("controller key '{path}' is empty; requests always carry a key before the action")]
    EmptyKey { path: String },

    #[error("controller '{key}' exposes no actions")]
    EmptyActionTable { key: String },

    #[error("action '{name}' on controller '{key}' can never be reached from a URL")]
    UnreachableAction { key: String, name: String },

    #[error("action '{name}' is registered twice on controller '{key}'")]
    DuplicateAction { key: String, name: String },
}

/// Failure raised by a controller action
///
/// The dispatcher logs it and answers 500 instead of sending whatever the
/// action had buffered so far.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("failed to serialize JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    #[error("{0}")]
    Custom(String),
}

impl ActionError {
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

/// Result type returned by every action
pub type ActionResult = Result<(), ActionError>;

/// Fatal server failure, returned to the caller of `run`
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid listen address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
