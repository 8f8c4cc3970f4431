//! Error types for the feed client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Nickname is held by another active session
    #[error("Nickname '{0}' is already taken")]
    NicknameTaken(String),

    /// Server refused the login for any other reason (e.g. invalid nickname)
    #[error("Login rejected: {0}")]
    LoginRejected(String),

    /// Could not connect, or the connection dropped
    #[error("Connection lost: {0}")]
    ConnectionLost(String),
}
