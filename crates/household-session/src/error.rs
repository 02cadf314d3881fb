//! Error types for the session layer.

use household_protocol::ProtocolError;

/// Errors that can occur while creating, restoring, or clearing a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The token handed to `login` was empty or whitespace.
    /// An empty bearer credential can never authenticate a request.
    #[error("missing access token")]
    MissingToken,

    /// The role couldn't be validated (not admin/customer/professional).
    #[error("invalid role: {0}")]
    InvalidRole(#[source] ProtocolError),

    /// Encoding the persisted user record failed.
    #[error("session record encoding failed: {0}")]
    Encoding(#[source] ProtocolError),

    /// The storage backend couldn't be read or written.
    #[error("session storage failed: {0}")]
    Storage(#[from] std::io::Error),

    /// The storage file exists but isn't a JSON object of strings.
    #[error("session storage is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}
