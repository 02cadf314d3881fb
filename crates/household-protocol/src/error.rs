//! Error types for the protocol layer.
//!
//! Each crate in the workspace defines its own error enum. When you see a
//! `ProtocolError`, you know the problem is in serialization or in parsing
//! a closed value (a role, a category), not in networking or routing.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(#[source] serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, an HTML
    /// error page where JSON was expected.
    #[error("decode failed: {0}")]
    Decode(#[source] serde_json::Error),

    /// A role string that isn't one of `admin`, `customer`,
    /// `professional` (compared case-insensitively).
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// A severity category the client doesn't recognise.
    #[error("unknown category: {0:?}")]
    UnknownCategory(String),

    /// A value that passes deserialization but violates a protocol rule,
    /// e.g. a review rating outside 1..=5.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
