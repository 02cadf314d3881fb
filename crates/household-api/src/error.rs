//! Normalized API errors.
//!
//! Whatever went wrong (no connection, a 422 with a message, an HTML error
//! page where JSON was expected), callers get one [`ApiError`] carrying a
//! message and a [`Category`] that are safe to show the user.

use std::fmt;

use household_protocol::{ApiMessage, Category, Codec, ProtocolError};
use household_transport::TransportError;

/// Shown when the backend gave us nothing better.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Broad classes of API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request never completed (refused, DNS, timeout, bad URL).
    Network,
    /// 401 or 403. The session has been invalidated by the time the
    /// caller sees this.
    Auth,
    /// Any other 4xx.
    Validation,
    /// 5xx, or a status the client doesn't expect.
    Server,
    /// 2xx with a body that doesn't decode.
    InvalidResponse,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            400..=499 => Self::Validation,
            _ => Self::Server,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Network => "network",
            Self::Auth => "auth",
            Self::Validation => "validation",
            Self::Server => "server",
            Self::InvalidResponse => "invalid response",
        })
    }
}

/// A failed API call, ready for display.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    pub category: Category,
    /// HTTP status, when a response arrived.
    pub status: Option<u16>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, category: Category) -> Self {
        Self {
            kind,
            message: message.into(),
            category,
            status: None,
            source: None,
        }
    }

    /// The request never completed.
    pub fn network(err: TransportError) -> Self {
        Self {
            source: Some(Box::new(err)),
            ..Self::new(ErrorKind::Network, FALLBACK_MESSAGE, Category::Danger)
        }
    }

    /// A 2xx body that failed to decode.
    pub fn invalid_response(status: u16, err: ProtocolError) -> Self {
        Self {
            status: Some(status),
            source: Some(Box::new(err)),
            ..Self::new(ErrorKind::InvalidResponse, FALLBACK_MESSAGE, Category::Danger)
        }
    }

    /// A request body that couldn't be serialized. Nothing was sent.
    pub fn encode(err: ProtocolError) -> Self {
        Self {
            source: Some(Box::new(err)),
            ..Self::new(ErrorKind::Validation, FALLBACK_MESSAGE, Category::Danger)
        }
    }

    /// A non-2xx response. The body's `message` (or `error`) and
    /// `category` are used when present; anything unreadable falls back to
    /// [`FALLBACK_MESSAGE`] / danger.
    pub fn from_response(status: u16, body: &[u8], codec: &impl Codec) -> Self {
        let parsed: ApiMessage = codec.decode(body).unwrap_or_default();
        let message = parsed
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
        Self {
            status: Some(status),
            ..Self::new(
                ErrorKind::from_status(status),
                message,
                parsed.category.unwrap_or_default(),
            )
        }
    }

    pub fn is_auth(&self) -> bool {
        self.kind == ErrorKind::Auth
    }

    /// The message as an [`ApiMessage`], for code that displays both.
    pub fn to_message(&self) -> ApiMessage {
        ApiMessage::new(self.message.clone(), self.category)
    }
}
