//! Unified error type for the household client.

use household_api::{ApiError, FALLBACK_MESSAGE};
use household_protocol::{ApiMessage, Category, ProtocolError};
use household_router::RouterError;
use household_session::SessionError;
use household_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum HouseholdError {
    /// Building the HTTP transport failed (bad base URL, TLS setup).
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Reading or writing the persisted session failed.
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Router(#[from] RouterError),

    /// An API call failed; carries a displayable message.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend accepted the credentials but sign-in can't proceed
    /// (blocked account, pending approval, no token, unknown role).
    #[error("sign-in refused: {}", .0.message.as_deref().unwrap_or(FALLBACK_MESSAGE))]
    SignIn(ApiMessage),

    /// A configuration value couldn't be parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl HouseholdError {
    /// What to show the user: the backend's own message when there is one,
    /// otherwise the generic fallback.
    pub fn user_message(&self) -> ApiMessage {
        match self {
            Self::Api(e) => e.to_message(),
            Self::SignIn(msg) => ApiMessage {
                message: Some(msg.message.clone().unwrap_or_else(|| FALLBACK_MESSAGE.into())),
                category: Some(msg.category.unwrap_or_default()),
            },
            _ => ApiMessage::new(FALLBACK_MESSAGE, Category::Danger),
        }
    }
}
