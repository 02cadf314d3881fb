//! Session types: the data that represents a signed-in user.
//!
//! A "session" is the client's record of who it is talking to the backend
//! as. It tracks:
//! - the bearer TOKEN the backend issued (opaque to the client)
//! - the ROLE resolved from the token's claims

use household_protocol::Role;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Where the session lives in storage.
///
/// The defaults match the keys the web frontend has always used, so a
/// session file can be shared with it.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Key for the raw bearer token.
    pub token_key: String,

    /// Key for the JSON user record (`{"role": "admin"}`).
    pub user_key: String,

    /// Capacity of the session event channel. Slow subscribers that fall
    /// further behind than this miss events (they see `Lagged`).
    pub event_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_key: "token".to_string(),
            user_key: "user".to_string(),
            event_capacity: 16,
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A point-in-time view of the session.
///
/// Both fields are optional because a session can be restored in a
/// half-known state: a stored token whose user record is missing or names
/// a role this client doesn't recognise. Such a session counts as
/// authenticated but satisfies no role requirement.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub token: Option<String>,
    pub role: Option<Role>,
}

impl Session {
    /// A session with nothing in it.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// `true` iff a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// `true` iff authenticated AND holding exactly `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.is_authenticated() && self.role == Some(role)
    }
}

/// The user record persisted next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredUser {
    pub(crate) role: Role,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Why the backend rejected the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationReason {
    /// HTTP 401: the token is missing, malformed, or expired.
    Unauthorized,
    /// HTTP 403: the token is valid but not allowed here.
    Forbidden,
}

impl InvalidationReason {
    /// Maps an HTTP status to a reason, `None` for anything but 401/403.
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(Self::Unauthorized),
            403 => Some(Self::Forbidden),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvalidationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Forbidden => write!(f, "forbidden"),
        }
    }
}

/// Something that happened to the session.
///
/// Broadcast to every subscriber; views use `Invalidated` to send the user
/// back to the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { role: Role },
    LoggedOut,
    Invalidated { reason: InvalidationReason },
}
