//! Core protocol types: identity, severity, and the auth message bodies.
//!
//! These are the structures every other layer agrees on. The session store
//! keeps a [`Role`], the router gates pages on it, and the API gateway turns
//! backend replies into [`ApiMessage`]s tagged with a [`Category`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// The three kinds of marketplace user.
///
/// This is a closed enum: a role string coming from the backend or from
/// disk is validated once, when a session is created, and everything
/// downstream matches on variants instead of comparing strings.
///
/// Parsing is case-insensitive because the backend reports `"Admin"` in
/// its claims while older stored sessions use `"admin"`. Serialization is
/// always lowercase.
///
/// `#[serde(try_from = "String")]` routes deserialization through the
/// [`TryFrom<String>`] impl below, so an unknown role fails to decode
/// instead of silently becoming something else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Role {
    Admin,
    Customer,
    Professional,
}

impl Role {
    /// Every role, in the order the navigation bar checks them.
    pub const ALL: [Role; 3] = [Role::Admin, Role::Professional, Role::Customer];

    /// The lowercase wire name (`"admin"`, `"customer"`, `"professional"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
            Self::Professional => "professional",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ProtocolError::UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Severity tag attached to every user-facing message.
///
/// The names match the alert styles the backend emits (`"success"`,
/// `"info"`, `"warning"`, `"danger"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    Success,
    Info,
    Warning,
    /// The default: when the backend doesn't say, assume it's bad news.
    #[default]
    Danger,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }

    /// Parses a category, mapping anything unrecognised to `None`.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        s.parse().ok()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(Self::Success),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "danger" | "error" => Ok(Self::Danger),
            _ => Err(ProtocolError::UnknownCategory(s.to_string())),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Deserializes an optional category, treating unknown strings as absent.
///
/// Used for bodies where a strange category shouldn't make the whole
/// reply undecodable.
pub(crate) fn lenient_category<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Category::parse_lenient))
}

// ---------------------------------------------------------------------------
// ApiMessage
// ---------------------------------------------------------------------------

/// The `{message, category}` body the backend sends for mutations and
/// most errors.
///
/// Some older endpoints send `{"error": "..."}` instead of `message`. A
/// blank or missing `message` falls back to `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "RawApiMessage")]
pub struct ApiMessage {
    pub message: Option<String>,
    pub category: Option<Category>,
}

#[derive(Deserialize)]
struct RawApiMessage {
    #[serde(default)]
    message: Option<String>,

    #[serde(default)]
    error: Option<String>,

    #[serde(default, deserialize_with = "lenient_category")]
    category: Option<Category>,
}

impl From<RawApiMessage> for ApiMessage {
    fn from(raw: RawApiMessage) -> Self {
        Self {
            message: raw
                .message
                .filter(|m| !m.trim().is_empty())
                .or(raw.error),
            category: raw.category,
        }
    }
}

impl ApiMessage {
    /// Builds a message with an explicit category.
    pub fn new(message: impl Into<String>, category: Category) -> Self {
        Self {
            message: Some(message.into()),
            category: Some(category),
        }
    }
}

// ---------------------------------------------------------------------------
// Auth bodies
// ---------------------------------------------------------------------------

/// `POST /login` request body. `username` is the user's e-mail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `POST /login` reply.
///
/// `access_token` is optional on the wire: a 200 without a token is a
/// backend bug the client reports instead of storing an empty session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default, deserialize_with = "lenient_category")]
    pub category: Option<Category>,
}

/// Identity claims behind a token, from `GET /get-claims`.
///
/// `role` stays a raw string here: it is validated into a [`Role`] when
/// the session is created, so a bad value can be reported to the user
/// rather than failing the decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub role: String,

    #[serde(default)]
    pub user_id: Option<u64>,

    #[serde(default)]
    pub blocked: bool,

    /// Professionals must be approved by an admin before signing in.
    #[serde(default)]
    pub approved: bool,

    /// Landing hint, e.g. `"customer_profile"` for incomplete profiles.
    #[serde(default)]
    pub redirect: Option<String>,
}

/// `GET /get-claims` reply wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsResponse {
    pub claims: Claims,
}

/// `POST /register` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}
