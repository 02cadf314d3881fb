//! Error types for the router layer.

/// Errors from building a route table or resolving a navigation.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// No route matches the requested path.
    #[error("no route matches {0:?}")]
    NoMatch(String),

    /// Route-level redirects chained more than the configured limit,
    /// almost certainly a cycle such as `/a → /b → /a`.
    #[error("too many redirects starting from {0:?}")]
    RedirectLoop(String),

    /// Two routes compile to the same pattern.
    #[error("duplicate route {0:?}")]
    DuplicateRoute(String),

    /// A descriptor is malformed (empty parameter name, empty redirect
    /// target, ...).
    #[error("invalid route {path:?}: {reason}")]
    InvalidRoute { path: String, reason: String },

    /// The configured login path doesn't resolve to a public route, so
    /// redirecting there would itself be refused.
    #[error("login route {0:?} must exist and be public")]
    InvalidLoginRoute(String),
}
