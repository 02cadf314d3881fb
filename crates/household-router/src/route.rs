//! Route descriptors and the per-route guard state machine.

use household_protocol::Role;
use household_session::Session;

use crate::RedirectReason;

// ---------------------------------------------------------------------------
// RouteDescriptor
// ---------------------------------------------------------------------------

/// Static metadata for one navigable path.
///
/// Descriptors nest: a child's path is relative to its parent's (unless it
/// starts with `/`), and a child inherits its parent's access rules. Fields
/// are private so the builder can keep one rule true: **a role requirement
/// always implies an auth requirement.**
///
/// ```rust
/// use household_protocol::Role;
/// use household_router::RouteDescriptor;
///
/// let admin = RouteDescriptor::new("/admin")
///     .role(Role::Admin)
///     .redirect_to("/admin/dashboard")
///     .child(RouteDescriptor::new("dashboard").name("admin-dashboard"));
///
/// assert!(admin.is_auth_required());
/// assert_eq!(admin.children().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDescriptor {
    path: String,
    name: Option<String>,
    requires_auth: bool,
    required_role: Option<Role>,
    redirect: Option<String>,
    children: Vec<RouteDescriptor>,
}

impl RouteDescriptor {
    /// A public route at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            requires_auth: false,
            required_role: None,
            redirect: None,
            children: Vec::new(),
        }
    }

    /// A route that only forwards to `to`.
    pub fn redirect(path: impl Into<String>, to: impl Into<String>) -> Self {
        Self::new(path).redirect_to(to)
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Requires a session (any role).
    pub fn requires_auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Requires a session holding `role`. Implies [`requires_auth`](Self::requires_auth).
    pub fn role(mut self, role: Role) -> Self {
        self.requires_auth = true;
        self.required_role = Some(role);
        self
    }

    /// Navigating to exactly this route forwards to `to`. Children are
    /// unaffected.
    pub fn redirect_to(mut self, to: impl Into<String>) -> Self {
        self.redirect = Some(to.into());
        self
    }

    pub fn child(mut self, child: RouteDescriptor) -> Self {
        self.children.push(child);
        self
    }

    pub fn children_from(mut self, children: impl IntoIterator<Item = RouteDescriptor>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn route_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_auth_required(&self) -> bool {
        self.requires_auth
    }

    pub fn required_role(&self) -> Option<Role> {
        self.required_role
    }

    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn children(&self) -> &[RouteDescriptor] {
        &self.children
    }
}

// ---------------------------------------------------------------------------
// GuardState
// ---------------------------------------------------------------------------

/// What a resolved route demands of the session.
///
/// ```text
///   Unguarded ─────────────────────────────→ allow
///   RequiresAuth ──(no token)──────────────→ redirect to login
///                └─(token)─────────────────→ allow
///   RequiresAuthAndRole(R) ──(no token)────→ redirect to login
///                          ├─(role ≠ R)────→ redirect to login
///                          └─(role = R)────→ allow
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Unguarded,
    RequiresAuth,
    RequiresAuthAndRole(Role),
}

impl GuardState {
    /// Derives the guard state from the chain of matched descriptors,
    /// outermost first.
    ///
    /// - Auth is inherited: if ANY record in the chain requires auth, so
    ///   does the route.
    /// - Role is the most specific one: the DEEPEST record that names a
    ///   role governs.
    pub fn from_chain<'a>(chain: impl DoubleEndedIterator<Item = &'a RouteDescriptor> + Clone) -> Self {
        let requires_auth = chain.clone().any(|r| r.requires_auth);
        let role = chain.rev().find_map(|r| r.required_role);
        match (requires_auth, role) {
            (_, Some(role)) => Self::RequiresAuthAndRole(role),
            (true, None) => Self::RequiresAuth,
            (false, None) => Self::Unguarded,
        }
    }

    /// Runs the transition rule against a session.
    ///
    /// # Errors
    /// The reason the navigation must be redirected to login.
    pub fn check(&self, session: &Session) -> Result<(), RedirectReason> {
        match *self {
            Self::Unguarded => Ok(()),
            _ if !session.is_authenticated() => Err(RedirectReason::Unauthenticated),
            Self::RequiresAuth => Ok(()),
            Self::RequiresAuthAndRole(required) if session.role == Some(required) => Ok(()),
            Self::RequiresAuthAndRole(required) => Err(RedirectReason::RoleMismatch {
                required,
                actual: session.role,
            }),
        }
    }

    /// `true` unless the route is public.
    pub fn is_guarded(&self) -> bool {
        !matches!(self, Self::Unguarded)
    }
}

impl std::fmt::Display for GuardState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unguarded => write!(f, "Unguarded"),
            Self::RequiresAuth => write!(f, "RequiresAuth"),
            Self::RequiresAuthAndRole(role) => write!(f, "RequiresAuth+Role({role})"),
        }
    }
}
