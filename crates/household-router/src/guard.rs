//! The navigation guard: one synchronous allow/redirect decision per
//! navigation.

use std::collections::HashMap;

use household_protocol::Role;
use household_session::{Session, SessionStore};

use crate::{GuardState, RouteTable, RouterError, normalize_path};

/// Guard configuration.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Where refused navigations are sent. Must resolve to a public route.
    pub login_path: String,
    /// Route-level redirect hops followed before giving up.
    pub max_redirects: usize,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            max_redirects: 8,
        }
    }
}

/// Why a navigation was sent to the login route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// The route requires a session and there is no token.
    Unauthenticated,
    /// The route requires `required` and the session holds `actual`.
    RoleMismatch {
        required: Role,
        actual: Option<Role>,
    },
}

impl std::fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "not signed in"),
            Self::RoleMismatch {
                required,
                actual: Some(actual),
            } => write!(f, "requires {required}, signed in as {actual}"),
            Self::RoleMismatch {
                required,
                actual: None,
            } => write!(f, "requires {required}, session has no role"),
        }
    }
}

/// A route the guard let through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    /// Final path after route-level redirects.
    pub path: String,
    pub name: Option<String>,
    pub params: HashMap<String, String>,
    pub guard: GuardState,
    /// The path originally asked for, when a route-level redirect moved it.
    pub redirected_from: Option<String>,
}

/// The guard's decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow(ResolvedRoute),
    Redirect {
        /// The login route.
        to: String,
        /// The path that was refused (after route-level redirects).
        from: String,
        reason: RedirectReason,
    },
}

impl Navigation {
    /// The path the caller should end up on.
    pub fn destination(&self) -> &str {
        match self {
            Self::Allow(route) => &route.path,
            Self::Redirect { to, .. } => to,
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Checks navigations against a [`RouteTable`] and a session.
///
/// ```rust
/// use household_protocol::Role;
/// use household_router::{GuardConfig, Navigation, RouteDescriptor, RouteTable, RouterGuard};
/// use household_session::Session;
///
/// let table = RouteTable::new([
///     RouteDescriptor::new("/login"),
///     RouteDescriptor::new("/admin").role(Role::Admin),
/// ])
/// .unwrap();
/// let guard = RouterGuard::new(table, GuardConfig::default()).unwrap();
///
/// let nav = guard.navigate("/admin", &Session::anonymous()).unwrap();
/// assert_eq!(nav.destination(), "/login");
/// ```
#[derive(Debug, Clone)]
pub struct RouterGuard {
    table: RouteTable,
    config: GuardConfig,
}

impl RouterGuard {
    /// # Errors
    /// [`RouterError::InvalidLoginRoute`] if the login path doesn't resolve
    /// to a public, non-redirecting route.
    pub fn new(table: RouteTable, mut config: GuardConfig) -> Result<Self, RouterError> {
        config.login_path = normalize_path(&config.login_path);
        match table.resolve(&config.login_path) {
            Some(m) if !m.guard.is_guarded() && m.redirect.is_none() => {}
            _ => return Err(RouterError::InvalidLoginRoute(config.login_path)),
        }
        Ok(Self { table, config })
    }

    /// Decides one navigation against a session snapshot.
    ///
    /// # Errors
    /// - [`RouterError::NoMatch`] for an unknown path (or an unknown
    ///   redirect target).
    /// - [`RouterError::RedirectLoop`] when route-level redirects exceed
    ///   `max_redirects`.
    pub fn navigate(&self, path: &str, session: &Session) -> Result<Navigation, RouterError> {
        let requested = normalize_path(path);
        let mut current = self
            .table
            .resolve(&requested)
            .ok_or_else(|| RouterError::NoMatch(requested.clone()))?;

        let mut hops = 0;
        while let Some(target) = current.redirect.take() {
            hops += 1;
            if hops > self.config.max_redirects {
                return Err(RouterError::RedirectLoop(requested));
            }
            current = self
                .table
                .resolve(&target)
                .ok_or(RouterError::NoMatch(target))?;
        }

        let redirected_from = (hops > 0).then(|| requested.clone());

        match current.guard.check(session) {
            Ok(()) => {
                tracing::debug!(path = %current.path, guard = %current.guard, "navigation allowed");
                Ok(Navigation::Allow(ResolvedRoute {
                    path: current.path,
                    name: current.name,
                    params: current.params,
                    guard: current.guard,
                    redirected_from,
                }))
            }
            Err(reason) => {
                tracing::debug!(
                    path = %current.path,
                    guard = %current.guard,
                    %reason,
                    "navigation redirected to login"
                );
                Ok(Navigation::Redirect {
                    to: self.config.login_path.clone(),
                    from: current.path,
                    reason,
                })
            }
        }
    }

    /// [`navigate`](Self::navigate) against the store's current session.
    pub fn navigate_store(
        &self,
        path: &str,
        store: &SessionStore,
    ) -> Result<Navigation, RouterError> {
        self.navigate(path, &store.snapshot())
    }

    pub fn login_path(&self) -> &str {
        &self.config.login_path
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }
}
