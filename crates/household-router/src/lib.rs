//! Route table and navigation guard for the household client.
//!
//! Every page of the client is a route. Some are public (login,
//! registration), the rest belong to one role's section. Before any page is
//! shown, the [`RouterGuard`] checks the current session against the
//! route's requirements and either lets the navigation through or sends the
//! user to the login page.
//!
//! # Key types
//!
//! - [`RouteDescriptor`]: static metadata for one path (built at startup)
//! - [`RouteTable`]: compiled, immutable set of routes; resolves paths
//! - [`GuardState`]: what a route demands: nothing, a session, or a role
//! - [`RouterGuard`]: one synchronous allow/redirect decision per navigation
//! - [`marketplace_routes`]: the marketplace's own route table

mod error;
mod guard;
mod marketplace;
mod route;
mod table;

pub use error::RouterError;
pub use guard::{GuardConfig, Navigation, RedirectReason, ResolvedRoute, RouterGuard};
pub use marketplace::{
    LOGIN_PATH, LOGOUT_PATH, NavLink, landing_route, marketplace_guard, marketplace_routes,
    nav_links,
};
pub use route::{GuardState, RouteDescriptor};
pub use table::{RouteMatch, RouteTable, normalize_path};
