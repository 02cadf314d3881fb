//! The household-services marketplace's routes.

use household_protocol::Role;

use crate::{GuardConfig, RouteDescriptor, RouteTable, RouterError, RouterGuard};

pub const LOGIN_PATH: &str = "/login";
pub const LOGOUT_PATH: &str = "/logout";

/// The pages every role section has.
fn section(role: Role) -> RouteDescriptor {
    let base = role.as_str();
    RouteDescriptor::new(format!("/{base}"))
        .role(role)
        .redirect_to(format!("/{base}/dashboard"))
        .child(RouteDescriptor::new("dashboard").name(format!("{base}-dashboard")))
        .child(RouteDescriptor::new("profile").name(format!("{base}-profile")))
        .child(RouteDescriptor::new("search").name(format!("{base}-search")))
        .child(RouteDescriptor::new("summary").name(format!("{base}-summary")))
}

/// The complete marketplace route tree.
///
/// | Path                                   | Access       |
/// |----------------------------------------|--------------|
/// | `/` → `/login`                         | public       |
/// | `/login`, `/admin/login`, `/logout`    | public       |
/// | `/register/{customer,professional}`    | public       |
/// | `/admin/...`                           | admin        |
/// | `/customer/...`                        | customer     |
/// | `/professional/...`                    | professional |
pub fn marketplace_routes() -> Vec<RouteDescriptor> {
    vec![
        RouteDescriptor::redirect("/", LOGIN_PATH),
        RouteDescriptor::new(LOGIN_PATH).name("login"),
        RouteDescriptor::new("/admin/login").name("admin-login"),
        RouteDescriptor::new(LOGOUT_PATH).name("logout"),
        RouteDescriptor::redirect("/register", "/register/customer")
            .child(RouteDescriptor::new("customer").name("register-customer"))
            .child(RouteDescriptor::new("professional").name("register-professional")),
        section(Role::Admin).children_from([
            RouteDescriptor::new("services/new").name("admin-service-new"),
            RouteDescriptor::new("services/:id/edit").name("admin-service-edit"),
            RouteDescriptor::new("reports").name("admin-reports"),
        ]),
        section(Role::Customer).children_from([
            RouteDescriptor::new("requests/:id/review").name("customer-review"),
            RouteDescriptor::new("requests/:id/remarks").name("customer-remarks"),
        ]),
        section(Role::Professional),
    ]
}

/// A guard over [`marketplace_routes`].
///
/// # Errors
/// Only if `config.login_path` isn't one of the public marketplace routes.
pub fn marketplace_guard(config: GuardConfig) -> Result<RouterGuard, RouterError> {
    RouterGuard::new(RouteTable::new(marketplace_routes())?, config)
}

/// Where `role` lands after signing in. `hint` is the claims' `redirect`
/// field; the server sets it to `<role>_profile` when the profile still
/// needs filling in.
pub fn landing_route(role: Role, hint: Option<&str>) -> String {
    let base = role.as_str();
    match (role, hint) {
        (Role::Admin, _) => "/admin/dashboard".to_string(),
        (_, Some(hint)) if hint == format!("{base}_profile") => format!("/{base}/profile"),
        _ => format!("/{base}/dashboard"),
    }
}

/// One entry of the navigation bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: String,
}

/// The navigation bar for `role`.
pub fn nav_links(role: Role) -> Vec<NavLink> {
    let base = role.as_str();
    let link = |label, page: &str| NavLink {
        label,
        path: format!("/{base}/{page}"),
    };
    vec![
        link("Home", "dashboard"),
        link("Profile", "profile"),
        link("Search", "search"),
        link("Summary", "summary"),
        NavLink {
            label: "Logout",
            path: LOGOUT_PATH.to_string(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use household_session::Session;

    use super::*;
    use crate::Navigation;

    #[test]
    fn test_marketplace_guard_builds_with_default_config() {
        let guard = marketplace_guard(GuardConfig::default()).unwrap();
        assert_eq!(guard.login_path(), LOGIN_PATH);
    }

    #[test]
    fn test_marketplace_admin_login_is_public_not_admin_section() {
        let guard = marketplace_guard(GuardConfig::default()).unwrap();
        let nav = guard.navigate("/admin/login", &Session::anonymous()).unwrap();
        assert!(nav.is_allowed());
    }

    #[test]
    fn test_marketplace_root_redirects_to_login() {
        let guard = marketplace_guard(GuardConfig::default()).unwrap();
        let nav = guard.navigate("/", &Session::anonymous()).unwrap();
        assert_eq!(nav.destination(), LOGIN_PATH);
        assert!(nav.is_allowed());
    }

    #[test]
    fn test_marketplace_register_defaults_to_customer() {
        let guard = marketplace_guard(GuardConfig::default()).unwrap();
        let nav = guard.navigate("/register", &Session::anonymous()).unwrap();
        assert_eq!(nav.destination(), "/register/customer");
    }

    #[test]
    fn test_marketplace_service_edit_captures_id() {
        let guard = marketplace_guard(GuardConfig::default()).unwrap();
        let session = Session {
            token: Some("t".into()),
            role: Some(Role::Admin),
        };

        let Navigation::Allow(route) = guard.navigate("/admin/services/7/edit", &session).unwrap()
        else {
            panic!("admin should reach service edit");
        };
        assert_eq!(route.name.as_deref(), Some("admin-service-edit"));
        assert_eq!(route.params["id"], "7");
    }

    #[test]
    fn test_landing_route_admin_ignores_hint() {
        assert_eq!(
            landing_route(Role::Admin, Some("admin_profile")),
            "/admin/dashboard"
        );
    }

    #[test]
    fn test_landing_route_customer_profile_hint() {
        assert_eq!(
            landing_route(Role::Customer, Some("customer_profile")),
            "/customer/profile"
        );
        assert_eq!(landing_route(Role::Customer, None), "/customer/dashboard");
    }

    #[test]
    fn test_landing_route_foreign_hint_is_ignored() {
        assert_eq!(
            landing_route(Role::Professional, Some("customer_profile")),
            "/professional/dashboard"
        );
        assert_eq!(
            landing_route(Role::Professional, Some("professional_profile")),
            "/professional/profile"
        );
    }

    #[test]
    fn test_nav_links_end_with_logout() {
        let links = nav_links(Role::Professional);

        assert_eq!(links.len(), 5);
        assert_eq!(links[0].path, "/professional/dashboard");
        assert_eq!(links[4].label, "Logout");
        assert_eq!(links[4].path, LOGOUT_PATH);
    }

    #[test]
    fn test_every_nav_link_resolves_for_its_role() {
        let guard = marketplace_guard(GuardConfig::default()).unwrap();
        for role in Role::ALL {
            let session = Session {
                token: Some("t".into()),
                role: Some(role),
            };
            for link in nav_links(role) {
                let nav = guard.navigate(&link.path, &session).unwrap();
                assert!(nav.is_allowed(), "{role} should reach {}", link.path);
            }
        }
    }
}
