//! Compiled route table.
//!
//! [`RouteTable::new`] flattens nested descriptors into one list of
//! patterns at startup. After that the table is immutable and resolution is
//! a linear scan, which is plenty for the few dozen routes a client has.

use std::collections::HashMap;

use crate::{GuardState, RouteDescriptor, RouterError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

#[derive(Debug, Clone)]
struct CompiledRoute {
    pattern: String,
    segments: Vec<Segment>,
    name: Option<String>,
    guard: GuardState,
    redirect: Option<String>,
}

impl CompiledRoute {
    fn static_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Static(_)))
            .count()
    }

    fn matches(&self, parts: &[&str]) -> Option<HashMap<String, String>> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(s) if s == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

/// The result of resolving a concrete path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// The normalized path that was resolved.
    pub path: String,
    /// The full pattern that matched, e.g. `/customer/requests/:id/review`.
    pub pattern: String,
    pub name: Option<String>,
    pub params: HashMap<String, String>,
    pub guard: GuardState,
    /// Route-level redirect target, already normalized.
    pub redirect: Option<String>,
}

/// An immutable set of compiled routes.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<CompiledRoute>,
}

impl RouteTable {
    /// Compiles the descriptor trees, outermost first, in declaration order.
    ///
    /// # Errors
    /// - [`RouterError::DuplicateRoute`] if two routes compile to the same
    ///   pattern.
    /// - [`RouterError::InvalidRoute`] for an empty `:param` name or an
    ///   empty redirect target.
    pub fn new(routes: impl IntoIterator<Item = RouteDescriptor>) -> Result<Self, RouterError> {
        let mut compiled = Vec::new();
        for root in routes {
            let mut chain = Vec::new();
            compile(&root, "", &mut chain, &mut compiled)?;
        }
        tracing::debug!(routes = compiled.len(), "route table compiled");
        Ok(Self { routes: compiled })
    }

    /// Resolves `path` to the best matching route.
    ///
    /// Among matching routes the one with the most static segments wins;
    /// ties go to the one declared first. Returns `None` for unknown paths.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let path = normalize_path(path);
        let parts = split(&path);

        let mut best: Option<(&CompiledRoute, HashMap<String, String>)> = None;
        for route in &self.routes {
            let Some(params) = route.matches(&parts) else {
                continue;
            };
            let better = best
                .as_ref()
                .is_none_or(|(current, _)| route.static_count() > current.static_count());
            if better {
                best = Some((route, params));
            }
        }

        best.map(|(route, params)| RouteMatch {
            path,
            pattern: route.pattern.clone(),
            name: route.name.clone(),
            params,
            guard: route.guard,
            redirect: route.redirect.clone(),
        })
    }

    /// Full patterns of every compiled route, in declaration order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.routes.iter().map(|r| r.pattern.as_str())
    }

    /// Looks a route up by name and returns its pattern.
    pub fn pattern_for(&self, name: &str) -> Option<&str> {
        self.routes
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
            .map(|r| r.pattern.as_str())
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn compile<'a>(
    route: &'a RouteDescriptor,
    parent: &str,
    chain: &mut Vec<&'a RouteDescriptor>,
    out: &mut Vec<CompiledRoute>,
) -> Result<(), RouterError> {
    let pattern = join(parent, route.path());
    chain.push(route);

    let segments = split(&pattern)
        .into_iter()
        .map(|part| parse_segment(&pattern, part))
        .collect::<Result<Vec<_>, _>>()?;

    let redirect = match route.redirect_target() {
        Some(target) if target.trim().is_empty() => {
            return Err(RouterError::InvalidRoute {
                path: pattern,
                reason: "empty redirect target".into(),
            });
        }
        Some(target) => Some(normalize_path(target)),
        None => None,
    };

    if out
        .iter()
        .any(|existing: &CompiledRoute| existing.segments == segments)
    {
        return Err(RouterError::DuplicateRoute(pattern));
    }

    out.push(CompiledRoute {
        guard: GuardState::from_chain(chain.iter().copied()),
        name: route.route_name().map(str::to_string),
        pattern: pattern.clone(),
        segments,
        redirect,
    });

    for child in route.children() {
        compile(child, &pattern, chain, out)?;
    }
    chain.pop();
    Ok(())
}

fn parse_segment(pattern: &str, part: &str) -> Result<Segment, RouterError> {
    match part.strip_prefix(':') {
        Some("") => Err(RouterError::InvalidRoute {
            path: pattern.to_string(),
            reason: "parameter segment without a name".into(),
        }),
        Some(name) => Ok(Segment::Param(name.to_string())),
        None => Ok(Segment::Static(part.to_string())),
    }
}

fn join(parent: &str, child: &str) -> String {
    if child.starts_with('/') || parent.is_empty() {
        normalize_path(child)
    } else {
        normalize_path(&format!("{parent}/{child}"))
    }
}

fn split(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Canonical form of a path: leading `/`, no query or fragment, no empty
/// segments, no trailing `/` (except the root itself).
///
/// ```rust
/// use household_router::normalize_path;
///
/// assert_eq!(normalize_path("admin//dashboard/?tab=1"), "/admin/dashboard");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let parts = split(path.trim());
    if parts.is_empty() {
        return "/".to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    for part in parts {
        out.push('/');
        out.push_str(part);
    }
    out
}
