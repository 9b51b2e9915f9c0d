//! Ordered site routes with previous/next navigation.

use serde::{Deserialize, Serialize};

/// Section a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    #[default]
    Core,
    Component,
    Block,
    Agent,
}

/// A navigable page of the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Site-relative path, without the base path
    pub path: String,

    /// Link label
    pub label: String,

    /// Position in navigation (lower = first)
    #[serde(default)]
    pub order: i32,

    #[serde(rename = "type", default)]
    pub kind: RouteKind,
}

/// Neighbors of a route in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation<'a> {
    pub prev: Option<&'a Route>,
    pub current: &'a Route,
    pub next: Option<&'a Route>,
}

/// Routes sorted by their navigation order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table; routes with equal order keep their input order.
    pub fn new(mut routes: Vec<Route>) -> Self {
        routes.sort_by_key(|r| r.order);
        Self { routes }
    }

    /// Append a route after every existing one.
    pub fn push(&mut self, path: impl Into<String>, label: impl Into<String>, kind: RouteKind) {
        let order = self.routes.last().map(|r| r.order + 1).unwrap_or(0);
        self.routes.push(Route {
            path: path.into(),
            label: label.into(),
            order,
            kind,
        });
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn by_kind(&self, kind: RouteKind) -> impl Iterator<Item = &Route> {
        self.routes.iter().filter(move |r| r.kind == kind)
    }

    /// Previous, current and next route for `path`, or `None` when the path
    /// is not in the table.
    pub fn navigation(&self, path: &str) -> Option<Navigation<'_>> {
        let index = self.routes.iter().position(|r| r.path == path)?;

        Some(Navigation {
            prev: index.checked_sub(1).map(|i| &self.routes[i]),
            current: &self.routes[index],
            next: self.routes.get(index + 1),
        })
    }
}
