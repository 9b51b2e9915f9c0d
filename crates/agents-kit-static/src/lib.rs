//! Static site generator for the agents-kit component catalog.
//!
//! Enumerates the catalog, resolves every slug and pre-renders one page per
//! component, plus the not-found page the static host serves for the rest.

pub mod assets;
pub mod builder;
pub mod templates;

pub use builder::{catalog_routes, BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use templates::{build_nav, nav_links, NavItem, NavLink, PageContext, TemplateEngine};
