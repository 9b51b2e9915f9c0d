//! Component catalog for the agents-kit site.
//!
//! This crate owns the mechanism behind the `/c/{componentSlug}` page: a
//! manifest of component modules keyed by slug, the route enumerator that
//! lists every slug to pre-render, and the resolver that picks the export to
//! mount for a given slug.

pub mod enumerate;
pub mod exports;
pub mod manifest;
pub mod nav;
pub mod paths;
pub mod resolver;
pub mod slug;
pub mod source;
pub mod traits;

pub use enumerate::{enumerate_routes, scan_catalog, CatalogFile, RouteParam};
pub use exports::{Component, ExportValue, ModuleExports};
pub use manifest::{Manifest, ManifestDiff, ManifestError};
pub use nav::{Navigation, Route, RouteKind, RouteTable};
pub use paths::{asset_path, base_path_from_env, normalize_base_path, page_path, BASE_PATH_ENV};
pub use resolver::{ComponentResolver, ExportRef, MatchRule, ResolveError, ResolvedComponent};
pub use slug::{Slug, COMPONENT_EXTENSIONS, COMPONENT_SUFFIX};
pub use source::{load_source_module, parse_exports};
pub use traits::{LoadError, ModuleLoader, RenderContext};
