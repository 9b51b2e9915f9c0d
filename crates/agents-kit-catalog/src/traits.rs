//! Trait definitions for module loaders.

use std::path::PathBuf;
use std::sync::Arc;

use crate::exports::ModuleExports;
use crate::slug::Slug;

/// Context handed to a component when it renders into a page.
#[derive(Debug, Clone, Default)]
pub struct RenderContext {
    /// Slug of the page being rendered
    pub slug: Slug,

    /// Deployment base path (e.g. "/agents-kit"), empty at the root
    pub base_path: String,
}

/// Errors that can occur while loading a module's export table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("No module registered for slug '{0}'")]
    NotRegistered(Slug),

    #[error("Module file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Module '{slug}' failed to load: {message}")]
    Failed { slug: Slug, message: String },
}

/// Source of module export tables, keyed by slug.
///
/// Every call produces a fresh export table; implementations must not keep
/// per-call state so resolutions for different slugs can run concurrently.
pub trait ModuleLoader: Send + Sync {
    /// Load the exports of the module registered for `slug`.
    fn load(&self, slug: &Slug) -> Result<ModuleExports, LoadError>;
}

impl<L: ModuleLoader + ?Sized> ModuleLoader for &L {
    fn load(&self, slug: &Slug) -> Result<ModuleExports, LoadError> {
        (**self).load(slug)
    }
}

impl<L: ModuleLoader + ?Sized> ModuleLoader for Arc<L> {
    fn load(&self, slug: &Slug) -> Result<ModuleExports, LoadError> {
        (**self).load(slug)
    }
}
