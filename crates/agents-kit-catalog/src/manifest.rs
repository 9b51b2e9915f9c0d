//! Component manifest: the explicit slug -> module table.
//!
//! Every page of the catalog resolves through a manifest. Entries are added
//! by explicit registration, either by hand with typed render functions or
//! generated from the components directory.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::enumerate::{scan_catalog, RouteParam};
use crate::exports::{Component, ModuleExports};
use crate::slug::Slug;
use crate::source::load_source_module;
use crate::traits::{LoadError, ModuleLoader};

/// Produces a fresh export table for one module.
pub type ModuleFactory = Arc<dyn Fn() -> Result<ModuleExports, LoadError> + Send + Sync>;

/// A registered module.
#[derive(Clone)]
struct ManifestEntry {
    slug: Slug,
    /// Source file, for entries generated from a directory
    source_path: Option<PathBuf>,
    factory: ModuleFactory,
}

/// Explicit registry of component modules, in registration order.
#[derive(Clone, Default)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
    index: HashMap<Slug, usize>,
}

/// Errors that can occur while registering modules.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("Cannot register a module under an empty slug")]
    EmptySlug,
}

/// Differences between a manifest and a components directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestDiff {
    /// Registered slugs with no file in the directory
    pub missing_files: Vec<Slug>,

    /// Files in the directory with no registered slug
    pub unregistered: Vec<Slug>,
}

impl ManifestDiff {
    pub fn is_clean(&self) -> bool {
        self.missing_files.is_empty() && self.unregistered.is_empty()
    }
}

impl Manifest {
    /// Create a new empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a manifest from the component files in `dir`.
    ///
    /// Entries are registered in slug order. Each entry reads its source
    /// file on load, so edits are picked up without rebuilding the
    /// manifest. A missing directory gives an empty manifest.
    pub fn from_directory(dir: &Path) -> Self {
        let mut manifest = Self::new();

        let mut files = scan_catalog(dir);
        files.sort_by(|a, b| a.slug.cmp(&b.slug));

        for file in files {
            let slug = file.slug.clone();
            let path = file.path.clone();
            let factory: ModuleFactory = Arc::new(move || load_source_module(&slug, &path));
            manifest.insert(ManifestEntry {
                slug: file.slug,
                source_path: Some(file.path),
                factory,
            });
        }

        tracing::info!(
            "Loaded {} components from {}",
            manifest.len(),
            dir.display()
        );

        manifest
    }

    /// Register a module factory under `slug`.
    ///
    /// Registering a slug twice replaces the earlier factory but keeps its
    /// position.
    pub fn register(
        &mut self,
        slug: impl Into<Slug>,
        factory: impl Fn() -> Result<ModuleExports, LoadError> + Send + Sync + 'static,
    ) -> Result<(), ManifestError> {
        let slug = slug.into();
        if slug.is_empty() {
            return Err(ManifestError::EmptySlug);
        }

        self.insert(ManifestEntry {
            slug,
            source_path: None,
            factory: Arc::new(factory),
        });
        Ok(())
    }

    /// Register a fixed export table. Every load hands out a clone, so
    /// resolved components keep their identity across loads.
    pub fn register_exports(
        &mut self,
        slug: impl Into<Slug>,
        exports: ModuleExports,
    ) -> Result<(), ManifestError> {
        self.register(slug, move || Ok(exports.clone()))
    }

    /// Register a module whose only export is `component` as its default.
    pub fn register_component(
        &mut self,
        slug: impl Into<Slug>,
        component: Component,
    ) -> Result<(), ManifestError> {
        self.register_exports(slug, ModuleExports::new().with_default(component))
    }

    fn insert(&mut self, entry: ManifestEntry) {
        match self.index.get(&entry.slug) {
            Some(&i) => {
                tracing::warn!("Replacing module registered for '{}'", entry.slug);
                self.entries[i] = entry;
            }
            None => {
                self.index.insert(entry.slug.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }

    /// Check if a slug is registered.
    pub fn contains(&self, slug: &str) -> bool {
        self.index.contains_key(slug)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered slugs in registration order.
    pub fn slugs(&self) -> Vec<&Slug> {
        self.entries.iter().map(|e| &e.slug).collect()
    }

    /// Source file behind a generated entry.
    pub fn source_path(&self, slug: &Slug) -> Option<&Path> {
        let &i = self.index.get(slug)?;
        self.entries[i].source_path.as_deref()
    }

    /// Route params for every registered module, in registration order.
    pub fn route_params(&self) -> Vec<RouteParam> {
        self.entries
            .iter()
            .map(|e| RouteParam::new(e.slug.clone()))
            .collect()
    }

    /// Compare the registered slugs with the component files in `dir`.
    pub fn validate_against(&self, dir: &Path) -> ManifestDiff {
        let on_disk: Vec<Slug> = scan_catalog(dir).into_iter().map(|f| f.slug).collect();
        let on_disk_set: HashSet<&Slug> = on_disk.iter().collect();

        let missing_files = self
            .entries
            .iter()
            .filter(|e| !on_disk_set.contains(&e.slug))
            .map(|e| e.slug.clone())
            .collect();

        let unregistered = on_disk
            .iter()
            .filter(|slug| !self.index.contains_key(*slug))
            .cloned()
            .collect();

        ManifestDiff {
            missing_files,
            unregistered,
        }
    }
}

impl ModuleLoader for Manifest {
    fn load(&self, slug: &Slug) -> Result<ModuleExports, LoadError> {
        let &i = self
            .index
            .get(slug)
            .ok_or_else(|| LoadError::NotRegistered(slug.clone()))?;
        (self.entries[i].factory)()
    }
}

impl fmt::Debug for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manifest")
            .field("slugs", &self.slugs())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exports::ExportValue;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn card() -> Component {
        Component::new("AgentCard", |_| "<div>card</div>".to_string())
    }

    #[test]
    fn registers_in_order() {
        let mut manifest = Manifest::new();
        manifest.register_component("agent-card", card()).unwrap();
        manifest.register_component("agent-feedback", card()).unwrap();

        let params: Vec<String> = manifest
            .route_params()
            .into_iter()
            .map(|p| p.component_slug.to_string())
            .collect();

        assert_eq!(params, vec!["agent-card", "agent-feedback"]);
        assert!(manifest.contains("agent-card"));
        assert!(!manifest.contains("ghost"));
    }

    #[test]
    fn rejects_empty_slug() {
        let mut manifest = Manifest::new();
        let result = manifest.register_component("", card());
        assert!(matches!(result, Err(ManifestError::EmptySlug)));
        assert!(manifest.is_empty());
    }

    #[test]
    fn reregistration_replaces_in_place() {
        let mut manifest = Manifest::new();
        manifest.register_component("a", card()).unwrap();
        manifest.register_component("b", card()).unwrap();
        manifest
            .register_exports(
                "a",
                ModuleExports::new().with_named("Other", ExportValue::component(card())),
            )
            .unwrap();

        assert_eq!(manifest.len(), 2);
        let exports = manifest.load(&Slug::new("a")).unwrap();
        assert!(exports.default_export().is_none());
        assert_eq!(exports.names(), vec!["Other"]);
    }

    #[test]
    fn unregistered_slug_fails_to_load() {
        let manifest = Manifest::new();
        let result = manifest.load(&Slug::new("ghost"));
        assert!(matches!(result, Err(LoadError::NotRegistered(s)) if s.as_str() == "ghost"));
    }

    #[test]
    fn factory_errors_propagate() {
        let mut manifest = Manifest::new();
        manifest
            .register("broken", || {
                Err(LoadError::Failed {
                    slug: Slug::new("broken"),
                    message: "unexpected token".to_string(),
                })
            })
            .unwrap();

        assert!(matches!(
            manifest.load(&Slug::new("broken")),
            Err(LoadError::Failed { .. })
        ));
    }

    #[test]
    fn generates_from_directory() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("agent-card.tsx"),
            "export function AgentCard() { return null }\n",
        )
        .unwrap();
        fs::write(temp.path().join("notes.md"), "# notes").unwrap();

        let manifest = Manifest::from_directory(temp.path());

        assert_eq!(manifest.len(), 1);
        assert_eq!(
            manifest.source_path(&Slug::new("agent-card")),
            Some(temp.path().join("agent-card.tsx").as_path())
        );

        let exports = manifest.load(&Slug::new("agent-card")).unwrap();
        assert_eq!(exports.names(), vec!["AgentCard"]);
    }

    #[test]
    fn generated_entries_are_sorted() {
        let temp = tempdir().unwrap();
        for name in ["agent-web-search.tsx", "agent-card.jsx", "agent-feedback.tsx"] {
            fs::write(temp.path().join(name), "").unwrap();
        }

        let manifest = Manifest::from_directory(temp.path());
        let slugs: Vec<&str> = manifest.slugs().into_iter().map(|s| s.as_str()).collect();

        assert_eq!(slugs, vec!["agent-card", "agent-feedback", "agent-web-search"]);
    }

    #[test]
    fn generated_entry_sees_deleted_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("agent-card.tsx");
        fs::write(&path, "export function AgentCard() {}\n").unwrap();

        let manifest = Manifest::from_directory(temp.path());
        fs::remove_file(&path).unwrap();

        assert!(matches!(
            manifest.load(&Slug::new("agent-card")),
            Err(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn missing_directory_gives_empty_manifest() {
        let temp = tempdir().unwrap();
        let manifest = Manifest::from_directory(&temp.path().join("blocks"));
        assert!(manifest.is_empty());
    }

    #[test]
    fn validates_against_directory() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("agent-card.tsx"), "").unwrap();
        fs::write(temp.path().join("agent-web-search.tsx"), "").unwrap();

        let mut manifest = Manifest::new();
        manifest.register_component("agent-card", card()).unwrap();
        manifest.register_component("agent-ghost", card()).unwrap();

        let diff = manifest.validate_against(temp.path());

        assert!(!diff.is_clean());
        assert_eq!(diff.missing_files, vec![Slug::new("agent-ghost")]);
        assert_eq!(diff.unregistered, vec![Slug::new("agent-web-search")]);
    }
}
