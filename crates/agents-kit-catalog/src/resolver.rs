//! Slug to component resolution.
//!
//! Resolution policy, first match wins:
//!
//! 1. an empty slug is rejected without loading anything;
//! 2. the module is loaded through the [`ModuleLoader`];
//! 3. a default export is the component;
//! 4. a function export named after the slug in upper camel case
//!    (`agent-card` -> `AgentCard`);
//! 5. the same name with a `Component` suffix;
//! 6. the first function export, in declaration order, not flagged as a
//!    non-component.
//!
//! Every failure is logged and returned as a [`ResolveError`], which callers
//! render as a not-found page.

use std::fmt;

use crate::exports::{Component, ModuleExports};
use crate::slug::Slug;
use crate::traits::{LoadError, ModuleLoader, RenderContext};

/// Rule that selected the component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchRule {
    Default,
    ExactName,
    SuffixedName,
    FirstFunction,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Default => "default export",
            Self::ExactName => "exact name",
            Self::SuffixedName => "Component suffix",
            Self::FirstFunction => "first function export",
        };
        f.write_str(s)
    }
}

/// Which export of the module was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportRef {
    Default,
    Named(String),
}

impl fmt::Display for ExportRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// The component chosen for a slug.
#[derive(Debug, Clone)]
pub struct ResolvedComponent {
    pub slug: Slug,
    pub export: ExportRef,
    pub rule: MatchRule,
    pub component: Component,
}

impl ResolvedComponent {
    /// Render the component for its page.
    pub fn render(&self, base_path: &str) -> String {
        self.component.render(&RenderContext {
            slug: self.slug.clone(),
            base_path: base_path.to_string(),
        })
    }

    /// Whether two resolutions picked the same export of the same module.
    pub fn same_export(&self, other: &ResolvedComponent) -> bool {
        self.slug == other.slug && self.export == other.export && self.rule == other.rule
    }
}

/// Reasons a slug does not resolve to a component.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("No component slug provided")]
    MissingSlug,

    #[error("Failed to load component {slug}: {source}")]
    ModuleLoad {
        slug: Slug,
        #[source]
        source: LoadError,
    },

    #[error("No valid component export found in {0}")]
    NoQualifyingExport(Slug),
}

/// Resolves slugs against a module loader.
#[derive(Debug, Clone)]
pub struct ComponentResolver<L> {
    loader: L,
}

impl<L: ModuleLoader> ComponentResolver<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Resolve `slug` to the component to render.
    pub fn resolve(&self, slug: &str) -> Result<ResolvedComponent, ResolveError> {
        if slug.is_empty() {
            tracing::error!("No component slug provided");
            return Err(ResolveError::MissingSlug);
        }

        let slug = Slug::new(slug);

        let exports = match self.loader.load(&slug) {
            Ok(exports) => exports,
            Err(source) => {
                tracing::error!("Failed to import component {}: {}", slug, source);
                return Err(ResolveError::ModuleLoad { slug, source });
            }
        };

        match select_export(&slug, &exports) {
            Some((export, rule, component)) => {
                tracing::debug!("Resolved {} to {} via {}", slug, export, rule);
                Ok(ResolvedComponent {
                    slug,
                    export,
                    rule,
                    component,
                })
            }
            None => {
                tracing::error!("No valid component export found in {}", slug);
                Err(ResolveError::NoQualifyingExport(slug))
            }
        }
    }
}

/// Pick the component export of a loaded module.
pub fn select_export(
    slug: &Slug,
    exports: &ModuleExports,
) -> Option<(ExportRef, MatchRule, Component)> {
    if let Some(component) = exports.default_export() {
        return Some((ExportRef::Default, MatchRule::Default, component.clone()));
    }

    let candidates = [
        (slug.candidate_name(), MatchRule::ExactName),
        (slug.suffixed_candidate_name(), MatchRule::SuffixedName),
    ];

    for (name, rule) in candidates {
        if let Some(component) = exports.get(&name).and_then(|v| v.as_function()) {
            return Some((ExportRef::Named(name), rule, component.clone()));
        }
    }

    // Best effort: with several function exports the first one wins.
    exports
        .named()
        .find(|(_, value)| value.is_component_like())
        .and_then(|(name, value)| {
            let component = value.as_function()?.clone();
            Some((ExportRef::Named(name.to_string()), MatchRule::FirstFunction, component))
        })
}
