//! Route enumeration over the components directory.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::slug::Slug;

/// One page to pre-render, in the shape the page pipeline expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParam {
    #[serde(rename = "componentSlug")]
    pub component_slug: Slug,
}

impl RouteParam {
    pub fn new(slug: impl Into<Slug>) -> Self {
        Self {
            component_slug: slug.into(),
        }
    }
}

/// A component module file found in the catalog directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFile {
    pub slug: Slug,
    pub path: PathBuf,
}

/// List component module files directly inside `dir`.
///
/// Entries come back in directory listing order. A missing or unreadable
/// directory yields an empty list; enumeration never fails the build.
pub fn scan_catalog(dir: &Path) -> Vec<CatalogFile> {
    if !dir.is_dir() {
        tracing::warn!("Components directory not found at: {}", dir.display());
        return Vec::new();
    }

    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                // The root itself failing means nothing can be listed.
                if e.depth() == 0 {
                    tracing::error!("Error reading components directory: {}", e);
                    return Vec::new();
                }
                tracing::debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(slug) = entry.file_name().to_str().and_then(Slug::from_file_name) else {
            continue;
        };

        if !seen.insert(slug.clone()) {
            tracing::warn!(
                "Duplicate component slug '{}' ({}), keeping the first file",
                slug,
                entry.path().display()
            );
            continue;
        }

        tracing::debug!("Generated param for component: {}", slug);
        files.push(CatalogFile {
            slug,
            path: entry.path().to_path_buf(),
        });
    }

    files
}

/// Enumerate the route params for every component in `dir`.
pub fn enumerate_routes(dir: &Path) -> Vec<RouteParam> {
    let params: Vec<RouteParam> = scan_catalog(dir)
        .into_iter()
        .map(|file| RouteParam::new(file.slug))
        .collect();

    tracing::info!("Generated {} component params", params.len());
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn slugs(params: &[RouteParam]) -> Vec<&str> {
        let mut slugs: Vec<&str> = params.iter().map(|p| p.component_slug.as_str()).collect();
        slugs.sort_unstable();
        slugs
    }

    #[test]
    fn keeps_only_component_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("x.tsx"), "export default function X() {}").unwrap();
        fs::write(temp.path().join("y.jsx"), "export default function Y() {}").unwrap();
        fs::write(temp.path().join("z.md"), "# Notes").unwrap();

        let params = enumerate_routes(temp.path());

        assert_eq!(slugs(&params), vec!["x", "y"]);
    }

    #[test]
    fn missing_directory_yields_nothing() {
        let temp = tempdir().unwrap();
        let params = enumerate_routes(&temp.path().join("blocks"));
        assert!(params.is_empty());
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let temp = tempdir().unwrap();
        assert!(enumerate_routes(temp.path()).is_empty());
    }

    #[test]
    fn does_not_descend_into_subdirectories() {
        let temp = tempdir().unwrap();
        let nested = temp.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("inner.tsx"), "").unwrap();
        fs::create_dir_all(temp.path().join("folder.tsx")).unwrap();
        fs::write(temp.path().join("outer.tsx"), "").unwrap();

        let params = enumerate_routes(temp.path());

        assert_eq!(slugs(&params), vec!["outer"]);
    }

    #[test]
    fn collapses_duplicate_slugs() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("card.tsx"), "").unwrap();
        fs::write(temp.path().join("card.jsx"), "").unwrap();

        let files = scan_catalog(temp.path());

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].slug, Slug::new("card"));
    }

    #[test]
    fn file_path_points_at_source() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("agent-card.tsx"), "").unwrap();

        let files = scan_catalog(temp.path());

        assert_eq!(files[0].path, temp.path().join("agent-card.tsx"));
    }

    #[test]
    fn serializes_with_page_param_name() {
        let json = serde_json::to_string(&RouteParam::new("agent-card")).unwrap();
        assert_eq!(json, r#"{"componentSlug":"agent-card"}"#);
    }
}
