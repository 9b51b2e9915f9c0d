//! List the component pages the catalog would generate.

use anyhow::{Context, Result};
use agents_kit_catalog::{enumerate_routes, page_path, Manifest};

use crate::config::ConfigFile;

/// Run the routes command.
pub fn run(config: &ConfigFile, json: bool) -> Result<()> {
    if json {
        let params = serde_json::to_string_pretty(&enumerate_routes(&config.components_dir()))
            .context("Failed to encode route params")?;
        println!("{}", params);
        return Ok(());
    }

    let manifest = Manifest::from_directory(&config.components_dir());

    let lines = route_lines(&manifest, &config.base_path());
    if lines.is_empty() {
        tracing::warn!("No components found in {}", config.components_dir().display());
    }
    for line in lines {
        println!("{}", line);
    }

    Ok(())
}

/// One line per page: its URL and title.
fn route_lines(manifest: &Manifest, base_path: &str) -> Vec<String> {
    manifest
        .slugs()
        .into_iter()
        .map(|slug| format!("{}\t{}", page_path(base_path, slug.as_str()), slug.title()))
        .collect()
}
