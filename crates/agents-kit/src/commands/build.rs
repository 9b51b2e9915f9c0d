//! Static site build command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use agents_kit_static::StaticBuilder;

use crate::config::ConfigFile;

/// Run the build command.
pub async fn run(config: &ConfigFile, output: Option<PathBuf>, minify: Option<bool>) -> Result<()> {
    tracing::info!("Building static site...");

    let build_config = config.build_config(output, minify);
    if !build_config.base_path.is_empty() {
        tracing::info!("Base path: {}", build_config.base_path);
    }

    let result = StaticBuilder::new(build_config)
        .build()
        .await
        .context("Build failed")?;

    tracing::info!(
        "Built {} component pages in {}ms",
        result.pages,
        result.duration_ms
    );

    if result.not_found > 0 {
        tracing::warn!(
            "{} components did not resolve and will serve the not-found page",
            result.not_found
        );
    }

    tracing::info!("Output: {}", result.output_dir.display());

    Ok(())
}
