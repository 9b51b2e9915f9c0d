//! Initialize a component catalog in the current project.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Run the init command.
pub async fn run(config_path: &Path, yes: bool) -> Result<()> {
    let root = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    scaffold(root, config_path, yes)?;

    tracing::info!("Run 'agents-kit dev' to start the development server.");

    Ok(())
}

/// Write the config file and a sample component, keeping existing files
/// unless `overwrite` is set.
fn scaffold(root: &Path, config_path: &Path, overwrite: bool) -> Result<()> {
    tracing::info!("Initializing agents-kit...");

    if config_path.exists() && !overwrite {
        tracing::warn!(
            "{} already exists. Use --yes to overwrite.",
            config_path.display()
        );
        return Ok(());
    }

    fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    tracing::info!("Created {}", config_path.display());

    let blocks_dir = root.join("components/blocks");
    fs::create_dir_all(&blocks_dir).context("Failed to create components directory")?;

    let sample_path = blocks_dir.join("agent-card-basic.tsx");
    if !sample_path.exists() || overwrite {
        fs::write(&sample_path, SAMPLE_COMPONENT)
            .with_context(|| format!("Failed to write {}", sample_path.display()))?;
        tracing::info!("Created {}", sample_path.display());
    }

    tracing::info!("Initialization complete!");

    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# agents-kit configuration

[site]
title = "agents-ui-kit"
description = "Advanced UI components for building AI agent interfaces."

# Sub-path the exported site is served from.
# AGENTS_KIT_BASE_PATH overrides this at build time.
base_path = "/agents-kit"

# Output directory for the static export
output = "out"

[components]
# One module per component page; the file name is the slug
dir = "components/blocks"

[build]
minify = true

[dev]
port = 7777
public_dir = "public"

[[routes]]
path = "/"
label = "Home"
order = 0
type = "core"
"#;

const SAMPLE_COMPONENT: &str = r#"export default function AgentCardBasic() {
  return (
    <div className="rounded-lg border p-4">
      <h3 className="font-medium">Research Agent</h3>
      <p className="text-sm text-muted-foreground">Searches the web and summarizes sources.</p>
    </div>
  )
}
"#;
