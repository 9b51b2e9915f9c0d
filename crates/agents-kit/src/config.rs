//! Configuration file (agents-kit.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use agents_kit_catalog::{base_path_from_env, Route};
use agents_kit_server::DevServerConfig;
use agents_kit_static::builder::DEFAULT_DESCRIPTION;
use agents_kit_static::BuildConfig;

/// Configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub components: ComponentsConfig,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub dev: DevSettings,
    /// Extra navigation entries
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_description")]
    pub description: String,
    /// Sub-path the site is deployed under
    #[serde(default)]
    pub base_path: String,
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: default_description(),
            base_path: String::new(),
            output: default_output(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ComponentsConfig {
    #[serde(default = "default_components_dir")]
    pub dir: String,
}

impl Default for ComponentsConfig {
    fn default() -> Self {
        Self {
            dir: default_components_dir(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_minify")]
    pub minify: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            minify: default_minify(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DevSettings {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_public_dir")]
    pub public_dir: String,
}

impl Default for DevSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            public_dir: default_public_dir(),
        }
    }
}

fn default_title() -> String {
    "agents-ui-kit".to_string()
}
fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}
fn default_output() -> String {
    "out".to_string()
}
fn default_components_dir() -> String {
    "components/blocks".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_port() -> u16 {
    7777
}
fn default_public_dir() -> String {
    "public".to_string()
}

/// Load configuration if the file exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}

impl ConfigFile {
    pub fn components_dir(&self) -> PathBuf {
        PathBuf::from(&self.components.dir)
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.site.output)
    }

    /// Base path with the environment override applied.
    pub fn base_path(&self) -> String {
        base_path_from_env(&self.site.base_path)
    }

    /// Settings for a static build; arguments override the file.
    pub fn build_config(&self, output: Option<PathBuf>, minify: Option<bool>) -> BuildConfig {
        BuildConfig {
            components_dir: self.components_dir(),
            output_dir: output.unwrap_or_else(|| self.output_dir()),
            base_path: self.base_path(),
            title: self.site.title.clone(),
            description: self.site.description.clone(),
            minify: minify.unwrap_or(self.build.minify),
            routes: self.routes.clone(),
        }
    }

    /// Settings for the dev server; arguments override the file.
    pub fn dev_config(&self, port: Option<u16>, open: bool) -> DevServerConfig {
        DevServerConfig {
            components_dir: self.components_dir(),
            public_dir: PathBuf::from(&self.dev.public_dir),
            port: port.unwrap_or(self.dev.port),
            open,
            base_path: self.base_path(),
            title: self.site.title.clone(),
            description: self.site.description.clone(),
            routes: self.routes.clone(),
            ..Default::default()
        }
    }
}
