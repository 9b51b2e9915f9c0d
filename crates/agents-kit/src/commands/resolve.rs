//! Show which export a slug resolves to.

use anyhow::Result;
use agents_kit_catalog::{ComponentResolver, Manifest, ResolvedComponent};

use crate::config::ConfigFile;

/// Run the resolve command. Returns false when the slug has no page.
pub fn run(config: &ConfigFile, slug: &str) -> Result<bool> {
    let manifest = Manifest::from_directory(&config.components_dir());

    match ComponentResolver::new(&manifest).resolve(slug) {
        Ok(resolved) => {
            println!("{}", describe(&resolved));
            Ok(true)
        }
        Err(e) => {
            println!("{}: not found ({})", slug, e);
            Ok(false)
        }
    }
}

fn describe(resolved: &ResolvedComponent) -> String {
    format!(
        "{} -> {} [{}] ({})",
        resolved.slug,
        resolved.export,
        resolved.component.name(),
        resolved.rule
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ComponentsConfig;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(dir: &std::path::Path) -> ConfigFile {
        ConfigFile {
            components: ComponentsConfig {
                dir: dir.to_string_lossy().into_owned(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn resolves_known_slug() {
        let temp = tempdir().unwrap();
        fs::write(
            temp.path().join("agent-card.tsx"),
            "export function AgentCardComponent() { return null }\n",
        )
        .unwrap();

        let manifest = Manifest::from_directory(temp.path());
        let resolved = ComponentResolver::new(&manifest).resolve("agent-card").unwrap();

        assert!(describe(&resolved).starts_with("agent-card -> AgentCardComponent"));
        assert!(run(&config_for(temp.path()), "agent-card").unwrap());
    }

    #[test]
    fn unknown_slug_reports_not_found() {
        let temp = tempdir().unwrap();
        assert!(!run(&config_for(temp.path()), "missing").unwrap());
        assert!(!run(&config_for(temp.path()), "").unwrap());
    }
}
