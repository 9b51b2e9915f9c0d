//! Site paths under a deployment base path.
//!
//! The site can be deployed at the domain root or under a sub-path (GitHub
//! Pages serves it from `/agents-kit`). Every link and asset URL goes through
//! these helpers.

/// Environment variable overriding the configured base path.
pub const BASE_PATH_ENV: &str = "AGENTS_KIT_BASE_PATH";

/// Prefix a site-relative path with the base path.
///
/// `asset_path("/agents-kit", "/image.png")` is `/agents-kit/image.png`;
/// with an empty base path the path comes back rooted but otherwise
/// unchanged.
pub fn asset_path(base_path: &str, path: &str) -> String {
    let base = base_path.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if base.is_empty() {
        format!("/{}", path)
    } else if base.starts_with('/') {
        format!("{}/{}", base, path)
    } else {
        format!("/{}/{}", base, path)
    }
}

/// URL of the component page for a slug.
pub fn page_path(base_path: &str, slug: &str) -> String {
    asset_path(base_path, &format!("/c/{}/", slug))
}

/// Normalize a base path to `/segment` form: one leading slash, no
/// trailing slash, empty for the domain root.
pub fn normalize_base_path(base_path: &str) -> String {
    let trimmed = base_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Resolve the effective base path: the environment override when set,
/// otherwise the configured value. The result is normalized.
pub fn base_path_from_env(configured: &str) -> String {
    match std::env::var(BASE_PATH_ENV) {
        Ok(value) => {
            tracing::debug!("Using base path from {}: {}", BASE_PATH_ENV, value);
            normalize_base_path(&value)
        }
        Err(_) => normalize_base_path(configured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_base_path() {
        assert_eq!(normalize_base_path("agents-kit"), "/agents-kit");
        assert_eq!(normalize_base_path("/agents-kit/"), "/agents-kit");
        assert_eq!(normalize_base_path("docs/agents-kit"), "/docs/agents-kit");
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
    }

    #[test]
    fn prefixes_base_path() {
        assert_eq!(asset_path("/agents-kit", "/openai_logo.png"), "/agents-kit/openai_logo.png");
        assert_eq!(asset_path("/agents-kit/", "openai_logo.png"), "/agents-kit/openai_logo.png");
        assert_eq!(asset_path("agents-kit", "/a.css"), "/agents-kit/a.css");
    }

    #[test]
    fn empty_base_path_keeps_path() {
        assert_eq!(asset_path("", "/image.png"), "/image.png");
        assert_eq!(asset_path("/", "/image.png"), "/image.png");
        assert_eq!(asset_path("", ""), "/");
    }

    #[test]
    fn builds_page_paths() {
        assert_eq!(page_path("", "agent-card"), "/c/agent-card/");
        assert_eq!(page_path("/agents-kit", "agent-card"), "/agents-kit/c/agent-card/");
    }
}
