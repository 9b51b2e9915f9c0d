//! Preview server command.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

use agents_kit_catalog::normalize_base_path;

/// Run the serve command.
pub async fn run(port: u16, dir: PathBuf, base_path: &str) -> Result<()> {
    if !dir.exists() {
        anyhow::bail!(
            "Directory not found: {}. Run 'agents-kit build' first.",
            dir.display()
        );
    }

    let addr: SocketAddr = format!("127.0.0.1:{}", port)
        .parse()
        .context("Invalid address")?;

    tracing::info!("Serving {} at http://{}", dir.display(), addr);

    let base = normalize_base_path(base_path);
    let app = router(&dir, &base);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    let url = format!("http://{}{}/", addr, base);
    if let Err(e) = open::that(&url) {
        tracing::warn!("Failed to open browser: {}", e);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve `dir` under the base path. Unknown paths get the exported
/// not-found page, like the static host.
fn router(dir: &Path, base_path: &str) -> Router {
    let not_found = dir.join("404.html");
    let files = ServeDir::new(dir).not_found_service(ServeFile::new(&not_found));

    let base = normalize_base_path(base_path);
    if base.is_empty() {
        Router::new().fallback_service(files)
    } else {
        Router::new()
            .nest_service(&base, files)
            .fallback_service(ServeFile::new(not_found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mounts_under_relative_base_path() {
        let temp = tempdir().unwrap();

        // Neither form may panic when the router is built
        let _rooted = router(temp.path(), "agents-kit");
        let _trailing = router(temp.path(), "/agents-kit/");
        let _root = router(temp.path(), "/");
    }
}
