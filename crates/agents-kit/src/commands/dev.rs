//! Development server command.

use anyhow::Result;
use agents_kit_server::DevServer;

use crate::config::ConfigFile;

/// Run the dev server.
pub async fn run(config: &ConfigFile, port: Option<u16>, open: bool) -> Result<()> {
    let server_config = config.dev_config(port, open);

    tracing::info!("Starting development server on port {}", server_config.port);

    DevServer::new(server_config).start().await?;

    Ok(())
}
