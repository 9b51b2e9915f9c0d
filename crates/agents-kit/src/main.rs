//! agents-kit CLI - build and preview the agent UI component catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "agents-kit")]
#[command(about = "Build and preview the agent UI component catalog")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to agents-kit.toml config file
    #[arg(short, long, default_value = "agents-kit.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config file and a sample component
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// List the component pages the catalog would generate
    Routes {
        /// Print the route params as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show which export a slug resolves to
    Resolve {
        /// Component slug, e.g. agent-card-basic
        slug: String,
    },

    /// Start development server with hot reload
    Dev {
        /// Port to listen on (defaults to config or 7777)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Build the static catalog site
    Build {
        /// Output directory (defaults to config or "out")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Preview the built site
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to config or "out")
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Routes { json } => {
            let config = config::load_config(&cli.config)?;
            commands::routes::run(&config, json)?;
        }
        Commands::Resolve { slug } => {
            let config = config::load_config(&cli.config)?;
            if !commands::resolve::run(&config, &slug)? {
                std::process::exit(1);
            }
        }
        Commands::Dev { port, no_open } => {
            let config = config::load_config(&cli.config)?;
            commands::dev::run(&config, port, !no_open).await?;
        }
        Commands::Build { output, no_minify } => {
            let config = config::load_config(&cli.config)?;
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&config, output, minify).await?;
        }
        Commands::Serve { port, dir } => {
            let config = config::load_config(&cli.config)?;
            let dir = dir.unwrap_or_else(|| config.output_dir());
            commands::serve::run(port, dir, &config.base_path()).await?;
        }
    }

    Ok(())
}
