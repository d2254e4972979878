//! Sitepack CLI - builds the static download site for the Android app.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "sitepack")]
#[command(about = "Prepares static download-site assets for deployment")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to sitepack.toml config file
    #[arg(short, long, default_value = "sitepack.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default sitepack.toml
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        yes: bool,
    },

    /// Build the deployment assets
    Build {
        /// Output directory (defaults to config or "build")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Artifact URL (defaults to config)
        #[arg(long)]
        url: Option<String>,
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
            commands::init::run(&cli.config, yes)?;
        }
        Commands::Build { output, url } => {
            commands::build::run(&cli.config, output, url).await?;
        }
    }

    Ok(())
}
