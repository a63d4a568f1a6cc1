mod listings;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "puller-cli")]
#[command(about = "Shopping listing search and normalization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a live shopping search and print the normalized listings as JSON
    Search {
        /// Search text sent to the provider
        query: String,

        /// Print listings in provider order instead of deferring fallback links
        #[arg(long)]
        unordered: bool,
    },
    /// Normalize a saved provider response and print prioritized listings
    Normalize {
        /// Path to a JSON response body
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = puller_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let products = match cli.command {
        Commands::Search { query, unordered } => {
            listings::search(&config, &query, unordered).await?
        }
        Commands::Normalize { file } => listings::normalize_file(&file)?,
    };

    println!("{}", serde_json::to_string_pretty(&products)?);
    Ok(())
}
