//! Tagsmith CLI - run an image tagger over a folder and merge the tags.
//!
//! Tagsmith tags every image under a path, filters the tags with user
//! include/exclude lists and prints one deduplicated tag line. The image list
//! of the last run is cached, so re-running on the same path skips the scan.
//!
//! # Usage
//!
//! ```bash
//! # Tag a directory and print the merged tags
//! tagsmith analyze ./dataset --add "masterpiece" --exclude "watermark"
//!
//! # Also write <image>.txt next to every image
//! tagsmith analyze ./dataset --persist-tags
//!
//! # Fetch the tagger model
//! tagsmith models download
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Tagsmith - merge image-tagger output across a folder into one tag list.
#[derive(Parser, Debug)]
#[command(name = "tagsmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag images and print the merged tag list
    Analyze(cli::analyze::AnalyzeArgs),

    /// Manage tagger models (download, list, path)
    Models(cli::models::ModelsArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),

    /// Inspect or clear the result cache
    Cache(cli::cache::CacheArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so use eprintln for config warnings.
    let config = match tagsmith_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `tagsmith config path`."
            );
            tagsmith_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Tagsmith v{}", tagsmith_core::VERSION);

    match cli.command {
        Commands::Analyze(args) => cli::analyze::execute(args, config).await,
        Commands::Models(args) => cli::models::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
        Commands::Cache(args) => cli::cache::execute(args, config).await,
    }
}
