//! The `tagsmith cache` command for inspecting the result cache.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use tagsmith_core::pipeline::{dedup_first_occurrence, TAG_DELIMITER};
use tagsmith_core::{CacheRecord, Config, ResultCache};

use super::theme;

/// Arguments for the `cache` command.
#[derive(Args, Debug)]
pub struct CacheArgs {
    /// Result cache file (overrides general.cache_file)
    #[arg(long, global = true, env = "TAGSMITH_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Subcommands for the result cache.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Summarize the last stored run
    Show {
        /// Print the raw record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete the cache file so the next run rescans
    Clear,

    /// Show cache file path
    Path,
}

/// Execute the cache command.
pub async fn execute(args: CacheArgs, config: Config) -> anyhow::Result<()> {
    let path = args.cache_file.unwrap_or_else(|| config.cache_file());
    let cache = ResultCache::new(path);

    match args.command {
        CacheCommand::Show { json } => {
            let Some(record) = cache.load() else {
                println!("No cached run at {}.", cache.path().display());
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", summarize(&record));
            }
        }

        CacheCommand::Clear => {
            if cache.clear()? {
                tracing::info!("Removed {}", cache.path().display());
                eprintln!("{} Cache cleared", theme::ok().apply_to("✓"));
            } else {
                eprintln!(
                    "  {}",
                    theme::dim().apply_to(format!("Nothing to clear at {}", cache.path().display()))
                );
            }
        }

        CacheCommand::Path => {
            println!("{}", cache.path().display());
        }
    }

    Ok(())
}

/// Human-readable summary of a record: the request path, image count and the
/// merged tag line the run produced.
fn summarize(record: &CacheRecord) -> String {
    let merged = dedup_first_occurrence(&record.all_tags_list);
    format!(
        "Path:   {}\nImages: {}\nTags:   {} ({} unique)\n\n{}\n",
        record.path_input,
        record.image_files.len(),
        record.all_tags_list.len(),
        merged.len(),
        merged.join(TAG_DELIMITER)
    )
}
