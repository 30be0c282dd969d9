//! The `tagsmith models` command for managing tagger models.

use clap::{Args, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tagsmith_core::tagging::wd::{LABELS_FILENAME, MODEL_FILENAME};
use tagsmith_core::{Config, WdTagger};

use super::theme;

/// Arguments for the `models` command.
#[derive(Args, Debug)]
pub struct ModelsArgs {
    #[command(subcommand)]
    pub command: ModelsCommand,
}

/// Subcommands for model management.
#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// Download a tagger model (defaults to tagging.model from config)
    Download {
        /// Model name, e.g. wd-v1-4-convnext-tagger-v2
        #[arg(short, long)]
        model: Option<String>,

        /// Re-download files that already exist
        #[arg(long)]
        force: bool,
    },

    /// List known models and their install status
    List,

    /// Show model directory path
    Path,
}

/// Tagger models published on Hugging Face with the WD14 layout.
const KNOWN_MODELS: &[(&str, &str)] = &[
    ("wd-v1-4-moat-tagger-v2", "SmilingWolf/wd-v1-4-moat-tagger-v2"),
    ("wd-v1-4-convnext-tagger-v2", "SmilingWolf/wd-v1-4-convnext-tagger-v2"),
    ("wd-v1-4-convnextv2-tagger-v2", "SmilingWolf/wd-v1-4-convnextv2-tagger-v2"),
    ("wd-v1-4-swinv2-tagger-v2", "SmilingWolf/wd-v1-4-swinv2-tagger-v2"),
    ("wd-v1-4-vit-tagger-v2", "SmilingWolf/wd-v1-4-vit-tagger-v2"),
    ("wd-swinv2-tagger-v3", "SmilingWolf/wd-swinv2-tagger-v3"),
    ("wd-vit-tagger-v3", "SmilingWolf/wd-vit-tagger-v3"),
    ("wd-convnext-tagger-v3", "SmilingWolf/wd-convnext-tagger-v3"),
];

/// Files every model needs.
const MODEL_FILES: &[&str] = &[MODEL_FILENAME, LABELS_FILENAME];

/// Resolve a model name to its Hugging Face repository.
///
/// Names containing a `/` are taken as a repository id as-is.
fn repo_for(model: &str) -> Option<String> {
    if model.contains('/') {
        return Some(model.to_string());
    }
    KNOWN_MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, repo)| repo.to_string())
}

/// Local directory name for a model. Repository ids keep only the last segment.
fn local_name(model: &str) -> &str {
    model.rsplit('/').next().unwrap_or(model)
}

fn file_url(repo: &str, file: &str) -> String {
    format!("https://huggingface.co/{repo}/resolve/main/{file}")
}

/// Execute the models command.
pub async fn execute(args: ModelsArgs, config: Config) -> anyhow::Result<()> {
    match args.command {
        ModelsCommand::Download { model, force } => {
            let model = model.unwrap_or_else(|| config.tagging.model.clone());
            let Some(repo) = repo_for(&model) else {
                anyhow::bail!(
                    "Unknown model '{model}'. Run `tagsmith models list` for known names, \
                     or pass a Hugging Face repository id (owner/name)."
                );
            };

            let dest_dir = config.model_dir().join(local_name(&model));
            std::fs::create_dir_all(&dest_dir)?;
            let client = reqwest::Client::new();

            for file in MODEL_FILES {
                let dest = dest_dir.join(file);
                if dest.exists() && !force {
                    tracing::info!("{} already exists at {:?}", file, dest);
                    continue;
                }

                let url = file_url(&repo, file);
                tracing::info!("Downloading {}...", file);
                tracing::info!("  Source: {}", url);
                tracing::info!("  Destination: {:?}", dest);

                download_file(&client, &url, &dest).await?;

                let file_size = std::fs::metadata(&dest)?.len();
                tracing::info!(
                    "  {} complete ({:.1} MB)",
                    file,
                    file_size as f64 / (1024.0 * 1024.0)
                );
            }

            if local_name(&model) != config.tagging.model {
                eprintln!(
                    "  {}",
                    theme::dim().apply_to(format!(
                        "To use it: tagsmith config set tagging.model {}",
                        local_name(&model)
                    ))
                );
            }
            tracing::info!("All downloads complete.");
        }

        ModelsCommand::List => {
            let model_dir = config.model_dir();
            println!("Tagger models:");
            println!("  Directory: {}\n", model_dir.display());

            for (name, _) in KNOWN_MODELS {
                let mut tagging = config.tagging.clone();
                tagging.model = name.to_string();
                let status = if WdTagger::model_exists(&model_dir, &tagging) {
                    theme::ok().apply_to(format!("{:14}", "ready"))
                } else {
                    theme::dim().apply_to(format!("{:14}", "not installed"))
                };
                let default_marker = if *name == config.tagging.model {
                    "  (configured)"
                } else {
                    ""
                };
                println!("    - {:32} {}{}", name, status, default_marker);
            }

            if !KNOWN_MODELS.iter().any(|(name, _)| *name == config.tagging.model) {
                let status = if WdTagger::model_exists(&model_dir, &config.tagging) {
                    "ready"
                } else {
                    "not installed"
                };
                println!(
                    "    - {:32} {:14}  (configured)",
                    config.tagging.model, status
                );
            }
        }

        ModelsCommand::Path => {
            println!("{}", config.model_dir().display());
        }
    }

    Ok(())
}

/// Download a file from a URL to a local path, streaming to disk.
///
/// Data goes to `<dest>.part` first and is renamed once complete, so an
/// interrupted download never looks like an installed model.
async fn download_file(client: &reqwest::Client, url: &str, dest: &Path) -> anyhow::Result<()> {
    use futures_util::StreamExt;
    use tokio::io::AsyncWriteExt;

    let response = client
        .get(url)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| anyhow::anyhow!("Download failed: {e}"))?;

    let progress = match response.content_length() {
        Some(size) => {
            let pb = ProgressBar::new(size);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("##-");
            pb.set_style(style);
            pb
        }
        None => ProgressBar::new_spinner(),
    };

    let partial = dest.with_extension("part");
    let mut file = tokio::fs::File::create(&partial).await?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                progress.abandon();
                drop(file);
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e.into());
            }
        };
        file.write_all(&chunk).await?;
        progress.inc(chunk.len() as u64);
    }

    file.flush().await?;
    drop(file);
    tokio::fs::rename(&partial, dest).await?;
    progress.finish_and_clear();

    Ok(())
}
