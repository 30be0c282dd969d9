//! The `tagsmith analyze` command.

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tagsmith_core::{
    AnalysisOutcome, AnalysisRequest, Analyzer, CancelFlag, Config, LazyTagger,
    OutputFormat as CoreOutputFormat, OutputWriter,
};

use super::{terms, theme};

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Merged tags on one line, joined by ", "
    Text,
    /// Full result as JSON (per-image tags, cache status, timing)
    Json,
}

impl From<OutputFormat> for CoreOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => CoreOutputFormat::Text,
            OutputFormat::Json => CoreOutputFormat::Json,
        }
    }
}

/// Arguments for the `analyze` command.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Image file or directory to analyze
    #[arg(required = true)]
    pub path: String,

    /// Tags to put first on every image (comma-separated, repeatable)
    #[arg(short, long = "add", value_name = "TAGS")]
    pub add: Vec<String>,

    /// Tags to drop from the model output (comma-separated, repeatable)
    #[arg(short, long, value_name = "TAGS")]
    pub exclude: Vec<String>,

    /// Write <image>.txt with each image's tags
    #[arg(long, conflicts_with = "no_persist_tags")]
    pub persist_tags: bool,

    /// Don't write per-image tag files, even if enabled in config
    #[arg(long)]
    pub no_persist_tags: bool,

    /// Output format (defaults to output.format from config)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Result cache file (overrides general.cache_file)
    #[arg(long, env = "TAGSMITH_CACHE_FILE")]
    pub cache_file: Option<PathBuf>,

    /// Model directory (overrides general.model_dir)
    #[arg(long, env = "TAGSMITH_MODEL_DIR")]
    pub model_dir: Option<PathBuf>,

    /// Accept the terms of use without prompting
    #[arg(long)]
    pub accept_terms: bool,
}

impl AnalyzeArgs {
    /// Fold command-line overrides into the loaded configuration.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(dir) = &self.model_dir {
            config.general.model_dir = dir.clone();
        }
        if let Some(file) = &self.cache_file {
            config.general.cache_file = file.clone();
        }
        if self.persist_tags {
            config.output.persist_tags = true;
        }
        if self.no_persist_tags {
            config.output.persist_tags = false;
        }
    }

    fn output_format(&self, config: &Config) -> CoreOutputFormat {
        self.format
            .map(CoreOutputFormat::from)
            .or_else(|| CoreOutputFormat::parse(&config.output.format))
            .unwrap_or(CoreOutputFormat::Text)
    }
}

/// Execute the analyze command.
pub async fn execute(args: AnalyzeArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply_overrides(&mut config);

    if !terms::ensure_accepted(&config, args.accept_terms)? {
        eprintln!("Terms not accepted; exiting without analyzing.");
        return Ok(());
    }

    let request = AnalysisRequest::from_input(&args.path, &args.add.join(","), &args.exclude.join(","))?;

    let mut tagger = LazyTagger::new(config.model_dir(), config.tagging.clone());
    if !tagger.model_exists() {
        eprintln!(
            "  {}",
            theme::warn().apply_to(format!(
                "Tagger model not found under {}. Run `tagsmith models download`.",
                config.model_dir().display()
            ))
        );
    }

    let cancel = CancelFlag::new();
    let analyzer = Analyzer::new(&config).with_cancel_flag(cancel.clone());
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current image");
            cancel.cancel();
        }
    });

    let progress = create_progress_bar();
    let bar = progress.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        analyzer.analyze_with_progress(&request, &mut tagger, |p| {
            bar.set_length(p.total as u64);
            bar.set_position(p.done as u64);
            if let Some(name) = p.file.file_name() {
                bar.set_message(name.to_string_lossy().into_owned());
            }
        })
    })
    .await?;
    progress.finish_and_clear();
    let outcome = outcome?;

    let format = args.output_format(&config);
    match &args.output {
        Some(path) => {
            let file = File::create(path)?;
            write_outcome(BufWriter::new(file), format, args.pretty, &outcome)?;
            tracing::info!("Wrote tags to {}", path.display());
        }
        None => write_outcome(std::io::stdout().lock(), format, args.pretty, &outcome)?,
    }

    print_summary(&outcome, config.output.persist_tags);
    Ok(())
}

fn write_outcome<W: Write>(
    writer: W,
    format: CoreOutputFormat,
    pretty: bool,
    outcome: &AnalysisOutcome,
) -> std::io::Result<()> {
    let mut writer = OutputWriter::new(writer, format, pretty);
    writer.write(outcome)?;
    writer.flush()
}

/// Create a progress bar for the tagging loop. The length is set once the
/// image list is known.
fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
    pb.set_style(style);
    pb.set_message("loading model...");
    pb
}

/// Print a short run summary to stderr.
fn print_summary(outcome: &AnalysisOutcome, persist_tags: bool) {
    let dim = theme::dim();
    let source = if outcome.cache_hit {
        "cached image list"
    } else {
        "fresh scan"
    };

    eprintln!(
        "{} {} image(s), {} unique tag(s) in {:.1}s ({:.1} img/sec, {})",
        theme::ok().apply_to("✓"),
        outcome.stats.images,
        outcome.merged_tags.len(),
        outcome.stats.elapsed_ms as f64 / 1000.0,
        outcome.stats.rate(),
        source
    );
    if persist_tags {
        let written = outcome.images.len() - outcome.sidecar_failures.len();
        eprintln!("  {}", dim.apply_to(format!("{written} tag file(s) written")));
    }
    for failed in &outcome.sidecar_failures {
        eprintln!(
            "  {}",
            theme::warn().apply_to(format!("could not write tags for {}", failed.display()))
        );
    }
    if !outcome.cache_written {
        eprintln!(
            "  {}",
            theme::warn().apply_to("result cache not updated; the next run will rescan")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: AnalyzeArgs,
    }

    fn parse(argv: &[&str]) -> AnalyzeArgs {
        TestCli::parse_from(std::iter::once("tagsmith").chain(argv.iter().copied())).args
    }

    #[test]
    fn test_repeated_tag_flags_join_into_request() {
        let args = parse(&["shots", "--add", "a, b", "--add", "c", "-e", "dog"]);
        let request =
            AnalysisRequest::from_input(&args.path, &args.add.join(","), &args.exclude.join(","))
                .unwrap();
        assert_eq!(request.additional_tags(), ["a", "b", "c"]);
        assert!(request.exclude_tags().contains("dog"));
    }

    #[test]
    fn test_overrides_apply_to_config() {
        let args = parse(&[
            "shots",
            "--persist-tags",
            "--cache-file",
            "/tmp/x.json",
            "--model-dir",
            "/tmp/models",
        ]);
        let mut config = Config::default();
        args.apply_overrides(&mut config);
        assert!(config.output.persist_tags);
        assert_eq!(config.cache_file(), PathBuf::from("/tmp/x.json"));
        assert_eq!(config.model_dir(), PathBuf::from("/tmp/models"));
    }

    #[test]
    fn test_no_persist_overrides_config() {
        let args = parse(&["shots", "--no-persist-tags"]);
        let mut config = Config::default();
        config.output.persist_tags = true;
        args.apply_overrides(&mut config);
        assert!(!config.output.persist_tags);
    }

    #[test]
    fn test_persist_flags_conflict() {
        let result = TestCli::try_parse_from(["tagsmith", "shots", "--persist-tags", "--no-persist-tags"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_falls_back_to_config() {
        let args = parse(&["shots"]);
        let mut config = Config::default();
        assert_eq!(args.output_format(&config), CoreOutputFormat::Text);
        config.output.format = "json".to_string();
        assert_eq!(args.output_format(&config), CoreOutputFormat::Json);

        let args = parse(&["shots", "--format", "text"]);
        assert_eq!(args.output_format(&config), CoreOutputFormat::Text);
    }

    #[test]
    fn test_write_outcome_text() {
        let outcome = AnalysisOutcome {
            merged_tags: vec!["cat".into(), "tree".into()],
            images: vec![],
            cache_hit: false,
            cache_written: true,
            sidecar_failures: vec![],
            stats: Default::default(),
        };
        let mut buffer = Vec::new();
        write_outcome(&mut buffer, CoreOutputFormat::Text, false, &outcome).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "cat, tree\n");
    }
}
