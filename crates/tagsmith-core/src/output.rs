//! Output formatting for analysis results.
//!
//! Text output is the merged prompt line, ready to paste. JSON output carries
//! the whole outcome, including per-image tags and cache status.

use std::io::{self, Write};

use crate::types::AnalysisOutcome;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The merged tags joined by `", "`
    Text,
    /// The full outcome as a JSON object
    Json,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "prompt" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Writes analysis outcomes in the chosen format.
pub struct OutputWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> OutputWriter<W> {
    /// Create a new output writer.
    ///
    /// `pretty` only affects JSON output.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write one outcome followed by a newline.
    pub fn write(&mut self, outcome: &AnalysisOutcome) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => {
                self.writer.write_all(outcome.prompt().as_bytes())?;
            }
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, outcome)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, outcome).map_err(io::Error::other)?;
                }
            }
        }
        writeln!(self.writer)
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ImageTags, ProcessingStats};
    use std::path::PathBuf;

    fn outcome() -> AnalysisOutcome {
        AnalysisOutcome {
            merged_tags: vec!["cat".into(), "dog".into(), "tree".into()],
            images: vec![ImageTags {
                file: PathBuf::from("a.jpg"),
                tags: vec!["cat".into(), "dog".into()],
            }],
            cache_hit: false,
            cache_written: true,
            sidecar_failures: vec![],
            stats: ProcessingStats::default(),
        }
    }

    #[test]
    fn test_write_text() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Text, false);
        writer.write(&outcome()).unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "cat, dog, tree\n");
    }

    #[test]
    fn test_write_json() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, false);
        writer.write(&outcome()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["merged_tags"][2], "tree");
        assert_eq!(value["images"][0]["file"], "a.jpg");
        assert_eq!(value["cache_hit"], false);
    }

    #[test]
    fn test_write_pretty_json_is_multiline() {
        let mut buffer = Vec::new();
        let mut writer = OutputWriter::new(&mut buffer, OutputFormat::Json, true);
        writer.write(&outcome()).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert!(output.lines().count() > 3);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("TEXT"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("prompt"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }
}
