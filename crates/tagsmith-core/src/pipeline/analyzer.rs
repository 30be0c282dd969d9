//! Analysis orchestration - wires together cache, discovery, tagging and merging.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::cache::ResultCache;
use crate::config::Config;
use crate::error::{AnalysisError, AnalysisResult};
use crate::request::AnalysisRequest;
use crate::tagging::Tagger;
use crate::types::{AnalysisOutcome, ImageTags, ProcessingStats, Progress};

use super::discovery::FileDiscovery;
use super::filter::{dedup_first_occurrence, filter_tags};
use super::sidecar::write_sidecar;

/// Options for controlling analysis behavior.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOptions {
    /// Write each image's final tags to `<image-stem>.txt`
    pub persist_tags: bool,
}

/// Shared flag for stopping a run between images.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop before its next image.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runs an analysis request from image list to merged tags.
///
/// Images are tagged one at a time, in list order. The result cache is read
/// once at the start and written once at the end; a run that fails or is
/// cancelled leaves the previous cache untouched.
pub struct Analyzer {
    discovery: FileDiscovery,
    cache: ResultCache,
    options: AnalysisOptions,
    cancel: Option<CancelFlag>,
}

impl Analyzer {
    /// Create an analyzer from the application configuration.
    pub fn new(config: &Config) -> Self {
        Self::with_parts(
            FileDiscovery::new(config.discovery.clone()),
            ResultCache::new(config.cache_file()),
            AnalysisOptions {
                persist_tags: config.output.persist_tags,
            },
        )
    }

    /// Create an analyzer from explicit components.
    pub fn with_parts(discovery: FileDiscovery, cache: ResultCache, options: AnalysisOptions) -> Self {
        Self {
            discovery,
            cache,
            options,
            cancel: None,
        }
    }

    /// Check `flag` before each image and abort once it is set.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Override whether sidecar files are written.
    pub fn set_persist_tags(&mut self, persist_tags: bool) {
        self.options.persist_tags = persist_tags;
    }

    /// The result cache this analyzer reads and writes.
    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Analyze every image for `request` and return the merged tags.
    pub fn analyze<T: Tagger + ?Sized>(
        &self,
        request: &AnalysisRequest,
        tagger: &mut T,
    ) -> AnalysisResult<AnalysisOutcome> {
        self.analyze_with_progress(request, tagger, |_| {})
    }

    /// Like [`analyze`](Self::analyze), calling `on_progress` after each image.
    pub fn analyze_with_progress<T, F>(
        &self,
        request: &AnalysisRequest,
        tagger: &mut T,
        mut on_progress: F,
    ) -> AnalysisResult<AnalysisOutcome>
    where
        T: Tagger + ?Sized,
        F: FnMut(Progress<'_>),
    {
        let start = Instant::now();
        let (files, cache_hit) = self.resolve_files(request)?;
        let total = files.len();
        tracing::info!("Analyzing {} image(s) from {:?}", total, request.path());

        let mut images = Vec::with_capacity(total);
        let mut all_tags: Vec<String> = Vec::new();
        let mut sidecar_failures = Vec::new();
        let mut tagging_time = std::time::Duration::ZERO;

        for (index, file) in files.iter().enumerate() {
            if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
                tracing::warn!("Analysis cancelled after {}/{} images", index, total);
                return Err(AnalysisError::Cancelled {
                    processed: index,
                    total,
                });
            }

            let tag_start = Instant::now();
            let raw = tagger.tag(file)?;
            tagging_time += tag_start.elapsed();

            let tags = filter_tags(&raw, request.additional_tags(), request.exclude_tags());
            tracing::debug!("{:?}: {}", file, tags.join(", "));

            if self.options.persist_tags {
                if let Err(e) = write_sidecar(file, &tags) {
                    tracing::warn!("Could not write tags for {:?}: {}", file, e);
                    sidecar_failures.push(file.clone());
                }
            }

            all_tags.extend(tags.iter().cloned());
            images.push(ImageTags {
                file: file.clone(),
                tags,
            });

            tracing::info!("Processing {}/{}", index + 1, total);
            on_progress(Progress {
                done: index + 1,
                total,
                file,
            });
        }

        let merged_tags = dedup_first_occurrence(&all_tags);

        let cache_written = match self.cache.store(request.path(), &files, &all_tags) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Could not update result cache {:?}: {}", self.cache.path(), e);
                false
            }
        };

        let stats = ProcessingStats {
            images: total,
            elapsed_ms: start.elapsed().as_millis() as u64,
            tagging_ms: tagging_time.as_millis() as u64,
        };
        tracing::info!(
            "Analyzed {} image(s) in {}ms, {} unique tag(s)",
            total,
            stats.elapsed_ms,
            merged_tags.len()
        );

        Ok(AnalysisOutcome {
            merged_tags,
            images,
            cache_hit,
            cache_written,
            sidecar_failures,
            stats,
        })
    }

    /// Pick the image list: the cached one if it was stored for this exact
    /// path and is non-empty, otherwise a fresh enumeration.
    fn resolve_files(&self, request: &AnalysisRequest) -> AnalysisResult<(Vec<PathBuf>, bool)> {
        let path = Path::new(request.path());

        if let Some(files) = self.cache.try_reuse(request.path()) {
            if !files.is_empty() {
                tracing::info!("Reusing previous analysis of {:?}", path);
                return Ok((files, true));
            }
            tracing::debug!("Cached image list for {:?} is empty, enumerating", path);
        }

        let files = self.discovery.enumerate(path)?;
        if files.is_empty() {
            return Err(AnalysisError::NoImagesFound(path.to_path_buf()));
        }
        Ok((files, false))
    }
}
