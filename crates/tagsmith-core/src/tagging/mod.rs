//! Image tagging models.
//!
//! The pipeline talks to a model through the [`Tagger`] trait, which returns a
//! raw `", "`-joined tag string per image in the model's ranking order.
//! [`WdTagger`] is the ONNX implementation; [`LazyTagger`] wraps it so the
//! model is loaded once, on first use, and then reused.

pub mod labels;
pub mod preprocess;
pub mod wd;

use std::path::{Path, PathBuf};

use crate::config::TaggingConfig;
use crate::error::AnalysisResult;

pub use labels::{Label, LabelKind, LabelTable};
pub use wd::WdTagger;

/// Produces a raw tag string for one image.
pub trait Tagger {
    /// Tag an image. The result is tags joined by `", "`, most confident first.
    fn tag(&mut self, image: &Path) -> AnalysisResult<String>;
}

impl<T: Tagger + ?Sized> Tagger for Box<T> {
    fn tag(&mut self, image: &Path) -> AnalysisResult<String> {
        (**self).tag(image)
    }
}

/// Model handle that loads the tagger on the first `tag` call and keeps it
/// for the rest of its lifetime.
pub struct LazyTagger {
    model_dir: PathBuf,
    config: TaggingConfig,
    model: Option<WdTagger>,
}

impl LazyTagger {
    /// Create an unloaded handle. Nothing is read from disk yet.
    pub fn new(model_dir: impl Into<PathBuf>, config: TaggingConfig) -> Self {
        Self {
            model_dir: model_dir.into(),
            config,
            model: None,
        }
    }

    /// Whether the model has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// Whether the model files are present, without loading them.
    pub fn model_exists(&self) -> bool {
        WdTagger::model_exists(&self.model_dir, &self.config)
    }

    /// Load the model now if it isn't loaded yet.
    pub fn ensure_loaded(&mut self) -> AnalysisResult<&mut WdTagger> {
        let model = match self.model.take() {
            Some(model) => model,
            None => WdTagger::load(&self.model_dir, &self.config)?,
        };
        Ok(self.model.insert(model))
    }
}

impl Tagger for LazyTagger {
    fn tag(&mut self, image: &Path) -> AnalysisResult<String> {
        self.ensure_loaded()?.tag(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    #[test]
    fn test_lazy_tagger_starts_unloaded() {
        let dir = tempfile::tempdir().unwrap();
        let tagger = LazyTagger::new(dir.path(), TaggingConfig::default());
        assert!(!tagger.is_loaded());
        assert!(!tagger.model_exists());
    }

    #[test]
    fn test_lazy_tagger_reports_missing_model_on_first_use() {
        let dir = tempfile::tempdir().unwrap();
        let mut tagger = LazyTagger::new(dir.path(), TaggingConfig::default());

        let err = tagger.tag(Path::new("a.jpg")).unwrap_err();
        assert!(matches!(err, AnalysisError::ModelNotFound(_)));
        assert!(!tagger.is_loaded());
    }

    struct Fixed(&'static str);

    impl Tagger for Fixed {
        fn tag(&mut self, _image: &Path) -> AnalysisResult<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_boxed_tagger_delegates() {
        let mut tagger: Box<dyn Tagger> = Box::new(Fixed("cat, dog"));
        assert_eq!(tagger.tag(Path::new("a.jpg")).unwrap(), "cat, dog");
    }
}
