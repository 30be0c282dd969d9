//! WD-style ONNX tagger: model session, inference and tag selection.

use std::path::{Path, PathBuf};

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::config::TaggingConfig;
use crate::error::{AnalysisError, AnalysisResult};

use super::labels::{LabelKind, LabelTable};
use super::preprocess::preprocess;
use super::Tagger;

/// The ONNX model filename inside a model's directory.
pub const MODEL_FILENAME: &str = "model.onnx";

/// The label table filename inside a model's directory.
pub const LABELS_FILENAME: &str = "selected_tags.csv";

/// Tags whose underscores are part of the tag, not word separators.
const KAOMOJI: &[&str] = &[
    "0_0", "(o)_(o)", "+_+", "+_-", "._.", "<o>_<o>", "<|>_<|>", "=_=", ">_<", "3_3", "6_9",
    ">_o", "@_@", "^_^", "o_o", "u_u", "x_x", "|_|", "||_||",
];

/// A loaded tagger model.
pub struct WdTagger {
    session: Session,
    input_name: String,
    labels: LabelTable,
    config: TaggingConfig,
}

impl WdTagger {
    /// Directory holding the configured model's files.
    pub fn model_path(model_dir: &Path, config: &TaggingConfig) -> PathBuf {
        model_dir.join(&config.model)
    }

    /// Check whether the model files exist on disk.
    pub fn model_exists(model_dir: &Path, config: &TaggingConfig) -> bool {
        let dir = Self::model_path(model_dir, config);
        dir.join(MODEL_FILENAME).is_file() && dir.join(LABELS_FILENAME).is_file()
    }

    /// Load the model and its label table.
    ///
    /// Expects `{model_dir}/{model}/model.onnx` and
    /// `{model_dir}/{model}/selected_tags.csv`; fails with `ModelNotFound`
    /// when either is missing.
    pub fn load(model_dir: &Path, config: &TaggingConfig) -> AnalysisResult<Self> {
        let dir = Self::model_path(model_dir, config);
        if !Self::model_exists(model_dir, config) {
            return Err(AnalysisError::ModelNotFound(dir));
        }
        let model_path = dir.join(MODEL_FILENAME);

        tracing::info!("Loading tagger model from {:?}", model_path);
        let session = Session::builder()
            .map_err(|e| {
                AnalysisError::tagging(&model_path, format!("Failed to create ONNX session builder: {e}"))
            })?
            .commit_from_file(&model_path)
            .map_err(|e| AnalysisError::tagging(&model_path, format!("Failed to load ONNX model: {e}")))?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .unwrap_or_else(|| "input_1:0".to_string());

        let labels = LabelTable::load(&dir.join(LABELS_FILENAME))?;
        tracing::info!(
            "Tagger model loaded ({} labels, input {:?})",
            labels.len(),
            input_name
        );

        Ok(Self {
            session,
            input_name,
            labels,
            config: config.clone(),
        })
    }

    /// Run the model on one preprocessed tensor and return per-label probabilities.
    fn infer(&mut self, tensor: &Array4<f32>, path: &Path) -> AnalysisResult<Vec<f32>> {
        let shape: Vec<i64> = tensor.shape().iter().map(|&d| d as i64).collect();
        let flat_data: Vec<f32> = tensor.iter().copied().collect();

        let input_value = Value::from_array((shape, flat_data))
            .map_err(|e| AnalysisError::tagging(path, format!("Failed to create input tensor: {e}")))?;

        let inputs = ort::inputs![self.input_name.as_str() => input_value];
        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| AnalysisError::tagging(path, format!("ONNX inference failed: {e}")))?;

        let (_, output) = outputs
            .iter()
            .next()
            .ok_or_else(|| AnalysisError::tagging(path, "Model produced no output"))?;
        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| AnalysisError::tagging(path, format!("Failed to extract output tensor: {e}")))?;

        if data.len() != self.labels.len() {
            return Err(AnalysisError::tagging(
                path,
                format!(
                    "Model produced {} scores for {} labels",
                    data.len(),
                    self.labels.len()
                ),
            ));
        }
        Ok(data.to_vec())
    }
}

impl Tagger for WdTagger {
    fn tag(&mut self, image: &Path) -> AnalysisResult<String> {
        let decoded = image::ImageReader::open(image)
            .and_then(|r| r.with_guessed_format())
            .map_err(|e| AnalysisError::tagging(image, e))?
            .decode()
            .map_err(|e| AnalysisError::tagging(image, format!("Decode error: {e}")))?;

        let tensor = preprocess(&decoded, self.config.image_size);
        let scores = self.infer(&tensor, image)?;
        Ok(select_tags(&scores, &self.labels, &self.config))
    }
}

/// Turn per-label probabilities into the raw tag string: labels above their
/// kind's threshold, most confident first, joined by `", "`.
pub fn select_tags(scores: &[f32], labels: &LabelTable, config: &TaggingConfig) -> String {
    let mut rating: Option<(usize, f32)> = None;
    let mut picked: Vec<(usize, f32)> = Vec::new();

    for (index, &score) in scores.iter().enumerate() {
        let Some(label) = labels.get(index) else {
            break;
        };
        match label.kind {
            LabelKind::Rating => {
                if rating.map_or(true, |(_, best)| score > best) {
                    rating = Some((index, score));
                }
            }
            LabelKind::General if score >= config.general_threshold => picked.push((index, score)),
            LabelKind::Character if score >= config.character_threshold => {
                picked.push((index, score))
            }
            _ => {}
        }
    }

    picked.sort_by(|a, b| b.1.total_cmp(&a.1));
    if config.include_rating {
        if let Some(top) = rating {
            picked.insert(0, top);
        }
    }

    picked
        .into_iter()
        .filter_map(|(index, _)| labels.get(index))
        .map(|label| display_name(&label.name, config))
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_name(name: &str, config: &TaggingConfig) -> String {
    let mut name = if config.replace_underscores && !KAOMOJI.contains(&name) {
        name.replace('_', " ")
    } else {
        name.to_string()
    };
    if config.escape_parentheses {
        name = name.replace('(', "\\(").replace(')', "\\)");
    }
    name
}
