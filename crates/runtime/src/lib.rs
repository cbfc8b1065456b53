mod linear_classifier;
mod loader;
mod runtime;

#[cfg(test)]
mod tests;

pub use linear_classifier::{LinearArtifact, LinearClassifier, ARTIFACT_FORMAT, ARTIFACT_VERSION};
pub use loader::ModelLoader;
pub use runtime::{ModelRuntime, PredictorRegistry};

use intent_common::{ClassLabel, Error, Result, Vocabulary};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

/// Output of a classifier call.
///
/// The label is the answer; confidence and the score vector are kept for
/// logging and for the optional out-of-scope threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: ClassLabel,
    pub confidence: f32,
    pub scores: Vec<(ClassLabel, f32)>,
}

/// A pretrained text classifier
pub trait Predictor: Send + Sync + fmt::Debug {
    /// Classify one message
    fn predict(&self, text: &str) -> Result<Prediction>;

    /// Labels the model can emit, in model order
    fn labels(&self) -> &[ClassLabel];
}

/// Handle to a loaded classifier
#[derive(Debug, Clone)]
pub struct ModelHandle {
    pub model_id: Arc<str>,
    pub path: PathBuf,
    pub vocabulary: Vocabulary,
    pub loaded_at: SystemTime,
    oos_threshold: Option<f32>,
    predictor: Arc<dyn Predictor>,
}

impl ModelHandle {
    pub fn new(
        model_id: impl Into<Arc<str>>,
        path: PathBuf,
        vocabulary: Vocabulary,
        predictor: Arc<dyn Predictor>,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            path,
            vocabulary,
            loaded_at: SystemTime::now(),
            oos_threshold: None,
            predictor,
        }
    }

    /// Replace low-confidence answers with the out-of-scope label.
    ///
    /// Only meaningful for the out-of-scope vocabulary; ignored otherwise.
    pub fn with_oos_threshold(mut self, threshold: Option<f32>) -> Self {
        self.oos_threshold = threshold.filter(|_| self.vocabulary == Vocabulary::WithOos);
        self
    }

    /// Classify a message, guaranteeing the label belongs to this handle's vocabulary
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        let mut prediction = self.predictor.predict(text)?;

        if let Some(threshold) = self.oos_threshold {
            if prediction.confidence < threshold {
                prediction.label = ClassLabel::OOS;
            }
        }

        if !self.vocabulary.contains(prediction.label) {
            return Err(Error::PredictionFailed(format!(
                "model {} produced label '{}' outside its vocabulary",
                self.model_id, prediction.label
            )));
        }

        Ok(prediction)
    }

    pub fn labels(&self) -> &[ClassLabel] {
        self.predictor.labels()
    }
}
