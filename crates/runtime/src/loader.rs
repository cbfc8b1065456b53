use crate::linear_classifier::{LinearArtifact, LinearClassifier};
use crate::{ModelHandle, Predictor};
use intent_common::{Error, Result, Vocabulary};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Reads classifier artifacts from disk
pub struct ModelLoader;

impl ModelLoader {
    /// Load one artifact into a handle.
    ///
    /// A missing, unreadable, unparseable or incompatible artifact is a
    /// `ModelLoadFailed` error.
    pub fn load(model_id: &str, path: &Path, vocabulary: Vocabulary) -> Result<ModelHandle> {
        info!("Loading model {} from {}", model_id, path.display());

        let content = std::fs::read(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::ModelLoadFailed(format!(
                "artifact for {} not found at {}",
                model_id,
                path.display()
            )),
            _ => Error::ModelLoadFailed(format!(
                "cannot read artifact {}: {}",
                path.display(),
                e
            )),
        })?;

        let artifact: LinearArtifact = serde_json::from_slice(&content).map_err(|e| {
            Error::ModelLoadFailed(format!("corrupt artifact {}: {}", path.display(), e))
        })?;

        let classifier = LinearClassifier::from_artifact(artifact, vocabulary)?;
        debug!(
            "Model {} declares {} labels",
            model_id,
            classifier.labels().len()
        );

        Ok(ModelHandle::new(
            model_id,
            path.to_path_buf(),
            vocabulary,
            Arc::new(classifier),
        ))
    }
}
