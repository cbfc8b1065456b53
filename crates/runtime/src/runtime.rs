use crate::{ModelHandle, ModelLoader};
use intent_common::{Error, PredictorKind, Result};
use intent_config::{AppConfig, ModelRegistry};
use std::sync::Arc;
use tracing::info;

/// The two classifiers the server answers with.
///
/// Built once before the listener binds and never mutated afterwards, so it
/// is shared across request tasks behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct PredictorRegistry {
    primary: ModelHandle,
    oos: ModelHandle,
}

impl PredictorRegistry {
    pub fn new(primary: ModelHandle, oos: ModelHandle) -> Self {
        Self { primary, oos }
    }

    /// Classifier over in-scope intents
    pub fn primary(&self) -> &ModelHandle {
        &self.primary
    }

    /// Classifier that may also answer out-of-scope
    pub fn oos(&self) -> &ModelHandle {
        &self.oos
    }

    pub fn get(&self, kind: PredictorKind) -> &ModelHandle {
        match kind {
            PredictorKind::Primary => &self.primary,
            PredictorKind::Oos => &self.oos,
        }
    }

    pub fn len(&self) -> usize {
        2
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    /// Load both artifacts synchronously
    pub fn load(config: &AppConfig, registry: &ModelRegistry) -> Result<Self> {
        let primary = Self::load_kind(registry, PredictorKind::Primary)?;
        let oos = Self::load_kind(registry, PredictorKind::Oos)?
            .with_oos_threshold(config.models.oos_threshold);
        Ok(Self::new(primary, oos))
    }

    fn load_kind(registry: &ModelRegistry, kind: PredictorKind) -> Result<ModelHandle> {
        let model = registry.get_by_kind(kind)?;
        let path = registry.get_model_path(&model.id)?;
        ModelLoader::load(&model.id, &path, model.vocabulary)
    }
}

/// Factory for the predictor registry
pub struct ModelRuntime;

impl ModelRuntime {
    /// Load both classifiers off the async executor.
    ///
    /// Resolves only once both artifacts are in memory; the caller must not
    /// accept traffic before then.
    pub async fn create(config: &AppConfig, registry: &ModelRegistry) -> Result<Arc<PredictorRegistry>> {
        let config = config.clone();
        let registry = registry.clone();

        let predictors = tokio::task::spawn_blocking(move || PredictorRegistry::load(&config, &registry))
            .await
            .map_err(|e| Error::Internal(format!("model loading task failed: {}", e)))??;

        info!(
            "Loaded models: primary={} oos={}",
            predictors.primary().model_id,
            predictors.oos().model_id
        );

        Ok(Arc::new(predictors))
    }
}
