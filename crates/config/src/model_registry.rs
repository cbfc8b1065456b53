use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use intent_common::{Error, PredictorKind, Result, Vocabulary};
use crate::AppConfig;

/// Descriptor of one classifier artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Artifact file name, relative to the model directory
    pub path: String,
    /// Which endpoint the model serves
    pub kind: PredictorKind,
    /// Labels the artifact is allowed to declare
    pub vocabulary: Vocabulary,
}

/// Serialized registry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelRegistryData {
    pub version: String,
    pub models: Vec<ModelConfig>,
}

/// Registry of the classifier artifacts loaded at startup
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    models: HashMap<String, ModelConfig>,
    by_kind: HashMap<PredictorKind, String>,
    model_dir: PathBuf,
}

impl ModelRegistry {
    /// Load registry from JSON file
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_json(&content)
    }

    /// Load registry from JSON string
    pub fn load_from_json(json: &str) -> Result<Self> {
        let data: ModelRegistryData = serde_json::from_str(json)?;
        Self::from_data(data)
    }

    /// Load default registry with the built-in artifact names
    pub fn load_defaults() -> Result<Self> {
        let json = include_str!("default_registry.json");
        Self::load_from_json(json)
    }

    /// Resolve the registry named by the configuration, rooted at its model directory
    pub fn for_config(config: &AppConfig) -> Result<Self> {
        let mut registry = match &config.models.registry_file {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_defaults()?,
        };
        registry.set_model_dir(config.models.directory.clone());
        Ok(registry)
    }

    fn from_data(data: ModelRegistryData) -> Result<Self> {
        let mut models = HashMap::new();
        let mut by_kind = HashMap::new();

        for model in data.models {
            if model.vocabulary != model.kind.vocabulary() {
                return Err(Error::ConfigError(format!(
                    "Model {} serves the {} endpoint but declares the {:?} vocabulary",
                    model.id, model.kind, model.vocabulary
                )));
            }
            if by_kind.insert(model.kind, model.id.clone()).is_some() {
                return Err(Error::ConfigError(format!(
                    "Multiple {} models specified",
                    model.kind
                )));
            }
            if models.insert(model.id.clone(), model).is_some() {
                return Err(Error::ConfigError("Duplicate model id in registry".into()));
            }
        }

        for kind in [PredictorKind::Primary, PredictorKind::Oos] {
            if !by_kind.contains_key(&kind) {
                return Err(Error::ConfigError(format!("No {} model configured", kind)));
            }
        }

        Ok(Self {
            models,
            by_kind,
            model_dir: PathBuf::from("app/models"),
        })
    }

    /// Get a model by ID
    pub fn get_model(&self, id: &str) -> Result<&ModelConfig> {
        self.models
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("Model {}", id)))
    }

    /// Get the model serving an endpoint
    pub fn get_by_kind(&self, kind: PredictorKind) -> Result<&ModelConfig> {
        let id = self.by_kind
            .get(&kind)
            .ok_or_else(|| Error::ConfigError(format!("No {} model configured", kind)))?;
        self.get_model(id)
    }

    /// Get the full path to a model file
    pub fn get_model_path(&self, model_id: &str) -> Result<PathBuf> {
        let model = self.get_model(model_id)?;
        Ok(self.model_dir.join(&model.path))
    }

    pub fn model_dir(&self) -> &PathBuf {
        &self.model_dir
    }

    /// Set model directory
    pub fn set_model_dir(&mut self, dir: PathBuf) {
        self.model_dir = dir;
    }

    /// List all model IDs
    pub fn list_models(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.models.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Export registry to JSON
    pub fn export(&self) -> Result<String> {
        let mut models: Vec<ModelConfig> = self.models.values().cloned().collect();
        models.sort_by(|a, b| a.id.cmp(&b.id));
        let data = ModelRegistryData {
            version: "1.0".to_string(),
            models,
        };

        serde_json::to_string_pretty(&data)
            .map_err(Error::Serialization)
    }
}
