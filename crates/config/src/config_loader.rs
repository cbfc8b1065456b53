use intent_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

const CONFIG_FILE_NAME: &str = "intent-server.json";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
}

/// Models configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub directory: PathBuf,
    #[serde(default)]
    pub registry_file: Option<PathBuf>,
    /// Minimum confidence for the OOS classifier to keep an in-scope label
    #[serde(default)]
    pub oos_threshold: Option<f32>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                static_dir: PathBuf::from("app/static"),
            },
            models: ModelsConfig {
                directory: PathBuf::from("app/models"),
                registry_file: None,
                oos_threshold: None,
            },
        }
    }
}

impl AppConfig {
    /// Reject values the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigError("server.host cannot be empty".into()));
        }
        if let Some(threshold) = self.models.oos_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::ConfigError(format!(
                    "models.oos_threshold must be between 0.0 and 1.0, got {}",
                    threshold
                )));
            }
        }
        Ok(())
    }
}

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&PathBuf>) -> Result<AppConfig> {
        if let Some(path) = path {
            if path.exists() {
                return Self::load_file(path);
            }
            warn!("Config file {} not found, falling back to defaults", path.display());
        }

        // Check default locations
        let default_paths = vec![
            PathBuf::from(CONFIG_FILE_NAME),
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("intent-server/config.json"),
        ];

        for path in default_paths {
            if path.exists() {
                return Self::load_file(&path);
            }
        }

        // Use defaults
        info!("No configuration file found, using defaults");
        Ok(AppConfig::default())
    }

    fn load_file(path: &PathBuf) -> Result<AppConfig> {
        info!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(config: &AppConfig, path: &PathBuf) -> Result<()> {
        let content = serde_json::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
