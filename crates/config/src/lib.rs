mod config_loader;
mod model_registry;

#[cfg(test)]
mod tests;

pub use config_loader::{AppConfig, ConfigLoader, ModelsConfig, ServerConfig};
pub use model_registry::{ModelConfig, ModelRegistry, ModelRegistryData};
