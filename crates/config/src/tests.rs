#[cfg(test)]
mod tests {
    use crate::config_loader::*;
    use crate::model_registry::*;
    use intent_common::{Error, PredictorKind, Result, Vocabulary};
    use std::path::PathBuf;

    #[test]
    fn test_load_default_registry() -> Result<()> {
        let registry = ModelRegistry::load_defaults()?;

        assert_eq!(registry.list_models().len(), 2);

        let primary = registry.get_by_kind(PredictorKind::Primary)?;
        assert_eq!(primary.id, "intent-classifier");
        assert_eq!(primary.vocabulary, Vocabulary::InScope);

        let oos = registry.get_by_kind(PredictorKind::Oos)?;
        assert_eq!(oos.id, "intent-classifier-oos");
        assert_eq!(oos.vocabulary, Vocabulary::WithOos);

        Ok(())
    }

    #[test]
    fn test_model_path() -> Result<()> {
        let mut registry = ModelRegistry::load_defaults()?;

        registry.set_model_dir(PathBuf::from("/custom/models"));

        let path = registry.get_model_path("intent-classifier-oos")?;
        assert_eq!(path, PathBuf::from("/custom/models/intent_classifier_oos.json"));

        Ok(())
    }

    #[test]
    fn test_model_not_found() {
        let registry = ModelRegistry::load_defaults().expect("default registry should load");

        let result = registry.get_model("nonexistent-model");
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_registry_requires_both_models() {
        let json = r#"{
            "version": "1.0",
            "models": [
                {"id": "only", "name": "Only", "path": "only.json", "kind": "primary", "vocabulary": "in_scope"}
            ]
        }"#;

        let result = ModelRegistry::load_from_json(json);
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_registry_rejects_duplicate_kind() {
        let json = r#"{
            "version": "1.0",
            "models": [
                {"id": "a", "name": "A", "path": "a.json", "kind": "primary", "vocabulary": "in_scope"},
                {"id": "b", "name": "B", "path": "b.json", "kind": "primary", "vocabulary": "in_scope"},
                {"id": "c", "name": "C", "path": "c.json", "kind": "oos", "vocabulary": "with_oos"}
            ]
        }"#;

        let result = ModelRegistry::load_from_json(json);
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_registry_rejects_mismatched_vocabulary() {
        let json = r#"{
            "version": "1.0",
            "models": [
                {"id": "a", "name": "A", "path": "a.json", "kind": "primary", "vocabulary": "with_oos"},
                {"id": "b", "name": "B", "path": "b.json", "kind": "oos", "vocabulary": "with_oos"}
            ]
        }"#;

        let result = ModelRegistry::load_from_json(json);
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_export_registry() -> Result<()> {
        let registry = ModelRegistry::load_defaults()?;

        let json = registry.export()?;
        assert!(json.contains("\"version\": \"1.0\""));
        assert!(json.contains("intent_classifier_oos.json"));

        let reloaded = ModelRegistry::load_from_json(&json)?;
        assert_eq!(reloaded.list_models(), registry.list_models());

        Ok(())
    }

    #[test]
    fn test_for_config_uses_model_directory() -> Result<()> {
        let mut config = AppConfig::default();
        config.models.directory = PathBuf::from("/srv/models");

        let registry = ModelRegistry::for_config(&config)?;
        assert_eq!(registry.model_dir(), &PathBuf::from("/srv/models"));

        Ok(())
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.static_dir, PathBuf::from("app/static"));
        assert_eq!(config.models.directory, PathBuf::from("app/models"));
        assert!(config.models.oos_threshold.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_threshold_validation() {
        let mut config = AppConfig::default();

        config.models.oos_threshold = Some(0.4);
        assert!(config.validate().is_ok());

        config.models.oos_threshold = Some(1.5);
        assert!(matches!(config.validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.server.port = 9090;
        config.models.oos_threshold = Some(0.25);
        ConfigLoader::save(&config, &path)?;

        let loaded = ConfigLoader::load(Some(&path))?;
        assert_eq!(loaded.server.port, 9090);
        assert_eq!(loaded.models.oos_threshold, Some(0.25));

        Ok(())
    }

    #[test]
    fn test_invalid_config_file_is_rejected() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"server": {"host": "0.0.0.0"}}"#)?;

        assert!(matches!(ConfigLoader::load(Some(&path)), Err(Error::Serialization(_))));

        Ok(())
    }

    #[test]
    fn test_missing_explicit_config_falls_back() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("does-not-exist.json");

        // A typo in --config is logged, not fatal
        let config = ConfigLoader::load(Some(&path))?;
        config.validate()?;

        Ok(())
    }
}
