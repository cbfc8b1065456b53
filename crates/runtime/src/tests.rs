#[cfg(test)]
mod tests {
    use crate::*;
    use intent_common::{ClassLabel, Error, PredictorKind, Result, Vocabulary};
    use intent_config::{AppConfig, ModelRegistry};
    use std::path::{Path, PathBuf};

    fn bundled_models_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../app/models")
    }

    fn write_artifact(dir: &Path, name: &str, json: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, json).expect("Failed to write artifact");
        path
    }

    const SMALL_OOS_ARTIFACT: &str = r#"{
        "format": "linear-bow",
        "version": 1,
        "labels": ["balance", "pin_change", "oos"],
        "bias": {"oos": 0.5},
        "features": {
            "pin": {"pin_change": 1.0},
            "balance": {"balance": 1.0},
            "my balance": {"balance": 2.0}
        }
    }"#;

    #[derive(Debug)]
    struct FixedPredictor {
        label: ClassLabel,
        confidence: f32,
    }

    impl Predictor for FixedPredictor {
        fn predict(&self, _text: &str) -> Result<Prediction> {
            Ok(Prediction {
                label: self.label,
                confidence: self.confidence,
                scores: vec![(self.label, self.confidence)],
            })
        }

        fn labels(&self) -> &[ClassLabel] {
            std::slice::from_ref(&self.label)
        }
    }

    fn fixed(vocabulary: Vocabulary, label: ClassLabel, confidence: f32) -> ModelHandle {
        ModelHandle::new(
            "fixed",
            PathBuf::from("fixed.json"),
            vocabulary,
            std::sync::Arc::new(FixedPredictor { label, confidence }),
        )
    }

    #[test]
    fn test_load_artifact_from_disk() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_artifact(dir.path(), "model.json", SMALL_OOS_ARTIFACT);

        let handle = ModelLoader::load("small", &path, Vocabulary::WithOos)?;
        assert_eq!(&*handle.model_id, "small");
        assert_eq!(handle.path, path);
        assert_eq!(handle.labels().len(), 3);

        assert_eq!(handle.predict("what is my balance")?.label, ClassLabel::Balance);
        assert_eq!(handle.predict("change my pin please")?.label, ClassLabel::PinChange);
        assert_eq!(handle.predict("tell me a joke")?.label, ClassLabel::Oos);

        Ok(())
    }

    #[test]
    fn test_missing_artifact_fails_to_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = ModelLoader::load("gone", &dir.path().join("absent.json"), Vocabulary::InScope);

        match result {
            Err(Error::ModelLoadFailed(msg)) => assert!(msg.contains("not found")),
            other => panic!("expected load failure, got {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_artifact_fails_to_load() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_artifact(dir.path(), "model.json", "\u{0080}binary pickle");

        let result = ModelLoader::load("corrupt", &path, Vocabulary::InScope);
        assert!(matches!(result, Err(Error::ModelLoadFailed(_))));

        Ok(())
    }

    #[test]
    fn test_oos_artifact_rejected_for_primary_vocabulary() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_artifact(dir.path(), "model.json", SMALL_OOS_ARTIFACT);

        let result = ModelLoader::load("small", &path, Vocabulary::InScope);
        assert!(matches!(result, Err(Error::ModelLoadFailed(_))));

        Ok(())
    }

    #[test]
    fn test_oos_threshold_replaces_low_confidence_labels() -> Result<()> {
        let handle = fixed(Vocabulary::WithOos, ClassLabel::Balance, 0.3)
            .with_oos_threshold(Some(0.5));
        assert_eq!(handle.predict("anything")?.label, ClassLabel::Oos);

        let handle = fixed(Vocabulary::WithOos, ClassLabel::Balance, 0.7)
            .with_oos_threshold(Some(0.5));
        assert_eq!(handle.predict("anything")?.label, ClassLabel::Balance);

        // Without a threshold the hard label is returned
        let handle = fixed(Vocabulary::WithOos, ClassLabel::Balance, 0.01);
        assert_eq!(handle.predict("anything")?.label, ClassLabel::Balance);

        Ok(())
    }

    #[test]
    fn test_threshold_ignored_for_in_scope_vocabulary() -> Result<()> {
        let handle = fixed(Vocabulary::InScope, ClassLabel::Taxes, 0.1)
            .with_oos_threshold(Some(0.9));
        assert_eq!(handle.predict("anything")?.label, ClassLabel::Taxes);

        Ok(())
    }

    #[test]
    fn test_out_of_vocabulary_prediction_is_an_error() {
        let handle = fixed(Vocabulary::InScope, ClassLabel::Oos, 0.9);

        let result = handle.predict("anything");
        assert!(matches!(result, Err(Error::PredictionFailed(_))));
    }

    #[test]
    fn test_registry_loads_bundled_models() -> Result<()> {
        let mut config = AppConfig::default();
        config.models.directory = bundled_models_dir();
        let registry = ModelRegistry::for_config(&config)?;

        let predictors = PredictorRegistry::load(&config, &registry)?;
        assert_eq!(predictors.len(), 2);
        assert_eq!(predictors.primary().vocabulary, Vocabulary::InScope);
        assert_eq!(predictors.oos().vocabulary, Vocabulary::WithOos);
        assert_eq!(predictors.primary().labels().len(), ClassLabel::IN_SCOPE.len());
        assert_eq!(predictors.oos().labels().len(), ClassLabel::IN_SCOPE.len() + 1);

        let label = predictors.get(PredictorKind::Primary).predict("how do I reset my pin")?.label;
        assert_eq!(label, ClassLabel::PinChange);

        let label = predictors.get(PredictorKind::Oos).predict("what's the weather like today")?.label;
        assert_eq!(label, ClassLabel::Oos);

        let label = predictors.get(PredictorKind::Primary).predict("what's the weather like today")?.label;
        assert!(ClassLabel::IN_SCOPE.contains(&label));

        Ok(())
    }

    #[test]
    fn test_registry_fails_when_an_artifact_is_missing() -> Result<()> {
        let dir = tempfile::tempdir()?;
        std::fs::copy(
            bundled_models_dir().join("intent_classifier_oos.json"),
            dir.path().join("intent_classifier_oos.json"),
        )?;

        let mut config = AppConfig::default();
        config.models.directory = dir.path().to_path_buf();
        let registry = ModelRegistry::for_config(&config)?;

        let result = PredictorRegistry::load(&config, &registry);
        assert!(matches!(result, Err(Error::ModelLoadFailed(_))));

        Ok(())
    }

    #[tokio::test]
    async fn test_runtime_create_applies_threshold() -> Result<()> {
        let mut config = AppConfig::default();
        config.models.directory = bundled_models_dir();
        config.models.oos_threshold = Some(0.99);
        let registry = ModelRegistry::for_config(&config)?;

        let predictors = ModelRuntime::create(&config, &registry).await?;

        // Confidence over 35 labels never reaches 0.99 with the bundled weights
        let label = predictors.oos().predict("what is my balance")?.label;
        assert_eq!(label, ClassLabel::Oos);

        let label = predictors.primary().predict("what is my balance")?.label;
        assert_eq!(label, ClassLabel::Balance);

        Ok(())
    }
}
