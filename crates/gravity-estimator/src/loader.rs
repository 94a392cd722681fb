//! Trained Model Loading

use crate::classifier::Classifier;
use crate::forest::RandomForest;
use crate::onnx::OnnxClassifier;
use crate::EstimatorError;
use std::path::Path;
use tracing::{info, warn};

/// Load a trained classifier, choosing the format from the file extension.
///
/// `.json` files hold an exported random forest, `.onnx` files are run with
/// tract.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Box<dyn Classifier>, EstimatorError> {
    load_model_with_classes(path, Vec::new())
}

/// Like [`load_model`], naming the integer labels of ONNX models.
///
/// JSON forests carry their own class names and ignore `classes`.
pub fn load_model_with_classes<P: AsRef<Path>>(
    path: P,
    classes: Vec<String>,
) -> Result<Box<dyn Classifier>, EstimatorError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(EstimatorError::Load(format!(
            "model file not found: {}",
            path.display()
        )));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| EstimatorError::Load(format!("{}: {}", path.display(), e)))?;
            let forest = RandomForest::from_json(&json)?;
            info!(
                "Loaded random forest from {}: {} trees, classes {:?}",
                path.display(),
                forest.trees().len(),
                forest.classes()
            );
            if !classes.is_empty() {
                warn!("Ignoring configured class names, the forest defines its own");
            }
            Ok(Box::new(forest))
        }
        Some("onnx") => Ok(Box::new(OnnxClassifier::load(path)?.with_classes(classes))),
        _ => Err(EstimatorError::Load(format!(
            "unrecognized model format: {}",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::tests::FOREST_JSON;
    use std::path::PathBuf;

    fn write_fixture(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("fliper-{}-{}", std::process::id(), name));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_forest() {
        let path = write_fixture("forest.json", FOREST_JSON);
        let model = load_model(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let label = model.predict(&[3.0, 2.5, 2.0, 1.5, 4600.0]).unwrap();
        assert_eq!(label.as_str(), "RGB");
    }

    #[test]
    fn test_load_onnx_with_classes() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures/argmax_classifier.onnx");
        let classes = vec!["RGB".to_string(), "RC".to_string()];
        let model = load_model_with_classes(path, classes).unwrap();
        assert_eq!(model.predict(&[0.1, 0.9, 0.2, 0.3, 0.0]).unwrap().as_str(), "RC");

        let bare = load_model(path).unwrap();
        assert_eq!(bare.predict(&[0.1, 0.9, 0.2, 0.3, 0.0]).unwrap().as_str(), "1");
    }

    #[test]
    fn test_missing_path() {
        let result = load_model("/nonexistent/ML_CLASSIFICATION_training.json");
        assert!(matches!(result, Err(EstimatorError::Load(_))));
    }

    #[test]
    fn test_unknown_extension() {
        let path = write_fixture("model.pkl", "binary pickle");
        let result = load_model(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(EstimatorError::Load(_))));
    }

    #[test]
    fn test_incompatible_json() {
        let path = write_fixture("weights.json", r#"{"coefficients": [0.1, 0.2]}"#);
        let result = load_model(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(EstimatorError::Load(_))));
    }
}
