//! ONNX Classifier using tract

use crate::classifier::{ClassLabel, Classifier};
use crate::feature_vector::FEATURE_DIMENSION;
use crate::EstimatorError;
use std::path::Path;
use tracing::{debug, info};
use tract_onnx::prelude::*;

type OnnxPlan = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Classifier exported to ONNX (e.g. a tree ensemble with its label output
/// first), taking a `float32[1, 5]` feature row
pub struct OnnxClassifier {
    /// Optimized runnable graph
    plan: OnnxPlan,
    /// Names for integer class outputs
    classes: Vec<String>,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

impl OnnxClassifier {
    /// Load and optimize an ONNX model
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EstimatorError> {
        let path = path.as_ref();
        info!("Loading ONNX model: {}", path.display());

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, FEATURE_DIMENSION]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| EstimatorError::Load(format!("{}: {}", path.display(), e)))?;

        Ok(Self {
            plan,
            classes: Vec::new(),
        })
    }

    /// Map integer class outputs to names, in class index order
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }

    fn label_from_output(&self, output: &Tensor) -> Result<ClassLabel, EstimatorError> {
        match output.datum_type() {
            DatumType::I64 => {
                let idx = *output
                    .as_slice::<i64>()
                    .map_err(|e| EstimatorError::Prediction(e.to_string()))?
                    .first()
                    .ok_or_else(|| EstimatorError::Prediction("empty label output".to_string()))?;
                let name = usize::try_from(idx)
                    .ok()
                    .and_then(|i| self.classes.get(i).cloned())
                    .unwrap_or_else(|| idx.to_string());
                Ok(ClassLabel::new(name))
            }
            DatumType::String => output
                .as_slice::<String>()
                .map_err(|e| EstimatorError::Prediction(e.to_string()))?
                .first()
                .map(|label| ClassLabel::new(label.clone()))
                .ok_or_else(|| EstimatorError::Prediction("empty label output".to_string())),
            other => Err(EstimatorError::Prediction(format!(
                "unsupported label output type {:?}",
                other
            ))),
        }
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &[f64]) -> Result<ClassLabel, EstimatorError> {
        if features.len() != FEATURE_DIMENSION {
            return Err(EstimatorError::InvalidInputShape {
                expected: FEATURE_DIMENSION,
                actual: features.len(),
            });
        }

        let row: Vec<f32> = features.iter().map(|&v| v as f32).collect();
        let input = Tensor::from_shape(&[1, FEATURE_DIMENSION], &row)
            .map_err(|e| EstimatorError::Prediction(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| EstimatorError::Prediction(e.to_string()))?;
        let label_output = outputs
            .first()
            .ok_or_else(|| EstimatorError::Prediction("model produced no outputs".to_string()))?;

        let label = self.label_from_output(label_output)?;
        debug!("ONNX label: {}", label);
        Ok(label)
    }
}
