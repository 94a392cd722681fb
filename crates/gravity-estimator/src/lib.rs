//! Surface Gravity Estimator
//!
//! Builds the FliPer feature vector and queries a pre-trained classifier
//! (JSON random forest or ONNX model run with tract) for a label.

mod classifier;
mod estimator;
mod feature_vector;
mod forest;
mod loader;
mod onnx;

pub use classifier::{ClassLabel, Classifier};
pub use estimator::{predict, GravityEstimator, Prediction};
pub use feature_vector::{FeatureVector, FEATURE_DIMENSION, FEATURE_NAMES};
pub use forest::{DecisionTree, RandomForest, TreeNode};
pub use loader::{load_model, load_model_with_classes};
pub use onnx::OnnxClassifier;

use thiserror::Error;

/// Errors during feature assembly, model loading and inference
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimatorError {
    #[error("Cannot take log10 of {feature} = {value}: FliPer values must be positive")]
    Domain { feature: &'static str, value: f64 },
    #[error("Model load failed: {0}")]
    Load(String),
    #[error("Inference failed: {0}")]
    Prediction(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
}

impl EstimatorError {
    /// Whether the error was raised by the model during inference
    pub fn is_prediction_error(&self) -> bool {
        matches!(
            self,
            EstimatorError::Prediction(_) | EstimatorError::InvalidInputShape { .. }
        )
    }
}
