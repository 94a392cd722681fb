//! Gravity Estimator Implementation

use crate::classifier::{ClassLabel, Classifier};
use crate::feature_vector::FeatureVector;
use crate::EstimatorError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted class
    pub label: ClassLabel,
    /// Inference latency in microseconds
    pub latency_us: u64,
}

/// Forward a feature vector to a classifier and return its label
pub fn predict(
    features: &FeatureVector,
    model: &dyn Classifier,
) -> Result<ClassLabel, EstimatorError> {
    model.predict(&features.as_array())
}

/// Surface gravity estimator wrapping a loaded classifier
pub struct GravityEstimator {
    model: Box<dyn Classifier>,
}

impl GravityEstimator {
    /// Create a new estimator around a loaded model
    pub fn new(model: Box<dyn Classifier>) -> Self {
        info!("Creating gravity estimator");
        Self { model }
    }

    /// Load the model at `path` and wrap it
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self, EstimatorError> {
        Ok(Self::new(crate::loader::load_model(path)?))
    }

    /// Run inference on a feature vector
    pub fn predict(&self, features: &FeatureVector) -> Result<Prediction, EstimatorError> {
        let start = std::time::Instant::now();

        let label = predict(features, self.model.as_ref())?;

        let latency_us = start.elapsed().as_micros() as u64;
        debug!("Inference completed in {}us: {}", latency_us, label);

        Ok(Prediction { label, latency_us })
    }

    /// Run inference on many stars; one failure does not stop the others
    pub fn predict_many(&self, batch: &[FeatureVector]) -> Vec<Result<Prediction, EstimatorError>> {
        debug!("Processing batch of {} feature vectors", batch.len());
        batch
            .iter()
            .map(|features| {
                let result = self.predict(features);
                if let Err(e) = &result {
                    warn!("Inference error: {}", e);
                }
                result
            })
            .collect()
    }

    /// Borrow the underlying model
    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }
}
