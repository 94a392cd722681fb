//! Feature Vector Assembly

use crate::EstimatorError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of features the classifiers were trained on
pub const FEATURE_DIMENSION: usize = 5;

/// Training column names, in model input order.
///
/// The `ln` prefix comes from the training tables; values are base-10 logs.
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = ["lnF07", "lnF7", "lnF20", "lnF50", "teff"];

/// Classifier input: log FliPer values followed by effective temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// log10(Fp07)
    pub ln_f07: f64,
    /// log10(Fp7)
    pub ln_f7: f64,
    /// log10(Fp20)
    pub ln_f20: f64,
    /// log10(Fp50)
    pub ln_f50: f64,
    /// Effective temperature (K)
    pub teff: f64,
}

impl FeatureVector {
    /// Assemble the feature vector from the four FliPer values and teff
    pub fn build(
        fp07: f64,
        fp7: f64,
        fp20: f64,
        fp50: f64,
        teff: f64,
    ) -> Result<Self, EstimatorError> {
        let vector = Self {
            ln_f07: checked_log10(FEATURE_NAMES[0], fp07)?,
            ln_f7: checked_log10(FEATURE_NAMES[1], fp7)?,
            ln_f20: checked_log10(FEATURE_NAMES[2], fp20)?,
            ln_f50: checked_log10(FEATURE_NAMES[3], fp50)?,
            teff,
        };
        debug!("Feature vector: {:?}", vector.as_array());
        Ok(vector)
    }

    /// Values in model input order
    pub fn as_array(&self) -> [f64; FEATURE_DIMENSION] {
        [self.ln_f07, self.ln_f7, self.ln_f20, self.ln_f50, self.teff]
    }
}

fn checked_log10(feature: &'static str, value: f64) -> Result<f64, EstimatorError> {
    if value.is_nan() || value <= 0.0 {
        return Err(EstimatorError::Domain { feature, value });
    }
    Ok(value.log10())
}
