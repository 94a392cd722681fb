//! Classifier Capability

use crate::EstimatorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Class predicted by a model, e.g. an evolutionary state or logg bin
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassLabel(pub String);

impl ClassLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClassLabel {
    fn from(label: &str) -> Self {
        Self(label.to_string())
    }
}

/// Interface for trained classification models
pub trait Classifier: Send + Sync {
    /// Predict a label for one feature row, given in training column order
    fn predict(&self, features: &[f64]) -> Result<ClassLabel, EstimatorError>;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn predict(&self, features: &[f64]) -> Result<ClassLabel, EstimatorError> {
        (**self).predict(features)
    }
}
