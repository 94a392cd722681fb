//! FliPer Error Types

use thiserror::Error;

/// Errors during spectrum loading and FliPer extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FliperError {
    /// Spectrum shorter than the tail used for the noise estimate
    #[error("Insufficient data: noise estimate needs {required} samples, spectrum has {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// No sample falls inside a frequency band
    #[error("No spectrum samples in band [{low}, {high}] muHz")]
    EmptyBand { low: f64, high: f64 },

    /// Spectrum columns are malformed
    #[error("Invalid spectrum: {0}")]
    InvalidSpectrum(String),

    /// Band configuration is unusable
    #[error("Invalid band configuration: {0}")]
    InvalidBands(String),

    /// Table line could not be parsed
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(String),
}

impl FliperError {
    /// Whether the error means the spectrum holds too few samples for a value
    pub fn is_insufficient_data(&self) -> bool {
        matches!(
            self,
            FliperError::InsufficientData { .. } | FliperError::EmptyBand { .. }
        )
    }
}

impl From<std::io::Error> for FliperError {
    fn from(err: std::io::Error) -> Self {
        FliperError::Io(err.to_string())
    }
}
