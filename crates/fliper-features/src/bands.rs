//! FliPer Band Definitions

use crate::error::FliperError;
use serde::{Deserialize, Serialize};

/// Lower band edges (muHz) for Fp07, Fp7, Fp20 and Fp50
pub const DEFAULT_LOW_EDGES: [f64; 4] = [0.7, 7.0, 20.0, 50.0];

/// Shared upper band edge (muHz), close to the long-cadence Nyquist frequency
pub const NYQUIST_BOUND_UHZ: f64 = 277.0;

/// Number of trailing samples averaged for the photon noise estimate
pub const DEFAULT_NOISE_TAIL: usize = 20;

/// Frequency bands used for FliPer extraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    /// Lower edge of each band (muHz), in Fp07, Fp7, Fp20, Fp50 order
    pub low_edges: [f64; 4],
    /// Upper edge shared by every band (muHz)
    pub upper_bound: f64,
    /// Samples at the end of the spectrum used for the noise floor
    pub noise_tail: usize,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            low_edges: DEFAULT_LOW_EDGES,
            upper_bound: NYQUIST_BOUND_UHZ,
            noise_tail: DEFAULT_NOISE_TAIL,
        }
    }
}

impl BandConfig {
    /// Check that every band is a proper interval and the noise tail is usable
    pub fn validate(&self) -> Result<(), FliperError> {
        if self.noise_tail == 0 {
            return Err(FliperError::InvalidBands(
                "noise tail must contain at least one sample".to_string(),
            ));
        }
        if !self.upper_bound.is_finite() {
            return Err(FliperError::InvalidBands(format!(
                "upper bound {} is not finite",
                self.upper_bound
            )));
        }
        for &low in &self.low_edges {
            if !low.is_finite() || low >= self.upper_bound {
                return Err(FliperError::InvalidBands(format!(
                    "lower edge {} must be below upper bound {}",
                    low, self.upper_bound
                )));
            }
        }
        Ok(())
    }

    /// Bands as `(low, high)` pairs
    pub fn bands(&self) -> [(f64, f64); 4] {
        self.low_edges.map(|low| (low, self.upper_bound))
    }
}
