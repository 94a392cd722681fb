//! FliPer Value Extraction

use crate::bands::BandConfig;
use crate::error::FliperError;
use crate::spectrum::PowerSpectrum;
use crate::statistics::BandStatistics;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Noise-corrected band powers of one spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FliperValues {
    /// Mean power from 0.7 muHz to the upper bound, minus noise
    pub fp07: f64,
    /// Mean power from 7 muHz to the upper bound, minus noise
    pub fp7: f64,
    /// Mean power from 20 muHz to the upper bound, minus noise
    pub fp20: f64,
    /// Mean power from 50 muHz to the upper bound, minus noise
    pub fp50: f64,
    /// Noise floor subtracted from every band
    pub noise_floor: f64,
}

impl FliperValues {
    /// Values in Fp07, Fp7, Fp20, Fp50 order
    pub fn as_array(&self) -> [f64; 4] {
        [self.fp07, self.fp7, self.fp20, self.fp50]
    }
}

/// Mean power of the samples with `low <= frequency <= high`
pub fn average_power_in_band(
    spectrum: &PowerSpectrum,
    low: f64,
    high: f64,
) -> Result<f64, FliperError> {
    BandStatistics::for_band(spectrum, low, high)
        .map(|stats| stats.mean)
        .ok_or(FliperError::EmptyBand { low, high })
}

/// Extracts FliPer values from power density spectra
#[derive(Debug, Clone, Default)]
pub struct FliperExtractor {
    /// Band layout and noise tail length
    config: BandConfig,
}

impl FliperExtractor {
    /// Create a new extractor, rejecting unusable band layouts
    pub fn new(config: BandConfig) -> Result<Self, FliperError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Band configuration in use
    pub fn config(&self) -> &BandConfig {
        &self.config
    }

    /// Photon noise estimate: mean power of the last `noise_tail` samples
    pub fn compute_noise_floor(&self, spectrum: &PowerSpectrum) -> Result<f64, FliperError> {
        let tail = self.config.noise_tail;
        let powers = spectrum.powers();
        if powers.len() < tail {
            return Err(FliperError::InsufficientData {
                required: tail,
                actual: powers.len(),
            });
        }

        let noise = powers[powers.len() - tail..].iter().sum::<f64>() / tail as f64;
        Ok(noise)
    }

    /// Mean power of the samples with `low <= frequency <= high`
    pub fn average_power_in_band(
        &self,
        spectrum: &PowerSpectrum,
        low: f64,
        high: f64,
    ) -> Result<f64, FliperError> {
        average_power_in_band(spectrum, low, high)
    }

    /// Compute the four FliPer values of a spectrum
    pub fn extract(&self, spectrum: &PowerSpectrum) -> Result<FliperValues, FliperError> {
        let noise_floor = self.compute_noise_floor(spectrum)?;

        let mut values = [0.0; 4];
        for (value, (low, high)) in values.iter_mut().zip(self.config.bands()) {
            let stats = BandStatistics::for_band(spectrum, low, high)
                .ok_or(FliperError::EmptyBand { low, high })?;
            debug!(
                "Band [{}, {}] muHz: {} samples, mean={:.4e}, min={:.4e}, max={:.4e}",
                low, high, stats.count, stats.mean, stats.min, stats.max
            );
            *value = stats.mean - noise_floor;
        }

        debug!(
            "FliPer values: Fp07={:.4e}, Fp7={:.4e}, Fp20={:.4e}, Fp50={:.4e} (noise={:.4e})",
            values[0], values[1], values[2], values[3], noise_floor
        );

        Ok(FliperValues {
            fp07: values[0],
            fp7: values[1],
            fp20: values[2],
            fp50: values[3],
            noise_floor,
        })
    }
}
