//! Band Statistics Computation

use crate::spectrum::PowerSpectrum;
use serde::{Deserialize, Serialize};

/// Summary of the power samples selected by a frequency band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandStatistics {
    /// Mean power
    pub mean: f64,
    /// Minimum power
    pub min: f64,
    /// Maximum power
    pub max: f64,
    /// Number of samples in the band
    pub count: usize,
}

impl BandStatistics {
    /// Compute statistics from a slice of power values, `None` when empty
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        Some(Self {
            mean,
            min,
            max,
            count: values.len(),
        })
    }

    /// Compute statistics of the powers with `low <= frequency <= high`
    pub fn for_band(spectrum: &PowerSpectrum, low: f64, high: f64) -> Option<Self> {
        let selected: Vec<f64> = spectrum
            .samples()
            .filter(|&(f, _)| f >= low && f <= high)
            .map(|(_, p)| p)
            .collect();
        Self::compute(&selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let stats = BandStatistics::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.count, 5);
    }

    #[test]
    fn test_empty_values() {
        assert!(BandStatistics::compute(&[]).is_none());
    }

    #[test]
    fn test_band_is_inclusive() {
        let spectrum =
            PowerSpectrum::from_pairs(vec![(1.0, 10.0), (2.0, 20.0), (3.0, 30.0), (4.0, 40.0)])
                .unwrap();
        let stats = BandStatistics::for_band(&spectrum, 2.0, 3.0).unwrap();
        assert_eq!(stats.count, 2);
        assert!((stats.mean - 25.0).abs() < 1e-12);
    }

    #[test]
    fn test_band_without_samples() {
        let spectrum = PowerSpectrum::from_pairs(vec![(1.0, 10.0), (5.0, 20.0)]).unwrap();
        assert!(BandStatistics::for_band(&spectrum, 2.0, 4.0).is_none());
    }
}
