//! Per-star classification pipeline

use crate::catalog::StarEntry;
use anyhow::Result;
use fliper_features::{FliperExtractor, FliperValues, PowerSpectrum};
use gravity_estimator::{ClassLabel, FeatureVector, GravityEstimator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Outcome for one star; later stages stay empty once a stage fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarResult {
    pub star_id: String,
    pub teff: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fliper: Option<FliperValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureVector>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<ClassLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StarResult {
    fn new(star_id: &str, teff: f64) -> Self {
        Self {
            star_id: star_id.to_string(),
            teff,
            fliper: None,
            features: None,
            label: None,
            error: None,
        }
    }

    fn failed(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}

/// Spectrum to label pipeline
pub struct Pipeline {
    extractor: FliperExtractor,
    estimator: GravityEstimator,
}

impl Pipeline {
    pub fn new(extractor: FliperExtractor, estimator: GravityEstimator) -> Self {
        Self {
            extractor,
            estimator,
        }
    }

    /// Classify one star from its spectrum and effective temperature
    pub fn classify(&self, star_id: &str, spectrum: &PowerSpectrum, teff: f64) -> StarResult {
        let mut result = StarResult::new(star_id, teff);

        let fliper = match self.extractor.extract(spectrum) {
            Ok(values) => values,
            Err(e) => return result.failed(e),
        };
        result.fliper = Some(fliper);

        let [fp07, fp7, fp20, fp50] = fliper.as_array();
        let features = match FeatureVector::build(fp07, fp7, fp20, fp50, teff) {
            Ok(features) => features,
            Err(e) => return result.failed(e),
        };
        result.features = Some(features);

        match self.estimator.predict(&features) {
            Ok(prediction) => {
                debug!("{}: {} ({}us)", star_id, prediction.label, prediction.latency_us);
                result.label = Some(prediction.label);
                result
            }
            Err(e) => result.failed(e),
        }
    }

    /// Load the star's spectrum and classify it
    pub fn classify_entry(&self, entry: &StarEntry) -> StarResult {
        match PowerSpectrum::from_path(&entry.psd_path) {
            Ok(spectrum) => self.classify(&entry.star_id, &spectrum, entry.teff),
            Err(e) => StarResult::new(&entry.star_id, entry.teff).failed(e),
        }
    }

    /// Classify every star in a catalog, in order
    pub fn run_catalog(&self, entries: &[StarEntry]) -> Vec<StarResult> {
        info!("Classifying {} stars", entries.len());

        let results: Vec<StarResult> = entries
            .iter()
            .map(|entry| {
                let result = self.classify_entry(entry);
                if let Some(error) = &result.error {
                    warn!("Skipping {}: {}", entry.star_id, error);
                }
                result
            })
            .collect();

        let failed = results.iter().filter(|r| r.error.is_some()).count();
        info!(
            "Catalog done: {} classified, {} failed",
            results.len() - failed,
            failed
        );
        results
    }
}

/// Write results as JSON lines
pub fn write_json_lines<W: std::io::Write>(mut writer: W, results: &[StarResult]) -> Result<()> {
    for result in results {
        serde_json::to_writer(&mut writer, result)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
