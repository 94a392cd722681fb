//! Power Density Spectrum Container and Table Reader

use crate::error::FliperError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Power density spectrum of a high-pass filtered light curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerSpectrum {
    /// Frequencies (muHz), non-decreasing
    frequencies: Vec<f64>,
    /// Power density per frequency
    powers: Vec<f64>,
}

impl PowerSpectrum {
    /// Build a spectrum from its two columns
    pub fn new(frequencies: Vec<f64>, powers: Vec<f64>) -> Result<Self, FliperError> {
        if frequencies.len() != powers.len() {
            return Err(FliperError::InvalidSpectrum(format!(
                "{} frequencies but {} power values",
                frequencies.len(),
                powers.len()
            )));
        }
        if let Some(i) = frequencies
            .iter()
            .zip(&powers)
            .position(|(f, p)| !f.is_finite() || !p.is_finite())
        {
            return Err(FliperError::InvalidSpectrum(format!(
                "non-finite value at sample {}",
                i
            )));
        }
        if let Some(i) = frequencies.windows(2).position(|w| w[1] < w[0]) {
            return Err(FliperError::InvalidSpectrum(format!(
                "frequency decreases at sample {} ({} -> {})",
                i + 1,
                frequencies[i],
                frequencies[i + 1]
            )));
        }

        Ok(Self {
            frequencies,
            powers,
        })
    }

    /// Build a spectrum from `(frequency, power)` rows
    pub fn from_pairs<I>(rows: I) -> Result<Self, FliperError>
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let (frequencies, powers) = rows.into_iter().unzip();
        Self::new(frequencies, powers)
    }

    /// Read a two-column text table (frequency, power).
    ///
    /// Columns may be separated by whitespace or commas; extra columns are
    /// ignored. Blank lines and lines starting with `#` are skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, FliperError> {
        let mut frequencies = Vec::new();
        let mut powers = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let mut fields = trimmed
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty());
            let frequency = parse_field(fields.next(), idx + 1, "frequency")?;
            let power = parse_field(fields.next(), idx + 1, "power")?;

            frequencies.push(frequency);
            powers.push(power);
        }

        debug!("Read spectrum table with {} samples", frequencies.len());
        Self::new(frequencies, powers)
    }

    /// Read a two-column text table from a file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, FliperError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| FliperError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Frequency column (muHz)
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Power column
    pub fn powers(&self) -> &[f64] {
        &self.powers
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Iterate over `(frequency, power)` samples
    pub fn samples(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.powers.iter().copied())
    }
}

fn parse_field(field: Option<&str>, line: usize, name: &str) -> Result<f64, FliperError> {
    let raw = field.ok_or_else(|| FliperError::Parse {
        line,
        message: format!("missing {} column", name),
    })?;
    raw.parse::<f64>().map_err(|e| FliperError::Parse {
        line,
        message: format!("bad {} value '{}': {}", name, raw, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs() {
        let spectrum = PowerSpectrum::from_pairs(vec![(1.0, 2.0), (2.0, 3.0)]).unwrap();
        assert_eq!(spectrum.len(), 2);
        assert_eq!(spectrum.frequencies(), &[1.0, 2.0]);
        assert_eq!(spectrum.powers(), &[2.0, 3.0]);
    }

    #[test]
    fn test_repeated_frequencies_allowed() {
        assert!(PowerSpectrum::new(vec![1.0, 1.0, 2.0], vec![0.0; 3]).is_ok());
    }

    #[test]
    fn test_decreasing_frequency_rejected() {
        let result = PowerSpectrum::new(vec![1.0, 3.0, 2.0], vec![1.0; 3]);
        assert!(matches!(result, Err(FliperError::InvalidSpectrum(_))));
    }

    #[test]
    fn test_mismatched_columns_rejected() {
        assert!(PowerSpectrum::new(vec![1.0, 2.0], vec![1.0]).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(PowerSpectrum::new(vec![1.0, 2.0], vec![1.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_read_table() {
        let table = "# freq power\n\
                     0.5 10.0\n\
                     \n\
                     1.0,\t8.5, 99\n\
                     1.5   7.25\n";
        let spectrum = PowerSpectrum::from_reader(table.as_bytes()).unwrap();
        assert_eq!(spectrum.frequencies(), &[0.5, 1.0, 1.5]);
        assert_eq!(spectrum.powers(), &[10.0, 8.5, 7.25]);
    }

    #[test]
    fn test_read_table_scientific_notation() {
        let table = "1.0e-1 2.5E+3\n2.0e-1 1e3\n";
        let spectrum = PowerSpectrum::from_reader(table.as_bytes()).unwrap();
        assert_eq!(spectrum.powers(), &[2500.0, 1000.0]);
    }

    #[test]
    fn test_read_table_missing_column() {
        let table = "0.5 10.0\n1.0\n";
        let err = PowerSpectrum::from_reader(table.as_bytes()).unwrap_err();
        assert!(matches!(err, FliperError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_read_table_bad_number() {
        let table = "0.5 ten\n";
        let err = PowerSpectrum::from_reader(table.as_bytes()).unwrap_err();
        assert!(matches!(err, FliperError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_missing_file() {
        let err = PowerSpectrum::from_path("/nonexistent/psd.txt").unwrap_err();
        assert!(matches!(err, FliperError::Io(_)));
    }
}
