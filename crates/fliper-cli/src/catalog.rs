//! Star catalog reading

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::debug;

/// One star to classify
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarEntry {
    /// Catalog identifier (e.g. KIC number)
    pub star_id: String,
    /// Two-column PSD table of the 20-day filtered light curve
    pub psd_path: PathBuf,
    /// Effective temperature (K)
    pub teff: f64,
}

/// Parse a `star_id psd_path teff` table.
///
/// Relative PSD paths are resolved against `base_dir`.
pub fn parse_catalog<R: BufRead>(reader: R, base_dir: &Path) -> Result<Vec<StarEntry>> {
    let mut entries = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        if fields.len() < 3 {
            bail!(
                "catalog line {}: expected 'star_id psd_path teff', got '{}'",
                idx + 1,
                trimmed
            );
        }

        let teff = fields[2]
            .parse::<f64>()
            .with_context(|| format!("catalog line {}: bad teff '{}'", idx + 1, fields[2]))?;

        entries.push(StarEntry {
            star_id: fields[0].to_string(),
            psd_path: base_dir.join(fields[1]),
            teff,
        });
    }

    debug!("Parsed catalog with {} stars", entries.len());
    Ok(entries)
}

/// Read a star catalog file
pub fn read_catalog(path: &Path) -> Result<Vec<StarEntry>> {
    let file = File::open(path)
        .with_context(|| format!("cannot open catalog {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    parse_catalog(BufReader::new(file), base_dir)
}
