//! FliPer Gravity Pipeline - Main Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fliper_cli::pipeline::write_json_lines;
use fliper_cli::{init_logging, read_catalog, Pipeline, PipelineConfig};
use fliper_features::{FliperExtractor, PowerSpectrum};
use gravity_estimator::{load_model_with_classes, GravityEstimator};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

/// Surface gravity classification from FliPer values
#[derive(Parser, Debug)]
#[command(name = "fliper", version, about, long_about = None)]
struct Args {
    /// Configuration file (TOML, JSON or YAML)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the FliPer values of a spectrum
    Features {
        /// Two-column PSD table (frequency in muHz, power)
        #[arg(long, value_name = "FILE")]
        psd: PathBuf,
    },
    /// Classify a single star
    Predict {
        /// Two-column PSD table (frequency in muHz, power)
        #[arg(long, value_name = "FILE")]
        psd: PathBuf,
        /// Effective temperature (K)
        #[arg(long)]
        teff: f64,
        /// Trained model; overrides the config
        #[arg(long, value_name = "FILE")]
        model: Option<PathBuf>,
    },
    /// Classify every star of a `star_id psd_path teff` catalog
    Batch {
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,
        /// Trained model; overrides the config
        #[arg(long, value_name = "FILE")]
        model: Option<PathBuf>,
        /// JSON lines output (stdout when absent)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config =
        PipelineConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    let log_level = args.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(log_level)?;

    info!("=== FliPer pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let extractor = FliperExtractor::new(config.bands).context("invalid band configuration")?;

    match args.command {
        Command::Features { psd } => {
            let spectrum = read_spectrum(&psd)?;
            let values = extractor.extract(&spectrum)?;
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        Command::Predict { psd, teff, model } => {
            let pipeline = Pipeline::new(extractor, load_estimator(model, &config)?);
            let star_id = psd
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| psd.display().to_string());
            let spectrum = read_spectrum(&psd)?;

            let result = pipeline.classify(&star_id, &spectrum, teff);
            println!("{}", serde_json::to_string_pretty(&result)?);
            if let Some(error) = result.error {
                anyhow::bail!("{}: {}", star_id, error);
            }
        }
        Command::Batch {
            catalog,
            model,
            output,
        } => {
            let pipeline = Pipeline::new(extractor, load_estimator(model, &config)?);
            let entries = read_catalog(&catalog)?;
            let results = pipeline.run_catalog(&entries);

            match output {
                Some(path) => {
                    let file = File::create(&path)
                        .with_context(|| format!("cannot create {}", path.display()))?;
                    write_json_lines(BufWriter::new(file), &results)?;
                    info!("Wrote {} results to {}", results.len(), path.display());
                }
                None => write_json_lines(std::io::stdout().lock(), &results)?,
            }
        }
    }

    Ok(())
}

fn read_spectrum(path: &Path) -> Result<PowerSpectrum> {
    PowerSpectrum::from_path(path)
        .with_context(|| format!("cannot read spectrum {}", path.display()))
}

fn load_estimator(model: Option<PathBuf>, config: &PipelineConfig) -> Result<GravityEstimator> {
    let path = model
        .or_else(|| config.model_path.clone())
        .context("no model given: pass --model or set model_path in the config")?;
    let model = load_model_with_classes(&path, config.class_names.clone())
        .with_context(|| format!("cannot load model {}", path.display()))?;
    Ok(GravityEstimator::new(model))
}
