//! FliPer Gravity Pipeline
//!
//! Glue between spectrum files, FliPer extraction and the trained
//! classifier, used by the `fliper` binary.

pub mod catalog;
pub mod pipeline;
pub mod settings;

pub use catalog::{read_catalog, StarEntry};
pub use pipeline::{Pipeline, StarResult};
pub use settings::PipelineConfig;

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging to stderr, keeping stdout for results
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let level = level
        .parse::<Level>()
        .with_context(|| format!("invalid log level {:?}", level))?;
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
