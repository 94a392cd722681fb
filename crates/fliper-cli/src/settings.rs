//! Pipeline settings

use config::{Config, ConfigError, Environment, File};
use fliper_features::BandConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Trained classifier (`.json` forest or `.onnx`)
    pub model_path: Option<PathBuf>,

    /// Names of integer ONNX labels, in class index order
    pub class_names: Vec<String>,

    /// FliPer band layout
    pub bands: BandConfig,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            class_names: Vec::new(),
            bands: BandConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Layer defaults, an optional config file and `FLIPER__*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        builder
            .add_source(Environment::with_prefix("FLIPER").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.bands, BandConfig::default());
        assert!(config.model_path.is_none());
        assert!(config.class_names.is_empty());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_toml() {
        let path = std::env::temp_dir().join(format!("fliper-config-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "model_path = \"/data/ML_CLASSIFICATION_Kepler.onnx\"\n\
             class_names = [\"RGB\", \"RC\", \"2CL\"]\n\
             \n\
             [bands]\n\
             upper_bound = 250.0\n\
             noise_tail = 100\n",
        )
        .unwrap();

        let config = PipelineConfig::load(Some(&path));
        std::fs::remove_file(&path).ok();
        let config = config.unwrap();

        assert_eq!(
            config.model_path,
            Some(PathBuf::from("/data/ML_CLASSIFICATION_Kepler.onnx"))
        );
        assert_eq!(config.class_names, ["RGB", "RC", "2CL"]);
        assert_eq!(config.bands.upper_bound, 250.0);
        assert_eq!(config.bands.noise_tail, 100);
        assert_eq!(config.bands.low_edges, [0.7, 7.0, 20.0, 50.0]);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(PipelineConfig::load(Some(Path::new("/nonexistent/fliper.toml"))).is_err());
    }
}
