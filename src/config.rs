//! Pipeline configuration.
//!
//! Configuration is read from a TOML file. Every field has a default, so a
//! file only needs the values it changes:
//!
//! ```toml
//! dataset_path = "data/house_data.csv"
//! artifact_path = "models/house_data.bin"
//!
//! [training]
//! features = ["sqft_living", "bedrooms", "bathrooms", "yr_built"]
//! target = "price"
//! test_ratio = 0.2
//! seed = 42
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV: &str = "HOUSE_PRICE_CONFIG";

/// Feature subset used when none is configured.
pub const DEFAULT_FEATURES: [&str; 4] = ["sqft_living", "bedrooms", "bathrooms", "yr_built"];

/// Settings for one training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Ordered feature columns. This order is recorded in the artifact.
    pub features: Vec<String>,
    /// Target column.
    pub target: String,
    /// Fraction of rows held out for evaluation.
    pub test_ratio: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            features: DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect(),
            target: "price".to_string(),
            test_ratio: 0.2,
            seed: 42,
        }
    }
}

impl TrainingConfig {
    /// Checks the settings that can be verified without data.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.features.is_empty() {
            return Err(ConfigError::Invalid("no features configured".to_string()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.features.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(ConfigError::Invalid(format!(
                "feature '{dup}' is configured more than once"
            )));
        }
        if self.target.trim().is_empty() {
            return Err(ConfigError::Invalid("target column is empty".to_string()));
        }
        if !(self.test_ratio > 0.0 && self.test_ratio < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "test_ratio must be between 0 and 1 (exclusive), got {}",
                self.test_ratio
            )));
        }
        Ok(())
    }
}

/// Paths plus training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub dataset_path: PathBuf,
    pub artifact_path: PathBuf,
    pub training: TrainingConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("house_data.csv"),
            artifact_path: PathBuf::from("house_data.bin"),
            training: TrainingConfig::default(),
        }
    }
}

/// Load a [`PipelineConfig`] from a TOML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the TOML is invalid, or the
/// training settings fail [`TrainingConfig::validate`].
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: PipelineConfig = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.training.validate()?;
    Ok(config)
}

/// Loads `path` if given, otherwise returns the defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading configuration from file");
            load_config(path)
        }
        None => {
            info!("no config file specified, using defaults");
            Ok(PipelineConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_toml(toml: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(toml.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(
            config.training.features,
            vec!["sqft_living", "bedrooms", "bathrooms", "yr_built"]
        );
        assert_eq!(config.training.target, "price");
        assert_eq!(config.training.test_ratio, 0.2);
        assert_eq!(config.training.seed, 42);
        assert!(config.training.validate().is_ok());
    }

    #[test]
    fn test_load_config_full() {
        let f = write_toml(
            r#"
dataset_path = "data/houses.csv"
artifact_path = "models/houses.bin"

[training]
features = ["sqft_living", "yr_built"]
target = "sale_price"
test_ratio = 0.25
seed = 7
"#,
        );
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("data/houses.csv"));
        assert_eq!(config.artifact_path, PathBuf::from("models/houses.bin"));
        assert_eq!(config.training.features, vec!["sqft_living", "yr_built"]);
        assert_eq!(config.training.target, "sale_price");
        assert_eq!(config.training.test_ratio, 0.25);
        assert_eq!(config.training.seed, 7);
    }

    #[test]
    fn test_load_config_partial_uses_defaults() {
        let f = write_toml("artifact_path = \"m.bin\"\n");
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.artifact_path, PathBuf::from("m.bin"));
        assert_eq!(config.training, TrainingConfig::default());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/house_price.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let f = write_toml("dataset_path = [unterminated");
        assert!(matches!(
            load_config(f.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_config_unknown_field() {
        let f = write_toml("model_type = \"xgboost\"\n");
        assert!(matches!(
            load_config(f.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_load_config_rejects_bad_ratio() {
        let f = write_toml("[training]\ntest_ratio = 1.5\n");
        assert!(matches!(
            load_config(f.path()),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_features() {
        let config = TrainingConfig {
            features: vec!["bedrooms".into(), "bedrooms".into()],
            ..TrainingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_config_without_path() {
        assert_eq!(resolve_config(None).unwrap(), PipelineConfig::default());
    }
}
