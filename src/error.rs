//! Error taxonomy for training, artifact handling and serving.
//!
//! The three enums follow the lifecycle of the pipeline:
//!
//! - [`TrainError`] aborts an offline training run.
//! - [`ArtifactError`] is raised while reading or writing the persisted model.
//!   A predictor that fails to load stays in the `Failed` state.
//! - [`PredictError`] rejects a single request and never affects other
//!   requests or the process state.
//!
//! [`ErrorCategory`] lets a delivery layer tell "fix your input" apart from
//! "retrying will not help until the model is retrained or reloaded".

use crate::preprocessing::PreprocessingError;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse failure class handed to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// The request itself is wrong; the caller should correct it.
    InvalidInput,
    /// No usable model is loaded; retrying the same request will not help.
    ModelUnavailable,
    /// Unexpected numeric failure inside the pipeline.
    Internal,
}

/// Errors that abort a training run.
#[derive(Debug, Error)]
pub enum TrainError {
    /// Dataset file absent, unreadable, malformed or not valid UTF-8.
    #[error("failed to load dataset {path}: {reason}")]
    DataLoad { path: PathBuf, reason: String },

    /// A required column is absent or holds non-numeric values.
    #[error("schema error: {0}")]
    Schema(String),

    /// The data could not be split or fitted.
    #[error("fit error: {0}")]
    Fit(String),

    /// The fitted artifact could not be persisted.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl From<PreprocessingError> for TrainError {
    fn from(err: PreprocessingError) -> Self {
        TrainError::Fit(err.to_string())
    }
}

/// Errors raised while reading or writing an artifact file.
///
/// Messages are stored as strings so a failed predictor can keep the error
/// around for status reporting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArtifactError {
    /// No file at the configured path.
    #[error("model artifact not found at {path}; train the model first")]
    Missing { path: PathBuf },

    /// The file exists but cannot be read.
    #[error("model artifact at {path} is unreadable: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    /// Empty, truncated, wrong format or internally inconsistent.
    #[error("model artifact at {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The artifact could not be written.
    #[error("failed to write model artifact to {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

impl ArtifactError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ArtifactError::Write { .. } => ErrorCategory::Internal,
            _ => ErrorCategory::ModelUnavailable,
        }
    }
}

/// Per-request inference failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// The predictor has no loaded artifact.
    #[error("model not loaded: {0}")]
    NotReady(String),

    /// A feature recorded in the artifact is absent from the request.
    #[error("missing value for feature '{0}'")]
    MissingFeature(String),

    /// A feature value is not a finite number.
    #[error("invalid value '{raw}' for feature '{name}': expected a number")]
    InvalidValue { name: String, raw: String },

    /// Scaling or regression failed.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl PredictError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PredictError::NotReady(_) => ErrorCategory::ModelUnavailable,
            PredictError::MissingFeature(_) | PredictError::InvalidValue { .. } => {
                ErrorCategory::InvalidInput
            }
            PredictError::Inference(_) => ErrorCategory::Internal,
        }
    }
}

impl From<PreprocessingError> for PredictError {
    fn from(err: PreprocessingError) -> Self {
        PredictError::Inference(err.to_string())
    }
}

/// Errors raised while loading a pipeline configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
