//! Offline training pipeline.
//!
//! A [`Trainer`] is configured once through [`TrainerBuilder`] and then run
//! against a dataset:
//!
//! 1. load the CSV and project the configured feature and target columns,
//! 2. split rows into train and evaluation partitions with a fixed seed,
//! 3. fit a [`StandardScaler`] on the training rows only,
//! 4. fit a least-squares [`LinearRegression`] on the scaled training rows,
//! 5. score the evaluation rows (R², RMSE, MAE) for diagnostics,
//! 6. persist scaler, regressor and feature order as one [`Artifact`].
//!
//! Evaluation scores never gate persistence.

use crate::artifact::{save_artifact, Artifact, ArtifactMetadata};
use crate::config::{PipelineConfig, TrainingConfig};
use crate::dataset::{load_csv, train_test_split, Table};
use crate::error::TrainError;
use crate::metrics;
use crate::model::{InferenceModel, LinearRegression};
use crate::preprocessing::{FittedTransformer, StandardScaler, Transformer};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Held-out evaluation of a freshly fitted model.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationScores {
    pub train_rows: usize,
    pub test_rows: usize,
    /// `None` when the evaluation targets are constant.
    pub r2: Option<f64>,
    pub rmse: Option<f64>,
    pub mae: Option<f64>,
}

/// Outcome of a successful [`Trainer::train`] run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub artifact: Artifact,
    pub artifact_path: PathBuf,
    pub scores: EvaluationScores,
}

/// Configured training pipeline. Immutable once built.
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainingConfig,
    artifact_path: PathBuf,
}

/// Fluent builder for [`Trainer`].
#[derive(Debug, Clone)]
pub struct TrainerBuilder {
    config: TrainingConfig,
    artifact_path: PathBuf,
}

impl Default for TrainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrainerBuilder {
    pub fn new() -> Self {
        let defaults = PipelineConfig::default();
        Self {
            config: defaults.training,
            artifact_path: defaults.artifact_path,
        }
    }

    /// Starts from the training settings and artifact path of `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            config: config.training.clone(),
            artifact_path: config.artifact_path.clone(),
        }
    }

    /// Ordered feature columns to train on.
    pub fn features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.config.target = target.into();
        self
    }

    pub fn test_ratio(mut self, ratio: f64) -> Self {
        self.config.test_ratio = ratio;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn artifact_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifact_path = path.into();
        self
    }

    pub fn build(self) -> Trainer {
        Trainer {
            config: self.config,
            artifact_path: self.artifact_path,
        }
    }
}

impl Trainer {
    pub fn builder() -> TrainerBuilder {
        TrainerBuilder::new()
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Runs the full pipeline on the CSV file at `dataset_path` and writes the
    /// artifact.
    ///
    /// Any failure aborts the run before the artifact is written, so an
    /// existing artifact at the target path is left untouched.
    pub fn train<P: AsRef<Path>>(&self, dataset_path: P) -> Result<TrainingReport, TrainError> {
        let dataset_path = dataset_path.as_ref();
        info!(dataset = %dataset_path.display(), "starting training run");
        let table = load_csv(dataset_path)?;
        self.train_table(&table)
    }

    /// Same as [`Trainer::train`] for an already loaded table.
    pub fn train_table(&self, table: &Table) -> Result<TrainingReport, TrainError> {
        let (artifact, scores) = self.fit(table)?;
        save_artifact(&artifact, &self.artifact_path)?;
        Ok(TrainingReport {
            artifact,
            artifact_path: self.artifact_path.clone(),
            scores,
        })
    }

    /// Fits and evaluates without touching the filesystem.
    pub fn fit(&self, table: &Table) -> Result<(Artifact, EvaluationScores), TrainError> {
        let frame = table.project(&self.config.features, &self.config.target)?;
        let (train, test) = train_test_split(&frame, self.config.test_ratio, self.config.seed)?;
        debug!(
            train_rows = train.len(),
            test_rows = test.len(),
            seed = self.config.seed,
            "split dataset"
        );

        let scaler = StandardScaler::new().fit(&train.x)?;
        let x_train = scaler.transform(&train.x)?;
        let x_test = scaler.transform(&test.x)?;

        let regressor = LinearRegression::new(frame.feature_names.len()).fit(&x_train, &train.y)?;
        let y_pred = regressor.predict_batch(&x_test)?;

        let (y_true, y_pred) = (test.y.to_vec(), y_pred.to_vec());
        let scores = EvaluationScores {
            train_rows: train.len(),
            test_rows: test.len(),
            r2: metrics::r2_score(&y_true, &y_pred),
            rmse: metrics::rmse(&y_true, &y_pred),
            mae: metrics::mae(&y_true, &y_pred),
        };
        match scores.r2 {
            Some(r2) => info!(
                r2 = %format!("{r2:.4}"),
                rmse = ?scores.rmse,
                mae = ?scores.mae,
                "evaluated model on held-out rows"
            ),
            None => warn!("R2 is undefined: evaluation targets are constant"),
        }

        let metadata = ArtifactMetadata::new(
            frame.target_name.clone(),
            scores.train_rows,
            scores.test_rows,
            scores.r2,
        );
        let artifact = Artifact::new(regressor, scaler, frame.feature_names, metadata)?;
        Ok((artifact, scores))
    }
}
