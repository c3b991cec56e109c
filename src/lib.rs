//! # house-price
//!
//! Offline training and online serving of a scaled linear house-price model.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: models carry their training state in the type
//!   system (`Unfitted` vs `Fitted`), so an unfitted regressor cannot be saved
//!   or asked for a prediction.
//! - **Training/Inference Separation**: the [`trainer`] produces a self-contained
//!   [`Artifact`]; the [`predictor`] only reads artifacts and never refits.
//! - **One Feature Order**: the artifact records the feature names in the order
//!   the scaler and regressor were fitted, and every request is assembled in
//!   that order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use house_price::{Predictor, Trainer};
//! use std::collections::HashMap;
//!
//! let report = Trainer::builder()
//!     .features(["sqft_living", "bedrooms", "bathrooms", "yr_built"])
//!     .target("price")
//!     .artifact_path("models/house_data.bin")
//!     .build()
//!     .train("house_data.csv")?;
//! println!("R2 = {:?}", report.scores.r2);
//!
//! let predictor = Predictor::initialize("models/house_data.bin");
//! let request: HashMap<&str, &str> = [
//!     ("sqft_living", "2000"),
//!     ("bedrooms", "3"),
//!     ("bathrooms", "2"),
//!     ("yr_built", "1990"),
//! ]
//! .into_iter()
//! .collect();
//! println!("{}", predictor.respond(&request).message());
//! # Ok::<(), house_price::TrainError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: CSV loading, column projection and the seeded train/test split
//! - `preprocessing`: `StandardScaler` and the transformer traits
//! - `model`: least-squares linear regression with stateful type parameters
//! - `metrics`: R², MSE, RMSE, MAE
//! - `serialization`: bincode encoding of parameter structs
//! - `artifact`: versioned on-disk bundle of scaler, regressor and feature order
//! - `trainer`: the training pipeline
//! - `predictor`: request parsing, inference and the readiness-tracking service
//! - `display`: price formatting and response rendering
//! - `config`: TOML pipeline configuration

pub mod artifact;
pub mod config;
pub mod dataset;
pub mod display;
pub mod error;
pub mod metrics;
pub mod model;
pub mod predictor;
pub mod preprocessing;
pub mod serialization;
pub mod trainer;

pub use artifact::{load_artifact, save_artifact, Artifact, ArtifactMetadata};
pub use config::{load_config, PipelineConfig, TrainingConfig};
pub use display::{format_price, prediction_text, PredictionResponse};
pub use error::{ArtifactError, ConfigError, ErrorCategory, PredictError, TrainError};
pub use predictor::{predict, Predictor, RawInputs, Status, StatusReport};
pub use trainer::{EvaluationScores, Trainer, TrainerBuilder, TrainingReport};
