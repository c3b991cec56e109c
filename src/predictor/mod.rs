//! Online inference.
//!
//! [`predict`] is a pure function of an [`Artifact`] and one request's raw
//! values. [`Predictor`] wraps it in a long-lived service that owns the
//! loaded artifact and tracks whether it is ready to serve.
//!
//! A predictor moves through three states:
//!
//! ```text
//! Uninitialized --load ok--> Ready --reload ok--> Ready (new artifact)
//!       |                      |
//!    load err             reload err: stays Ready on the old artifact
//!       v
//!    Failed --reload ok--> Ready
//! ```
//!
//! Requests only ever see a complete artifact: readers clone an [`Arc`] out of
//! the lock and a reload replaces it in one write.

mod inputs;

pub use inputs::RawInputs;

use crate::artifact::{load_artifact, Artifact};
use crate::display::PredictionResponse;
use crate::error::{ArtifactError, PredictError};
use crate::model::InferenceModel;
use crate::preprocessing::FittedTransformer;
use ndarray::Array1;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, error, info, warn};

/// Predicts a price for one request.
///
/// Looks up every feature the artifact was trained on, in the artifact's
/// order, parses it, scales it with the stored scaler and applies the stored
/// regressor. The result is rounded to two decimal places. Keys not used by
/// the model are ignored.
///
/// # Errors
/// - [`PredictError::MissingFeature`] for the first feature (in artifact
///   order) with no value.
/// - [`PredictError::InvalidValue`] for the first feature whose value is
///   empty, not a number, or not finite.
/// - [`PredictError::Inference`] if the computation does not yield a finite
///   number.
pub fn predict<R: RawInputs + ?Sized>(artifact: &Artifact, raw: &R) -> Result<f64, PredictError> {
    let features = assemble_features(artifact, raw)?;
    let scaled = artifact.scaler().transform_one(&features)?;
    let value = artifact.regressor().predict(&scaled)?;
    let rounded = round_to_cents(value);
    if !rounded.is_finite() {
        return Err(PredictError::Inference(format!(
            "prediction is not a finite number: {value}"
        )));
    }
    Ok(rounded)
}

/// Builds the unscaled feature vector for `raw` in artifact order.
pub fn assemble_features<R: RawInputs + ?Sized>(
    artifact: &Artifact,
    raw: &R,
) -> Result<Array1<f64>, PredictError> {
    artifact
        .feature_names()
        .iter()
        .map(|name| {
            let value = raw
                .raw_value(name)
                .ok_or_else(|| PredictError::MissingFeature(name.clone()))?;
            parse_feature(name, value)
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Array1::from)
}

fn parse_feature(name: &str, raw: &str) -> Result<f64, PredictError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| PredictError::InvalidValue {
            name: name.to_string(),
            raw: raw.to_string(),
        })
}

/// Rounds half away from zero to two decimal places.
///
/// Values too large to scale by 100 have no fractional cents and are returned
/// unchanged.
pub fn round_to_cents(value: f64) -> f64 {
    let cents = value * 100.0;
    if cents.is_finite() {
        cents.round() / 100.0
    } else {
        value
    }
}

/// Readiness of a [`Predictor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Uninitialized,
    Ready,
    Failed,
}

/// Snapshot of a predictor's state for health reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub status: Status,
    /// Feature order of the loaded artifact; empty unless ready.
    pub features: Vec<String>,
    /// Path the current artifact was loaded from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Load error when failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
enum Readiness {
    Uninitialized,
    Ready {
        artifact: Arc<Artifact>,
        source: Option<PathBuf>,
    },
    Failed(ArtifactError),
}

/// Long-lived inference service holding one artifact.
///
/// `Predictor` is `Send + Sync`; share it behind an `Arc` across request
/// handlers.
#[derive(Debug)]
pub struct Predictor {
    state: RwLock<Readiness>,
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new()
    }
}

impl Predictor {
    /// A predictor with nothing loaded.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Readiness::Uninitialized),
        }
    }

    /// Loads the artifact at `path`. The returned predictor is `Ready` on
    /// success and `Failed` otherwise; the process keeps running either way.
    pub fn initialize<P: AsRef<Path>>(path: P) -> Self {
        let predictor = Self::new();
        // The failure is recorded in the predictor state.
        let _ = predictor.reload(path);
        predictor
    }

    /// A ready predictor serving an in-memory artifact.
    pub fn from_artifact(artifact: Artifact) -> Self {
        Self {
            state: RwLock::new(Readiness::Ready {
                artifact: Arc::new(artifact),
                source: None,
            }),
        }
    }

    /// Loads the artifact at `path` and swaps it in.
    ///
    /// On failure a ready predictor keeps serving its previous artifact; an
    /// uninitialized or failed one becomes `Failed`. In-flight requests finish
    /// against whichever artifact they started with.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> Result<Arc<Artifact>, ArtifactError> {
        let path = path.as_ref();
        match load_artifact(path) {
            Ok(artifact) => {
                let artifact = Arc::new(artifact);
                *self.write() = Readiness::Ready {
                    artifact: Arc::clone(&artifact),
                    source: Some(path.to_path_buf()),
                };
                info!(
                    path = %path.display(),
                    features = ?artifact.feature_names(),
                    "predictor ready"
                );
                Ok(artifact)
            }
            Err(err) => {
                let mut state = self.write();
                if matches!(*state, Readiness::Ready { .. }) {
                    warn!(path = %path.display(), error = %err, "reload failed, keeping current model");
                } else {
                    error!(
                        path = %path.display(),
                        category = ?err.category(),
                        error = %err,
                        "failed to load model"
                    );
                    *state = Readiness::Failed(err.clone());
                }
                Err(err)
            }
        }
    }

    pub fn status(&self) -> Status {
        match *self.read() {
            Readiness::Uninitialized => Status::Uninitialized,
            Readiness::Ready { .. } => Status::Ready,
            Readiness::Failed(_) => Status::Failed,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status() == Status::Ready
    }

    pub fn status_report(&self) -> StatusReport {
        match &*self.read() {
            Readiness::Uninitialized => StatusReport {
                status: Status::Uninitialized,
                features: Vec::new(),
                source: None,
                reason: None,
            },
            Readiness::Ready { artifact, source } => StatusReport {
                status: Status::Ready,
                features: artifact.feature_names().to_vec(),
                source: source.clone(),
                reason: None,
            },
            Readiness::Failed(err) => StatusReport {
                status: Status::Failed,
                features: Vec::new(),
                source: None,
                reason: Some(err.to_string()),
            },
        }
    }

    /// The artifact currently being served.
    ///
    /// # Errors
    /// [`PredictError::NotReady`] unless the predictor is ready.
    pub fn artifact(&self) -> Result<Arc<Artifact>, PredictError> {
        match &*self.read() {
            Readiness::Ready { artifact, .. } => Ok(Arc::clone(artifact)),
            Readiness::Uninitialized => {
                Err(PredictError::NotReady("no model has been loaded".to_string()))
            }
            Readiness::Failed(err) => Err(PredictError::NotReady(err.to_string())),
        }
    }

    /// Predicts a price for one request against the current artifact.
    pub fn predict<R: RawInputs + ?Sized>(&self, raw: &R) -> Result<f64, PredictError> {
        let artifact = self.artifact()?;
        let result = predict(&artifact, raw);
        match &result {
            Ok(value) => debug!(value, "prediction served"),
            Err(err @ PredictError::Inference(_)) => error!(error = %err, "prediction failed"),
            Err(err) => debug!(error = %err, "prediction rejected"),
        }
        result
    }

    /// [`Predictor::predict`] rendered as a response.
    pub fn respond<R: RawInputs + ?Sized>(&self, raw: &R) -> PredictionResponse {
        PredictionResponse::from(self.predict(raw))
    }

    // The state is always replaced whole, so a poisoned lock still holds a
    // consistent value.
    fn read(&self) -> RwLockReadGuard<'_, Readiness> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Readiness> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
