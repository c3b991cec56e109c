//! Regression models with compile-time fitted/unfitted state.

pub mod linear;
pub mod state;

pub use linear::{LinearModel, LinearParams, LinearRegression, SerializableLinearParams};
pub use state::{Fitted, Unfitted};

use crate::preprocessing::PreprocessingError;
use crate::serialization::SerializableParams;
use ndarray::{Array1, Array2};

/// Inference interface of a fitted model.
///
/// Dimension checks are part of the contract: a mismatched input returns an
/// error instead of panicking inside the numeric library.
pub trait InferenceModel: Sized {
    /// Serializable parameter representation.
    type ParamsRepr: SerializableParams;

    /// Predict a single sample.
    fn predict(&self, input: &Array1<f64>) -> Result<f64, PreprocessingError>;

    /// Predict every row of a `(n_samples, n_features)` matrix.
    fn predict_batch(&self, input: &Array2<f64>) -> Result<Array1<f64>, PreprocessingError>;

    /// Number of input features the model expects.
    fn n_features(&self) -> usize;

    fn extract_params(&self) -> Self::ParamsRepr;

    fn from_params(params: Self::ParamsRepr) -> Result<Self, PreprocessingError>;
}
