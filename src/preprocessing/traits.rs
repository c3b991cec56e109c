//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: unfitted; learns parameters from training data.
//! - [`FittedTransformer`]: fitted; applies the learned parameters and can be
//!   persisted through its [`SerializableParams`] representation.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;
use ndarray::{Array1, Array2};

/// Trait for unfitted transformers.
///
/// # Example
/// ```
/// use house_price::preprocessing::{FittedTransformer, StandardScaler, Transformer};
/// use ndarray::array;
///
/// let train = array![[1.0, 10.0], [3.0, 30.0]];
/// let fitted = StandardScaler::new().fit(&train).unwrap();
/// let scaled = fitted.transform(&train).unwrap();
/// assert_eq!(scaled[[0, 0]], -1.0);
/// ```
pub trait Transformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params>;

    /// Learn parameters from a `(n_samples, n_features)` matrix.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty or contains
    /// non-finite values.
    fn fit(&self, data: &Array2<f64>) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit and transform the same data in one step.
    fn fit_transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// `extract_params()` followed by `from_params()` reproduces the transformer
/// exactly.
pub trait FittedTransformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform a batch of samples.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::FeatureMismatch`] if the number of columns
    /// differs from the number of features seen during fit.
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError>;

    /// Transform a single sample.
    fn transform_one(&self, sample: &Array1<f64>) -> Result<Array1<f64>, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters, validating them.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
