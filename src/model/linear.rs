//! Ordinary least-squares linear regression.
//!
//! - [`LinearRegression`] = `LinearModel<Unfitted>`: holds the feature count and
//!   is consumed by [`LinearRegression::fit`].
//! - `LinearModel<Fitted>`: inference-only `y = w·x + b`, serializable through
//!   [`SerializableLinearParams`].
//!
//! The fit solves the normal equations on mean-centered data, so the intercept
//! is recovered exactly as `mean(y) - mean(x)·w`. Directions with no variance
//! (constant or perfectly collinear columns) receive a zero weight instead of
//! failing the fit.

use crate::model::{Fitted, InferenceModel, Unfitted};
use crate::preprocessing::PreprocessingError;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Relative pivot threshold below which a direction is treated as degenerate.
const PIVOT_TOLERANCE: f64 = 1e-12;

/// Weights and bias of a linear model.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// Plain-data form of [`LinearParams`] used for persistence.
///
/// Stored as `f64` so a save/load cycle reproduces the weights bit for bit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl From<&LinearParams> for SerializableLinearParams {
    fn from(params: &LinearParams) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias,
        }
    }
}

impl TryFrom<SerializableLinearParams> for LinearParams {
    type Error = PreprocessingError;

    fn try_from(value: SerializableLinearParams) -> Result<Self, Self::Error> {
        if value.weights.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "linear model has no weights".to_string(),
            ));
        }
        if !value.bias.is_finite() || value.weights.iter().any(|w| !w.is_finite()) {
            return Err(PreprocessingError::InvalidParameter(
                "linear model parameters must be finite".to_string(),
            ));
        }
        Ok(Self {
            weights: Array1::from(value.weights),
            bias: value.bias,
        })
    }
}

/// A linear model with its fitting state encoded at the type level.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

/// Alias for an **unfitted** linear regression model.
pub type LinearRegression = LinearModel<Unfitted>;

impl LinearRegression {
    /// Creates an unfitted model for `n_features` inputs.
    pub fn new(n_features: usize) -> Self {
        Self {
            params: LinearParams {
                weights: Array1::zeros(n_features),
                bias: 0.0,
            },
            _state: PhantomData,
        }
    }

    /// Fits weights and bias by least squares and returns the fitted model.
    ///
    /// # Errors
    /// - [`PreprocessingError::EmptyData`] when there are no samples.
    /// - [`PreprocessingError::FeatureMismatch`] when `x` has the wrong width.
    /// - [`PreprocessingError::SampleMismatch`] when `x` and `y` disagree on rows.
    /// - [`PreprocessingError::NumericalError`] on non-finite inputs or results.
    pub fn fit(
        self,
        x: &Array2<f64>,
        y: &Array1<f64>,
    ) -> Result<LinearModel<Fitted>, PreprocessingError> {
        let n_features = self.params.weights.len();
        let (rows, cols) = x.dim();

        if cols != n_features {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: n_features,
                got_features: cols,
            });
        }
        if rows != y.len() {
            return Err(PreprocessingError::SampleMismatch {
                x_rows: rows,
                y_rows: y.len(),
            });
        }
        if rows == 0 {
            return Err(PreprocessingError::EmptyData(
                "cannot fit a linear model without samples".to_string(),
            ));
        }
        if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
            return Err(PreprocessingError::NumericalError(
                "training data contains NaN or infinite values".to_string(),
            ));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PreprocessingError::EmptyData("no rows to average".to_string()))?;
        let y_mean = y.sum() / rows as f64;

        let xc = x - &x_mean;
        let yc = y - y_mean;

        let gram = xc.t().dot(&xc);
        let rhs = xc.t().dot(&yc);
        let weights = solve_normal_equations(gram, rhs);
        let bias = y_mean - x_mean.dot(&weights);

        if !bias.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(PreprocessingError::NumericalError(
                "least-squares solution is not finite".to_string(),
            ));
        }

        Ok(LinearModel::<Fitted>::new(LinearParams { weights, bias }))
    }
}

/// Solves `A w = b` for a symmetric positive semi-definite `A`.
///
/// Gaussian elimination on the diagonal pivots. A pivot that is negligible
/// relative to the largest diagonal entry marks a degenerate direction; its
/// weight is pinned to zero.
fn solve_normal_equations(mut a: Array2<f64>, mut b: Array1<f64>) -> Array1<f64> {
    let n = b.len();
    let max_diag = a.diag().iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tol = max_diag * PIVOT_TOLERANCE;

    for k in 0..n {
        let pivot = a[[k, k]];
        if pivot.abs() <= tol {
            for j in 0..n {
                a[[k, j]] = 0.0;
                a[[j, k]] = 0.0;
            }
            a[[k, k]] = 1.0;
            b[k] = 0.0;
            continue;
        }
        for i in (k + 1)..n {
            let factor = a[[i, k]] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                a[[i, j]] -= factor * a[[k, j]];
            }
            b[i] -= factor * b[k];
        }
    }

    let mut w = Array1::zeros(n);
    for k in (0..n).rev() {
        let tail: f64 = ((k + 1)..n).map(|j| a[[k, j]] * w[j]).sum();
        w[k] = (b[k] - tail) / a[[k, k]];
    }
    w
}

impl LinearModel<Fitted> {
    /// Creates a fitted model from explicit parameters.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.params.weights
    }

    pub fn bias(&self) -> f64 {
        self.params.bias
    }
}

impl InferenceModel for LinearModel<Fitted> {
    type ParamsRepr = SerializableLinearParams;

    fn predict(&self, input: &Array1<f64>) -> Result<f64, PreprocessingError> {
        if input.len() != self.params.weights.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.params.weights.len(),
                got_features: input.len(),
            });
        }
        let y = self.params.weights.dot(input) + self.params.bias;
        if !y.is_finite() {
            return Err(PreprocessingError::NumericalError(format!(
                "prediction is not finite: {y}"
            )));
        }
        Ok(y)
    }

    fn predict_batch(&self, input: &Array2<f64>) -> Result<Array1<f64>, PreprocessingError> {
        if input.ncols() != self.params.weights.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.params.weights.len(),
                got_features: input.ncols(),
            });
        }
        Ok(input.dot(&self.params.weights) + self.params.bias)
    }

    fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self, PreprocessingError> {
        Ok(Self::new(LinearParams::try_from(params)?))
    }
}
