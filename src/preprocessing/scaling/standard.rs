//! Standard Scaler (Z-score normalization).
//!
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the per-feature mean of the training samples and `s` the
//! population standard deviation (ddof = 0). A feature with zero variance is
//! given `s = 1` so it is centered but never divided by zero.

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted [`StandardScaler`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Mean of each feature.
    pub mean: Vec<f64>,
    /// Standard deviation of each feature, always positive.
    pub std: Vec<f64>,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler;

impl StandardScaler {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for StandardScaler {
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Array2<f64>) -> Result<Self::Fitted, PreprocessingError> {
        let (rows, cols) = data.dim();

        if rows == 0 || cols == 0 {
            return Err(PreprocessingError::EmptyData(format!(
                "cannot fit StandardScaler on a {rows}x{cols} matrix"
            )));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(PreprocessingError::NumericalError(
                "StandardScaler input contains NaN or infinite values".to_string(),
            ));
        }

        let mean = data
            .mean_axis(Axis(0))
            .ok_or_else(|| PreprocessingError::EmptyData("no rows to average".to_string()))?;
        let std = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 { 1.0 } else { s });

        Ok(FittedStandardScaler { mean, std })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl FittedStandardScaler {
    /// Mean of each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Standard deviation of each feature.
    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }

    fn check_features(&self, got: usize) -> Result<(), PreprocessingError> {
        if got != self.mean.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.mean.len(),
                got_features: got,
            });
        }
        Ok(())
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Params = StandardScalerParams;

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>, PreprocessingError> {
        self.check_features(data.ncols())?;
        Ok((data - &self.mean) / &self.std)
    }

    fn transform_one(&self, sample: &Array1<f64>) -> Result<Array1<f64>, PreprocessingError> {
        self.check_features(sample.len())?;
        Ok((sample - &self.mean) / &self.std)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.mean.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "scaler has no features".to_string(),
            ));
        }
        if params.mean.len() != params.std.len() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "scaler has {} means but {} standard deviations",
                params.mean.len(),
                params.std.len()
            )));
        }
        if params.mean.iter().any(|m| !m.is_finite()) {
            return Err(PreprocessingError::InvalidParameter(
                "scaler mean is not finite".to_string(),
            ));
        }
        if params.std.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(PreprocessingError::InvalidParameter(
                "scaler standard deviation must be finite and positive".to_string(),
            ));
        }

        Ok(Self {
            mean: Array1::from(params.mean),
            std: Array1::from(params.std),
        })
    }

    fn n_features_in(&self) -> usize {
        self.mean.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data() -> Array2<f64> {
        array![[0.0, 1.0], [0.0, 1.0], [1.0, 3.0]]
    }

    #[test]
    fn test_standard_scaler_fit() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();

        // Mean: [1/3, 5/3]
        let mean = fitted.mean();
        assert!((mean[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((mean[1] - 5.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_transform() {
        let data = create_test_data();
        let scaled = StandardScaler::new().fit_transform(&data).unwrap();

        let mean = scaled.mean_axis(Axis(0)).unwrap();
        let std = scaled.std_axis(Axis(0), 0.0);
        for j in 0..2 {
            assert!(mean[j].abs() < 1e-12, "mean[{j}] = {}", mean[j]);
            assert!((std[j] - 1.0).abs() < 1e-12, "std[{j}] = {}", std[j]);
        }
    }

    #[test]
    fn test_transform_one_matches_batch_row() {
        let data = create_test_data();
        let fitted = StandardScaler::new().fit(&data).unwrap();

        let batch = fitted.transform(&data).unwrap();
        let single = fitted.transform_one(&data.row(2).to_owned()).unwrap();
        assert_eq!(batch.row(2).to_owned(), single);
    }

    #[test]
    fn test_statistics_come_only_from_fitted_data() {
        let train = array![[10.0], [20.0]];
        let fitted = StandardScaler::new().fit(&train).unwrap();

        // Transforming unseen data must not change the learned statistics.
        let _ = fitted.transform(&array![[1000.0], [2000.0]]).unwrap();
        assert!((fitted.mean()[0] - 15.0).abs() < 1e-12);
        assert!((fitted.std()[0] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_standard_scaler_feature_mismatch() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();

        let result = fitted.transform(&array![[1.0, 2.0, 3.0]]);
        assert!(matches!(
            result,
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));

        let result = fitted.transform_one(&array![1.0]);
        assert!(matches!(
            result,
            Err(PreprocessingError::FeatureMismatch { .. })
        ));
    }

    #[test]
    fn test_standard_scaler_empty_data() {
        let result = StandardScaler::new().fit(&Array2::zeros((0, 2)));
        assert!(matches!(result, Err(PreprocessingError::EmptyData(_))));
    }

    #[test]
    fn test_standard_scaler_rejects_nan() {
        let result = StandardScaler::new().fit(&array![[1.0], [f64::NAN]]);
        assert!(matches!(result, Err(PreprocessingError::NumericalError(_))));
    }

    #[test]
    fn test_standard_scaler_constant_feature() {
        let data = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let fitted = StandardScaler::new().fit(&data).unwrap();

        assert_eq!(fitted.std()[0], 1.0);
        assert_eq!(fitted.mean()[0], 5.0);
        let scaled = fitted.transform(&data).unwrap();
        assert!(scaled.column(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_params_roundtrip_is_exact() {
        let fitted = StandardScaler::new().fit(&create_test_data()).unwrap();
        let restored = FittedStandardScaler::from_params(fitted.extract_params()).unwrap();
        assert_eq!(restored, fitted);
        assert_eq!(restored.n_features_in(), 2);
    }

    #[test]
    fn test_from_params_rejects_inconsistent_lengths() {
        let params = StandardScalerParams {
            mean: vec![1.0, 2.0],
            std: vec![1.0],
        };
        assert!(matches!(
            FittedStandardScaler::from_params(params),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_from_params_rejects_non_positive_std() {
        let params = StandardScalerParams {
            mean: vec![1.0],
            std: vec![0.0],
        };
        assert!(FittedStandardScaler::from_params(params).is_err());
    }
}
