//! Error type for scaler and regressor numerics.

use thiserror::Error;

/// Failure raised while fitting or applying a scaler or a linear model.
///
/// These errors are internal to the numeric layer. The trainer surfaces them as
/// [`TrainError::Fit`](crate::error::TrainError::Fit) and the predictor as
/// [`PredictError::Inference`](crate::error::PredictError::Inference).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessingError {
    /// Empty data provided where non-empty was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// Number of columns does not match the number the transformer was fitted on.
    #[error("feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },

    /// Feature matrix and target vector disagree on the number of samples.
    #[error("sample mismatch: {x_rows} feature rows but {y_rows} targets")]
    SampleMismatch { x_rows: usize, y_rows: usize },

    /// Non-finite input or output (NaN, infinity).
    #[error("numerical error: {0}")]
    NumericalError(String),

    /// Parameters restored from storage are inconsistent.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = PreprocessingError::FeatureMismatch {
            expected_features: 4,
            got_features: 3,
        };
        assert_eq!(
            err.to_string(),
            "feature mismatch: expected 4 features, got 3"
        );
    }

    #[test]
    fn test_error_display_sample_mismatch() {
        let err = PreprocessingError::SampleMismatch {
            x_rows: 10,
            y_rows: 9,
        };
        assert!(err.to_string().contains("10 feature rows"));
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PreprocessingError::EmptyData("no rows".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
