//! Regression quality metrics.
//!
//! All functions take equally sized slices; mismatched lengths are a caller bug
//! and are rejected with `None` rather than a panic.

/// Coefficient of determination.
///
/// ```text
/// R² = 1 - SS_res / SS_tot
/// ```
///
/// Returns `None` when the slices are empty, differ in length, or when the true
/// values have zero variance (R² is undefined there). Values may be negative
/// when the model is worse than predicting the mean.
pub fn r2_score(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }

    let mean = y_true.iter().sum::<f64>() / y_true.len() as f64;
    let ss_tot: f64 = y_true.iter().map(|&t| (t - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return None;
    }
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();

    Some(1.0 - ss_res / ss_tot)
}

/// Mean squared error.
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let sum_sq: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(&t, &p)| (t - p).powi(2))
        .sum();
    Some(sum_sq / y_true.len() as f64)
}

/// Root mean squared error, in the units of the target.
pub fn rmse(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    mse(y_true, y_pred).map(f64::sqrt)
}

/// Mean absolute error.
pub fn mae(y_true: &[f64], y_pred: &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return None;
    }
    let sum_abs: f64 = y_true.iter().zip(y_pred).map(|(&t, &p)| (t - p).abs()).sum();
    Some(sum_abs / y_true.len() as f64)
}
