//! Presentation of predictions and prediction failures.

use crate::error::{ErrorCategory, PredictError};
use serde::Serialize;

/// Formats a price with a dollar sign, thousands separators and two decimals.
///
/// ```
/// use house_price::display::format_price;
///
/// assert_eq!(format_price(1234567.891), "$1,234,567.89");
/// assert_eq!(format_price(-12.5), "-$12.50");
/// ```
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // -0.001 rounds to 0.00 and is shown without a sign.
    let negative = value < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0');
    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{frac_part}")
}

/// The sentence shown to an end user for a successful prediction.
pub fn prediction_text(value: f64) -> String {
    format!("Predicted House Price: {}", format_price(value))
}

/// Outcome of one prediction request, ready to render or serialize.
///
/// Serializes with a `status` tag:
/// `{"status":"prediction","value":450000.0,"text":"Predicted House Price: $450,000.00"}`
/// or `{"status":"error","category":"invalid_input","message":"..."}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PredictionResponse {
    Prediction { value: f64, text: String },
    Error { category: ErrorCategory, message: String },
}

impl PredictionResponse {
    pub fn from_value(value: f64) -> Self {
        PredictionResponse::Prediction {
            value,
            text: prediction_text(value),
        }
    }

    pub fn from_error(err: &PredictError) -> Self {
        PredictionResponse::Error {
            category: err.category(),
            message: err.to_string(),
        }
    }

    /// `None` for a successful prediction.
    pub fn error_category(&self) -> Option<ErrorCategory> {
        match self {
            PredictionResponse::Prediction { .. } => None,
            PredictionResponse::Error { category, .. } => Some(*category),
        }
    }

    /// Human readable text for either outcome.
    pub fn message(&self) -> &str {
        match self {
            PredictionResponse::Prediction { text, .. } => text,
            PredictionResponse::Error { message, .. } => message,
        }
    }
}

impl From<Result<f64, PredictError>> for PredictionResponse {
    fn from(result: Result<f64, PredictError>) -> Self {
        match result {
            Ok(value) => Self::from_value(value),
            Err(err) => Self::from_error(&err),
        }
    }
}
