//! Tabular data for training.
//!
//! # Core Concepts
//!
//! - [`Table`]: row-oriented records exactly as read from disk; every cell is a
//!   [`Value`]. No column is interpreted yet.
//! - [`Frame`]: the projection of a table onto an ordered feature subset plus a
//!   target: `x` of shape `(n_samples, n_features)` and `y` of shape
//!   `(n_samples,)`. The column order of `x` is the order of
//!   [`Frame::feature_names`].
//! - [`train_test_split`]: reproducible shuffled partitioning of a frame.
//!
//! # Example
//!
//! ```
//! use house_price::dataset::{Table, Value};
//!
//! let table = Table::new(
//!     vec!["sqft_living".into(), "price".into()],
//!     vec![
//!         vec![Value::Number(1000.0), Value::Number(100_000.0)],
//!         vec![Value::Number(2000.0), Value::Number(200_000.0)],
//!     ],
//! );
//! let frame = table.project(&["sqft_living".to_string()], "price").unwrap();
//! assert_eq!(frame.x.dim(), (2, 1));
//! ```

pub mod frame;
pub mod loader;

pub use frame::{train_test_split, Frame};
pub use loader::load_csv;

use crate::error::TrainError;
use ndarray::{Array1, Array2};
use std::collections::HashSet;

/// A single cell of a loaded table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A finite number.
    Number(f64),
    /// Any other non-empty text.
    Text(String),
    /// Empty cell.
    Empty,
}

impl Value {
    /// Interprets a raw cell: trimmed, empty → `Empty`, finite float →
    /// `Number`, anything else → `Text`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Value::Number(v),
            _ => Value::Text(trimmed.to_string()),
        }
    }
}

/// Ordered header plus row-oriented records.
///
/// Records may be shorter than the header; that is only an error if a
/// projected column falls in the missing tail.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Projects the table onto `features` (in that order) and `target`.
    ///
    /// # Errors
    /// [`TrainError::Schema`] if the feature list is empty or has duplicates, if
    /// the target is also listed as a feature, if a column is absent from the
    /// header, or if any record lacks a numeric value for a projected column.
    pub fn project(&self, features: &[String], target: &str) -> Result<Frame, TrainError> {
        if features.is_empty() {
            return Err(TrainError::Schema(
                "feature subset must not be empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = features.iter().find(|f| !seen.insert(f.as_str())) {
            return Err(TrainError::Schema(format!(
                "feature '{dup}' is listed more than once"
            )));
        }
        if features.iter().any(|f| f == target) {
            return Err(TrainError::Schema(format!(
                "target column '{target}' cannot also be a feature"
            )));
        }

        let feature_idx = features
            .iter()
            .map(|f| self.require_column(f))
            .collect::<Result<Vec<_>, _>>()?;
        let target_idx = self.require_column(target)?;

        let n_rows = self.rows.len();
        let n_features = features.len();
        let mut x = Array2::<f64>::zeros((n_rows, n_features));
        let mut y = Array1::<f64>::zeros(n_rows);

        for (r, row) in self.rows.iter().enumerate() {
            for (c, &idx) in feature_idx.iter().enumerate() {
                x[[r, c]] = self.numeric_cell(row, r, idx)?;
            }
            y[r] = self.numeric_cell(row, r, target_idx)?;
        }

        Ok(Frame {
            feature_names: features.to_vec(),
            target_name: target.to_string(),
            x,
            y,
        })
    }

    fn require_column(&self, name: &str) -> Result<usize, TrainError> {
        self.column_index(name).ok_or_else(|| {
            TrainError::Schema(format!(
                "required column '{name}' not found; available columns: {}",
                self.columns.join(", ")
            ))
        })
    }

    fn numeric_cell(&self, row: &[Value], r: usize, idx: usize) -> Result<f64, TrainError> {
        let column = &self.columns[idx];
        match row.get(idx) {
            Some(Value::Number(v)) => Ok(*v),
            Some(Value::Text(text)) => Err(TrainError::Schema(format!(
                "record {} has non-numeric value '{text}' in column '{column}'",
                r + 1
            ))),
            Some(Value::Empty) | None => Err(TrainError::Schema(format!(
                "record {} has no value for column '{column}'",
                r + 1
            ))),
        }
    }
}
