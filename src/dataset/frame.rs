use crate::error::TrainError;
use ndarray::{Array1, Array2, Axis};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// Numeric feature matrix and target vector with their column names.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Names of the columns of `x`, in column order.
    pub feature_names: Vec<String>,
    pub target_name: String,
    /// `(n_samples, n_features)`
    pub x: Array2<f64>,
    /// `(n_samples,)`
    pub y: Array1<f64>,
}

impl Frame {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// Returns a frame holding only the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Frame {
        Frame {
            feature_names: self.feature_names.clone(),
            target_name: self.target_name.clone(),
            x: self.x.select(Axis(0), indices),
            y: self.y.select(Axis(0), indices),
        }
    }
}

/// Splits `frame` into `(train, test)` partitions.
///
/// Row indices are shuffled with a generator seeded from `seed`; the first
/// `ceil(n * test_ratio)` shuffled rows form the evaluation partition and the
/// rest the training partition. The same frame, ratio and seed always produce
/// the same split.
///
/// # Errors
/// [`TrainError::Fit`] if `test_ratio` is not strictly between 0 and 1, or if
/// either partition would be empty.
pub fn train_test_split(
    frame: &Frame,
    test_ratio: f64,
    seed: u64,
) -> Result<(Frame, Frame), TrainError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(TrainError::Fit(format!(
            "test ratio must be between 0 and 1 (exclusive), got {test_ratio}"
        )));
    }

    let n = frame.len();
    let n_test = (n as f64 * test_ratio).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(TrainError::Fit(format!(
            "{n} rows cannot be split into non-empty train and test partitions with ratio {test_ratio}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(n_test);
    Ok((frame.select_rows(train_idx), frame.select_rows(test_idx)))
}
