//! Feature preprocessing.
//!
//! Transformers follow the same fitted/unfitted split as the models: an
//! unfitted [`Transformer`] learns from the training partition and produces a
//! [`FittedTransformer`] whose parameters are frozen and serializable.

pub mod error;
pub mod scaling;
pub mod traits;

pub use error::PreprocessingError;
pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
pub use traits::{FittedTransformer, Transformer};
