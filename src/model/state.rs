/// Marker for a model that has **not yet been fitted**.
///
/// Only fitting is available in this state; `predict` does not exist until the
/// model is converted to [`Fitted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unfitted;

/// Marker for a model that has been **fitted**.
///
/// A `Fitted` model carries only inference parameters and implements
/// [`InferenceModel`](crate::model::InferenceModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fitted;
