use thiserror::Error;

/// Errors produced while configuring, fitting, or applying a clustering model.
#[derive(Debug, Error)]
pub enum Error {
    /// A constructor-time option is out of range, or cannot work with the dataset size.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The dataset handed to `fit` or `predict` is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Anchor selection produced fewer distinct anchors than required.
    ///
    /// This signals a defect in the selection weighting or masking, not a
    /// user error. Retrying with the same input fails identically.
    #[error("anchor collision: expected {expected} distinct anchors, found {found}")]
    AnchorCollision { expected: usize, found: usize },

    /// The model was used before `fit`.
    #[error("model has not been fitted")]
    NotFitted,

    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),
}

/// Convenient alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;
