use lidarbox_tensor::GraphError;
use thiserror::Error;

/// An error type for the box codecs.
#[derive(Error, Debug, PartialEq)]
pub enum CodecError {
    /// Paired input slices disagree in shape.
    #[error("Shape mismatch: {0:?} != {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// The number of angle class bins must be positive.
    #[error("The number of angle class bins must be positive.")]
    InvalidBinCount,

    /// Graph evaluation error.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
