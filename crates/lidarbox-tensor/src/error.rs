use thiserror::Error;

/// An error type for graph evaluation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// The number of bound input columns does not match the graph's input slots.
    #[error("Expected {0} input columns, got {1}.")]
    InputArity(usize, usize),

    /// Bound input columns disagree in length.
    #[error("Input lanes disagree in length: {0} != {1}.")]
    LaneMismatch(usize, usize),
}
