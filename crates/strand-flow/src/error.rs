use strand_grid::{GridError, GridSize};
use thiserror::Error;

/// An error type for flow estimation and resampling.
#[derive(Error, Debug, PartialEq)]
pub enum FlowError {
    /// A target or base resolution of zero.
    #[error("resolution must be non-zero")]
    InvalidResolution,

    /// The flow field does not cover the expected base grid.
    #[error("flow field is {actual} for base resolution {expected}")]
    UnexpectedFieldSize {
        /// Configured base resolution.
        expected: usize,
        /// Spatial extent the field actually covers.
        actual: GridSize,
    },

    /// Fewer than two frames, so no pairwise flow can be computed.
    #[error("at least two frames are required, got {0}")]
    TooFewFrames(usize),

    /// The two frame batches handed to an estimator differ in shape.
    #[error("frame batches differ in shape: {0:?} vs {1:?}")]
    BatchMismatch(Vec<usize>, Vec<usize>),

    /// A flow pyramid with no levels.
    #[error("flow pyramid has no levels")]
    EmptyPyramid,

    /// An opaque estimator backend failure.
    #[error("flow estimator failed: {0}")]
    Estimator(String),

    /// Grid container error.
    #[error(transparent)]
    Grid(#[from] GridError),
}
