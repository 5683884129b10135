use strand_flow::FlowError;
use strand_grid::GridError;
use strand_track::TrackError;
use thiserror::Error;

/// Errors raised while sampling trajectory attention patterns.
#[derive(Error, Debug, PartialEq)]
pub enum PatternError {
    /// The configured base resolution is zero.
    #[error("base resolution must be non-zero")]
    InvalidBaseResolution,

    /// A configured level carries a zero resolution.
    #[error("level {index} has resolution {resolution}, expected non-zero")]
    InvalidLevel {
        /// Position of the level in the configuration.
        index: usize,
        /// The rejected resolution.
        resolution: usize,
    },

    /// The estimated flow does not cover one step per frame pair.
    #[error("flow covers {actual} steps, expected {expected}")]
    WrongStepCount {
        /// Steps required by the frame count.
        expected: usize,
        /// Steps the estimator produced.
        actual: usize,
    },

    /// Sampling stopped at a cancellation point.
    #[error("pattern sampling was cancelled")]
    Cancelled,

    /// Flow estimation or resampling failed.
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// Trajectory chaining failed.
    #[error(transparent)]
    Track(#[from] TrackError),

    /// A dense buffer could not be built or reshaped.
    #[error(transparent)]
    Grid(#[from] GridError),
}
