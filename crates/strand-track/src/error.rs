use strand_grid::{GridSize, Point};
use thiserror::Error;

/// Errors raised while chaining correspondences into trajectories.
#[derive(Error, Debug, PartialEq)]
pub enum TrackError {
    /// A trajectory references a point outside the space-time grid.
    #[error("point {0} lies outside a {1} grid with {2} frames")]
    OutOfGrid(Point, GridSize, usize),

    /// A point is claimed by two trajectories.
    #[error("point {point} belongs to trajectories {first} and {second}")]
    PartitionViolation {
        /// The doubly-owned point.
        point: Point,
        /// Index of the trajectory that claimed the point first.
        first: usize,
        /// Index of the trajectory that claimed it again.
        second: usize,
    },

    /// A grid point is covered by no trajectory.
    #[error("no trajectory covers point {0}")]
    MissingPoint(Point),
}
