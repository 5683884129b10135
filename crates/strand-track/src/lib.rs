#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Trajectory storage with a point-to-owner index.
pub mod arena;

/// Chaining of correspondences into grid-partitioning trajectories.
pub mod chain;

/// Point correspondences from flow and conflict resolution.
pub mod correspondence;

/// Error types for the track module.
pub mod error;

pub use crate::arena::TrajectoryArena;
pub use crate::chain::{chain_trajectories, Trajectory};
pub use crate::correspondence::CorrespondenceMap;
pub use crate::error::TrackError;
