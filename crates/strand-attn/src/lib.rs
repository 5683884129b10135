#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Cooperative cancellation for long sampling runs.
pub mod cancel;

/// Resolution levels and sampler configuration.
pub mod config;

/// Per-level pipeline and the multi-resolution driver.
pub mod driver;

/// Error types for pattern sampling.
pub mod error;

/// Packed pattern containers and per-point records.
pub mod pattern;

/// Spatial windows and fixed-length sequence packing.
pub mod window;

pub use crate::cancel::CancelToken;
pub use crate::config::{ResolutionLevel, SamplerConfig};
pub use crate::driver::{build_level, sample_trajectories, sample_trajectories_with_cancel};
pub use crate::error::PatternError;
pub use crate::pattern::{LevelPatterns, SequenceRecord, TrajectoryPatterns};
pub use crate::window::{pack_sequences, spatial_neighbors, window_capacity};
