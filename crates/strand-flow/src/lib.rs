#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the flow module.
pub mod error;

/// Optical-flow estimation seam and frame batching.
pub mod estimator;

/// Flow normalization and grid resampling.
pub mod resample;

pub use crate::error::FlowError;
pub use crate::estimator::{FlowEstimator, FlowPyramid, FrameBatch, FrameSequence, UniformFlow};
pub use crate::resample::{normalize_flow, resample_flow};
