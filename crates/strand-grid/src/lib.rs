#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the grid module.
pub mod error;

/// Dense optical-flow field containers.
pub mod flow;

/// Discrete space-time coordinates and grid extents.
pub mod point;

/// Owned n-dimensional storage.
pub mod volume;

pub use crate::error::GridError;
pub use crate::flow::FlowField;
pub use crate::point::{GridSize, Point};
pub use crate::volume::Volume;
