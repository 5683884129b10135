use thiserror::Error;

/// An error type for grid container operations.
#[derive(Error, Debug, PartialEq)]
pub enum GridError {
    /// The data length does not match the product of the shape dimensions.
    #[error("shape {0:?} expects {1} elements, got {2}")]
    InvalidLength(Vec<usize>, usize, usize),

    /// The element counts of two shapes differ.
    #[error("cannot reinterpret shape {0:?} as {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// The channel axis of a flow field must hold exactly two channels.
    #[error("flow field carries {0} channels, expected 2")]
    InvalidChannelCount(usize),
}
