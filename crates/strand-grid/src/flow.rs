use std::ops;

use crate::error::GridError;
use crate::point::GridSize;
use crate::volume::Volume;

/// Flow channel holding column (y-axis) offsets.
pub const COL_CHANNEL: usize = 0;

/// Flow channel holding row (x-axis) offsets.
pub const ROW_CHANNEL: usize = 1;

/// Dense per-step displacement field of shape `[steps, 2, H, W]`.
///
/// One field covers `steps` consecutive frame pairs over an `H`x`W` grid.
/// The channel order is fixed and not symmetric: channel 0 carries the
/// column (y-axis) offset and channel 1 the row (x-axis) offset, matching
/// the layout flow estimators emit. `FlowField<f32>` holds normalized base
/// flow, `FlowField<i32>` holds resampled integer grid steps.
///
/// # Example
///
/// ```
/// use strand_grid::{FlowField, GridSize};
///
/// // One step over a 2x2 grid: every point moves one column right.
/// let field = FlowField::new(
///     1,
///     GridSize::square(2),
///     vec![1, 1, 1, 1, 0, 0, 0, 0],
/// )
/// .unwrap();
/// assert_eq!(field.col_offset(0, 0, 0), 1);
/// assert_eq!(field.row_offset(0, 0, 0), 0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FlowField<T>(Volume<T, 4>);

impl<T> ops::Deref for FlowField<T> {
    type Target = Volume<T, 4>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> ops::DerefMut for FlowField<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T> FlowField<T> {
    /// Creates a flow field from flat row-major data.
    ///
    /// # Arguments
    ///
    /// * `steps` - Number of frame pairs covered by the field.
    /// * `size` - Spatial extent of the grid.
    /// * `data` - `steps * 2 * H * W` values, channel 0 before channel 1
    ///   within each step.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidLength`] if the data length does not
    /// match the shape.
    pub fn new(steps: usize, size: GridSize, data: Vec<T>) -> Result<Self, GridError> {
        let volume = Volume::from_shape_vec([steps, 2, size.height, size.width], data)?;
        Ok(Self(volume))
    }

    /// Wraps an existing volume, checking the channel axis.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidChannelCount`] if the second dimension
    /// is not 2.
    pub fn from_volume(volume: Volume<T, 4>) -> Result<Self, GridError> {
        if volume.shape[1] != 2 {
            return Err(GridError::InvalidChannelCount(volume.shape[1]));
        }
        Ok(Self(volume))
    }

    /// Number of frame pairs covered by the field.
    pub fn steps(&self) -> usize {
        self.0.shape[0]
    }

    /// Spatial extent of the grid.
    pub fn size(&self) -> GridSize {
        GridSize {
            height: self.0.shape[2],
            width: self.0.shape[3],
        }
    }

    /// Consumes the field and returns the underlying volume.
    pub fn into_volume(self) -> Volume<T, 4> {
        self.0
    }
}

impl<T: Copy> FlowField<T> {
    /// Column (y-axis) offset at step `t`, row `x`, column `y`.
    pub fn col_offset(&self, t: usize, x: usize, y: usize) -> T {
        self.0.as_slice()[self.0.offset([t, COL_CHANNEL, x, y])]
    }

    /// Row (x-axis) offset at step `t`, row `x`, column `y`.
    pub fn row_offset(&self, t: usize, x: usize, y: usize) -> T {
        self.0.as_slice()[self.0.offset([t, ROW_CHANNEL, x, y])]
    }
}
