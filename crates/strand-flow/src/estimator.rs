use std::ops;

use strand_grid::{FlowField, GridSize, Volume};

use crate::error::FlowError;

/// A batch of frames laid out `[N, C, H, W]`.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBatch(Volume<f32, 4>);

impl ops::Deref for FrameBatch {
    type Target = Volume<f32, 4>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FrameBatch {
    /// Wraps a `[N, C, H, W]` volume as a batch.
    pub fn from_volume(volume: Volume<f32, 4>) -> Self {
        Self(volume)
    }

    /// Number of frames in the batch.
    pub fn frames(&self) -> usize {
        self.0.shape[0]
    }
}

/// An ordered video clip laid out `[F, C, H, W]`, `F >= 2`.
///
/// The sequence only exists to be split into the two batches consumed by a
/// [`FlowEstimator`]: frames `0..F-1` paired with frames `1..F`.
///
/// # Example
///
/// ```
/// use strand_flow::FrameSequence;
/// use strand_grid::Volume;
///
/// let clip = FrameSequence::new(Volume::zeros([3, 1, 4, 4])).unwrap();
/// assert_eq!(clip.frames(), 3);
/// assert_eq!(clip.leading().frames(), 2);
/// assert_eq!(clip.trailing().frames(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSequence(Volume<f32, 4>);

impl ops::Deref for FrameSequence {
    type Target = Volume<f32, 4>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FrameSequence {
    /// Wraps a `[F, C, H, W]` volume as a frame sequence.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::TooFewFrames`] when `F < 2`; a single frame has
    /// no consecutive pair to estimate flow over.
    pub fn new(volume: Volume<f32, 4>) -> Result<Self, FlowError> {
        if volume.shape[0] < 2 {
            return Err(FlowError::TooFewFrames(volume.shape[0]));
        }
        Ok(Self(volume))
    }

    /// Number of frames.
    pub fn frames(&self) -> usize {
        self.0.shape[0]
    }

    /// Batch of frames `0..F-1`, the "current" side of each pair.
    pub fn leading(&self) -> FrameBatch {
        self.batch_range(0, self.frames() - 1)
    }

    /// Batch of frames `1..F`, the "next" side of each pair.
    pub fn trailing(&self) -> FrameBatch {
        self.batch_range(1, self.frames())
    }

    fn batch_range(&self, start: usize, end: usize) -> FrameBatch {
        let [_, c, h, w] = self.0.shape;
        let frame_len = self.0.strides[0];
        let data = self.0.as_slice()[start * frame_len..end * frame_len].to_vec();
        let volume = Volume::from_shape_vec([end - start, c, h, w], data)
            .expect("frame range length always matches its shape");
        FrameBatch(volume)
    }
}

/// Multi-scale stack of flow fields, ordered coarse to fine.
///
/// Estimators that refine flow over several scales return the whole stack;
/// the pipeline only consumes [`FlowPyramid::finest`].
#[derive(Clone, Debug, PartialEq)]
pub struct FlowPyramid {
    levels: Vec<FlowField<f32>>,
}

impl FlowPyramid {
    /// Creates a pyramid from coarse-to-fine levels.
    pub fn new(levels: Vec<FlowField<f32>>) -> Self {
        Self { levels }
    }

    /// Number of scales.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the pyramid holds no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The finest scale, if any.
    pub fn finest(&self) -> Option<&FlowField<f32>> {
        self.levels.last()
    }

    /// Consumes the pyramid and returns the finest scale.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::EmptyPyramid`] when no levels are present.
    pub fn into_finest(mut self) -> Result<FlowField<f32>, FlowError> {
        self.levels.pop().ok_or(FlowError::EmptyPyramid)
    }
}

/// Opaque pairwise optical-flow estimation capability.
///
/// Implementations wrap whatever network or heuristic produces flow; any
/// preprocessing (resizing frames to the estimator's working resolution,
/// normalization) happens behind this trait. The returned fields carry pixel
/// displacements at the estimator's base resolution.
pub trait FlowEstimator {
    /// Estimates flow from each frame of `current` to the matching frame of
    /// `next`, returning a coarse-to-fine stack whose finest level has shape
    /// `[N, 2, B, B]`.
    fn estimate(&self, current: &FrameBatch, next: &FrameBatch) -> Result<FlowPyramid, FlowError>;
}

/// Constant-displacement estimator for demos and tests.
///
/// Stands in for a real flow network: every pixel of every pair is assigned
/// the same `(col_offset, row_offset)` pixel displacement at
/// `base_resolution`.
#[derive(Clone, Copy, Debug)]
pub struct UniformFlow {
    /// Resolution of the emitted fields.
    pub base_resolution: usize,
    /// Column (y-axis) displacement in base-resolution pixels.
    pub col_offset: f32,
    /// Row (x-axis) displacement in base-resolution pixels.
    pub row_offset: f32,
}

impl UniformFlow {
    /// Creates an estimator that displaces every pixel the same way.
    pub const fn new(base_resolution: usize, col_offset: f32, row_offset: f32) -> Self {
        Self {
            base_resolution,
            col_offset,
            row_offset,
        }
    }
}

impl FlowEstimator for UniformFlow {
    fn estimate(&self, current: &FrameBatch, next: &FrameBatch) -> Result<FlowPyramid, FlowError> {
        if current.shape != next.shape {
            return Err(FlowError::BatchMismatch(
                current.shape.to_vec(),
                next.shape.to_vec(),
            ));
        }
        let steps = current.frames();
        let size = GridSize::square(self.base_resolution);
        let plane = size.len();
        let mut data = Vec::with_capacity(steps * 2 * plane);
        for _ in 0..steps {
            data.extend(std::iter::repeat(self.col_offset).take(plane));
            data.extend(std::iter::repeat(self.row_offset).take(plane));
        }
        let field = FlowField::new(steps, size, data)?;
        Ok(FlowPyramid::new(vec![field]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_sequence(frames: usize) -> FrameSequence {
        // frame f is filled with the value f
        let volume = Volume::from_shape_fn([frames, 1, 2, 2], |[f, _, _, _]| f as f32);
        FrameSequence::new(volume).unwrap()
    }

    #[test]
    fn sequence_rejects_short_clips() {
        let volume = Volume::<f32, 4>::zeros([1, 1, 2, 2]);
        assert_eq!(
            FrameSequence::new(volume).unwrap_err(),
            FlowError::TooFewFrames(1)
        );
    }

    #[test]
    fn leading_and_trailing_are_shifted_views() {
        let clip = ramp_sequence(4);
        let leading = clip.leading();
        let trailing = clip.trailing();
        assert_eq!(leading.shape, [3, 1, 2, 2]);
        assert_eq!(trailing.shape, [3, 1, 2, 2]);
        assert_eq!(leading.get([0, 0, 0, 0]), Some(&0.0));
        assert_eq!(trailing.get([0, 0, 0, 0]), Some(&1.0));
        assert_eq!(leading.get([2, 0, 1, 1]), Some(&2.0));
        assert_eq!(trailing.get([2, 0, 1, 1]), Some(&3.0));
    }

    #[test]
    fn uniform_flow_emits_one_field_per_pair() -> Result<(), FlowError> {
        let clip = ramp_sequence(3);
        let estimator = UniformFlow {
            base_resolution: 4,
            col_offset: 2.0,
            row_offset: -1.0,
        };
        let pyramid = estimator.estimate(&clip.leading(), &clip.trailing())?;
        assert_eq!(pyramid.len(), 1);
        let finest = pyramid.into_finest()?;
        assert_eq!(finest.steps(), 2);
        assert_eq!(finest.size(), GridSize::square(4));
        assert_eq!(finest.col_offset(1, 3, 3), 2.0);
        assert_eq!(finest.row_offset(0, 0, 0), -1.0);
        Ok(())
    }

    #[test]
    fn uniform_flow_rejects_mismatched_batches() {
        let clip = ramp_sequence(3);
        let other = FrameSequence::new(Volume::zeros([3, 1, 4, 4])).unwrap();
        let estimator = UniformFlow {
            base_resolution: 4,
            col_offset: 0.0,
            row_offset: 0.0,
        };
        let err = estimator
            .estimate(&clip.leading(), &other.trailing())
            .unwrap_err();
        assert_eq!(
            err,
            FlowError::BatchMismatch(vec![2, 1, 2, 2], vec![2, 1, 4, 4])
        );
    }

    #[test]
    fn empty_pyramid_has_no_finest() {
        let pyramid = FlowPyramid::new(vec![]);
        assert!(pyramid.finest().is_none());
        assert_eq!(pyramid.into_finest().unwrap_err(), FlowError::EmptyPyramid);
    }
}
