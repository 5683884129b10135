use num_traits::Zero;

use crate::error::GridError;

/// Computes the strides for a row-major layout.
///
/// The rightmost dimension has stride 1 and each dimension's stride is the
/// product of all dimensions to its right.
pub fn strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides = [0; N];
    let mut stride = 1;
    for i in (0..N).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// An owned n-dimensional array with row-major layout.
///
/// `Volume` backs every dense buffer in the pipeline: normalized and
/// resampled flow fields, packed point sequences and their masks. It keeps
/// only what those uses need (a shape, the derived strides and a flat
/// `Vec<T>`) and checks element counts at every construction site.
///
/// # Example
///
/// ```
/// use strand_grid::Volume;
///
/// let v = Volume::from_shape_vec([2, 3], vec![0i32, 1, 2, 3, 4, 5]).unwrap();
/// assert_eq!(v.strides, [3, 1]);
/// assert_eq!(v.get([1, 2]), Some(&5));
/// assert_eq!(v.get([2, 0]), None);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Volume<T, const N: usize> {
    /// The extent of each dimension.
    pub shape: [usize; N],
    /// The row-major strides derived from the shape.
    pub strides: [usize; N],
    data: Vec<T>,
}

impl<T, const N: usize> Volume<T, N> {
    /// Creates a volume from a shape and flat row-major data.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidLength`] if the data length does not
    /// match the product of the shape dimensions.
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, GridError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(GridError::InvalidLength(shape.to_vec(), numel, data.len()));
        }
        Ok(Self {
            shape,
            strides: strides_from_shape(shape),
            data,
        })
    }

    /// Creates a volume filled with a single value.
    pub fn from_shape_val(shape: [usize; N], value: T) -> Self
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self {
            shape,
            strides: strides_from_shape(shape),
            data: vec![value; numel],
        }
    }

    /// Creates a volume by evaluating `f` at every index.
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Self
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let data = (0..numel)
            .map(|i| {
                let mut index = [0; N];
                let mut rest = i;
                for k in (0..N).rev() {
                    index[k] = rest % shape[k];
                    rest /= shape[k];
                }
                f(index)
            })
            .collect();
        Self {
            shape,
            strides: strides_from_shape(shape),
            data,
        }
    }

    /// Creates a zero-filled volume.
    pub fn zeros(shape: [usize; N]) -> Self
    where
        T: Clone + Zero,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// Total number of elements.
    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// Flat offset of an index, without bounds checking.
    pub fn offset(&self, index: [usize; N]) -> usize {
        index
            .iter()
            .zip(self.strides.iter())
            .map(|(i, s)| i * s)
            .sum()
    }

    /// Element at the given index, or `None` when out of bounds.
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        for (i, dim) in index.iter().zip(self.shape.iter()) {
            if i >= dim {
                return None;
            }
        }
        self.data.get(self.offset(index))
    }

    /// The data as a flat row-major slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The data as a mutable flat row-major slice.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the volume and returns the underlying vector.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Reinterprets the data under a new shape with the same element count.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ShapeMismatch`] if the element counts differ.
    pub fn into_shape<const M: usize>(self, shape: [usize; M]) -> Result<Volume<T, M>, GridError> {
        let numel = shape.iter().product::<usize>();
        if numel != self.data.len() {
            return Err(GridError::ShapeMismatch(
                self.shape.to_vec(),
                shape.to_vec(),
            ));
        }
        Ok(Volume {
            shape,
            strides: strides_from_shape(shape),
            data: self.data,
        })
    }

    /// Applies a function to each element, producing a new volume.
    pub fn map<U, F>(&self, f: F) -> Volume<U, N>
    where
        F: Fn(&T) -> U,
    {
        Volume {
            shape: self.shape,
            strides: self.strides,
            data: self.data.iter().map(&f).collect(),
        }
    }
}
