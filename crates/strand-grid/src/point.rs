/// Discrete space-time coordinate within a resolution level.
///
/// `t` is the frame index, `x` the row index (height axis) and `y` the
/// column index (width axis). Signed storage leaves room for the two
/// sentinel values used across the pipeline: [`Point::PADDING`] fills the
/// unused tail of packed sequences and [`Point::TERMINAL`] marks a
/// correspondence discarded during conflict resolution.
///
/// # Example
///
/// ```
/// use strand_grid::Point;
///
/// let p = Point::new(0, 3, 3);
/// assert_eq!(p.t, 0);
/// assert!(!p.is_terminal());
/// assert_eq!(Point::PADDING, Point::new(0, 0, 0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    /// Frame index.
    pub t: i32,
    /// Row index within the grid (height axis).
    pub x: i32,
    /// Column index within the grid (width axis).
    pub y: i32,
}

impl Point {
    /// Padding sentinel for unused sequence slots.
    ///
    /// The value collides with the legitimate coordinate at frame 0, row 0,
    /// column 0; the accompanying mask is the only way to tell a padded slot
    /// from a real entry.
    pub const PADDING: Point = Point::new(0, 0, 0);

    /// Terminal sentinel marking a conflict-terminated correspondence.
    pub const TERMINAL: Point = Point::new(-1, -1, -1);

    /// Creates a point from frame, row and column indices.
    pub const fn new(t: i32, x: i32, y: i32) -> Self {
        Self { t, x, y }
    }

    /// Whether this point is the terminal sentinel.
    pub fn is_terminal(&self) -> bool {
        *self == Self::TERMINAL
    }
}

impl From<(i32, i32, i32)> for Point {
    fn from((t, x, y): (i32, i32, i32)) -> Self {
        Self { t, x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.t, self.x, self.y)
    }
}

/// Spatial extent of one resolution level's grid.
///
/// # Example
///
/// ```
/// use strand_grid::GridSize;
///
/// let size = GridSize::square(8);
/// assert_eq!(size.len(), 64);
/// assert!(size.contains(7, 0));
/// assert!(!size.contains(8, 0));
/// assert!(!size.contains(-1, 3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridSize {
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl GridSize {
    /// Creates a square grid of side `resolution`.
    pub const fn square(resolution: usize) -> Self {
        Self {
            height: resolution,
            width: resolution,
        }
    }

    /// Number of grid points per frame.
    pub fn len(&self) -> usize {
        self.height * self.width
    }

    /// Whether the grid holds no points.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the (row, column) pair lies inside the grid.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as usize) < self.height && y >= 0 && (y as usize) < self.width
    }

    /// Row-major flat index of an in-bounds (row, column) pair.
    pub fn offset(&self, x: usize, y: usize) -> usize {
        x * self.width + y
    }
}

impl std::fmt::Display for GridSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}
