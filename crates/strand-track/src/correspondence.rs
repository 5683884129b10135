use std::collections::{BTreeMap, HashMap};

use log::debug;
use rand::Rng;
use strand_grid::{FlowField, GridSize, Point};

/// One-step point correspondences derived from an integer flow field.
///
/// Each entry maps a source point `(t, x, y)` to its destination at frame
/// `t + 1`. Sources whose displacement lands outside the grid carry no
/// entry, which later ends their trajectory at the source. After
/// [`resolve_conflicts`](CorrespondenceMap::resolve_conflicts) some entries
/// map to [`Point::TERMINAL`] instead, marking edges discarded so that no
/// destination is claimed twice.
#[derive(Clone, Debug)]
pub struct CorrespondenceMap {
    map: HashMap<Point, Point>,
    steps: usize,
    size: GridSize,
}

impl CorrespondenceMap {
    /// Builds the correspondence map from a resampled flow field.
    ///
    /// Every grid point of every step is visited exactly once, in row-major
    /// order. The destination row is offset by the flow's row channel and
    /// the destination column by the flow's column channel; the channel
    /// order is fixed by the estimator layout and is not interchangeable.
    ///
    /// # Arguments
    ///
    /// * `flow` - Integer displacement field of shape `[steps, 2, H, W]`.
    ///
    /// # Example
    ///
    /// ```
    /// use strand_grid::{FlowField, GridSize, Point};
    /// use strand_track::CorrespondenceMap;
    ///
    /// // one step over a 2x2 grid, every point moves one column right
    /// let flow = FlowField::new(1, GridSize::square(2), vec![1, 1, 1, 1, 0, 0, 0, 0]).unwrap();
    /// let map = CorrespondenceMap::from_flow(&flow);
    /// assert_eq!(map.get(Point::new(0, 0, 0)), Some(Point::new(1, 0, 1)));
    /// // the rightmost column flows out of the grid and has no edge
    /// assert_eq!(map.get(Point::new(0, 0, 1)), None);
    /// ```
    pub fn from_flow(flow: &FlowField<i32>) -> Self {
        let steps = flow.steps();
        let size = flow.size();
        let mut map = HashMap::with_capacity(steps * size.len());
        for t in 0..steps {
            for x in 0..size.height {
                for y in 0..size.width {
                    let dest_x = x as i32 + flow.row_offset(t, x, y);
                    let dest_y = y as i32 + flow.col_offset(t, x, y);
                    if size.contains(dest_x, dest_y) {
                        map.insert(
                            Point::new(t as i32, x as i32, y as i32),
                            Point::new(t as i32 + 1, dest_x, dest_y),
                        );
                    }
                }
            }
        }
        debug!(
            "built {} correspondences over {steps} steps on a {size} grid",
            map.len()
        );
        Self { map, steps, size }
    }

    /// Destination of a source point, if it has an outgoing edge.
    pub fn get(&self, source: Point) -> Option<Point> {
        self.map.get(&source).copied()
    }

    /// Number of stored correspondences.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the map holds no correspondences.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of frame pairs the map covers.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Spatial extent of the grid.
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Iterates over `(source, destination)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.map.iter().map(|(s, d)| (*s, *d))
    }

    /// Rewrites many-to-one correspondences so every destination keeps at
    /// most one claimant.
    ///
    /// Sources are grouped by destination; within each conflicting group one
    /// survivor is drawn uniformly at random and every other source is
    /// remapped to [`Point::TERMINAL`]. Groups are visited in destination
    /// order and claimants within a group in row-major source order, so a
    /// seeded generator reproduces the same resolution.
    ///
    /// # Returns
    ///
    /// The number of correspondences remapped to the terminal sentinel.
    pub fn resolve_conflicts<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        let mut claimants: BTreeMap<Point, Vec<Point>> = BTreeMap::new();
        for t in 0..self.steps {
            for x in 0..self.size.height {
                for y in 0..self.size.width {
                    let source = Point::new(t as i32, x as i32, y as i32);
                    if let Some(dest) = self.get(source) {
                        // terminal edges claim nothing
                        if !dest.is_terminal() {
                            claimants.entry(dest).or_default().push(source);
                        }
                    }
                }
            }
        }

        let mut discarded = 0;
        for (_, sources) in claimants {
            if sources.len() < 2 {
                continue;
            }
            let survivor = rng.random_range(0..sources.len());
            for (i, source) in sources.into_iter().enumerate() {
                if i != survivor {
                    self.map.insert(source, Point::TERMINAL);
                    discarded += 1;
                }
            }
        }
        debug!("discarded {discarded} conflicting correspondences");
        discarded
    }
}
