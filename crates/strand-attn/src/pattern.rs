use strand_grid::{Point, Volume};

/// Packed attention pattern of one resolution level.
///
/// `sequences` has shape `[F, H*W, S, 3]` and `masks` shape `[F, H*W, S]`,
/// where `S` is the per-point sequence length after the trailing-slot
/// selection. Rows follow the packing order: frame-major, then row-major
/// over the grid.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelPatterns {
    resolution: usize,
    sequences: Volume<i32, 4>,
    masks: Volume<bool, 3>,
}

impl LevelPatterns {
    pub(crate) fn new(resolution: usize, sequences: Volume<i32, 4>, masks: Volume<bool, 3>) -> Self {
        Self {
            resolution,
            sequences,
            masks,
        }
    }

    /// Grid side of this level.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Packed point coordinates, shape `[F, H*W, S, 3]`.
    pub fn sequences(&self) -> &Volume<i32, 4> {
        &self.sequences
    }

    /// Validity masks, shape `[F, H*W, S]`.
    pub fn masks(&self) -> &Volume<bool, 3> {
        &self.masks
    }

    /// Number of frames covered by the pattern.
    pub fn frames(&self) -> usize {
        self.sequences.shape[0]
    }

    /// Number of grid points per frame.
    pub fn points(&self) -> usize {
        self.sequences.shape[1]
    }

    /// Number of slots in each packed sequence.
    pub fn sequence_len(&self) -> usize {
        self.sequences.shape[2]
    }

    /// The packed sequence of one grid point, or `None` out of range.
    ///
    /// # Arguments
    ///
    /// * `frame` - Frame index in `[0, F)`.
    /// * `point` - Row-major grid point index in `[0, H*W)`.
    pub fn record(&self, frame: usize, point: usize) -> Option<SequenceRecord> {
        if frame >= self.frames() || point >= self.points() {
            return None;
        }
        let length = self.sequence_len();
        let seq = self.sequences.as_slice();
        let base = (frame * self.points() + point) * length;
        let points = (0..length)
            .map(|slot| {
                let at = (base + slot) * 3;
                Point::new(seq[at], seq[at + 1], seq[at + 2])
            })
            .collect();
        let mask = self.masks.as_slice()[base..base + length].to_vec();
        Some(SequenceRecord { points, mask })
    }
}

/// One point's packed sequence with its validity mask.
#[derive(Clone, Debug, PartialEq)]
pub struct SequenceRecord {
    /// The packed slots, padding included.
    pub points: Vec<Point>,
    /// Which slots hold real entries.
    pub mask: Vec<bool>,
}

impl SequenceRecord {
    /// The slots the mask marks as real, in packing order.
    pub fn valid_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points
            .iter()
            .zip(self.mask.iter())
            .filter(|(_, &m)| m)
            .map(|(p, _)| *p)
    }
}

/// Patterns for every configured resolution level of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct TrajectoryPatterns {
    levels: Vec<LevelPatterns>,
}

impl TrajectoryPatterns {
    pub(crate) fn new(levels: Vec<LevelPatterns>) -> Self {
        Self { levels }
    }

    /// The levels in configuration order.
    pub fn levels(&self) -> &[LevelPatterns] {
        &self.levels
    }

    /// The pattern computed for a resolution, if configured.
    pub fn get(&self, resolution: usize) -> Option<&LevelPatterns> {
        self.levels.iter().find(|l| l.resolution == resolution)
    }

    /// Number of levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the run produced no levels.
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Consumes the set and returns the levels in configuration order.
    pub fn into_levels(self) -> Vec<LevelPatterns> {
        self.levels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_level() -> LevelPatterns {
        // 1 frame, 2 points, 2 slots
        let sequences = Volume::from_shape_vec(
            [1, 2, 2, 3],
            vec![0, 0, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0],
        )
        .unwrap();
        let masks =
            Volume::from_shape_vec([1, 2, 2], vec![true, true, true, false]).unwrap();
        LevelPatterns::new(2, sequences, masks)
    }

    #[test]
    fn records_follow_the_packing_order() {
        let level = tiny_level();
        assert_eq!(level.frames(), 1);
        assert_eq!(level.points(), 2);
        assert_eq!(level.sequence_len(), 2);

        let record = level.record(0, 1).unwrap();
        assert_eq!(record.points[0], Point::new(0, 0, 1));
        let valid: Vec<Point> = record.valid_points().collect();
        assert_eq!(valid, vec![Point::new(0, 0, 1)]);

        assert!(level.record(1, 0).is_none());
        assert!(level.record(0, 2).is_none());
    }

    #[test]
    fn levels_are_keyed_by_resolution() {
        let patterns = TrajectoryPatterns::new(vec![tiny_level()]);
        assert_eq!(patterns.len(), 1);
        assert!(patterns.get(2).is_some());
        assert!(patterns.get(64).is_none());
    }
}
