use log::debug;
use strand_grid::{GridSize, Point};

use crate::chain::Trajectory;
use crate::error::TrackError;

const EMPTY: usize = usize::MAX;

/// Trajectories of one resolution pass plus a point-to-trajectory index.
///
/// Trajectories are stored in a flat array and every grid point holds the
/// index of its owner, so lookups during sequence packing are a single
/// array read instead of a scan. Building the arena verifies the partition
/// invariant: each of the `frames * H * W` points is owned exactly once.
#[derive(Clone, Debug)]
pub struct TrajectoryArena {
    trajectories: Vec<Trajectory>,
    owner: Vec<usize>,
    frames: usize,
    size: GridSize,
}

impl TrajectoryArena {
    /// Indexes a set of trajectories over a space-time grid.
    ///
    /// # Arguments
    ///
    /// * `trajectories` - Chains expected to partition the grid.
    /// * `frames` - Number of frames `T`.
    /// * `size` - Spatial extent of each frame.
    ///
    /// # Errors
    ///
    /// * [`TrackError::OutOfGrid`] if a trajectory leaves the grid.
    /// * [`TrackError::PartitionViolation`] if a point is owned twice.
    /// * [`TrackError::MissingPoint`] if a point is owned by no trajectory.
    pub fn build(
        trajectories: Vec<Trajectory>,
        frames: usize,
        size: GridSize,
    ) -> Result<Self, TrackError> {
        let mut owner = vec![EMPTY; frames * size.len()];
        for (index, trajectory) in trajectories.iter().enumerate() {
            for &point in trajectory.points() {
                let slot = point_slot(point, frames, size)
                    .ok_or(TrackError::OutOfGrid(point, size, frames))?;
                if owner[slot] != EMPTY {
                    return Err(TrackError::PartitionViolation {
                        point,
                        first: owner[slot],
                        second: index,
                    });
                }
                owner[slot] = index;
            }
        }
        if let Some(slot) = owner.iter().position(|&o| o == EMPTY) {
            return Err(TrackError::MissingPoint(slot_point(slot, size)));
        }
        debug!(
            "indexed {} trajectories over {frames} frames on a {size} grid",
            trajectories.len()
        );
        Ok(Self {
            trajectories,
            owner,
            frames,
            size,
        })
    }

    /// The trajectory owning a point, or `None` outside the grid.
    pub fn owner_of(&self, point: Point) -> Option<&Trajectory> {
        let slot = point_slot(point, self.frames, self.size)?;
        self.trajectories.get(self.owner[slot])
    }

    /// Length of the longest trajectory, or 0 for an empty arena.
    pub fn longest_len(&self) -> usize {
        self.trajectories
            .iter()
            .map(Trajectory::len)
            .max()
            .unwrap_or(0)
    }

    /// The stored trajectories.
    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    /// Number of stored trajectories.
    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    /// Whether the arena holds no trajectories.
    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    /// Number of frames covered by the arena.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Spatial extent of each frame.
    pub fn size(&self) -> GridSize {
        self.size
    }
}

fn point_slot(point: Point, frames: usize, size: GridSize) -> Option<usize> {
    if point.t < 0 || point.t as usize >= frames || !size.contains(point.x, point.y) {
        return None;
    }
    Some(point.t as usize * size.len() + size.offset(point.x as usize, point.y as usize))
}

fn slot_point(slot: usize, size: GridSize) -> Point {
    let plane = size.len();
    let t = slot / plane;
    let x = (slot % plane) / size.width;
    let y = (slot % plane) % size.width;
    Point::new(t as i32, x as i32, y as i32)
}
