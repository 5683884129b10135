use log::debug;
use strand_grid::Point;

use crate::correspondence::CorrespondenceMap;
use crate::error::TrackError;

/// Maximal chain of points connected by one-step correspondences.
///
/// Consecutive elements are one frame apart; a singleton covers a point
/// with no surviving edge on either side.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trajectory(Vec<Point>);

impl Trajectory {
    /// Wraps an ordered list of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Creates a trajectory covering a single point.
    pub fn singleton(point: Point) -> Self {
        Self(vec![point])
    }

    /// The points in temporal order.
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Number of points in the trajectory.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the trajectory holds no points.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The earliest point, if any.
    pub fn first(&self) -> Option<Point> {
        self.0.first().copied()
    }

    /// The latest point, if any.
    pub fn last(&self) -> Option<Point> {
        self.0.last().copied()
    }

    /// The trajectory with `point` removed, in temporal order.
    ///
    /// This is the sequence packed alongside a point's spatial neighbors:
    /// every other point the trajectory visits, both before and after
    /// `point` in time.
    pub fn continuation(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        self.0.iter().copied().filter(move |p| *p != point)
    }
}

/// Chains resolved correspondences into trajectories that cover every
/// space-time grid point exactly once.
///
/// The sweep walks frames in order, keeping a set of active trajectories.
/// At each frame every active trajectory either extends along its last
/// point's edge, claiming the destination, or is finalized when no edge
/// remains. Unclaimed points of the frame then start new trajectories.
/// Afterwards trailing terminal sentinels are dropped, chains that never
/// grew past one point are discarded, and every point left uncovered is
/// re-inserted as a singleton, so the result partitions the grid.
///
/// # Errors
///
/// Returns [`TrackError::PartitionViolation`] if two chains claim the same
/// point, which happens when the map still carries unresolved conflicts.
///
/// # Example
///
/// ```
/// use strand_grid::{FlowField, GridSize};
/// use strand_track::{chain_trajectories, CorrespondenceMap};
///
/// // two steps of zero flow: every pixel tracks itself across 3 frames
/// let flow = FlowField::new(2, GridSize::square(2), vec![0; 16]).unwrap();
/// let map = CorrespondenceMap::from_flow(&flow);
/// let trajectories = chain_trajectories(&map).unwrap();
/// assert_eq!(trajectories.len(), 4);
/// assert!(trajectories.iter().all(|t| t.len() == 3));
/// ```
pub fn chain_trajectories(map: &CorrespondenceMap) -> Result<Vec<Trajectory>, TrackError> {
    let frames = map.steps() + 1;
    let size = map.size();

    let mut finished: Vec<Vec<Point>> = Vec::new();
    let mut active: Vec<Vec<Point>> = Vec::new();
    let mut claimed = vec![false; size.len()];

    for t in 0..frames {
        claimed.fill(false);
        let mut extended = Vec::with_capacity(active.len());
        for mut chain in active.drain(..) {
            let tail = chain[chain.len() - 1];
            match map.get(tail) {
                Some(next) => {
                    if !next.is_terminal() {
                        claimed[size.offset(next.x as usize, next.y as usize)] = true;
                    }
                    chain.push(next);
                    extended.push(chain);
                }
                None => finished.push(chain),
            }
        }
        active = extended;
        for x in 0..size.height {
            for y in 0..size.width {
                if !claimed[size.offset(x, y)] {
                    active.push(vec![Point::new(t as i32, x as i32, y as i32)]);
                }
            }
        }
    }
    finished.append(&mut active);

    // keep only chains that actually connect frames
    let mut trajectories = Vec::new();
    for mut chain in finished {
        if chain.last().is_some_and(Point::is_terminal) {
            chain.pop();
        }
        if chain.len() > 1 {
            trajectories.push(Trajectory::new(chain));
        }
    }

    const EMPTY: usize = usize::MAX;
    let grid_len = size.len();
    let mut owner = vec![EMPTY; frames * grid_len];
    for (index, trajectory) in trajectories.iter().enumerate() {
        for &point in trajectory.points() {
            let slot = point.t as usize * grid_len + size.offset(point.x as usize, point.y as usize);
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

    let chained = trajectories.len();
    for t in 0..frames {
        for x in 0..size.height {
            for y in 0..size.width {
                if owner[t * grid_len + size.offset(x, y)] == EMPTY {
                    trajectories.push(Trajectory::singleton(Point::new(
                        t as i32, x as i32, y as i32,
                    )));
                }
            }
        }
    }
    debug!(
        "chained {chained} trajectories and {} singletons over {frames} frames",
        trajectories.len() - chained
    );

    Ok(trajectories)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use strand_grid::{FlowField, GridSize};

    use super::*;

    fn constant_flow(steps: usize, side: usize, col: i32, row: i32) -> FlowField<i32> {
        let plane = side * side;
        let mut data = Vec::with_capacity(steps * 2 * plane);
        for _ in 0..steps {
            data.extend(std::iter::repeat(col).take(plane));
            data.extend(std::iter::repeat(row).take(plane));
        }
        FlowField::new(steps, GridSize::square(side), data).unwrap()
    }

    #[test]
    fn zero_flow_chains_pixels_straight_through() -> Result<(), TrackError> {
        let map = CorrespondenceMap::from_flow(&constant_flow(2, 8, 0, 0));
        let trajectories = chain_trajectories(&map)?;

        assert_eq!(trajectories.len(), 64);
        for trajectory in &trajectories {
            let first = trajectory.first().unwrap();
            assert_eq!(first.t, 0);
            assert_eq!(
                trajectory.points(),
                &[
                    Point::new(0, first.x, first.y),
                    Point::new(1, first.x, first.y),
                    Point::new(2, first.x, first.y),
                ]
            );
        }
        Ok(())
    }

    #[test]
    fn shifting_flow_ends_chains_at_the_border() -> Result<(), TrackError> {
        // every point moves one column right each step
        let map = CorrespondenceMap::from_flow(&constant_flow(2, 3, 1, 0));
        let trajectories = chain_trajectories(&map)?;

        // column 0 starts a 3-chain, column 1 a 2-chain cut by the border
        let chain_lengths: Vec<usize> = trajectories
            .iter()
            .filter(|t| t.first().unwrap() == Point::new(0, 0, 0) || t.first().unwrap() == Point::new(0, 0, 1))
            .map(Trajectory::len)
            .collect();
        assert!(chain_lengths.contains(&3));
        assert!(chain_lengths.contains(&2));

        // column 2 of frame 0 flows out immediately and stays a singleton
        let lonely = trajectories
            .iter()
            .find(|t| t.first().unwrap() == Point::new(0, 0, 2))
            .unwrap();
        assert_eq!(lonely.len(), 1);
        Ok(())
    }

    #[test]
    fn discarded_sources_become_singletons() -> Result<(), TrackError> {
        // (0,0,0) and (0,0,1) both land on (1,0,0)
        let flow =
            FlowField::new(1, GridSize::square(2), vec![0, -1, 0, 0, 0, 0, 0, 0]).unwrap();
        let mut map = CorrespondenceMap::from_flow(&flow);
        let mut rng = StdRng::seed_from_u64(11);
        map.resolve_conflicts(&mut rng);

        let trajectories = chain_trajectories(&map)?;
        let by_start = |p: Point| {
            trajectories
                .iter()
                .find(|t| t.first().unwrap() == p)
                .unwrap()
        };

        let a = by_start(Point::new(0, 0, 0));
        let b = by_start(Point::new(0, 0, 1));
        let (winner, loser) = if a.len() == 2 { (a, b) } else { (b, a) };
        assert_eq!(winner.last().unwrap(), Point::new(1, 0, 0));
        assert_eq!(loser.len(), 1);

        let total: usize = trajectories.iter().map(Trajectory::len).sum();
        assert_eq!(total, 8);
        Ok(())
    }

    #[test]
    fn unresolved_conflicts_are_detected() {
        let flow =
            FlowField::new(1, GridSize::square(2), vec![0, -1, 0, 0, 0, 0, 0, 0]).unwrap();
        let map = CorrespondenceMap::from_flow(&flow);
        let err = chain_trajectories(&map).unwrap_err();
        assert!(matches!(
            err,
            TrackError::PartitionViolation {
                point: Point { t: 1, x: 0, y: 0 },
                ..
            }
        ));
    }

    #[test]
    fn chains_never_outlive_the_frame_range() -> Result<(), TrackError> {
        let mut rng = StdRng::seed_from_u64(99);
        let side = 6;
        let steps = 4;
        let data: Vec<i32> = (0..steps * 2 * side * side)
            .map(|_| rng.random_range(-2..=2))
            .collect();
        let flow = FlowField::new(steps, GridSize::square(side), data).unwrap();

        let mut map = CorrespondenceMap::from_flow(&flow);
        map.resolve_conflicts(&mut rng);
        let trajectories = chain_trajectories(&map)?;

        let frames = steps + 1;
        for trajectory in &trajectories {
            assert!(trajectory.len() <= frames);
            for pair in trajectory.points().windows(2) {
                assert_eq!(pair[1].t, pair[0].t + 1);
            }
        }
        let total: usize = trajectories.iter().map(Trajectory::len).sum();
        assert_eq!(total, frames * side * side);
        Ok(())
    }

    #[test]
    fn continuation_skips_only_the_query_point() {
        let trajectory = Trajectory::new(vec![
            Point::new(0, 1, 1),
            Point::new(1, 2, 1),
            Point::new(2, 2, 2),
        ]);
        let rest: Vec<Point> = trajectory.continuation(Point::new(1, 2, 1)).collect();
        assert_eq!(rest, vec![Point::new(0, 1, 1), Point::new(2, 2, 2)]);

        let all: Vec<Point> = trajectory.continuation(Point::new(9, 9, 9)).collect();
        assert_eq!(all.len(), 3);
    }
}
