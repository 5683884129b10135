use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use strand_flow::{normalize_flow, resample_flow, FlowEstimator, FrameSequence};
use strand_grid::{FlowField, GridSize, Volume};
use strand_track::{chain_trajectories, CorrespondenceMap, TrajectoryArena};

use crate::cancel::CancelToken;
use crate::config::{ResolutionLevel, SamplerConfig};
use crate::error::PatternError;
use crate::pattern::{LevelPatterns, TrajectoryPatterns};
use crate::window::pack_sequences;

/// Runs one resolution level over normalized flow.
///
/// The flow is resampled to the level's grid, chained into a trajectory
/// partition and packed into per-point sequences. The randomness drives
/// conflict resolution only; pass a seeded generator for reproducible
/// output.
///
/// # Arguments
///
/// * `flow` - Normalized flow field of shape `[T-1, 2, B, B]`.
/// * `level` - Target resolution and window radius.
/// * `rng` - Source for conflict tie-breaks.
///
/// # Errors
///
/// Propagates resampling and chaining failures.
pub fn build_level<R: Rng + ?Sized>(
    flow: &FlowField<f32>,
    level: ResolutionLevel,
    rng: &mut R,
) -> Result<LevelPatterns, PatternError> {
    let frames = flow.steps() + 1;
    let size = GridSize::square(level.resolution);

    let resampled = resample_flow(flow, level.resolution)?;
    let mut map = CorrespondenceMap::from_flow(&resampled);
    map.resolve_conflicts(rng);
    let arena = TrajectoryArena::build(chain_trajectories(&map)?, frames, size)?;
    debug!(
        "level {}: {} trajectories, longest {}",
        level.resolution,
        arena.len(),
        arena.longest_len()
    );

    let (sequences, masks) = pack_sequences(&arena, level.window_radius);
    let (sequences, masks) = select_trailing(sequences, masks, frames);

    let slots = sequences.shape[1];
    let sequences = sequences.into_shape([frames, size.len(), slots, 3])?;
    let masks = masks.into_shape([frames, size.len(), slots])?;
    Ok(LevelPatterns::new(level.resolution, sequences, masks))
}

/// Keeps slot 0 and the last `F - 1` slots of every packed row.
///
/// The downstream attention layout expects one slot per frame rather than
/// the full window-plus-trajectory row. When a row is shorter than `F - 1`
/// the whole row is kept behind slot 0.
fn select_trailing(
    sequences: Volume<i32, 3>,
    masks: Volume<bool, 2>,
    frames: usize,
) -> (Volume<i32, 3>, Volume<bool, 2>) {
    let [rows, length, _] = sequences.shape;
    let take = (frames - 1).min(length);
    let start = length - take;

    let seq = sequences.as_slice();
    let selected_seq = Volume::from_shape_fn([rows, 1 + take, 3], |[row, slot, d]| {
        let at = if slot == 0 { 0 } else { start + slot - 1 };
        seq[(row * length + at) * 3 + d]
    });
    let mask = masks.as_slice();
    let selected_mask = Volume::from_shape_fn([rows, 1 + take], |[row, slot]| {
        let at = if slot == 0 { 0 } else { start + slot - 1 };
        mask[row * length + at]
    });
    (selected_seq, selected_mask)
}

fn level_rng(seed: Option<u64>, resolution: usize) -> StdRng {
    match seed {
        // decorrelate levels sharing one run seed
        Some(seed) => {
            StdRng::seed_from_u64(seed ^ (resolution as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
        }
        None => StdRng::from_os_rng(),
    }
}

/// Samples trajectory attention patterns for every configured level.
///
/// The estimator runs once over the whole sequence; its finest flow is
/// normalized by the base resolution and handed to each level. Levels are
/// independent and computed in parallel.
///
/// # Example
///
/// ```
/// use strand_attn::{sample_trajectories, ResolutionLevel, SamplerConfig};
/// use strand_flow::{FrameSequence, UniformFlow};
/// use strand_grid::Volume;
///
/// let frames = FrameSequence::new(Volume::from_shape_val([3, 1, 8, 8], 0.5)).unwrap();
/// let estimator = UniformFlow::new(8, 0.0, 0.0);
/// let config = SamplerConfig::new(8)
///     .with_levels(vec![ResolutionLevel::new(4, 1)])
///     .with_seed(7);
/// let patterns = sample_trajectories(&frames, &estimator, &config).unwrap();
/// assert_eq!(patterns.get(4).unwrap().frames(), 3);
/// ```
///
/// # Errors
///
/// Fails on invalid configuration, estimator failure, or a flow stack that
/// does not cover one step per frame pair.
pub fn sample_trajectories<E: FlowEstimator>(
    frames: &FrameSequence,
    estimator: &E,
    config: &SamplerConfig,
) -> Result<TrajectoryPatterns, PatternError> {
    sample_trajectories_with_cancel(frames, estimator, config, &CancelToken::new())
}

/// Like [`sample_trajectories`], stopping at the next level boundary once
/// `cancel` fires.
pub fn sample_trajectories_with_cancel<E: FlowEstimator>(
    frames: &FrameSequence,
    estimator: &E,
    config: &SamplerConfig,
    cancel: &CancelToken,
) -> Result<TrajectoryPatterns, PatternError> {
    config.validate()?;

    let pyramid = estimator.estimate(&frames.leading(), &frames.trailing())?;
    let flow = pyramid.into_finest()?;
    let expected = frames.frames() - 1;
    if flow.steps() != expected {
        return Err(PatternError::WrongStepCount {
            expected,
            actual: flow.steps(),
        });
    }
    let normalized = normalize_flow(&flow, config.base_resolution)?;
    info!(
        "sampling {} levels over {} frames at base {}",
        config.levels.len(),
        frames.frames(),
        config.base_resolution
    );

    let levels = config
        .levels
        .par_iter()
        .map(|&level| {
            if cancel.is_cancelled() {
                return Err(PatternError::Cancelled);
            }
            let mut rng = level_rng(config.seed, level.resolution);
            build_level(&normalized, level, &mut rng)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TrajectoryPatterns::new(levels))
}
