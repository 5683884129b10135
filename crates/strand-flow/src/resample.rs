use log::debug;
use strand_grid::{FlowField, GridSize, Volume};

use crate::error::FlowError;

/// Normalizes a pixel-displacement field to displacement per base pixel.
///
/// Estimators emit displacements in pixels of their base grid; dividing by
/// the base resolution makes the field resolution-independent so each target
/// level can rescale it with a single multiply.
///
/// # Arguments
///
/// * `flow` - Raw field of shape `[steps, 2, B, B]`.
/// * `base_resolution` - The estimator's base grid side `B`.
///
/// # Errors
///
/// Returns [`FlowError::InvalidResolution`] for a zero base and
/// [`FlowError::UnexpectedFieldSize`] when the field does not cover the
/// base grid.
pub fn normalize_flow(
    flow: &FlowField<f32>,
    base_resolution: usize,
) -> Result<FlowField<f32>, FlowError> {
    if base_resolution == 0 {
        return Err(FlowError::InvalidResolution);
    }
    if flow.size() != GridSize::square(base_resolution) {
        return Err(FlowError::UnexpectedFieldSize {
            expected: base_resolution,
            actual: flow.size(),
        });
    }
    let scale = 1.0 / base_resolution as f32;
    let normalized = flow.map(|v| v * scale);
    Ok(FlowField::from_volume(normalized)?)
}

/// Resamples a normalized flow field to a target resolution and rounds the
/// displacements to integer grid steps.
///
/// Spatial resampling is nearest-neighbor: output cell `(r, c)` reads source
/// cell `(floor(r*H/R), floor(c*W/R))`, which preserves relative
/// displacement magnitudes exactly. The values are then scaled by the
/// target resolution and rounded, turning per-base-pixel displacements into
/// whole steps on the target grid.
///
/// # Arguments
///
/// * `flow` - Normalized field of shape `[steps, 2, H, W]`.
/// * `resolution` - Target grid side `R`.
///
/// # Errors
///
/// Returns [`FlowError::InvalidResolution`] when `resolution` is zero.
pub fn resample_flow(flow: &FlowField<f32>, resolution: usize) -> Result<FlowField<i32>, FlowError> {
    if resolution == 0 {
        return Err(FlowError::InvalidResolution);
    }
    let steps = flow.steps();
    let src = flow.size();
    let src_data = flow.as_slice();

    let volume = Volume::from_shape_fn([steps, 2, resolution, resolution], |[t, ch, r, c]| {
        let sr = r * src.height / resolution;
        let sc = c * src.width / resolution;
        let v = src_data[flow.offset([t, ch, sr, sc])];
        (v * resolution as f32).round() as i32
    });
    debug!(
        "resampled flow {}x{} -> {resolution}x{resolution} over {steps} steps",
        src.height, src.width
    );
    Ok(FlowField::from_volume(volume)?)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use strand_grid::GridError;

    use super::*;

    fn field_from(steps: usize, size: GridSize, data: Vec<f32>) -> FlowField<f32> {
        FlowField::new(steps, size, data).unwrap()
    }

    #[test]
    fn normalize_divides_by_base() -> Result<(), FlowError> {
        let field = field_from(1, GridSize::square(2), vec![8.0, -4.0, 2.0, 0.0, 1.0, 6.0, -2.0, 4.0]);
        let normalized = normalize_flow(&field, 4)?;
        assert_relative_eq!(normalized.col_offset(0, 0, 0), 2.0);
        assert_relative_eq!(normalized.col_offset(0, 0, 1), -1.0);
        assert_relative_eq!(normalized.row_offset(0, 0, 0), 0.25);
        Ok(())
    }

    #[test]
    fn normalize_validates_inputs() {
        let field = field_from(1, GridSize::square(2), vec![0.0; 8]);
        assert_eq!(
            normalize_flow(&field, 0).unwrap_err(),
            FlowError::InvalidResolution
        );
        assert_eq!(
            normalize_flow(&field, 4).unwrap_err(),
            FlowError::UnexpectedFieldSize {
                expected: 4,
                actual: GridSize::square(2),
            }
        );
    }

    #[test]
    fn resample_identity_scales_and_rounds() -> Result<(), FlowError> {
        // same-size resample: only the scale-and-round applies
        let field = field_from(
            1,
            GridSize::square(2),
            vec![0.26, -0.26, 0.1, 0.74, 0.0, 0.0, 0.0, 0.0],
        );
        let resampled = resample_flow(&field, 2)?;
        assert_eq!(resampled.col_offset(0, 0, 0), 1); // 0.52 rounds up
        assert_eq!(resampled.col_offset(0, 0, 1), -1);
        assert_eq!(resampled.col_offset(0, 1, 0), 0); // 0.2 rounds down
        assert_eq!(resampled.col_offset(0, 1, 1), 1);
        assert_eq!(resampled.row_offset(0, 1, 1), 0);
        Ok(())
    }

    #[test]
    fn downsample_reads_floor_mapped_sources() -> Result<(), FlowError> {
        // 4x4 -> 2x2 nearest keeps source cells (0,0), (0,2), (2,0), (2,2)
        let mut data = vec![0.0; 2 * 4 * 4];
        for r in 0..4 {
            for c in 0..4 {
                data[r * 4 + c] = (r * 4 + c) as f32;
            }
        }
        let field = field_from(1, GridSize::square(4), data);
        let resampled = resample_flow(&field, 2)?;
        assert_eq!(resampled.col_offset(0, 0, 0), 0);
        assert_eq!(resampled.col_offset(0, 0, 1), 4); // source value 2, scaled by 2
        assert_eq!(resampled.col_offset(0, 1, 0), 16); // source value 8
        assert_eq!(resampled.col_offset(0, 1, 1), 20); // source value 10
        Ok(())
    }

    #[test]
    fn upsample_repeats_sources() -> Result<(), FlowError> {
        let field = field_from(1, GridSize::square(2), vec![0.5, 1.0, 1.5, 2.0, 0.0, 0.0, 0.0, 0.0]);
        let resampled = resample_flow(&field, 4)?;
        // rows 0..2 map to source row 0, rows 2..4 to source row 1
        assert_eq!(resampled.col_offset(0, 0, 0), 2);
        assert_eq!(resampled.col_offset(0, 1, 1), 2);
        assert_eq!(resampled.col_offset(0, 1, 2), 4);
        assert_eq!(resampled.col_offset(0, 3, 3), 8);
        Ok(())
    }

    #[test]
    fn resample_rejects_zero_resolution() {
        let field = field_from(1, GridSize::square(2), vec![0.0; 8]);
        assert_eq!(
            resample_flow(&field, 0).unwrap_err(),
            FlowError::InvalidResolution
        );
    }

    #[test]
    fn grid_errors_convert() {
        let err = FlowError::from(GridError::InvalidChannelCount(3));
        assert_eq!(err, FlowError::Grid(GridError::InvalidChannelCount(3)));
    }
}
