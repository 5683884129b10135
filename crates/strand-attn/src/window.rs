use strand_grid::{GridSize, Point, Volume};
use strand_track::TrajectoryArena;

/// Number of sequence slots reserved for a point and its spatial window.
pub const fn window_capacity(radius: usize) -> usize {
    let side = 2 * radius + 1;
    side * side
}

/// Grid points within Chebyshev distance `radius` of `point` at the same
/// frame, excluding the point itself.
///
/// Offsets are scanned row-major, so the order is fixed; points outside the
/// grid are skipped, which shrinks the list at borders and corners.
pub fn spatial_neighbors(point: Point, radius: usize, size: GridSize) -> Vec<Point> {
    let r = radius as i32;
    let mut neighbors = Vec::with_capacity(window_capacity(radius) - 1);
    for i in -r..=r {
        for j in -r..=r {
            if i == 0 && j == 0 {
                continue;
            }
            if size.contains(point.x + i, point.y + j) {
                neighbors.push(Point::new(point.t, point.x + i, point.y + j));
            }
        }
    }
    neighbors
}

/// Packs every grid point's window and trajectory into fixed-length rows.
///
/// Rows are emitted in row-major `(t, x, y)` order, one per grid point over
/// all frames. Each row has `C + M` slots, where `C` is the window capacity
/// and `M` one less than the longest trajectory of the arena. Slot 0 is the
/// point itself, slots `[1, 1+k)` its `k` in-grid neighbors, and slots
/// `[C, C+m)` the `m` other points of its trajectory; the rest is padded
/// with `(0, 0, 0)` and only the mask separates padding from a real entry
/// at the origin.
///
/// # Returns
///
/// The packed coordinates of shape `[rows, C + M, 3]` and the validity mask
/// of shape `[rows, C + M]`.
pub fn pack_sequences(
    arena: &TrajectoryArena,
    window_radius: usize,
) -> (Volume<i32, 3>, Volume<bool, 2>) {
    let frames = arena.frames();
    let size = arena.size();
    let capacity = window_capacity(window_radius);
    let tail = arena.longest_len().saturating_sub(1);
    let length = capacity + tail;
    let rows = frames * size.len();

    let mut sequences = Volume::from_shape_val([rows, length, 3], 0);
    let mut masks = Volume::from_shape_val([rows, length], false);
    let seq_data = sequences.as_slice_mut();
    let mask_data = masks.as_slice_mut();

    let mut row = 0;
    for t in 0..frames {
        for x in 0..size.height {
            for y in 0..size.width {
                let point = Point::new(t as i32, x as i32, y as i32);
                let seq_row = &mut seq_data[row * length * 3..(row + 1) * length * 3];
                let mask_row = &mut mask_data[row * length..(row + 1) * length];

                write_slot(seq_row, 0, point);
                let neighbors = spatial_neighbors(point, window_radius, size);
                for (offset, neighbor) in neighbors.iter().enumerate() {
                    write_slot(seq_row, 1 + offset, *neighbor);
                }
                mask_row[..1 + neighbors.len()].fill(true);

                if let Some(owner) = arena.owner_of(point) {
                    for (offset, other) in owner.continuation(point).enumerate() {
                        write_slot(seq_row, capacity + offset, other);
                        mask_row[capacity + offset] = true;
                    }
                }
                row += 1;
            }
        }
    }
    (sequences, masks)
}

fn write_slot(row: &mut [i32], slot: usize, point: Point) {
    let base = slot * 3;
    row[base] = point.t;
    row[base + 1] = point.x;
    row[base + 2] = point.y;
}
