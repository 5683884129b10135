use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use strand_attn::{build_level, pack_sequences, ResolutionLevel};
use strand_grid::{FlowField, GridSize};
use strand_track::{chain_trajectories, CorrespondenceMap, TrajectoryArena};

fn sample_arena(steps: usize, side: usize) -> TrajectoryArena {
    let mut rng = StdRng::seed_from_u64(23);
    let data = (0..steps * 2 * side * side)
        .map(|_| rng.random_range(-1..=1))
        .collect();
    let flow = FlowField::new(steps, GridSize::square(side), data).unwrap();
    let mut map = CorrespondenceMap::from_flow(&flow);
    map.resolve_conflicts(&mut rng);
    TrajectoryArena::build(chain_trajectories(&map).unwrap(), steps + 1, flow.size()).unwrap()
}

fn bench_window(c: &mut Criterion) {
    let mut group = c.benchmark_group("Window");

    let arena = sample_arena(15, 32);
    group.bench_function("pack_sequences", |b| {
        b.iter(|| pack_sequences(black_box(&arena), 2))
    });

    let mut rng = StdRng::seed_from_u64(23);
    let normalized = FlowField::new(
        15,
        GridSize::square(64),
        (0..15 * 2 * 64 * 64)
            .map(|_| rng.random_range(-0.05..0.05))
            .collect(),
    )
    .unwrap();
    group.bench_function("build_level_32", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(23),
            |mut rng| build_level(black_box(&normalized), ResolutionLevel::new(32, 1), &mut rng),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_window);
criterion_main!(benches);
