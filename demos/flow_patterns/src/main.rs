use argh::FromArgs;
use strand::attn::{sample_trajectories_with_cancel, CancelToken, ResolutionLevel, SamplerConfig};
use strand::flow::{FrameSequence, UniformFlow};
use strand::grid::Volume;

#[derive(FromArgs)]
/// Sample multi-resolution trajectory attention patterns from synthetic flow
struct Args {
    /// number of frames in the synthetic clip
    #[argh(option, short = 'f', default = "4")]
    frames: usize,

    /// base resolution of the synthetic flow estimator
    #[argh(option, short = 'b', default = "64")]
    base_resolution: usize,

    /// column displacement in base pixels per step
    #[argh(option, short = 'x', default = "2.0")]
    col_offset: f32,

    /// row displacement in base pixels per step
    #[argh(option, short = 'y', default = "0.0")]
    row_offset: f32,

    /// seed for reproducible conflict resolution
    #[argh(option, short = 's')]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = argh::from_env();
    env_logger::init();

    let cancel = CancelToken::new();
    ctrlc::set_handler({
        let cancel = cancel.clone();
        move || {
            println!("Received Ctrl-C, stopping at the next level boundary");
            cancel.cancel();
        }
    })?;

    // synthetic clip; a real caller would decode video frames here
    let volume = Volume::from_shape_fn(
        [args.frames, 3, args.base_resolution, args.base_resolution],
        |[f, c, x, y]| ((f + c + x + y) % 255) as f32 / 255.0,
    );
    let frames = FrameSequence::new(volume)?;
    let estimator = UniformFlow::new(args.base_resolution, args.col_offset, args.row_offset);

    let mut config = SamplerConfig::new(args.base_resolution).with_levels(vec![
        ResolutionLevel::new(args.base_resolution / 4, 2),
        ResolutionLevel::new(args.base_resolution / 8, 1),
    ]);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let patterns = sample_trajectories_with_cancel(&frames, &estimator, &config, &cancel)?;

    for level in patterns.levels() {
        println!(
            "resolution {:>3}: sequences {:?}, masks {:?}",
            level.resolution(),
            level.sequences().shape,
            level.masks().shape
        );
    }
    if let Some(record) = patterns.levels().first().and_then(|l| l.record(0, 0)) {
        println!("valid slots of the first record:");
        for point in record.valid_points() {
            println!("  {point}");
        }
    }

    Ok(())
}
