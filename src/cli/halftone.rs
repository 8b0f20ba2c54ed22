use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::{halftone, HalftoneOptions, Shape};

/// Redraw an image as luminance-filled shapes
#[derive(Args, Debug)]
pub struct HalftoneArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[arg(long, value_enum, default_value_t = Shape::Circle)]
    pub shape: Shape,

    /// Cell edge in pixels
    #[arg(long, short, default_value_t = 16)]
    pub size: u32,

    /// Fixed rotation in degrees
    #[arg(long, default_value_t = 0.0)]
    pub rotation: f32,

    /// Rotate each shape randomly within +/- --threshold degrees
    #[arg(long)]
    pub random: bool,

    #[arg(long, default_value_t = 0)]
    pub threshold: u32,

    /// Random size change per cell
    #[arg(long, default_value_t = 0)]
    pub jitter: u32,

    /// Blend over the colour original
    #[arg(long)]
    pub overlay: bool,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: HalftoneArgs, ctx: &Context) -> Result<()> {
    let options = HalftoneOptions {
        shape: args.shape,
        cell_size: args.size,
        rotation: args.rotation,
        random_rotation: args.random,
        rotation_threshold: args.threshold,
        jitter: args.jitter,
        overlay: args.overlay,
        seed: ctx.config.seed_or(args.seed),
    };

    ctx.apply(&args.io, "Halftoning", "halftone", |image| halftone(image, &options))?;
    Ok(())
}
