use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::{quantize, QuantizeMethod, QuantizeOptions};

/// Reduce an image to a fixed number of colours
#[derive(Args, Debug)]
pub struct QuantizeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Number of colours (1-256)
    #[arg(long, short, default_value_t = 64)]
    pub colors: usize,

    /// Palette selection method (default: retro.yaml, then median-cut)
    #[arg(long, value_enum)]
    pub method: Option<QuantizeMethod>,

    /// K-means refinement rounds
    #[arg(long, default_value_t = 0)]
    pub kmeans: u32,

    /// Map to the nearest colour without error diffusion
    #[arg(long)]
    pub no_dither: bool,
}

pub fn run(args: QuantizeArgs, ctx: &Context) -> Result<()> {
    let options = QuantizeOptions {
        colors: args.colors,
        method: ctx.config.quantizer_or(args.method, QuantizeMethod::MedianCut),
        kmeans: args.kmeans,
        dither: !args.no_dither,
    };

    ctx.apply(&args.io, "Quantizing", "quant", |image| Ok(quantize(image, &options)))?;
    Ok(())
}
