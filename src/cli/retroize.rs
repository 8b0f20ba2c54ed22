use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::{retroize, RetroizeOptions};

/// Pixelize, palettize, quantize and dither in one pass
#[derive(Args, Debug)]
pub struct RetroizeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Pixelize factor (1-30)
    #[arg(long, short, default_value_t = 4)]
    pub downsample: u32,

    /// Keep the downsampled size
    #[arg(long)]
    pub no_upsample: bool,

    /// Palette file or library name to remap onto
    #[arg(long, short)]
    pub palette: Option<String>,

    /// Quantize to this many colours
    #[arg(long, short)]
    pub colors: Option<usize>,

    /// Finish with a web-palette dither
    #[arg(long)]
    pub dither: bool,
}

pub fn run(args: RetroizeArgs, ctx: &Context) -> Result<()> {
    let palette = match args.palette.as_deref() {
        Some(reference) => Some(ctx.config.library().load(reference)?),
        None => None,
    };

    let options = RetroizeOptions {
        downsample: args.downsample,
        upsample: !args.no_upsample,
        palette,
        colors: args.colors,
        dither: args.dither,
    };

    ctx.apply(&args.io, "Retroizing", "retro", |image| Ok(retroize(image, &options)))?;
    Ok(())
}
