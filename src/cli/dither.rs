use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::{ditherize_1bit, ditherize_palette};

/// Crush an image to black and white
#[derive(Args, Debug)]
pub struct BitizeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Threshold at mid-gray instead of dithering
    #[arg(long)]
    pub no_dither: bool,
}

/// Dither onto the web palette
#[derive(Args, Debug)]
pub struct DitherizeArgs {
    #[command(flatten)]
    pub io: IoArgs,
}

pub fn run_bitize(args: BitizeArgs, ctx: &Context) -> Result<()> {
    ctx.apply(&args.io, "Bitizing", "1bit", |image| {
        Ok(ditherize_1bit(image, !args.no_dither))
    })?;
    Ok(())
}

pub fn run_ditherize(args: DitherizeArgs, ctx: &Context) -> Result<()> {
    ctx.apply(&args.io, "Dithering", "dither", |image| Ok(ditherize_palette(image)))?;
    Ok(())
}
