use std::path::PathBuf;

use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::{palettize, resolve_palette, PalettizeOptions, QuantizeMethod};
use crate::output::plural;
use crate::store::open_bitmap;

/// Remap an image onto a palette
#[derive(Args, Debug)]
pub struct PalettizeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Palette file or name in the palette library
    #[arg(long, short)]
    pub palette: Option<String>,

    /// Image to take the palette from when --palette is not given
    #[arg(long)]
    pub palette_image: Option<PathBuf>,

    /// Reduce the input to 256 colours first
    #[arg(long)]
    pub prequantize: bool,

    /// Quantizer for --prequantize (default: retro.yaml, then fast-octree)
    #[arg(long, value_enum)]
    pub method: Option<QuantizeMethod>,

    /// Diffuse the matching error
    #[arg(long)]
    pub dither: bool,
}

pub fn run(args: PalettizeArgs, ctx: &Context) -> Result<()> {
    let palette_image = match &args.palette_image {
        Some(path) => Some(open_bitmap(path)?),
        None => None,
    };
    let palette = resolve_palette(
        palette_image.as_ref(),
        args.palette.as_deref(),
        &ctx.config.library(),
    )?;
    ctx.printer.info("Palette", &plural(palette.len(), "colour", "colours"));

    let options = PalettizeOptions {
        prequantize: args.prequantize,
        method: ctx.config.quantizer_or(args.method, QuantizeMethod::FastOctree),
        dither: args.dither,
    };

    ctx.apply(&args.io, "Palettizing", "palette", |image| {
        Ok(palettize(image, &palette, &options))
    })?;
    Ok(())
}
