use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::{scanlines, ScanlineOptions};
use crate::types::Colour;

/// Overlay scan lines
#[derive(Args, Debug)]
pub struct ScanlineArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Line thickness
    #[arg(long, default_value_t = 1)]
    pub size: u32,

    /// Distance between lines
    #[arg(long, default_value_t = 4)]
    pub spacing: u32,

    /// Line colour as #RRGGBB or #RRGGBBAA
    #[arg(long, default_value_t = Colour::BLACK)]
    pub colour: Colour,

    #[arg(long, default_value_t = 0)]
    pub size_jitter: u32,

    #[arg(long, default_value_t = 0)]
    pub space_jitter: u32,

    /// Draw columns instead of rows
    #[arg(long)]
    pub vertical: bool,

    /// Seed for reproducible jitter
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run(args: ScanlineArgs, ctx: &Context) -> Result<()> {
    let options = ScanlineOptions {
        line_size: args.size,
        line_spacing: args.spacing,
        colour: args.colour,
        size_jitter: args.size_jitter,
        space_jitter: args.space_jitter,
        vertical: args.vertical,
        seed: ctx.config.seed_or(args.seed),
    };

    ctx.apply(&args.io, "Scanlining", "scanlines", |image| scanlines(image, &options))?;
    Ok(())
}
