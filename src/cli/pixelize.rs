use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::pixelize;

/// Pixelize an image
#[derive(Args, Debug)]
pub struct PixelizeArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Downsample factor (1-30)
    #[arg(long, short, default_value_t = 4)]
    pub factor: u32,

    /// Keep the downsampled size instead of scaling back up
    #[arg(long)]
    pub no_upsample: bool,
}

pub fn run(args: PixelizeArgs, ctx: &Context) -> Result<()> {
    ctx.apply(&args.io, "Pixelizing", "pixel", |image| {
        Ok(pixelize(image, args.factor, !args.no_upsample))
    })?;
    Ok(())
}
