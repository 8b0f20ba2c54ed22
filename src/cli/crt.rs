use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::{crt_emulate, CrtParams};

/// Emulate a curved CRT screen
#[derive(Args, Debug)]
pub struct CrtArgs {
    #[command(flatten)]
    pub io: IoArgs,

    #[arg(long, default_value_t = 240.0)]
    pub width: f32,

    #[arg(long, default_value_t = 160.0)]
    pub height: f32,

    /// Smaller bends harder
    #[arg(long, default_value_t = 3.0)]
    pub curvature: f32,

    #[arg(long, default_value_t = 1.0)]
    pub scanline_opacity: f32,

    #[arg(long, default_value_t = 0.5)]
    pub vignette_opacity: f32,

    #[arg(long, default_value_t = 5.0)]
    pub vignette_roundness: f32,

    #[arg(long, default_value_t = 1.2)]
    pub brightness: f32,
}

pub fn run(args: CrtArgs, ctx: &Context) -> Result<()> {
    let params = CrtParams {
        virtual_width: args.width,
        virtual_height: args.height,
        curvature: args.curvature,
        scanline_opacity: args.scanline_opacity,
        vignette_opacity: args.vignette_opacity,
        vignette_roundness: args.vignette_roundness,
        brightness: args.brightness,
    };

    ctx.apply(&args.io, "Emulating", "crt", |image| crt_emulate(image, &params))?;
    Ok(())
}
