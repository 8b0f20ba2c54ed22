use std::path::{Path, PathBuf};

use clap::Args;

use super::{Context, IoArgs};
use crate::error::Result;
use crate::filters::{
    fracture, voronoi_cells, BorderStyle, CellStyle, FractureOptions, VoronoiCellOptions,
};
use crate::output::dimensions;
use crate::store::{FsImageStore, ImageStore};
use crate::types::Colour;

/// Generate a Voronoi cell image
#[derive(Args, Debug)]
pub struct VoronoiArgs {
    /// Canvas width, rounded down to a multiple of 8
    #[arg(long, default_value_t = 512)]
    pub width: u32,

    /// Canvas height, rounded down to a multiple of 8
    #[arg(long, default_value_t = 512)]
    pub height: u32,

    /// Cell size; smaller means more cells
    #[arg(long, short, default_value_t = 0.1)]
    pub size: f32,

    /// Border width in pixels
    #[arg(long, default_value_t = 3)]
    pub interstice: u32,

    #[arg(long, value_enum, default_value_t = CellStyle::Grayscale)]
    pub style: CellStyle,

    /// Invert the finished image
    #[arg(long)]
    pub invert: bool,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output PNG (default: <output dir>/voronoi.png)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Fracture an image into Voronoi shards
#[derive(Args, Debug)]
pub struct FractureArgs {
    #[command(flatten)]
    pub io: IoArgs,

    /// Cell size; smaller means more shards
    #[arg(long, short, default_value_t = 0.1)]
    pub size: f32,

    /// Border width in pixels
    #[arg(long, default_value_t = 3)]
    pub interstice: u32,

    #[arg(long, value_enum, default_value_t = BorderStyle::Black)]
    pub border: BorderStyle,

    /// Colour for --border color
    #[arg(long, default_value_t = Colour::BLACK)]
    pub colour: Colour,

    /// Black shards on white in the mask
    #[arg(long)]
    pub invert_mask: bool,

    /// Seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_cells(args: VoronoiArgs, ctx: &Context) -> Result<()> {
    let options = VoronoiCellOptions {
        width: args.width,
        height: args.height,
        size: args.size,
        interstice_width: args.interstice,
        style: args.style,
        invert: args.invert,
        seed: ctx.config.seed_or(args.seed),
    };

    ctx.printer.status(
        "Generating",
        &format!("{} cells", dimensions(options.width, options.height)),
    );
    let image = voronoi_cells(&options)?;

    let mut store = match &args.output {
        Some(path) => FsImageStore::for_output(path),
        None => FsImageStore::new(&ctx.config.output, "voronoi"),
    };
    let saved = store.save_bitmap(&image)?;
    ctx.report(&saved);
    Ok(())
}

pub fn run_fracture(args: FractureArgs, ctx: &Context) -> Result<()> {
    let options = FractureOptions {
        size: args.size,
        interstice_width: args.interstice,
        border: args.border,
        custom_colour: args.colour,
        invert_mask: args.invert_mask,
        seed: ctx.config.seed_or(args.seed),
    };

    let mut mask = None;
    let saved = ctx.apply(&args.io, "Fracturing", "fracture", |image| {
        let result = fracture(image, &options)?;
        mask = Some(result.mask);
        Ok(result.image)
    })?;

    if let Some(mask) = mask {
        let path = Path::new(&saved.handle);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let mut store = FsImageStore::new(dir, format!("{}-mask", stem));
        ctx.report(&store.save_bitmap(&mask)?);
    }
    Ok(())
}
