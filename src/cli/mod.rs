pub mod completions;
pub mod crt;
pub mod dither;
pub mod halftone;
pub mod palette;
pub mod palettize;
pub mod pixelize;
pub mod quantize;
pub mod retroize;
pub mod scanlines;
pub mod voronoi;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::{dimensions, display_path, Printer};
use crate::store::{FsImageStore, ImageStore, SavedImage};
use crate::types::Bitmap;

/// retroize - Retro image filters
#[derive(Parser, Debug)]
#[command(name = "retroize")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Directory holding retro.yaml
    #[arg(long, global = true, default_value = ".")]
    pub project: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Downsample with area averaging, then blow back up with hard edges
    Pixelize(pixelize::PixelizeArgs),

    /// Reduce an image to a fixed number of colours
    Quantize(quantize::QuantizeArgs),

    /// Remap an image onto a palette
    Palettize(palettize::PalettizeArgs),

    /// Crush an image to black and white
    Bitize(dither::BitizeArgs),

    /// Dither onto the 216-colour web palette
    Ditherize(dither::DitherizeArgs),

    /// Redraw an image as luminance-filled shapes
    Halftone(halftone::HalftoneArgs),

    /// Emulate a curved CRT screen
    Crt(crt::CrtArgs),

    /// Overlay scan lines
    Scanlines(scanlines::ScanlineArgs),

    /// Generate a Voronoi cell image
    Voronoi(voronoi::VoronoiArgs),

    /// Fracture an image into Voronoi shards with a mask
    Fracture(voronoi::FractureArgs),

    /// Extract and list palettes
    Palette(palette::PaletteArgs),

    /// Pixelize, palettize, quantize and dither in one pass
    Retroize(retroize::RetroizeArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Input and output paths shared by the image commands.
#[derive(Args, Debug, Clone)]
pub struct IoArgs {
    /// Input image
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output PNG (default: <output dir>/<input>-<command>.png)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// State shared by every command: configuration and the status printer.
pub struct Context {
    pub config: Config,
    pub printer: Printer,
}

impl Context {
    pub fn load(project: &Path) -> Result<Self> {
        Ok(Self {
            config: Config::discover(project)?,
            printer: Printer::new(),
        })
    }

    /// Store for a command's output: `--output` when given, otherwise a
    /// name derived from the input inside the configured output directory.
    pub fn output_store(&self, output: Option<&Path>, input: &Path, suffix: &str) -> FsImageStore {
        match output {
            Some(path) => FsImageStore::for_output(path),
            None => {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string());
                FsImageStore::new(&self.config.output, format!("{}-{}", stem, suffix))
            }
        }
    }

    /// Load the input, run `filter` on it and save the result.
    pub fn apply(
        &self,
        io: &IoArgs,
        verb: &str,
        suffix: &str,
        filter: impl FnOnce(&Bitmap) -> Result<Bitmap>,
    ) -> Result<SavedImage> {
        let mut store = self.output_store(io.output.as_deref(), &io.input, suffix);
        let image = store.get_bitmap(&io.input.to_string_lossy())?;

        self.printer.status(
            verb,
            &format!(
                "{} {}",
                display_path(&io.input),
                self.printer.dim(&format!("({})", dimensions(image.width(), image.height())))
            ),
        );

        let out = filter(&image)?;
        let saved = store.save_bitmap(&out)?;
        self.report(&saved);
        Ok(saved)
    }

    pub fn report(&self, saved: &SavedImage) {
        self.printer.success(
            "Wrote",
            &format!(
                "{} {}",
                display_path(Path::new(&saved.handle)),
                self.printer.dim(&format!("({})", dimensions(saved.width, saved.height)))
            ),
        );
    }
}

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    let ctx = Context::load(&cli.project)?;

    match cli.command {
        Commands::Pixelize(args) => pixelize::run(args, &ctx),
        Commands::Quantize(args) => quantize::run(args, &ctx),
        Commands::Palettize(args) => palettize::run(args, &ctx),
        Commands::Bitize(args) => dither::run_bitize(args, &ctx),
        Commands::Ditherize(args) => dither::run_ditherize(args, &ctx),
        Commands::Halftone(args) => halftone::run(args, &ctx),
        Commands::Crt(args) => crt::run(args, &ctx),
        Commands::Scanlines(args) => scanlines::run(args, &ctx),
        Commands::Voronoi(args) => voronoi::run_cells(args, &ctx),
        Commands::Fracture(args) => voronoi::run_fracture(args, &ctx),
        Commands::Palette(args) => palette::run(args, &ctx),
        Commands::Retroize(args) => retroize::run(args, &ctx),
        Commands::Completions(args) => completions::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_output_name() {
        let ctx = Context {
            config: Config::default(),
            printer: Printer::plain(),
        };
        let store = ctx.output_store(None, Path::new("shots/beach.jpg"), "crt");
        assert_eq!(store.dir(), Path::new("out"));
    }
}
