use std::path::PathBuf;

use clap::{Args, Subcommand};

use super::Context;
use crate::error::{RetroError, Result};
use crate::filters::extract_palette;
use crate::output::{display_path, plural};
use crate::store::open_bitmap;

/// Extract and list palettes
#[derive(Args, Debug)]
pub struct PaletteArgs {
    #[command(subcommand)]
    pub command: PaletteCommand,
}

#[derive(Subcommand, Debug)]
pub enum PaletteCommand {
    /// Extract up to 256 colours from an image
    Extract(ExtractArgs),

    /// List palettes in the palette library
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Image to extract colours from
    #[arg(required = true)]
    pub input: PathBuf,

    /// Save into the palette library under this name ("\x" numbers it)
    #[arg(long)]
    pub save: Option<String>,

    /// Library subfolder for --save
    #[arg(long, default_value = "")]
    pub subfolder: String,

    /// Print colours as a JSON array
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print names as a JSON array
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PaletteArgs, ctx: &Context) -> Result<()> {
    match args.command {
        PaletteCommand::Extract(args) => extract(args, ctx),
        PaletteCommand::List(args) => list(args, ctx),
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| RetroError::Parse {
        message: format!("Failed to serialize: {}", e),
        help: None,
    })
}

fn extract(args: ExtractArgs, ctx: &Context) -> Result<()> {
    let image = open_bitmap(&args.input)?;
    let palette = extract_palette(&image)?;

    ctx.printer.status(
        "Extracted",
        &format!(
            "{} from {}",
            plural(palette.len(), "colour", "colours"),
            display_path(&args.input)
        ),
    );

    if let Some(name) = &args.save {
        let path = ctx.config.library().save(&palette, &args.subfolder, name)?;
        ctx.printer.success("Saved", &display_path(&path));
    }

    if args.json {
        println!("{}", to_json(palette.colours())?);
    } else {
        println!("{}", palette.to_hex_lines());
    }
    Ok(())
}

fn list(args: ListArgs, ctx: &Context) -> Result<()> {
    let library = ctx.config.library();
    let names = library.list();

    if names.is_empty() {
        ctx.printer.warning(
            "Empty",
            &format!("no palettes in {}", display_path(library.root())),
        );
    } else {
        ctx.printer.info("Found", &plural(names.len(), "palette", "palettes"));
    }

    if args.json {
        println!("{}", to_json(&names)?);
    } else {
        for name in &names {
            println!("{}", name);
        }
    }
    Ok(())
}
