//! Palette library: a directory of palette PNGs.
//!
//! Palettes are stored as 1xN RGB images, one pixel per colour. Names are
//! paths relative to the library root without the `.png` extension, e.g.
//! `gameboy` or `consoles/nes`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{RetroError, Result};
use crate::filters::extract_palette;
use crate::types::Palette;

const EXTENSION: &str = ".png";

/// Placeholder in a palette name that is replaced by the next free number.
pub const NUMBER_TOKEN: &str = "\\x";

/// A directory of palette images.
#[derive(Debug, Clone)]
pub struct PaletteLibrary {
    root: PathBuf,
}

impl PaletteLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names of every palette under the library root, sorted.
    ///
    /// A missing root is an empty library.
    pub fn list(&self) -> Vec<String> {
        if !self.root.exists() {
            return Vec::new();
        }

        let mut names: Vec<String> = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let relative = e.path().strip_prefix(&self.root).ok()?;
                let name = relative.to_str()?.replace('\\', "/");
                name.strip_suffix(EXTENSION).map(str::to_string)
            })
            .collect();

        names.sort();
        names
    }

    /// Find the file for a palette reference.
    ///
    /// Accepts a direct file path or a library name with or without the
    /// extension. Surrounding double quotes are ignored.
    pub fn resolve(&self, reference: &str) -> Option<PathBuf> {
        let reference = reference.replace('"', "");
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        let direct = PathBuf::from(reference);
        let candidates = [
            direct.clone(),
            self.root.join(reference),
            self.root.join(format!("{}{}", reference, EXTENSION)),
        ];

        let found = candidates.into_iter().find(|p| p.is_file());
        tracing::trace!(reference, found = ?found, "resolve palette");
        found
    }

    /// Load a palette by path or library name.
    ///
    /// Images with more than 256 colours are reduced with the palette
    /// extractor.
    pub fn load(&self, reference: &str) -> Result<Palette> {
        let path = self.resolve(reference).ok_or_else(|| RetroError::Input {
            message: format!("Palette '{}' not found", reference),
            help: Some(format!(
                "Pass a PNG path or a name from `retroize palette list` ({})",
                self.root.display()
            )),
        })?;

        load_palette_file(&path)
    }

    /// Save a palette into `subfolder` under the library root.
    ///
    /// `.png` is appended when missing. A `\x` in the name becomes the first
    /// number from 0 that gives an unused file name; a name that still
    /// collides gets a numeric suffix from 1. Returns the written path.
    pub fn save(&self, palette: &Palette, subfolder: &str, name: &str) -> Result<PathBuf> {
        let dir = if subfolder.is_empty() {
            self.root.clone()
        } else {
            self.root.join(subfolder)
        };

        std::fs::create_dir_all(&dir).map_err(|e| RetroError::Io {
            path: dir.clone(),
            message: format!("Failed to create palette folder: {}", e),
        })?;

        let mut file_name = name.to_string();
        if !file_name.contains(EXTENSION) {
            file_name.push_str(EXTENSION);
        }
        if file_name.contains(NUMBER_TOKEN) {
            file_name = numberize_filename(&dir, &file_name);
        }
        if dir.join(&file_name).is_file() {
            file_name = increment_filename(&dir, &file_name);
        }

        let path = dir.join(file_name);
        palette.to_bitmap().save(&path).map_err(|e| RetroError::Io {
            path: path.clone(),
            message: format!("Failed to write palette: {}", e),
        })?;

        tracing::debug!(path = %path.display(), colours = palette.len(), "saved palette");
        Ok(path)
    }
}

/// Read a palette from a PNG file.
pub fn load_palette_file(path: &Path) -> Result<Palette> {
    let image = image::open(path)
        .map_err(|e| RetroError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read palette: {}", e),
        })?
        .to_rgb8();

    match Palette::from_bitmap(&image) {
        Some(palette) => Ok(palette),
        None => extract_palette(&image),
    }
}

fn stem(name: &str) -> &str {
    name.split(EXTENSION).next().unwrap_or(name)
}

/// First `<stem><n>.png` with `n >= 1` that does not exist in `dir`.
pub fn increment_filename(dir: &Path, name: &str) -> String {
    let stem = stem(name);
    (1u32..)
        .map(|n| format!("{}{}{}", stem, n, EXTENSION))
        .find(|candidate| !dir.join(candidate).is_file())
        .unwrap_or_else(|| name.to_string())
}

/// Replace the `\x` token with the first `n >= 0` giving an unused name.
pub fn numberize_filename(dir: &Path, name: &str) -> String {
    let stem = stem(name);
    (0u32..)
        .map(|n| format!("{}{}", stem.replace(NUMBER_TOKEN, &n.to_string()), EXTENSION))
        .find(|candidate| !dir.join(candidate).is_file())
        .unwrap_or_else(|| name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Colour;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn two_colour() -> Palette {
        Palette::from_colours([Colour::rgb(255, 0, 0), Colour::rgb(0, 0, 255)]).unwrap()
    }

    #[test]
    fn test_increment_filename() {
        let dir = tempdir().unwrap();
        assert_eq!(increment_filename(dir.path(), "warm.png"), "warm1.png");

        fs::write(dir.path().join("warm1.png"), b"").unwrap();
        fs::write(dir.path().join("warm2.png"), b"").unwrap();
        assert_eq!(increment_filename(dir.path(), "warm.png"), "warm3.png");
    }

    #[test]
    fn test_numberize_filename() {
        let dir = tempdir().unwrap();
        assert_eq!(numberize_filename(dir.path(), "ramp\\x.png"), "ramp0.png");

        fs::write(dir.path().join("ramp0.png"), b"").unwrap();
        assert_eq!(numberize_filename(dir.path(), "ramp\\x.png"), "ramp1.png");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let library = PaletteLibrary::new(dir.path());

        let path = library.save(&two_colour(), "mine", "duo").unwrap();
        assert_eq!(path, dir.path().join("mine/duo.png"));

        let loaded = library.load("mine/duo").unwrap();
        assert_eq!(loaded, two_colour());
    }

    #[test]
    fn test_save_never_overwrites() {
        let dir = tempdir().unwrap();
        let library = PaletteLibrary::new(dir.path());

        let first = library.save(&two_colour(), "", "duo.png").unwrap();
        let second = library.save(&two_colour(), "", "duo.png").unwrap();
        let third = library.save(&two_colour(), "", "series\\x").unwrap();
        let fourth = library.save(&two_colour(), "", "series\\x").unwrap();

        assert_eq!(first.file_name().unwrap(), "duo.png");
        assert_eq!(second.file_name().unwrap(), "duo1.png");
        assert_eq!(third.file_name().unwrap(), "series0.png");
        assert_eq!(fourth.file_name().unwrap(), "series1.png");
    }

    #[test]
    fn test_list_walks_subfolders() {
        let dir = tempdir().unwrap();
        let library = PaletteLibrary::new(dir.path());
        library.save(&two_colour(), "consoles", "nes").unwrap();
        library.save(&two_colour(), "", "gameboy").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a palette").unwrap();

        assert_eq!(library.list(), vec!["consoles/nes", "gameboy"]);
    }

    #[test]
    fn test_list_missing_root() {
        let library = PaletteLibrary::new("/nonexistent/palettes");
        assert!(library.list().is_empty());
    }

    #[test]
    fn test_load_strips_quotes_and_accepts_paths() {
        let dir = tempdir().unwrap();
        let library = PaletteLibrary::new(dir.path().join("lib"));
        let outside = PaletteLibrary::new(dir.path());
        let path = outside.save(&two_colour(), "", "loose").unwrap();

        let quoted = format!("\"{}\"", path.display());
        assert_eq!(library.load(&quoted).unwrap(), two_colour());
    }

    #[test]
    fn test_load_missing_is_input_error() {
        let dir = tempdir().unwrap();
        let library = PaletteLibrary::new(dir.path());
        let err = library.load("nope").unwrap_err();
        assert!(matches!(err, RetroError::Input { .. }));
    }
}
