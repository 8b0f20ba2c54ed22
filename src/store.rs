//! Image storage behind a small trait.
//!
//! Filters never touch storage themselves. Callers fetch a bitmap by handle,
//! run a filter and save the result, receiving the new handle and its
//! dimensions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{RetroError, Result};
use crate::palettes::increment_filename;
use crate::types::Bitmap;

/// Identity of a stored image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedImage {
    pub handle: String,
    pub width: u32,
    pub height: u32,
}

pub trait ImageStore {
    /// Fetch an image as 8-bit RGB.
    fn get_bitmap(&self, handle: &str) -> Result<Bitmap>;

    /// Store a new image and return its handle.
    fn save_bitmap(&mut self, bitmap: &Bitmap) -> Result<SavedImage>;
}

/// Images on disk. Handles are file paths.
///
/// Saves go to `<dir>/<name>.png` and never overwrite: a taken name gets a
/// numeric suffix from 1.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
    name: String,
}

impl FsImageStore {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }

    /// A store that saves next to `path`, named after its stem.
    pub fn for_output(path: &Path) -> Self {
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "retro".to_string());
        Self::new(dir, name)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Read any supported image file as 8-bit RGB.
pub fn open_bitmap(path: &Path) -> Result<Bitmap> {
    tracing::trace!(path = %path.display(), "load image");
    let image = image::open(path).map_err(|e| RetroError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to read image: {}", e),
    })?;
    Ok(image.to_rgb8())
}

impl ImageStore for FsImageStore {
    fn get_bitmap(&self, handle: &str) -> Result<Bitmap> {
        open_bitmap(Path::new(handle))
    }

    fn save_bitmap(&mut self, bitmap: &Bitmap) -> Result<SavedImage> {
        if !self.dir.as_os_str().is_empty() {
            std::fs::create_dir_all(&self.dir).map_err(|e| RetroError::Io {
                path: self.dir.clone(),
                message: format!("Failed to create output directory: {}", e),
            })?;
        }

        let mut file_name = format!("{}.png", self.name);
        if self.dir.join(&file_name).is_file() {
            file_name = increment_filename(&self.dir, &file_name);
        }
        let path = self.dir.join(file_name);

        bitmap.save(&path).map_err(|e| RetroError::Io {
            path: path.clone(),
            message: format!("Failed to write image: {}", e),
        })?;
        tracing::debug!(path = %path.display(), "saved image");

        Ok(SavedImage {
            handle: path.to_string_lossy().into_owned(),
            width: bitmap.width(),
            height: bitmap.height(),
        })
    }
}

/// Images held in memory, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    images: HashMap<String, Bitmap>,
    next: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl ImageStore for MemoryStore {
    fn get_bitmap(&self, handle: &str) -> Result<Bitmap> {
        self.images.get(handle).cloned().ok_or_else(|| RetroError::Input {
            message: format!("No image with handle '{}'", handle),
            help: None,
        })
    }

    fn save_bitmap(&mut self, bitmap: &Bitmap) -> Result<SavedImage> {
        let handle = format!("image-{}", self.next);
        self.next += 1;
        self.images.insert(handle.clone(), bitmap.clone());
        Ok(SavedImage {
            handle,
            width: bitmap.width(),
            height: bitmap.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::pixelize;
    use image::Rgb;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn tile() -> Bitmap {
        Bitmap::from_fn(6, 4, |x, y| Rgb([x as u8 * 40, y as u8 * 60, 7]))
    }

    #[test]
    fn test_fs_store_roundtrip_without_overwrite() {
        let dir = tempdir().unwrap();
        let mut store = FsImageStore::new(dir.path(), "photo-pixel");

        let first = store.save_bitmap(&tile()).unwrap();
        let second = store.save_bitmap(&tile()).unwrap();

        assert!(first.handle.ends_with("photo-pixel.png"));
        assert!(second.handle.ends_with("photo-pixel1.png"));
        assert_eq!((first.width, first.height), (6, 4));
        assert_eq!(store.get_bitmap(&first.handle).unwrap(), tile());
    }

    #[test]
    fn test_fs_store_creates_directories() {
        let dir = tempdir().unwrap();
        let mut store = FsImageStore::for_output(&dir.path().join("nested/deeper/out.png"));
        let saved = store.save_bitmap(&tile()).unwrap();
        assert_eq!(PathBuf::from(saved.handle), dir.path().join("nested/deeper/out.png"));
    }

    #[test]
    fn test_fs_store_missing_file_is_io_error() {
        let store = FsImageStore::new(".", "x");
        let err = store.get_bitmap("/nonexistent/image.png").unwrap_err();
        assert!(matches!(err, RetroError::Io { .. }));
    }

    #[test]
    fn test_memory_store_pipeline() {
        let mut store = MemoryStore::new();
        let input = store.save_bitmap(&tile()).unwrap();

        let source = store.get_bitmap(&input.handle).unwrap();
        let output = store.save_bitmap(&pixelize(&source, 2, true)).unwrap();

        assert_ne!(input.handle, output.handle);
        assert_eq!(store.len(), 2);
        assert_eq!((output.width, output.height), (6, 4));
        assert!(store.get_bitmap("missing").is_err());
    }
}
