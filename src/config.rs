//! Project configuration (retro.yaml).
//!
//! Sets where palettes live, where outputs go and the defaults shared by
//! every command. A missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RetroError, Result};
use crate::filters::QuantizeMethod;
use crate::palettes::PaletteLibrary;

/// The name of the configuration file.
pub const CONFIG_FILENAME: &str = "retro.yaml";

/// Configuration loaded from retro.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Palette library directory.
    #[serde(default = "default_palette_dir")]
    pub palette_dir: PathBuf,

    /// Output directory for filtered images.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Seed for the random filters. Unset means a fresh seed per run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Quantizer for `quantize` and `palettize`. Unset leaves each command
    /// its own default.
    #[serde(default)]
    pub quantizer: Option<QuantizeMethod>,
}

fn default_palette_dir() -> PathBuf {
    PathBuf::from("palettes")
}

fn default_output() -> PathBuf {
    PathBuf::from("out")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            palette_dir: default_palette_dir(),
            output: default_output(),
            seed: None,
            quantizer: None,
        }
    }
}

impl Config {
    /// Load configuration from a retro.yaml file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RetroError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str::<Option<Self>>(content)
            .map(Option::unwrap_or_default)
            .map_err(|e| RetroError::Parse {
                message: format!("Invalid config: {}", e),
                help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
            })
    }

    /// Load `retro.yaml` from `dir`, or defaults when there is none.
    ///
    /// Relative paths in the file are resolved against `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILENAME);
        if !path.is_file() {
            tracing::trace!(path = %path.display(), "no config, using defaults");
            return Ok(Self::default());
        }

        let mut config = Self::load(&path)?;
        if config.palette_dir.is_relative() {
            config.palette_dir = dir.join(&config.palette_dir);
        }
        if config.output.is_relative() {
            config.output = dir.join(&config.output);
        }
        Ok(config)
    }

    pub fn library(&self) -> PaletteLibrary {
        PaletteLibrary::new(&self.palette_dir)
    }

    /// An explicit method wins over the configured one, which wins over
    /// the command's own default.
    pub fn quantizer_or(&self, explicit: Option<QuantizeMethod>, fallback: QuantizeMethod) -> QuantizeMethod {
        explicit.or(self.quantizer).unwrap_or(fallback)
    }

    /// An explicit seed wins over the configured one.
    pub fn seed_or(&self, explicit: Option<u64>) -> Option<u64> {
        explicit.or(self.seed)
    }
}
