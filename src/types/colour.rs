//! Colour type, hex parsing and luma.

use std::fmt;
use std::str::FromStr;

use image::Rgb;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{RetroError, Result};

/// An RGBA colour value.
///
/// Palettes only ever hold opaque colours; alpha matters for overlays such
/// as scan lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Colour {
    /// Create a new colour from RGBA components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque colour from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Opaque gray with all three channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Parse a hex colour string.
    ///
    /// Accepts `#RGB`, `#RGBA`, `#RRGGBB` and `#RRGGBBAA`; the `#` is optional.
    pub fn from_hex(s: &str) -> Result<Self> {
        let s = s.trim();
        let hex = s.strip_prefix('#').unwrap_or(s);

        let channels: Vec<u8> = match hex.len() {
            3 | 4 => hex
                .chars()
                .map(|c| parse_nibble(c).map(|n| n << 4 | n))
                .collect::<Result<_>>()?,
            6 | 8 => (0..hex.len())
                .step_by(2)
                .map(|i| parse_byte(hex.get(i..i + 2).unwrap_or("")))
                .collect::<Result<_>>()?,
            _ => {
                return Err(RetroError::Parse {
                    message: format!("Invalid hex colour: {}", s),
                    help: Some("Use #RGB, #RGBA, #RRGGBB, or #RRGGBBAA format".to_string()),
                })
            }
        };

        let alpha = channels.get(3).copied().unwrap_or(255);
        Ok(Self::new(channels[0], channels[1], channels[2], alpha))
    }

    /// The colour as an `image` RGB pixel, dropping alpha.
    pub fn to_rgb(self) -> Rgb<u8> {
        Rgb([self.r, self.g, self.b])
    }

    /// Channel-wise inverse (alpha preserved).
    pub fn inverse(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b, self.a)
    }

    /// Same colour with red and blue swapped.
    pub fn swap_rb(self) -> Self {
        Self::new(self.b, self.g, self.r, self.a)
    }
}

/// ITU-R 601 luma with integer rounding: `(299 R + 587 G + 114 B) / 1000`.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 299 + g as u32 * 587 + b as u32 * 114 + 500) / 1000) as u8
}

impl From<Rgb<u8>> for Colour {
    fn from(px: Rgb<u8>) -> Self {
        Self::rgb(px[0], px[1], px[2])
    }
}

impl From<[u8; 3]> for Colour {
    fn from(c: [u8; 3]) -> Self {
        Self::rgb(c[0], c[1], c[2])
    }
}

impl FromStr for Colour {
    type Err = RetroError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02X}", self.a)?;
        }
        Ok(())
    }
}

impl Serialize for Colour {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Colour {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Colour::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_nibble(c: char) -> Result<u8> {
    c.to_digit(16)
        .map(|d| d as u8)
        .ok_or_else(|| RetroError::Parse {
            message: format!("Invalid hex digit: {}", c),
            help: None,
        })
}

fn parse_byte(s: &str) -> Result<u8> {
    u8::from_str_radix(s, 16).map_err(|_| RetroError::Parse {
        message: format!("Invalid hex byte: {}", s),
        help: None,
    })
}
