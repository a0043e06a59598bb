// src/color.rs

//! Defines the named default colors (`NamedColor`) and RGB565 conversion.
//!
//! The panel consumes 16-bit RGB565 values; everything above it works in 8-bit
//! palette indices. This module is the only place that knows how a 24-bit
//! colour is squeezed into 16 bits.

use serde::{Deserialize, Serialize};

/// A 16-bit RGB565 colour value as streamed to the display.
pub type Rgb565 = u16;

/// Packs 8-bit-per-channel RGB into RGB565 (5 bits red, 6 green, 5 blue).
pub const fn rgb565(r: u8, g: u8, b: u8) -> Rgb565 {
    (((r as u16) & 0xF8) << 8) | (((g as u16) & 0xFC) << 3) | ((b as u16) >> 3)
}

/// Expands an RGB565 value back to 8-bit channels.
///
/// The low bits are filled by replicating the high bits so that full-scale
/// values map to 255 and black maps to 0.
pub const fn rgb565_to_rgb888(c: Rgb565) -> (u8, u8, u8) {
    let r5 = ((c >> 11) & 0x1F) as u8;
    let g6 = ((c >> 5) & 0x3F) as u8;
    let b5 = (c & 0x1F) as u8;
    ((r5 << 3) | (r5 >> 2), (g6 << 2) | (g6 >> 4), (b5 << 3) | (b5 >> 2))
}

/// The 16 colors installed at palette indices 0-15 by the default palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NamedColor {
    White = 0,
    Yellow = 1,
    Orange = 2,
    Red = 3,
    Violet = 4,
    Indigo = 5,
    Blue = 6,
    DeepSkyBlue = 7,
    LimeGreen = 8,
    DarkGreen = 9,
    SaddleBrown = 10,
    Tan = 11,
    LightGray = 12,
    DarkGray = 13,
    DimGray = 14,
    Black = 15,
}

impl NamedColor {
    /// All named colors in palette order.
    pub const ALL: [NamedColor; 16] = [
        NamedColor::White,
        NamedColor::Yellow,
        NamedColor::Orange,
        NamedColor::Red,
        NamedColor::Violet,
        NamedColor::Indigo,
        NamedColor::Blue,
        NamedColor::DeepSkyBlue,
        NamedColor::LimeGreen,
        NamedColor::DarkGreen,
        NamedColor::SaddleBrown,
        NamedColor::Tan,
        NamedColor::LightGray,
        NamedColor::DarkGray,
        NamedColor::DimGray,
        NamedColor::Black,
    ];

    /// Converts a palette index (0-15) to a `NamedColor`.
    /// Returns `None` for indices outside the named range.
    pub fn from_index(idx: u8) -> Option<Self> {
        Self::ALL.get(idx as usize).copied()
    }

    /// The palette index this color occupies in the default palette.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// sRGB components of this color.
    pub const fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            NamedColor::White => (0xFF, 0xFF, 0xFF),
            NamedColor::Yellow => (0xFF, 0xFF, 0x00),
            NamedColor::Orange => (0xFF, 0xA5, 0x00),
            NamedColor::Red => (0xFF, 0x00, 0x00),
            NamedColor::Violet => (0xEE, 0x82, 0xEE),
            NamedColor::Indigo => (0x4B, 0x00, 0x82),
            NamedColor::Blue => (0x00, 0x00, 0xFF),
            NamedColor::DeepSkyBlue => (0x00, 0xBF, 0xFF),
            NamedColor::LimeGreen => (0x32, 0xCD, 0x32),
            NamedColor::DarkGreen => (0x00, 0x64, 0x00),
            NamedColor::SaddleBrown => (0x8B, 0x45, 0x13),
            NamedColor::Tan => (0xD2, 0xB4, 0x8C),
            NamedColor::LightGray => (0xD3, 0xD3, 0xD3),
            NamedColor::DarkGray => (0xA9, 0xA9, 0xA9),
            NamedColor::DimGray => (0x69, 0x69, 0x69),
            NamedColor::Black => (0x00, 0x00, 0x00),
        }
    }

    /// RGB565 value of this color.
    pub const fn to_rgb565(self) -> Rgb565 {
        let (r, g, b) = self.to_rgb();
        rgb565(r, g, b)
    }
}

impl From<NamedColor> for u8 {
    fn from(color: NamedColor) -> Self {
        color.index()
    }
}
