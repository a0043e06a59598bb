// src/font.rs

//! Fixed-size monochrome bitmap fonts.
//!
//! A font is a table of 256 glyphs, one per byte value, each stored as a
//! packed monochrome bitmap (rows padded to whole bytes, MSB leftmost) at a
//! uniform stride of `ceil(width / 8) * height` bytes. The character code is
//! the table index.

use crate::bitmap::MonoBitmap;
use anyhow::{bail, Result};
use log::debug;
use std::borrow::Cow;

/// Number of glyphs in every font table.
pub const GLYPH_COUNT: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    data: Cow<'static, [u8]>,
    width: usize,
    height: usize,
    stride: usize,
}

impl Font {
    /// Wraps a glyph table of `width * height` glyphs.
    ///
    /// Fails if either dimension is zero or the table is shorter than
    /// `256 * glyph_stride` bytes.
    pub fn new(data: impl Into<Cow<'static, [u8]>>, width: usize, height: usize) -> Result<Self> {
        let data = data.into();
        if width == 0 || height == 0 {
            bail!("font glyphs must be at least 1x1, got {}x{}", width, height);
        }
        let stride = Self::stride_for(width, height);
        let needed = GLYPH_COUNT * stride;
        if data.len() < needed {
            bail!(
                "font table for {}x{} glyphs needs {} bytes, got {}",
                width,
                height,
                needed,
                data.len()
            );
        }
        debug!("Font: {}x{} glyphs, stride {} bytes", width, height, stride);
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// The built-in 8x8 font: printable ASCII from `font8x8`, codes 128..=255 blank.
    pub fn default_8x8() -> Self {
        let mut data = vec![0u8; GLYPH_COUNT * 8];
        for (glyph, rows) in data.chunks_exact_mut(8).zip(font8x8::legacy::BASIC_LEGACY.iter()) {
            // font8x8 stores the leftmost pixel in bit 0.
            for (dst, src) in glyph.iter_mut().zip(rows) {
                *dst = src.reverse_bits();
            }
        }
        Self {
            data: Cow::Owned(data),
            width: 8,
            height: 8,
            stride: 8,
        }
    }

    fn stride_for(width: usize, height: usize) -> usize {
        MonoBitmap::row_bytes(width) * height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bytes per glyph.
    pub fn glyph_stride(&self) -> usize {
        self.stride
    }

    /// Bitmap of the glyph for `code`.
    pub fn glyph(&self, code: u8) -> MonoBitmap<'_> {
        let start = usize::from(code) * self.stride;
        MonoBitmap::from_checked(&self.data[start..start + self.stride], self.width, self.height)
    }
}

impl Default for Font {
    fn default() -> Self {
        Self::default_8x8()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn stride_rounds_rows_up_to_bytes() {
        let font = Font::new(vec![0u8; 256 * 2 * 12], 12, 12).unwrap();
        assert_eq!(font.glyph_stride(), 24);
        let font = Font::new(vec![0u8; 256 * 8], 8, 8).unwrap();
        assert_eq!(font.glyph_stride(), 8);
    }

    #[test]
    fn short_or_empty_tables_are_rejected() {
        assert!(Font::new(vec![0u8; 256 * 8 - 1], 8, 8).is_err());
        assert!(Font::new(vec![0u8; 16], 0, 8).is_err());
        assert!(Font::new(Vec::new(), 8, 0).is_err());
    }

    #[test]
    fn glyph_indexes_by_code() {
        let mut data = vec![0u8; 256];
        data[b'A' as usize] = 0b1010_0000;
        data[255] = 0x80;
        // 3x1 glyphs: one byte each.
        let font = Font::new(data, 3, 1).unwrap();
        let a = font.glyph(b'A');
        assert!(a.bit(0, 0));
        assert!(!a.bit(1, 0));
        assert!(a.bit(2, 0));
        assert!(font.glyph(255).bit(0, 0));
        assert!(!font.glyph(b'B').bit(0, 0));
    }

    #[test]
    fn default_font_is_msb_first() {
        let font = Font::default_8x8();
        assert_eq!((font.width(), font.height()), (8, 8));
        // Top row of 'A' in font8x8 is 0x0C: pixels 2 and 3 from the left.
        let a = font.glyph(b'A');
        let top: Vec<bool> = (0..8).map(|u| a.bit(u, 0)).collect();
        assert_eq!(top, [false, false, true, true, false, false, false, false]);
        // Space and the upper half of the table are blank.
        for code in [b' ', 200u8, 255] {
            let g = font.glyph(code);
            assert!((0..8).all(|v| (0..8).all(|u| !g.bit(u, v))), "code {}", code);
        }
    }
}
