// src/text.rs

//! Monospaced text layout on top of the monochrome blit.
//!
//! Layout is a plain byte walk: every byte is either a control code that
//! moves the cursor or a glyph index. There is no wrapping and no bounds
//! pre-check; glyphs that fall off the canvas are clipped pixel by pixel.

use crate::canvas::Canvas;
use crate::font::Font;

const BACKSPACE: u8 = 0x08;
const NEWLINE: u8 = 0x0A;

/// One layout step of a byte string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutToken {
    /// Draw glyph `code` at the cursor, then advance one cell.
    Glyph(u8),
    /// Move the cursor back one cell.
    Backspace,
    /// Return to column 0 and move down one line.
    Newline,
}

impl From<u8> for LayoutToken {
    fn from(byte: u8) -> Self {
        match byte {
            BACKSPACE => LayoutToken::Backspace,
            NEWLINE => LayoutToken::Newline,
            code => LayoutToken::Glyph(code),
        }
    }
}

/// Splits a byte string into layout tokens.
pub fn tokenize(bytes: &[u8]) -> impl Iterator<Item = LayoutToken> + '_ {
    bytes.iter().copied().map(LayoutToken::from)
}

/// Glyph magnification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GlyphScale {
    #[default]
    Normal,
    /// Twice the size, smoothed with Scale2x.
    Double,
}

impl GlyphScale {
    pub fn factor(self) -> i64 {
        match self {
            GlyphScale::Normal => 1,
            GlyphScale::Double => 2,
        }
    }
}

/// Saturates a layout coordinate into the canvas coordinate type.
fn to_coord(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Draws text with a borrowed font.
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer<'f> {
    font: &'f Font,
}

impl<'f> TextRenderer<'f> {
    pub fn new(font: &'f Font) -> Self {
        Self { font }
    }

    pub fn font(&self) -> &'f Font {
        self.font
    }

    /// Draws a single glyph with its top-left corner at `(x, y)`.
    pub fn draw_char(&self, canvas: &mut Canvas, x: i32, y: i32, code: u8, color: u8, scale: GlyphScale) {
        let glyph = self.font.glyph(code);
        match scale {
            GlyphScale::Normal => canvas.draw_mono(&glyph, x, y, color),
            GlyphScale::Double => canvas.draw_mono_2x(&glyph, x, y, color),
        }
    }

    /// Lays out `tokens` starting at `(x, y)`.
    ///
    /// Returns the cursor position relative to `(x, y)` after the last token.
    pub fn draw_tokens<I>(
        &self,
        canvas: &mut Canvas,
        x: i32,
        y: i32,
        tokens: I,
        color: u8,
        scale: GlyphScale,
    ) -> (i64, i64)
    where
        I: IntoIterator<Item = LayoutToken>,
    {
        let cell_w = self.font.width() as i64 * scale.factor();
        let cell_h = self.font.height() as i64 * scale.factor();
        let (mut cx, mut cy) = (0i64, 0i64);
        for token in tokens {
            match token {
                LayoutToken::Backspace => cx -= cell_w,
                LayoutToken::Newline => {
                    cx = 0;
                    cy += cell_h;
                }
                LayoutToken::Glyph(code) => {
                    let gx = to_coord(i64::from(x) + cx);
                    let gy = to_coord(i64::from(y) + cy);
                    self.draw_char(canvas, gx, gy, code, color, scale);
                    cx += cell_w;
                }
            }
        }
        (cx, cy)
    }

    /// Draws the byte string `text` starting at `(x, y)`.
    pub fn draw_string(
        &self,
        canvas: &mut Canvas,
        x: i32,
        y: i32,
        text: impl AsRef<[u8]>,
        color: u8,
        scale: GlyphScale,
    ) -> (i64, i64) {
        self.draw_tokens(canvas, x, y, tokenize(text.as_ref()), color, scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use test_log::test;

    /// 2x2 font where every glyph except 0x20 is a solid block.
    fn block_font() -> Font {
        let mut data = vec![0b1100_0000u8; 256 * 2];
        data[0x20 * 2] = 0;
        data[0x20 * 2 + 1] = 0;
        Font::new(data, 2, 2).unwrap()
    }

    fn clean_canvas() -> Canvas {
        let mut canvas = Canvas::new(64, 32, 16, 16).unwrap();
        for y in 0..canvas.height() {
            canvas.dirty_mut().clear_row(y);
        }
        canvas
    }

    fn painted(canvas: &Canvas, color: u8) -> BTreeSet<(i32, i32)> {
        let mut out = BTreeSet::new();
        for y in 0..canvas.height() {
            for (x, &p) in canvas.row(y).unwrap().iter().enumerate() {
                if p == color {
                    out.insert((x as i32, y as i32));
                }
            }
        }
        out
    }

    fn block(x: i32, y: i32, size: i32) -> BTreeSet<(i32, i32)> {
        (y..y + size).flat_map(|py| (x..x + size).map(move |px| (px, py))).collect()
    }

    #[test]
    fn tokenize_recognises_control_codes() {
        let tokens: Vec<_> = tokenize(b"a\x08\nb").collect();
        assert_eq!(
            tokens,
            [
                LayoutToken::Glyph(b'a'),
                LayoutToken::Backspace,
                LayoutToken::Newline,
                LayoutToken::Glyph(b'b'),
            ]
        );
    }

    #[test]
    fn glyphs_advance_one_cell() {
        let font = block_font();
        let text = TextRenderer::new(&font);
        let mut canvas = clean_canvas();
        let cursor = text.draw_string(&mut canvas, 4, 4, "ab", 1, GlyphScale::Normal);
        assert_eq!(cursor, (4, 0));
        let expected: BTreeSet<_> = block(4, 4, 2).union(&block(6, 4, 2)).copied().collect();
        assert_eq!(painted(&canvas, 1), expected);
    }

    #[test]
    fn backspace_overstrikes_the_previous_cell() {
        let font = block_font();
        let text = TextRenderer::new(&font);
        let mut canvas = clean_canvas();
        let cursor = text.draw_string(&mut canvas, 0, 0, "a\x08b", 2, GlyphScale::Normal);
        assert_eq!(cursor, (2, 0));
        assert_eq!(painted(&canvas, 2), block(0, 0, 2));
    }

    #[test]
    fn newline_returns_to_column_zero() {
        let font = block_font();
        let text = TextRenderer::new(&font);
        let mut canvas = clean_canvas();
        let cursor = text.draw_string(&mut canvas, 10, 0, "a b\nc", 3, GlyphScale::Normal);
        assert_eq!(cursor, (2, 2));
        let expected: BTreeSet<_> = block(10, 0, 2)
            .into_iter()
            .chain(block(14, 0, 2))
            .chain(block(10, 2, 2))
            .collect();
        assert_eq!(painted(&canvas, 3), expected);
    }

    #[test]
    fn double_scale_doubles_the_cell() {
        let font = block_font();
        let text = TextRenderer::new(&font);
        let mut canvas = clean_canvas();
        let cursor = text.draw_string(&mut canvas, 0, 0, "a\na", 4, GlyphScale::Double);
        assert_eq!(cursor, (4, 4));
        // A solid 2x2 block upscales to a 4x4 block with its corners rounded off.
        let got = painted(&canvas, 4);
        assert_eq!(got.len(), 24);
        assert!(got.contains(&(1, 0)) && !got.contains(&(0, 0)));
        assert!(got.contains(&(1, 4)) && !got.contains(&(0, 4)));
    }

    #[test]
    fn text_runs_off_the_canvas_silently() {
        let font = block_font();
        let text = TextRenderer::new(&font);
        let mut canvas = clean_canvas();
        text.draw_string(&mut canvas, 60, 30, "abcdef", 5, GlyphScale::Normal);
        assert_eq!(painted(&canvas, 5), block(60, 30, 2).union(&block(62, 30, 2)).copied().collect::<BTreeSet<_>>());
        text.draw_string(&mut canvas, i32::MAX - 1, 0, "abc", 6, GlyphScale::Double);
        assert!(painted(&canvas, 6).is_empty());
    }
}
