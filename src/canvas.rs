// src/canvas.rs

//! The `Canvas`: the logical indexed pixel grid plus its dirty map.
//!
//! Every mutation goes through this type so that pixel writes and dirty
//! marks can never drift apart. All clipping funnels through
//! [`crop_to_viewport`]; once a span has been cropped it is expressed in
//! `usize` and can index the framebuffer directly.

use crate::dirty::DirtyMap;
use crate::framebuffer::SectoredBuffer;
use anyhow::Result;
use log::debug;

/// A visible, non-empty run of coordinates along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
}

impl Span {
    /// Inclusive last coordinate of the span.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len - 1
    }
}

/// Clips the span `[start, start + length - 1]` to the viewport `[0, view_size)`.
///
/// Returns `None` when nothing of the span is visible (including a zero
/// `length`); the caller must then skip drawing. Otherwise the returned span
/// starts at the first visible coordinate, and [`Span::end`] is the last
/// visible one.
pub fn crop_to_viewport(start: i32, length: u32, view_size: usize) -> Option<Span> {
    if length == 0 {
        return None;
    }
    let start = i64::from(start);
    crop_range(start, start + i64::from(length) - 1, view_size)
}

/// Inclusive-endpoint form of [`crop_to_viewport`]. `a` must not exceed `b`.
pub(crate) fn crop_range(a: i64, b: i64, view_size: usize) -> Option<Span> {
    let view = view_size as i64;
    if b < a || a >= view || b < 0 {
        return None;
    }
    let start = a.max(0);
    let end = b.min(view - 1);
    Some(Span {
        start: start as usize,
        len: (end - start + 1) as usize,
    })
}

/// Visible part of a `w * h` rectangle placed at `(x, y)`.
///
/// `src_x`/`src_y` are the offsets inside the rectangle of the first visible
/// column and row, introduced by left/top clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ClippedRect {
    pub xs: Span,
    pub ys: Span,
    pub src_x: usize,
    pub src_y: usize,
}

/// Indexed-color drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    buffer: SectoredBuffer,
    dirty: DirtyMap,
}

impl Canvas {
    /// Allocates a `width * height` canvas whose top sector holds `top_sector_rows`
    /// rows, tracked in dirty bands of `band_width` columns.
    ///
    /// All bands start dirty.
    pub fn new(width: usize, height: usize, top_sector_rows: usize, band_width: usize) -> Result<Self> {
        let buffer = SectoredBuffer::new(width, height, top_sector_rows)?;
        let dirty = DirtyMap::new(width, height, band_width);
        debug!(
            "Canvas: {}x{} with {} dirty bands per row",
            width,
            height,
            dirty.bands_per_row()
        );
        Ok(Self { buffer, dirty })
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn dirty(&self) -> &DirtyMap {
        &self.dirty
    }

    pub fn dirty_mut(&mut self) -> &mut DirtyMap {
        &mut self.dirty
    }

    /// Underlying storage, read-only.
    pub fn buffer(&self) -> &SectoredBuffer {
        &self.buffer
    }

    /// Indexed pixels of row `y`.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        self.buffer.row(y)
    }

    /// Whether `(x, y)` lies on the canvas.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height()
    }

    /// Color index at `(x, y)`, or `None` off the canvas.
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u8> {
        if !self.contains(x, y) {
            return None;
        }
        self.buffer.read(x as usize, y as usize)
    }

    /// Writes one pixel and marks its band dirty. Off-canvas writes are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u8) {
        if self.contains(x, y) {
            self.plot(x as usize, y as usize, color);
        }
    }

    /// Writes an in-range pixel.
    #[inline]
    pub(crate) fn plot(&mut self, x: usize, y: usize, color: u8) {
        if self.buffer.write(x, y, color) {
            self.dirty.mark(x, y);
        }
    }

    /// Sets every pixel to `color` and marks the whole dirty map.
    pub fn fill(&mut self, color: u8) {
        self.buffer.fill(color);
        self.dirty.mark_all();
    }

    /// Horizontal run of `width` pixels starting at `(x, y)`, clipped to the canvas.
    pub fn draw_hline(&mut self, x: i32, y: i32, width: u32, color: u8) {
        if y < 0 || y as usize >= self.height() {
            return;
        }
        if let Some(xs) = crop_to_viewport(x, width, self.width()) {
            self.fill_span(xs, y as usize, color);
        }
    }

    /// Vertical run of `height` pixels starting at `(x, y)`, clipped to the canvas.
    pub fn draw_vline(&mut self, x: i32, y: i32, height: u32, color: u8) {
        if x < 0 || x as usize >= self.width() {
            return;
        }
        if let Some(ys) = crop_to_viewport(y, height, self.height()) {
            let x = x as usize;
            for row in ys.start..=ys.end() {
                self.plot(x, row, color);
            }
        }
    }

    /// Fills the already-clipped span `xs` on row `y`.
    pub(crate) fn fill_span(&mut self, xs: Span, y: usize, color: u8) {
        if let Some(row) = self.buffer.row_mut(y) {
            row[xs.start..=xs.end()].fill(color);
            self.dirty.mark_span(xs.start, xs.end(), y);
        }
    }

    /// Fills the horizontal run between two inclusive x endpoints (either order) on row `y`.
    pub(crate) fn fill_between(&mut self, xa: i64, xb: i64, y: i64, color: u8) {
        if y < 0 || y >= self.height() as i64 {
            return;
        }
        let (lo, hi) = if xa <= xb { (xa, xb) } else { (xb, xa) };
        if let Some(xs) = crop_range(lo, hi, self.width()) {
            self.fill_span(xs, y as usize, color);
        }
    }

    /// Mutable slice of the already-clipped span `xs` on row `y`, marking it dirty.
    pub(crate) fn span_mut(&mut self, xs: Span, y: usize) -> Option<&mut [u8]> {
        self.dirty.mark_span(xs.start, xs.end(), y);
        self.buffer
            .row_mut(y)
            .map(|row| &mut row[xs.start..=xs.end()])
    }

    /// Clips a `w * h` rectangle at `(x, y)` against the canvas.
    pub(crate) fn clip_rect(&self, x: i32, y: i32, w: u32, h: u32) -> Option<ClippedRect> {
        let xs = crop_to_viewport(x, w, self.width())?;
        let ys = crop_to_viewport(y, h, self.height())?;
        Some(ClippedRect {
            xs,
            ys,
            src_x: (xs.start as i64 - i64::from(x)) as usize,
            src_y: (ys.start as i64 - i64::from(y)) as usize,
        })
    }
}

#[cfg(test)]
mod tests;
