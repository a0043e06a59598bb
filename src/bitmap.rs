// src/bitmap.rs

//! Bitmap views and the blit engine.
//!
//! Bitmaps are caller-owned. The engine only borrows them for the duration
//! of a copy; nothing here retains a reference past the call. Indexed
//! bitmaps carry an explicit stride so that sub-rectangles of a larger sheet
//! can be blitted without copying.

use crate::canvas::Canvas;
use anyhow::{bail, Result};
use log::trace;

/// Checks that a `width * height` view with `stride` fits into `len` bytes.
fn check_extent(len: usize, width: usize, height: usize, stride: usize) -> Result<()> {
    if stride < width {
        bail!("bitmap stride {} is smaller than its width {}", stride, width);
    }
    if width == 0 || height == 0 {
        return Ok(());
    }
    let needed = stride * (height - 1) + width;
    if len < needed {
        bail!(
            "bitmap {}x{} (stride {}) needs {} bytes, got {}",
            width,
            height,
            stride,
            needed,
            len
        );
    }
    Ok(())
}

/// Borrowed, read-only indexed-color bitmap.
#[derive(Debug, Clone, Copy)]
pub struct Bitmap<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> Bitmap<'a> {
    /// Tightly packed bitmap (`stride == width`).
    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        Self::with_stride(data, width, height, width)
    }

    pub fn with_stride(data: &'a [u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        check_extent(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Pixels of row `v`, exactly `width` long.
    pub fn row(&self, v: usize) -> &'a [u8] {
        let start = v * self.stride;
        &self.data[start..start + self.width]
    }

    pub fn get(&self, u: usize, v: usize) -> Option<u8> {
        if u < self.width && v < self.height {
            Some(self.data[v * self.stride + u])
        } else {
            None
        }
    }
}

/// Borrowed, writable indexed-color bitmap, e.g. a background save buffer.
#[derive(Debug)]
pub struct BitmapMut<'a> {
    data: &'a mut [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> BitmapMut<'a> {
    pub fn new(data: &'a mut [u8], width: usize, height: usize) -> Result<Self> {
        Self::with_stride(data, width, height, width)
    }

    pub fn with_stride(data: &'a mut [u8], width: usize, height: usize, stride: usize) -> Result<Self> {
        check_extent(data.len(), width, height, stride)?;
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_mut(&mut self, v: usize) -> &mut [u8] {
        let start = v * self.stride;
        &mut self.data[start..start + self.width]
    }

    /// Read-only view of the same pixels.
    pub fn as_bitmap(&self) -> Bitmap<'_> {
        Bitmap {
            data: self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
        }
    }
}

/// Owned, tightly packed indexed-color image.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexedImage {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl IndexedImage {
    /// A `width * height` image filled with `color`.
    pub fn filled(width: usize, height: usize, color: u8) -> Self {
        Self {
            width,
            height,
            data: vec![color; width * height],
        }
    }

    pub fn as_bitmap(&self) -> Bitmap<'_> {
        Bitmap {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    pub fn as_bitmap_mut(&mut self) -> BitmapMut<'_> {
        BitmapMut {
            data: &mut self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}

/// Borrowed 1-bit-per-pixel bitmap: rows padded to whole bytes, most
/// significant bit leftmost.
#[derive(Debug, Clone, Copy)]
pub struct MonoBitmap<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> MonoBitmap<'a> {
    /// Bytes per packed row for a given pixel width.
    pub const fn row_bytes(width: usize) -> usize {
        (width + 7) >> 3
    }

    pub fn new(data: &'a [u8], width: usize, height: usize) -> Result<Self> {
        let needed = Self::row_bytes(width) * height;
        if data.len() < needed {
            bail!(
                "monochrome bitmap {}x{} needs {} bytes, got {}",
                width,
                height,
                needed,
                data.len()
            );
        }
        Ok(Self { data, width, height })
    }

    /// Wraps a slice whose length the caller has already checked.
    pub(crate) fn from_checked(data: &'a [u8], width: usize, height: usize) -> Self {
        debug_assert!(data.len() >= Self::row_bytes(width) * height);
        Self { data, width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Bit at `(u, v)`. Coordinates outside the bitmap read as unset.
    #[inline]
    pub fn bit(&self, u: i64, v: i64) -> bool {
        if u < 0 || v < 0 || u as usize >= self.width || v as usize >= self.height {
            return false;
        }
        let (u, v) = (u as usize, v as usize);
        let byte = self.data[Self::row_bytes(self.width) * v + (u >> 3)];
        byte & (0x80 >> (u & 7)) != 0
    }
}

/// Resolves the four Scale2x sub-pixels of a center bit from its neighbours.
///
/// Returns `[top_left, top_right, bottom_left, bottom_right]`.
pub fn scale2x(center: bool, up: bool, down: bool, left: bool, right: bool) -> [bool; 4] {
    let mut sub = [center; 4];
    if left == up && left != down && up != right {
        sub[0] = up;
    }
    if up == right && up != left && right != down {
        sub[1] = right;
    }
    if left == down && right != down && up != left {
        sub[2] = left;
    }
    if down == right && up != right && left != down {
        sub[3] = down;
    }
    sub
}

impl Canvas {
    /// Opaque copy of `bitmap` with its top-left corner at `(x, y)`.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32) {
        let Some(clip) = self.clip_rect(x, y, bitmap.width as u32, bitmap.height as u32) else {
            return;
        };
        for (i, row) in (clip.ys.start..=clip.ys.end()).enumerate() {
            let src = &bitmap.row(clip.src_y + i)[clip.src_x..clip.src_x + clip.xs.len];
            if let Some(dst) = self.span_mut(clip.xs, row) {
                dst.copy_from_slice(src);
            }
        }
    }

    /// Like [`Canvas::draw_bitmap`], but source pixels equal to `key` are skipped.
    pub fn draw_bitmap_keyed(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32, key: u8) {
        let Some(clip) = self.clip_rect(x, y, bitmap.width as u32, bitmap.height as u32) else {
            return;
        };
        for (i, row) in (clip.ys.start..=clip.ys.end()).enumerate() {
            let src = &bitmap.row(clip.src_y + i)[clip.src_x..clip.src_x + clip.xs.len];
            if let Some(dst) = self.span_mut(clip.xs, row) {
                for (d, &s) in dst.iter_mut().zip(src) {
                    if s != key {
                        *d = s;
                    }
                }
            }
        }
    }

    /// Copies the canvas rectangle at `(x, y)` of `dest`'s size into `dest`.
    ///
    /// Only the visible part is copied; the rest of `dest` is left untouched.
    /// Reading does not mark anything dirty.
    pub fn copy_to_bitmap(&self, dest: &mut BitmapMut<'_>, x: i32, y: i32) {
        let Some(clip) = self.clip_rect(x, y, dest.width as u32, dest.height as u32) else {
            return;
        };
        for (i, row) in (clip.ys.start..=clip.ys.end()).enumerate() {
            let Some(src) = self.row(row) else {
                continue;
            };
            let src = &src[clip.xs.start..=clip.xs.end()];
            dest.row_mut(clip.src_y + i)[clip.src_x..clip.src_x + clip.xs.len].copy_from_slice(src);
        }
    }

    /// Draws `color` for every set bit of `mono`, clipped per pixel.
    pub fn draw_mono(&mut self, mono: &MonoBitmap<'_>, x: i32, y: i32, color: u8) {
        let (x, y) = (i64::from(x), i64::from(y));
        for v in 0..mono.height as i64 {
            let py = y + v;
            if py < 0 || py >= self.height() as i64 {
                continue;
            }
            for u in 0..mono.width as i64 {
                let px = x + u;
                if px >= 0 && px < self.width() as i64 && mono.bit(u, v) {
                    self.plot(px as usize, py as usize, color);
                }
            }
        }
    }

    /// Draws `mono` at twice its size using Scale2x edge smoothing.
    ///
    /// Neighbours outside the bitmap count as unset.
    pub fn draw_mono_2x(&mut self, mono: &MonoBitmap<'_>, x: i32, y: i32, color: u8) {
        trace!("draw_mono_2x: {}x{} at ({}, {})", mono.width, mono.height, x, y);
        let (x, y) = (i64::from(x), i64::from(y));
        for v in 0..mono.height as i64 {
            for u in 0..mono.width as i64 {
                let sub = scale2x(
                    mono.bit(u, v),
                    mono.bit(u, v - 1),
                    mono.bit(u, v + 1),
                    mono.bit(u - 1, v),
                    mono.bit(u + 1, v),
                );
                let (ox, oy) = (x + 2 * u, y + 2 * v);
                for (i, &on) in sub.iter().enumerate() {
                    if !on {
                        continue;
                    }
                    let px = ox + (i as i64 & 1);
                    let py = oy + (i as i64 >> 1);
                    if px >= 0 && py >= 0 && px < self.width() as i64 && py < self.height() as i64 {
                        self.plot(px as usize, py as usize, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
