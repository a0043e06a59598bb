// src/transform.rs

//! Affine scale-and-rotate resampling of indexed bitmaps.
//!
//! The output size is the bounding box of the forward-transformed source
//! corners. Every output pixel is then inverse-mapped back into the source
//! and sampled nearest-neighbour; samples that land outside the source take
//! the background color. Angles are whole degrees looked up in a quarter-wave
//! sine table.

use crate::bitmap::{Bitmap, IndexedImage};
use anyhow::{bail, Context, Result};
use log::debug;
use once_cell::sync::Lazy;

/// `sin(d)` for `d` in `0..=90` degrees.
static SIN_TABLE: Lazy<[f32; 91]> = Lazy::new(|| {
    let mut table = [0.0f32; 91];
    for (deg, slot) in table.iter_mut().enumerate() {
        *slot = (deg as f64).to_radians().sin() as f32;
    }
    table
});

/// Sine of an angle in whole degrees, folded into the first quadrant.
pub fn fast_sin(deg: i32) -> f32 {
    let deg = deg.rem_euclid(360) as usize;
    match deg {
        0..=90 => SIN_TABLE[deg],
        91..=180 => SIN_TABLE[180 - deg],
        181..=270 => -SIN_TABLE[deg - 180],
        _ => -SIN_TABLE[360 - deg],
    }
}

/// Cosine of an angle in whole degrees, folded into the first quadrant.
pub fn fast_cos(deg: i32) -> f32 {
    let deg = deg.rem_euclid(360) as usize;
    match deg {
        0..=90 => SIN_TABLE[90 - deg],
        91..=180 => -SIN_TABLE[deg - 90],
        181..=270 => -SIN_TABLE[270 - deg],
        _ => SIN_TABLE[deg - 270],
    }
}

/// Resolved parameters of one transform.
#[derive(Debug, Clone, Copy)]
struct Affine {
    sin: f32,
    cos: f32,
    scale_x: f32,
    scale_y: f32,
    width: usize,
    height: usize,
}

impl Affine {
    fn new(src_width: usize, src_height: usize, scale_x: f32, scale_y: f32, degrees: f32) -> Self {
        let deg = degrees.round() as i32;
        let (sin, cos) = (fast_sin(deg), fast_cos(deg));
        let valid = scale_x.is_finite() && scale_y.is_finite() && scale_x > 0.0 && scale_y > 0.0;
        if !valid || src_width == 0 || src_height == 0 {
            return Self {
                sin,
                cos,
                scale_x,
                scale_y,
                width: 0,
                height: 0,
            };
        }

        let sw = scale_x * src_width as f32;
        let sh = scale_y * src_height as f32;
        // Corner extents, truncated toward zero.
        let w1 = (sw * cos + sh * sin) as i64;
        let w2 = (sw * cos - sh * sin) as i64;
        let h1 = (sw * sin + sh * cos) as i64;
        let h2 = (sw * sin - sh * cos) as i64;
        Self {
            sin,
            cos,
            scale_x,
            scale_y,
            width: w1.unsigned_abs().max(w2.unsigned_abs()) as usize,
            height: h1.unsigned_abs().max(h2.unsigned_abs()) as usize,
        }
    }

    /// Output byte count, rejecting sizes that do not fit in `usize`.
    fn area(&self) -> Result<usize> {
        match self.width.checked_mul(self.height) {
            Some(n) => Ok(n),
            None => bail!("transform output {}x{} is too large", self.width, self.height),
        }
    }

    fn render(&self, src: &Bitmap<'_>, background: u8, dest: &mut [u8]) {
        let src_cx = 0.5 * (src.width() as f32 - 1.0);
        let src_cy = 0.5 * (src.height() as f32 - 1.0);
        let dst_cx = 0.5 * (self.width as f32 - 1.0);
        let dst_cy = 0.5 * (self.height as f32 - 1.0);

        for (dv, row) in dest.chunks_exact_mut(self.width).take(self.height).enumerate() {
            let v = dv as f32 - dst_cy;
            for (du, out) in row.iter_mut().enumerate() {
                let u = du as f32 - dst_cx;
                let sx = src_cx + (self.cos * u + self.sin * v) / self.scale_x;
                let sy = src_cy + (self.cos * v - self.sin * u) / self.scale_y;
                // Nearest sample: pixel centres sit on integer coordinates.
                let (sx, sy) = ((sx + 0.5).floor(), (sy + 0.5).floor());
                *out = if sx >= 0.0 && sy >= 0.0 {
                    src.get(sx as usize, sy as usize).unwrap_or(background)
                } else {
                    background
                };
            }
        }
    }
}

/// Output size of transforming a `src_width * src_height` bitmap.
///
/// Non-positive or non-finite scale factors yield `(0, 0)`.
pub fn transformed_size(
    src_width: usize,
    src_height: usize,
    scale_x: f32,
    scale_y: f32,
    degrees: f32,
) -> (usize, usize) {
    let affine = Affine::new(src_width, src_height, scale_x, scale_y, degrees);
    (affine.width, affine.height)
}

/// Scales `src` by `(scale_x, scale_y)` and rotates it by `degrees` into the
/// caller-provided `dest`, returning the output `(width, height)`.
///
/// `dest` is written row-major with a stride equal to the returned width and
/// must hold at least `width * height` bytes; use [`transformed_size`] to
/// size it first.
pub fn scale_and_rotate_into(
    src: &Bitmap<'_>,
    scale_x: f32,
    scale_y: f32,
    degrees: f32,
    background: u8,
    dest: &mut [u8],
) -> Result<(usize, usize)> {
    let affine = Affine::new(src.width(), src.height(), scale_x, scale_y, degrees);
    let needed = affine.area()?;
    if dest.len() < needed {
        bail!(
            "transform destination holds {} bytes, {}x{} output needs {}",
            dest.len(),
            affine.width,
            affine.height,
            needed
        );
    }
    if needed > 0 {
        affine.render(src, background, dest);
    }
    Ok((affine.width, affine.height))
}

/// Owned-output form of [`scale_and_rotate_into`].
///
/// Fails when the output size overflows or cannot be allocated.
pub fn scale_and_rotate(
    src: &Bitmap<'_>,
    scale_x: f32,
    scale_y: f32,
    degrees: f32,
    background: u8,
) -> Result<IndexedImage> {
    let affine = Affine::new(src.width(), src.height(), scale_x, scale_y, degrees);
    debug!(
        "scale_and_rotate: {}x{} x({}, {}) @ {} deg -> {}x{}",
        src.width(),
        src.height(),
        scale_x,
        scale_y,
        degrees,
        affine.width,
        affine.height
    );
    let needed = affine.area()?;
    let mut data = Vec::new();
    data.try_reserve_exact(needed)
        .with_context(|| format!("cannot allocate {}x{} transform output", affine.width, affine.height))?;
    data.resize(needed, background);
    if needed > 0 {
        affine.render(src, background, &mut data);
    }
    Ok(IndexedImage {
        width: affine.width,
        height: affine.height,
        data,
    })
}
