// src/raster.rs

//! Integer-only primitive rasterizers: lines, rectangles, triangles, circles.
//!
//! Filled shapes are built from horizontal spans so they take the contiguous
//! row fill path. Outline shapes whose direction varies (general lines,
//! circles) bounds-check each candidate pixel instead of clipping up front.

use crate::canvas::{crop_range, Canvas};
use log::trace;

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl Canvas {
    /// Draws a line between two points (both inclusive).
    ///
    /// Horizontal and vertical lines take the span fast path; everything else
    /// is rasterized with Bresenham's algorithm.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u8) {
        let (mut x0, mut y0, mut x1, mut y1) =
            (i64::from(x0), i64::from(y0), i64::from(x1), i64::from(y1));

        if y0 == y1 {
            self.fill_between(x0, x1, y0, color);
            return;
        }
        if x0 == x1 {
            if x0 < 0 || x0 >= self.width() as i64 {
                return;
            }
            let (lo, hi) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
            if let Some(ys) = crop_range(lo, hi, self.height()) {
                let x = x0 as usize;
                for y in ys.start..=ys.end() {
                    self.plot(x, y, color);
                }
            }
            return;
        }

        let steep = (y1 - y0).abs() > (x1 - x0).abs();
        if steep {
            std::mem::swap(&mut x0, &mut y0);
            std::mem::swap(&mut x1, &mut y1);
        }
        if x0 > x1 {
            std::mem::swap(&mut x0, &mut x1);
            std::mem::swap(&mut y0, &mut y1);
        }

        let dx = x1 - x0;
        let dy = (y1 - y0).abs();
        let y_step = if y0 < y1 { 1 } else { -1 };

        // Only the on-canvas stretch of the major axis is walked. The error
        // term stays in `0..dx`, so its state after the skipped steps has a
        // closed form.
        let major_len = if steep { self.height() } else { self.width() } as i64;
        let start = x0.max(0);
        let end = x1.min(major_len - 1);
        if start > end {
            return;
        }
        let raw = i128::from(dx / 2) - i128::from(start - x0) * i128::from(dy);
        let wrapped = raw.rem_euclid(i128::from(dx));
        let minor_steps = ((wrapped - raw) / i128::from(dx)) as i64;
        let mut err = wrapped as i64;
        let mut y = y0 + y_step * minor_steps;

        for x in start..=end {
            if steep {
                self.plot_checked(y, x, color);
            } else {
                self.plot_checked(x, y, color);
            }
            err -= dy;
            if err < 0 {
                y += y_step;
                err += dx;
            }
        }
    }

    /// Outline of a `width * height` rectangle with its top-left corner at `(x, y)`.
    pub fn draw_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: u8) {
        if width == 0 || height == 0 {
            return;
        }
        let right = (i64::from(x) + i64::from(width) - 1).min(i64::from(i32::MAX)) as i32;
        let bottom = (i64::from(y) + i64::from(height) - 1).min(i64::from(i32::MAX)) as i32;
        self.draw_line(x, y, right, y, color);
        self.draw_line(x, bottom, right, bottom, color);
        self.draw_line(x, y, x, bottom, color);
        self.draw_line(right, y, right, bottom, color);
    }

    /// Solid `width * height` rectangle with its top-left corner at `(x, y)`.
    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: u8) {
        let Some(clip) = self.clip_rect(x, y, width, height) else {
            return;
        };
        for row in clip.ys.start..=clip.ys.end() {
            self.fill_span(clip.xs, row, color);
        }
    }

    /// Outline of the triangle through three vertices.
    pub fn draw_triangle(&mut self, a: Point, b: Point, c: Point, color: u8) {
        self.draw_line(a.x, a.y, b.x, b.y, color);
        self.draw_line(b.x, b.y, c.x, c.y, color);
        self.draw_line(c.x, c.y, a.x, a.y, color);
    }

    /// Solid triangle through three vertices.
    ///
    /// Vertices are sorted by `y`; the long edge `v0 -> v2` is walked against
    /// `v0 -> v1` for the upper part and `v1 -> v2` for the lower part.
    /// Scanline intercepts use truncating integer division, so adjacent
    /// triangles may overlap or gap by one pixel along a shared edge.
    ///
    /// A triangle with every vertex on one row fills from the leftmost to the
    /// rightmost of all three vertices, not just between the last two after
    /// sorting.
    pub fn fill_triangle(&mut self, a: Point, b: Point, c: Point, color: u8) {
        let mut v = [a, b, c].map(|p| (i64::from(p.x), i64::from(p.y)));
        if v[0].1 > v[1].1 {
            v.swap(0, 1);
        }
        if v[0].1 > v[2].1 {
            v.swap(0, 2);
        }
        if v[1].1 > v[2].1 {
            v.swap(1, 2);
        }
        let [(x0, y0), (x1, y1), (x2, y2)] = v;

        if y0 == y2 {
            // Every vertex on one row.
            let lo = x0.min(x1).min(x2);
            let hi = x0.max(x1).max(x2);
            self.fill_between(lo, hi, y0, color);
            return;
        }

        // Rows outside the canvas are never visited.
        let last_row = self.height() as i64 - 1;

        // Long side 0 => 2
        let (dx02, dy02) = (x2 - x0, y2 - y0);

        if y1 > y0 {
            let (dx01, dy01) = (x1 - x0, y1 - y0);
            for y in y0.max(0)..y1.min(last_row + 1) {
                let xa = intercept(x0, y0, dx01, dy01, y);
                let xb = intercept(x0, y0, dx02, dy02, y);
                self.fill_between(xa, xb, y, color);
            }
        }

        if y2 > y1 {
            let (dx12, dy12) = (x2 - x1, y2 - y1);
            for y in y1.max(0)..=y2.min(last_row) {
                let xa = intercept(x1, y1, dx12, dy12, y);
                let xb = intercept(x0, y0, dx02, dy02, y);
                self.fill_between(xa, xb, y, color);
            }
        } else {
            // Flat bottom edge v1 -- v2.
            self.fill_between(x1, x2, y1, color);
        }
    }

    /// Circle outline of `radius` around `(cx, cy)` (midpoint algorithm).
    ///
    /// The octant walk is resumed only over the offsets whose rows or columns
    /// can reach the canvas, so huge radii cost no more than small ones.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, radius: u32, color: u8) {
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        let (w, h) = (self.width() as i64, self.height() as i64);
        let r = i64::from(radius);

        // Offsets putting rows cy +- py or columns cx +- py on the canvas.
        let mut windows = [
            (-cy, h - 1 - cy),
            (cy - h + 1, cy),
            (-cx, w - 1 - cx),
            (cx - w + 1, cx),
        ];
        windows.sort_unstable();

        let mut next = 0i64;
        for (lo, hi) in windows {
            let (lo, hi) = (lo.max(next), hi.min(r));
            if lo > hi {
                continue;
            }
            for (px, py) in MidpointCircle::starting_at(radius, lo).take_while(|&(_, py)| py <= hi) {
                self.plot_checked(cx + px, cy + py, color);
                self.plot_checked(cx + py, cy + px, color);
                self.plot_checked(cx - py, cy + px, color);
                self.plot_checked(cx - px, cy + py, color);
                self.plot_checked(cx - px, cy - py, color);
                self.plot_checked(cx - py, cy - px, color);
                self.plot_checked(cx + py, cy - px, color);
                self.plot_checked(cx + px, cy - py, color);
            }
            next = hi + 1;
        }
    }

    /// Solid circle of `radius` around `(cx, cy)`.
    ///
    /// Covers exactly the pixels spanned by the midpoint decision loop of
    /// [`Canvas::draw_circle`]: every visible row gets one clipped span whose
    /// half-width is that loop's widest point on the row.
    pub fn fill_circle(&mut self, cx: i32, cy: i32, radius: u32, color: u8) {
        let (cx, cy) = (i64::from(cx), i64::from(cy));
        trace!("fill_circle: center=({}, {}), radius={}", cx, cy, radius);
        let r = i64::from(radius);
        let Some(rows) = crop_range(cy - r, cy + r, self.height()) else {
            return;
        };
        for y in rows.start..=rows.end() {
            if let Some(half) = disc_half_width(radius, (y as i64 - cy).unsigned_abs()) {
                self.fill_between(cx - half, cx + half, y as i64, color);
            }
        }
    }

    /// Plots `(x, y)` if it lies on the canvas.
    #[inline]
    fn plot_checked(&mut self, x: i64, y: i64, color: u8) {
        if x >= 0 && y >= 0 && (x as usize) < self.width() && (y as usize) < self.height() {
            self.plot(x as usize, y as usize, color);
        }
    }
}

/// `x` at `row` on the edge from `(x, y)` with slope `dx / dy`.
///
/// Equivalent to accumulating `u += dx` from `u = x * dy` once per row and
/// taking `u / dy`, truncated toward zero.
fn intercept(x: i64, y: i64, dx: i64, dy: i64, row: i64) -> i64 {
    let u = i128::from(x) * i128::from(dy) + i128::from(dx) * i128::from(row - y);
    (u / i128::from(dy)) as i64
}

/// Integer square root, rounded down.
fn isqrt(n: i128) -> i128 {
    if n <= 0 {
        return 0;
    }
    let mut root = (n as f64).sqrt() as i128;
    while root * root > n {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= n {
        root += 1;
    }
    root
}

/// Smallest `p >= 0` with `p * (p + 1) >= d`.
///
/// This is the midpoint loop's `px` once `py` has reached a row where
/// `d = r^2 - py^2`.
fn octant_x(d: i128) -> i128 {
    if d <= 0 {
        return 0;
    }
    let mut p = (((1 + 4 * d) as f64).sqrt() as i128 - 1) / 2;
    while p * (p + 1) < d {
        p += 1;
    }
    while p > 0 && (p - 1) * p >= d {
        p -= 1;
    }
    p
}

/// Half-width of the filled midpoint disc of `radius` on the row `t` away
/// from the center, or `None` past its top and bottom.
///
/// Pixel `(x, t)` is inside iff `x^2 + t^2 - max(|x|, |t|) < r^2`, with the
/// center always inside.
fn disc_half_width(radius: u32, t: u64) -> Option<i64> {
    let r = i128::from(radius);
    let t = i128::from(t);
    let d = r * r - t * t;
    let p = octant_x(d);
    if p >= t {
        return Some(p as i64);
    }
    if d + t <= 0 {
        return None;
    }
    Some(isqrt(d + t - 1).min(t - 1) as i64)
}

/// Octant walk of the midpoint circle algorithm.
///
/// Yields `(px, py)` offsets for the octant `px >= py`, starting at
/// `(radius, 0)`.
#[derive(Debug, Clone)]
struct MidpointCircle {
    px: i64,
    py: i64,
    dx: i64,
    dy: i64,
    err: i64,
}

impl MidpointCircle {
    fn new(radius: u32) -> Self {
        let r = i64::from(radius);
        Self {
            px: r,
            py: 0,
            dx: 1 - 2 * r,
            dy: 1,
            err: 0,
        }
    }

    /// The walk as it stands when it reaches row offset `py`.
    ///
    /// The loop keeps `err == px^2 + py^2 - r^2`, `dx == 1 - 2 * px` and
    /// `dy == 2 * py + 1`.
    fn starting_at(radius: u32, py: i64) -> Self {
        if py <= 0 {
            return Self::new(radius);
        }
        let r = i128::from(radius);
        let y = i128::from(py);
        let px = octant_x(r * r - y * y);
        Self {
            px: px as i64,
            py,
            dx: (1 - 2 * px) as i64,
            dy: 2 * py + 1,
            err: (px * px + y * y - r * r) as i64,
        }
    }
}

impl Iterator for MidpointCircle {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.px < self.py {
            return None;
        }
        let current = (self.px, self.py);
        self.py += 1;
        self.err += self.dy;
        self.dy += 2;
        if 2 * self.err + self.dx > 0 {
            self.px -= 1;
            self.err += self.dx;
            self.dx += 2;
        }
        Some(current)
    }
}
