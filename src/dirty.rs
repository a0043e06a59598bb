// src/dirty.rs

//! Per-row dirty band tracking.
//!
//! Each row is divided into coarse column bands of `band_width` pixels. A band
//! is flagged whenever any pixel inside it changes, and the flush scheduler
//! sends only flagged bands. The map starts all-dirty so the first flush
//! paints the whole panel.

/// Coarse per-row dirty flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirtyMap {
    width: usize,
    rows: usize,
    band_width: usize,
    bands_per_row: usize,
    flags: Vec<bool>,
}

impl DirtyMap {
    /// Creates an all-dirty map for a `width * rows` grid.
    ///
    /// `band_width` of zero is treated as one band spanning the whole row.
    pub fn new(width: usize, rows: usize, band_width: usize) -> Self {
        let band_width = if band_width == 0 { width.max(1) } else { band_width };
        let bands_per_row = width.div_ceil(band_width);
        Self {
            width,
            rows,
            band_width,
            bands_per_row,
            flags: vec![true; bands_per_row * rows],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn band_width(&self) -> usize {
        self.band_width
    }

    pub fn bands_per_row(&self) -> usize {
        self.bands_per_row
    }

    /// Total number of band cells (`rows * bands_per_row`).
    pub fn capacity(&self) -> usize {
        self.flags.len()
    }

    /// Band index containing column `x`.
    #[inline]
    pub fn band_of(&self, x: usize) -> usize {
        x / self.band_width
    }

    /// Column range `[start, end)` covered by `band`, clipped to the row width.
    pub fn band_columns(&self, band: usize) -> (usize, usize) {
        let start = band * self.band_width;
        let end = (start + self.band_width).min(self.width);
        (start, end)
    }

    /// Flags the band containing column `x` on row `y`. Off-grid input is ignored.
    #[inline]
    pub fn mark(&mut self, x: usize, y: usize) {
        if x < self.width && y < self.rows {
            let idx = y * self.bands_per_row + self.band_of(x);
            self.flags[idx] = true;
        }
    }

    /// Flags every band touched by the inclusive column span `x0..=x1` on row `y`.
    pub fn mark_span(&mut self, x0: usize, x1: usize, y: usize) {
        if y >= self.rows || x0 >= self.width {
            return;
        }
        let x1 = x1.min(self.width - 1);
        if x1 < x0 {
            return;
        }
        let base = y * self.bands_per_row;
        let first = self.band_of(x0);
        let last = self.band_of(x1);
        self.flags[base + first..=base + last].fill(true);
    }

    /// Flags every band of every row.
    pub fn mark_all(&mut self) {
        self.flags.fill(true);
    }

    /// Clears every band of row `y`.
    pub fn clear_row(&mut self, y: usize) {
        if y < self.rows {
            let base = y * self.bands_per_row;
            self.flags[base..base + self.bands_per_row].fill(false);
        }
    }

    /// Clears a single band.
    pub fn clear_band(&mut self, y: usize, band: usize) {
        if y < self.rows && band < self.bands_per_row {
            self.flags[y * self.bands_per_row + band] = false;
        }
    }

    pub fn is_dirty(&self, y: usize, band: usize) -> bool {
        y < self.rows
            && band < self.bands_per_row
            && self.flags[y * self.bands_per_row + band]
    }

    /// Whether any band of row `y` is flagged.
    pub fn row_is_dirty(&self, y: usize) -> bool {
        self.row_flags(y).iter().any(|&f| f)
    }

    /// Dirty flags of row `y`, one per band (empty if `y` is out of range).
    pub fn row_flags(&self, y: usize) -> &[bool] {
        if y >= self.rows {
            return &[];
        }
        let base = y * self.bands_per_row;
        &self.flags[base..base + self.bands_per_row]
    }

    /// Number of flagged band cells across the whole map.
    pub fn dirty_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    pub fn is_clean(&self) -> bool {
        !self.flags.iter().any(|&f| f)
    }
}
