// src/framebuffer.rs

//! Two-sector indexed pixel storage.
//!
//! A `width * height` byte grid may not fit in one allocation on small
//! targets, so the rows are split across two independently allocated
//! sectors: rows `0..split` live in the top sector, rows `split..height` in
//! the bottom one. The split is on a row boundary, so any single row is
//! always one contiguous slice. Nothing outside this module sees sector
//! offsets.

use anyhow::{Context, Result};
use log::debug;

/// Which physical sector a row lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sector {
    Top,
    Bottom,
}

/// Row-addressable indexed framebuffer split across two owned buffers.
#[derive(Debug, Clone)]
pub struct SectoredBuffer {
    width: usize,
    height: usize,
    split: usize,
    top: Box<[u8]>,
    bottom: Box<[u8]>,
}

/// Allocates a zeroed buffer, reporting allocation failure instead of aborting.
fn try_alloc(len: usize) -> Result<Box<[u8]>> {
    let mut buf: Vec<u8> = Vec::new();
    buf.try_reserve_exact(len)
        .with_context(|| format!("cannot allocate {} bytes", len))?;
    buf.resize(len, 0);
    Ok(buf.into_boxed_slice())
}

impl SectoredBuffer {
    /// Allocates both sectors. `split` is the number of rows in the top sector
    /// and is clamped to `height`.
    pub fn new(width: usize, height: usize, split: usize) -> Result<Self> {
        let split = split.min(height);
        let top = try_alloc(width * split).context("Failed to allocate top framebuffer sector")?;
        let bottom = try_alloc(width * (height - split))
            .context("Failed to allocate bottom framebuffer sector")?;
        debug!(
            "SectoredBuffer: {}x{} allocated, top sector {} rows ({} bytes), bottom sector {} rows ({} bytes)",
            width,
            height,
            split,
            top.len(),
            height - split,
            bottom.len()
        );
        Ok(Self {
            width,
            height,
            split,
            top,
            bottom,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of rows held by the top sector.
    pub fn split_row(&self) -> usize {
        self.split
    }

    /// Sector and in-sector byte offset of `(x, y)`, or `None` off the grid.
    pub fn locate(&self, x: usize, y: usize) -> Option<(Sector, usize)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        if y < self.split {
            Some((Sector::Top, y * self.width + x))
        } else {
            Some((Sector::Bottom, (y - self.split) * self.width + x))
        }
    }

    fn sector(&self, sector: Sector) -> &[u8] {
        match sector {
            Sector::Top => &self.top,
            Sector::Bottom => &self.bottom,
        }
    }

    fn sector_mut(&mut self, sector: Sector) -> &mut [u8] {
        match sector {
            Sector::Top => &mut self.top,
            Sector::Bottom => &mut self.bottom,
        }
    }

    /// Reads the index at `(x, y)`.
    pub fn read(&self, x: usize, y: usize) -> Option<u8> {
        let (sector, offset) = self.locate(x, y)?;
        self.sector(sector).get(offset).copied()
    }

    /// Writes `value` at `(x, y)`. Returns `false` if the coordinate is off the grid.
    pub fn write(&mut self, x: usize, y: usize, value: u8) -> bool {
        let Some((sector, offset)) = self.locate(x, y) else {
            return false;
        };
        match self.sector_mut(sector).get_mut(offset) {
            Some(px) => {
                *px = value;
                true
            }
            None => false,
        }
    }

    /// One full row of pixels.
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let w = self.width;
        if y < self.split {
            Some(&self.top[y * w..(y + 1) * w])
        } else {
            let r = y - self.split;
            Some(&self.bottom[r * w..(r + 1) * w])
        }
    }

    /// One full row of pixels, mutably.
    pub fn row_mut(&mut self, y: usize) -> Option<&mut [u8]> {
        if y >= self.height {
            return None;
        }
        let w = self.width;
        if y < self.split {
            Some(&mut self.top[y * w..(y + 1) * w])
        } else {
            let r = y - self.split;
            Some(&mut self.bottom[r * w..(r + 1) * w])
        }
    }

    /// Sets every pixel in both sectors to `value`.
    pub fn fill(&mut self, value: u8) {
        self.top.fill(value);
        self.bottom.fill(value);
    }
}
