// src/sink.rs

//! Display sinks: where flushed pixel runs go.
//!
//! A sink models a windowed display controller. The flush scheduler first
//! addresses a window, then streams RGB565 pixels into it; the controller
//! advances row-major inside the window on its own. The protocol is
//! write-only: a sink may fail a call, but it never reports back what the
//! panel actually shows.

use crate::color::{rgb565_to_rgb888, Rgb565};
use anyhow::{bail, Context, Result};
use log::{debug, trace};
use std::io::Write;

/// Target rectangle of the next pixel writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Window {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Output side of the flush pipeline.
pub trait DisplaySink {
    /// Addresses the rectangle subsequent [`DisplaySink::write_pixels`] calls fill.
    fn set_window(&mut self, window: Window) -> Result<()>;

    /// Streams pixels into the current window.
    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<()>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn set_window(&mut self, window: Window) -> Result<()> {
        (**self).set_window(window)
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<()> {
        (**self).write_pixels(pixels)
    }
}

/// One pixel run as received by a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    pub window: Window,
    pub pixels: Vec<Rgb565>,
}

/// Sink that keeps every write, for inspection in tests and tooling.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    window: Option<Window>,
    writes: Vec<RecordedWrite>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> &[RecordedWrite] {
        &self.writes
    }

    /// Distinct rows written to, in first-seen order.
    pub fn rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = Vec::new();
        for w in &self.writes {
            if !rows.contains(&w.window.y) {
                rows.push(w.window.y);
            }
        }
        rows
    }

    pub fn pixel_count(&self) -> usize {
        self.writes.iter().map(|w| w.pixels.len()).sum()
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.window = None;
        self.writes.clear();
    }
}

impl DisplaySink for RecordingSink {
    fn set_window(&mut self, window: Window) -> Result<()> {
        self.window = Some(window);
        Ok(())
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<()> {
        let window = self
            .window
            .context("RecordingSink: write_pixels before set_window")?;
        self.writes.push(RecordedWrite {
            window,
            pixels: pixels.to_vec(),
        });
        Ok(())
    }
}

/// Headless stand-in for a windowed RGB565 panel.
///
/// Keeps a full-resolution copy of what the panel would show. Writes fill
/// the addressed window row-major and wrap back to its top-left corner, as
/// a real controller's address counter does.
#[derive(Debug, Clone)]
pub struct PanelSink {
    width: usize,
    height: usize,
    pixels: Vec<Rgb565>,
    window: Option<Window>,
    cursor: usize,
    writes: usize,
}

impl PanelSink {
    pub fn new(width: usize, height: usize) -> Self {
        debug!("PanelSink: {}x{}", width, height);
        Self {
            width,
            height,
            pixels: vec![0; width * height],
            window: None,
            cursor: 0,
            writes: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color currently shown at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb565> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn row(&self, y: usize) -> Option<&[Rgb565]> {
        (y < self.height).then(|| &self.pixels[y * self.width..(y + 1) * self.width])
    }

    /// Number of `write_pixels` calls accepted so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Writes the panel contents as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height).context("Failed to write PPM header")?;
        let mut rgb = Vec::with_capacity(self.pixels.len() * 3);
        for &px in &self.pixels {
            let (r, g, b) = rgb565_to_rgb888(px);
            rgb.extend_from_slice(&[r, g, b]);
        }
        out.write_all(&rgb).context("Failed to write PPM pixel data")?;
        out.flush().context("Failed to flush PPM output")?;
        Ok(())
    }
}

impl DisplaySink for PanelSink {
    fn set_window(&mut self, window: Window) -> Result<()> {
        if window.width == 0
            || window.height == 0
            || window.x + window.width > self.width
            || window.y + window.height > self.height
        {
            bail!(
                "PanelSink: window {:?} outside {}x{} panel",
                window,
                self.width,
                self.height
            );
        }
        self.window = Some(window);
        self.cursor = 0;
        Ok(())
    }

    fn write_pixels(&mut self, pixels: &[Rgb565]) -> Result<()> {
        let window = self
            .window
            .context("PanelSink: write_pixels before set_window")?;
        trace!("PanelSink: {} pixels into {:?}", pixels.len(), window);
        let area = window.area();
        for &px in pixels {
            let col = window.x + self.cursor % window.width;
            let row = window.y + self.cursor / window.width;
            self.pixels[row * self.width + col] = px;
            self.cursor = (self.cursor + 1) % area;
        }
        self.writes += 1;
        Ok(())
    }
}
