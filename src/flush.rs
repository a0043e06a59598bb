// src/flush.rs

//! Dirty-band flush scheduler.
//!
//! A flush walks the dirty map row by row and streams every dirty band,
//! translated through the palette, to a [`DisplaySink`] as a one-row
//! window. Clean bands are never sent.
//!
//! When more band cells are dirty than the interlace threshold, the flush
//! switches to interlaced mode and visits only rows of one parity. The
//! parity flips on every flush call, so under sustained heavy drawing the
//! two halves of the screen are refreshed on alternating frames. Rows of
//! the other parity keep their dirty flags and are picked up later.

use crate::canvas::Canvas;
use crate::color::Rgb565;
use crate::palette::Palette;
use crate::sink::{DisplaySink, Window};
use anyhow::Result;
use log::{debug, trace};

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlushState {
    /// Between flushes; drawing accumulates dirty marks.
    #[default]
    Idle,
    /// Streaming bands to the sink.
    Flushing,
}

/// Which rows an interlaced flush visits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowParity {
    #[default]
    Even,
    Odd,
}

impl RowParity {
    fn first_row(self) -> usize {
        match self {
            RowParity::Even => 0,
            RowParity::Odd => 1,
        }
    }

    fn flipped(self) -> Self {
        match self {
            RowParity::Even => RowParity::Odd,
            RowParity::Odd => RowParity::Even,
        }
    }
}

/// Summary of one flush call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlushReport {
    /// Dirty band cells across the whole map when the flush started.
    pub dirty_bands: usize,
    /// Parity of the rows visited, if the flush was interlaced.
    pub interlaced: Option<RowParity>,
    pub rows_visited: usize,
    pub bands_sent: usize,
    pub pixels_sent: usize,
}

/// Streams dirty bands of a [`Canvas`] to a [`DisplaySink`].
#[derive(Debug, Clone)]
pub struct FlushScheduler {
    interlace_threshold: usize,
    state: FlushState,
    scan_parity: RowParity,
    scratch: Vec<Rgb565>,
}

impl FlushScheduler {
    /// A scheduler that interlaces once more than `interlace_threshold` band
    /// cells are dirty.
    pub fn new(interlace_threshold: usize) -> Self {
        Self {
            interlace_threshold,
            state: FlushState::Idle,
            scan_parity: RowParity::Even,
            scratch: Vec::new(),
        }
    }

    pub fn state(&self) -> FlushState {
        self.state
    }

    pub fn interlace_threshold(&self) -> usize {
        self.interlace_threshold
    }

    /// Parity the next interlaced flush will visit.
    pub fn next_parity(&self) -> RowParity {
        self.scan_parity
    }

    /// Sends every dirty band due this call and clears it.
    ///
    /// On a sink error the flush stops, the failed band and everything not
    /// yet sent stay dirty, and the error is returned. The scheduler is
    /// back in [`FlushState::Idle`] either way.
    pub fn flush(
        &mut self,
        canvas: &mut Canvas,
        palette: &Palette,
        sink: &mut dyn DisplaySink,
    ) -> Result<FlushReport> {
        self.state = FlushState::Flushing;
        let result = self.stream(canvas, palette, sink);
        self.state = FlushState::Idle;
        self.scan_parity = self.scan_parity.flipped();
        result
    }

    fn stream(
        &mut self,
        canvas: &mut Canvas,
        palette: &Palette,
        sink: &mut dyn DisplaySink,
    ) -> Result<FlushReport> {
        let dirty_bands = canvas.dirty().dirty_count();
        let interlaced = (dirty_bands > self.interlace_threshold).then_some(self.scan_parity);
        let (first_row, step) = match interlaced {
            Some(parity) => (parity.first_row(), 2),
            None => (0, 1),
        };
        let mut report = FlushReport {
            dirty_bands,
            interlaced,
            ..FlushReport::default()
        };

        let band_width = canvas.dirty().band_width();
        let bands_per_row = canvas.dirty().bands_per_row();
        if self.scratch.len() < band_width {
            self.scratch.resize(band_width, 0);
        }

        for y in (first_row..canvas.height()).step_by(step) {
            report.rows_visited += 1;
            for band in 0..bands_per_row {
                if !canvas.dirty().is_dirty(y, band) {
                    continue;
                }
                let (x0, x1) = canvas.dirty().band_columns(band);
                let len = x1 - x0;
                if let Some(row) = canvas.row(y) {
                    palette.resolve_into(&row[x0..x1], &mut self.scratch[..len]);
                }
                trace!("flush: row {} band {} ({} px at x={})", y, band, len, x0);
                sink.set_window(Window::new(x0, y, len, 1))?;
                sink.write_pixels(&self.scratch[..len])?;
                canvas.dirty_mut().clear_band(y, band);
                report.bands_sent += 1;
                report.pixels_sent += len;
            }
        }

        debug!(
            "flush: {} dirty bands, interlaced={:?}, {} rows visited, {} bands ({} px) sent",
            report.dirty_bands,
            report.interlaced,
            report.rows_visited,
            report.bands_sent,
            report.pixels_sent
        );
        Ok(report)
    }
}
