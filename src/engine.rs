// src/engine.rs

//! The engine object: sole owner of the canvas, palette, flush scheduler and
//! active font.
//!
//! One frame is a run of draw calls on [`Engine::canvas_mut`] (or the text
//! helpers here) followed by one [`Engine::update`]. Nothing in the engine is
//! shared or global; callers that need to drive it from several threads must
//! wrap the whole engine in their own lock.

use crate::canvas::Canvas;
use crate::color::{NamedColor, Rgb565};
use crate::config::Config;
use crate::flush::{FlushReport, FlushScheduler};
use crate::font::Font;
use crate::palette::Palette;
use crate::sink::DisplaySink;
use crate::text::{GlyphScale, TextRenderer};
use anyhow::{Context, Result};
use log::{info, warn};

/// Rendering engine for one indexed-color display.
#[derive(Debug)]
pub struct Engine {
    canvas: Canvas,
    palette: Palette,
    scheduler: FlushScheduler,
    font: Option<Font>,
}

impl Engine {
    /// Allocates the canvas, installs the default palette and clears the
    /// screen to black. The first [`Engine::update`] repaints the whole panel.
    pub fn begin(config: &Config) -> Result<Self> {
        config.validate().context("Invalid engine configuration")?;
        let canvas = Canvas::new(
            config.canvas.width,
            config.canvas.height,
            config.canvas.top_sector_rows,
            config.flush.band_width,
        )
        .context("Failed to allocate the canvas")?;

        let mut engine = Self {
            canvas,
            palette: Palette::with_defaults(),
            scheduler: FlushScheduler::new(config.flush.interlace_threshold),
            font: None,
        };
        engine.fill_screen(NamedColor::Black.index());
        info!(
            "Engine: started {}x{} canvas, interlace above {} dirty bands",
            config.canvas.width, config.canvas.height, config.flush.interlace_threshold
        );
        Ok(engine)
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn scheduler(&self) -> &FlushScheduler {
        &self.scheduler
    }

    /// Replaces the palette. Colors beyond 256 are dropped.
    ///
    /// Already-drawn pixels are not marked dirty; the new colors reach the
    /// panel as regions are next redrawn.
    pub fn load_palette(&mut self, colors: &[Rgb565]) {
        self.palette.load(colors);
    }

    pub fn load_default_palette(&mut self) {
        self.palette.load_default();
    }

    /// Fills the whole canvas with `color` and marks everything dirty.
    pub fn fill_screen(&mut self, color: u8) {
        self.canvas.fill(color);
    }

    /// Flushes dirty bands to `sink`.
    pub fn update(&mut self, sink: &mut dyn DisplaySink) -> Result<FlushReport> {
        self.scheduler.flush(&mut self.canvas, &self.palette, sink)
    }

    /// Makes `font` the active font for the text helpers.
    pub fn set_font(&mut self, font: Font) {
        info!("Engine: font set ({}x{})", font.width(), font.height());
        self.font = Some(font);
    }

    pub fn font(&self) -> Option<&Font> {
        self.font.as_ref()
    }

    pub fn draw_char(&mut self, x: i32, y: i32, code: u8, color: u8) {
        self.draw_glyph(x, y, code, color, GlyphScale::Normal);
    }

    pub fn draw_char_2x(&mut self, x: i32, y: i32, code: u8, color: u8) {
        self.draw_glyph(x, y, code, color, GlyphScale::Double);
    }

    pub fn draw_string(&mut self, x: i32, y: i32, text: impl AsRef<[u8]>, color: u8) {
        self.draw_text(x, y, text.as_ref(), color, GlyphScale::Normal);
    }

    pub fn draw_string_2x(&mut self, x: i32, y: i32, text: impl AsRef<[u8]>, color: u8) {
        self.draw_text(x, y, text.as_ref(), color, GlyphScale::Double);
    }

    fn draw_glyph(&mut self, x: i32, y: i32, code: u8, color: u8, scale: GlyphScale) {
        match &self.font {
            Some(font) => TextRenderer::new(font).draw_char(&mut self.canvas, x, y, code, color, scale),
            None => warn!("Engine: draw_char with no font set"),
        }
    }

    fn draw_text(&mut self, x: i32, y: i32, text: &[u8], color: u8, scale: GlyphScale) {
        match &self.font {
            Some(font) => {
                TextRenderer::new(font).draw_string(&mut self.canvas, x, y, text, color, scale);
            }
            None => warn!("Engine: draw_string with no font set"),
        }
    }
}
