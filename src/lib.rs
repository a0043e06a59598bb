// src/lib.rs

//! Software rasterizer for a fixed-resolution, palette-indexed display.
//!
//! Drawing happens on an 8-bit indexed [`Canvas`] held in two storage
//! sectors. Each write marks a coarse dirty band, and
//! [`Engine::update`] streams only the dirty bands, resolved through the
//! [`Palette`] to RGB565, to a [`DisplaySink`]. Under heavy load the flush
//! interlaces rows to halve the bandwidth of a frame.

pub mod bitmap;
pub mod canvas;
pub mod color;
pub mod config;
pub mod dirty;
pub mod engine;
pub mod flush;
pub mod font;
pub mod framebuffer;
pub mod palette;
pub mod raster;
pub mod sink;
pub mod text;
pub mod transform;

pub use bitmap::{Bitmap, BitmapMut, IndexedImage, MonoBitmap};
pub use canvas::{crop_to_viewport, Canvas, Span};
pub use color::{rgb565, NamedColor, Rgb565};
pub use config::{Config, CONFIG};
pub use engine::Engine;
pub use flush::{FlushReport, FlushScheduler, FlushState, RowParity};
pub use font::Font;
pub use palette::Palette;
pub use raster::Point;
pub use sink::{DisplaySink, PanelSink, RecordingSink, Window};
pub use text::{GlyphScale, LayoutToken, TextRenderer};
pub use transform::{scale_and_rotate, scale_and_rotate_into, transformed_size};
