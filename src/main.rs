// src/main.rs

//! Headless demo: a starfield with a ship that steers toward random targets.
//!
//! Every frame restores the background under the ship, moves and re-rotates
//! it, saves the new background, draws it color-keyed and flushes to an
//! emulated panel. Usage: `indexed-gfx-demo [FRAMES] [OUT.ppm]`.

use anyhow::{Context, Result};
use indexed_gfx::{
    scale_and_rotate, Canvas, Engine, Font, IndexedImage, PanelSink, Point, CONFIG,
};
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;

const DEFAULT_FRAMES: usize = 120;
const FRAME_SECONDS: f32 = 1.0 / 30.0;
const SHIP_SIZE: usize = 32;
const SHIP_SCALE: f32 = 1.5;
/// Palette index treated as transparent in the ship sprite.
const KEY: u8 = 15;

/// Small deterministic xorshift generator so runs are reproducible.
struct Rng(u32);

impl Rng {
    fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    /// Uniform-ish value in `lo..hi`.
    fn range(&mut self, lo: i32, hi: i32) -> i32 {
        lo + (self.next() % (hi - lo) as u32) as i32
    }
}

struct Ship {
    x: f32,
    y: f32,
    theta: f32,
    drawn_theta: f32,
    target: (f32, f32),
    sprite: IndexedImage,
    background: IndexedImage,
}

impl Ship {
    fn origin(&self) -> (i32, i32) {
        (
            self.x as i32 - (self.sprite.width / 2) as i32,
            self.y as i32 - (self.sprite.height / 2) as i32,
        )
    }
}

/// Draws the 32x32 ship sprite with the rasterizer on a scratch canvas.
fn ship_bitmap() -> Result<IndexedImage> {
    let mut scratch = Canvas::new(SHIP_SIZE, SHIP_SIZE, SHIP_SIZE, SHIP_SIZE)?;
    scratch.fill(KEY);
    scratch.fill_triangle(Point::new(16, 1), Point::new(4, 28), Point::new(28, 28), 12);
    scratch.fill_triangle(Point::new(16, 6), Point::new(9, 24), Point::new(23, 24), 13);
    scratch.fill_rect(12, 26, 8, 4, 3);
    scratch.fill_circle(16, 15, 3, 7);
    let mut sprite = IndexedImage::filled(SHIP_SIZE, SHIP_SIZE, KEY);
    scratch.copy_to_bitmap(&mut sprite.as_bitmap_mut(), 0, 0);
    Ok(sprite)
}

fn draw_starfield(engine: &mut Engine, rng: &mut Rng) {
    let (w, h) = {
        let canvas = engine.canvas();
        (canvas.width() as i32, canvas.height() as i32)
    };
    for (count, color) in [(60, 14), (30, 1), (40, 2), (40, 7)] {
        for _ in 0..count {
            let (x, y) = (rng.range(0, w), rng.range(0, h));
            engine.canvas_mut().set_pixel(x, y, color);
        }
    }
}

fn step_ship(ship: &mut Ship, rng: &mut Rng, width: i32, height: i32) {
    let (tx, ty) = ship.target;
    let heading = (ty - ship.y).atan2(tx - ship.x).to_degrees() + 90.0;
    if (heading - ship.theta).abs() > 180.0 {
        ship.theta += if ship.theta < 0.0 { 360.0 } else { -360.0 };
    }
    let turn = (3.0 * (heading - ship.theta)).clamp(-180.0, 180.0);
    ship.theta += turn * FRAME_SECONDS;

    let damping = 1.0 / (1.0 + 0.1 * (heading - ship.theta).abs());
    ship.x += 0.5 * (tx - ship.x) * damping * FRAME_SECONDS;
    ship.y += 0.5 * (ty - ship.y) * damping * FRAME_SECONDS;

    if (ship.x - tx).abs() < 40.0 && (ship.y - ty).abs() < 40.0 {
        ship.target = (rng.range(0, width) as f32, rng.range(0, height) as f32);
        debug!("Ship: new target {:?}", ship.target);
    }
}

/// Saves what is under the sprite, then draws it color-keyed.
fn place_ship(engine: &mut Engine, ship: &mut Ship) {
    let (x, y) = ship.origin();
    ship.background = IndexedImage::filled(ship.sprite.width, ship.sprite.height, KEY);
    engine
        .canvas()
        .copy_to_bitmap(&mut ship.background.as_bitmap_mut(), x, y);
    engine
        .canvas_mut()
        .draw_bitmap_keyed(&ship.sprite.as_bitmap(), x, y, KEY);
}

fn main() -> Result<()> {
    // Initialize the logger. Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting indexed-gfx demo...");

    let mut args = std::env::args().skip(1);
    let frames = match args.next() {
        Some(n) => n.parse::<usize>().with_context(|| format!("Invalid frame count '{}'", n))?,
        None => DEFAULT_FRAMES,
    };
    let output = args.next();

    let config = &*CONFIG;
    let mut engine = Engine::begin(config).context("Failed to start the engine")?;
    engine.set_font(Font::default_8x8());
    let mut panel = PanelSink::new(config.canvas.width, config.canvas.height);
    let (width, height) = (config.canvas.width as i32, config.canvas.height as i32);

    let mut rng = Rng(0x2545_F491);
    draw_starfield(&mut engine, &mut rng);

    let base = ship_bitmap()?;
    let theta = rng.range(0, 360) as f32;
    let sprite = scale_and_rotate(&base.as_bitmap(), SHIP_SCALE, SHIP_SCALE, theta, KEY)?;
    let mut ship = Ship {
        x: rng.range(30, (width - 30).max(31)) as f32,
        y: rng.range(30, (height - 30).max(31)) as f32,
        theta,
        drawn_theta: theta,
        target: (rng.range(0, width) as f32, rng.range(0, height) as f32),
        sprite,
        background: IndexedImage::default(),
    };
    place_ship(&mut engine, &mut ship);
    engine.update(&mut panel)?;

    let mut sent = 0usize;
    for frame in 0..frames {
        let (x, y) = ship.origin();
        engine.canvas_mut().draw_bitmap(&ship.background.as_bitmap(), x, y);

        step_ship(&mut ship, &mut rng, width, height);
        if (ship.theta - ship.drawn_theta).abs() >= 2.0 {
            ship.sprite = scale_and_rotate(&base.as_bitmap(), SHIP_SCALE, SHIP_SCALE, ship.theta, KEY)?;
            ship.drawn_theta = ship.theta;
        }
        place_ship(&mut engine, &mut ship);

        engine.canvas_mut().fill_rect(0, 0, 96, 16, KEY);
        engine.draw_string_2x(0, 0, format!("F{}", frame), 3);

        let report = engine.update(&mut panel)?;
        sent += report.pixels_sent;
    }

    info!(
        "Rendered {} frames, {} pixels sent ({:.1} per frame)",
        frames,
        sent,
        sent as f64 / frames.max(1) as f64
    );

    if let Some(path) = output {
        let file = File::create(&path).with_context(|| format!("Failed to create {}", path))?;
        panel.write_ppm(BufWriter::new(file))?;
        info!("Panel written to {}", path);
    }
    Ok(())
}
