// src/palette.rs

//! The palette maps 8-bit color indices to the RGB565 values the panel expects.
//!
//! Only the flush path reads it. Loading is wholesale: every load starts from
//! an all-zero table, so indices past the loaded size resolve to `0`.

use crate::color::{NamedColor, Rgb565};
use log::{info, warn};

/// Number of addressable palette entries (the whole 8-bit index space).
pub const PALETTE_SIZE: usize = 256;

/// 256-entry index → RGB565 lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [Rgb565; PALETTE_SIZE],
    loaded: usize,
}

impl Palette {
    /// A palette with every entry zeroed.
    pub fn empty() -> Self {
        Self {
            entries: [0; PALETTE_SIZE],
            loaded: 0,
        }
    }

    /// A palette holding the 16 default colors.
    pub fn with_defaults() -> Self {
        let mut palette = Self::empty();
        palette.load_default();
        palette
    }

    /// Installs the 16 default colors at indices 0-15 and zeroes the rest.
    pub fn load_default(&mut self) {
        self.entries = [0; PALETTE_SIZE];
        for named in NamedColor::ALL {
            self.entries[named.index() as usize] = named.to_rgb565();
        }
        self.loaded = NamedColor::ALL.len();
        info!("Palette: default 16-color palette loaded");
    }

    /// Replaces the palette with `colors`, starting at index 0.
    ///
    /// The whole table is zeroed first. Entries past index 255 cannot be
    /// addressed and are dropped with a warning.
    pub fn load(&mut self, colors: &[Rgb565]) {
        let count = if colors.len() > PALETTE_SIZE {
            warn!(
                "Palette: load of {} colors exceeds {} entries; extra colors ignored",
                colors.len(),
                PALETTE_SIZE
            );
            PALETTE_SIZE
        } else {
            colors.len()
        };

        self.entries = [0; PALETTE_SIZE];
        self.entries[..count].copy_from_slice(&colors[..count]);
        self.loaded = count;
        info!("Palette: {} colors loaded", count);
    }

    /// RGB565 value for `index`.
    #[inline]
    pub fn get(&self, index: u8) -> Rgb565 {
        self.entries[index as usize]
    }

    /// How many entries the last load installed.
    pub fn loaded_len(&self) -> usize {
        self.loaded
    }

    /// Full 256-entry table.
    pub fn entries(&self) -> &[Rgb565; PALETTE_SIZE] {
        &self.entries
    }

    /// Translates a run of indexed pixels into `out`.
    ///
    /// Translates `min(indices.len(), out.len())` pixels.
    pub fn resolve_into(&self, indices: &[u8], out: &mut [Rgb565]) {
        for (dst, &idx) in out.iter_mut().zip(indices) {
            *dst = self.entries[idx as usize];
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::with_defaults()
    }
}
