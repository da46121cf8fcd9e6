//! Gamma-corrected brightness mapping from coarse levels to scan pulse widths.
//!
//! The scan engine drives one pixel per slot; perceived brightness comes from
//! how long that pixel stays on within its slot. [`GammaLut`] precomputes the
//! level-to-on-time mapping once at init so the slot interrupt only indexes a
//! table.

use crate::scan::BR_STEPS;

/// Default perceptual gamma exponent.
pub const GAMMA_DEFAULT: f32 = 2.8;

/// Entries in the lookup table (8-bit normalized level).
const LUT_SIZE: usize = 256;

/// Spread factor expanding a coarse brightness step to the 8-bit table index
/// (`(BR_STEPS - 1) * LEVEL_SPREAD == 255`).
const LEVEL_SPREAD: u16 = 255 / (BR_STEPS as u16 - 1);

/// Precomputed gamma/brightness lookup: normalized level to pulse compare value.
///
/// Built once at init from a gamma exponent and the scan timer's reload value;
/// read-only thereafter. Entries are capped at half the reload so a pixel's
/// on-time never exceeds half its scan slot, bounding total matrix duty cycle.
#[derive(Clone, Debug)]
pub struct GammaLut {
    table: [u16; LUT_SIZE],
    reload: u16,
}

impl GammaLut {
    /// Build the table: `table[i] = round((i/255)^gamma * reload * 0.5)`.
    #[must_use]
    pub fn new(gamma: f32, reload: u16) -> Self {
        let mut table = [0u16; LUT_SIZE];
        for (index, entry) in table.iter_mut().enumerate() {
            let norm = index as f32 / 255.0;
            let corrected = libm::powf(norm, gamma);
            *entry = (corrected * f32::from(reload) * 0.5 + 0.5) as u16;
        }
        Self { table, reload }
    }

    /// The scan timer reload value this table was built for.
    #[must_use]
    pub const fn reload(&self) -> u16 {
        self.reload
    }

    /// Pulse compare value for a coarse brightness step under the global dimmer.
    ///
    /// `level` is a framebuffer step in `0..BR_STEPS` (over-range clamps to the
    /// top step); `master` is the 8-bit global dimmer. `master == 0` forces a
    /// zero pulse regardless of level. The result never exceeds the reload.
    #[must_use]
    pub fn apply(&self, level: u8, master: u8) -> u16 {
        let step = u16::from(level).min(BR_STEPS as u16 - 1);
        let base = self.table[(step * LEVEL_SPREAD) as usize];
        let scaled = (u32::from(base) * u32::from(master)) / 255;
        (scaled as u16).min(self.reload)
    }
}
