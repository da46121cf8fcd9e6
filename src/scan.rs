//! Core of the multiplexed scan engine: framebuffer, active-pixel set, and
//! slot selection.
//!
//! [`ScanCore`] is pure data plus transitions, with no locking and no
//! hardware access, so the host tests can exercise it directly. The shared
//! foreground/interrupt wrapper lives in [`crate::display`]; the pin driver
//! and slot timing live in `scan_driver`.

use crate::gamma::GammaLut;
use crate::wiring::PixelPair;

/// Number of coarse brightness steps a pixel can hold (`0` = off).
///
/// Brightness precision is intentionally coarse; the gamma LUT expands a step
/// to an 8-bit index before pulse-width mapping.
pub const BR_STEPS: usize = 16;

/// Highest valid brightness step.
pub const LEVEL_MAX: u8 = (BR_STEPS - 1) as u8;

/// One active-set entry: a lit pixel with its resolved pin pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveEntry {
    /// Row-major pixel index.
    pub idx: u16,
    /// Resolved charlieplex pin pair for the pixel.
    pub pair: PixelPair,
}

const ENTRY_EMPTY: ActiveEntry = ActiveEntry {
    idx: 0,
    pair: PixelPair {
        anode: 0,
        cathode: 1,
    },
};

/// Reverse-lookup sentinel: pixel not in the active set.
const SLOT_ABSENT: i16 = -1;

/// What the slot interrupt should do for one scan slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPulse {
    /// Nothing to light; release any driven pair.
    Idle,
    /// Energize `pair` for `on_ticks` timer ticks, then release.
    Drive {
        /// Pin pair to energize (cathode low, then anode high).
        pair: PixelPair,
        /// Gamma-corrected, dimmer-scaled on-time in timer ticks.
        /// Always nonzero; a zero-width pulse yields [`SlotPulse::Idle`].
        on_ticks: u16,
    },
}

/// Framebuffer plus incrementally-maintained active-pixel set.
///
/// Struct-of-arrays, statically sized, no allocation:
/// - `levels[idx]` — per-pixel brightness step (`0..BR_STEPS`)
/// - `active[0..active_len]` — dense list of lit pixels with pin pairs
/// - `slot_of[idx]` — position of `idx` in `active`, or absent
/// - `cursor` — next active-set position to strobe, wrapping
///
/// Invariants (checked by the host tests):
/// - a pixel appears in the active set iff its level is nonzero, exactly once;
/// - `slot_of` is a bijection onto `0..active_len` for lit pixels;
/// - removal is O(1) via swap-with-last (scan order is not preserved across
///   removals, which is fine for a multiplex scan).
pub struct ScanCore<const N: usize> {
    levels: [u8; N],
    active: [ActiveEntry; N],
    slot_of: [i16; N],
    active_len: u16,
    cursor: u16,
    master: u8,
}

impl<const N: usize> ScanCore<N> {
    /// A cleared core: all levels zero, empty active set, full master dimmer.
    #[must_use]
    pub const fn new() -> Self {
        assert!(N <= i16::MAX as usize, "pixel count must fit the reverse lookup");
        Self {
            levels: [0; N],
            active: [ENTRY_EMPTY; N],
            slot_of: [SLOT_ABSENT; N],
            active_len: 0,
            cursor: 0,
            master: 255,
        }
    }

    /// Brightness step currently stored for pixel `idx` (0 if out of range).
    #[must_use]
    pub fn level(&self, idx: usize) -> u8 {
        self.levels.get(idx).copied().unwrap_or(0)
    }

    /// Number of pixels currently in the active set.
    #[must_use]
    pub fn active_len(&self) -> usize {
        usize::from(self.active_len)
    }

    /// Position of pixel `idx` in the active set, if lit.
    #[must_use]
    pub fn slot_of(&self, idx: usize) -> Option<usize> {
        let slot = *self.slot_of.get(idx)?;
        (slot >= 0).then_some(slot as usize)
    }

    /// Active-set entry at `slot`, if within the current length.
    #[must_use]
    pub fn entry(&self, slot: usize) -> Option<ActiveEntry> {
        (slot < self.active_len()).then(|| self.active[slot])
    }

    /// Global dimmer (0 forces all pulses to zero).
    #[must_use]
    pub fn master(&self) -> u8 {
        self.master
    }

    /// Set the global dimmer.
    pub fn set_master(&mut self, master: u8) {
        self.master = master;
    }

    /// Write a brightness step for pixel `idx`, maintaining set membership.
    ///
    /// `pair` is the pixel's wiring; `None` (unwired cell) keeps the pixel out
    /// of the active set no matter the level. Levels clamp to [`LEVEL_MAX`].
    /// A 0→nonzero transition adds the pixel, nonzero→0 removes it, and a
    /// nonzero→nonzero change updates brightness in place without touching
    /// membership or order. Out-of-range indices are a no-op.
    pub fn set_level(&mut self, idx: usize, level: u8, pair: Option<PixelPair>) {
        if idx >= N {
            return;
        }
        let level = level.min(LEVEL_MAX);
        let old = self.levels[idx];
        self.levels[idx] = level;

        if old == 0 && level != 0 {
            if let Some(pair) = pair {
                self.activate(idx, pair);
            } else {
                // Unwired cell: hold brightness but never scan it.
                self.levels[idx] = 0;
            }
        } else if old != 0 && level == 0 {
            self.deactivate(idx);
        }
        // else: brightness changed but remains active; leave position stable
    }

    /// Reset every pixel to 0 and empty the active set.
    pub fn clear(&mut self) {
        self.levels = [0; N];
        self.slot_of = [SLOT_ABSENT; N];
        self.active_len = 0;
        self.cursor = 0;
    }

    /// Select and consume the next scan slot.
    ///
    /// Empty active set yields [`SlotPulse::Idle`]. Otherwise the pixel at the
    /// cursor is selected, the cursor advances (wrapping past the end), and
    /// the gamma/dimmer-scaled on-time is returned, capped at the LUT's
    /// reload. A pulse that would round to zero width (dimmer at 0, or the
    /// bottom of the gamma table) yields [`SlotPulse::Idle`] so the slot
    /// driver never energizes a pair just to release it; the cursor still
    /// consumes the slot. With `N` active pixels and no intervening
    /// membership change, `N` consecutive calls visit each active pixel
    /// exactly once.
    pub fn slot_start(&mut self, lut: &GammaLut) -> SlotPulse {
        let len = self.active_len;
        if len == 0 {
            return SlotPulse::Idle;
        }

        let mut pos = self.cursor;
        if pos >= len {
            pos = 0;
        }
        let entry = self.active[usize::from(pos)];
        self.cursor = pos + 1;

        let level = self.levels[usize::from(entry.idx)];
        if level == 0 {
            // Raced with a foreground write; skip this slot.
            return SlotPulse::Idle;
        }

        let on_ticks = lut.apply(level, self.master);
        if on_ticks == 0 {
            // Dimmed to nothing; driving the pair would still leak a sliver
            // of light while the driver waits to release it.
            return SlotPulse::Idle;
        }

        SlotPulse::Drive {
            pair: entry.pair,
            on_ticks,
        }
    }

    fn activate(&mut self, idx: usize, pair: PixelPair) {
        if self.slot_of[idx] >= 0 {
            return; // already active
        }
        let slot = usize::from(self.active_len);
        self.active[slot] = ActiveEntry {
            idx: idx as u16,
            pair,
        };
        self.slot_of[idx] = slot as i16;
        self.active_len += 1;
    }

    fn deactivate(&mut self, idx: usize) {
        let slot = self.slot_of[idx];
        if slot < 0 {
            return; // already inactive
        }
        let slot = slot as usize;
        let last = usize::from(self.active_len) - 1;
        if slot != last {
            // Move the last entry into the hole.
            self.active[slot] = self.active[last];
            self.slot_of[usize::from(self.active[slot].idx)] = slot as i16;
        }
        self.active_len = last as u16;
        self.slot_of[idx] = SLOT_ABSENT;
        if self.cursor > self.active_len {
            self.cursor = 0; // keep the cursor valid after shrink
        }
    }
}

impl<const N: usize> Default for ScanCore<N> {
    fn default() -> Self {
        Self::new()
    }
}
