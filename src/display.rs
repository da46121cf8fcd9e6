//! Foreground display handle over the shared scan state.
//!
//! The framebuffer and active set are owned jointly by two execution
//! contexts: the foreground render code (clock face, fluid animation) and the
//! periodic scan slot driver. [`ScanShared`] makes that sharing explicit: a
//! critical-section-guarded [`ScanCore`](crate::scan::ScanCore), mutated by
//! the foreground through [`Display`] in minimal critical sections and read
//! by the slot driver once per scan slot. There are no ambient globals; the
//! static lives in a [`DisplayStatic`] the application declares.
//!
//! # Example
//!
//! ```rust,no_run
//! use tilt_clock::display::{Display, DisplayStatic, PixelGrid};
//! use tilt_clock::wiring::CharlieLayout;
//!
//! const LAYOUT: CharlieLayout<225, 15, 15, 16> = CharlieLayout::complete();
//! static DISPLAY_STATIC: DisplayStatic<225> = DisplayStatic::new_static();
//!
//! let display = Display::new(&DISPLAY_STATIC, &LAYOUT);
//! display.set_pixel(7, 7, 15);
//! assert_eq!(display.level(7, 7), 15);
//! display.clear();
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::Gray8;
use embedded_graphics::prelude::GrayColor;

use crate::scan::{LEVEL_MAX, ScanCore};
use crate::wiring::CharlieLayout;

/// The scan core behind a critical-section lock, shareable between the
/// foreground and the slot interrupt context.
pub type ScanShared<const N: usize> = Mutex<CriticalSectionRawMutex, RefCell<ScanCore<N>>>;

/// Static state for a [`Display`]; declare one per matrix.
pub struct DisplayStatic<const N: usize> {
    /// The shared scan core, also handed to the scan device task.
    pub scan: ScanShared<N>,
}

impl<const N: usize> DisplayStatic<N> {
    /// Create the static scan state.
    #[must_use]
    pub const fn new_static() -> Self {
        Self {
            scan: Mutex::new(RefCell::new(ScanCore::new())),
        }
    }
}

/// Rendering surface: the seam between renderers and the display.
///
/// The clock face, glyph drawing, and the fluid simulator all draw through
/// this trait, so host tests can render onto a [`Display`] without any
/// hardware behind it. Coordinates are `(row, col)` with `(0, 0)` top-left;
/// out-of-range writes are a no-op and over-range levels clamp.
pub trait PixelGrid {
    /// Number of columns.
    fn width(&self) -> usize;
    /// Number of rows.
    fn height(&self) -> usize;
    /// Set one pixel's brightness step.
    fn set_pixel(&self, row: usize, col: usize, level: u8);
    /// Read back one pixel's brightness step (0 if out of range).
    fn level(&self, row: usize, col: usize) -> u8;
    /// Reset every pixel to 0.
    fn clear(&self);

    /// Fill a `width x height` rectangle with one level, clipped to bounds.
    fn fill_region(&self, row0: usize, col0: usize, width: usize, height: usize, level: u8) {
        for row in row0..row0.saturating_add(height) {
            for col in col0..col0.saturating_add(width) {
                self.set_pixel(row, col, level);
            }
        }
    }
}

/// Foreground handle for a charlieplexed matrix display.
///
/// Cheap to copy; every method takes one short critical section around the
/// active-set mutation so the scan interrupt never observes a half-updated
/// set. See the [module docs](self) for the sharing model.
#[derive(Clone, Copy)]
pub struct Display<const N: usize, const W: usize, const H: usize, const PINS: usize> {
    shared: &'static ScanShared<N>,
    layout: &'static CharlieLayout<N, W, H, PINS>,
}

impl<const N: usize, const W: usize, const H: usize, const PINS: usize> Display<N, W, H, PINS> {
    /// Create a display handle over its static state and wiring table.
    #[must_use]
    pub fn new(
        display_static: &'static DisplayStatic<N>,
        layout: &'static CharlieLayout<N, W, H, PINS>,
    ) -> Self {
        const {
            assert!(W * H == N, "width * height must equal N");
        }
        Self {
            shared: &display_static.scan,
            layout,
        }
    }

    /// The shared scan core, for handing to the scan device task.
    #[must_use]
    pub fn scan_shared(&self) -> &'static ScanShared<N> {
        self.shared
    }

    /// The wiring table this display renders through.
    #[must_use]
    pub fn layout(&self) -> &'static CharlieLayout<N, W, H, PINS> {
        self.layout
    }

    /// Set every wired pixel to `level` through the normal membership
    /// transitions (an explicit force-all, idempotent and invariant-safe).
    pub fn all_on(&self, level: u8) {
        self.shared.lock(|core| {
            let mut core = core.borrow_mut();
            for idx in 0..N {
                core.set_level(idx, level, self.layout.pair(idx));
            }
        });
    }

    /// Set the global dimmer (0 blanks the matrix without touching levels).
    pub fn set_master(&self, master: u8) {
        self.shared.lock(|core| core.borrow_mut().set_master(master));
    }

    /// Current global dimmer.
    #[must_use]
    pub fn master(&self) -> u8 {
        self.shared.lock(|core| core.borrow().master())
    }

    /// Number of currently lit pixels.
    #[must_use]
    pub fn active_len(&self) -> usize {
        self.shared.lock(|core| core.borrow().active_len())
    }

    fn index(row: usize, col: usize) -> Option<usize> {
        (row < H && col < W).then(|| row * W + col)
    }
}

impl<const N: usize, const W: usize, const H: usize, const PINS: usize> PixelGrid
    for Display<N, W, H, PINS>
{
    fn width(&self) -> usize {
        W
    }

    fn height(&self) -> usize {
        H
    }

    fn set_pixel(&self, row: usize, col: usize, level: u8) {
        let Some(idx) = Self::index(row, col) else {
            return;
        };
        self.shared.lock(|core| {
            core.borrow_mut()
                .set_level(idx, level, self.layout.pair(idx));
        });
    }

    fn level(&self, row: usize, col: usize) -> u8 {
        let Some(idx) = Self::index(row, col) else {
            return 0;
        };
        self.shared.lock(|core| core.borrow().level(idx))
    }

    fn clear(&self) {
        self.shared.lock(|core| core.borrow_mut().clear());
    }

    fn fill_region(&self, row0: usize, col0: usize, width: usize, height: usize, level: u8) {
        // One critical section for the whole rectangle.
        self.shared.lock(|core| {
            let mut core = core.borrow_mut();
            for row in row0..row0.saturating_add(height) {
                for col in col0..col0.saturating_add(width) {
                    if let Some(idx) = Self::index(row, col) {
                        core.set_level(idx, level, self.layout.pair(idx));
                    }
                }
            }
        });
    }
}

impl<const N: usize, const W: usize, const H: usize, const PINS: usize> OriginDimensions
    for Display<N, W, H, PINS>
{
    fn size(&self) -> Size {
        Size::new(W as u32, H as u32)
    }
}

impl<const N: usize, const W: usize, const H: usize, const PINS: usize> DrawTarget
    for Display<N, W, H, PINS>
{
    type Color = Gray8;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0 && point.y >= 0 {
                // Quantize 8-bit luma down to the coarse brightness steps.
                let level = (color.luma() >> 4).min(LEVEL_MAX);
                self.set_pixel(point.y as usize, point.x as usize, level);
            }
        }
        Ok(())
    }
}
