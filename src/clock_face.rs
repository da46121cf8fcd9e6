//! Digital clock face rendering and the curtain reveal/close transitions.
//!
//! The face is four 3x5 digits and a blinking colon, vertically centered.
//! Times display in 12-hour form with the leading zero suppressed: the tens
//! glyph is blanked (not drawn as "0") and the remaining glyphs shift half a
//! glyph left to stay centered.
//!
//! Curtain transitions are time-boxed blocking animations: two horizontal
//! lines move outward from the center row (reveal) or back inward (close)
//! under an exponential ease-in curve, masking the clock outside the band.
//! The pure band math ([`Curtain::band`]) is host-testable; the async players
//! drive it at a fixed frame interval on the device.

use crate::display::PixelGrid;
use crate::font::{DIGIT_SP, HEX_H, HEX_W, clear_digit_3x5, draw_colon, draw_digit_3x5};
use crate::scan::LEVEL_MAX;

/// Brightness step used for the clock glyphs.
pub const TIME_LEVEL: u8 = LEVEL_MAX;

/// Frame interval for curtain animations.
pub const CURTAIN_FRAME_MS: u32 = 20;

/// Horizontal glyph positions of the face, possibly shifted for a suppressed
/// tens digit. Columns are signed; glyph cells left of column 0 are clipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceColumns {
    /// Hour tens glyph (blanked when suppressed).
    pub hour_tens: i32,
    /// Hour ones glyph.
    pub hour_ones: i32,
    /// Colon column.
    pub colon: i32,
    /// Minute tens glyph.
    pub minute_tens: i32,
    /// Minute ones glyph.
    pub minute_ones: i32,
}

/// Top row of the vertically centered face band.
#[must_use]
pub fn face_row(grid: &impl PixelGrid) -> usize {
    (grid.height().saturating_sub(HEX_H)) / 2
}

/// Face column positions for a grid, shifted half a glyph left when the hour
/// tens digit is suppressed so the three remaining glyphs stay centered.
#[must_use]
pub fn face_columns(grid: &impl PixelGrid, suppress_tens: bool) -> FaceColumns {
    let face_width = HEX_W * 4 + 3 * DIGIT_SP;
    let left = (grid.width().saturating_sub(face_width)) / 2;
    let shift: i32 = if suppress_tens {
        -((HEX_W + DIGIT_SP) as i32 / 2)
    } else {
        0
    };
    let hour_tens = left as i32 + shift;
    let hour_ones = hour_tens + (HEX_W + DIGIT_SP) as i32;
    let colon = hour_ones + HEX_W as i32;
    FaceColumns {
        hour_tens,
        hour_ones,
        colon,
        minute_tens: colon + DIGIT_SP as i32,
        minute_ones: colon + DIGIT_SP as i32 + (HEX_W + DIGIT_SP) as i32,
    }
}

/// Draw the clock face for a 24-hour wall time.
///
/// `hour24 = 0` displays as 12; the colon is lit on even seconds. Both set
/// and unset glyph cells are written, so repeated calls fully refresh the
/// face region.
pub fn draw_clock(grid: &impl PixelGrid, hour24: u8, minute: u8, second: u8) {
    let mut hour12 = hour24 % 12;
    if hour12 == 0 {
        hour12 = 12;
    }
    let hour_tens = hour12 / 10;
    let suppress_tens = hour_tens == 0;

    let row0 = face_row(grid);
    let cols = face_columns(grid, suppress_tens);

    if suppress_tens {
        // Blank the glyph region instead of drawing a "0".
        clear_glyph_signed(grid, row0, cols.hour_tens);
    } else {
        draw_digit_signed(grid, row0, cols.hour_tens, hour_tens, TIME_LEVEL);
    }
    draw_digit_signed(grid, row0, cols.hour_ones, hour12 % 10, TIME_LEVEL);
    draw_digit_signed(grid, row0, cols.minute_tens, minute / 10, TIME_LEVEL);
    draw_digit_signed(grid, row0, cols.minute_ones, minute % 10, TIME_LEVEL);
    if cols.colon >= 0 {
        draw_colon(grid, row0, cols.colon as usize, second % 2 == 0, TIME_LEVEL);
    }
}

fn draw_digit_signed(grid: &impl PixelGrid, row0: usize, col0: i32, digit: u8, level: u8) {
    if col0 >= 0 {
        draw_digit_3x5(grid, row0, col0 as usize, digit, level);
    }
}

fn clear_glyph_signed(grid: &impl PixelGrid, row0: usize, col0: i32) {
    if col0 >= 0 {
        clear_digit_3x5(grid, row0, col0 as usize);
    } else {
        // Partially clipped: clear only the in-range columns.
        let width = (HEX_W as i32 + col0).max(0) as usize;
        grid.fill_region(row0, 0, width, HEX_H, 0);
    }
}

// ============================================================================
// Curtain transitions
// ============================================================================

/// Direction of a curtain transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurtainMode {
    /// Lines sweep outward from the center; ends showing the full clock.
    Reveal,
    /// Lines sweep back inward; ends on a blanked display.
    Close,
}

/// The visible band of one curtain frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurtainBand {
    /// Top edge row (may be negative once the band passes the matrix edge).
    pub top: i32,
    /// Bottom edge row (may exceed the last row).
    pub bottom: i32,
    /// Whether the animation has reached its end time.
    pub done: bool,
}

/// Time-parameterized curtain band computation (pure; no display access).
#[derive(Clone, Copy, Debug)]
pub struct Curtain {
    /// Which way the lines sweep.
    pub mode: CurtainMode,
    /// Total animation duration.
    pub duration_ms: u32,
    start_row: usize,
    travel_rows: usize,
}

impl Curtain {
    /// A reveal sweeping outward from the grid's center row.
    #[must_use]
    pub fn reveal(duration_ms: u32, grid_height: usize) -> Self {
        Self {
            mode: CurtainMode::Reveal,
            duration_ms,
            start_row: grid_height / 2,
            travel_rows: grid_height / 2,
        }
    }

    /// A close sweeping back into the grid's center row.
    #[must_use]
    pub fn close(duration_ms: u32, grid_height: usize) -> Self {
        Self {
            mode: CurtainMode::Close,
            duration_ms,
            start_row: grid_height / 2,
            travel_rows: grid_height / 2,
        }
    }

    /// Band edges at `elapsed_ms` into the animation.
    #[must_use]
    pub fn band(&self, elapsed_ms: u32) -> CurtainBand {
        let t = if self.duration_ms == 0 {
            1.0
        } else {
            (elapsed_ms as f32 / self.duration_ms as f32).min(1.0)
        };
        let eased = match self.mode {
            CurtainMode::Reveal => ease_in_expo(t),
            // Run the easing backwards: offset travels back to the center.
            CurtainMode::Close => ease_in_expo(1.0 - t),
        };
        let offset = (eased * self.travel_rows as f32) as i32;
        CurtainBand {
            top: self.start_row as i32 - offset,
            bottom: self.start_row as i32 + offset,
            done: t >= 1.0,
        }
    }
}

fn ease_in_expo(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        libm::powf(2.0, 10.0 * (t - 1.0))
    }
}

/// Render one curtain frame: full clock, masked outside the band, with the
/// band edge rows drawn at full brightness.
pub fn apply_curtain_frame(
    grid: &impl PixelGrid,
    band: &CurtainBand,
    hour24: u8,
    minute: u8,
    second: u8,
) {
    let width = grid.width();
    let height = grid.height() as i32;

    grid.clear();
    draw_clock(grid, hour24, minute, second);

    // Mask above the top edge and below the bottom edge.
    if band.top > 0 {
        grid.fill_region(0, 0, width, band.top as usize, 0);
    }
    if band.bottom + 1 < height {
        let first_masked = (band.bottom + 1) as usize;
        grid.fill_region(first_masked, 0, width, (height as usize) - first_masked, 0);
    }

    // The moving lines themselves.
    if (0..height).contains(&band.top) {
        grid.fill_region(band.top as usize, 0, width, 1, LEVEL_MAX);
    }
    if (0..height).contains(&band.bottom) {
        grid.fill_region(band.bottom as usize, 0, width, 1, LEVEL_MAX);
    }
}

/// Play a curtain transition to its terminal state: reveal ends on the full
/// clock, close ends blank.
///
/// Blocks the caller for the whole duration at a fixed frame interval; do not
/// interleave with other rendering.
#[cfg(not(feature = "host"))]
pub async fn play_curtain(
    grid: &impl PixelGrid,
    curtain: Curtain,
    hour24: u8,
    minute: u8,
    second: u8,
) {
    use embassy_time::{Duration, Instant, Timer};

    let start = Instant::now();
    loop {
        let elapsed = start.elapsed().as_millis() as u32;
        let band = curtain.band(elapsed);
        apply_curtain_frame(grid, &band, hour24, minute, second);
        if band.done {
            break;
        }
        Timer::after(Duration::from_millis(u64::from(CURTAIN_FRAME_MS))).await;
    }

    grid.clear();
    if matches!(curtain.mode, CurtainMode::Reveal) {
        draw_clock(grid, hour24, minute, second);
    }
}
