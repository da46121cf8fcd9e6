//! Fixed 3x5 glyph rendering: hex digits, colon, minus, centered numbers.
//!
//! Everything here routes through [`PixelGrid::set_pixel`], so the scan
//! engine's active set stays consistent no matter what is drawn.

use crate::display::PixelGrid;

/// Glyph width in pixels.
pub const HEX_W: usize = 3;
/// Glyph height in pixels.
pub const HEX_H: usize = 5;
/// Column gap between adjacent glyphs.
pub const DIGIT_SP: usize = 1;

/// 3x5 bitmaps for `0..=F`, one row byte per glyph row, bit 2 = leftmost.
pub const HEX_3X5: [[u8; HEX_H]; 16] = [
    [0b111, 0b101, 0b101, 0b101, 0b111], // 0
    [0b010, 0b110, 0b010, 0b010, 0b111], // 1
    [0b111, 0b001, 0b111, 0b100, 0b111], // 2
    [0b111, 0b001, 0b111, 0b001, 0b111], // 3
    [0b101, 0b101, 0b111, 0b001, 0b001], // 4
    [0b111, 0b100, 0b111, 0b001, 0b111], // 5
    [0b111, 0b100, 0b111, 0b101, 0b111], // 6
    [0b111, 0b001, 0b001, 0b010, 0b010], // 7
    [0b111, 0b101, 0b111, 0b101, 0b111], // 8
    [0b111, 0b101, 0b111, 0b001, 0b111], // 9
    [0b010, 0b101, 0b111, 0b101, 0b101], // A
    [0b110, 0b101, 0b110, 0b101, 0b110], // b
    [0b111, 0b100, 0b100, 0b100, 0b111], // C
    [0b110, 0b101, 0b101, 0b101, 0b110], // d
    [0b111, 0b100, 0b111, 0b100, 0b111], // E
    [0b111, 0b100, 0b111, 0b100, 0b100], // F
];

// Fast powers of 10 for 32-bit decimal rendering.
const POW10: [u32; 10] = [
    1,
    10,
    100,
    1_000,
    10_000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// Draw one hex nibble (`0..=0xF`) with its top-left corner at `(row0, col0)`.
///
/// Both set and unset glyph cells are written, so drawing over an old glyph
/// fully replaces it.
pub fn draw_hex_nibble(grid: &impl PixelGrid, row0: usize, col0: usize, nibble: u8, level: u8) {
    let bitmap = HEX_3X5[usize::from(nibble & 0x0F)];
    for (glyph_row, row_bits) in bitmap.iter().enumerate() {
        for glyph_col in 0..HEX_W {
            let bit = (row_bits >> (HEX_W - 1 - glyph_col)) & 1;
            let cell_level = if bit == 1 { level } else { 0 };
            grid.set_pixel(row0 + glyph_row, col0 + glyph_col, cell_level);
        }
    }
}

/// Draw a decimal digit (`0..=9`, over-range clamps to 9).
pub fn draw_digit_3x5(grid: &impl PixelGrid, row0: usize, col0: usize, digit: u8, level: u8) {
    draw_hex_nibble(grid, row0, col0, digit.min(9), level);
}

/// Blank the 3x5 cell region a glyph occupies.
pub fn clear_digit_3x5(grid: &impl PixelGrid, row0: usize, col0: usize) {
    grid.fill_region(row0, col0, HEX_W, HEX_H, 0);
}

/// Draw (or blank) the two-dot colon in column `col`, aligned with a 3x5 digit
/// row band starting at `row0`.
pub fn draw_colon(grid: &impl PixelGrid, row0: usize, col: usize, on: bool, level: u8) {
    let dot_level = if on { level } else { 0 };
    grid.set_pixel(row0 + 1, col, dot_level);
    grid.set_pixel(row0 + 3, col, dot_level);
}

/// Draw the 3-wide minus glyph (middle row only).
pub fn draw_minus(grid: &impl PixelGrid, row0: usize, col0: usize, level: u8) {
    for glyph_col in 0..HEX_W {
        grid.set_pixel(row0 + HEX_H / 2, col0 + glyph_col, level);
    }
}

/// Draw a byte as two hex nibbles starting at `(row0, col0)`.
pub fn draw_hex_byte(grid: &impl PixelGrid, row0: usize, col0: usize, byte: u8, level: u8) {
    draw_hex_nibble(grid, row0, col0, byte >> 4, level);
    draw_hex_nibble(grid, row0, col0 + HEX_W + DIGIT_SP, byte & 0x0F, level);
}

/// Draw a byte as two hex nibbles centered on the matrix. Handy for debug
/// readouts (sensor identity, interrupt status).
pub fn draw_byte_center(grid: &impl PixelGrid, byte: u8, level: u8) {
    let row0 = (grid.height().saturating_sub(HEX_H)) / 2;
    let col0 = (grid.width().saturating_sub(HEX_W * 2 + DIGIT_SP)) / 2;
    draw_hex_byte(grid, row0, col0, byte, level);
}

/// Draw a signed decimal value horizontally centered on the matrix.
pub fn draw_int_center(grid: &impl PixelGrid, value: i32, level: u8) {
    let row0 = (grid.height().saturating_sub(HEX_H)) / 2;

    let negative = value < 0;
    let magnitude = value.unsigned_abs();
    let digit_count = decimal_digits(magnitude);
    let glyph_count = usize::from(digit_count) + usize::from(negative);
    let total_width = glyph_count * HEX_W + glyph_count.saturating_sub(1) * DIGIT_SP;

    let mut col = (grid.width().saturating_sub(total_width)) / 2;
    if negative {
        draw_minus(grid, row0, col, level);
        col += HEX_W + DIGIT_SP;
    }
    for place in (0..digit_count).rev() {
        let digit = (magnitude / POW10[usize::from(place)]) % 10;
        draw_digit_3x5(grid, row0, col, digit as u8, level);
        col += HEX_W + DIGIT_SP;
    }
}

/// Count base-10 digits of a value (at least 1).
fn decimal_digits(mut value: u32) -> u8 {
    let mut count = 1;
    while value >= 10 {
        value /= 10;
        count += 1;
    }
    count
}
