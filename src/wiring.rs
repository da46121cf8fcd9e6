//! Compile-time description of how matrix pixels are wired to charlieplex header pins.
//!
//! See [`CharlieLayout`] for examples, including the exhaustive
//! [`complete`](CharlieLayout::complete) wiring and custom tables with
//! unwired cells.

/// Sentinel pin id marking an unwired (invalid) pixel cell.
pub const NO_PIN: u8 = 0xFF;

/// An `(anode, cathode)` header-pin pair for one pixel.
///
/// In a charlieplexed matrix each LED sits between a unique *ordered* pair of
/// pins: current flows only while the anode pin drives high and the cathode
/// pin drives low, with every other pin left high-impedance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelPair {
    /// Pin driven high to light the pixel.
    pub anode: u8,
    /// Pin driven low to light the pixel. Configured before the anode.
    pub cathode: u8,
}

/// Compile-time wiring table mapping pixel index to a charlieplex pin pair.
///
/// `CharlieLayout` defines how a rectangular `(row, col)` matrix of LEDs maps
/// to the ordered pin pairs of a charlieplexed header. Pixel indices are
/// row-major: `idx = row * W + col`.
///
/// Cells may be unwired (the board leaves a hole in the grid); those carry the
/// [`NO_PIN`] sentinel and are skipped by the scan engine.
///
/// ## Constructing layouts
///
/// - [`complete`](Self::complete) — the standard exhaustive wiring, assigning
///   ordered pin pairs in scan order. Most boards use this.
/// - [`new`](Self::new) — custom wiring, listing the `(anode, cathode)` pair
///   for each pixel in row-major order.
///
/// ## Validation
///
/// Layouts are validated at **compile time**: every wired entry must name two
/// distinct pins below `PINS`.
///
/// # Example
///
/// ```rust
/// use tilt_clock::wiring::CharlieLayout;
///
/// // A 15x15 matrix charlieplexed over 16 header pins (225 of 240 pairs used).
/// const LAYOUT: CharlieLayout<225, 15, 15, 16> = CharlieLayout::complete();
/// const _: () = assert!(LAYOUT.wired_count() == 225); // Compile-time assert
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharlieLayout<const N: usize, const W: usize, const H: usize, const PINS: usize> {
    map: [(u8, u8); N],
}

impl<const N: usize, const W: usize, const H: usize, const PINS: usize>
    CharlieLayout<N, W, H, PINS>
{
    /// Number of columns in the matrix.
    #[must_use]
    pub const fn width(&self) -> usize {
        W
    }

    /// Number of rows in the matrix.
    #[must_use]
    pub const fn height(&self) -> usize {
        H
    }

    /// Create a layout from an explicit `(anode, cathode)` table in row-major
    /// pixel order. Use `(NO_PIN, NO_PIN)` for unwired cells.
    ///
    /// # Panics
    ///
    /// At compile time (const evaluation) if `W * H != N`, or if a wired entry
    /// names an out-of-range pin or `anode == cathode`.
    #[must_use]
    pub const fn new(map: [(u8, u8); N]) -> Self {
        assert!(W * H == N, "width * height must equal N");
        assert!(PINS <= NO_PIN as usize, "pin ids must fit below the NO_PIN sentinel");
        let mut index = 0;
        while index < N {
            let (anode, cathode) = map[index];
            let unwired = anode == NO_PIN && cathode == NO_PIN;
            if !unwired {
                assert!((anode as usize) < PINS, "anode pin out of range");
                assert!((cathode as usize) < PINS, "cathode pin out of range");
                assert!(anode != cathode, "a pixel cannot share anode and cathode");
            }
            index += 1;
        }
        Self { map }
    }

    /// The standard exhaustive charlieplex wiring: pixel `i` gets the `i`-th
    /// ordered pin pair, skipping the diagonal (`anode == cathode`).
    ///
    /// `PINS` header pins give `PINS * (PINS - 1)` usable pairs; the first
    /// `N` are assigned and the rest left unused.
    ///
    /// # Panics
    ///
    /// At compile time if `N > PINS * (PINS - 1)` or `W * H != N`.
    #[must_use]
    pub const fn complete() -> Self {
        assert!(W * H == N, "width * height must equal N");
        assert!(
            N <= PINS * (PINS - 1),
            "not enough pin pairs for this many pixels"
        );
        let mut map = [(NO_PIN, NO_PIN); N];
        let mut index = 0;
        let mut anode = 0;
        while anode < PINS && index < N {
            let mut cathode = 0;
            while cathode < PINS && index < N {
                if anode != cathode {
                    map[index] = (anode as u8, cathode as u8);
                    index += 1;
                }
                cathode += 1;
            }
            anode += 1;
        }
        Self { map }
    }

    /// The pin pair for pixel `idx`, or `None` if the cell is unwired or the
    /// index is out of range.
    #[must_use]
    pub const fn pair(&self, idx: usize) -> Option<PixelPair> {
        if idx >= N {
            return None;
        }
        let (anode, cathode) = self.map[idx];
        if anode == NO_PIN {
            return None;
        }
        Some(PixelPair { anode, cathode })
    }

    /// Whether pixel `idx` is wired to a pin pair.
    #[must_use]
    pub const fn is_wired(&self, idx: usize) -> bool {
        idx < N && self.map[idx].0 != NO_PIN
    }

    /// Number of wired pixels in the table.
    #[must_use]
    pub const fn wired_count(&self) -> usize {
        let mut count = 0;
        let mut index = 0;
        while index < N {
            if self.map[index].0 != NO_PIN {
                count += 1;
            }
            index += 1;
        }
        count
    }

    /// Compile-time comparable equality (for `const _: () = assert!(...)`).
    #[must_use]
    pub const fn equals(&self, other: &Self) -> bool {
        let mut index = 0;
        while index < N {
            if self.map[index].0 != other.map[index].0
                || self.map[index].1 != other.map[index].1
            {
                return false;
            }
            index += 1;
        }
        true
    }
}
