#![cfg(feature = "host")]

use tilt_clock::wiring::{CharlieLayout, NO_PIN, PixelPair};

const LAYOUT_15X15: CharlieLayout<225, 15, 15, 16> = CharlieLayout::complete();
const _: () = assert!(LAYOUT_15X15.wired_count() == 225); // Compile-time assert

#[test]
fn complete_layout_assigns_ordered_pairs_in_scan_order() {
    // Pixel 0 gets the first ordered pair; each anode contributes
    // PINS - 1 pairs before the next anode starts.
    assert_eq!(
        LAYOUT_15X15.pair(0),
        Some(PixelPair {
            anode: 0,
            cathode: 1
        })
    );
    assert_eq!(
        LAYOUT_15X15.pair(14),
        Some(PixelPair {
            anode: 0,
            cathode: 15
        })
    );
    assert_eq!(
        LAYOUT_15X15.pair(15),
        Some(PixelPair {
            anode: 1,
            cathode: 0
        })
    );
}

#[test]
fn complete_layout_pairs_are_valid_and_distinct() {
    let mut seen = std::collections::HashSet::new();
    for idx in 0..225 {
        let pair = LAYOUT_15X15.pair(idx).expect("every cell is wired");
        assert!(pair.anode < 16, "anode in range at {idx}");
        assert!(pair.cathode < 16, "cathode in range at {idx}");
        assert_ne!(pair.anode, pair.cathode, "no diagonal pair at {idx}");
        assert!(
            seen.insert((pair.anode, pair.cathode)),
            "ordered pair reused at {idx}"
        );
    }
}

#[test]
fn out_of_range_index_is_unwired() {
    assert_eq!(LAYOUT_15X15.pair(225), None);
    assert!(!LAYOUT_15X15.is_wired(225));
    assert!(LAYOUT_15X15.is_wired(224));
}

#[test]
fn custom_layout_with_holes() {
    // A 2x2 matrix on 3 pins with one unwired corner.
    const LAYOUT: CharlieLayout<4, 2, 2, 3> = CharlieLayout::new([
        (0, 1),
        (1, 0),
        (NO_PIN, NO_PIN),
        (2, 0),
    ]);
    assert_eq!(LAYOUT.wired_count(), 3);
    assert!(!LAYOUT.is_wired(2));
    assert_eq!(LAYOUT.pair(2), None);
    assert_eq!(
        LAYOUT.pair(3),
        Some(PixelPair {
            anode: 2,
            cathode: 0
        })
    );
    assert_eq!(LAYOUT.width(), 2);
    assert_eq!(LAYOUT.height(), 2);
}

#[test]
fn equals_compares_tables() {
    const A: CharlieLayout<6, 3, 2, 3> = CharlieLayout::complete();
    const B: CharlieLayout<6, 3, 2, 3> = CharlieLayout::complete();
    const C: CharlieLayout<6, 3, 2, 3> =
        CharlieLayout::new([(0, 1), (0, 2), (1, 0), (1, 2), (2, 1), (2, 0)]);
    assert!(A.equals(&B));
    assert!(!A.equals(&C));
}

#[test]
fn complete_small_matrix_uses_every_pair() {
    // 3 pins give exactly 6 ordered pairs; a 3x2 matrix consumes them all.
    const LAYOUT: CharlieLayout<6, 3, 2, 3> = CharlieLayout::complete();
    let pairs: Vec<_> = (0..6)
        .map(|idx| LAYOUT.pair(idx).expect("wired"))
        .collect();
    let expected = [(0, 1), (0, 2), (1, 0), (1, 2), (2, 0), (2, 1)];
    for (pair, (anode, cathode)) in pairs.iter().zip(expected) {
        assert_eq!((pair.anode, pair.cathode), (anode, cathode));
    }
}
