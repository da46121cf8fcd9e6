#![cfg(feature = "host")]

use tilt_clock::display::{Display, DisplayStatic, PixelGrid};
use tilt_clock::gamma::{GAMMA_DEFAULT, GammaLut};
use tilt_clock::scan::{LEVEL_MAX, ScanCore, SlotPulse};
use tilt_clock::wiring::CharlieLayout;

const LAYOUT: CharlieLayout<12, 4, 3, 4> = CharlieLayout::complete();

fn pair(idx: usize) -> Option<tilt_clock::wiring::PixelPair> {
    LAYOUT.pair(idx)
}

/// Check the active-set invariants: a pixel is in the set iff lit, exactly
/// once, and `slot_of` agrees with the dense list.
fn assert_consistent<const N: usize>(core: &ScanCore<N>) {
    let mut seen = std::collections::HashSet::new();
    for slot in 0..core.active_len() {
        let entry = core.entry(slot).expect("slot within length");
        let idx = usize::from(entry.idx);
        assert!(core.level(idx) > 0, "active pixel {idx} must be lit");
        assert_eq!(core.slot_of(idx), Some(slot), "reverse lookup for {idx}");
        assert!(seen.insert(idx), "pixel {idx} listed twice");
    }
    for idx in 0..N {
        if core.level(idx) > 0 {
            assert!(seen.contains(&idx), "lit pixel {idx} missing from set");
        } else {
            assert_eq!(core.slot_of(idx), None, "dark pixel {idx} still listed");
        }
    }
}

#[test]
fn lighting_and_darkening_maintains_membership() {
    let mut core: ScanCore<12> = ScanCore::new();
    assert_eq!(core.active_len(), 0);

    core.set_level(3, 5, pair(3));
    core.set_level(7, 9, pair(7));
    core.set_level(0, 1, pair(0));
    assert_eq!(core.active_len(), 3);
    assert_consistent(&core);

    core.set_level(7, 0, pair(7));
    assert_eq!(core.active_len(), 2);
    assert_eq!(core.slot_of(7), None);
    assert_consistent(&core);

    core.set_level(3, 0, pair(3));
    core.set_level(0, 0, pair(0));
    assert_eq!(core.active_len(), 0);
    assert_consistent(&core);
}

#[test]
fn removal_swaps_last_into_hole() {
    let mut core: ScanCore<12> = ScanCore::new();
    core.set_level(1, 1, pair(1));
    core.set_level(2, 2, pair(2));
    core.set_level(3, 3, pair(3));

    // Removing the first entry moves the last (pixel 3) into slot 0.
    core.set_level(1, 0, pair(1));
    assert_eq!(core.active_len(), 2);
    let moved = core.entry(0).expect("slot 0 occupied");
    assert_eq!(usize::from(moved.idx), 3);
    assert_eq!(core.slot_of(3), Some(0));
    assert_consistent(&core);
}

#[test]
fn brightness_change_keeps_slot_stable() {
    let mut core: ScanCore<12> = ScanCore::new();
    core.set_level(4, 2, pair(4));
    core.set_level(5, 2, pair(5));
    let slot_before = core.slot_of(5).expect("lit");

    core.set_level(5, 9, pair(5));
    assert_eq!(core.slot_of(5), Some(slot_before));
    assert_eq!(core.level(5), 9);
    assert_eq!(core.active_len(), 2);
    assert_consistent(&core);
}

#[test]
fn level_clamps_and_bad_indices_are_ignored() {
    let mut core: ScanCore<12> = ScanCore::new();
    core.set_level(2, 200, pair(2));
    assert_eq!(core.level(2), LEVEL_MAX);

    core.set_level(99, 5, None);
    assert_eq!(core.active_len(), 1);
    assert_eq!(core.level(99), 0);
    assert_consistent(&core);
}

#[test]
fn unwired_cell_never_activates() {
    let mut core: ScanCore<12> = ScanCore::new();
    core.set_level(6, 9, None);
    assert_eq!(core.level(6), 0);
    assert_eq!(core.active_len(), 0);
    assert_consistent(&core);
}

#[test]
fn relighting_a_lit_pixel_does_not_duplicate() {
    let mut core: ScanCore<12> = ScanCore::new();
    core.set_level(8, 3, pair(8));
    core.set_level(8, 3, pair(8));
    assert_eq!(core.active_len(), 1);
    assert_consistent(&core);
}

#[test]
fn clear_empties_the_set() {
    let mut core: ScanCore<12> = ScanCore::new();
    for idx in 0..12 {
        core.set_level(idx, 4, pair(idx));
    }
    assert_eq!(core.active_len(), 12);
    core.clear();
    assert_eq!(core.active_len(), 0);
    assert_consistent(&core);
}

#[test]
fn slot_cycle_visits_each_active_pixel_once() {
    let mut core: ScanCore<12> = ScanCore::new();
    let lut = GammaLut::new(GAMMA_DEFAULT, 1_000);
    for idx in [0, 5, 9, 11] {
        core.set_level(idx, LEVEL_MAX, pair(idx));
    }

    let mut driven = std::collections::HashSet::new();
    for _ in 0..4 {
        match core.slot_start(&lut) {
            SlotPulse::Drive { pair, on_ticks } => {
                assert_eq!(on_ticks, lut.apply(LEVEL_MAX, 255));
                driven.insert((pair.anode, pair.cathode));
            }
            SlotPulse::Idle => panic!("active set must drive"),
        }
    }
    assert_eq!(driven.len(), 4, "each active pixel driven exactly once");
}

#[test]
fn empty_set_idles() {
    let mut core: ScanCore<12> = ScanCore::new();
    let lut = GammaLut::new(GAMMA_DEFAULT, 1_000);
    assert_eq!(core.slot_start(&lut), SlotPulse::Idle);
}

#[test]
fn cursor_stays_valid_after_shrink() {
    let mut core: ScanCore<12> = ScanCore::new();
    let lut = GammaLut::new(GAMMA_DEFAULT, 1_000);
    for idx in 0..6 {
        core.set_level(idx, 8, pair(idx));
    }
    // Advance the cursor deep into the set, then shrink it below the cursor.
    for _ in 0..5 {
        core.slot_start(&lut);
    }
    for idx in 2..6 {
        core.set_level(idx, 0, pair(idx));
    }
    assert_consistent(&core);
    // The next slots must still drive the remaining pixels, not read junk.
    for _ in 0..4 {
        match core.slot_start(&lut) {
            SlotPulse::Drive { pair: driven, .. } => {
                let expected: Vec<_> = (0..2).map(|idx| pair(idx).expect("wired")).collect();
                assert!(expected.contains(&driven));
            }
            SlotPulse::Idle => panic!("two pixels remain active"),
        }
    }
}

#[test]
fn master_dimmer_scales_slots() {
    let mut core: ScanCore<12> = ScanCore::new();
    let lut = GammaLut::new(GAMMA_DEFAULT, 1_000);
    core.set_level(0, LEVEL_MAX, pair(0));

    core.set_master(128);
    match core.slot_start(&lut) {
        SlotPulse::Drive { on_ticks, .. } => assert_eq!(on_ticks, lut.apply(LEVEL_MAX, 128)),
        SlotPulse::Idle => panic!("pixel is active"),
    }

    core.set_master(255);
    match core.slot_start(&lut) {
        SlotPulse::Drive { on_ticks, .. } => assert_eq!(on_ticks, lut.apply(LEVEL_MAX, 255)),
        SlotPulse::Idle => panic!("pixel is active"),
    }
}

#[test]
fn zero_width_pulse_never_drives() {
    // A drive with a zero on-time would still energize the pair for the
    // executor's wakeup latency, leaking light through a blanked dimmer.
    let mut core: ScanCore<12> = ScanCore::new();
    let lut = GammaLut::new(GAMMA_DEFAULT, 1_000);
    core.set_level(0, LEVEL_MAX, pair(0));

    core.set_master(0);
    assert_eq!(core.slot_start(&lut), SlotPulse::Idle);
    // The pixel stays lit in the framebuffer; only the pulse is suppressed.
    assert_eq!(core.active_len(), 1);
    assert_eq!(core.level(0), LEVEL_MAX);

    // The bottom of the gamma table also rounds to a zero-width pulse.
    core.set_master(255);
    core.set_level(0, 0, pair(0));
    core.set_level(1, 1, pair(1));
    assert_eq!(lut.apply(1, 255), 0, "level 1 sits below the gamma knee");
    assert_eq!(core.slot_start(&lut), SlotPulse::Idle);
}

// ============================================================================
// Display front-end over the shared scan core
// ============================================================================

#[test]
fn display_set_pixel_feeds_the_active_set() {
    static STATE: DisplayStatic<12> = DisplayStatic::new_static();
    let display = Display::new(&STATE, &LAYOUT);

    display.set_pixel(0, 0, 7);
    display.set_pixel(2, 3, 7);
    assert_eq!(display.active_len(), 2);
    assert_eq!(display.level(0, 0), 7);
    assert_eq!(display.level(2, 3), 7);

    // Out-of-range coordinates are ignored, not errors.
    display.set_pixel(3, 0, 7);
    display.set_pixel(0, 4, 7);
    assert_eq!(display.active_len(), 2);

    display.clear();
    assert_eq!(display.active_len(), 0);
    assert_eq!(display.level(0, 0), 0);
}

#[test]
fn display_all_on_lights_every_wired_pixel() {
    static STATE: DisplayStatic<12> = DisplayStatic::new_static();
    let display = Display::new(&STATE, &LAYOUT);

    display.all_on(4);
    assert_eq!(display.active_len(), LAYOUT.wired_count());
    // Idempotent: a second pass must not duplicate entries.
    display.all_on(4);
    assert_eq!(display.active_len(), LAYOUT.wired_count());

    display.all_on(0);
    assert_eq!(display.active_len(), 0);
}

#[test]
fn display_fill_region_clips_to_bounds() {
    static STATE: DisplayStatic<12> = DisplayStatic::new_static();
    let display = Display::new(&STATE, &LAYOUT);

    display.fill_region(1, 2, 10, 10, 6);
    // Only the in-bounds cells of rows 1..3, cols 2..4 light up.
    assert_eq!(display.active_len(), 4);
    assert_eq!(display.level(1, 2), 6);
    assert_eq!(display.level(2, 3), 6);
    assert_eq!(display.level(0, 0), 0);
}

#[test]
fn display_master_dimmer_round_trips() {
    static STATE: DisplayStatic<12> = DisplayStatic::new_static();
    let display = Display::new(&STATE, &LAYOUT);
    assert_eq!(display.master(), 255);
    display.set_master(40);
    assert_eq!(display.master(), 40);
}
