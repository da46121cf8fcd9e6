#![cfg(feature = "host")]

use tilt_clock::gamma::{GAMMA_DEFAULT, GammaLut};
use tilt_clock::scan::LEVEL_MAX;

const RELOAD: u16 = 1_000;

#[test]
fn level_zero_is_always_off() {
    let lut = GammaLut::new(GAMMA_DEFAULT, RELOAD);
    assert_eq!(lut.apply(0, 255), 0);
    assert_eq!(lut.apply(0, 1), 0);
}

#[test]
fn top_level_hits_half_reload() {
    // The table is capped at reload / 2 so a pixel never holds its slot
    // for more than half the scan period.
    let lut = GammaLut::new(GAMMA_DEFAULT, RELOAD);
    assert_eq!(lut.apply(LEVEL_MAX, 255), RELOAD / 2);
}

#[test]
fn over_range_level_clamps_to_top_step() {
    let lut = GammaLut::new(GAMMA_DEFAULT, RELOAD);
    assert_eq!(lut.apply(200, 255), lut.apply(LEVEL_MAX, 255));
}

#[test]
fn pulse_is_monotonic_in_level() {
    let lut = GammaLut::new(GAMMA_DEFAULT, RELOAD);
    let mut previous = 0;
    for level in 0..=LEVEL_MAX {
        let pulse = lut.apply(level, 255);
        assert!(pulse >= previous, "level {level} regressed");
        previous = pulse;
    }
    assert!(previous > 0, "top level must be visible");
}

#[test]
fn master_zero_blanks_everything() {
    let lut = GammaLut::new(GAMMA_DEFAULT, RELOAD);
    for level in 0..=LEVEL_MAX {
        assert_eq!(lut.apply(level, 0), 0);
    }
}

#[test]
fn master_scales_linearly() {
    let lut = GammaLut::new(GAMMA_DEFAULT, RELOAD);
    let full = lut.apply(LEVEL_MAX, 255);
    let half = lut.apply(LEVEL_MAX, 128);
    // Integer scaling: base * 128 / 255.
    assert_eq!(half, (u32::from(full) * 128 / 255) as u16);
}

#[test]
fn pulse_never_exceeds_reload() {
    for reload in [1, 2, 100, 1_000, u16::MAX] {
        let lut = GammaLut::new(GAMMA_DEFAULT, reload);
        for level in 0..=LEVEL_MAX {
            for master in [0, 1, 128, 255] {
                assert!(lut.apply(level, master) <= reload);
            }
        }
    }
}

#[test]
fn higher_gamma_darkens_midtones() {
    let linear = GammaLut::new(1.0, RELOAD);
    let perceptual = GammaLut::new(GAMMA_DEFAULT, RELOAD);
    let mid = LEVEL_MAX / 2;
    assert!(perceptual.apply(mid, 255) < linear.apply(mid, 255));
    // The endpoints agree regardless of exponent.
    assert_eq!(perceptual.apply(LEVEL_MAX, 255), linear.apply(LEVEL_MAX, 255));
    assert_eq!(perceptual.apply(0, 255), linear.apply(0, 255));
}

#[test]
fn reload_is_preserved() {
    let lut = GammaLut::new(GAMMA_DEFAULT, RELOAD);
    assert_eq!(lut.reload(), RELOAD);
}
