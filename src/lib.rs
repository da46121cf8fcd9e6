//! Firmware building blocks for a charlieplexed LED matrix clock.
//!
//! A single ordered pin pair is driven at a time, so the matrix is dark in
//! aggregate and bright per pixel; perceived brightness comes from how long
//! each pixel's pair stays driven within its scan slot. On top of the scan
//! engine sit a 3x5 digit renderer with curtain transitions, a tilt-driven
//! particle animation, and an ICM-426xx accelerometer driver for motion
//! wake.
//!
//! # Glossary
//!
//! - **Charlieplexing:** wiring `P` tri-state pins so each ordered pin pair
//!   addresses one LED, for up to `P * (P - 1)` pixels.
//! - **Scan slot:** the fixed 1 ms window in which exactly one active pixel
//!   is driven for its gamma-corrected on-time.
//! - **Active set:** the dense list of currently lit pixels the scan cursor
//!   walks; dark pixels cost no scan time.
//! - **Master dimmer:** a global 0..=255 scale applied after the gamma
//!   table, shortening every pixel's on-time proportionally.
#![cfg_attr(not(feature = "host"), no_std)]
#![cfg_attr(not(feature = "host"), no_main)]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// These modules require embassy_rp and are excluded when testing on host
#[cfg(not(feature = "host"))]
pub mod app;
pub mod clock_face;
pub mod display;
mod error;
pub mod fluid;
pub mod font;
pub mod gamma;
pub mod imu;
pub mod scan;
#[cfg(not(feature = "host"))]
pub mod scan_driver;
pub mod wiring;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
