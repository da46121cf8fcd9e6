//! Application controller: mode dispatch, wall-clock redraw, and the
//! motion-sleep power state machine.
//!
//! Deliberately thin. Rendering lives in [`clock_face`](crate::clock_face)
//! and [`fluid`](crate::fluid), scanning in its own task, and this loop just
//! sequences them. Wall-clock time comes from an external collaborator
//! behind the [`WallClock`] trait; this module never reads an RTC itself.

use core::convert::Infallible;

use embassy_rp::gpio::Input;
use embassy_time::{Instant, Ticker};
use embedded_hal::delay::DelayNs;
use embedded_hal::spi::SpiDevice;

use crate::clock_face::{self, Curtain};
use crate::display::{Display, PixelGrid};
use crate::fluid::Fluid;
use crate::imu::{Icm426xx, ImuError};

/// Curtain transition length on entry, sleep, and wake.
pub const CURTAIN_MS: u32 = 300;
/// Idle time before sleeping in `Clock` and `Analog` modes.
pub const MOTION_TIMEOUT_MS: u64 = 2_000;
/// Idle time before sleeping in `Debug` and `Experiment` modes.
pub const DEBUG_MOTION_TIMEOUT_MS: u64 = 100_000;
/// Physics and poll cadence.
const TICK_MS: u64 = 16;

/// What the appliance is showing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, defmt::Format)]
pub enum AppMode {
    /// Five-column digital clock with colon blink.
    Clock,
    /// Analog face, rendering not yet wired up.
    Analog,
    /// Diagnostics, display left to the demo harness.
    Debug,
    /// Tilt-driven fluid animation.
    Experiment,
}

impl AppMode {
    /// Idle time before the sleep sequence starts.
    #[must_use]
    pub fn motion_timeout_ms(self) -> u64 {
        match self {
            Self::Clock | Self::Analog => MOTION_TIMEOUT_MS,
            Self::Debug | Self::Experiment => DEBUG_MOTION_TIMEOUT_MS,
        }
    }
}

/// Source of wall-clock time, `(hour24, minute, second)`.
pub trait WallClock {
    /// The current time of day.
    fn now(&mut self) -> (u8, u8, u8);
}

impl<F> WallClock for F
where
    F: FnMut() -> (u8, u8, u8),
{
    fn now(&mut self) -> (u8, u8, u8) {
        self()
    }
}

/// Run the appliance.
///
/// Opens with a curtain reveal, then ticks at the physics cadence: `Clock`
/// redraws once a second, `Experiment` steps and renders the fluid from the
/// latest accelerometer sample, and every mode watches the motion-interrupt
/// pin to decide when to sleep.
///
/// The sleep sequence, in order: clear the stale sensor interrupt, curtain
/// close, blank the display, idle the sensor with wake-on-motion armed, wait
/// for the interrupt pin, wake the sensor, clear its latch, curtain reveal.
/// The scan task keeps running throughout; deep-sleep clock reconfiguration
/// belongs to the board glue, not here.
///
/// # Errors
///
/// [`ImuError`] from any sensor access, propagated without retry.
pub async fn app_loop<
    const N: usize,
    const W: usize,
    const H: usize,
    const PINS: usize,
    const P: usize,
    SPI,
    D,
    C,
>(
    display: Display<N, W, H, PINS>,
    mut imu: Icm426xx<SPI, D>,
    mut motion_int: Input<'static>,
    mut clock: C,
    mode: AppMode,
) -> Result<Infallible, ImuError<SPI::Error>>
where
    SPI: SpiDevice,
    D: DelayNs,
    C: WallClock,
{
    defmt::info!("app_loop: starting in mode {}", mode);

    let mut fluid = Fluid::<P, W, H>::new();
    let (hh, mm, ss) = clock.now();
    clock_face::play_curtain(&display, Curtain::reveal(CURTAIN_MS, H), hh, mm, ss).await;

    let mut last_motion = Instant::now();
    let mut last_redraw = Instant::now();
    let timeout_ms = mode.motion_timeout_ms();

    let mut ticker = Ticker::every(embassy_time::Duration::from_millis(TICK_MS));
    loop {
        ticker.next().await;
        let now = Instant::now();

        // The sensor latches its interrupt until read, so a level poll at
        // the tick cadence cannot miss a motion event.
        if motion_int.is_high() {
            imu.interrupt_status()?;
            last_motion = now;
        }

        match mode {
            AppMode::Clock => {
                if now.duration_since(last_redraw).as_millis() >= 1_000 {
                    last_redraw = now;
                    let (hh, mm, ss) = clock.now();
                    clock_face::draw_clock(&display, hh, mm, ss);
                }
            }
            AppMode::Experiment => {
                let sample = imu.sample(now.as_millis())?;
                fluid.step(sample.ax, sample.ay, TICK_MS as u32);
                fluid.render(&display);
            }
            AppMode::Analog | AppMode::Debug => {}
        }

        if now.duration_since(last_motion).as_millis() >= timeout_ms {
            sleep_until_motion(display, &mut imu, &mut motion_int, &mut clock, mode).await?;
            last_motion = Instant::now();
            last_redraw = last_motion;
        }
    }
}

async fn sleep_until_motion<
    const N: usize,
    const W: usize,
    const H: usize,
    const PINS: usize,
    SPI,
    D,
    C,
>(
    display: Display<N, W, H, PINS>,
    imu: &mut Icm426xx<SPI, D>,
    motion_int: &mut Input<'static>,
    clock: &mut C,
    mode: AppMode,
) -> Result<(), ImuError<SPI::Error>>
where
    SPI: SpiDevice,
    D: DelayNs,
    C: WallClock,
{
    defmt::info!("app_loop: motion timeout, sleeping");
    imu.interrupt_status()?;

    if mode == AppMode::Clock {
        let (hh, mm, ss) = clock.now();
        clock_face::play_curtain(&display, Curtain::close(CURTAIN_MS, H), hh, mm, ss).await;
    }
    display.clear();

    imu.wom_sleep()?;
    motion_int.wait_for_high().await;
    imu.wake()?;
    imu.interrupt_status()?;

    defmt::info!("app_loop: motion detected, waking");
    if mode == AppMode::Clock {
        let (hh, mm, ss) = clock.now();
        clock_face::play_curtain(&display, Curtain::reveal(CURTAIN_MS, H), hh, mm, ss).await;
    }
    Ok(())
}
