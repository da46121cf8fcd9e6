//! Tilt-driven fluid animation: particles slosh around as the board moves.
//!
//! Same wiring as the clock demo, started in `Experiment` mode so every
//! tick samples the accelerometer and steps the particle simulation.
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::convert::Infallible;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Flex, Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Instant};
use embedded_hal_bus::spi::ExclusiveDevice;
use tilt_clock::{
    Result,
    app::{self, AppMode},
    display::{Display, DisplayStatic},
    gamma::{GAMMA_DEFAULT, GammaLut},
    imu::Icm426xx,
    scan_driver::CharliePins,
    wiring::CharlieLayout,
};
use {defmt_rtt as _, panic_probe as _};

const WIDTH: usize = 15;
const HEIGHT: usize = 15;
const PIXELS: usize = WIDTH * HEIGHT;
const HEADER_PINS: usize = 16;
const PARTICLES: usize = 64;
const SLOT_TICKS: u16 = 1_000;

static LAYOUT: CharlieLayout<PIXELS, WIDTH, HEIGHT, HEADER_PINS> = CharlieLayout::complete();
static DISPLAY: DisplayStatic<PIXELS> = DisplayStatic::new_static();

tilt_clock::scan_device_task!(scan_task, PIXELS, HEADER_PINS);

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    match inner_main(spawner).await {
        Ok(never) => match never {},
        Err(err) => panic!("{err}"),
    }
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    let p = embassy_rp::init(Default::default());

    let display = Display::new(&DISPLAY, &LAYOUT);
    let pins = CharliePins::new([
        Flex::new(p.PIN_0),
        Flex::new(p.PIN_1),
        Flex::new(p.PIN_2),
        Flex::new(p.PIN_3),
        Flex::new(p.PIN_4),
        Flex::new(p.PIN_5),
        Flex::new(p.PIN_6),
        Flex::new(p.PIN_7),
        Flex::new(p.PIN_8),
        Flex::new(p.PIN_9),
        Flex::new(p.PIN_10),
        Flex::new(p.PIN_11),
        Flex::new(p.PIN_12),
        Flex::new(p.PIN_13),
        Flex::new(p.PIN_14),
        Flex::new(p.PIN_15),
    ]);
    let lut = GammaLut::new(GAMMA_DEFAULT, SLOT_TICKS);
    spawner.spawn(scan_task(display.scan_shared(), pins, lut))?;

    let mut config = spi::Config::default();
    config.frequency = 1_000_000;
    let spi_bus = Spi::new_blocking(p.SPI0, p.PIN_18, p.PIN_19, p.PIN_16, config);
    let cs = Output::new(p.PIN_17, Level::High);
    let spi_device = ExclusiveDevice::new(spi_bus, cs, Delay).expect("chip select is infallible");
    let mut imu = Icm426xx::new(spi_device, Delay);
    imu.soft_reset().expect("accelerometer not responding");
    imu.init().expect("accelerometer configuration failed");
    let motion_int = Input::new(p.PIN_20, Pull::Down);

    let clock = || {
        let seconds = Instant::now().as_secs();
        (
            (12 + seconds / 3600 % 24) as u8 % 24,
            (seconds / 60 % 60) as u8,
            (seconds % 60) as u8,
        )
    };

    let err = match app::app_loop::<PIXELS, WIDTH, HEIGHT, HEADER_PINS, PARTICLES, _, _, _>(
        display,
        imu,
        motion_int,
        clock,
        AppMode::Experiment,
    )
    .await
    {
        Ok(never) => match never {},
        Err(err) => err,
    };
    panic!("{err}");
}
