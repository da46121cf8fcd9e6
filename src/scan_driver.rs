//! Hardware scan loop: drives one charlieplexed pixel per 1 ms slot.
//!
//! Every header pin is a [`Flex`] that idles tri-stated. To light a pixel
//! the loop drives exactly one ordered pin pair, cathode low before anode
//! high, holds it for the gamma-corrected on-time in microseconds, then
//! releases both pins back to inputs before the next slot. At most one
//! pair is ever driven, so no two LEDs can conduct at once.

use embassy_rp::gpio::Flex;
use embassy_time::{Duration, Ticker, Timer};

use crate::display::ScanShared;
use crate::gamma::GammaLut;
use crate::scan::SlotPulse;
use crate::wiring::PixelPair;

/// The charlieplex header: every pin floats unless it is one half of the
/// currently driven pair.
///
/// Pin numbers in a [`PixelPair`] index into this array; the layout that
/// produced the pair is validated against the same pin count at compile
/// time.
pub struct CharliePins<const PINS: usize> {
    pins: [Flex<'static>; PINS],
    driven: Option<PixelPair>,
}

impl<const PINS: usize> CharliePins<PINS> {
    /// Take ownership of the header pins and tri-state all of them.
    #[must_use]
    pub fn new(mut pins: [Flex<'static>; PINS]) -> Self {
        for pin in &mut pins {
            pin.set_as_input();
        }
        Self { pins, driven: None }
    }

    /// Drive one pair: release whatever was driven, then cathode low,
    /// then anode high. The cathode-first order keeps the anode from
    /// sourcing current through an unselected LED while the pair is
    /// being set up.
    pub fn drive(&mut self, pair: PixelPair) {
        self.release();
        let cathode = &mut self.pins[pair.cathode as usize];
        cathode.set_low();
        cathode.set_as_output();
        let anode = &mut self.pins[pair.anode as usize];
        anode.set_high();
        anode.set_as_output();
        self.driven = Some(pair);
    }

    /// Tri-state the driven pair, if any. Idempotent.
    pub fn release(&mut self) {
        if let Some(pair) = self.driven.take() {
            self.pins[pair.anode as usize].set_as_input();
            self.pins[pair.cathode as usize].set_as_input();
        }
    }

    /// The currently driven pair.
    #[must_use]
    pub fn driven(&self) -> Option<PixelPair> {
        self.driven
    }
}

// Must be `pub` (not `pub(crate)`) because called by macro-generated code that
// expands at the call site in downstream crates.
#[doc(hidden)]
/// Scan loop. Called by macro-generated code.
///
/// Since embassy tasks cannot be generic, [`scan_device_task!`] generates a
/// concrete wrapper task that calls this function.
pub async fn scan_device_loop<const N: usize, const PINS: usize>(
    shared: &'static ScanShared<N>,
    mut pins: CharliePins<PINS>,
    lut: GammaLut,
) -> ! {
    defmt::info!("scan_device_loop: task started, reload {} ticks", lut.reload());
    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        let pulse = shared.lock(|core| core.borrow_mut().slot_start(&lut));
        if let SlotPulse::Drive { pair, on_ticks } = pulse {
            pins.drive(pair);
            Timer::after_micros(u64::from(on_ticks)).await;
            pins.release();
        }
        ticker.next().await;
    }
}

/// Generate a concrete embassy task that runs [`scan_device_loop`] for one
/// matrix geometry.
///
/// ```ignore
/// tilt_clock::scan_device_task!(scan_task, 225, 16);
/// ```
#[macro_export]
macro_rules! scan_device_task {
    (
        $task_name:ident,
        $n:expr,
        $pins:expr $(,)?
    ) => {
        $crate::scan_device_task!(@inner () $task_name, $n, $pins);
    };
    (
        $vis:vis $task_name:ident,
        $n:expr,
        $pins:expr $(,)?
    ) => {
        $crate::scan_device_task!(@inner ($vis) $task_name, $n, $pins);
    };
    (
        @inner
        ($($vis:tt)*)
        $task_name:ident,
        $n:expr,
        $pins:expr $(,)?
    ) => {
        #[embassy_executor::task]
        $($vis)* async fn $task_name(
            shared: &'static $crate::display::ScanShared<$n>,
            pins: $crate::scan_driver::CharliePins<$pins>,
            lut: $crate::gamma::GammaLut,
        ) {
            $crate::scan_driver::scan_device_loop(shared, pins, lut).await
        }
    };
}
