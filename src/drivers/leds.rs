// TremorScope — Indicator LEDs
//
// Three GPIO-driven LEDs, one per classification.  The blink helpers work
// on any `Indicator` so the host build can exercise them too.

use std::thread;
use std::time::Duration;

use crate::drivers::Indicator;
use crate::error::Result;
use crate::events::Classification;

/// Startup "ready" sequence: pulse the None output `count` times, then leave
/// it asserted as the default state.
pub fn blink_ready<I: Indicator>(indicator: &mut I, count: u32, half_period: Duration) -> Result<()> {
    for _ in 0..count {
        indicator.show(Classification::None)?;
        thread::sleep(half_period);
        indicator.set_all(false)?;
        thread::sleep(half_period);
    }
    indicator.show(Classification::None)
}

/// Fatal diagnostic state: all outputs blink in unison forever.
pub fn halt_blinking<I: Indicator>(indicator: &mut I, half_period: Duration) -> ! {
    let mut on = false;
    loop {
        on = !on;
        // Nothing left to report a GPIO failure to.
        let _ = indicator.set_all(on);
        thread::sleep(half_period);
    }
}

#[cfg(target_os = "espidf")]
pub use esp::LedIndicator;

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
    use esp_idf_hal::sys::EspError;

    use crate::drivers::Indicator;
    use crate::error::{Error, Result};
    use crate::events::Classification;

    type Led<'d> = PinDriver<'d, AnyOutputPin, Output>;

    pub struct LedIndicator<'d> {
        tremor: Led<'d>,
        dyskinesia: Led<'d>,
        none: Led<'d>,
    }

    impl<'d> LedIndicator<'d> {
        pub fn new(tremor: Led<'d>, dyskinesia: Led<'d>, none: Led<'d>) -> Self {
            Self { tremor, dyskinesia, none }
        }

        fn drive(&mut self, tremor: bool, dyskinesia: bool, none: bool) -> core::result::Result<(), EspError> {
            self.tremor.set_level(tremor.into())?;
            self.dyskinesia.set_level(dyskinesia.into())?;
            self.none.set_level(none.into())
        }
    }

    impl Indicator for LedIndicator<'_> {
        fn show(&mut self, classification: Classification) -> Result<()> {
            let (t, d, n) = match classification {
                Classification::Tremor     => (true, false, false),
                Classification::Dyskinesia => (false, true, false),
                Classification::None       => (false, false, true),
            };
            self.drive(t, d, n).map_err(|e| Error::Gpio(e.to_string()))
        }

        fn set_all(&mut self, on: bool) -> Result<()> {
            self.drive(on, on, on).map_err(|e| Error::Gpio(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::sim::SimIndicator;

    #[test]
    fn ready_sequence_ends_on_none() {
        let mut leds = SimIndicator::default();
        blink_ready(&mut leds, 3, Duration::ZERO).unwrap();
        assert_eq!(leds.updates(), 7);
        assert_eq!(leds.levels(), [false, false, true]);
    }
}
