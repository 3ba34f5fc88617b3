//! Adapters from embedded-hal 1.0 pins to the almonry-hal traits
//!
//! Chip HALs (embassy-rp included) implement embedded-hal. Their GPIO errors
//! are `Infallible`, so the adapters require that rather than swallow real
//! errors.

use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::digital;

/// Output pin adapter
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P: digital::OutputPin<Error = Infallible>> EhOutput<P> {
    /// Wrap a pin and drive it to `initial_high`
    pub fn new(mut pin: P, initial_high: bool) -> Self {
        let _ = pin.set_state(initial_high.into());
        Self {
            pin,
            high: initial_high,
        }
    }
}

impl<P: digital::OutputPin<Error = Infallible>> almonry_hal::OutputPin for EhOutput<P> {
    fn set_high(&mut self) {
        let _ = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let _ = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input pin adapter
///
/// embedded-hal reads take `&mut self`; the cell lets the sampled-input
/// trait read through `&self`. Reads never nest.
pub struct EhInput<P> {
    pin: RefCell<P>,
}

impl<P: digital::InputPin<Error = Infallible>> EhInput<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin: RefCell::new(pin),
        }
    }
}

impl<P: digital::InputPin<Error = Infallible>> almonry_hal::InputPin for EhInput<P> {
    fn is_high(&self) -> bool {
        match self.pin.borrow_mut().is_high() {
            Ok(high) => high,
            Err(never) => match never {},
        }
    }
}
