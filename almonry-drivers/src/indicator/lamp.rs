//! Three-colour stack lamp
//!
//! | Lamp      | Green | White | Red |
//! |-----------|-------|-------|-----|
//! | `Ready`   | on    | on    | off |
//! | `Go`      | off   | off   | on  |
//! | `NotSafe` | off   | off   | on  |
//! | `Off`     | off   | off   | off |
//!
//! `Go` and `NotSafe` share the red lamp; the controller flashes it for
//! `NotSafe`.

use almonry_core::traits::{Lamp, StatusIndicator};
use almonry_hal::OutputPin;

pub struct StackLamp<P> {
    green: P,
    white: P,
    red: P,
    showing: Lamp,
}

impl<P: OutputPin> StackLamp<P> {
    pub fn new(green: P, white: P, red: P) -> Self {
        let mut lamp = Self {
            green,
            white,
            red,
            showing: Lamp::Off,
        };
        lamp.show(Lamp::Off);
        lamp
    }

    pub fn showing(&self) -> Lamp {
        self.showing
    }
}

impl<P: OutputPin> StatusIndicator for StackLamp<P> {
    fn show(&mut self, lamp: Lamp) {
        let (green, white, red) = match lamp {
            Lamp::Off => (false, false, false),
            Lamp::Ready => (true, true, false),
            Lamp::Go | Lamp::NotSafe => (false, false, true),
        };
        self.green.set_state(green);
        self.white.set_state(white);
        self.red.set_state(red);
        self.showing = lamp;
    }
}
