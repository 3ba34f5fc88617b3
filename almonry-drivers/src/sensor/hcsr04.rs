//! HC-SR04 ultrasonic ranger
//!
//! A measurement pulses TRIG, then times the ECHO pulse. The echo width is
//! the round trip of the sound burst, so distance = width × c / 2.
//!
//! Both echo edges are waited for with a bound. A sensor that is unplugged,
//! blinded or pointed at nothing within range never produces an edge and the
//! measurement comes back as [`Reading::NoReading`].
//!
//! The waits busy-poll the echo line. They run on the control core, which
//! owns nothing else.

use almonry_core::config::EchoConfig;
use almonry_core::sensing::{Distance, Reading};
use almonry_core::traits::RangeSensor;
use almonry_hal::{Clock, InputPin, OutputPin};

/// Low time before the trigger pulse so the rising edge is clean (µs)
const TRIGGER_SETTLE_US: u32 = 2;

/// HC-SR04 on two GPIO lines
pub struct HcSr04<T, E, C> {
    trigger: T,
    echo: E,
    clock: C,
    config: EchoConfig,
}

impl<T: OutputPin, E: InputPin, C: Clock> HcSr04<T, E, C> {
    pub fn new(mut trigger: T, echo: E, clock: C, config: EchoConfig) -> Self {
        trigger.set_low();
        Self {
            trigger,
            echo,
            clock,
            config,
        }
    }

    fn pulse_trigger(&mut self) {
        self.trigger.set_low();
        self.clock.delay_us(TRIGGER_SETTLE_US);
        self.trigger.set_high();
        self.clock.delay_us(self.config.trigger_pulse_us);
        self.trigger.set_low();
    }

    /// Wait until the echo line reads `high`; returns the time it did
    fn wait_for_level(&self, high: bool) -> Option<u64> {
        let start = self.clock.now_us();
        let timeout = self.config.echo_timeout_us as u64;
        while self.echo.is_high() != high {
            if self.clock.elapsed_us(start) > timeout {
                return None;
            }
        }
        Some(self.clock.now_us())
    }

    /// Width of the echo pulse (µs), if both edges arrived in time
    pub fn echo_width_us(&mut self) -> Option<u32> {
        self.pulse_trigger();
        let rise = self.wait_for_level(true)?;
        let fall = self.wait_for_level(false)?;
        Some(fall.saturating_sub(rise).min(u32::MAX as u64) as u32)
    }
}

impl<T: OutputPin, E: InputPin, C: Clock> RangeSensor for HcSr04<T, E, C> {
    fn measure(&mut self) -> Reading {
        match self.echo_width_us() {
            Some(width) => Reading::Distance(Distance::from_echo_us(width)),
            None => Reading::NoReading,
        }
    }
}
