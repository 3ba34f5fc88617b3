//! PWM output abstraction

/// A single PWM channel with a fixed carrier frequency
///
/// The carrier frequency is chosen by the implementation when the channel is
/// constructed (50 Hz for hobby servos).
pub trait PwmOutput {
    /// Set the duty cycle in permille (0 = always low, 1000 = always high)
    ///
    /// Values above 1000 are clamped.
    fn set_duty_permille(&mut self, permille: u16);

    /// Stop generating pulses (output held low)
    fn disable(&mut self) {
        self.set_duty_permille(0);
    }
}
