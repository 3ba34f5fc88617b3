//! Hobby servo on a 50 Hz PWM channel
//!
//! Pulse width runs from 0.4 ms (0°) to 2.4 ms (180°) of the 20 ms frame,
//! i.e. duty = 2 % + angle / 18 %.

use almonry_hal::PwmOutput;

/// Largest commandable angle (degrees)
pub const MAX_ANGLE: u16 = 180;

/// Duty at 0° (permille)
const MIN_DUTY_PERMILLE: u16 = 20;

pub struct HobbyServo<P> {
    pwm: P,
    angle: Option<u16>,
}

impl<P: PwmOutput> HobbyServo<P> {
    /// Wrap a PWM channel; no pulses until the first `set_angle`
    pub fn new(mut pwm: P) -> Self {
        pwm.disable();
        Self { pwm, angle: None }
    }

    /// Duty in permille for an angle, clamped to 0..=180°
    pub fn duty_for(angle: u16) -> u16 {
        MIN_DUTY_PERMILLE + angle.min(MAX_ANGLE) * 10 / 18
    }

    /// Start driving the horn to `angle` degrees
    pub fn set_angle(&mut self, angle: u16) {
        let angle = angle.min(MAX_ANGLE);
        self.pwm.set_duty_permille(Self::duty_for(angle));
        self.angle = Some(angle);
    }

    /// Stop the pulses; the horn stays where it is
    pub fn stop(&mut self) {
        self.pwm.disable();
    }

    /// Last commanded angle
    pub fn angle(&self) -> Option<u16> {
        self.angle
    }
}
