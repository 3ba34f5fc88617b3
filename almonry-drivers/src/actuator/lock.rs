//! Solenoid door lock
//!
//! Each solenoid hangs off one H-bridge channel. Engaged (the spring holds
//! the bolt) is both inputs low; released is IN1 high, IN2 low. A hobby
//! servo swings a flag so the state is visible from outside the box.
//!
//! The lock starts engaged. Power loss therefore also means locked.

use almonry_core::traits::LockActuator;
use almonry_hal::{OutputPin, PwmOutput};

use super::servo::HobbyServo;

/// Servo angle showing "locked"
pub const LOCKED_ANGLE: u16 = 0;

/// Servo angle showing "unlocked"
pub const UNLOCKED_ANGLE: u16 = 180;

/// One H-bridge channel driving one solenoid
pub struct HBridgeChannel<P> {
    in1: P,
    in2: P,
}

impl<P: OutputPin> HBridgeChannel<P> {
    pub fn new(in1: P, in2: P) -> Self {
        let mut channel = Self { in1, in2 };
        channel.engage();
        channel
    }

    fn engage(&mut self) {
        self.in1.set_low();
        self.in2.set_low();
    }

    fn release(&mut self) {
        self.in1.set_high();
        self.in2.set_low();
    }
}

/// Solenoid lock with `N` bridge channels and a flag servo
pub struct SolenoidLock<P, S, const N: usize> {
    channels: [HBridgeChannel<P>; N],
    flag: HobbyServo<S>,
    released: bool,
}

impl<P: OutputPin, S: PwmOutput, const N: usize> SolenoidLock<P, S, N> {
    pub fn new(channels: [HBridgeChannel<P>; N], flag: HobbyServo<S>) -> Self {
        Self {
            channels,
            flag,
            released: false,
        }
    }

    /// Check if the solenoids were last driven to release
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<P: OutputPin, S: PwmOutput, const N: usize> LockActuator for SolenoidLock<P, S, N> {
    fn engage(&mut self) {
        for channel in &mut self.channels {
            channel.engage();
        }
        self.flag.set_angle(LOCKED_ANGLE);
        self.released = false;
    }

    fn release(&mut self) {
        for channel in &mut self.channels {
            channel.release();
        }
        self.flag.set_angle(UNLOCKED_ANGLE);
        self.released = true;
    }

    fn relax(&mut self) {
        self.flag.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPin, MockPwm};

    struct Fixture {
        lines: [MockPin; 4],
        pwm: MockPwm,
        lock: SolenoidLock<MockPin, MockPwm, 2>,
    }

    fn fixture() -> Fixture {
        let lines: [MockPin; 4] = Default::default();
        let pwm = MockPwm::default();
        let lock = SolenoidLock::new(
            [
                HBridgeChannel::new(lines[0].clone(), lines[1].clone()),
                HBridgeChannel::new(lines[2].clone(), lines[3].clone()),
            ],
            HobbyServo::new(pwm.clone()),
        );
        Fixture { lines, pwm, lock }
    }

    fn levels(lines: &[MockPin; 4]) -> [bool; 4] {
        [
            lines[0].high(),
            lines[1].high(),
            lines[2].high(),
            lines[3].high(),
        ]
    }

    #[test]
    fn test_starts_engaged() {
        let f = fixture();
        assert_eq!(levels(&f.lines), [false; 4]);
        assert!(!f.lock.is_released());
        assert_eq!(f.pwm.duty(), 0);
    }

    #[test]
    fn test_release_drives_in1_only() {
        let mut f = fixture();
        f.lock.release();
        assert_eq!(levels(&f.lines), [true, false, true, false]);
        assert_eq!(f.pwm.duty(), HobbyServo::<MockPwm>::duty_for(UNLOCKED_ANGLE));
        assert!(f.lock.is_released());
    }

    #[test]
    fn test_engage_after_release() {
        let mut f = fixture();
        f.lock.release();
        f.lock.engage();
        assert_eq!(levels(&f.lines), [false; 4]);
        assert_eq!(f.pwm.duty(), HobbyServo::<MockPwm>::duty_for(LOCKED_ANGLE));
        assert!(!f.lock.is_released());
    }

    #[test]
    fn test_relax_stops_flag_only() {
        let mut f = fixture();
        f.lock.release();
        f.lock.relax();
        assert_eq!(f.pwm.duty(), 0);
        // Solenoids stay energised
        assert_eq!(levels(&f.lines), [true, false, true, false]);
    }
}
