//! Servo PWM on an RP2040 PWM slice
//!
//! The slice counter runs at SYS_CLK / divider and wraps at `top`, so the
//! output frequency is SYS_CLK / (divider × (top + 1)).

use almonry_hal::PwmOutput;
use embassy_rp::pwm::{Config, Pwm};
use fixed::types::U12F4;

/// System clock frequency (125 MHz default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// Hobby servo frame rate
pub const SERVO_FREQ_HZ: u32 = 50;

/// Integer clock divider for servo PWM (125 MHz / 64 = 1.953 MHz)
const SERVO_DIVIDER: u16 = 64;

/// Counter wrap value for a target frequency at a given integer divider
///
/// Returns `None` if the period does not fit the 16-bit counter.
pub fn calc_top(freq_hz: u32, divider: u16) -> Option<u16> {
    if freq_hz == 0 || divider == 0 {
        return None;
    }
    let counts = SYS_CLK_HZ / divider as u32 / freq_hz;
    let top = counts.checked_sub(1)?;
    u16::try_from(top).ok()
}

/// Compare value for a duty in permille of a period ending at `top`
pub fn compare_for(top: u16, permille: u16) -> u16 {
    let permille = permille.min(1000) as u32;
    ((top as u32 + 1) * permille / 1000).min(top as u32 + 1) as u16
}

/// Which output of the slice the servo is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    A,
    B,
}

/// One 50 Hz output of a PWM slice
pub struct ServoPwm<'d> {
    pwm: Pwm<'d>,
    config: Config,
    channel: PwmChannel,
}

impl<'d> ServoPwm<'d> {
    /// Configure an already-constructed slice for servo pulses
    ///
    /// The output starts disabled.
    pub fn new(mut pwm: Pwm<'d>, channel: PwmChannel) -> Self {
        let mut config = Config::default();
        config.divider = U12F4::from_num(SERVO_DIVIDER);
        // 125 MHz / 64 / 50 Hz fits in 16 bits
        config.top = calc_top(SERVO_FREQ_HZ, SERVO_DIVIDER).unwrap_or(u16::MAX);
        config.compare_a = 0;
        config.compare_b = 0;
        config.enable = true;
        pwm.set_config(&config);

        Self {
            pwm,
            config,
            channel,
        }
    }

    /// Currently configured compare value
    pub fn compare(&self) -> u16 {
        match self.channel {
            PwmChannel::A => self.config.compare_a,
            PwmChannel::B => self.config.compare_b,
        }
    }
}

impl PwmOutput for ServoPwm<'_> {
    fn set_duty_permille(&mut self, permille: u16) {
        let compare = compare_for(self.config.top, permille);
        match self.channel {
            PwmChannel::A => self.config.compare_a = compare,
            PwmChannel::B => self.config.compare_b = compare,
        }
        self.pwm.set_config(&self.config);
    }
}
