//! Fixed-point distance values
//!
//! Distances are carried in hundredths of a centimetre, which makes the
//! two-decimal rounding of an echo measurement exact without floats.

use core::fmt;

/// Speed of sound used for echo conversion (cm/s at ~20 °C)
pub const SPEED_OF_SOUND_CM_PER_S: u64 = 34_300;

/// A distance in hundredths of a centimetre
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Distance(u32);

impl Distance {
    /// Zero distance
    pub const ZERO: Self = Self(0);

    /// Create from hundredths of a centimetre
    pub const fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    /// Create from whole centimetres
    pub const fn from_cm(cm: u32) -> Self {
        Self(cm.saturating_mul(100))
    }

    /// Convert an echo round-trip time into a one-way distance
    ///
    /// `us × 34300 / 2 / 10⁶` cm, rounded half-up to two decimal places.
    pub fn from_echo_us(echo_us: u32) -> Self {
        // hundredths = us * 34300 * 100 / 2 / 1e6 = us * 343 / 200
        let scaled = echo_us as u64 * SPEED_OF_SOUND_CM_PER_S / 100;
        let hundredths = (scaled + 100) / 200;
        Self(hundredths.min(u32::MAX as u64) as u32)
    }

    /// Raw value in hundredths of a centimetre
    pub const fn hundredths(&self) -> u32 {
        self.0
    }

    /// Whole centimetres (truncated)
    pub const fn whole_cm(&self) -> u32 {
        self.0 / 100
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02} cm", self.0 / 100, self.0 % 100)
    }
}

/// Result of one ranging attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reading {
    /// Echo measured
    Distance(Distance),
    /// Echo never started or never ended within the timeout
    NoReading,
}

impl Reading {
    /// The measured distance, if there is one
    pub fn distance(&self) -> Option<Distance> {
        match self {
            Reading::Distance(d) => Some(*d),
            Reading::NoReading => None,
        }
    }

    /// True if a distance was measured and it is strictly below `threshold`
    ///
    /// A missing reading is never below anything.
    pub fn is_below(&self, threshold: Distance) -> bool {
        matches!(self, Reading::Distance(d) if *d < threshold)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Distance(d) => d.fmt(f),
            Reading::NoReading => f.write_str("no reading"),
        }
    }
}
