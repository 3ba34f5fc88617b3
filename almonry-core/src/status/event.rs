//! Status event records

use core::fmt;

use crate::sensing::Reading;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusKind {
    /// Controller started, outputs safe
    SystemReady { total: u32 },
    /// Donate button pressed
    CycleStarted,
    /// One reading from each ranger
    Readings { a: Reading, b: Reading },
    ObjectDetected,
    /// Nothing in the intake; cycle ends untouched
    NoObject { total: u32 },
    MotionCheckStarted { window_ms: u32, sustained_ms: u32 },
    MotionRising,
    MotionNoiseIgnored,
    /// Window passed without sustained motion
    MotionClear,
    /// Sustained motion; intake stays closed
    MotionDetected,
    /// Cycle refused after motion
    Aborted { total: u32 },
    LockReleased,
    DoorsOpening,
    BeltStarted,
    DoorsClosing,
    BeltStopped,
    LockEngaged,
    /// Cycle completed and counted
    DonationCounted { total: u32 },
    /// Outputs forced safe after an external stop
    ShutdownComplete,
}

impl StatusKind {
    /// Donation total carried by this event, if any
    pub fn donation_total(&self) -> Option<u32> {
        match *self {
            StatusKind::SystemReady { total }
            | StatusKind::NoObject { total }
            | StatusKind::Aborted { total }
            | StatusKind::DonationCounted { total } => Some(total),
            _ => None,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::SystemReady { total } => {
                write!(f, "System ready, waiting for button ({total} donations)")
            }
            StatusKind::CycleStarted => f.write_str("Button pressed, measuring distance"),
            StatusKind::Readings { a, b } => write!(f, "Sensor A: {a} | Sensor B: {b}"),
            StatusKind::ObjectDetected => f.write_str("Object detected by distance sensors"),
            StatusKind::NoObject { total } => {
                write!(f, "No object detected, outputs unchanged ({total} donations)")
            }
            StatusKind::MotionCheckStarted {
                window_ms,
                sustained_ms,
            } => write!(
                f,
                "Checking for sustained motion for up to {window_ms} ms (needs {sustained_ms} ms high)"
            ),
            StatusKind::MotionRising => f.write_str("Motion sensor high, timing it"),
            StatusKind::MotionNoiseIgnored => f.write_str("Motion sensor low again, spike ignored"),
            StatusKind::MotionClear => f.write_str("No sustained motion detected"),
            StatusKind::MotionDetected => f.write_str("Person detected, doors will not open"),
            StatusKind::Aborted { total } => {
                write!(f, "Doors remain closed for safety ({total} donations)")
            }
            StatusKind::LockReleased => f.write_str("Lock released"),
            StatusKind::DoorsOpening => f.write_str("Opening doors"),
            StatusKind::BeltStarted => f.write_str("Doors open, belt started"),
            StatusKind::DoorsClosing => f.write_str("Closing doors"),
            StatusKind::BeltStopped => f.write_str("Belt stopped"),
            StatusKind::LockEngaged => f.write_str("Lock engaged"),
            StatusKind::DonationCounted { total } => write!(f, "Donation counted, total {total}"),
            StatusKind::ShutdownComplete => f.write_str("Stopped, outputs safe"),
        }
    }
}

/// One immutable status record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusEvent {
    /// Wrapping sequence number
    pub seq: u16,
    /// Controller uptime (ms, wrapping)
    pub timestamp_ms: u32,
    pub kind: StatusKind,
}

impl StatusEvent {
    /// True if `self` was issued after `seq`
    ///
    /// Compares in wrapping order, so only meaningful within half the
    /// sequence space.
    pub fn is_after(&self, seq: u16) -> bool {
        (self.seq.wrapping_sub(seq) as i16) > 0
    }
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.timestamp_ms / 1000;
        let millis = self.timestamp_ms % 1000;
        write!(f, "[{secs}.{millis:03}] {}", self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensing::Distance;
    use std::string::ToString;

    #[test]
    fn test_display() {
        let event = StatusEvent {
            seq: 3,
            timestamp_ms: 12_045,
            kind: StatusKind::Readings {
                a: Reading::Distance(Distance::from_hundredths(1500)),
                b: Reading::NoReading,
            },
        };
        assert_eq!(
            event.to_string(),
            "[12.045] Sensor A: 15.00 cm | Sensor B: no reading"
        );
    }

    #[test]
    fn test_longest_text_fits_log_entry() {
        let kind = StatusKind::MotionCheckStarted {
            window_ms: u32::MAX,
            sustained_ms: u32::MAX,
        };
        let event = StatusEvent {
            seq: 0,
            timestamp_ms: u32::MAX,
            kind,
        };
        assert!(event.to_string().len() <= almonry_protocol::MAX_LOG_TEXT_LEN);
    }

    #[test]
    fn test_wrapping_order() {
        let event = |seq| StatusEvent {
            seq,
            timestamp_ms: 0,
            kind: StatusKind::LockEngaged,
        };
        assert!(event(5).is_after(4));
        assert!(!event(5).is_after(5));
        assert!(event(0).is_after(u16::MAX));
        assert!(!event(u16::MAX).is_after(0));
    }

    #[test]
    fn test_totals() {
        assert_eq!(StatusKind::DonationCounted { total: 4 }.donation_total(), Some(4));
        assert_eq!(StatusKind::BeltStarted.donation_total(), None);
    }
}
