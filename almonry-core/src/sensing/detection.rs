//! Object detection from two independent rangers

use super::distance::{Distance, Reading};

/// Per-sensor detection thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetectionThresholds {
    /// Sensor A trips below this distance
    pub sensor_a: Distance,
    /// Sensor B trips below this distance
    pub sensor_b: Distance,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            sensor_a: Distance::from_cm(20),
            sensor_b: Distance::from_cm(10),
        }
    }
}

impl DetectionThresholds {
    /// An object is present if either sensor reads strictly below its threshold
    pub fn object_present(&self, a: Reading, b: Reading) -> bool {
        a.is_below(self.sensor_a) || b.is_below(self.sensor_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cm(v: u32) -> Reading {
        Reading::Distance(Distance::from_cm(v))
    }

    #[test]
    fn test_first_sensor_alone_detects() {
        let t = DetectionThresholds::default();
        assert!(t.object_present(cm(15), cm(30)));
    }

    #[test]
    fn test_second_sensor_alone_detects() {
        let t = DetectionThresholds::default();
        assert!(t.object_present(cm(25), cm(9)));
    }

    #[test]
    fn test_both_above_is_empty() {
        let t = DetectionThresholds::default();
        assert!(!t.object_present(cm(25), cm(30)));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let t = DetectionThresholds::default();
        assert!(!t.object_present(cm(20), cm(10)));
    }

    #[test]
    fn test_missing_readings_are_empty() {
        let t = DetectionThresholds::default();
        assert!(!t.object_present(Reading::NoReading, Reading::NoReading));
        assert!(t.object_present(Reading::NoReading, cm(1)));
    }

    fn reading() -> impl Strategy<Value = Reading> {
        prop_oneof![
            1 => Just(Reading::NoReading),
            9 => (0u32..100_000).prop_map(|h| Reading::Distance(Distance::from_hundredths(h))),
        ]
    }

    proptest! {
        #[test]
        fn detection_is_either_sensor(
            a in reading(),
            b in reading(),
            ta in 1u32..100_000,
            tb in 1u32..100_000,
        ) {
            let t = DetectionThresholds {
                sensor_a: Distance::from_hundredths(ta),
                sensor_b: Distance::from_hundredths(tb),
            };
            let a_trips = a.distance().map(|d| d.hundredths() < ta).unwrap_or(false);
            let b_trips = b.distance().map(|d| d.hundredths() < tb).unwrap_or(false);
            prop_assert_eq!(t.object_present(a, b), a_trips || b_trips);
        }
    }
}
