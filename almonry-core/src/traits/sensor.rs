//! Distance sensor trait

use crate::sensing::Reading;

/// A sensor that produces one distance reading per call
pub trait RangeSensor {
    /// Take a single reading
    ///
    /// Must return within a bounded time. A sensor that sees no echo returns
    /// `Reading::NoReading` rather than waiting.
    fn measure(&mut self) -> Reading;
}
