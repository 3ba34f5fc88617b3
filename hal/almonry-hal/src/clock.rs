//! Monotonic clock and blocking delays
//!
//! The control loop is a synchronous sequencer: every settle time, step delay
//! and polling cadence is a blocking delay on the control core. Implementations
//! must be cheap handles so each component can own a clone.

/// Monotonic microsecond clock with blocking delays
pub trait Clock {
    /// Microseconds since an arbitrary fixed origin. Never decreases.
    fn now_us(&self) -> u64;

    /// Block the calling context for `us` microseconds
    fn delay_us(&self, us: u32);

    /// Block the calling context for `ms` milliseconds
    fn delay_ms(&self, ms: u32) {
        for _ in 0..ms {
            self.delay_us(1_000);
        }
    }

    /// Milliseconds since the origin, wrapping at `u32::MAX`
    ///
    /// Used for status timestamps; wraps after ~49 days of uptime.
    fn now_ms(&self) -> u32 {
        (self.now_us() / 1_000) as u32
    }

    /// Microseconds elapsed since an earlier `now_us()` reading
    fn elapsed_us(&self, since_us: u64) -> u64 {
        self.now_us().saturating_sub(since_us)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }

    fn delay_us(&self, us: u32) {
        (**self).delay_us(us)
    }

    fn delay_ms(&self, ms: u32) {
        (**self).delay_ms(ms)
    }
}
