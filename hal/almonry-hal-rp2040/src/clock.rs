//! embassy-time backed clock
//!
//! Delays spin with `block_for`. Only the control core, which runs nothing
//! but the donation cycle, may use them.

use almonry_hal::Clock;
use embassy_time::{block_for, Duration, Instant};

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn delay_us(&self, us: u32) {
        block_for(Duration::from_micros(us as u64));
    }

    fn delay_ms(&self, ms: u32) {
        block_for(Duration::from_millis(ms as u64));
    }
}
