//! Sustained-motion safety gate
//!
//! A person reaching into the intake holds the PIR output high. Drafts and a
//! hand being withdrawn produce short spikes. Only a signal that stays high
//! continuously for the sustained duration counts as a person; any return to
//! low before that resets the timer.

use core::ops::ControlFlow;

use almonry_hal::{Clock, InputPin};

use crate::config::MotionConfig;
use crate::sequencer::delay_at_least_us;

/// Classification of one motion sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionSample {
    /// Low, and was low before
    Quiet,
    /// First high sample; the sustained timer starts
    Rising,
    /// Still high, not yet sustained
    Holding,
    /// Went low before reaching the sustained duration
    NoiseIgnored,
    /// High continuously for at least the sustained duration
    Sustained,
}

/// Outcome of one observation window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionVerdict {
    /// No sustained motion in the whole window
    Safe,
    /// Sustained motion seen; the intake must stay closed
    PersonPresent,
    /// The caller stopped the observation early
    Interrupted,
}

/// Per-sample debounce state
#[derive(Debug, Clone)]
pub struct MotionDebounce {
    sustained_us: u64,
    motion_start_us: Option<u64>,
}

impl MotionDebounce {
    /// Create a debouncer that needs `sustained_ms` of continuous high
    pub fn new(sustained_ms: u32) -> Self {
        Self {
            sustained_us: sustained_ms as u64 * 1000,
            motion_start_us: None,
        }
    }

    /// Feed one sample taken at `now_us`
    pub fn sample(&mut self, now_us: u64, high: bool) -> MotionSample {
        if !high {
            return match self.motion_start_us.take() {
                Some(_) => MotionSample::NoiseIgnored,
                None => MotionSample::Quiet,
            };
        }

        let (started, first) = match self.motion_start_us {
            Some(start) => (start, false),
            None => {
                self.motion_start_us = Some(now_us);
                (now_us, true)
            }
        };

        if now_us.saturating_sub(started) >= self.sustained_us {
            MotionSample::Sustained
        } else if first {
            MotionSample::Rising
        } else {
            MotionSample::Holding
        }
    }

    /// Timestamp of the first high sample in the current run
    pub fn motion_start_us(&self) -> Option<u64> {
        self.motion_start_us
    }
}

/// Watch the motion input for one window
///
/// Samples every `poll_ms` and returns `PersonPresent` as soon as a sample is
/// classified `Sustained`. The final delay is clamped to the time left, so the
/// last sample is taken exactly at the end of the window.
///
/// `on_sample` sees every classification and may return `Break` to stop
/// early, which yields `Interrupted`.
pub fn observe_motion_window<I, C, F>(
    input: &I,
    clock: &C,
    config: &MotionConfig,
    mut on_sample: F,
) -> MotionVerdict
where
    I: InputPin + ?Sized,
    C: Clock + ?Sized,
    F: FnMut(MotionSample) -> ControlFlow<()>,
{
    let mut debounce = MotionDebounce::new(config.sustained_ms);
    let window_us = config.window_ms as u64 * 1000;
    let poll_us = (config.poll_ms as u64 * 1000).max(1);
    let start_us = clock.now_us();

    loop {
        let now_us = clock.now_us();
        let sample = debounce.sample(now_us, input.is_high());

        if on_sample(sample).is_break() {
            return MotionVerdict::Interrupted;
        }
        if sample == MotionSample::Sustained {
            return MotionVerdict::PersonPresent;
        }

        let elapsed_us = now_us.saturating_sub(start_us);
        if elapsed_us >= window_us {
            return MotionVerdict::Safe;
        }

        delay_at_least_us(clock, poll_us.min(window_us - elapsed_us));
    }
}
