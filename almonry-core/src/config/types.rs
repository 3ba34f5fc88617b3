//! Configuration type definitions
//!
//! `MachineConfig::default()` reproduces the constants the intake was
//! originally commissioned with. Every field can be overridden from
//! `machine.toml`.

use crate::sensing::DetectionThresholds;

/// Longest stroke a door mechanism may be configured for
pub const MAX_STROKE_STEPS: u16 = 255;

/// Longest the "not safe" pattern may be configured to flash (ms)
pub const MAX_FLASH_DURATION_MS: u32 = 60_000;

/// Smallest status history the observer may keep
pub const MIN_HISTORY_LEN: u16 = 8;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A detection threshold of zero can never trip
    ZeroThreshold,
    /// Echo timeout or trigger pulse is zero
    InvalidEchoTiming,
    /// A polling interval is zero
    ZeroPollInterval,
    /// Motion poll interval is longer than the observation window
    PollExceedsWindow,
    /// Door step delay is zero
    ZeroStepDelay,
    /// A door stroke exceeds `MAX_STROKE_STEPS`
    StrokeTooLong,
    /// Indicator flash period is zero while flashing is enabled
    ZeroFlashPeriod,
    /// Flash duration exceeds `MAX_FLASH_DURATION_MS`
    FlashTooLong,
    /// Status history shorter than `MIN_HISTORY_LEN`
    HistoryTooShort,
}

/// Ultrasonic ranger timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EchoConfig {
    /// Width of the trigger pulse (µs)
    pub trigger_pulse_us: u32,
    /// Bound on each wait for an echo edge (µs)
    pub echo_timeout_us: u32,
}

impl Default for EchoConfig {
    fn default() -> Self {
        Self {
            trigger_pulse_us: 10,
            echo_timeout_us: 30_000,
        }
    }
}

/// Motion safety gate parameters
///
/// Window and sustained duration are independent; the commissioned values
/// happen to be equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionConfig {
    /// Length of the observation window (ms)
    pub window_ms: u32,
    /// Continuous high time that counts as a person (ms)
    pub sustained_ms: u32,
    /// Sampling cadence (ms)
    pub poll_ms: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            window_ms: 5000,
            sustained_ms: 5000,
            poll_ms: 100,
        }
    }
}

/// Coil phase ordering for one stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StepOrder {
    /// Walk the full-step table forwards
    #[default]
    Normal,
    /// Walk the full-step table backwards
    Reversed,
}

/// One direction of travel for a door mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Stroke {
    /// Number of full steps
    pub steps: u16,
    /// Phase ordering
    pub order: StepOrder,
}

impl Stroke {
    pub const fn new(steps: u16, order: StepOrder) -> Self {
        Self { steps, order }
    }
}

/// Open and close strokes for one door mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MechanismConfig {
    pub open: Stroke,
    pub close: Stroke,
}

/// Both door mechanisms
///
/// The mechanisms are mounted mirror-image, so their phase orderings are
/// configured separately per direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DoorConfig {
    pub a: MechanismConfig,
    pub b: MechanismConfig,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            a: MechanismConfig {
                open: Stroke::new(7, StepOrder::Reversed),
                close: Stroke::new(9, StepOrder::Normal),
            },
            b: MechanismConfig {
                open: Stroke::new(8, StepOrder::Normal),
                close: Stroke::new(9, StepOrder::Reversed),
            },
        }
    }
}

/// Cycle timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Trigger polling cadence while idle (ms)
    pub trigger_poll_ms: u32,
    /// Pause between the two rangers to avoid acoustic cross-talk (ms)
    pub inter_sensor_settle_ms: u32,
    /// Settle after each lock movement (ms)
    pub lock_settle_ms: u32,
    /// Minimum time between lock release and the first door step (ms)
    pub release_settle_ms: u32,
    /// Delay between door steps (ms)
    pub step_delay_ms: u32,
    /// Time the doors are held open (ms)
    pub door_dwell_ms: u32,
    /// Minimum belt run time, measured from belt start (ms)
    pub belt_run_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            trigger_poll_ms: 50,
            inter_sensor_settle_ms: 50,
            lock_settle_ms: 300,
            release_settle_ms: 500,
            step_delay_ms: 80,
            door_dwell_ms: 2000,
            belt_run_ms: 5000,
        }
    }
}

/// Belt relay wiring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BeltConfig {
    /// Relay board energises on a low input
    pub active_low: bool,
}

/// Status lamp behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IndicatorConfig {
    /// How long the "not safe" pattern flashes (ms)
    pub flash_duration_ms: u32,
    /// One on+off period of the flash (ms)
    pub flash_period_ms: u32,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            flash_duration_ms: 3000,
            flash_period_ms: 400,
        }
    }
}

/// Observer-side status presentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusConfig {
    /// How long the thank-you message stays up (ms)
    pub thank_you_ms: u32,
    /// Number of events the observer retains
    pub history_len: u16,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            thank_you_ms: 5000,
            history_len: 300,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineConfig {
    pub detection: DetectionThresholds,
    pub echo: EchoConfig,
    pub motion: MotionConfig,
    pub doors: DoorConfig,
    pub timing: TimingConfig,
    pub belt: BeltConfig,
    pub indicator: IndicatorConfig,
    pub status: StatusConfig,
}

impl MachineConfig {
    /// Check the configuration for values the controller cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.detection.sensor_a.hundredths() == 0 || self.detection.sensor_b.hundredths() == 0
        {
            return Err(ConfigError::ZeroThreshold);
        }
        if self.echo.trigger_pulse_us == 0 || self.echo.echo_timeout_us == 0 {
            return Err(ConfigError::InvalidEchoTiming);
        }
        if self.motion.poll_ms == 0 || self.timing.trigger_poll_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.motion.poll_ms > self.motion.window_ms {
            return Err(ConfigError::PollExceedsWindow);
        }
        if self.timing.step_delay_ms == 0 {
            return Err(ConfigError::ZeroStepDelay);
        }
        let strokes = [
            self.doors.a.open,
            self.doors.a.close,
            self.doors.b.open,
            self.doors.b.close,
        ];
        if strokes.iter().any(|s| s.steps > MAX_STROKE_STEPS) {
            return Err(ConfigError::StrokeTooLong);
        }
        if self.indicator.flash_duration_ms > 0 && self.indicator.flash_period_ms == 0 {
            return Err(ConfigError::ZeroFlashPeriod);
        }
        if self.indicator.flash_duration_ms > MAX_FLASH_DURATION_MS {
            return Err(ConfigError::FlashTooLong);
        }
        if self.status.history_len < MIN_HISTORY_LEN {
            return Err(ConfigError::HistoryTooShort);
        }
        Ok(())
    }
}
