//! Events that drive phase transitions

/// Events that can trigger phase transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleEvent {
    /// Donate button read high while idle
    TriggerPressed,

    // Distance evaluation
    /// At least one ranger saw an object
    ObjectDetected,
    /// Neither ranger saw an object
    NoObject,

    // Motion gate outcome
    /// Window passed without sustained motion
    MotionSafe,
    /// Sustained motion seen
    PersonPresent,

    // Completion
    /// Abort indication finished
    AbortHandled,
    /// Lock re-engaged and donation counted
    AdmitComplete,

    /// External stop; outputs forced safe
    Shutdown,
}
