//! Device-side status lamp

/// What the lamp on the box shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lamp {
    /// Everything dark
    Off,
    /// Waiting for a donation
    Ready,
    /// Safe, donation in progress
    Go,
    /// Lit half of the "not safe" flash
    NotSafe,
}

/// Something that can show a `Lamp` pattern
pub trait StatusIndicator {
    fn show(&mut self, lamp: Lamp);
}
