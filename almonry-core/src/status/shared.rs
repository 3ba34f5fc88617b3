//! Cross-core status values
//!
//! The only state the control loop shares with the observer. Every field is
//! a single atomic written by the control side alone, so plain loads and
//! stores suffice (Cortex-M0+ has no compare-and-swap).

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use almonry_protocol::PhaseCode;

use super::event::StatusEvent;
use crate::state::CyclePhase;

/// Donation total, controller phase and event bookkeeping
pub struct SharedStatus {
    donation_total: AtomicU32,
    phase: AtomicU8,
    last_event_ms: AtomicU32,
    dropped_events: AtomicU32,
}

impl Default for SharedStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedStatus {
    pub const fn new() -> Self {
        Self {
            donation_total: AtomicU32::new(0),
            phase: AtomicU8::new(0),
            last_event_ms: AtomicU32::new(0),
            dropped_events: AtomicU32::new(0),
        }
    }

    /// Mirror an outgoing event (control side)
    pub fn record(&self, event: &StatusEvent) {
        self.last_event_ms
            .store(event.timestamp_ms, Ordering::Relaxed);
        if let Some(total) = event.kind.donation_total() {
            self.donation_total.store(total, Ordering::Release);
        }
    }

    /// Publish the controller phase (control side)
    pub fn set_phase(&self, phase: CyclePhase) {
        self.phase.store(phase.code().to_byte(), Ordering::Release);
    }

    /// Count an event that could not be delivered (control side)
    pub fn note_dropped(&self) {
        let dropped = self.dropped_events.load(Ordering::Relaxed);
        self.dropped_events
            .store(dropped.wrapping_add(1), Ordering::Relaxed);
    }

    pub fn donation_total(&self) -> u32 {
        self.donation_total.load(Ordering::Acquire)
    }

    pub fn phase(&self) -> PhaseCode {
        PhaseCode::from_byte(self.phase.load(Ordering::Acquire)).unwrap_or_default()
    }

    pub fn last_event_ms(&self) -> u32 {
        self.last_event_ms.load(Ordering::Relaxed)
    }

    pub fn dropped_events(&self) -> u32 {
        self.dropped_events.load(Ordering::Relaxed)
    }
}
