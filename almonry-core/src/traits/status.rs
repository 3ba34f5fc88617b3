//! Status output and stop request traits

use core::sync::atomic::{AtomicBool, Ordering};

use crate::state::CyclePhase;
use crate::status::StatusEvent;

/// Receiver of the controller's status events
///
/// Implementations must return immediately: the controller calls this from
/// the middle of timed sequences. An implementation that cannot deliver an
/// event drops it.
pub trait StatusSink {
    /// Deliver one event
    fn publish(&mut self, event: &StatusEvent);

    /// The controller entered a new phase
    fn phase_changed(&mut self, _phase: CyclePhase) {}
}

/// External request to stop the controller
pub trait StopRequest {
    fn stop_requested(&self) -> bool;
}

impl StopRequest for AtomicBool {
    fn stop_requested(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<T: StopRequest + ?Sized> StopRequest for &T {
    fn stop_requested(&self) -> bool {
        (**self).stop_requested()
    }
}
