//! Status sink of the control loop
//!
//! Logs each event, mirrors it into the shared atomics and offers it to the
//! observer. Never blocks: a full channel drops the event.

use defmt::*;

use almonry_core::state::CyclePhase;
use almonry_core::status::StatusEvent;
use almonry_core::traits::StatusSink;

use crate::channels::{SHARED_STATUS, STATUS_CHANNEL};

pub struct ChannelSink;

impl StatusSink for ChannelSink {
    fn publish(&mut self, event: &StatusEvent) {
        info!("{}", Display2Format(event));
        SHARED_STATUS.record(event);
        if STATUS_CHANNEL.try_send(*event).is_err() {
            SHARED_STATUS.note_dropped();
            warn!(
                "Status channel full, dropped event {} ({} total)",
                event.seq,
                SHARED_STATUS.dropped_events()
            );
        }
    }

    fn phase_changed(&mut self, phase: CyclePhase) {
        debug!("Phase: {:?}", phase);
        SHARED_STATUS.set_phase(phase);
    }
}
