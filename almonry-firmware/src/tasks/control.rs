//! Donation cycle task (core 1)
//!
//! Runs the synchronous controller with blocking delays. Core 1 has no other
//! task, so the executor is never needed again until the loop returns.

use defmt::*;

use almonry_core::config::MachineConfig;
use almonry_core::cycle::{DonationCycle, Peripherals};

use crate::board::DonationBoard;
use crate::channels::STOP;
use crate::sink::ChannelSink;

#[embassy_executor::task]
pub async fn control_task(peripherals: Peripherals<DonationBoard>, config: MachineConfig) {
    info!("Control task started on core 1");

    let mut cycle = DonationCycle::new(peripherals, config, ChannelSink);
    cycle.run(&STOP);

    info!(
        "Control loop stopped after {} donations, outputs safe",
        cycle.donations()
    );
}
