//! Service switch watcher
//!
//! Holding the service switch down asks the control loop to stop. The loop
//! notices at its next check, forces every output safe and returns.

use core::sync::atomic::Ordering;

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};

use crate::channels::STOP;

/// Consecutive low samples before the switch counts as pressed
const PRESSED_SAMPLES: u8 = 3;

#[embassy_executor::task]
pub async fn shutdown_task(switch: Input<'static>) {
    info!("Shutdown task started");

    let mut ticker = Ticker::every(Duration::from_millis(50));
    let mut low_samples = 0u8;

    loop {
        ticker.next().await;

        // Active low with pull-up
        if switch.is_low() {
            low_samples = low_samples.saturating_add(1);
        } else {
            low_samples = 0;
        }

        if low_samples >= PRESSED_SAMPLES {
            warn!("Service switch pressed, stopping controller");
            STOP.store(true, Ordering::Release);
            return;
        }
    }
}
