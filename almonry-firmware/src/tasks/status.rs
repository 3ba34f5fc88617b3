//! Status observer task
//!
//! Moves events from the control loop into the feed the viewer reads.

use defmt::*;

use almonry_core::config::StatusConfig;

use crate::channels::{FEED, FEED_HISTORY, STATUS_CHANNEL};

#[embassy_executor::task]
pub async fn status_task(config: StatusConfig) {
    info!("Status task started, keeping {} events", FEED_HISTORY);

    // Only differs when machine.toml was rejected at boot
    if usize::from(config.history_len) != FEED_HISTORY {
        warn!(
            "history_len {} ignored, feed was built for {}",
            config.history_len, FEED_HISTORY
        );
    }

    FEED.lock().await.set_thank_you_ms(config.thank_you_ms);

    loop {
        let event = STATUS_CHANNEL.receive().await;
        FEED.lock().await.record(event);
    }
}
