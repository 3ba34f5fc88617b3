//! Viewer UART transmit task
//!
//! Answers queued viewer requests from the status feed and the shared
//! status.

use defmt::*;
use embassy_rp::uart::BufferedUartTx;
use embassy_time::Instant;
use embedded_io_async::Write;
use heapless::Vec;

use almonry_core::status::{log_entry, StatusEvent};
use almonry_protocol::{ControllerMessage, ViewerRequest, MAX_FRAME_SIZE};

use crate::channels::{FEED, FEED_HISTORY, SHARED_STATUS, VIEWER_REQUESTS};

#[embassy_executor::task]
pub async fn viewer_tx_task(mut tx: BufferedUartTx) {
    info!("Viewer TX task started");

    loop {
        match VIEWER_REQUESTS.receive().await {
            ViewerRequest::Ping => {
                trace!("PING received");
                send(&mut tx, &ControllerMessage::Pong).await;
            }
            ViewerRequest::QueryStatus => {
                let now_ms = Instant::now().as_millis() as u32;
                let report = FEED.lock().await.snapshot(
                    now_ms,
                    SHARED_STATUS.phase(),
                    SHARED_STATUS.donation_total(),
                );
                send(&mut tx, &ControllerMessage::Status(report)).await;
            }
            ViewerRequest::QueryLog { after_seq } => {
                send_log(&mut tx, after_seq).await;
            }
        }
    }
}

/// Send retained entries newer than `after_seq`, then the end marker
async fn send_log(tx: &mut BufferedUartTx, after_seq: u16) {
    // Copy out so the feed is not held while the UART drains
    let (entries, last_seq) = {
        let feed = FEED.lock().await;
        let entries: Vec<StatusEvent, FEED_HISTORY> =
            feed.entries_after(after_seq).copied().collect();
        (entries, feed.last_seq())
    };

    for event in &entries {
        send(tx, &ControllerMessage::Log(log_entry(event))).await;
    }
    send(tx, &ControllerMessage::LogEnd { last_seq }).await;
    trace!("Sent {} log entries", entries.len());
}

async fn send(tx: &mut BufferedUartTx, message: &ControllerMessage) {
    let frame = match message.to_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("Failed to encode viewer message: {:?}", e);
            return;
        }
    };

    let mut buf = [0u8; MAX_FRAME_SIZE];
    if let Ok(len) = frame.encode(&mut buf) {
        if let Err(e) = tx.write_all(&buf[..len]).await {
            warn!("Failed to send viewer frame: {:?}", e);
        }
    }
}
