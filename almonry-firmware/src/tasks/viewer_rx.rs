//! Viewer UART receive task
//!
//! Parses frames from the status viewer and queues the requests. The viewer
//! can only ask; nothing it sends changes the controller.

use defmt::*;
use embassy_rp::uart::BufferedUartRx;
use embedded_io_async::Read;

use almonry_protocol::{FrameParser, ViewerRequest};

use crate::channels::VIEWER_REQUESTS;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

#[embassy_executor::task]
pub async fn viewer_rx_task(mut rx: BufferedUartRx) {
    info!("Viewer RX task started");

    let mut parser = FrameParser::new();
    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match parser.feed(byte) {
                        Ok(Some(frame)) => match ViewerRequest::from_frame(&frame) {
                            Ok(request) => {
                                if VIEWER_REQUESTS.try_send(request).is_err() {
                                    warn!("Viewer request queue full, dropping {:?}", request);
                                }
                            }
                            Err(e) => {
                                warn!("Rejected viewer message {:#x}: {:?}", frame.msg_type, e);
                            }
                        },
                        Ok(None) => {}
                        Err(e) => {
                            warn!("Frame parse error: {:?}", e);
                        }
                    }
                }
            }
            Ok(_) => {}
            Err(e) => {
                warn!("UART read error: {:?}", e);
            }
        }
    }
}
