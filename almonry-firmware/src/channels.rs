//! Cross-task and cross-core shared state
//!
//! The control core only ever touches `SHARED_STATUS` (atomics),
//! `STATUS_CHANNEL` (`try_send`, never awaits) and `STOP` (load). Everything
//! else belongs to core 0.

use core::sync::atomic::AtomicBool;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;

use almonry_core::status::{SharedStatus, StatusEvent, StatusFeed};
use almonry_protocol::ViewerRequest;

/// Channel capacity for status events from the control loop
const STATUS_CHANNEL_SIZE: usize = 16;

/// Channel capacity for viewer requests
const REQUEST_CHANNEL_SIZE: usize = 4;

// FEED_HISTORY comes from `[status] history_len`
include!(concat!(env!("OUT_DIR"), "/config_consts.rs"));

/// Status events from the control loop to the observer
pub static STATUS_CHANNEL: Channel<CriticalSectionRawMutex, StatusEvent, STATUS_CHANNEL_SIZE> =
    Channel::new();

/// Donation total, phase and last event time, readable from either core
pub static SHARED_STATUS: SharedStatus = SharedStatus::new();

/// Set by the shutdown task; polled by the control loop
pub static STOP: AtomicBool = AtomicBool::new(false);

/// Observer-side history and donor-facing label
///
/// The status task applies the configured thank-you time at start-up.
pub static FEED: Mutex<CriticalSectionRawMutex, StatusFeed<FEED_HISTORY>> =
    Mutex::new(StatusFeed::new(5_000));

/// Parsed requests from the viewer link
pub static VIEWER_REQUESTS: Channel<CriticalSectionRawMutex, ViewerRequest, REQUEST_CHANNEL_SIZE> =
    Channel::new();
