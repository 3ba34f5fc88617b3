//! Status Viewer Communication Protocol
//!
//! This crate defines the UART protocol between the donation controller and
//! the external status viewer (lobby screen, kiosk tablet bridge, etc.).
//!
//! # Protocol Overview
//!
//! All messages use a simple binary frame format:
//! ```text
//! ┌───────┬────────┬──────┬─────────────┬──────────┐
//! │ START │ LENGTH │ TYPE │ PAYLOAD     │ CHECKSUM │
//! │ 1B    │ 1B     │ 1B   │ 0–250B      │ 1B       │
//! └───────┴────────┴──────┴─────────────┴──────────┘
//! ```
//!
//! The viewer is strictly read-only: it can ask for the current status and
//! the recent event log, never issue a command. Message types that would
//! influence the physical sequence do not exist on the wire.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod frame;
pub mod messages;
pub mod phase;

pub use frame::{Frame, FrameError, FrameParser, FRAME_START, MAX_FRAME_SIZE, MAX_PAYLOAD_SIZE};
pub use messages::{
    ControllerMessage, LogEntry, StatusReport, ViewerRequest, MAX_LABEL_LEN, MAX_LOG_TEXT_LEN,
};
pub use phase::PhaseCode;
