//! Message types for the status viewer protocol
//!
//! Message types are divided into two categories:
//! - Viewer → Controller: heartbeat and read-only queries
//! - Controller → Viewer: heartbeat responses, status reports, log entries
//!
//! Fixed-layout messages are hand-encoded. Status reports and log entries
//! carry text and are encoded with postcard.

use heapless::String;
use serde::{Deserialize, Serialize};

use crate::frame::{Frame, FrameError, MAX_PAYLOAD_SIZE};
use crate::phase::PhaseCode;

// Message type IDs: Viewer → Controller
pub const MSG_PING: u8 = 0x01;
pub const MSG_QUERY_STATUS: u8 = 0x02;
pub const MSG_QUERY_LOG: u8 = 0x03;

// Message type IDs: Controller → Viewer
pub const MSG_PONG: u8 = 0x81;
pub const MSG_STATUS: u8 = 0x82;
pub const MSG_LOG_ENTRY: u8 = 0x83;
pub const MSG_LOG_END: u8 = 0x84;

/// Maximum length of the headline and message labels
pub const MAX_LABEL_LEN: usize = 32;

/// Maximum length of a log entry's text
pub const MAX_LOG_TEXT_LEN: usize = 96;

/// Snapshot of what the viewer should display right now
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusReport {
    /// Controller phase at the time of the query
    pub phase: PhaseCode,
    /// Title line ("Processing your donation", "Thank you!", ...)
    pub headline: String<MAX_LABEL_LEN>,
    /// Current step for the donor ("Doors opening", ...)
    pub message: String<MAX_LABEL_LEN>,
    /// Donations counted since power-on
    pub donation_total: u32,
    /// Controller uptime (ms) of the most recent status event
    pub last_event_ms: u32,
    /// Sequence number of the most recent status event
    pub last_seq: u16,
}

/// One line of the controller's event log
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogEntry {
    /// Event sequence number (wrapping)
    pub seq: u16,
    /// Controller uptime (ms) when the event was created
    pub timestamp_ms: u32,
    /// Rendered event text
    pub text: String<MAX_LOG_TEXT_LEN>,
}

/// Requests from the viewer to the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ViewerRequest {
    /// Heartbeat request
    Ping,
    /// Ask for the current status snapshot
    QueryStatus,
    /// Ask for retained log entries newer than `after_seq`
    QueryLog { after_seq: u16 },
}

impl ViewerRequest {
    /// Parse a request from a frame
    ///
    /// Anything that is not one of the three read-only requests is rejected.
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_PING => Ok(ViewerRequest::Ping),
            MSG_QUERY_STATUS => Ok(ViewerRequest::QueryStatus),
            MSG_QUERY_LOG => {
                if frame.payload.len() < 2 {
                    return Err(FrameError::InvalidFrame);
                }
                let after_seq = u16::from_le_bytes([frame.payload[0], frame.payload[1]]);
                Ok(ViewerRequest::QueryLog { after_seq })
            }
            _ => Err(FrameError::InvalidFrame),
        }
    }

    /// Encode this request into a frame (viewer side, tests)
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ViewerRequest::Ping => Ok(Frame::empty(MSG_PING)),
            ViewerRequest::QueryStatus => Ok(Frame::empty(MSG_QUERY_STATUS)),
            ViewerRequest::QueryLog { after_seq } => {
                Frame::new(MSG_QUERY_LOG, &after_seq.to_le_bytes())
            }
        }
    }
}

/// Messages from the controller to the viewer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControllerMessage {
    /// Heartbeat response
    Pong,
    /// Current status snapshot
    Status(StatusReport),
    /// One retained log entry
    Log(LogEntry),
    /// End of a log listing; `last_seq` is the newest entry retained
    LogEnd { last_seq: u16 },
}

impl ControllerMessage {
    /// Encode this message into a frame
    pub fn to_frame(&self) -> Result<Frame, FrameError> {
        match self {
            ControllerMessage::Pong => Ok(Frame::empty(MSG_PONG)),
            ControllerMessage::Status(report) => encode_postcard(MSG_STATUS, report),
            ControllerMessage::Log(entry) => encode_postcard(MSG_LOG_ENTRY, entry),
            ControllerMessage::LogEnd { last_seq } => {
                Frame::new(MSG_LOG_END, &last_seq.to_le_bytes())
            }
        }
    }

    /// Parse a message from a frame (viewer side, tests)
    pub fn from_frame(frame: &Frame) -> Result<Self, FrameError> {
        match frame.msg_type {
            MSG_PONG => Ok(ControllerMessage::Pong),
            MSG_STATUS => postcard::from_bytes(&frame.payload)
                .map(ControllerMessage::Status)
                .map_err(|_| FrameError::InvalidPayload),
            MSG_LOG_ENTRY => postcard::from_bytes(&frame.payload)
                .map(ControllerMessage::Log)
                .map_err(|_| FrameError::InvalidPayload),
            MSG_LOG_END => {
                if frame.payload.len() < 2 {
                    return Err(FrameError::InvalidFrame);
                }
                let last_seq = u16::from_le_bytes([frame.payload[0], frame.payload[1]]);
                Ok(ControllerMessage::LogEnd { last_seq })
            }
            _ => Err(FrameError::InvalidFrame),
        }
    }
}

fn encode_postcard<T: Serialize>(msg_type: u8, value: &T) -> Result<Frame, FrameError> {
    let mut buf = [0u8; MAX_PAYLOAD_SIZE];
    let used = postcard::to_slice(value, &mut buf).map_err(|_| FrameError::PayloadTooLarge)?;
    Frame::new(msg_type, used)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(s: &str) -> String<MAX_LABEL_LEN> {
        String::try_from(s).unwrap()
    }

    #[test]
    fn test_viewer_query_log_encoding() {
        let frame = ViewerRequest::QueryLog { after_seq: 0x0102 }.to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_QUERY_LOG);
        assert_eq!(&frame.payload[..], &[0x02, 0x01]);
    }

    #[test]
    fn test_viewer_query_log_short_payload() {
        let frame = Frame::new(MSG_QUERY_LOG, &[0x02]).unwrap();
        assert_eq!(
            ViewerRequest::from_frame(&frame),
            Err(FrameError::InvalidFrame)
        );
    }

    #[test]
    fn test_viewer_cannot_send_controller_messages() {
        // A viewer echoing controller traffic back must not be understood
        for msg_type in [MSG_PONG, MSG_STATUS, MSG_LOG_ENTRY, MSG_LOG_END, 0x10, 0xFF] {
            let frame = Frame::empty(msg_type);
            assert_eq!(
                ViewerRequest::from_frame(&frame),
                Err(FrameError::InvalidFrame)
            );
        }
    }

    #[test]
    fn test_status_report_through_frame() {
        let report = StatusReport {
            phase: PhaseCode::Admitting,
            headline: label("Processing your donation"),
            message: label("Doors opening"),
            donation_total: 41,
            last_event_ms: 123_456,
            last_seq: 77,
        };

        let frame = ControllerMessage::Status(report.clone()).to_frame().unwrap();
        assert_eq!(frame.msg_type, MSG_STATUS);

        let parsed = ControllerMessage::from_frame(&frame).unwrap();
        assert_eq!(parsed, ControllerMessage::Status(report));
    }

    #[test]
    fn test_log_entry_fits_in_one_frame() {
        let mut text: String<MAX_LOG_TEXT_LEN> = String::new();
        while text.push('x').is_ok() {}

        let entry = LogEntry {
            seq: u16::MAX,
            timestamp_ms: u32::MAX,
            text,
        };
        let frame = ControllerMessage::Log(entry.clone()).to_frame().unwrap();
        assert!(frame.payload.len() <= MAX_PAYLOAD_SIZE);
        assert_eq!(
            ControllerMessage::from_frame(&frame).unwrap(),
            ControllerMessage::Log(entry)
        );
    }

    #[test]
    fn test_corrupt_status_payload() {
        let frame = Frame::new(MSG_STATUS, &[0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(
            ControllerMessage::from_frame(&frame),
            Err(FrameError::InvalidPayload)
        );
    }

    #[test]
    fn test_log_end() {
        let frame = ControllerMessage::LogEnd { last_seq: 9 }.to_frame().unwrap();
        assert_eq!(
            ControllerMessage::from_frame(&frame).unwrap(),
            ControllerMessage::LogEnd { last_seq: 9 }
        );
    }
}
