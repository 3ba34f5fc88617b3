//! Observer-side status feed
//!
//! Keeps a bounded history of events and derives the short message a donor
//! sees. Only the observer touches a `StatusFeed`; the controller never
//! waits on it.

use core::fmt::Write;

use almonry_protocol::{LogEntry, PhaseCode, StatusReport, MAX_LABEL_LEN, MAX_LOG_TEXT_LEN};
use heapless::{Deque, String};

use super::event::{StatusEvent, StatusKind};

/// Title shown when nothing is in progress
pub const WELCOME_TITLE: &str = "Welcome to Goodwill";

/// Short donor-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Label {
    Welcome,
    SystemStarts,
    DonationDetected,
    DetectingMotion,
    NoMotionDetected,
    MotionDetected,
    DoorsOpening,
    BeltMoving,
    DoorsClosing,
    BeltStopped,
    SystemLocked,
    StaysLocked,
    NoDonation,
    ThankYou,
}

impl Label {
    /// Label for an event, or `None` if the event leaves the label alone
    ///
    /// Readings and running totals never replace what the donor is reading.
    pub fn for_event(kind: &StatusKind) -> Option<Self> {
        match kind {
            StatusKind::SystemReady { .. } => Some(Label::Welcome),
            StatusKind::CycleStarted => Some(Label::SystemStarts),
            StatusKind::ObjectDetected => Some(Label::DonationDetected),
            StatusKind::MotionCheckStarted { .. } => Some(Label::DetectingMotion),
            StatusKind::MotionClear => Some(Label::NoMotionDetected),
            StatusKind::MotionDetected => Some(Label::MotionDetected),
            StatusKind::DoorsOpening => Some(Label::DoorsOpening),
            StatusKind::BeltStarted => Some(Label::BeltMoving),
            StatusKind::DoorsClosing => Some(Label::DoorsClosing),
            StatusKind::BeltStopped => Some(Label::BeltStopped),
            StatusKind::LockEngaged => Some(Label::SystemLocked),
            StatusKind::Aborted { .. } => Some(Label::StaysLocked),
            StatusKind::NoObject { .. } => Some(Label::NoDonation),
            StatusKind::DonationCounted { .. } => Some(Label::ThankYou),
            StatusKind::Readings { .. }
            | StatusKind::MotionRising
            | StatusKind::MotionNoiseIgnored
            | StatusKind::LockReleased
            | StatusKind::ShutdownComplete => None,
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Label::Welcome => WELCOME_TITLE,
            Label::SystemStarts => "System starts!",
            Label::DonationDetected => "Donation detected",
            Label::DetectingMotion => "Detecting motion",
            Label::NoMotionDetected => "No motion detected",
            Label::MotionDetected => "Motion detected",
            Label::DoorsOpening => "Doors opening",
            Label::BeltMoving => "Conveyor belt moving",
            Label::DoorsClosing => "Doors closing",
            Label::BeltStopped => "Conveyor belt stopped",
            Label::SystemLocked => "System locked",
            Label::StaysLocked => "System stays locked",
            Label::NoDonation => "No donation detected",
            Label::ThankYou => "Thank you for your donation!",
        }
    }

    /// Title line shown above the label
    pub fn headline(&self) -> &'static str {
        match self {
            Label::ThankYou => "Thank you!",
            Label::DonationDetected
            | Label::DetectingMotion
            | Label::NoMotionDetected
            | Label::DoorsOpening
            | Label::BeltMoving
            | Label::DoorsClosing
            | Label::SystemLocked => "Processing your donation",
            _ => WELCOME_TITLE,
        }
    }
}

/// Bounded event history plus the derived donor-facing state
pub struct StatusFeed<const N: usize> {
    history: Deque<StatusEvent, N>,
    label: Label,
    donation_total: u32,
    thank_you_since_ms: Option<u32>,
    thank_you_ms: u32,
    last_seq: u16,
    last_event_ms: u32,
}

impl<const N: usize> StatusFeed<N> {
    /// Create an empty feed; the thank-you message lasts `thank_you_ms`
    pub const fn new(thank_you_ms: u32) -> Self {
        Self {
            history: Deque::new(),
            label: Label::Welcome,
            donation_total: 0,
            thank_you_since_ms: None,
            thank_you_ms,
            last_seq: 0,
            last_event_ms: 0,
        }
    }

    /// Change how long the thank-you message stays up
    pub fn set_thank_you_ms(&mut self, thank_you_ms: u32) {
        self.thank_you_ms = thank_you_ms;
    }

    /// Take in one event, dropping the oldest retained one if full
    pub fn record(&mut self, event: StatusEvent) {
        if self.history.is_full() {
            self.history.pop_front();
        }
        // Cannot fail: a slot was just freed
        let _ = self.history.push_back(event);

        self.last_seq = event.seq;
        self.last_event_ms = event.timestamp_ms;
        if let Some(total) = event.kind.donation_total() {
            self.donation_total = total;
        }
        if let Some(label) = Label::for_event(&event.kind) {
            self.label = label;
            self.thank_you_since_ms = match label {
                Label::ThankYou => Some(event.timestamp_ms),
                _ => None,
            };
        }
    }

    /// Label to show at `now_ms`
    ///
    /// The thank-you message reverts to the welcome message once it has been
    /// up for longer than `thank_you_ms`.
    pub fn label(&self, now_ms: u32) -> Label {
        match self.thank_you_since_ms {
            Some(since) if now_ms.wrapping_sub(since) > self.thank_you_ms => Label::Welcome,
            _ => self.label,
        }
    }

    /// Donation total as last reported by the controller
    pub fn donation_total(&self) -> u32 {
        self.donation_total
    }

    pub fn last_seq(&self) -> u16 {
        self.last_seq
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Retained events, oldest first
    pub fn history(&self) -> impl Iterator<Item = &StatusEvent> {
        self.history.iter()
    }

    /// Retained events issued after `seq`, oldest first
    pub fn entries_after(&self, seq: u16) -> impl Iterator<Item = &StatusEvent> {
        self.history.iter().filter(move |e| e.is_after(seq))
    }

    /// Status snapshot for the viewer
    ///
    /// `phase` and `donation_total` come from the shared status, which stays
    /// accurate even if events were dropped on the way here.
    pub fn snapshot(&self, now_ms: u32, phase: PhaseCode, donation_total: u32) -> StatusReport {
        let label = self.label(now_ms);
        StatusReport {
            phase,
            headline: truncated(label.headline()),
            message: truncated(label.text()),
            donation_total,
            last_event_ms: self.last_event_ms,
            last_seq: self.last_seq,
        }
    }
}

/// Render an event as a log line for the viewer
pub fn log_entry(event: &StatusEvent) -> LogEntry {
    let mut text: String<MAX_LOG_TEXT_LEN> = String::new();
    // Overlong text is cut off rather than dropped
    let _ = write!(text, "{}", event.kind);
    LogEntry {
        seq: event.seq,
        timestamp_ms: event.timestamp_ms,
        text,
    }
}

fn truncated(s: &str) -> String<MAX_LABEL_LEN> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
