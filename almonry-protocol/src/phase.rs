//! Controller phase as carried on the wire

use serde::{Deserialize, Serialize};

/// Phase of the donation cycle controller
///
/// Mirrors the controller's state machine so a viewer can show coarse
/// progress even if it has missed log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PhaseCode {
    /// Waiting for the donate button
    #[default]
    Idle,
    /// Button pressed, measuring the chute
    Triggered,
    /// Object present, watching for a hand in the mechanism
    Evaluating,
    /// Motion detected, cycle refused
    Aborting,
    /// Doors and belt cycling
    Admitting,
    /// Actuators forced safe, controller stopped
    Stopped,
}

// Wire format values
const PHASE_IDLE: u8 = 0x00;
const PHASE_TRIGGERED: u8 = 0x01;
const PHASE_EVALUATING: u8 = 0x02;
const PHASE_ABORTING: u8 = 0x03;
const PHASE_ADMITTING: u8 = 0x04;
const PHASE_STOPPED: u8 = 0x0F;

impl PhaseCode {
    /// Parse a phase from its wire format byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            PHASE_IDLE => Some(PhaseCode::Idle),
            PHASE_TRIGGERED => Some(PhaseCode::Triggered),
            PHASE_EVALUATING => Some(PhaseCode::Evaluating),
            PHASE_ABORTING => Some(PhaseCode::Aborting),
            PHASE_ADMITTING => Some(PhaseCode::Admitting),
            PHASE_STOPPED => Some(PhaseCode::Stopped),
            _ => None,
        }
    }

    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            PhaseCode::Idle => PHASE_IDLE,
            PhaseCode::Triggered => PHASE_TRIGGERED,
            PhaseCode::Evaluating => PHASE_EVALUATING,
            PhaseCode::Aborting => PHASE_ABORTING,
            PhaseCode::Admitting => PHASE_ADMITTING,
            PhaseCode::Stopped => PHASE_STOPPED,
        }
    }
}
