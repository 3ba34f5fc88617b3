//! Board description
//!
//! A `Board` names the concrete driver types of one hardware build so the
//! controller can be written once against the traits.

use almonry_hal::{Clock, InputPin};

use crate::traits::{BeltDrive, CoilDriver, LockActuator, RangeSensor, StatusIndicator};

/// Driver types making up one intake
pub trait Board {
    type Clock: Clock + Clone;
    type Trigger: InputPin;
    type Motion: InputPin;
    type Range: RangeSensor;
    type Lock: LockActuator;
    type Coils: CoilDriver;
    type Belt: BeltDrive;
    type Indicator: StatusIndicator;
}

/// Every device the controller owns
pub struct Peripherals<B: Board> {
    pub clock: B::Clock,
    /// Donate button
    pub trigger: B::Trigger,
    /// PIR output
    pub motion: B::Motion,
    pub range_a: B::Range,
    pub range_b: B::Range,
    pub lock: B::Lock,
    pub door_a: B::Coils,
    pub door_b: B::Coils,
    pub belt: B::Belt,
    pub indicator: B::Indicator,
}
