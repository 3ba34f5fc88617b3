//! Hardware abstraction traits
//!
//! These traits define the interface between the cycle logic and the device
//! drivers. Pin-level I/O lives one layer further down, in `almonry-hal`.

pub mod actuator;
pub mod indicator;
pub mod sensor;
pub mod status;

pub use actuator::{BeltDrive, CoilDriver, LockActuator};
pub use indicator::{Lamp, StatusIndicator};
pub use sensor::RangeSensor;
pub use status::{StatusSink, StopRequest};
