//! Embassy tasks
//!
//! `control_task` runs alone on core 1. Everything else shares core 0.

pub mod control;
pub mod shutdown;
pub mod status;
pub mod viewer_rx;
pub mod viewer_tx;

pub use control::control_task;
pub use shutdown::shutdown_task;
pub use status::status_task;
pub use viewer_rx::viewer_rx_task;
pub use viewer_tx::viewer_tx_task;
