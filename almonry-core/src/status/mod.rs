//! Status reporting
//!
//! The controller emits `StatusEvent`s one way. `StatusFeed` is the
//! observer's view of them and `SharedStatus` is the small set of values
//! both sides may read.

pub mod event;
pub mod feed;
pub mod shared;

pub use event::{StatusEvent, StatusKind};
pub use feed::{log_entry, Label, StatusFeed, WELCOME_TITLE};
pub use shared::SharedStatus;
