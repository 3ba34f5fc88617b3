//! Configuration types
//!
//! Board-agnostic machine configuration and the TOML-subset parser that
//! reads it from `machine.toml`.

pub mod toml;
pub mod types;

pub use types::*;
