//! Status lamp drivers

pub mod lamp;

pub use lamp::StackLamp;
