//! Frame lifecycle state machine
//!
//! Tracks what the refresh consumer is doing with the displayed frame.
//! The state machine is explicit, finite, and deterministic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::State;
