//! Display output backends
//!
//! Two structurally different ways to put a frame on the screen, both
//! behind `phosphor_core::traits::OutputBackend`:
//!
//! - [`StreamingOutput`]: the whole frame is handed to a paced word
//!   stream (DMA into PIO) with porch delays around an unblanked burst
//! - [`PulseOutput`]: software writes each sample to a DAC, waits for it
//!   to settle, then pulses the beam on

pub mod pulse;
pub mod streaming;

pub use pulse::PulseOutput;
pub use streaming::{StreamingConfig, StreamingOutput};

/// Nanoseconds per second
pub(crate) const NS_PER_S: u32 = 1_000_000_000;
