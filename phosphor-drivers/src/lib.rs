//! Output backends and device drivers
//!
//! This crate implements the core's `OutputBackend` trait on top of the
//! `phosphor-hal` traits, plus the concrete parts they drive:
//!
//! - Beam blanking line with selectable polarity
//! - MCP4922 dual 12-bit SPI DAC
//! - Continuous-streaming backend (whole frame as one paced burst)
//! - Pulse-sequencing backend (per-sample settle and unblank timing)

#![no_std]
#![deny(unsafe_code)]

pub mod blank;
pub mod dac;
pub mod output;

pub use blank::BlankLine;
pub use dac::Mcp4922;
pub use output::{PulseOutput, StreamingConfig, StreamingOutput};

#[cfg(test)]
extern crate std;

#[cfg(test)]
pub(crate) mod mock;
