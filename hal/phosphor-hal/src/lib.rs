//! Phosphor Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the output backends are built
//! on. Chip-specific HALs implement them so the same drivers run on
//! any board that can move a pair of DAC outputs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (phosphor-firmware)        │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  phosphor-drivers (output backends)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  phosphor-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ phosphor-hal- │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (beam blanking, chip select)
//! - [`dac::DualDac`] - Two-channel DAC written one sample at a time
//! - [`stream::WordStream`] - Hardware-paced transfer of a whole frame

#![no_std]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

pub mod dac;
pub mod gpio;
pub mod stream;

// Re-export key traits at crate root for convenience
pub use dac::{DacChannel, DualDac};
pub use gpio::OutputPin;
pub use stream::WordStream;
