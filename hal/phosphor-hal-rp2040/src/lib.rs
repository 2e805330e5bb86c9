//! RP2040-specific HAL for the Phosphor vector display firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `phosphor-hal` traits:
//!
//! - GPIO outputs for beam blanking and chip selects
//! - PIO + DMA word stream that clocks packed samples into an MCP4922

#![no_std]

pub mod gpio;
pub mod pio;
pub mod stream;

pub use gpio::Pin;
pub use stream::PioDacStream;
