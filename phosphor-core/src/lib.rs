//! Board-agnostic core of the vector display firmware
//!
//! This crate contains everything between "draw a circle" and "stream
//! these words to the DAC" that does not depend on specific hardware:
//!
//! - Point buffer and the lock-free frame exchange between producer and
//!   refresh consumer
//! - Intensity to point-density model
//! - Rasterizer (points, lines, rectangles, circles, ellipses, arc masks)
//! - Stroke fonts and the text engine (spacing, justification, underline)
//! - Refresh scheduler (auto period, floor, manual pin, screen saver)
//! - State machine for the frame lifecycle
//! - Output backend trait and configuration types

#![no_std]
#![deny(unsafe_code)]
#![allow(async_fn_in_trait)]

#[cfg(test)]
extern crate std;

pub mod buffer;
pub mod config;
pub mod error;
pub mod font;
pub mod intensity;
pub mod raster;
pub mod refresh;
pub mod scope;
pub mod state;
pub mod traits;

pub use buffer::{FrameExchange, PointBuffer, Sample};
pub use error::{BufferError, ConfigError, OutputError};
pub use scope::Scope;

/// Crate version, reported at start-up
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Largest coordinate on either axis (12-bit DAC)
pub const COORD_MAX: u16 = 4095;
