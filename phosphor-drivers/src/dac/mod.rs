//! DAC drivers

pub mod mcp4922;

pub use mcp4922::{DacError, Mcp4922};
