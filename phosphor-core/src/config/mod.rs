//! Configuration
//!
//! Start-up defaults for the display engine and its output backend, and a
//! small parser for the board's `scope.toml`.

pub mod toml;
pub mod types;

pub use self::toml::{parse_config, ParseError};
pub use types::*;
