//! Hardware abstraction traits
//!
//! These traits define the interface between the refresh scheduler and
//! hardware-specific implementations.

pub mod clock;
pub mod output;

pub use clock::Monotonic;
pub use output::OutputBackend;
