//! Error types shared across the core
//!
//! None of these unwind: the refresh consumer cannot tolerate it, so
//! every non-fatal condition is also mirrored in a flag or counter that
//! callers read at their leisure.

/// Point buffer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BufferError {
    /// Write would exceed the usable capacity; the sample was dropped
    Overflow,
}

/// Configuration errors
///
/// These are the only fatal errors: start-up halts when one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The selected output backend is not available on this board
    UnsupportedBackend,
    /// Refresh floor is zero
    InvalidRefreshFloor,
    /// Intensity outside 50-200%
    InvalidIntensity,
    /// Output clock rate is zero or beyond what the backend can pace
    InvalidClockRate,
    /// Buffer limit is zero
    InvalidBufferLimit,
    /// Pulse timing is inconsistent (large threshold below settle threshold)
    InvalidPulseTiming,
}

/// Output backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError {
    /// The backend has no such capability (e.g. clock tuning on the pulse backend)
    Unsupported,
    /// Requested clock rate is outside the backend's range
    ClockOutOfRange,
    /// The underlying bus or DMA reported a failure
    Bus,
}
