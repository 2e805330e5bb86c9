//! Time source for the refresh consumer

/// Monotonic microsecond clock
pub trait Monotonic {
    /// Microseconds since an arbitrary fixed epoch
    fn now_us(&self) -> u64;
}
