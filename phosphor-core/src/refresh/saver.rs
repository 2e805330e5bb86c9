//! Screen saver countdown
//!
//! Counts wall-clock time down from the timeout. Reaching zero blanks the
//! display without discarding the frame; any activity restarts it.

/// Countdown in microseconds with a millisecond-granular timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScreenSaver {
    timeout_ms: u32,
    remaining_us: u64,
}

impl ScreenSaver {
    /// Create a saver; a zero timeout disables it
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            timeout_ms,
            remaining_us: timeout_ms as u64 * 1000,
        }
    }

    pub fn timeout_ms(&self) -> u32 {
        self.timeout_ms
    }

    /// Change the timeout and restart the countdown
    pub fn set_timeout(&mut self, timeout_ms: u32) {
        *self = Self::new(timeout_ms);
    }

    /// Restart the countdown
    pub fn reset(&mut self) {
        self.remaining_us = self.timeout_ms as u64 * 1000;
    }

    pub fn is_enabled(&self) -> bool {
        self.timeout_ms != 0
    }

    /// Whether the countdown has run out
    pub fn is_expired(&self) -> bool {
        self.is_enabled() && self.remaining_us == 0
    }

    /// Milliseconds until the screen blanks (rounded up)
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_us.div_ceil(1000) as u32
    }

    /// Advance the countdown by `elapsed_us`
    ///
    /// Returns `true` only on the tick that reaches zero.
    pub fn tick(&mut self, elapsed_us: u64) -> bool {
        if !self.is_enabled() || self.remaining_us == 0 {
            return false;
        }
        self.remaining_us = self.remaining_us.saturating_sub(elapsed_us);
        self.remaining_us == 0
    }
}
