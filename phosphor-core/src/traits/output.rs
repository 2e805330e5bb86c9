//! Display output backend trait
//!
//! The two implementations (continuous streaming and pulse sequencing)
//! live in the drivers crate. The scheduler only ever talks to this
//! trait and never branches on which one it has.

use crate::error::OutputError;
use crate::refresh::FrameTiming;

/// Something that can put a frame of routed sample words on the screen
pub trait OutputBackend {
    /// Display `words` once
    ///
    /// The beam is unblanked for the duration and blanked again before
    /// the future resolves; resolution is the completion notification.
    async fn transfer(&mut self, words: &[u32]) -> Result<(), OutputError>;

    /// Force the beam off (`true`) or release it to the next transfer
    fn set_blanked(&mut self, blanked: bool);

    /// Retune the transfer clock
    ///
    /// Returns the rate actually achieved. Backends without a transfer
    /// clock return [`OutputError::Unsupported`].
    fn set_clock_rate(&mut self, hz: u32) -> Result<u32, OutputError>;

    /// Period of one transfer clock tick in nanoseconds
    fn clock_period_ns(&self) -> u32;

    /// Period of one transfer clock tick in whole microseconds
    fn clock_period_us(&self) -> u32 {
        self.clock_period_ns() / 1000
    }

    /// Cost model for a frame on this backend
    fn timing(&self) -> FrameTiming;
}
