//! Hardware-paced word streams
//!
//! A word stream clocks a slice of packed sample words out to the DAC at
//! a fixed rate without CPU involvement (DMA feeding a PIO state machine
//! on the RP2040). Each word carries one complete X/Y sample.

/// Paced word output
pub trait WordStream {
    /// Error type for transfers
    type Error;

    /// Stream every word in `words`, completing when the last one has
    /// been shifted out
    ///
    /// The future is the completion notification: callers that need to
    /// do other work while the transfer runs simply await it from a
    /// dedicated task.
    async fn stream(&mut self, words: &[u32]) -> Result<(), Self::Error>;

    /// Set the word rate in Hz
    ///
    /// Returns the rate actually achieved after divider rounding, or
    /// `None` when the request is outside what the hardware can pace.
    fn set_word_rate(&mut self, hz: u32) -> Option<u32>;

    /// Current word rate in Hz
    fn word_rate(&self) -> u32;
}
