//! Continuous-streaming backend
//!
//! A frame goes out as:
//!
//! ```text
//!   blank ─ first word ─ front porch ─ unblank ─ rest of frame ─ back porch ─ blank
//! ```
//!
//! The first word parks the beam on the frame's start point while it is
//! still dark, so the retrace from the previous frame's end never shows.
//! Porches are counted in word clock periods, so they scale with the
//! clock rate.

use embedded_hal_async::delay::DelayNs;
use phosphor_core::error::OutputError;
use phosphor_core::refresh::FrameTiming;
use phosphor_core::traits::OutputBackend;
use phosphor_hal::{OutputPin, WordStream};

use super::NS_PER_S;
use crate::blank::BlankLine;

/// Porch and compute settings for the streaming backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StreamingConfig {
    /// Word periods between parking the beam and unblanking
    pub front_porch: u16,
    /// Word periods between the last word and blanking
    pub back_porch: u16,
    /// Compute time reserved after every refresh
    pub min_compute_us: u32,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            front_porch: 100,
            back_porch: 100,
            min_compute_us: 2000,
        }
    }
}

impl From<&phosphor_core::config::ScopeConfig> for StreamingConfig {
    fn from(config: &phosphor_core::config::ScopeConfig) -> Self {
        Self {
            front_porch: config.front_porch,
            back_porch: config.back_porch,
            min_compute_us: config.min_compute_us,
        }
    }
}

pub struct StreamingOutput<W, P, D> {
    stream: W,
    blank: BlankLine<P>,
    delay: D,
    config: StreamingConfig,
}

impl<W, P, D> StreamingOutput<W, P, D>
where
    W: WordStream,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(stream: W, blank: BlankLine<P>, delay: D, config: StreamingConfig) -> Self {
        Self {
            stream,
            blank,
            delay,
            config,
        }
    }

    pub fn config(&self) -> StreamingConfig {
        self.config
    }

    fn porch_ns(&self, periods: u16) -> u32 {
        (periods as u32).saturating_mul(self.clock_period_ns())
    }

    async fn paint(&mut self, words: &[u32]) -> Result<(), OutputError> {
        let (first, rest) = match words.split_first() {
            Some((first, rest)) => (core::slice::from_ref(first), rest),
            None => return Ok(()),
        };

        self.stream.stream(first).await.map_err(|_| OutputError::Bus)?;
        self.delay.delay_ns(self.porch_ns(self.config.front_porch)).await;

        self.blank.set_blanked(false);
        let result = self.stream.stream(rest).await.map_err(|_| OutputError::Bus);
        self.delay.delay_ns(self.porch_ns(self.config.back_porch)).await;
        result
    }
}

impl<W, P, D> OutputBackend for StreamingOutput<W, P, D>
where
    W: WordStream,
    P: OutputPin,
    D: DelayNs,
{
    async fn transfer(&mut self, words: &[u32]) -> Result<(), OutputError> {
        self.blank.set_blanked(true);
        let result = self.paint(words).await;
        self.blank.set_blanked(true);
        result
    }

    fn set_blanked(&mut self, blanked: bool) {
        if blanked {
            self.blank.set_blanked(true);
        }
    }

    fn set_clock_rate(&mut self, hz: u32) -> Result<u32, OutputError> {
        self.stream.set_word_rate(hz).ok_or(OutputError::ClockOutOfRange)
    }

    fn clock_period_ns(&self) -> u32 {
        NS_PER_S / self.stream.word_rate().max(1)
    }

    fn timing(&self) -> FrameTiming {
        let porches = self.config.front_porch as u32 + self.config.back_porch as u32;
        let porch_us = (porches as u64 * self.clock_period_ns() as u64).div_ceil(1000) as u32;
        FrameTiming {
            per_point_ns: self.clock_period_ns(),
            overhead_us: porch_us.saturating_add(self.config.min_compute_us),
        }
    }
}
