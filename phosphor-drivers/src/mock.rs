//! Recording mocks shared by the backend tests
//!
//! Every mock appends to one shared log so tests can check the order of
//! blanking, DAC writes, streams and delays across devices.

use core::cell::RefCell;
use std::vec::Vec;

use phosphor_hal::{DacChannel, DualDac, OutputPin, WordStream};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// Pin level after a write
    Pin(bool),
    /// Words streamed in one call
    Stream(usize),
    /// DAC channel write
    Dac(DacChannel, u16),
    /// Delay in nanoseconds
    Delay(u32),
}

pub type Log = RefCell<Vec<Op>>;

pub struct MockPin<'l> {
    pub log: &'l Log,
    pub high: bool,
}

impl OutputPin for MockPin<'_> {
    fn set_high(&mut self) {
        self.high = true;
        self.log.borrow_mut().push(Op::Pin(true));
    }

    fn set_low(&mut self) {
        self.high = false;
        self.log.borrow_mut().push(Op::Pin(false));
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

pub struct MockStream<'l> {
    pub log: &'l Log,
    pub rate: u32,
    pub max_rate: u32,
    pub fail: bool,
}

impl WordStream for MockStream<'_> {
    type Error = ();

    async fn stream(&mut self, words: &[u32]) -> Result<(), ()> {
        self.log.borrow_mut().push(Op::Stream(words.len()));
        if self.fail {
            Err(())
        } else {
            Ok(())
        }
    }

    fn set_word_rate(&mut self, hz: u32) -> Option<u32> {
        if hz == 0 || hz > self.max_rate {
            return None;
        }
        self.rate = hz;
        Some(hz)
    }

    fn word_rate(&self) -> u32 {
        self.rate
    }
}

pub struct MockDac<'l> {
    pub log: &'l Log,
    pub fail: bool,
}

impl DualDac for MockDac<'_> {
    type Error = ();

    fn write(&mut self, channel: DacChannel, code: u16) -> Result<(), ()> {
        if self.fail {
            return Err(());
        }
        self.log.borrow_mut().push(Op::Dac(channel, code));
        Ok(())
    }
}

pub struct MockDelay<'l> {
    pub log: &'l Log,
}

impl embedded_hal::delay::DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Op::Delay(ns));
    }
}

impl embedded_hal_async::delay::DelayNs for MockDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Op::Delay(ns));
    }
}
