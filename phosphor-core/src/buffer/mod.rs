//! Point buffer
//!
//! A frame is an ordered list of samples held in a fixed-capacity buffer.
//! Each sample is stored as one 32-bit word laid out the way the streaming
//! backend shifts it out: the X half-word first, then the Y half-word,
//! each carrying its DAC channel routing tag in the top nibble.

mod exchange;

pub use exchange::{FrameConsumer, FrameExchange, FrameProducer};

use heapless::Vec;

use crate::error::BufferError;

/// Routing tag for the X half-word (DAC channel A, 1x gain, active)
pub const X_ROUTE: u16 = 0x3000;

/// Routing tag for the Y half-word (DAC channel B, 1x gain, active)
pub const Y_ROUTE: u16 = 0xB000;

/// Mask for the 12 data bits of a half-word
pub const DATA_MASK: u16 = 0x0FFF;

/// One beam position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sample {
    pub x: u16,
    pub y: u16,
}

impl Sample {
    /// Create a sample, truncating both coordinates to 12 bits
    pub const fn new(x: u16, y: u16) -> Self {
        Self {
            x: x & DATA_MASK,
            y: y & DATA_MASK,
        }
    }

    /// Pack into a routed word (X in the high half, Y in the low half)
    pub const fn to_word(self) -> u32 {
        (((X_ROUTE | self.x) as u32) << 16) | (Y_ROUTE | self.y) as u32
    }

    /// Unpack a routed word, discarding the routing tags
    pub const fn from_word(word: u32) -> Self {
        Self {
            x: (word >> 16) as u16 & DATA_MASK,
            y: word as u16 & DATA_MASK,
        }
    }
}

/// Fixed-capacity sample list for one frame
///
/// `N` is the compile-time capacity. A runtime `limit` (never above `N`)
/// is the usable bound; there is no slack past it. The first rejected
/// write sets a sticky overflow flag that only [`reset`](Self::reset)
/// clears.
#[derive(Debug, Clone)]
pub struct PointBuffer<const N: usize> {
    words: Vec<u32, N>,
    limit: usize,
    overflow: bool,
}

impl<const N: usize> Default for PointBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> PointBuffer<N> {
    /// Create an empty buffer using the full capacity
    pub const fn new() -> Self {
        Self {
            words: Vec::new(),
            limit: N,
            overflow: false,
        }
    }

    /// Erase the frame: cursor back to zero, overflow cleared
    ///
    /// Old words are not touched, only forgotten.
    pub fn reset(&mut self) {
        self.words.clear();
        self.overflow = false;
    }

    /// Append one sample
    ///
    /// On overflow the sample is dropped, the flag is set, and everything
    /// already written stays as it was.
    pub fn push(&mut self, sample: Sample) -> Result<(), BufferError> {
        if self.words.len() >= self.limit {
            self.overflow = true;
            return Err(BufferError::Overflow);
        }
        self.words.push(sample.to_word()).map_err(|_| {
            self.overflow = true;
            BufferError::Overflow
        })
    }

    /// Number of samples written
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Compile-time capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Usable capacity
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Lower (or restore) the usable capacity, clamped to `N`
    ///
    /// Shrinking below the current length truncates the frame and counts
    /// as an overflow.
    pub fn set_limit(&mut self, limit: usize) {
        self.limit = limit.min(N);
        if self.words.len() > self.limit {
            self.words.truncate(self.limit);
            self.overflow = true;
        }
    }

    /// True once any write has been rejected since the last reset
    pub fn overflowed(&self) -> bool {
        self.overflow
    }

    /// Routed words in draw order, ready for a streaming backend
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// Sample at `index`
    pub fn get(&self, index: usize) -> Option<Sample> {
        self.words.get(index).copied().map(Sample::from_word)
    }

    /// Iterate samples in draw order
    pub fn samples(&self) -> impl Iterator<Item = Sample> + '_ {
        self.words.iter().copied().map(Sample::from_word)
    }
}
