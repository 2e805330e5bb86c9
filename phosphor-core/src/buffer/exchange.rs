//! Lock-free frame exchange
//!
//! Three point buffers rotate between the producer (frame builder) and
//! the refresh consumer:
//!
//! ```text
//!   producer ──fill──▶ [back]
//!                        │ publish (one atomic swap)
//!                        ▼
//!                     [middle]  ◀── FRESH bit set while unclaimed
//!                        │ acquire (one atomic swap)
//!                        ▼
//!   consumer ◀─stream── [front]
//! ```
//!
//! The only shared state is the `middle` byte: a slot index plus a FRESH
//! bit. Publishing swaps the finished back buffer in as the new middle;
//! acquiring swaps the consumer's front buffer out for it. Neither side
//! ever waits, and neither side can hold a slot the other is writing.
//! On single-core targets without compare-and-swap, `portable-atomic`
//! runs the swap in a critical section lasting only that instruction
//! sequence.

#![allow(unsafe_code)]

use core::cell::UnsafeCell;

use portable_atomic::{AtomicU8, Ordering};

use super::PointBuffer;

const INDEX_MASK: u8 = 0b0000_0011;
const FRESH: u8 = 0b0000_0100;

/// Triple-buffered frame storage shared by one producer and one consumer
pub struct FrameExchange<const N: usize> {
    slots: [UnsafeCell<PointBuffer<N>>; 3],
    middle: AtomicU8,
}

// SAFETY: the slots are only reached through `FrameProducer` and
// `FrameConsumer`, which can each exist once per exclusive `split` and
// own disjoint slot indices at all times. Index ownership moves only
// through atomic swaps on `middle` with acquire/release ordering, so a
// slot's writes happen-before the other side reads it.
unsafe impl<const N: usize> Sync for FrameExchange<N> {}

impl<const N: usize> Default for FrameExchange<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameExchange<N> {
    /// Create an exchange with three empty buffers
    pub const fn new() -> Self {
        Self {
            slots: [
                UnsafeCell::new(PointBuffer::new()),
                UnsafeCell::new(PointBuffer::new()),
                UnsafeCell::new(PointBuffer::new()),
            ],
            middle: AtomicU8::new(1),
        }
    }

    /// Hand out the producer and consumer halves
    ///
    /// Taking `&mut self` guarantees only one pair is ever live.
    pub fn split(&mut self) -> (FrameProducer<'_, N>, FrameConsumer<'_, N>) {
        for slot in self.slots.iter_mut() {
            slot.get_mut().reset();
        }
        self.middle.store(1, Ordering::Relaxed);
        let shared: &Self = self;
        (
            FrameProducer {
                exchange: shared,
                back: 0,
            },
            FrameConsumer {
                exchange: shared,
                front: 2,
            },
        )
    }
}

/// Producer half: owns the back buffer
pub struct FrameProducer<'a, const N: usize> {
    exchange: &'a FrameExchange<N>,
    back: u8,
}

impl<'a, const N: usize> FrameProducer<'a, N> {
    /// The buffer currently being filled
    pub fn buffer(&mut self) -> &mut PointBuffer<N> {
        // SAFETY: `back` is owned exclusively by this producer (see the
        // `Sync` impl); `&mut self` prevents aliasing through the handle.
        unsafe { &mut *self.exchange.slots[self.back as usize].get() }
    }

    /// Read-only view of the buffer being filled
    pub fn peek(&self) -> &PointBuffer<N> {
        // SAFETY: as for `buffer`, the consumer never touches `back`.
        unsafe { &*self.exchange.slots[self.back as usize].get() }
    }

    /// Publish the back buffer as the newest complete frame
    ///
    /// Takes over whatever slot was in the middle. That slot is either
    /// an unclaimed older frame or one the consumer has released, so the
    /// producer may overwrite it immediately.
    pub fn publish(&mut self) {
        let previous = self
            .exchange
            .middle
            .swap(self.back | FRESH, Ordering::AcqRel);
        self.back = previous & INDEX_MASK;
    }
}

/// Consumer half: owns the front buffer
pub struct FrameConsumer<'a, const N: usize> {
    exchange: &'a FrameExchange<N>,
    front: u8,
}

impl<'a, const N: usize> FrameConsumer<'a, N> {
    /// Claim the newest published frame if there is one
    ///
    /// Returns `false` (and keeps the current front) when nothing new was
    /// published since the last acquire.
    pub fn acquire(&mut self) -> bool {
        if self.exchange.middle.load(Ordering::Acquire) & FRESH == 0 {
            return false;
        }
        let previous = self.exchange.middle.swap(self.front, Ordering::AcqRel);
        self.front = previous & INDEX_MASK;
        true
    }

    /// The frame currently being displayed
    pub fn front(&self) -> &PointBuffer<N> {
        // SAFETY: `front` is owned exclusively by this consumer.
        unsafe { &*self.exchange.slots[self.front as usize].get() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Sample;

    #[test]
    fn test_nothing_to_acquire_initially() {
        let mut exchange: FrameExchange<8> = FrameExchange::new();
        let (_producer, mut consumer) = exchange.split();
        assert!(!consumer.acquire());
        assert!(consumer.front().is_empty());
    }

    #[test]
    fn test_publish_then_acquire() {
        let mut exchange: FrameExchange<8> = FrameExchange::new();
        let (mut producer, mut consumer) = exchange.split();

        producer.buffer().push(Sample::new(1, 2)).unwrap();
        producer.buffer().push(Sample::new(3, 4)).unwrap();
        producer.publish();

        assert!(consumer.acquire());
        assert_eq!(consumer.front().len(), 2);
        assert_eq!(consumer.front().get(1), Some(Sample::new(3, 4)));

        // Re-streams the same frame until something new arrives
        assert!(!consumer.acquire());
        assert_eq!(consumer.front().len(), 2);
    }

    #[test]
    fn test_latest_frame_wins() {
        let mut exchange: FrameExchange<8> = FrameExchange::new();
        let (mut producer, mut consumer) = exchange.split();

        for n in 1..=3u16 {
            producer.buffer().reset();
            for i in 0..n {
                producer.buffer().push(Sample::new(i, n)).unwrap();
            }
            producer.publish();
        }

        assert!(consumer.acquire());
        assert_eq!(consumer.front().len(), 3);
        assert!(consumer.front().samples().all(|s| s.y == 3));
    }

    #[test]
    fn test_producer_never_gets_front_slot() {
        let mut exchange: FrameExchange<4> = FrameExchange::new();
        let (mut producer, mut consumer) = exchange.split();

        for _ in 0..10 {
            producer.publish();
            assert_ne!(producer.back, consumer.front);
            consumer.acquire();
            assert_ne!(producer.back, consumer.front);
        }
    }

    #[test]
    fn test_no_torn_frames_across_threads() {
        const FRAMES: u16 = 2000;
        let mut exchange: FrameExchange<64> = FrameExchange::new();
        let (mut producer, mut consumer) = exchange.split();

        std::thread::scope(|s| {
            s.spawn(move || {
                for frame in 1..=FRAMES {
                    let buf = producer.buffer();
                    buf.reset();
                    let len = (frame % 60) + 1;
                    for _ in 0..len {
                        buf.push(Sample::new(frame & 0x0FFF, len)).unwrap();
                    }
                    producer.publish();
                }
            });

            let mut last_seen = 0;
            while last_seen < FRAMES {
                if !consumer.acquire() {
                    std::thread::yield_now();
                    continue;
                }
                let front = consumer.front();
                let first = front.get(0).unwrap();
                assert_eq!(front.len(), first.y as usize);
                assert!(front.samples().all(|p| p == first));
                assert!(first.x > last_seen);
                last_seen = first.x;
            }
        });
    }
}
