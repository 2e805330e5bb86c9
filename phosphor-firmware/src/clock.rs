//! Monotonic clock backed by the embassy time driver

use embassy_time::Instant;
use phosphor_core::traits::Monotonic;

#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyClock;

impl Monotonic for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}
