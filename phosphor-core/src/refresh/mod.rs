//! Refresh scheduler
//!
//! The producer and the refresh consumer run in different execution
//! contexts and share only a [`RefreshLink`] (timing settings and
//! counters in atomics) and a [`FrameExchange`](crate::buffer::FrameExchange).
//! The consumer side is driven by [`Refresher::cycle`].

mod link;
mod refresher;
mod saver;

pub use link::{RefreshLink, RefreshStats};
pub use refresher::Refresher;
pub use saver::ScreenSaver;

/// Hard minimum refresh period (20 ms)
pub const DEFAULT_FLOOR_US: u32 = 20_000;

/// Start-up screen saver timeout (10 minutes)
pub const DEFAULT_SAVER_TIMEOUT_S: u32 = 600;

/// Point-count change (in percent) that triggers an auto-period recompute
pub const MATERIAL_CHANGE_PERCENT: u32 = 2;

/// Per-frame cost model published by the output backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameTiming {
    /// Time to emit one sample, in nanoseconds
    pub per_point_ns: u32,
    /// Fixed cost per frame (blanking, porches, compute margin) in microseconds
    pub overhead_us: u32,
}

/// Proposed refresh period for a frame of `points` samples
///
/// `max(floor, points * per_point + overhead)`, saturating rather than
/// wrapping for absurd inputs.
pub fn auto_period_us(points: u32, timing: FrameTiming, floor_us: u32) -> u32 {
    let paint_ns = points as u64 * timing.per_point_ns as u64;
    let paint_us = paint_ns.div_ceil(1000);
    let total = paint_us.saturating_add(timing.overhead_us as u64);
    total.min(u32::MAX as u64).max(floor_us as u64) as u32
}

/// Whether a point count moved far enough from the last tuned count to
/// warrant recomputing the period
pub fn is_material_change(tuned: u32, points: u32) -> bool {
    let diff = tuned.abs_diff(points) as u64;
    diff * 100 > tuned.max(1) as u64 * MATERIAL_CHANGE_PERCENT as u64
}
