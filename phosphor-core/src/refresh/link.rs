//! Shared refresh settings and counters
//!
//! Every field is an independent atomic. The producer writes settings
//! and requests, the consumer writes timing and statistics, and each
//! side reads the other's fields without locking.
//!
//! The auto-tuned period has a single writer: the consumer recomputes it
//! in [`RefreshLink::retune`]. Producer-side changes that affect it only
//! raise a request flag.

use portable_atomic::{AtomicBool, AtomicU32, Ordering};

use super::{auto_period_us, is_material_change, FrameTiming};

/// Marks a period that has never been tuned to a frame
const NEVER_TUNED: u32 = u32::MAX;

/// Snapshot of the consumer's performance counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RefreshStats {
    /// Duration of the last transfer
    pub paint_us: u32,
    /// Time between the starts of the last two transfers
    pub interval_us: u32,
    /// Samples in the last transfer
    pub points: u32,
    /// Transfers completed
    pub cycles: u32,
    /// Transfers that took longer than the refresh period
    pub overruns: u32,
    /// Transfers the backend reported as failed
    pub errors: u32,
}

pub struct RefreshLink {
    // Producer
    floor_us: AtomicU32,
    pinned_us: AtomicU32,
    manual: AtomicBool,
    armed_points: AtomicU32,
    retune_requested: AtomicBool,

    // Consumer
    per_point_ns: AtomicU32,
    overhead_us: AtomicU32,
    auto_us: AtomicU32,
    tuned_points: AtomicU32,

    saver_timeout_ms: AtomicU32,
    activity: AtomicBool,
    output_enabled: AtomicBool,
    filling: AtomicBool,
    clock_request_hz: AtomicU32,

    paint_us: AtomicU32,
    interval_us: AtomicU32,
    points: AtomicU32,
    cycles: AtomicU32,
    overruns: AtomicU32,
    errors: AtomicU32,
}

impl RefreshLink {
    /// Create a link in auto mode with the period at `floor_us`
    pub const fn new(floor_us: u32, saver_timeout_ms: u32) -> Self {
        let floor_us = if floor_us == 0 { 1 } else { floor_us };
        Self {
            floor_us: AtomicU32::new(floor_us),
            pinned_us: AtomicU32::new(floor_us),
            manual: AtomicBool::new(false),
            armed_points: AtomicU32::new(0),
            retune_requested: AtomicBool::new(false),
            per_point_ns: AtomicU32::new(0),
            overhead_us: AtomicU32::new(0),
            auto_us: AtomicU32::new(floor_us),
            tuned_points: AtomicU32::new(NEVER_TUNED),
            saver_timeout_ms: AtomicU32::new(saver_timeout_ms),
            activity: AtomicBool::new(false),
            output_enabled: AtomicBool::new(true),
            filling: AtomicBool::new(false),
            clock_request_hz: AtomicU32::new(0),
            paint_us: AtomicU32::new(0),
            interval_us: AtomicU32::new(0),
            points: AtomicU32::new(0),
            cycles: AtomicU32::new(0),
            overruns: AtomicU32::new(0),
            errors: AtomicU32::new(0),
        }
    }

    // --- Period ---

    /// Current refresh period, never below the floor
    pub fn period_us(&self) -> u32 {
        let period = if self.is_auto() {
            self.auto_us.load(Ordering::Relaxed)
        } else {
            self.pinned_us.load(Ordering::Relaxed)
        };
        period.max(self.floor_us())
    }

    pub fn floor_us(&self) -> u32 {
        self.floor_us.load(Ordering::Relaxed)
    }

    /// Change the floor; the active period is raised to it if needed
    pub fn set_floor_us(&self, floor_us: u32) {
        let floor_us = floor_us.max(1);
        self.floor_us.store(floor_us, Ordering::Relaxed);
        self.pinned_us.fetch_max(floor_us, Ordering::Relaxed);
        self.request_retune();
    }

    pub fn is_auto(&self) -> bool {
        !self.manual.load(Ordering::Relaxed)
    }

    /// Pin the period (clamped to the floor) and stop auto-tuning
    pub fn pin_period_us(&self, period_us: u32) {
        self.pinned_us
            .store(period_us.max(self.floor_us()), Ordering::Relaxed);
        self.manual.store(true, Ordering::Relaxed);
    }

    /// Return to auto-tuning; the consumer recomputes for the armed frame
    pub fn set_auto(&self) {
        self.manual.store(false, Ordering::Relaxed);
        self.request_retune();
    }

    fn request_retune(&self) {
        self.retune_requested.store(true, Ordering::Release);
    }

    /// Recompute the auto period for the armed frame (consumer only)
    ///
    /// Runs when a recompute was requested, on the first call, or when
    /// the armed point count changed materially since the last one.
    pub fn retune(&self) {
        let forced = self.retune_requested.swap(false, Ordering::Acquire);
        let points = self.armed_points.load(Ordering::Relaxed);
        let tuned = self.tuned_points.load(Ordering::Relaxed);
        if !forced && tuned != NEVER_TUNED && !is_material_change(tuned, points) {
            return;
        }
        let period = auto_period_us(points, self.timing(), self.floor_us());
        self.auto_us.store(period, Ordering::Relaxed);
        self.tuned_points.store(points, Ordering::Relaxed);
    }

    // --- Frame hand-off ---

    /// Record that a frame of `points` samples was published
    ///
    /// The consumer retunes for it at its next cycle.
    pub fn arm(&self, points: u32) {
        self.armed_points.store(points, Ordering::Relaxed);
        self.filling.store(false, Ordering::Relaxed);
    }

    /// Samples in the most recently published frame
    pub fn armed_points(&self) -> u32 {
        self.armed_points.load(Ordering::Relaxed)
    }

    pub fn set_filling(&self, filling: bool) {
        self.filling.store(filling, Ordering::Relaxed);
    }

    pub fn is_filling(&self) -> bool {
        self.filling.load(Ordering::Relaxed)
    }

    // --- Backend timing ---

    /// Publish the backend's cost model and recompute (consumer only)
    pub fn publish_timing(&self, timing: FrameTiming) {
        self.per_point_ns.store(timing.per_point_ns, Ordering::Relaxed);
        self.overhead_us.store(timing.overhead_us, Ordering::Relaxed);
        self.request_retune();
        self.retune();
    }

    pub fn timing(&self) -> FrameTiming {
        FrameTiming {
            per_point_ns: self.per_point_ns.load(Ordering::Relaxed),
            overhead_us: self.overhead_us.load(Ordering::Relaxed),
        }
    }

    /// Ask the consumer to retune the transfer clock at its next cycle
    pub fn request_clock_rate(&self, hz: u32) {
        self.clock_request_hz.store(hz, Ordering::Relaxed);
    }

    pub fn take_clock_request(&self) -> Option<u32> {
        match self.clock_request_hz.swap(0, Ordering::Relaxed) {
            0 => None,
            hz => Some(hz),
        }
    }

    // --- Output and screen saver ---

    pub fn set_output_enabled(&self, enabled: bool) {
        self.output_enabled.store(enabled, Ordering::Release);
    }

    pub fn output_enabled(&self) -> bool {
        self.output_enabled.load(Ordering::Acquire)
    }

    /// Screen saver timeout in milliseconds; zero disables the saver
    pub fn saver_timeout_ms(&self) -> u32 {
        self.saver_timeout_ms.load(Ordering::Relaxed)
    }

    pub fn set_saver_timeout_ms(&self, ms: u32) {
        self.saver_timeout_ms.store(ms, Ordering::Relaxed);
    }

    /// Note a buffer-mutating call (resets the saver)
    pub fn note_activity(&self) {
        self.activity.store(true, Ordering::Release);
    }

    pub fn take_activity(&self) -> bool {
        self.activity.swap(false, Ordering::Acquire)
    }

    // --- Statistics ---

    /// Record one completed transfer
    pub fn record_cycle(&self, paint_us: u32, interval_us: u32, points: u32, overrun: bool, failed: bool) {
        self.paint_us.store(paint_us, Ordering::Relaxed);
        self.interval_us.store(interval_us, Ordering::Relaxed);
        self.points.store(points, Ordering::Relaxed);
        self.cycles.fetch_add(1, Ordering::Relaxed);
        if overrun {
            self.overruns.fetch_add(1, Ordering::Relaxed);
        }
        if failed {
            self.errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn stats(&self) -> RefreshStats {
        RefreshStats {
            paint_us: self.paint_us.load(Ordering::Relaxed),
            interval_us: self.interval_us.load(Ordering::Relaxed),
            points: self.points.load(Ordering::Relaxed),
            cycles: self.cycles.load(Ordering::Relaxed),
            overruns: self.overruns.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::refresh::DEFAULT_FLOOR_US;

    const TIMING: FrameTiming = FrameTiming {
        per_point_ns: 2_500,
        overhead_us: 2_000,
    };

    fn link() -> RefreshLink {
        let link = RefreshLink::new(DEFAULT_FLOOR_US, 600_000);
        link.publish_timing(TIMING);
        link
    }

    #[test]
    fn test_starts_at_floor_in_auto() {
        let link = link();
        assert!(link.is_auto());
        assert_eq!(link.period_us(), DEFAULT_FLOOR_US);
    }

    /// Producer arms, consumer retunes at its next cycle
    fn arm_and_retune(link: &RefreshLink, points: u32) {
        link.arm(points);
        link.retune();
    }

    #[test]
    fn test_arm_recomputes_for_large_frames() {
        let link = link();
        arm_and_retune(&link, 20_000);
        assert_eq!(link.period_us(), 52_000);
        arm_and_retune(&link, 2);
        assert_eq!(link.period_us(), DEFAULT_FLOOR_US);
    }

    #[test]
    fn test_arm_alone_leaves_period() {
        let link = link();
        link.arm(20_000);
        assert_eq!(link.period_us(), DEFAULT_FLOOR_US);
        link.retune();
        assert_eq!(link.period_us(), 52_000);
    }

    #[test]
    fn test_small_change_keeps_period() {
        let link = link();
        arm_and_retune(&link, 20_000);
        arm_and_retune(&link, 20_100);
        assert_eq!(link.period_us(), 52_000);
        arm_and_retune(&link, 21_000);
        assert_eq!(link.period_us(), 54_500);
    }

    #[test]
    fn test_manual_pin_disables_auto() {
        let link = link();
        link.pin_period_us(40_000);
        assert!(!link.is_auto());
        arm_and_retune(&link, 40_000);
        assert_eq!(link.period_us(), 40_000);

        link.set_auto();
        link.retune();
        assert_eq!(link.period_us(), 102_000);
    }

    #[test]
    fn test_timing_change_after_arm_wins() {
        let link = link();
        link.arm(20_000);
        // Clock retuned to half speed before the consumer saw the frame
        link.publish_timing(FrameTiming {
            per_point_ns: 5_000,
            overhead_us: 2_000,
        });
        link.retune();
        assert_eq!(link.period_us(), 102_000);

        // A small follow-up frame keeps the period tuned to the new timing
        arm_and_retune(&link, 20_100);
        assert_eq!(link.period_us(), 102_000);
    }

    #[test]
    fn test_forced_retune_keeps_pinned_period() {
        let link = link();
        arm_and_retune(&link, 20_000);
        link.pin_period_us(30_000);
        link.publish_timing(FrameTiming {
            per_point_ns: 5_000,
            overhead_us: 2_000,
        });
        assert_eq!(link.period_us(), 30_000);
    }

    #[test]
    fn test_lowering_floor_retunes_auto() {
        let link = link();
        link.set_floor_us(60_000);
        arm_and_retune(&link, 20_000);
        assert_eq!(link.period_us(), 60_000);
        link.set_floor_us(1_000);
        link.retune();
        assert_eq!(link.period_us(), 52_000);
    }

    #[test]
    fn test_concurrent_arm_and_timing_settle() {
        let link = link();
        let slow = FrameTiming {
            per_point_ns: 5_000,
            overhead_us: 2_000,
        };
        std::thread::scope(|s| {
            s.spawn(|| {
                for points in (0..2_000u32).map(|i| 10_000 + i * 10) {
                    link.arm(points);
                }
            });
            s.spawn(|| {
                for i in 0..2_000u32 {
                    link.publish_timing(if i % 2 == 0 { TIMING } else { slow });
                    link.retune();
                }
                link.publish_timing(slow);
            });
        });
        link.retune();
        let points = link.armed_points();
        let tuned = link.tuned_points.load(Ordering::Relaxed);
        assert!(!is_material_change(tuned, points));
        assert_eq!(link.period_us(), auto_period_us(tuned, slow, DEFAULT_FLOOR_US));
    }

    #[test]
    fn test_pin_clamped_to_floor() {
        let link = link();
        link.pin_period_us(1_000);
        assert_eq!(link.period_us(), DEFAULT_FLOOR_US);
    }

    #[test]
    fn test_raising_floor_raises_period() {
        let link = link();
        link.pin_period_us(25_000);
        link.set_floor_us(30_000);
        assert_eq!(link.period_us(), 30_000);
    }

    #[test]
    fn test_zero_floor_is_bumped() {
        let link = RefreshLink::new(0, 0);
        assert_eq!(link.floor_us(), 1);
    }

    #[test]
    fn test_activity_is_consumed_once() {
        let link = link();
        assert!(!link.take_activity());
        link.note_activity();
        assert!(link.take_activity());
        assert!(!link.take_activity());
    }

    #[test]
    fn test_clock_request_is_consumed_once() {
        let link = link();
        assert_eq!(link.take_clock_request(), None);
        link.request_clock_rate(400_000);
        assert_eq!(link.take_clock_request(), Some(400_000));
        assert_eq!(link.take_clock_request(), None);
    }

    #[test]
    fn test_stats_accumulate() {
        let link = link();
        link.record_cycle(5_000, 20_000, 100, false, false);
        link.record_cycle(25_000, 20_000, 100, true, false);
        let stats = link.stats();
        assert_eq!(stats.cycles, 2);
        assert_eq!(stats.overruns, 1);
        assert_eq!(stats.paint_us, 25_000);
        assert_eq!(stats.errors, 0);
    }
}
