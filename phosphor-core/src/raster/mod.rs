//! Rasterizer
//!
//! Converts drawing primitives into samples appended to a point buffer.
//! Coordinates are signed so shapes may extend past the screen; what
//! happens to off-screen samples is decided by one [`CoordinatePolicy`]
//! for the whole canvas.

pub mod arc;
pub mod curve;

pub use arc::{octant_of, ArcMask};
pub use curve::{Angular, CurveStrategy, Midpoint};

use crate::buffer::{PointBuffer, Sample};
use crate::error::BufferError;
use crate::COORD_MAX;

/// What to do with a coordinate outside 0-4095
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CoordinatePolicy {
    /// Drop the sample
    #[default]
    Skip,
    /// Keep the low 12 bits, folding the trace over at the screen edge
    Wrap,
}

/// Largest radius a circle or ellipse is drawn with
///
/// Sixteen screen widths. Larger curves are dropped whole, which keeps
/// every generator loop bounded.
pub const MAX_CURVE_RADIUS: i32 = 1 << 16;

/// A point buffer plus the coordinate policy applied to every write
pub struct Canvas<'a, const N: usize> {
    buffer: &'a mut PointBuffer<N>,
    policy: CoordinatePolicy,
    skipped: u32,
}

impl<'a, const N: usize> Canvas<'a, N> {
    pub fn new(buffer: &'a mut PointBuffer<N>, policy: CoordinatePolicy) -> Self {
        Self {
            buffer,
            policy,
            skipped: 0,
        }
    }

    /// Samples dropped by the skip policy so far, plus one per
    /// oversized curve
    pub fn skipped(&self) -> u32 {
        self.skipped
    }

    /// The underlying buffer
    pub fn buffer(&self) -> &PointBuffer<N> {
        self.buffer
    }

    fn skip(&mut self, count: u32) {
        self.skipped = self.skipped.saturating_add(count);
    }

    /// Append one sample at a widened coordinate
    fn plot(&mut self, x: i64, y: i64) -> Result<(), BufferError> {
        let max = COORD_MAX as i64;
        let in_range = (0..=max).contains(&x) && (0..=max).contains(&y);
        if !in_range && self.policy == CoordinatePolicy::Skip {
            self.skip(1);
            return Ok(());
        }
        // Sample::new keeps the low 12 bits
        self.buffer.push(Sample::new(x as u16, y as u16))
    }

    /// Append one sample
    pub fn point(&mut self, x: i32, y: i32) -> Result<(), BufferError> {
        self.plot(x as i64, y as i64)
    }

    /// Straight line at `density` codes between samples
    ///
    /// Both endpoints are always emitted, so a zero-length line still
    /// leaves a dot (as two coincident samples). Under the skip policy
    /// the line is first clipped to the screen; a line that misses it
    /// entirely counts its two endpoints as skipped.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, density: u16) -> Result<(), BufferError> {
        let (mut a, mut b) = ((x0 as i64, y0 as i64), (x1 as i64, y1 as i64));
        if self.policy == CoordinatePolicy::Skip {
            match clip(a, b) {
                Some((ca, cb)) => (a, b) = (ca, cb),
                None => {
                    self.skip(2);
                    return Ok(());
                }
            }
        }

        let dx = (b.0 - a.0) as f64;
        let dy = (b.1 - a.1) as f64;
        let length = libm::sqrt(dx * dx + dy * dy);
        // Under wrap a huge line stops at the buffer limit
        let steps = (libm::round(length / density.max(1) as f64) as i64).max(1);

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let x = a.0 + libm::round(dx * t) as i64;
            let y = a.1 + libm::round(dy * t) as i64;
            self.plot(x, y)?;
        }
        Ok(())
    }

    /// Axis-aligned rectangle from two opposite corners
    pub fn rectangle(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, density: u16) -> Result<(), BufferError> {
        self.line(x0, y0, x1, y0, density)?;
        self.line(x1, y0, x1, y1, density)?;
        self.line(x1, y1, x0, y1, density)?;
        self.line(x0, y1, x0, y0, density)
    }

    /// Circle (or arcs of one) centered on `(xc, yc)`
    pub fn circle<S: CurveStrategy>(
        &mut self,
        strategy: &S,
        xc: i32,
        yc: i32,
        r: i32,
        arcs: ArcMask,
        density: u16,
    ) -> Result<(), BufferError> {
        if r.unsigned_abs() > MAX_CURVE_RADIUS as u32 {
            self.skip(1);
            return Ok(());
        }
        let (xc, yc) = (xc as i64, yc as i64);
        strategy.circle(r, arcs, density, |dx, dy| self.plot(xc + dx as i64, yc + dy as i64))
    }

    /// Axis-aligned ellipse (or arcs of one) centered on `(xc, yc)`
    #[allow(clippy::too_many_arguments)]
    pub fn ellipse<S: CurveStrategy>(
        &mut self,
        strategy: &S,
        xc: i32,
        yc: i32,
        rx: i32,
        ry: i32,
        arcs: ArcMask,
        density: u16,
    ) -> Result<(), BufferError> {
        let limit = MAX_CURVE_RADIUS as u32;
        if rx.unsigned_abs() > limit || ry.unsigned_abs() > limit {
            self.skip(1);
            return Ok(());
        }
        let (xc, yc) = (xc as i64, yc as i64);
        strategy.ellipse(rx, ry, arcs, density, |dx, dy| self.plot(xc + dx as i64, yc + dy as i64))
    }
}

/// Clip a segment to the screen square (Liang-Barsky)
///
/// Endpoints already on screen come back unchanged; clipped ones are
/// rounded to the nearest code on the boundary.
fn clip(a: (i64, i64), b: (i64, i64)) -> Option<((i64, i64), (i64, i64))> {
    let max = COORD_MAX as f64;
    let (x0, y0) = (a.0 as f64, a.1 as f64);
    let (dx, dy) = ((b.0 - a.0) as f64, (b.1 - a.1) as f64);
    let (mut t0, mut t1) = (0.0f64, 1.0f64);

    for (p, q) in [(-dx, x0), (dx, max - x0), (-dy, y0), (dy, max - y0)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            t0 = t0.max(t);
        } else {
            t1 = t1.min(t);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| {
        if t == 0.0 {
            a
        } else if t == 1.0 {
            b
        } else {
            let x = libm::round(x0 + dx * t).clamp(0.0, max) as i64;
            let y = libm::round(y0 + dy * t).clamp(0.0, max) as i64;
            (x, y)
        }
    };
    Some((at(t0), at(t1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::vec::Vec;

    fn samples<const N: usize>(buf: &PointBuffer<N>) -> Vec<(u16, u16)> {
        buf.samples().map(|s| (s.x, s.y)).collect()
    }

    #[test]
    fn test_zero_length_line_emits_endpoint() {
        let mut buf: PointBuffer<16> = PointBuffer::new();
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Skip);
        canvas.line(100, 200, 100, 200, 24).unwrap();
        assert!(buf.len() >= 1);
        assert!(samples(&buf).iter().all(|&p| p == (100, 200)));
    }

    #[test]
    fn test_line_hits_both_endpoints() {
        let mut buf: PointBuffer<256> = PointBuffer::new();
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Skip);
        canvas.line(10, 20, 1000, 700, 24).unwrap();
        let pts = samples(&buf);
        assert_eq!(pts.first(), Some(&(10, 20)));
        assert_eq!(pts.last(), Some(&(1000, 700)));
    }

    #[test]
    fn test_doubling_intensity_doubles_points() {
        use crate::intensity::Intensity;

        let count = |pct: u16| {
            let mut buf: PointBuffer<1024> = PointBuffer::new();
            let density = Intensity::new(pct).density();
            Canvas::new(&mut buf, CoordinatePolicy::Skip)
                .line(0, 2000, 4000, 2000, density)
                .unwrap();
            buf.len() as f32
        };
        let ratio = count(200) / count(100);
        assert!((1.9..=2.1).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_skip_policy_drops_offscreen() {
        let mut buf: PointBuffer<16> = PointBuffer::new();
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Skip);
        canvas.point(-1, 10).unwrap();
        canvas.point(10, 4096).unwrap();
        canvas.point(4095, 0).unwrap();
        assert_eq!(canvas.skipped(), 2);
        assert_eq!(samples(&buf), [(4095, 0)]);
    }

    #[test]
    fn test_wrap_policy_truncates() {
        let mut buf: PointBuffer<16> = PointBuffer::new();
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Wrap);
        canvas.point(-1, 4096 + 5).unwrap();
        assert_eq!(canvas.skipped(), 0);
        assert_eq!(samples(&buf), [(4095, 5)]);
    }

    #[test]
    fn test_rectangle_closes() {
        let mut buf: PointBuffer<256> = PointBuffer::new();
        Canvas::new(&mut buf, CoordinatePolicy::Skip)
            .rectangle(100, 100, 300, 200, 50)
            .unwrap();
        let pts = samples(&buf);
        assert_eq!(pts.first(), Some(&(100, 100)));
        assert_eq!(pts.last(), Some(&(100, 100)));
        assert!(pts.contains(&(300, 200)));
    }

    #[test]
    fn test_overflow_truncates_shape() {
        let mut buf: PointBuffer<10> = PointBuffer::new();
        let result = Canvas::new(&mut buf, CoordinatePolicy::Skip).line(0, 0, 4000, 0, 24);
        assert_eq!(result, Err(BufferError::Overflow));
        assert_eq!(buf.len(), 10);
        assert!(buf.overflowed());
    }

    #[test]
    fn test_circle_is_centered() {
        let mut buf: PointBuffer<4096> = PointBuffer::new();
        Canvas::new(&mut buf, CoordinatePolicy::Skip)
            .circle(&Midpoint, 2048, 2048, 500, ArcMask::ALL, 24)
            .unwrap();
        for (x, y) in samples(&buf) {
            let (dx, dy) = (x as i32 - 2048, y as i32 - 2048);
            assert!((dx * dx + dy * dy - 250_000).abs() <= 500);
        }
    }

    #[test]
    fn test_ellipse_single_octant_on_canvas() {
        let mut buf: PointBuffer<4096> = PointBuffer::new();
        Canvas::new(&mut buf, CoordinatePolicy::Skip)
            .ellipse(&Midpoint, 2000, 2000, 800, 300, ArcMask::ARC3, 24)
            .unwrap();
        assert!(!buf.is_empty());
        for (x, y) in samples(&buf) {
            assert_eq!(octant_of(x as i32 - 2000, y as i32 - 2000), 3);
        }
    }

    #[test]
    fn test_extreme_line_is_clipped_to_screen() {
        let mut buf: PointBuffer<256> = PointBuffer::new();
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Skip);
        canvas.line(i32::MIN + 10, 0, i32::MAX - 10, 0, 24).unwrap();
        let pts = samples(&buf);
        assert_eq!(pts.first(), Some(&(0, 0)));
        assert_eq!(pts.last(), Some(&(4095, 0)));
        assert!(pts.iter().all(|&(_, y)| y == 0));
    }

    #[test]
    fn test_partly_offscreen_line_starts_at_edge() {
        let mut buf: PointBuffer<64> = PointBuffer::new();
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Skip);
        canvas.line(-100, 100, 100, 100, 10).unwrap();
        let pts = samples(&buf);
        assert_eq!(pts.first(), Some(&(0, 100)));
        assert_eq!(pts.last(), Some(&(100, 100)));
    }

    #[test]
    fn test_offscreen_line_emits_nothing() {
        let mut buf: PointBuffer<16> = PointBuffer::new();
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Skip);
        canvas.line(-5000, -5000, -100, -100, 24).unwrap();
        canvas.line(i32::MIN, i32::MAX, i32::MAX, i32::MAX, 1).unwrap();
        assert_eq!(canvas.skipped(), 4);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_extreme_wrapped_line_stops_at_limit() {
        let mut buf: PointBuffer<16> = PointBuffer::new();
        let result = Canvas::new(&mut buf, CoordinatePolicy::Wrap).line(i32::MIN, 0, i32::MAX, 0, 24);
        assert_eq!(result, Err(BufferError::Overflow));
        assert_eq!(buf.len(), 16);
    }

    #[test]
    fn test_extreme_curves_do_not_overflow() {
        let mut buf: PointBuffer<64> = PointBuffer::new();
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Skip);
        canvas
            .circle(&Midpoint, i32::MAX - 5, 0, 100, ArcMask::ALL, 24)
            .unwrap();
        canvas
            .ellipse(&Angular, i32::MIN + 5, i32::MIN + 5, 300, 100, ArcMask::ALL, 24)
            .unwrap();
        assert!(canvas.skipped() > 0);

        // Oversized curves are dropped whole
        let before = canvas.skipped();
        canvas.circle(&Midpoint, 2048, 2048, i32::MIN, ArcMask::ALL, 24).unwrap();
        canvas
            .ellipse(&Angular, 2048, 2048, 10, i32::MAX, ArcMask::ALL, 24)
            .unwrap();
        assert_eq!(canvas.skipped(), before + 2);
        assert!(buf.is_empty());
    }

    proptest! {
        #[test]
        fn test_line_shape_is_shift_invariant(
            x0 in 0i32..1000, y0 in 0i32..1000,
            x1 in 0i32..1000, y1 in 0i32..1000,
            shift in 0i32..1000,
        ) {
            let mut a: PointBuffer<512> = PointBuffer::new();
            let mut b: PointBuffer<512> = PointBuffer::new();
            Canvas::new(&mut a, CoordinatePolicy::Skip).line(x0, y0, x1, y1, 24).unwrap();
            Canvas::new(&mut b, CoordinatePolicy::Skip)
                .line(x0 + shift, y0 + shift, x1 + shift, y1 + shift, 24)
                .unwrap();
            prop_assert_eq!(a.len(), b.len());
            for (p, q) in a.samples().zip(b.samples()) {
                prop_assert_eq!(p.x as i32 + shift, q.x as i32);
                prop_assert_eq!(p.y as i32 + shift, q.y as i32);
            }
        }
    }
}
