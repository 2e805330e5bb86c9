//! Circle and ellipse generators
//!
//! Two strategies produce visibly different traces for the same input
//! and are kept side by side:
//!
//! - [`Angular`] steps around the curve at a fixed angle chosen so that
//!   neighbouring samples sit roughly `density` codes apart. Spacing
//!   follows the graphics intensity.
//! - [`Midpoint`] walks the curve one code at a time with integer
//!   decision variables. Spacing is always one code and ignores density.
//!
//! Both emit offsets relative to the center and drop any sample whose
//! octant is not selected in the [`ArcMask`]. Radii are taken by
//! magnitude and capped at [`MAX_CURVE_RADIUS`].

use core::f32::consts::PI;

use super::arc::{octant_of, ArcMask};
use super::MAX_CURVE_RADIUS;
use crate::error::BufferError;

/// A way of turning a circle or ellipse into samples
pub trait CurveStrategy {
    /// Emit a circle of radius `r`
    fn circle<F>(&self, r: i32, arcs: ArcMask, density: u16, plot: F) -> Result<(), BufferError>
    where
        F: FnMut(i32, i32) -> Result<(), BufferError>;

    /// Emit an axis-aligned ellipse with radii `rx`, `ry`
    fn ellipse<F>(
        &self,
        rx: i32,
        ry: i32,
        arcs: ArcMask,
        density: u16,
        plot: F,
    ) -> Result<(), BufferError>
    where
        F: FnMut(i32, i32) -> Result<(), BufferError>;
}

/// Fixed angular step, density driven
#[derive(Debug, Clone, Copy, Default)]
pub struct Angular;

/// Integer midpoint walk, one code per step
#[derive(Debug, Clone, Copy, Default)]
pub struct Midpoint;

/// Fewest samples an angular curve is drawn with
const MIN_ANGULAR_STEPS: u32 = 8;

/// Steps for a perimeter at `density`, rounded up to a multiple of 8 so
/// the samples split evenly into octants
fn angular_steps(perimeter: f32, density: u16) -> u32 {
    let n = libm::ceilf(perimeter / density.max(1) as f32) as u32;
    let n = n.max(MIN_ANGULAR_STEPS);
    n.div_ceil(8) * 8
}

/// Magnitude of a radius, capped so generator arithmetic stays in range
fn radius(r: i32) -> i32 {
    r.unsigned_abs().min(MAX_CURVE_RADIUS as u32) as i32
}

/// Ramanujan's approximation of an ellipse perimeter
fn ellipse_perimeter(a: f32, b: f32) -> f32 {
    PI * (3.0 * (a + b) - libm::sqrtf((3.0 * a + b) * (a + 3.0 * b)))
}

fn plot_masked<F>(plot: &mut F, arcs: ArcMask, dx: i32, dy: i32) -> Result<(), BufferError>
where
    F: FnMut(i32, i32) -> Result<(), BufferError>,
{
    if arcs.has_octant(octant_of(dx, dy)) {
        plot(dx, dy)
    } else {
        Ok(())
    }
}

impl CurveStrategy for Angular {
    fn circle<F>(&self, r: i32, arcs: ArcMask, density: u16, mut plot: F) -> Result<(), BufferError>
    where
        F: FnMut(i32, i32) -> Result<(), BufferError>,
    {
        let r = radius(r);
        if r == 0 {
            return plot_masked(&mut plot, arcs, 0, 0);
        }

        // Only the first quadrant is computed; the other three are exact
        // quarter turns of it so the shape is symmetric to the code.
        let n = angular_steps(2.0 * PI * r as f32, density);
        let quarter = n / 4;
        let rf = r as f32;
        for q in 0..4 {
            for i in 0..quarter {
                let theta = 2.0 * PI * i as f32 / n as f32;
                let c = libm::roundf(rf * libm::cosf(theta)) as i32;
                let s = libm::roundf(rf * libm::sinf(theta)) as i32;
                let (dx, dy) = match q {
                    0 => (c, s),
                    1 => (-s, c),
                    2 => (-c, -s),
                    _ => (s, -c),
                };
                plot_masked(&mut plot, arcs, dx, dy)?;
            }
        }
        Ok(())
    }

    fn ellipse<F>(
        &self,
        rx: i32,
        ry: i32,
        arcs: ArcMask,
        density: u16,
        mut plot: F,
    ) -> Result<(), BufferError>
    where
        F: FnMut(i32, i32) -> Result<(), BufferError>,
    {
        let (rx, ry) = (radius(rx), radius(ry));
        if rx == 0 && ry == 0 {
            return plot_masked(&mut plot, arcs, 0, 0);
        }

        let (a, b) = (rx as f32, ry as f32);
        let n = angular_steps(ellipse_perimeter(a, b), density);
        for i in 0..n {
            let theta = 2.0 * PI * i as f32 / n as f32;
            let dx = libm::roundf(a * libm::cosf(theta)) as i32;
            let dy = libm::roundf(b * libm::sinf(theta)) as i32;
            plot_masked(&mut plot, arcs, dx, dy)?;
        }
        Ok(())
    }
}

/// Maps a first-octant midpoint sample `(x, y)` (with `x <= y`) into
/// octant `k`
fn reflect(k: u8, x: i32, y: i32) -> (i32, i32) {
    match k {
        0 => (y, x),
        1 => (x, y),
        2 => (-x, y),
        3 => (-y, x),
        4 => (-y, -x),
        5 => (-x, -y),
        6 => (x, -y),
        _ => (y, -x),
    }
}

/// Walk the first quadrant of an ellipse from `(0, ry)` to `(rx, 0)`
///
/// Decision variables are kept at four times their textbook value so
/// the half-code terms stay integral.
fn quadrant<F>(rx: i32, ry: i32, mut emit: F) -> Result<(), BufferError>
where
    F: FnMut(i32, i32) -> Result<(), BufferError>,
{
    let rx2 = rx as i64 * rx as i64;
    let ry2 = ry as i64 * ry as i64;
    let (mut x, mut y) = (0i64, ry as i64);
    let mut dx = 0i64;
    let mut dy = 2 * rx2 * y;

    // Region 1: slope magnitude below 1, step in x
    let mut d1 = 4 * ry2 - 4 * rx2 * ry as i64 + rx2;
    while dx < dy {
        emit(x as i32, y as i32)?;
        x += 1;
        dx += 2 * ry2;
        if d1 < 0 {
            d1 += 4 * (dx + ry2);
        } else {
            y -= 1;
            dy -= 2 * rx2;
            d1 += 4 * (dx - dy + ry2);
        }
    }

    // Region 2: slope magnitude above 1, step in y
    let mut d2 = ry2 * (2 * x + 1) * (2 * x + 1) + 4 * rx2 * (y - 1) * (y - 1) - 4 * rx2 * ry2;
    while y > 0 {
        emit(x as i32, y as i32)?;
        y -= 1;
        dy -= 2 * rx2;
        if d2 > 0 {
            d2 += 4 * (rx2 - dy);
        } else {
            x += 1;
            dx += 2 * ry2;
            d2 += 4 * (dx - dy + rx2);
        }
    }

    // Thin ellipses leave region 2 short of the tip
    let mut x = x.min(rx as i64);
    while x <= rx as i64 {
        emit(x as i32, 0)?;
        x += 1;
    }
    Ok(())
}

impl CurveStrategy for Midpoint {
    fn circle<F>(&self, r: i32, arcs: ArcMask, _density: u16, mut plot: F) -> Result<(), BufferError>
    where
        F: FnMut(i32, i32) -> Result<(), BufferError>,
    {
        let r = radius(r);
        for k in 0..8u8 {
            if !arcs.has_octant(k) {
                continue;
            }
            let (mut x, mut y, mut d) = (0i32, r, 1 - r);
            while x <= y {
                let (px, py) = reflect(k, x, y);
                // Boundary samples are shared by two reflections; keep
                // each only in the octant that owns it.
                if octant_of(px, py) == k {
                    plot(px, py)?;
                }
                if d < 0 {
                    d += 2 * x + 3;
                } else {
                    d += 2 * (x - y) + 5;
                    y -= 1;
                }
                x += 1;
            }
        }
        Ok(())
    }

    fn ellipse<F>(
        &self,
        rx: i32,
        ry: i32,
        arcs: ArcMask,
        _density: u16,
        mut plot: F,
    ) -> Result<(), BufferError>
    where
        F: FnMut(i32, i32) -> Result<(), BufferError>,
    {
        let (rx, ry) = (radius(rx), radius(ry));
        for q in 0..4u8 {
            if !arcs.has_quadrant(q) {
                continue;
            }
            quadrant(rx, ry, |x, y| {
                // Axis samples belong to the quadrant that reaches them first
                if (q == 1 || q == 2) && x == 0 {
                    return Ok(());
                }
                if (q == 2 || q == 3) && y == 0 {
                    return Ok(());
                }
                let (dx, dy) = match q {
                    0 => (x, y),
                    1 => (-x, y),
                    2 => (-x, -y),
                    _ => (x, -y),
                };
                plot_masked(&mut plot, arcs, dx, dy)
            })?;
        }
        Ok(())
    }
}
