//! Text layout and rendering
//!
//! The cursor addresses the top-left corner of a text cell. Glyph grid
//! units are scaled so that one cell (16 units) is `size` codes tall, and
//! every advance is rounded to whole codes up front so a string's span
//! is exactly the sum of its advances.

use core::fmt::Write;

use heapless::String;

use super::{FontSource, Glyph, Stroke, ASCENT_UNITS, CELL_UNITS, FALLBACK_CHAR};
use crate::error::BufferError;
use crate::raster::{Angular, Canvas};

/// Gap after a glyph's ink under proportional spacing, in grid units
pub const PROPORTIONAL_GAP: u8 = 3;

/// Width of a blank underline cell under proportional spacing
pub const BLANK_CELL_UNITS: u8 = 10;

/// Grid units from the baseline down to the underline
pub const UNDERLINE_DROP: i32 = 2;

/// Largest number of decimal places `format_float` will print
pub const MAX_PLACES: u8 = 6;

/// Horizontal alignment relative to the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Justify {
    /// Text starts at the cursor
    #[default]
    Left,
    /// Text ends at the cursor
    Right,
    /// Text is centered on the cursor
    Center,
}

/// Character advance rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Spacing {
    /// Advance by the glyph's own width plus a small gap
    #[default]
    Proportional,
    /// Fixed pitch of 8 grid units
    Tight,
    /// Fixed pitch of 10 grid units
    Normal,
    /// Fixed pitch of 12 grid units
    Wide,
}

impl Spacing {
    /// Cell pitch in grid units, or `None` for proportional spacing
    pub fn pitch(self) -> Option<u8> {
        match self {
            Spacing::Proportional => None,
            Spacing::Tight => Some(8),
            Spacing::Normal => Some(10),
            Spacing::Wide => Some(12),
        }
    }
}

/// What to do with characters the font has no glyph for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GlyphPolicy {
    /// Leave them out entirely (no advance)
    #[default]
    Skip,
    /// Draw the fallback glyph instead
    Fallback,
}

/// Font plus the layout rules needed to place its glyphs
#[derive(Clone, Copy)]
pub struct Typesetter<'f> {
    pub font: &'f dyn FontSource,
    pub spacing: Spacing,
    pub policy: GlyphPolicy,
    /// Cell height in DAC codes
    pub size: u16,
}

impl<'f> Typesetter<'f> {
    pub fn new(font: &'f dyn FontSource, size: u16) -> Self {
        Self {
            font,
            spacing: Spacing::default(),
            policy: GlyphPolicy::default(),
            size,
        }
    }

    fn scale(&self) -> f32 {
        self.size as f32 / CELL_UNITS as f32
    }

    fn to_codes(&self, units: i32) -> i32 {
        libm::roundf(units as f32 * self.scale()) as i32
    }

    /// Glyph to draw for `c` under the unknown-glyph policy
    pub fn resolve(&self, c: char) -> Option<&'static Glyph> {
        match (self.font.glyph(c), self.policy) {
            (Some(glyph), _) => Some(glyph),
            (None, GlyphPolicy::Skip) => None,
            (None, GlyphPolicy::Fallback) => self.font.glyph(FALLBACK_CHAR),
        }
    }

    /// Advance of a glyph in codes
    pub fn advance(&self, glyph: &Glyph) -> i32 {
        let units = match self.spacing.pitch() {
            Some(pitch) => pitch,
            None => glyph.width + PROPORTIONAL_GAP,
        };
        self.to_codes(units as i32)
    }

    /// Width of one blank cell in codes (normal pitch when proportional)
    pub fn cell_advance(&self) -> i32 {
        let units = self.spacing.pitch().unwrap_or(BLANK_CELL_UNITS);
        self.to_codes(units as i32)
    }

    /// Offset of the glyph's ink within its cell, in grid units
    fn ink_offset(&self, glyph: &Glyph) -> f32 {
        match self.spacing.pitch() {
            Some(pitch) => (pitch as f32 - glyph.width as f32) / 2.0,
            None => 0.0,
        }
    }

    /// Total advance of `text` in codes, without drawing anything
    pub fn measure(&self, text: &str) -> i32 {
        text.chars()
            .filter_map(|c| self.resolve(c))
            .fold(0i32, |span, g| span.saturating_add(self.advance(g)))
    }

    /// Starting x for `text` so that it sits at `x` under `justify`
    pub fn start_x(&self, text: &str, x: i32, justify: Justify) -> i32 {
        match justify {
            Justify::Left => x,
            Justify::Right => x.saturating_sub(self.measure(text)),
            Justify::Center => x.saturating_sub(self.measure(text) / 2),
        }
    }

    /// Draw one glyph with its cell's top-left corner at `(x, top)`
    ///
    /// Returns the advance in codes.
    pub fn draw_glyph<const N: usize>(
        &self,
        canvas: &mut Canvas<'_, N>,
        glyph: &Glyph,
        x: i32,
        top: i32,
        density: u16,
        underline: bool,
    ) -> Result<i32, BufferError> {
        let scale = self.scale();
        let baseline = top.saturating_sub(self.to_codes(ASCENT_UNITS));
        let ink = self.ink_offset(glyph);
        let gx = |u: i8| x.saturating_add(libm::roundf((u as f32 + ink) * scale) as i32);
        let gy = |u: i8| baseline.saturating_add(libm::roundf(u as f32 * scale) as i32);
        let gr = |u: i8| libm::roundf(u as f32 * scale) as i32;

        let mut pen = (x, baseline);
        for stroke in glyph.strokes {
            match *stroke {
                Stroke::Move(u, v) => pen = (gx(u), gy(v)),
                Stroke::Line(u, v) => {
                    let to = (gx(u), gy(v));
                    canvas.line(pen.0, pen.1, to.0, to.1, density)?;
                    pen = to;
                }
                Stroke::Arc {
                    cx,
                    cy,
                    rx,
                    ry,
                    arcs,
                } => {
                    canvas.ellipse(&Angular, gx(cx), gy(cy), gr(rx), gr(ry), arcs, density)?;
                }
            }
        }

        let advance = self.advance(glyph);
        if underline {
            self.draw_underline(canvas, x, top, advance, density)?;
        }
        Ok(advance)
    }

    /// Underline segment `width` codes long under the cell at `(x, top)`
    pub fn draw_underline<const N: usize>(
        &self,
        canvas: &mut Canvas<'_, N>,
        x: i32,
        top: i32,
        width: i32,
        density: u16,
    ) -> Result<(), BufferError> {
        let y = top.saturating_sub(self.to_codes(ASCENT_UNITS + UNDERLINE_DROP));
        canvas.line(x, y, x.saturating_add(width), y, density)
    }

    /// Draw `text` with its first cell at `(x, top)`
    ///
    /// Returns the x just past the last advance. Stops at the first
    /// overflow, leaving the characters drawn so far in the buffer.
    pub fn draw_str<const N: usize>(
        &self,
        canvas: &mut Canvas<'_, N>,
        text: &str,
        x: i32,
        top: i32,
        density: u16,
        underline: bool,
    ) -> Result<i32, BufferError> {
        let mut pen_x = x;
        for c in text.chars() {
            if let Some(glyph) = self.resolve(c) {
                let advance = self.draw_glyph(canvas, glyph, pen_x, top, density, underline)?;
                pen_x = pen_x.saturating_add(advance);
            }
        }
        Ok(pen_x)
    }
}

/// Decimal text of an integer
pub fn format_int(value: i32) -> String<12> {
    let mut out = String::new();
    // 11 characters is the longest i32 rendering
    let _ = write!(out, "{}", value);
    out
}

/// Decimal text of a float rounded half away from zero to `places`
/// digits (at most six)
pub fn format_float(value: f32, places: u8) -> String<32> {
    let mut out = String::new();
    if value.is_nan() {
        let _ = out.push_str("nan");
        return out;
    }
    if value.is_infinite() {
        let _ = out.push_str(if value < 0.0 { "-inf" } else { "inf" });
        return out;
    }

    let places = places.min(MAX_PLACES);
    let factor = 10u64.pow(places as u32);
    let scaled = libm::round(value as f64 * factor as f64);
    let magnitude = libm::fabs(scaled) as u64;
    let whole = magnitude / factor;
    let frac = magnitude % factor;

    if scaled < 0.0 {
        let _ = out.push('-');
    }
    let _ = write!(out, "{}", whole);
    if places > 0 {
        let _ = write!(out, ".{:0width$}", frac, width = places as usize);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::PointBuffer;
    use crate::font::{ArcFont, LineFont};
    use crate::raster::CoordinatePolicy;
    use std::vec::Vec;

    fn points<const N: usize>(buf: &PointBuffer<N>) -> Vec<(i32, i32)> {
        buf.samples().map(|s| (s.x as i32, s.y as i32)).collect()
    }

    #[test]
    fn test_measure_proportional() {
        let ts = Typesetter::new(&LineFont, 16);
        // One code per grid unit at size 16
        assert_eq!(ts.measure("I"), 4 + PROPORTIONAL_GAP as i32);
        assert_eq!(ts.measure("AI"), 8 + 4 + 2 * PROPORTIONAL_GAP as i32);
    }

    #[test]
    fn test_measure_fixed_pitch() {
        let mut ts = Typesetter::new(&LineFont, 32);
        ts.spacing = Spacing::Wide;
        assert_eq!(ts.measure("IM"), 48);
        ts.spacing = Spacing::Tight;
        assert_eq!(ts.measure("IM"), 32);
    }

    #[test]
    fn test_unknown_glyph_policy() {
        let mut ts = Typesetter::new(&LineFont, 16);
        assert_eq!(ts.measure("\u{e9}"), 0);
        ts.policy = GlyphPolicy::Fallback;
        assert_eq!(ts.resolve('\u{e9}'), LineFont.glyph('~'));
        assert_eq!(ts.measure("\u{e9}"), ts.measure("~"));
    }

    #[test]
    fn test_space_draws_nothing() {
        let mut buf: PointBuffer<64> = PointBuffer::new();
        let ts = Typesetter::new(&LineFont, 50);
        let end = ts
            .draw_str(&mut Canvas::new(&mut buf, CoordinatePolicy::Skip), "  ", 100, 1000, 24, false)
            .unwrap();
        assert!(buf.is_empty());
        assert_eq!(end, 100 + 2 * ts.measure(" "));
    }

    #[test]
    fn test_pen_up_moves_leave_no_trace() {
        // '-' is one move then one line at mid height
        let mut buf: PointBuffer<64> = PointBuffer::new();
        let ts = Typesetter::new(&LineFont, 16);
        ts.draw_str(&mut Canvas::new(&mut buf, CoordinatePolicy::Skip), "-", 100, 1000, 4, false)
            .unwrap();
        let baseline = 1000 - 12;
        assert!(points(&buf).iter().all(|&(_, y)| y == baseline + 6));
        assert_eq!(points(&buf).first(), Some(&(100, baseline + 6)));
    }

    #[test]
    fn test_cell_advance() {
        let mut ts = Typesetter::new(&LineFont, 32);
        assert_eq!(ts.cell_advance(), 20);
        ts.spacing = Spacing::Tight;
        assert_eq!(ts.cell_advance(), 16);
    }

    #[test]
    fn test_underline_spans_advance() {
        let mut buf: PointBuffer<256> = PointBuffer::new();
        let ts = Typesetter::new(&LineFont, 16);
        let end = ts
            .draw_str(&mut Canvas::new(&mut buf, CoordinatePolicy::Skip), " ", 100, 1000, 4, true)
            .unwrap();
        let under = 1000 - 14;
        let pts = points(&buf);
        assert_eq!(pts.first(), Some(&(100, under)));
        assert_eq!(pts.last(), Some(&(end, under)));
    }

    #[test]
    fn test_justified_text_is_shifted_left_text() {
        for font in [&LineFont as &dyn FontSource, &ArcFont] {
            let ts = Typesetter::new(font, 48);
            let text = "SCOPE 42";
            let span = ts.measure(text);

            let render = |x: i32| {
                let mut buf: PointBuffer<2048> = PointBuffer::new();
                let end = ts
                    .draw_str(&mut Canvas::new(&mut buf, CoordinatePolicy::Skip), text, x, 3000, 24, false)
                    .unwrap();
                (points(&buf), end)
            };

            let (left, left_end) = render(1000);
            assert_eq!(left_end - 1000, span);

            let right_x = ts.start_x(text, 1000 + span, Justify::Right);
            assert_eq!(right_x, 1000);
            let (right, right_end) = render(right_x);
            assert_eq!(right, left);
            assert_eq!(right_end - right_x, span);

            let center_x = ts.start_x(text, 2000, Justify::Center);
            assert_eq!(center_x, 2000 - span / 2);
            let (center, _) = render(center_x);
            let shift = center_x - 1000;
            let moved: Vec<_> = left.iter().map(|&(x, y)| (x + shift, y)).collect();
            assert_eq!(center, moved);
        }
    }

    #[test]
    fn test_text_at_extreme_cursor_is_skipped() {
        let mut buf: PointBuffer<64> = PointBuffer::new();
        let ts = Typesetter::new(&LineFont, 1000);
        let mut canvas = Canvas::new(&mut buf, CoordinatePolicy::Skip);
        let end = ts.draw_str(&mut canvas, "WW", i32::MAX - 10, i32::MIN + 10, 24, true).unwrap();
        assert_eq!(end, i32::MAX);
        assert_eq!(ts.start_x("WW", i32::MIN + 10, Justify::Right), i32::MIN);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_format_int() {
        assert_eq!(format_int(0).as_str(), "0");
        assert_eq!(format_int(-1234).as_str(), "-1234");
        assert_eq!(format_int(i32::MIN).as_str(), "-2147483648");
    }

    #[test]
    fn test_format_float_rounds() {
        assert_eq!(format_float(3.14159, 2).as_str(), "3.14");
        assert_eq!(format_float(2.675, 1).as_str(), "2.7");
        assert_eq!(format_float(0.996, 2).as_str(), "1.00");
        assert_eq!(format_float(-0.5, 0).as_str(), "-1");
        assert_eq!(format_float(-0.004, 2).as_str(), "0.00");
        assert_eq!(format_float(12.0, 3).as_str(), "12.000");
        assert_eq!(format_float(1.5, 9).as_str(), "1.500000");
    }

    #[test]
    fn test_format_float_non_finite() {
        assert_eq!(format_float(f32::NAN, 2).as_str(), "nan");
        assert_eq!(format_float(f32::NEG_INFINITY, 2).as_str(), "-inf");
    }
}
