//! Stroke fonts
//!
//! Glyphs are described on a grid 16 units high: the baseline is at
//! y = 0, capitals reach y = 12 and the four units below the baseline hold
//! underlines and descenders. Strokes are pen-up moves, pen-down lines,
//! and (in the arc font) elliptical arcs.

/// Build a `&'static Glyph` from a width and a stroke list
macro_rules! glyph {
    ($width:expr, [$($stroke:expr),* $(,)?]) => {{
        const GLYPH: Glyph = Glyph::new($width, &[$($stroke),*]);
        &GLYPH
    }};
}

pub mod arc_font;
pub mod line_font;
pub mod text;

pub use arc_font::ArcFont;
pub use line_font::LineFont;
pub use text::{GlyphPolicy, Justify, Spacing, Typesetter};

use crate::raster::ArcMask;

/// Grid units from the bottom of a text cell to its top
pub const CELL_UNITS: i32 = 16;

/// Grid units from the top of a cell down to the baseline
pub const ASCENT_UNITS: i32 = 12;

/// Glyph drawn in place of unknown characters under [`GlyphPolicy::Fallback`]
pub const FALLBACK_CHAR: char = '~';

/// One pen instruction in glyph grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    /// Pen up: reposition without drawing
    Move(i8, i8),
    /// Pen down: straight line from the pen to this point
    Line(i8, i8),
    /// Elliptical arc; does not move the pen
    Arc {
        cx: i8,
        cy: i8,
        rx: i8,
        ry: i8,
        arcs: ArcMask,
    },
}

/// Shorthand for building glyph tables
pub(crate) const fn mv(x: i8, y: i8) -> Stroke {
    Stroke::Move(x, y)
}

pub(crate) const fn ln(x: i8, y: i8) -> Stroke {
    Stroke::Line(x, y)
}

pub(crate) const fn arc(cx: i8, cy: i8, rx: i8, ry: i8, arcs: ArcMask) -> Stroke {
    Stroke::Arc {
        cx,
        cy,
        rx,
        ry,
        arcs,
    }
}

/// A character's strokes and ink width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    /// Ink width in grid units
    pub width: u8,
    pub strokes: &'static [Stroke],
}

impl Glyph {
    pub const fn new(width: u8, strokes: &'static [Stroke]) -> Self {
        Self { width, strokes }
    }
}

/// A source of glyph outlines
pub trait FontSource: Sync {
    /// Outline for `c`, or `None` if the font has no such glyph
    fn glyph(&self, c: char) -> Option<&'static Glyph>;

    /// Short name for diagnostics
    fn name(&self) -> &'static str;
}

/// Which built-in font to start with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontKind {
    /// Straight lines only
    #[default]
    Line,
    /// Arcs for round letters, lines elsewhere
    Arc,
}

impl FontKind {
    pub fn source(self) -> &'static dyn FontSource {
        match self {
            FontKind::Line => &LineFont,
            FontKind::Arc => &ArcFont,
        }
    }
}
