//! Arc and line stroke font
//!
//! Round letters and digits are drawn with elliptical arcs, which look
//! smoother on the scope at large sizes. Everything else comes from the
//! straight-line font.

use super::{arc, line_font, ln, mv, FontSource, Glyph};
use crate::raster::ArcMask;

pub struct ArcFont;

/// Right half (270-90° through 0°)
const RIGHT: ArcMask = ArcMask::from_bits_truncate(0b1100_0011);
/// Everything but the right-hand opening of a C
const OPEN_RIGHT: ArcMask = ArcMask::from_bits_truncate(0b0111_1110);
/// Top bowl of a 3: right half plus the top-left octant
const THREE_TOP: ArcMask = ArcMask::from_bits_truncate(0b1100_0111);
/// Bottom bowl of a 3 or S: right half plus the bottom-left octant
const THREE_BOTTOM: ArcMask = ArcMask::from_bits_truncate(0b1110_0011);
/// Top bowl of an S: left half plus the top-right octant
const S_TOP: ArcMask = ArcMask::from_bits_truncate(0b0011_1110);
/// Bowl of a 5: all but the upper-left side
const FIVE: ArcMask = ArcMask::from_bits_truncate(0b1110_0111);
const LEFT_EDGE: ArcMask = ArcMask::from_bits_truncate(0b0001_1000);
const RIGHT_EDGE: ArcMask = ArcMask::from_bits_truncate(0b1000_0001);

impl FontSource for ArcFont {
    fn glyph(&self, c: char) -> Option<&'static Glyph> {
        let c = c.to_ascii_uppercase();
        lookup(c).or_else(|| line_font::lookup(c))
    }

    fn name(&self) -> &'static str {
        "arc"
    }
}

#[rustfmt::skip]
fn lookup(c: char) -> Option<&'static Glyph> {
    let glyph: &'static Glyph = match c {
        '(' => glyph!(4, [arc(6, 6, 5, 7, LEFT_EDGE)]),
        ')' => glyph!(4, [arc(-2, 6, 5, 7, RIGHT_EDGE)]),
        '0' => glyph!(8, [arc(4, 6, 4, 6, ArcMask::ALL), mv(1, 2), ln(7, 10)]),
        '2' => glyph!(8, [arc(4, 8, 4, 4, ArcMask::UPPER), mv(8, 8), ln(0, 0), ln(8, 0)]),
        '3' => glyph!(8, [arc(4, 9, 4, 3, THREE_TOP), arc(4, 3, 4, 3, THREE_BOTTOM)]),
        '5' => glyph!(8, [mv(8, 12), ln(1, 12), ln(0, 7), arc(4, 4, 4, 4, FIVE)]),
        '6' => glyph!(8, [arc(4, 4, 4, 4, ArcMask::ALL), mv(0, 4), ln(6, 12)]),
        '8' => glyph!(8, [arc(4, 9, 3, 3, ArcMask::ALL), arc(4, 3, 4, 3, ArcMask::ALL)]),
        '9' => glyph!(8, [arc(4, 8, 4, 4, ArcMask::ALL), mv(8, 8), ln(2, 0)]),
        'B' => glyph!(8, [
            mv(0, 0), ln(0, 12), ln(5, 12), arc(5, 9, 3, 3, RIGHT), mv(0, 6), ln(5, 6),
            arc(5, 3, 3, 3, RIGHT), mv(5, 0), ln(0, 0),
        ]),
        'C' => glyph!(8, [arc(4, 6, 4, 6, OPEN_RIGHT)]),
        'D' => glyph!(8, [mv(2, 0), ln(0, 0), ln(0, 12), ln(2, 12), arc(2, 6, 6, 6, RIGHT)]),
        'G' => glyph!(8, [arc(4, 6, 4, 6, OPEN_RIGHT), mv(8, 1), ln(8, 5), ln(5, 5)]),
        'J' => glyph!(8, [mv(8, 12), ln(8, 4), arc(4, 4, 4, 4, ArcMask::LOWER)]),
        'O' => glyph!(8, [arc(4, 6, 4, 6, ArcMask::ALL)]),
        'P' => glyph!(8, [mv(0, 0), ln(0, 12), ln(5, 12), arc(5, 9, 3, 3, RIGHT), mv(5, 6), ln(0, 6)]),
        'Q' => glyph!(8, [arc(4, 6, 4, 6, ArcMask::ALL), mv(5, 3), ln(8, 0)]),
        'R' => glyph!(8, [
            mv(0, 0), ln(0, 12), ln(5, 12), arc(5, 9, 3, 3, RIGHT), mv(5, 6), ln(0, 6),
            mv(5, 6), ln(8, 0),
        ]),
        'S' => glyph!(8, [arc(4, 9, 4, 3, S_TOP), arc(4, 3, 4, 3, THREE_BOTTOM)]),
        'U' => glyph!(8, [mv(0, 12), ln(0, 4), arc(4, 4, 4, 4, ArcMask::LOWER), mv(8, 4), ln(8, 12)]),
        _ => return None,
    };
    Some(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{LineFont, Stroke};

    #[test]
    fn test_round_letters_use_arcs() {
        for c in ['O', 'C', 'S', '0', '8'] {
            let g = ArcFont.glyph(c).unwrap();
            assert!(g.strokes.iter().any(|s| matches!(s, Stroke::Arc { .. })), "{c:?}");
        }
    }

    #[test]
    fn test_falls_back_to_line_glyphs() {
        assert_eq!(ArcFont.glyph('K'), LineFont.glyph('K'));
        assert_eq!(ArcFont.glyph('k'), LineFont.glyph('K'));
        assert!(ArcFont.glyph('\u{2603}').is_none());
    }

    #[test]
    fn test_covers_printable_ascii() {
        for c in ' '..='~' {
            assert!(ArcFont.glyph(c).is_some(), "missing {c:?}");
        }
    }
}
