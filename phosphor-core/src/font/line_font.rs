//! Straight-line stroke font
//!
//! Printable ASCII, capitals only: lowercase letters are drawn with the
//! capital glyph.

use super::{ln, mv, FontSource, Glyph};

pub struct LineFont;

impl FontSource for LineFont {
    fn glyph(&self, c: char) -> Option<&'static Glyph> {
        lookup(c.to_ascii_uppercase())
    }

    fn name(&self) -> &'static str {
        "line"
    }
}

#[rustfmt::skip]
pub(crate) fn lookup(c: char) -> Option<&'static Glyph> {
    let glyph: &'static Glyph = match c {
        ' ' => glyph!(6, []),
        '!' => glyph!(2, [mv(1, 12), ln(1, 4), mv(1, 1), ln(1, 0)]),
        '"' => glyph!(4, [mv(0, 12), ln(0, 9), mv(4, 12), ln(4, 9)]),
        '#' => glyph!(8, [mv(2, 0), ln(3, 12), mv(5, 0), ln(6, 12), mv(0, 4), ln(8, 4), mv(0, 8), ln(8, 8)]),
        '$' => glyph!(8, [
            mv(8, 10), ln(6, 12), ln(2, 12), ln(0, 10), ln(0, 8), ln(2, 6), ln(6, 6), ln(8, 4),
            ln(8, 2), ln(6, 0), ln(2, 0), ln(0, 2), mv(4, 13), ln(4, -1),
        ]),
        '%' => glyph!(8, [
            mv(0, 0), ln(8, 12), mv(0, 12), ln(2, 12), ln(2, 10), ln(0, 10), ln(0, 12),
            mv(6, 2), ln(8, 2), ln(8, 0), ln(6, 0), ln(6, 2),
        ]),
        '&' => glyph!(8, [
            mv(8, 0), ln(1, 9), ln(1, 11), ln(2, 12), ln(4, 12), ln(5, 11), ln(5, 9), ln(0, 4),
            ln(0, 1), ln(1, 0), ln(5, 0), ln(8, 4),
        ]),
        '\'' => glyph!(1, [mv(0, 12), ln(0, 9)]),
        '(' => glyph!(4, [mv(4, 13), ln(1, 10), ln(1, 2), ln(4, -1)]),
        ')' => glyph!(4, [mv(0, 13), ln(3, 10), ln(3, 2), ln(0, -1)]),
        '*' => glyph!(8, [mv(4, 10), ln(4, 2), mv(0, 8), ln(8, 4), mv(0, 4), ln(8, 8)]),
        '+' => glyph!(8, [mv(4, 10), ln(4, 2), mv(0, 6), ln(8, 6)]),
        ',' => glyph!(2, [mv(1, 1), ln(1, 0), ln(0, -2)]),
        '-' => glyph!(8, [mv(0, 6), ln(8, 6)]),
        '.' => glyph!(1, [mv(0, 1), ln(0, 0)]),
        '/' => glyph!(8, [mv(0, 0), ln(8, 12)]),
        '0' => glyph!(8, [
            mv(2, 0), ln(0, 2), ln(0, 10), ln(2, 12), ln(6, 12), ln(8, 10), ln(8, 2), ln(6, 0),
            ln(2, 0), mv(1, 2), ln(7, 10),
        ]),
        '1' => glyph!(6, [mv(1, 10), ln(3, 12), ln(3, 0), mv(0, 0), ln(6, 0)]),
        '2' => glyph!(8, [mv(0, 10), ln(2, 12), ln(6, 12), ln(8, 10), ln(8, 8), ln(0, 0), ln(8, 0)]),
        '3' => glyph!(8, [
            mv(0, 12), ln(8, 12), ln(4, 7), ln(6, 7), ln(8, 5), ln(8, 2), ln(6, 0), ln(2, 0), ln(0, 2),
        ]),
        '4' => glyph!(8, [mv(6, 0), ln(6, 12), ln(0, 4), ln(8, 4)]),
        '5' => glyph!(8, [
            mv(8, 12), ln(0, 12), ln(0, 7), ln(6, 7), ln(8, 5), ln(8, 2), ln(6, 0), ln(2, 0), ln(0, 2),
        ]),
        '6' => glyph!(8, [
            mv(7, 12), ln(3, 12), ln(0, 8), ln(0, 2), ln(2, 0), ln(6, 0), ln(8, 2), ln(8, 5),
            ln(6, 7), ln(2, 7), ln(0, 5),
        ]),
        '7' => glyph!(8, [mv(0, 12), ln(8, 12), ln(3, 0)]),
        '8' => glyph!(8, [
            mv(2, 7), ln(0, 9), ln(0, 10), ln(2, 12), ln(6, 12), ln(8, 10), ln(8, 9), ln(6, 7),
            ln(2, 7), ln(0, 5), ln(0, 2), ln(2, 0), ln(6, 0), ln(8, 2), ln(8, 5), ln(6, 7),
        ]),
        '9' => glyph!(8, [
            mv(8, 7), ln(6, 5), ln(2, 5), ln(0, 7), ln(0, 10), ln(2, 12), ln(6, 12), ln(8, 10),
            ln(8, 4), ln(5, 0), ln(1, 0),
        ]),
        ':' => glyph!(1, [mv(0, 9), ln(0, 8), mv(0, 1), ln(0, 0)]),
        ';' => glyph!(2, [mv(1, 9), ln(1, 8), mv(1, 1), ln(1, 0), ln(0, -2)]),
        '<' => glyph!(8, [mv(8, 12), ln(0, 6), ln(8, 0)]),
        '=' => glyph!(8, [mv(0, 8), ln(8, 8), mv(0, 4), ln(8, 4)]),
        '>' => glyph!(8, [mv(0, 12), ln(8, 6), ln(0, 0)]),
        '?' => glyph!(8, [
            mv(0, 10), ln(2, 12), ln(6, 12), ln(8, 10), ln(8, 8), ln(4, 5), ln(4, 3), mv(4, 1), ln(4, 0),
        ]),
        '@' => glyph!(8, [
            mv(6, 4), ln(3, 4), ln(3, 8), ln(6, 8), ln(6, 3), ln(8, 3), ln(8, 10), ln(6, 12),
            ln(2, 12), ln(0, 10), ln(0, 2), ln(2, 0), ln(7, 0),
        ]),
        'A' => glyph!(8, [mv(0, 0), ln(4, 12), ln(8, 0), mv(1, 4), ln(7, 4)]),
        'B' => glyph!(8, [
            mv(0, 0), ln(0, 12), ln(6, 12), ln(8, 10), ln(8, 8), ln(6, 6), ln(0, 6), mv(6, 6),
            ln(8, 4), ln(8, 2), ln(6, 0), ln(0, 0),
        ]),
        'C' => glyph!(8, [
            mv(8, 10), ln(6, 12), ln(2, 12), ln(0, 10), ln(0, 2), ln(2, 0), ln(6, 0), ln(8, 2),
        ]),
        'D' => glyph!(8, [mv(0, 0), ln(0, 12), ln(5, 12), ln(8, 9), ln(8, 3), ln(5, 0), ln(0, 0)]),
        'E' => glyph!(8, [mv(8, 12), ln(0, 12), ln(0, 0), ln(8, 0), mv(0, 6), ln(6, 6)]),
        'F' => glyph!(8, [mv(8, 12), ln(0, 12), ln(0, 0), mv(0, 6), ln(6, 6)]),
        'G' => glyph!(8, [
            mv(8, 10), ln(6, 12), ln(2, 12), ln(0, 10), ln(0, 2), ln(2, 0), ln(6, 0), ln(8, 2),
            ln(8, 5), ln(5, 5),
        ]),
        'H' => glyph!(8, [mv(0, 0), ln(0, 12), mv(8, 0), ln(8, 12), mv(0, 6), ln(8, 6)]),
        'I' => glyph!(4, [mv(0, 12), ln(4, 12), mv(2, 12), ln(2, 0), mv(0, 0), ln(4, 0)]),
        'J' => glyph!(8, [mv(8, 12), ln(8, 2), ln(6, 0), ln(2, 0), ln(0, 2), ln(0, 4)]),
        'K' => glyph!(8, [mv(0, 0), ln(0, 12), mv(8, 12), ln(0, 4), mv(3, 7), ln(8, 0)]),
        'L' => glyph!(8, [mv(0, 12), ln(0, 0), ln(8, 0)]),
        'M' => glyph!(10, [mv(0, 0), ln(0, 12), ln(5, 5), ln(10, 12), ln(10, 0)]),
        'N' => glyph!(8, [mv(0, 0), ln(0, 12), ln(8, 0), ln(8, 12)]),
        'O' => glyph!(8, [
            mv(2, 0), ln(0, 2), ln(0, 10), ln(2, 12), ln(6, 12), ln(8, 10), ln(8, 2), ln(6, 0), ln(2, 0),
        ]),
        'P' => glyph!(8, [mv(0, 0), ln(0, 12), ln(6, 12), ln(8, 10), ln(8, 8), ln(6, 6), ln(0, 6)]),
        'Q' => glyph!(8, [
            mv(2, 0), ln(0, 2), ln(0, 10), ln(2, 12), ln(6, 12), ln(8, 10), ln(8, 2), ln(6, 0),
            ln(2, 0), mv(5, 3), ln(8, 0),
        ]),
        'R' => glyph!(8, [
            mv(0, 0), ln(0, 12), ln(6, 12), ln(8, 10), ln(8, 8), ln(6, 6), ln(0, 6), mv(4, 6), ln(8, 0),
        ]),
        'S' => glyph!(8, [
            mv(8, 10), ln(6, 12), ln(2, 12), ln(0, 10), ln(0, 8), ln(2, 6), ln(6, 6), ln(8, 4),
            ln(8, 2), ln(6, 0), ln(2, 0), ln(0, 2),
        ]),
        'T' => glyph!(8, [mv(0, 12), ln(8, 12), mv(4, 12), ln(4, 0)]),
        'U' => glyph!(8, [mv(0, 12), ln(0, 2), ln(2, 0), ln(6, 0), ln(8, 2), ln(8, 12)]),
        'V' => glyph!(8, [mv(0, 12), ln(4, 0), ln(8, 12)]),
        'W' => glyph!(10, [mv(0, 12), ln(2, 0), ln(5, 8), ln(8, 0), ln(10, 12)]),
        'X' => glyph!(8, [mv(0, 0), ln(8, 12), mv(0, 12), ln(8, 0)]),
        'Y' => glyph!(8, [mv(0, 12), ln(4, 6), ln(8, 12), mv(4, 6), ln(4, 0)]),
        'Z' => glyph!(8, [mv(0, 12), ln(8, 12), ln(0, 0), ln(8, 0)]),
        '[' => glyph!(4, [mv(4, 13), ln(0, 13), ln(0, -1), ln(4, -1)]),
        '\\' => glyph!(8, [mv(0, 12), ln(8, 0)]),
        ']' => glyph!(4, [mv(0, 13), ln(4, 13), ln(4, -1), ln(0, -1)]),
        '^' => glyph!(8, [mv(0, 8), ln(4, 12), ln(8, 8)]),
        '_' => glyph!(8, [mv(0, -1), ln(8, -1)]),
        '`' => glyph!(2, [mv(0, 12), ln(2, 10)]),
        '{' => glyph!(4, [mv(4, 13), ln(2, 12), ln(2, 7), ln(0, 6), ln(2, 5), ln(2, 0), ln(4, -1)]),
        '|' => glyph!(1, [mv(0, 13), ln(0, -1)]),
        '}' => glyph!(4, [mv(0, 13), ln(2, 12), ln(2, 7), ln(4, 6), ln(2, 5), ln(2, 0), ln(0, -1)]),
        '~' => glyph!(8, [mv(0, 6), ln(2, 8), ln(6, 4), ln(8, 6)]),
        _ => return None,
    };
    Some(glyph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::Stroke;

    #[test]
    fn test_covers_printable_ascii() {
        for c in ' '..='~' {
            assert!(LineFont.glyph(c).is_some(), "missing {c:?}");
        }
    }

    #[test]
    fn test_lowercase_folds() {
        assert_eq!(LineFont.glyph('q'), LineFont.glyph('Q'));
    }

    #[test]
    fn test_unknown_glyph() {
        assert!(LineFont.glyph('\u{e9}').is_none());
        assert!(LineFont.glyph('\t').is_none());
    }

    #[test]
    fn test_strokes_stay_in_cell() {
        for c in ' '..='~' {
            let g = LineFont.glyph(c).unwrap();
            for s in g.strokes {
                if let Stroke::Move(x, y) | Stroke::Line(x, y) = *s {
                    assert!(x >= 0 && x as u8 <= g.width, "{c:?} x={x}");
                    assert!((-4..=13).contains(&y), "{c:?} y={y}");
                }
            }
        }
    }
}
