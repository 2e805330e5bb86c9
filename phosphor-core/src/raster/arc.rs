//! Arc selection by octant
//!
//! Octants are numbered counter-clockwise from the positive X axis with
//! Y pointing up the screen: octant 0 covers 0-45°, octant 1 45-90°, and
//! so on. Each octant is half-open so every offset belongs to exactly
//! one of them, and rotating an offset by 90° moves it exactly two
//! octants.

use bitflags::bitflags;

bitflags! {
    /// Which 45° segments of a circle or ellipse to draw
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ArcMask: u8 {
        const ARC0 = 1 << 0;
        const ARC1 = 1 << 1;
        const ARC2 = 1 << 2;
        const ARC3 = 1 << 3;
        const ARC4 = 1 << 4;
        const ARC5 = 1 << 5;
        const ARC6 = 1 << 6;
        const ARC7 = 1 << 7;

        /// Upper half (0-180°)
        const UPPER = 0b0000_1111;
        /// Lower half (180-360°)
        const LOWER = 0b1111_0000;
        /// Full shape
        const ALL = 0xFF;
    }
}

impl Default for ArcMask {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ArcMask {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ArcMask({=u8:#010b})", self.bits())
    }
}

impl ArcMask {
    /// Mask selecting a single octant (taken modulo 8)
    pub const fn octant(k: u8) -> Self {
        Self::from_bits_truncate(1 << (k & 7))
    }

    /// Whether octant `k` is selected
    pub const fn has_octant(self, k: u8) -> bool {
        self.bits() & (1 << (k & 7)) != 0
    }

    /// Whether the quadrant made of octants `2q` and `2q + 1` has any bit set
    pub const fn has_quadrant(self, q: u8) -> bool {
        self.bits() & (0b11 << ((q & 3) * 2)) != 0
    }
}

/// Octant of an offset from the center
///
/// The center itself is assigned to octant 0.
pub fn octant_of(dx: i32, dy: i32) -> u8 {
    if dx == 0 && dy == 0 {
        return 0;
    }
    let upper = dy > 0 || (dy == 0 && dx > 0);
    if upper {
        if dx > 0 {
            if dy < dx {
                0
            } else {
                1
            }
        } else if -dx < dy {
            2
        } else {
            3
        }
    } else if dx < 0 {
        if -dy < -dx {
            4
        } else {
            5
        }
    } else if dx < -dy {
        6
    } else {
        7
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_points() {
        assert_eq!(octant_of(0, 0), 0);
        assert_eq!(octant_of(10, 0), 0);
        assert_eq!(octant_of(0, 10), 2);
        assert_eq!(octant_of(-10, 0), 4);
        assert_eq!(octant_of(0, -10), 6);
    }

    #[test]
    fn test_diagonals() {
        assert_eq!(octant_of(10, 10), 1);
        assert_eq!(octant_of(-10, 10), 3);
        assert_eq!(octant_of(-10, -10), 5);
        assert_eq!(octant_of(10, -10), 7);
    }

    #[test]
    fn test_octant_interiors() {
        assert_eq!(octant_of(10, 3), 0);
        assert_eq!(octant_of(3, 10), 1);
        assert_eq!(octant_of(-3, 10), 2);
        assert_eq!(octant_of(-10, 3), 3);
        assert_eq!(octant_of(-10, -3), 4);
        assert_eq!(octant_of(-3, -10), 5);
        assert_eq!(octant_of(3, -10), 6);
        assert_eq!(octant_of(10, -3), 7);
    }

    #[test]
    fn test_quarter_turn_moves_two_octants() {
        for dx in -20..=20 {
            for dy in -20..=20 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let k = octant_of(dx, dy);
                assert_eq!(octant_of(-dy, dx), (k + 2) % 8, "({dx}, {dy})");
            }
        }
    }

    #[test]
    fn test_mask_helpers() {
        let mask = ArcMask::ARC0 | ArcMask::ARC5;
        assert!(mask.has_octant(0));
        assert!(mask.has_octant(5));
        assert!(!mask.has_octant(1));
        assert!(mask.has_quadrant(0));
        assert!(!mask.has_quadrant(1));
        assert!(mask.has_quadrant(2));
        assert_eq!(ArcMask::octant(9), ArcMask::ARC1);
        assert_eq!(ArcMask::default(), ArcMask::ALL);
        assert_eq!(ArcMask::UPPER | ArcMask::LOWER, ArcMask::ALL);
    }
}
