//! Beam blanking (Z axis) output
//!
//! A single GPIO that turns the beam off. Scopes differ in which level
//! blanks, so the polarity is chosen at construction.

use phosphor_hal::OutputPin;

/// Blanking line
pub struct BlankLine<P> {
    pin: P,
    /// If true, beam OFF = pin HIGH
    active_high: bool,
    blanked: bool,
}

impl<P: OutputPin> BlankLine<P> {
    /// Create a blanking line; the beam starts blanked
    pub fn new(pin: P, active_high: bool) -> Self {
        let mut line = Self {
            pin,
            active_high,
            blanked: true,
        };
        line.set_blanked(true);
        line
    }

    pub fn set_blanked(&mut self, blanked: bool) {
        self.blanked = blanked;
        self.pin.set_state(blanked == self.active_high);
    }

    pub fn is_blanked(&self) -> bool {
        self.blanked
    }

    pub fn is_active_high(&self) -> bool {
        self.active_high
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    #[test]
    fn test_active_high_blanking() {
        let mut line = BlankLine::new(MockPin { high: false }, true);

        // Starts blanked
        assert!(line.is_blanked());
        assert!(line.pin.is_set_high());

        line.set_blanked(false);
        assert!(!line.pin.is_set_high());
    }

    #[test]
    fn test_active_low_blanking() {
        let mut line = BlankLine::new(MockPin { high: true }, false);

        assert!(line.is_blanked());
        assert!(!line.pin.is_set_high());

        line.set_blanked(false);
        assert!(!line.is_blanked());
        assert!(line.pin.is_set_high());
    }
}
