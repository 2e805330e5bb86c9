//! Intensity to point-density model
//!
//! Perceived brightness of a trace depends on how long the beam dwells
//! along it, so brightness is bought with more points per unit length.
//! Density is the distance (in DAC codes) between consecutive
//! interpolated samples; it is derived from the intensity percentage and
//! never set directly.

/// Lowest usable intensity percentage
pub const MIN_INTENSITY: u16 = 50;

/// Highest usable intensity percentage
pub const MAX_INTENSITY: u16 = 200;

/// Start-up intensity percentage
pub const DEFAULT_INTENSITY: u16 = 100;

/// Point spacing at 100% intensity
pub const BASE_DENSITY: u16 = 24;

/// Spacing for an intensity percentage, clamped to the usable range
///
/// Inversely proportional to intensity and always at least 1.
pub fn density_for(percent: u16) -> u16 {
    let pct = percent.clamp(MIN_INTENSITY, MAX_INTENSITY) as u32;
    let scaled = (BASE_DENSITY as u32 * 100 + pct / 2) / pct;
    scaled.max(1) as u16
}

/// One intensity channel (graphics or text)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intensity {
    percent: u16,
    density: u16,
}

impl Default for Intensity {
    fn default() -> Self {
        Self::new(DEFAULT_INTENSITY)
    }
}

impl Intensity {
    /// Create a channel at `percent`, clamped to 50-200%
    pub fn new(percent: u16) -> Self {
        let percent = percent.clamp(MIN_INTENSITY, MAX_INTENSITY);
        Self {
            percent,
            density: density_for(percent),
        }
    }

    /// Change the intensity and recompute density
    pub fn set(&mut self, percent: u16) {
        *self = Self::new(percent);
    }

    /// Intensity percentage in effect (after clamping)
    pub fn percent(&self) -> u16 {
        self.percent
    }

    /// Point spacing in DAC codes
    pub fn density(&self) -> u16 {
        self.density
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_density() {
        assert_eq!(Intensity::default().density(), BASE_DENSITY);
        assert_eq!(Intensity::default().percent(), 100);
    }

    #[test]
    fn test_double_intensity_halves_spacing() {
        assert_eq!(density_for(200), BASE_DENSITY / 2);
        assert_eq!(density_for(50), BASE_DENSITY * 2);
    }

    #[test]
    fn test_clamped_to_usable_range() {
        let mut i = Intensity::new(10);
        assert_eq!(i.percent(), MIN_INTENSITY);
        i.set(1000);
        assert_eq!(i.percent(), MAX_INTENSITY);
        assert_eq!(i.density(), density_for(MAX_INTENSITY));
    }

    #[test]
    fn test_density_positive_and_monotonic() {
        let mut last = u16::MAX;
        for pct in 0..=300 {
            let d = density_for(pct);
            assert!(d >= 1);
            assert!(d <= last);
            last = d;
        }
    }
}
