//! Configuration type definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::font::text::{GlyphPolicy, Spacing};
use crate::font::FontKind;
use crate::intensity::{DEFAULT_INTENSITY, MAX_INTENSITY, MIN_INTENSITY};
use crate::raster::CoordinatePolicy;
use crate::refresh::{DEFAULT_FLOOR_US, DEFAULT_SAVER_TIMEOUT_S};

/// Default output word rate for the streaming backend
pub const DEFAULT_CLOCK_HZ: u32 = 400_000;

/// Highest word rate any backend is asked to pace
pub const MAX_CLOCK_HZ: u32 = 2_000_000;

/// Output backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BackendKind {
    /// Whole frame handed to hardware as one DMA burst
    #[default]
    Streaming,
    /// Each sample written by software with timed settle and unblank
    Pulse,
}

/// Delay counts for the pulse-sequencing backend
///
/// Counts are multiplied by `ns_per_count` to get a delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PulseTiming {
    /// Settle delay after a short jump
    pub small_settle: u16,
    /// Settle delay after a jump of at least `large_threshold`
    pub large_settle: u16,
    /// Width of the unblank pulse that draws the dot
    pub unblank: u16,
    /// Jumps shorter than this (in DAC codes, larger axis) need no settling
    pub settle_threshold: u16,
    /// Jumps at least this long use the large settle delay
    pub large_threshold: u16,
    /// Duration of one count
    pub ns_per_count: u32,
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            small_settle: 25,
            large_settle: 50,
            unblank: 5,
            settle_threshold: 1000,
            large_threshold: 2000,
            ns_per_count: 100,
        }
    }
}

impl PulseTiming {
    /// Settle counts for a jump of `distance` codes
    pub fn settle_counts(&self, distance: u16) -> u16 {
        if distance < self.settle_threshold {
            0
        } else if distance >= self.large_threshold {
            self.large_settle
        } else {
            self.small_settle
        }
    }

    pub fn counts_to_ns(&self, counts: u16) -> u32 {
        counts as u32 * self.ns_per_count
    }
}

/// Complete start-up configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScopeConfig {
    /// Usable point capacity (clamped to the compiled buffer size)
    pub buffer_limit: usize,
    /// Hard minimum refresh period
    pub refresh_floor_us: u32,
    /// Screen saver timeout in seconds; 0 disables
    pub screen_saver_s: u32,
    /// Compute time reserved after every refresh
    pub min_compute_us: u32,
    pub graphics_intensity: u16,
    pub text_intensity: u16,
    pub coordinate_policy: CoordinatePolicy,
    pub glyph_policy: GlyphPolicy,
    pub font: FontKind,
    pub spacing: Spacing,
    pub backend: BackendKind,
    /// Output word rate (streaming backend)
    pub clock_hz: u32,
    /// Blank words streamed before the frame
    pub front_porch: u16,
    /// Blank words streamed after the frame
    pub back_porch: u16,
    pub pulse: PulseTiming,
    /// Blanking line level that turns the beam off
    pub blank_active_high: bool,
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            buffer_limit: usize::MAX,
            refresh_floor_us: DEFAULT_FLOOR_US,
            screen_saver_s: DEFAULT_SAVER_TIMEOUT_S,
            min_compute_us: 2000,
            graphics_intensity: DEFAULT_INTENSITY,
            text_intensity: DEFAULT_INTENSITY,
            coordinate_policy: CoordinatePolicy::Skip,
            glyph_policy: GlyphPolicy::Skip,
            font: FontKind::Line,
            spacing: Spacing::Proportional,
            backend: BackendKind::Streaming,
            clock_hz: DEFAULT_CLOCK_HZ,
            front_porch: 100,
            back_porch: 100,
            pulse: PulseTiming::default(),
            blank_active_high: false,
        }
    }
}

impl ScopeConfig {
    /// Check ranges and cross-field consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buffer_limit == 0 {
            return Err(ConfigError::InvalidBufferLimit);
        }
        if self.refresh_floor_us == 0 {
            return Err(ConfigError::InvalidRefreshFloor);
        }
        let intensity = MIN_INTENSITY..=MAX_INTENSITY;
        if !intensity.contains(&self.graphics_intensity) || !intensity.contains(&self.text_intensity) {
            return Err(ConfigError::InvalidIntensity);
        }
        if self.clock_hz == 0 || self.clock_hz > MAX_CLOCK_HZ {
            return Err(ConfigError::InvalidClockRate);
        }
        if self.pulse.large_threshold < self.pulse.settle_threshold || self.pulse.ns_per_count == 0 {
            return Err(ConfigError::InvalidPulseTiming);
        }
        Ok(())
    }

    /// Validate, then check the selection against what the board can drive
    pub fn validate_for(&self, caps: &BoardCaps) -> Result<(), ConfigError> {
        self.validate()?;
        match self.backend {
            BackendKind::Streaming => match caps.streaming_max_hz {
                None => Err(ConfigError::UnsupportedBackend),
                Some(max) if self.clock_hz > max => Err(ConfigError::InvalidClockRate),
                Some(_) => Ok(()),
            },
            BackendKind::Pulse if !caps.pulse => Err(ConfigError::UnsupportedBackend),
            BackendKind::Pulse => Ok(()),
        }
    }

    /// Screen saver timeout in milliseconds
    pub fn screen_saver_ms(&self) -> u32 {
        self.screen_saver_s.saturating_mul(1000)
    }
}

/// Output capabilities of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardCaps {
    /// Highest word rate the streaming backend can pace, `None` if absent
    pub streaming_max_hz: Option<u32>,
    /// Whether the pulse-sequencing backend is wired up
    pub pulse: bool,
}
