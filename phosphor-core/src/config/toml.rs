//! Minimal TOML reader for the display configuration
//!
//! Handles only the subset `scope.toml` uses. It does NOT support the
//! full TOML grammar.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` with integer, boolean and string values
//! - Comments (`# ...`), whole-line or trailing
//!
//! NOT supported: arrays, inline tables, multi-line strings, dotted keys.
//! Anything not set keeps its value from [`ScopeConfig::default`].

use super::types::{BackendKind, ScopeConfig};
use crate::font::text::{GlyphPolicy, Spacing};
use crate::font::FontKind;
use crate::raster::CoordinatePolicy;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Value has the wrong type or is not one of the allowed words
    InvalidValue,
    /// Key is not recognised in its section
    UnknownKey,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Buffer,
    Refresh,
    Intensity,
    Text,
    Output,
    Pulse,
}

/// Parse configuration text into a [`ScopeConfig`]
pub fn parse_config(input: &str) -> Result<ScopeConfig, ParseError> {
    let mut config = ScopeConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            let header = strip_comment(line);
            if !header.ends_with(']') {
                return Err(ParseError::InvalidSection);
            }
            section = parse_section_header(&header[1..header.len() - 1])?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidValue)?;
        apply_value(section, key, value, &mut config)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "buffer" => Ok(Section::Buffer),
        "refresh" => Ok(Section::Refresh),
        "intensity" => Ok(Section::Intensity),
        "text" => Ok(Section::Text),
        "output" => Ok(Section::Output),
        "pulse" => Ok(Section::Pulse),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Drop a trailing comment unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return line[..i].trim_end(),
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse an integer value, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|&c| c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_backend(value: &str) -> Result<BackendKind, ParseError> {
    match parse_string(value) {
        "streaming" | "dma" => Ok(BackendKind::Streaming),
        "pulse" | "pio" => Ok(BackendKind::Pulse),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_font(value: &str) -> Result<FontKind, ParseError> {
    match parse_string(value) {
        "line" => Ok(FontKind::Line),
        "arc" => Ok(FontKind::Arc),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_spacing(value: &str) -> Result<Spacing, ParseError> {
    match parse_string(value) {
        "proportional" => Ok(Spacing::Proportional),
        "tight" => Ok(Spacing::Tight),
        "normal" => Ok(Spacing::Normal),
        "wide" => Ok(Spacing::Wide),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_coordinate_policy(value: &str) -> Result<CoordinatePolicy, ParseError> {
    match parse_string(value) {
        "skip" => Ok(CoordinatePolicy::Skip),
        "wrap" => Ok(CoordinatePolicy::Wrap),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_glyph_policy(value: &str) -> Result<GlyphPolicy, ParseError> {
    match parse_string(value) {
        "skip" => Ok(GlyphPolicy::Skip),
        "fallback" => Ok(GlyphPolicy::Fallback),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Apply one key/value to the config
fn apply_value(section: Section, key: &str, value: &str, config: &mut ScopeConfig) -> Result<(), ParseError> {
    match section {
        Section::Root => return Err(ParseError::UnknownKey),
        Section::Buffer => match key {
            "limit" => config.buffer_limit = parse_int(value)?,
            "coordinates" => config.coordinate_policy = parse_coordinate_policy(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Refresh => match key {
            "floor_us" => config.refresh_floor_us = parse_int(value)?,
            "screen_saver_s" => config.screen_saver_s = parse_int(value)?,
            "min_compute_us" => config.min_compute_us = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Intensity => match key {
            "graphics" => config.graphics_intensity = parse_int(value)?,
            "text" => config.text_intensity = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Text => match key {
            "font" => config.font = parse_font(value)?,
            "spacing" => config.spacing = parse_spacing(value)?,
            "unknown_glyphs" => config.glyph_policy = parse_glyph_policy(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Output => match key {
            "backend" => config.backend = parse_backend(value)?,
            "clock_hz" => config.clock_hz = parse_int(value)?,
            "front_porch" => config.front_porch = parse_int(value)?,
            "back_porch" => config.back_porch = parse_int(value)?,
            "blank_active_high" => config.blank_active_high = parse_bool(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
        Section::Pulse => match key {
            "small_settle" => config.pulse.small_settle = parse_int(value)?,
            "large_settle" => config.pulse.large_settle = parse_int(value)?,
            "unblank" => config.pulse.unblank = parse_int(value)?,
            "settle_threshold" => config.pulse.settle_threshold = parse_int(value)?,
            "large_threshold" => config.pulse.large_threshold = parse_int(value)?,
            "ns_per_count" => config.pulse.ns_per_count = parse_int(value)?,
            _ => return Err(ParseError::UnknownKey),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("refresh"), Ok(Section::Refresh));
        assert_eq!(parse_section_header(" pulse "), Ok(Section::Pulse));
        assert_eq!(parse_section_header("stepper"), Err(ParseError::InvalidSection));
    }

    #[test]
    fn test_parse_key_value_strips_comments() {
        assert_eq!(parse_key_value("floor_us = 25000 # 40 Hz"), Some(("floor_us", "25000")));
        assert_eq!(parse_key_value("font = \"arc#1\""), Some(("font", "\"arc#1\"")));
        assert_eq!(parse_key_value("font ="), None);
    }

    #[test]
    fn test_parse_int_separators() {
        assert_eq!(parse_int::<u32>("20_000"), Ok(20_000));
        assert_eq!(parse_int::<u16>("-1"), Err(ParseError::InvalidValue));
        assert_eq!(parse_int::<u16>("seven"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_empty_input_gives_defaults() {
        assert_eq!(parse_config("# nothing here\n\n"), Ok(ScopeConfig::default()));
    }

    #[test]
    fn test_parse_full_config() {
        let config_str = r#"
[buffer]
limit = 3000
coordinates = "wrap"

[refresh]
floor_us = 25_000
screen_saver_s = 0   # never blank

[intensity]
graphics = 150
text = 80

[text]
font = "arc"
spacing = "wide"
unknown_glyphs = "fallback"

[output]
backend = "pulse"
clock_hz = 250000
blank_active_high = true

[pulse]
small_settle = 18
large_threshold = 3000
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.buffer_limit, 3000);
        assert_eq!(config.coordinate_policy, CoordinatePolicy::Wrap);
        assert_eq!(config.refresh_floor_us, 25_000);
        assert_eq!(config.screen_saver_s, 0);
        assert_eq!(config.graphics_intensity, 150);
        assert_eq!(config.text_intensity, 80);
        assert_eq!(config.font, FontKind::Arc);
        assert_eq!(config.spacing, Spacing::Wide);
        assert_eq!(config.glyph_policy, GlyphPolicy::Fallback);
        assert_eq!(config.backend, BackendKind::Pulse);
        assert_eq!(config.clock_hz, 250_000);
        assert!(config.blank_active_high);
        assert_eq!(config.pulse.small_settle, 18);
        assert_eq!(config.pulse.large_settle, 50);
        assert_eq!(config.pulse.large_threshold, 3000);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_unknown_keys_and_values() {
        assert_eq!(parse_config("[refresh]\nspeed = 3"), Err(ParseError::UnknownKey));
        assert_eq!(parse_config("limit = 3"), Err(ParseError::UnknownKey));
        assert_eq!(parse_config("[text]\nfont = \"gothic\""), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("[output]\nblank_active_high = yes"), Err(ParseError::InvalidValue));
        assert_eq!(parse_config("[display]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_config("[output\n"), Err(ParseError::InvalidSection));
    }
}
