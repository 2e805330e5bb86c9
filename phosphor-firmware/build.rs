//! Build script for phosphor-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates scope.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Highest word rate the PIO stream can pace on this board
const STREAM_MAX_HZ: i64 = 500_000;

/// Keys accepted in each section
const SECTIONS: &[(&str, &[&str])] = &[
    ("buffer", &["limit", "coordinates"]),
    ("refresh", &["floor_us", "screen_saver_s", "min_compute_us"]),
    ("intensity", &["graphics", "text"]),
    ("text", &["font", "spacing", "unknown_glyphs"]),
    (
        "output",
        &["backend", "clock_hz", "front_porch", "back_porch", "blank_active_high"],
    ),
    (
        "pulse",
        &[
            "small_settle",
            "large_settle",
            "unblank",
            "settle_threshold",
            "large_threshold",
            "ns_per_count",
        ],
    ),
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate scope.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=scope.toml");

    let config_path = Path::new("scope.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: scope.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds scope.toml as its configuration.            ║\n\
            ║  Please create one in the phosphor-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read scope.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in scope.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_structure(&config, &mut errors);
    validate_values(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid display configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=scope.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Reject unknown sections and keys (the firmware parser does too)
fn validate_structure(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        return;
    };

    for (name, section) in root {
        let Some(keys) = SECTIONS.iter().find(|(s, _)| s == name).map(|(_, k)| *k) else {
            errors.push(format!("unknown section or root key '{}'", name));
            continue;
        };
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }
}

fn get<'a>(config: &'a toml::Value, section: &str, key: &str) -> Option<&'a toml::Value> {
    config.get(section).and_then(|s| s.get(key))
}

fn check_int(config: &toml::Value, section: &str, key: &str, min: i64, max: i64, errors: &mut Vec<String>) {
    match get(config, section, key) {
        None => {}
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => {}
        Some(toml::Value::Integer(_)) => errors.push(format!("[{}] {} must be {}-{}", section, key, min, max)),
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}

fn check_word(config: &toml::Value, section: &str, key: &str, allowed: &[&str], errors: &mut Vec<String>) {
    match get(config, section, key) {
        None => {}
        Some(toml::Value::String(s)) if allowed.contains(&s.as_str()) => {}
        Some(_) => errors.push(format!("[{}] {} must be one of {}", section, key, allowed.join(", "))),
    }
}

/// Range and enumeration checks matching `ScopeConfig::validate`
fn validate_values(config: &toml::Value, errors: &mut Vec<String>) {
    check_int(config, "buffer", "limit", 1, u32::MAX as i64, errors);
    check_word(config, "buffer", "coordinates", &["skip", "wrap"], errors);

    check_int(config, "refresh", "floor_us", 1, u32::MAX as i64, errors);
    check_int(config, "refresh", "screen_saver_s", 0, u32::MAX as i64, errors);
    check_int(config, "refresh", "min_compute_us", 0, u32::MAX as i64, errors);

    check_int(config, "intensity", "graphics", 50, 200, errors);
    check_int(config, "intensity", "text", 50, 200, errors);

    check_word(config, "text", "font", &["line", "arc"], errors);
    check_word(
        config,
        "text",
        "spacing",
        &["proportional", "tight", "normal", "wide"],
        errors,
    );
    check_word(config, "text", "unknown_glyphs", &["skip", "fallback"], errors);

    check_word(config, "output", "backend", &["streaming", "dma", "pulse", "pio"], errors);
    let backend = get(config, "output", "backend").and_then(|v| v.as_str()).unwrap_or("streaming");
    let clock_max = if matches!(backend, "streaming" | "dma") {
        STREAM_MAX_HZ
    } else {
        2_000_000
    };
    check_int(config, "output", "clock_hz", 1, clock_max, errors);
    check_int(config, "output", "front_porch", 0, u16::MAX as i64, errors);
    check_int(config, "output", "back_porch", 0, u16::MAX as i64, errors);
    if let Some(v) = get(config, "output", "blank_active_high") {
        if !v.is_bool() {
            errors.push("[output] blank_active_high must be true or false".to_string());
        }
    }

    for key in ["small_settle", "large_settle", "unblank", "settle_threshold", "large_threshold"] {
        check_int(config, "pulse", key, 0, u16::MAX as i64, errors);
    }
    check_int(config, "pulse", "ns_per_count", 1, u32::MAX as i64, errors);

    let settle = get(config, "pulse", "settle_threshold").and_then(|v| v.as_integer()).unwrap_or(1000);
    let large = get(config, "pulse", "large_threshold").and_then(|v| v.as_integer()).unwrap_or(2000);
    if large < settle {
        errors.push("[pulse] large_threshold must not be below settle_threshold".to_string());
    }
}
