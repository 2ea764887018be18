//! Build script for rover-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates rover.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Known sections and, per key, the TOML type its value must have
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    ("i2c", &[("frequency", Kind::Quantity)]),
    ("spi", &[("frequency", Kind::Quantity), ("mode", Kind::Integer)]),
    ("uart", &[("baud", Kind::Quantity)]),
    (
        "ultrasonic",
        &[
            ("timeout", Kind::Quantity),
            ("min_distance", Kind::Quantity),
            ("max_distance", Kind::Quantity),
            ("air_temperature", Kind::Quantity),
            ("samples", Kind::Integer),
            ("max_attempts", Kind::Integer),
        ],
    ),
    (
        "photodiode",
        &[("lux_per_volt", Kind::Number), ("dark_voltage", Kind::Quantity)],
    ),
    (
        "drive",
        &[("pwm_frequency", Kind::Quantity), ("max_duty", Kind::Quantity)],
    ),
    ("telemetry", &[("interval", Kind::Quantity)]),
];

#[derive(Clone, Copy)]
enum Kind {
    /// String with a unit suffix, e.g. "400kHz"
    Quantity,
    Integer,
    /// Integer or float
    Number,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate rover.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=rover.toml");

    let config_path = Path::new("rover.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: rover.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds rover.toml as its configuration.            ║\n\
            ║  Please create one in the rover-firmware directory.              ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read rover.toml                                ║\n\
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
                ║  ERROR: Invalid TOML syntax in rover.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_sections(&config);
    validate_ultrasonic(&config);

    println!("cargo:warning=rover.toml validated successfully");
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

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Every section must be known and every known key must have the right type
///
/// Unknown keys inside a known section are tolerated, the boot parser
/// ignores them too.
fn validate_sections(config: &toml::Value) {
    let root = match config.as_table() {
        Some(t) => t,
        None => return,
    };

    let mut errors = Vec::new();

    for (name, section) in root {
        let keys = match SCHEMA.iter().find(|(s, _)| s == name) {
            Some((_, keys)) => *keys,
            None => {
                errors.push(format!("unknown section [{}]", name));
                continue;
            }
        };
        let table = match section {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[{}] must be a table", name));
                continue;
            }
        };

        for (key, kind) in keys {
            let Some(value) = table.get(*key) else {
                continue;
            };
            let ok = match kind {
                Kind::Quantity => value
                    .as_str()
                    .map(|s| s.trim_start().starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.'))
                    .unwrap_or(false),
                Kind::Integer => value.as_integer().is_some(),
                Kind::Number => value.as_integer().is_some() || value.as_float().is_some(),
            };
            if !ok {
                let expected = match kind {
                    Kind::Quantity => "a quoted value with unit, e.g. \"400kHz\"",
                    Kind::Integer => "an integer",
                    Kind::Number => "a number",
                };
                errors.push(format!("[{}] {} must be {}", name, key, expected));
            }
        }
    }

    if let Some(toml::Value::Integer(mode)) = config.get("spi").and_then(|s| s.get("mode")) {
        if !(0..=3).contains(mode) {
            errors.push("[spi] mode must be 0-3".to_string());
        }
    }

    report("Invalid sections in rover.toml", &errors);
}

/// Sample counts must fit the driver's fixed buffers
fn validate_ultrasonic(config: &toml::Value) {
    let ultrasonic = match config.get("ultrasonic") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    let mut errors = Vec::new();

    let samples = ultrasonic.get("samples").and_then(|v| v.as_integer());
    let attempts = ultrasonic.get("max_attempts").and_then(|v| v.as_integer());

    if let Some(samples) = samples {
        if !(1..=8).contains(&samples) {
            errors.push("[ultrasonic] samples must be 1-8".to_string());
        }
    }
    if let Some(attempts) = attempts {
        if !(1..=255).contains(&attempts) {
            errors.push("[ultrasonic] max_attempts must be 1-255".to_string());
        }
        if let Some(samples) = samples {
            if attempts < samples {
                errors.push("[ultrasonic] max_attempts must be >= samples".to_string());
            }
        }
    }

    report("Invalid ultrasonic configuration", &errors);
}
