//! Build script for almonry-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates machine.toml at compile time
//! - Generates the buffer sizes machine.toml controls

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Largest status history the firmware will allocate
const MAX_FIRMWARE_HISTORY: i64 = 256;

/// History length used when machine.toml does not set one
const DEFAULT_FIRMWARE_HISTORY: i64 = 64;

/// Longest "not safe" flash accepted at boot
const MAX_FLASH_DURATION_MS: i64 = 60_000;

fn main() {
    setup_linker();
    let config = validate_config();
    generate_constants(&config);
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

/// Keys accepted in each section and the value each takes
const SECTIONS: &[(&str, &[(&str, Kind)])] = &[
    (
        "detection",
        &[("sensor_a_cm", Kind::Distance), ("sensor_b_cm", Kind::Distance)],
    ),
    (
        "echo",
        &[
            ("trigger_pulse_us", Kind::Integer),
            ("echo_timeout_us", Kind::Integer),
        ],
    ),
    (
        "motion",
        &[
            ("window_ms", Kind::Integer),
            ("sustained_ms", Kind::Integer),
            ("poll_ms", Kind::Integer),
        ],
    ),
    (
        "timing",
        &[
            ("trigger_poll_ms", Kind::Integer),
            ("inter_sensor_settle_ms", Kind::Integer),
            ("lock_settle_ms", Kind::Integer),
            ("release_settle_ms", Kind::Integer),
            ("step_delay_ms", Kind::Integer),
            ("door_dwell_ms", Kind::Integer),
            ("belt_run_ms", Kind::Integer),
        ],
    ),
    ("belt", &[("active_low", Kind::Bool)]),
    (
        "indicator",
        &[
            ("flash_duration_ms", Kind::Integer),
            ("flash_period_ms", Kind::Integer),
        ],
    ),
    (
        "status",
        &[("thank_you_ms", Kind::Integer), ("history_len", Kind::Integer)],
    ),
];

const DOOR_KEYS: &[(&str, Kind)] = &[
    ("open_steps", Kind::Steps),
    ("close_steps", Kind::Steps),
    ("open_order", Kind::Order),
    ("close_order", Kind::Order),
];

#[derive(Clone, Copy)]
enum Kind {
    Integer,
    Steps,
    Distance,
    Bool,
    Order,
}

/// Validate machine.toml configuration at compile time
fn validate_config() -> toml::Value {
    println!("cargo:rerun-if-changed=machine.toml");

    let config_path = Path::new("machine.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: machine.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds machine.toml as its configuration.          ║\n\
            ║  Please create one in the almonry-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read machine.toml                              ║\n\
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
                ║  ERROR: Invalid TOML syntax in machine.toml                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();
    validate_sections(&config, &mut errors);
    validate_relations(&config, &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid machine.toml                                     ║\n\
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

    println!("cargo:warning=machine.toml validated successfully");
    config
}

/// Write `config_consts.rs` for `include!` from the firmware
fn generate_constants(config: &toml::Value) {
    let history = integer(config, "status", "history_len").unwrap_or(DEFAULT_FIRMWARE_HISTORY);

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let mut f = File::create(out_dir.join("config_consts.rs")).unwrap();
    writeln!(f, "/// Status events retained for the viewer log").unwrap();
    writeln!(f, "pub const FEED_HISTORY: usize = {};", history).unwrap();
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

/// Check every section and key is known and has the right type
fn validate_sections(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return;
    };

    for (name, section) in root {
        let Some(table) = section.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };

        if name == "door" {
            for (door, keys) in table {
                if door != "a" && door != "b" {
                    errors.push(format!("unknown door [door.{}]", door));
                    continue;
                }
                match keys.as_table() {
                    Some(keys) => check_keys(&format!("door.{}", door), keys, DOOR_KEYS, errors),
                    None => errors.push(format!("[door.{}] must be a table", door)),
                }
            }
            continue;
        }

        match SECTIONS.iter().find(|(section, _)| section == name) {
            Some((_, known)) => check_keys(name, table, known, errors),
            None => errors.push(format!("unknown section [{}]", name)),
        }
    }
}

fn check_keys(
    section: &str,
    table: &toml::map::Map<String, toml::Value>,
    known: &[(&str, Kind)],
    errors: &mut Vec<String>,
) {
    for (key, value) in table {
        let Some((_, kind)) = known.iter().find(|(k, _)| k == key) else {
            errors.push(format!("[{}] unknown key '{}'", section, key));
            continue;
        };

        let ok = match (kind, value) {
            (Kind::Integer, toml::Value::Integer(v)) => (0..=u32::MAX as i64).contains(v),
            (Kind::Steps, toml::Value::Integer(v)) => (0..=255).contains(v),
            (Kind::Distance, toml::Value::Float(v)) => *v > 0.0,
            (Kind::Distance, toml::Value::Integer(v)) => *v > 0,
            (Kind::Bool, toml::Value::Boolean(_)) => true,
            (Kind::Order, toml::Value::String(s)) => s == "normal" || s == "reversed",
            _ => false,
        };
        if !ok {
            let expected = match kind {
                Kind::Integer => "a non-negative integer",
                Kind::Steps => "0-255",
                Kind::Distance => "a positive distance in cm",
                Kind::Bool => "true or false",
                Kind::Order => "\"normal\" or \"reversed\"",
            };
            errors.push(format!("[{}] {} must be {}", section, key, expected));
        }
    }
}

fn integer(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

/// Cross-field rules the boot-time validation would reject
fn validate_relations(config: &toml::Value, errors: &mut Vec<String>) {
    if let (Some(poll), Some(window)) = (
        integer(config, "motion", "poll_ms"),
        integer(config, "motion", "window_ms"),
    ) {
        if poll > window {
            errors.push("[motion] poll_ms must not exceed window_ms".to_string());
        }
    }

    for (section, key) in [
        ("motion", "poll_ms"),
        ("timing", "step_delay_ms"),
        ("timing", "trigger_poll_ms"),
        ("echo", "trigger_pulse_us"),
        ("echo", "echo_timeout_us"),
    ] {
        if integer(config, section, key) == Some(0) {
            errors.push(format!("[{}] {} must not be zero", section, key));
        }
    }

    let flash_ms = integer(config, "indicator", "flash_duration_ms").unwrap_or(3_000);
    if flash_ms > 0 && integer(config, "indicator", "flash_period_ms") == Some(0) {
        errors.push("[indicator] flash_period_ms must not be zero".to_string());
    }

    if flash_ms > MAX_FLASH_DURATION_MS {
        errors.push(format!(
            "[indicator] flash_duration_ms must not exceed {}",
            MAX_FLASH_DURATION_MS
        ));
    }

    if let Some(len) = integer(config, "status", "history_len") {
        if !(8..=MAX_FIRMWARE_HISTORY).contains(&len) {
            errors.push(format!(
                "[status] history_len must be 8-{} on this board",
                MAX_FIRMWARE_HISTORY
            ));
        }
    }
}
