//! Minimal TOML parser for `machine.toml`
//!
//! Handles only the subset the intake configuration uses and never
//! allocates, so the same code runs at boot on the controller and under
//! test on the host.
//!
//! Supported features:
//! - `[section]` and `[section.sub]` headers
//! - `key = value` with integers (`_` separators allowed), decimals with up
//!   to two places, booleans and quoted strings
//! - Full-line and trailing comments (`# ...`)
//!
//! Keys that are not set keep their `MachineConfig::default()` value.
//! Unknown sections and keys are rejected so typos do not go unnoticed.

use super::types::{MachineConfig, MechanismConfig, StepOrder};
use crate::sensing::Distance;

/// What went wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Section header not recognised
    InvalidSection,
    /// Key not recognised in the current section
    UnknownKey,
    /// Line is neither a header nor `key = value`
    Malformed,
    /// Value has the wrong type or is out of range
    InvalidValue,
}

/// Parse error with the 1-based line it occurred on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: u32,
    pub kind: ParseErrorKind,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Detection,
    Echo,
    Motion,
    DoorA,
    DoorB,
    Timing,
    Belt,
    Indicator,
    Status,
}

/// Parse TOML configuration into a `MachineConfig`
///
/// The result is not validated; call `MachineConfig::validate` on it.
pub fn parse_config(input: &str) -> Result<MachineConfig, ParseError> {
    let mut config = MachineConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = index as u32 + 1;
        let at = |kind| ParseError {
            line: line_no,
            kind,
        };

        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = header
                .strip_suffix(']')
                .ok_or(at(ParseErrorKind::Malformed))?;
            section = parse_section_header(header).ok_or(at(ParseErrorKind::InvalidSection))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(at(ParseErrorKind::Malformed))?;
        apply_value(&mut config, section, key, value).map_err(at)?;
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "detection" => Some(Section::Detection),
        "echo" => Some(Section::Echo),
        "motion" => Some(Section::Motion),
        "door.a" => Some(Section::DoorA),
        "door.b" => Some(Section::DoorB),
        "timing" => Some(Section::Timing),
        "belt" => Some(Section::Belt),
        "indicator" => Some(Section::Indicator),
        "status" => Some(Section::Status),
        _ => None,
    }
}

/// Remove a trailing comment, ignoring `#` inside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_value(
    config: &mut MachineConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseErrorKind> {
    use ParseErrorKind::UnknownKey;

    match section {
        Section::Root => Err(UnknownKey),
        Section::Detection => {
            let distance = parse_distance(value)?;
            match key {
                "sensor_a_cm" => config.detection.sensor_a = distance,
                "sensor_b_cm" => config.detection.sensor_b = distance,
                _ => return Err(UnknownKey),
            }
            Ok(())
        }
        Section::Echo => {
            let slot = match key {
                "trigger_pulse_us" => &mut config.echo.trigger_pulse_us,
                "echo_timeout_us" => &mut config.echo.echo_timeout_us,
                _ => return Err(UnknownKey),
            };
            *slot = parse_u32(value)?;
            Ok(())
        }
        Section::Motion => {
            let slot = match key {
                "window_ms" => &mut config.motion.window_ms,
                "sustained_ms" => &mut config.motion.sustained_ms,
                "poll_ms" => &mut config.motion.poll_ms,
                _ => return Err(UnknownKey),
            };
            *slot = parse_u32(value)?;
            Ok(())
        }
        Section::DoorA => apply_mechanism(&mut config.doors.a, key, value),
        Section::DoorB => apply_mechanism(&mut config.doors.b, key, value),
        Section::Timing => {
            let slot = match key {
                "trigger_poll_ms" => &mut config.timing.trigger_poll_ms,
                "inter_sensor_settle_ms" => &mut config.timing.inter_sensor_settle_ms,
                "lock_settle_ms" => &mut config.timing.lock_settle_ms,
                "release_settle_ms" => &mut config.timing.release_settle_ms,
                "step_delay_ms" => &mut config.timing.step_delay_ms,
                "door_dwell_ms" => &mut config.timing.door_dwell_ms,
                "belt_run_ms" => &mut config.timing.belt_run_ms,
                _ => return Err(UnknownKey),
            };
            *slot = parse_u32(value)?;
            Ok(())
        }
        Section::Belt => match key {
            "active_low" => {
                config.belt.active_low = parse_bool(value)?;
                Ok(())
            }
            _ => Err(UnknownKey),
        },
        Section::Indicator => {
            let slot = match key {
                "flash_duration_ms" => &mut config.indicator.flash_duration_ms,
                "flash_period_ms" => &mut config.indicator.flash_period_ms,
                _ => return Err(UnknownKey),
            };
            *slot = parse_u32(value)?;
            Ok(())
        }
        Section::Status => match key {
            "thank_you_ms" => {
                config.status.thank_you_ms = parse_u32(value)?;
                Ok(())
            }
            "history_len" => {
                let len = parse_u32(value)?;
                config.status.history_len =
                    u16::try_from(len).map_err(|_| ParseErrorKind::InvalidValue)?;
                Ok(())
            }
            _ => Err(UnknownKey),
        },
    }
}

fn apply_mechanism(
    mechanism: &mut MechanismConfig,
    key: &str,
    value: &str,
) -> Result<(), ParseErrorKind> {
    match key {
        "open_steps" => mechanism.open.steps = parse_steps(value)?,
        "close_steps" => mechanism.close.steps = parse_steps(value)?,
        "open_order" => mechanism.open.order = parse_order(value)?,
        "close_order" => mechanism.close.order = parse_order(value)?,
        _ => return Err(ParseErrorKind::UnknownKey),
    }
    Ok(())
}

/// Parse an unsigned integer, allowing `_` digit separators
fn parse_u32(value: &str) -> Result<u32, ParseErrorKind> {
    let mut result: u32 = 0;
    let mut digits = 0;
    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10).ok_or(ParseErrorKind::InvalidValue)?;
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ParseErrorKind::InvalidValue)?;
        digits += 1;
    }
    if digits == 0 {
        return Err(ParseErrorKind::InvalidValue);
    }
    Ok(result)
}

fn parse_steps(value: &str) -> Result<u16, ParseErrorKind> {
    u16::try_from(parse_u32(value)?).map_err(|_| ParseErrorKind::InvalidValue)
}

/// Parse a centimetre value with at most two decimal places
fn parse_distance(value: &str) -> Result<Distance, ParseErrorKind> {
    let (whole, frac) = match value.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (value, ""),
    };
    if frac.len() > 2 {
        return Err(ParseErrorKind::InvalidValue);
    }

    let whole = parse_u32(whole)?;
    let mut hundredths = 0;
    let mut scale = 10;
    for c in frac.chars() {
        let digit = c.to_digit(10).ok_or(ParseErrorKind::InvalidValue)?;
        hundredths += digit * scale;
        scale /= 10;
    }

    whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(hundredths))
        .map(Distance::from_hundredths)
        .ok_or(ParseErrorKind::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

/// Parse a quoted string value
fn parse_string(value: &str) -> Result<&str, ParseErrorKind> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseErrorKind::InvalidValue)
}

fn parse_order(value: &str) -> Result<StepOrder, ParseErrorKind> {
    match parse_string(value)? {
        "normal" => Ok(StepOrder::Normal),
        "reversed" => Ok(StepOrder::Reversed),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Stroke;

    const SAMPLE: &str = r#"
# Intake commissioned 2024
[detection]
sensor_a_cm = 20.0
sensor_b_cm = 9.5   # lowered after false trips

[echo]
echo_timeout_us = 25_000

[motion]
window_ms = 4000
sustained_ms = 1500
poll_ms = 50

[door.a]
open_steps = 7
open_order = "reversed"
close_steps = 9
close_order = "normal"

[door.b]
open_steps = 10

[timing]
belt_run_ms = 6000

[belt]
active_low = true

[status]
history_len = 64
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.detection.sensor_a, Distance::from_cm(20));
        assert_eq!(config.detection.sensor_b, Distance::from_hundredths(950));
        assert_eq!(config.echo.echo_timeout_us, 25_000);
        assert_eq!(config.echo.trigger_pulse_us, 10);
        assert_eq!(config.motion.window_ms, 4000);
        assert_eq!(config.motion.sustained_ms, 1500);
        assert_eq!(config.motion.poll_ms, 50);
        assert_eq!(config.doors.a.open, Stroke::new(7, StepOrder::Reversed));
        assert_eq!(config.doors.b.open, Stroke::new(10, StepOrder::Normal));
        assert_eq!(config.doors.b.close, Stroke::new(9, StepOrder::Reversed));
        assert_eq!(config.timing.belt_run_ms, 6000);
        assert_eq!(config.timing.door_dwell_ms, 2000);
        assert!(config.belt.active_low);
        assert_eq!(config.status.history_len, 64);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_empty_input_is_default() {
        assert_eq!(parse_config("").unwrap(), MachineConfig::default());
        assert_eq!(parse_config("# nothing\n\n").unwrap(), MachineConfig::default());
    }

    #[test]
    fn test_unknown_section() {
        let err = parse_config("[motion]\npoll_ms = 10\n[doors]\n").unwrap_err();
        assert_eq!(
            err,
            ParseError {
                line: 3,
                kind: ParseErrorKind::InvalidSection
            }
        );
    }

    #[test]
    fn test_unknown_key_reports_line() {
        let err = parse_config("[timing]\n\nbelt_run = 10\n").unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, ParseErrorKind::UnknownKey);
    }

    #[test]
    fn test_key_outside_section() {
        let err = parse_config("poll_ms = 10\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnknownKey);
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            parse_config("[motion\n").unwrap_err().kind,
            ParseErrorKind::Malformed
        );
        assert_eq!(
            parse_config("[motion]\npoll_ms\n").unwrap_err().kind,
            ParseErrorKind::Malformed
        );
    }

    #[test]
    fn test_invalid_values() {
        for input in [
            "[motion]\npoll_ms = -5",
            "[motion]\npoll_ms = 1.5",
            "[motion]\npoll_ms = 99999999999",
            "[detection]\nsensor_a_cm = 20.125",
            "[detection]\nsensor_a_cm = twenty",
            "[door.a]\nopen_order = reversed",
            "[door.a]\nopen_order = \"backwards\"",
            "[door.a]\nopen_steps = 70000",
            "[belt]\nactive_low = yes",
            "[status]\nhistory_len = 70000",
        ] {
            assert_eq!(
                parse_config(input).unwrap_err().kind,
                ParseErrorKind::InvalidValue,
                "{input}"
            );
        }
    }

    #[test]
    fn test_hash_inside_string_is_not_a_comment() {
        assert_eq!(strip_comment(r#"a = "x#y" # note"#), r#"a = "x#y" "#);
    }

    #[test]
    fn test_decimal_places() {
        assert_eq!(parse_distance("12"), Ok(Distance::from_hundredths(1200)));
        assert_eq!(parse_distance("12.3"), Ok(Distance::from_hundredths(1230)));
        assert_eq!(parse_distance("12.34"), Ok(Distance::from_hundredths(1234)));
        assert_eq!(parse_distance("0.05"), Ok(Distance::from_hundredths(5)));
        assert_eq!(parse_distance(".5"), Err(ParseErrorKind::InvalidValue));
    }
}
