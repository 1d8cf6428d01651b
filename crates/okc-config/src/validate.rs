//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Upper bound for `playback.speed`.
const MAX_SPEED: f64 = 100.0;

/// Upper bound for every millisecond period (one minute).
const MAX_PERIOD_MS: u64 = 60_000;

const LOG_FORMATS: &[&str] = &["pretty", "compact", "json", "full"];
const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_playback(config)?;
    validate_logging(config)?;
    validate_ui(config)?;
    Ok(())
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_owned(),
        message: message.into(),
    }
}

fn check_period(field: &str, value: u64) -> ConfigResult<()> {
    if value == 0 || value > MAX_PERIOD_MS {
        return Err(invalid(
            field,
            format!("{value}ms is out of range; must be between 1 and {MAX_PERIOD_MS}"),
        ));
    }
    Ok(())
}

fn validate_playback(config: &Config) -> ConfigResult<()> {
    let p = &config.playback;
    check_period("playback.tick_ms", p.tick_ms)?;
    check_period("playback.line_ms", p.line_ms)?;
    if p.start_delay_ms > MAX_PERIOD_MS {
        return Err(invalid(
            "playback.start_delay_ms",
            format!("must be at most {MAX_PERIOD_MS}"),
        ));
    }
    if !p.speed.is_finite() || p.speed <= 0.0 || p.speed > MAX_SPEED {
        return Err(invalid(
            "playback.speed",
            format!("speed {} is out of range; must be in (0, {MAX_SPEED}]", p.speed),
        ));
    }
    Ok(())
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let l = &config.logging;
    if !LOG_FORMATS.contains(&l.format.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.format",
            format!(
                "unsupported format '{}'; expected one of: {}",
                l.format,
                LOG_FORMATS.join(", ")
            ),
        ));
    }
    if !LOG_LEVELS.contains(&l.level.to_ascii_lowercase().as_str()) {
        return Err(invalid(
            "logging.level",
            format!(
                "unsupported level '{}'; expected one of: {}",
                l.level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }
    Ok(())
}

fn validate_ui(config: &Config) -> ConfigResult<()> {
    check_period("ui.frame_ms", config.ui.frame_ms)?;
    if config.ui.chat_chars_per_frame == 0 {
        return Err(invalid("ui.chat_chars_per_frame", "must be at least 1"));
    }
    Ok(())
}
