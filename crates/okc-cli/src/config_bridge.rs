//! Bridge from `okc_config::Config` to runtime types.

use std::path::PathBuf;

use okc_config::Config;
use okc_core::Timing;
use okc_telemetry::{FileRotation, LogConfig, LogFormat};

/// Playback periods for the [`okc_core::Player`] and the snapshot driver.
pub(crate) fn to_timing(cfg: &Config) -> Timing {
    Timing {
        tick: cfg.playback.tick(),
        line: cfg.playback.line(),
        start_delay: cfg.playback.start_delay(),
        speed: cfg.playback.speed,
    }
}

/// Log settings writing to stderr.
pub(crate) fn to_log_config(cfg: &Config) -> LogConfig {
    // Validation already rejected unknown formats.
    let format = cfg
        .logging
        .format
        .parse::<LogFormat>()
        .unwrap_or_default();

    let mut log_config = LogConfig::new(&cfg.logging.level).with_format(format);
    for directive in &cfg.logging.directives {
        log_config = log_config.with_directive(directive);
    }
    log_config
}

/// Log settings for the interactive UI, which owns the terminal.
pub(crate) fn to_file_log_config(cfg: &Config, fallback_dir: Option<PathBuf>) -> LogConfig {
    let log_config = to_log_config(cfg);
    match cfg.logging.directory.clone().or(fallback_dir) {
        Some(dir) => log_config.with_file_logging(dir, "okc", FileRotation::Daily),
        // No home directory: keep the terminal clean rather than interleave logs.
        None => LogConfig::new("off"),
    }
}
