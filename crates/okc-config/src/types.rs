//! Configuration types.
//!
//! Every section implements [`Default`] with the same values as the embedded
//! `defaults.toml`, so a bare `[section]` header still produces a working
//! configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Playback timer periods.
    pub playback: PlaybackSection,
    /// Log level, format and destination.
    pub logging: LoggingSection,
    /// Terminal UI pacing.
    pub ui: UiSection,
}

// ---------------------------------------------------------------------------
// PlaybackSection
// ---------------------------------------------------------------------------

/// Playback timer periods.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackSection {
    /// Clock period and virtual-time increment per tick, in milliseconds.
    pub tick_ms: u64,
    /// Delay between typed code lines, in milliseconds.
    pub line_ms: u64,
    /// Delay between a matched query and the first tick, in milliseconds.
    pub start_delay_ms: u64,
    /// Wall-clock speed multiplier.
    pub speed: f64,
}

impl Default for PlaybackSection {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            line_ms: 200,
            start_delay_ms: 300,
            speed: 1.0,
        }
    }
}

impl PlaybackSection {
    /// Tick period.
    #[must_use]
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Line period.
    #[must_use]
    pub fn line(&self) -> Duration {
        Duration::from_millis(self.line_ms)
    }

    /// Start delay.
    #[must_use]
    pub fn start_delay(&self) -> Duration {
        Duration::from_millis(self.start_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// LoggingSection
// ---------------------------------------------------------------------------

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Global log level filter (`"trace"`, `"debug"`, `"info"`, `"warn"`,
    /// `"error"`).
    pub level: String,
    /// Output format: `"pretty"`, `"compact"`, `"json"` or `"full"`.
    pub format: String,
    /// Directory for the TUI's log files. `None` uses `~/.okc/logs`.
    pub directory: Option<PathBuf>,
    /// Per-module tracing directives (e.g. `["okc_core::player=debug"]`).
    pub directives: Vec<String>,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "compact".to_owned(),
            directory: None,
            directives: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiSection
// ---------------------------------------------------------------------------

/// Terminal UI pacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Redraw period, in milliseconds.
    pub frame_ms: u64,
    /// Characters of assistant text revealed per frame.
    pub chat_chars_per_frame: usize,
}

impl Default for UiSection {
    fn default() -> Self {
        Self {
            frame_ms: 16,
            chat_chars_per_frame: 1,
        }
    }
}

impl UiSection {
    /// Redraw period.
    #[must_use]
    pub fn frame(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}
