//! OK Computer configuration - layered TOML with env fallbacks.
//!
//! # Example
//!
//! ```rust,no_run
//! let loaded = okc_config::load(None)?;
//! println!("tick every {}ms", loaded.config.playback.tick_ms);
//! # Ok::<(), okc_config::ConfigError>(())
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod env;
mod error;
mod loader;
mod merge;
mod types;
mod validate;

pub use error::{ConfigError, ConfigResult};
pub use loader::{LoadedConfig, load, load_from, okc_home};
pub use types::{Config, LoggingSection, PlaybackSection, UiSection};
pub use validate::validate;
