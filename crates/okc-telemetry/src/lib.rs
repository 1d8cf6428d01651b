//! OK Computer telemetry - `tracing` subscriber setup.
//!
//! The terminal UI owns the screen, so it logs to a rolling file; headless
//! commands log to stderr.
//!
//! # Example
//!
//! ```rust,no_run
//! use okc_telemetry::{LogConfig, LogFormat, setup_logging};
//!
//! # fn main() -> Result<(), okc_telemetry::TelemetryError> {
//! let config = LogConfig::new("debug")
//!     .with_format(LogFormat::Compact)
//!     .with_directive("okc_core::session=trace");
//!
//! setup_logging(&config)?;
//! tracing::info!("Logging ready");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod prelude;

mod error;
mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{
    FileLogConfig, FileRotation, LogConfig, LogFormat, LogTarget, setup_default_logging,
    setup_logging,
};
