//! OK Computer - a scripted coding-assistant demo in the terminal.
//!
//! Type a request such as "Create calculator" and watch a pre-authored
//! session play back: chat messages, task steps, code typed line by line,
//! and finally a preview of the finished page.
//!
//! Run interactively: `okc`
//!
//! Or start with a query: `okc --demo "Create snake game"`
//!
//! Or capture frames without a terminal:
//! `okc --snapshot "Create calculator" --steps 5`

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use okc_config::Config;
use okc_core::{Conversation, Player, ScriptRepository, Timing};
use tracing::{info, warn};

mod config_bridge;
mod snapshot;
mod ui;

use snapshot::SnapshotOptions;
use ui::App;

/// OK Computer - scripted coding-assistant demo
#[derive(Parser)]
#[command(name = "okc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to an extra configuration file
    #[arg(short, long, env = "OKC_CONFIG")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Submit this query at startup
    #[arg(long, value_name = "QUERY", conflicts_with = "snapshot")]
    demo: Option<String>,

    /// Render frames for this query without a terminal
    #[arg(long, value_name = "QUERY")]
    snapshot: Option<String>,

    /// Number of intermediate snapshot frames
    #[arg(long, default_value_t = 5, requires = "snapshot")]
    steps: usize,

    /// Snapshot width in columns
    #[arg(long, default_value_t = 100)]
    width: u16,

    /// Snapshot height in rows
    #[arg(long, default_value_t = 30)]
    height: u16,

    /// Print the final session view as JSON instead of frames
    #[arg(long, requires = "snapshot")]
    json: bool,

    /// List the built-in scripts
    #[arg(long, conflicts_with_all = ["snapshot", "demo", "export"])]
    list: bool,

    /// Print the final artifact of a script
    #[arg(long, value_name = "ID", conflicts_with_all = ["snapshot", "demo"])]
    export: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded =
        okc_config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let cfg = loaded.config;
    let timing = config_bridge::to_timing(&cfg);

    let interactive = !cli.list && cli.export.is_none() && cli.snapshot.is_none();
    let mut log_config = if interactive {
        let fallback = okc_config::okc_home().ok().map(|home| home.join("logs"));
        config_bridge::to_file_log_config(&cfg, fallback)
    } else {
        config_bridge::to_log_config(&cfg)
    };
    if cli.verbose && log_config.level != "off" {
        "debug".clone_into(&mut log_config.level);
    }
    if let Err(e) = okc_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }
    for path in &loaded.loaded_files {
        info!(path = %path.display(), "configuration file in use");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        return snapshot::list_scripts(&mut out, ScriptRepository::builtin());
    }
    if let Some(id) = cli.export.as_deref() {
        return snapshot::export_artifact(&mut out, ScriptRepository::builtin(), id);
    }
    if let Some(query) = cli.snapshot.as_deref() {
        let options = SnapshotOptions {
            steps: cli.steps,
            width: cli.width,
            height: cli.height,
            json: cli.json,
        };
        snapshot::run_snapshot(&mut out, query, timing, options)?;
        out.flush()?;
        return Ok(());
    }
    drop(out);

    run_interactive(cli.demo.as_deref(), timing, &cfg)
}

fn run_interactive(demo: Option<&str>, timing: Timing, cfg: &Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .thread_name("okc-timers")
        .build()
        .context("failed to start the timer runtime")?;

    let player = Player::new(Conversation::builtin(), timing, runtime.handle().clone());
    let mut app = App::new(player, cfg.ui.frame(), cfg.ui.chat_chars_per_frame);
    if let Some(query) = demo {
        app.submit(query);
    }

    let mut terminal = ui::init_terminal().context("failed to initialize the terminal")?;
    let result = app.run(&mut terminal);
    if let Err(e) = ui::restore_terminal(&mut terminal) {
        warn!(error = %e, "failed to restore the terminal");
    }

    // Cancel timers before the runtime shuts down.
    drop(app);
    runtime.shutdown_background();

    result.context("terminal UI failed")
}
