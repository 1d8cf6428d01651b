//! Headless commands: snapshots, the catalog listing and artifact export.

use std::io::Write;

use anyhow::{Context, Result};
use okc_core::{Conversation, ManualDriver, ScriptRepository, SubmitOutcome, Timing};
use tracing::info;

use crate::ui::{self, Chrome, Typewriter};

/// Upper bound on driver steps; built-in scripts need a few hundred.
const MAX_STEPS: usize = 100_000;

/// Options for [`run_snapshot`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct SnapshotOptions {
    /// Frames printed before the final one.
    pub(crate) steps: usize,
    pub(crate) width: u16,
    pub(crate) height: u16,
    /// Print the final session view as JSON instead of frames.
    pub(crate) json: bool,
}

/// Submit `query`, drive the session synchronously and print frames.
pub(crate) fn run_snapshot(
    out: &mut impl Write,
    query: &str,
    timing: Timing,
    options: SnapshotOptions,
) -> Result<()> {
    let mut conversation = Conversation::builtin().with_tick(timing.tick);
    let outcome = conversation.submit_query(query);
    info!(query, matched = matches!(outcome, SubmitOutcome::Matched(_)), "snapshot");

    let total = ManualDriver::new(timing).run_to_end(&mut conversation.clone(), MAX_STEPS);
    let every = total
        .checked_div(options.steps.saturating_add(1))
        .unwrap_or(0)
        .max(1);

    let chrome = Chrome::new(Typewriter::instant());
    let mut driver = ManualDriver::new(timing);
    let mut done = 0usize;
    let mut printed = 0usize;

    while done < MAX_STEPS && driver.step(&mut conversation) {
        done = done.saturating_add(1);
        let on_beat = done.checked_rem(every) == Some(0);
        if !options.json && on_beat && printed < options.steps && done < total {
            printed = printed.saturating_add(1);
            let virtual_ms = conversation.session().virtual_time().as_millis();
            writeln!(
                out,
                "┌─── Snapshot {printed} (step {done}, {virtual_ms}ms) ───┐"
            )?;
            write!(
                out,
                "{}",
                ui::render_snapshot(&conversation, &chrome, options.width, options.height)?
            )?;
        }
    }

    if options.json {
        let view = conversation.session().view();
        let json = serde_json::to_string_pretty(&view).context("failed to serialize session")?;
        writeln!(out, "{json}")?;
    } else {
        writeln!(out, "┌─── Final (step {done}) ───┐")?;
        write!(
            out,
            "{}",
            ui::render_snapshot(&conversation, &chrome, options.width, options.height)?
        )?;
    }
    Ok(())
}

/// Print the catalog, one script per line.
pub(crate) fn list_scripts(out: &mut impl Write, repository: &ScriptRepository) -> Result<()> {
    writeln!(out, "{:<12} {:<14} {:<22} DURATION", "ID", "NAME", "QUERY")?;
    for script in repository.scripts() {
        writeln!(
            out,
            "{:<12} {:<14} {:<22} {}s",
            script.id,
            script.name,
            script.query,
            script.total_duration.as_secs()
        )?;
    }
    Ok(())
}

/// Print the final artifact of script `id`.
pub(crate) fn export_artifact(
    out: &mut impl Write,
    repository: &ScriptRepository,
    id: &str,
) -> Result<()> {
    let script = repository
        .lookup(id)
        .with_context(|| format!("cannot export '{id}'"))?;
    out.write_all(script.artifact.as_bytes())?;
    if !script.artifact.ends_with('\n') {
        writeln!(out)?;
    }
    Ok(())
}
