//! Real-time and manual drivers for a [`Conversation`].
//!
//! [`Player`] runs two Tokio timers per session: the clock, which ticks the
//! session every [`Timing::tick`], and the typist, which types one line every
//! [`Timing::line`] and is re-armed from scratch whenever the current chunk
//! changes. Both live inside a [`PlaybackTimers`] guard; dropping the guard
//! cancels them. Every mutation also checks the conversation's generation
//! under the lock, so a timer that was mid-poll when its guard dropped still
//! cannot touch the session that replaced it.
//!
//! [`ManualDriver`] replays the same schedule synchronously, for snapshots
//! and tests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::conversation::{Conversation, SubmitOutcome};
use crate::session::DEFAULT_TICK;

/// Timer periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    /// Clock period, also the virtual-time increment per tick.
    pub tick: Duration,
    /// Delay between typed lines.
    pub line: Duration,
    /// Delay between a match and the first tick.
    pub start_delay: Duration,
    /// Real-time speed multiplier; virtual time is unaffected.
    pub speed: f64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            line: Duration::from_millis(200),
            start_delay: Duration::from_millis(300),
            speed: 1.0,
        }
    }
}

impl Timing {
    fn scaled(&self, period: Duration) -> Duration {
        let scaled = if self.speed.is_finite() && self.speed > 0.0 {
            period.div_f64(self.speed)
        } else {
            period
        };
        scaled.max(Duration::from_millis(1))
    }

    /// Wall-clock clock period.
    #[must_use]
    pub fn real_tick(&self) -> Duration {
        self.scaled(self.tick)
    }

    /// Wall-clock delay between typed lines.
    #[must_use]
    pub fn real_line(&self) -> Duration {
        self.scaled(self.line)
    }

    /// Wall-clock start delay.
    #[must_use]
    pub fn real_start_delay(&self) -> Duration {
        self.scaled(self.start_delay)
    }
}

type Shared = Arc<Mutex<Conversation>>;

fn lock(shared: &Mutex<Conversation>) -> MutexGuard<'_, Conversation> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Publishes a new revision to renderers.
#[derive(Debug, Clone)]
struct Revision(Arc<watch::Sender<u64>>);

impl Revision {
    fn bump(&self) {
        self.0.send_modify(|r| *r = r.wrapping_add(1));
    }
}

/// Aborts its task when dropped.
///
/// A plain `JoinHandle` detaches on drop, which would let the task keep
/// running after its owner is gone.
#[derive(Debug)]
struct AbortOnDrop(JoinHandle<()>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Owns the timers of one session.
///
/// The typist is owned by the clock task, so cancelling the clock also
/// drops the typist.
#[derive(Debug)]
pub struct PlaybackTimers {
    token: CancellationToken,
    clock: AbortOnDrop,
}

impl PlaybackTimers {
    /// Whether the clock task has exited.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.clock.0.is_finished()
    }
}

impl Drop for PlaybackTimers {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Drives a shared [`Conversation`] in real time.
#[derive(Debug)]
pub struct Player {
    conversation: Shared,
    timing: Timing,
    handle: Handle,
    revision: Revision,
    timers: Option<PlaybackTimers>,
}

impl Player {
    /// Create a player that spawns its timers on `handle`.
    #[must_use]
    pub fn new(conversation: Conversation, timing: Timing, handle: Handle) -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            conversation: Arc::new(Mutex::new(conversation.with_tick(timing.tick))),
            timing,
            handle,
            revision: Revision(Arc::new(tx)),
            timers: None,
        }
    }

    /// Submit a query; a match tears down the running timers and arms new ones.
    pub fn submit_query(&mut self, text: &str) -> SubmitOutcome {
        let (outcome, generation) = {
            let mut conversation = lock(&self.conversation);
            let outcome = conversation.submit_query(text);
            (outcome, conversation.generation())
        };

        if let SubmitOutcome::Matched(ref script) = outcome {
            self.timers = None;
            debug!(script = %script.id, generation, "Arming playback timers");
            self.timers = Some(self.spawn_timers(generation));
        }
        if !matches!(outcome, SubmitOutcome::Ignored) {
            self.revision.bump();
        }
        outcome
    }

    /// Cancel the timers and clear the conversation.
    pub fn new_chat(&mut self) {
        self.timers = None;
        lock(&self.conversation).new_chat();
        self.revision.bump();
    }

    /// Flip between code and preview once the session completed.
    pub fn toggle_view(&self) -> bool {
        let toggled = lock(&self.conversation).toggle_view();
        if toggled {
            self.revision.bump();
        }
        toggled
    }

    /// Lock the conversation for reading.
    ///
    /// Hold the guard only briefly; the timers block on it.
    #[must_use]
    pub fn conversation(&self) -> MutexGuard<'_, Conversation> {
        lock(&self.conversation)
    }

    /// Receiver that changes after every applied mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.0.subscribe()
    }

    /// Timer periods.
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Whether timers are currently armed and alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.timers.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn spawn_timers(&self, generation: u64) -> PlaybackTimers {
        let token = CancellationToken::new();
        let clock = self.handle.spawn(run_clock(
            Arc::clone(&self.conversation),
            self.timing,
            generation,
            token.clone(),
            self.revision.clone(),
            self.handle.clone(),
        ));
        PlaybackTimers {
            token,
            clock: AbortOnDrop(clock),
        }
    }
}

async fn run_clock(
    shared: Shared,
    timing: Timing,
    generation: u64,
    token: CancellationToken,
    revision: Revision,
    handle: Handle,
) {
    tokio::select! {
        () = token.cancelled() => return,
        () = sleep(timing.real_start_delay()) => {},
    }

    {
        let mut conversation = lock(&shared);
        if conversation.generation() != generation || !conversation.begin() {
            return;
        }
    }
    revision.bump();

    let mut ticker = interval(timing.real_tick());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    ticker.tick().await;
    let mut typist: Option<AbortOnDrop> = None;

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {},
        }

        let (switched, running) = {
            let mut conversation = lock(&shared);
            if conversation.generation() != generation {
                break;
            }
            let before = conversation
                .session()
                .current_chunk()
                .map(|c| c.file_name.clone());
            conversation.tick();
            let session = conversation.session();
            let after = session.current_chunk().map(|c| &c.file_name);
            (after.is_some() && after != before.as_ref(), session.is_running())
        };
        revision.bump();

        if switched {
            typist = Some(AbortOnDrop(handle.spawn(run_typist(
                Arc::clone(&shared),
                timing,
                generation,
                token.child_token(),
                revision.clone(),
            ))));
        }
        if !running {
            info!(generation, "Playback clock stopped");
            break;
        }
    }

    drop(typist);
}

async fn run_typist(
    shared: Shared,
    timing: Timing,
    generation: u64,
    token: CancellationToken,
    revision: Revision,
) {
    let period = timing.real_line();
    loop {
        tokio::select! {
            () = token.cancelled() => break,
            () = sleep(period) => {},
        }

        let pending = {
            let mut conversation = lock(&shared);
            if conversation.generation() != generation || !conversation.session().is_running() {
                break;
            }
            conversation.type_next_line();
            conversation.session().has_pending_lines()
        };
        revision.bump();

        if !pending {
            break;
        }
    }
}

/// Replays the [`Player`] schedule synchronously.
///
/// Each [`step`](Self::step) is one clock period: the start delay elapses
/// on the first step, after which every step ticks once and types a line
/// whenever a full line period has accumulated since the current chunk
/// started.
#[derive(Debug, Clone)]
pub struct ManualDriver {
    timing: Timing,
    since_line: Duration,
}

impl ManualDriver {
    /// A driver using `timing` periods.
    #[must_use]
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            since_line: Duration::ZERO,
        }
    }

    /// Advance one step. Returns `false` once there is nothing left to drive.
    pub fn step(&mut self, conversation: &mut Conversation) -> bool {
        if conversation.pending_script().is_some() {
            self.since_line = Duration::ZERO;
            return conversation.begin();
        }
        if !conversation.session().is_running() {
            return false;
        }

        let before = conversation
            .session()
            .current_chunk()
            .map(|c| c.file_name.clone());
        conversation.tick();
        let after = conversation
            .session()
            .current_chunk()
            .map(|c| c.file_name.clone());

        if after != before {
            self.since_line = Duration::ZERO;
        } else if after.is_some() {
            self.since_line = self.since_line.saturating_add(self.timing.tick);
            let line = self.timing.line.max(Duration::from_millis(1));
            while self.since_line >= line {
                self.since_line = self.since_line.saturating_sub(line);
                conversation.type_next_line();
            }
        }
        true
    }

    /// Step until the session is no longer running, at most `limit` times.
    pub fn run_to_end(&mut self, conversation: &mut Conversation, limit: usize) -> usize {
        let mut steps = 0usize;
        while steps < limit && self.step(conversation) {
            steps = steps.saturating_add(1);
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timing() {
        let timing = Timing::default();
        assert_eq!(timing.tick, Duration::from_millis(100));
        assert_eq!(timing.line, Duration::from_millis(200));
        assert_eq!(timing.start_delay, Duration::from_millis(300));
        assert_eq!(timing.real_tick(), Duration::from_millis(100));
    }

    #[test]
    fn test_speed_scales_real_periods_only() {
        let timing = Timing {
            speed: 4.0,
            ..Timing::default()
        };
        assert_eq!(timing.real_tick(), Duration::from_millis(25));
        assert_eq!(timing.real_line(), Duration::from_millis(50));
        assert_eq!(timing.tick, Duration::from_millis(100));
    }

    #[test]
    fn test_bad_speed_falls_back() {
        let timing = Timing {
            speed: 0.0,
            ..Timing::default()
        };
        assert_eq!(timing.real_line(), Duration::from_millis(200));
    }

    #[test]
    fn test_manual_driver_starts_then_ticks() {
        let mut conversation = Conversation::builtin();
        let _ = conversation.submit_query("Create calculator");
        let mut driver = ManualDriver::new(Timing::default());

        assert!(driver.step(&mut conversation));
        assert!(conversation.session().is_running());
        assert_eq!(conversation.session().virtual_time(), Duration::ZERO);

        assert!(driver.step(&mut conversation));
        assert_eq!(
            conversation.session().virtual_time(),
            Duration::from_millis(100)
        );
    }

    #[test]
    fn test_manual_driver_types_every_other_tick() {
        let mut conversation = Conversation::builtin();
        let _ = conversation.submit_query("Create calculator");
        let mut driver = ManualDriver::new(Timing::default());
        // Start, then 50 ticks to reach 5000ms.
        for _ in 0..51 {
            driver.step(&mut conversation);
        }
        assert_eq!(conversation.session().line_cursor(), 0);
        driver.step(&mut conversation);
        assert_eq!(conversation.session().line_cursor(), 0);
        driver.step(&mut conversation);
        assert_eq!(conversation.session().line_cursor(), 1);
    }

    #[test]
    fn test_manual_driver_stops_when_idle() {
        let mut conversation = Conversation::builtin();
        let mut driver = ManualDriver::new(Timing::default());
        assert!(!driver.step(&mut conversation));
    }

    #[test]
    fn test_run_to_end() {
        let mut conversation = Conversation::builtin();
        let _ = conversation.submit_query("Create xoxo game");
        let steps = ManualDriver::new(Timing::default()).run_to_end(&mut conversation, 10_000);
        // One start step plus 400 ticks of 100ms.
        assert_eq!(steps, 401);
        assert!(conversation.session().is_completed());
    }
}
