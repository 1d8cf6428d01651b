//! The chat surface around at most one playback session.
//!
//! A [`Conversation`] keeps the query that started the active session ahead
//! of the session's revealed chat, and every later miss (the query plus its
//! help reply) after it. It is purely synchronous; [`Player`](crate::Player)
//! adds real-time timers on top.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use crate::repository::ScriptRepository;
use crate::script::{ChatEvent, Script};
use crate::session::PlaybackSession;

/// What the right-hand panel shows once a session completes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum View {
    /// Source code of the current chunk.
    #[default]
    Code,
    /// The final artifact.
    Preview,
}

/// Result of [`Conversation::submit_query`].
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// Blank input, or a session is already playing.
    Ignored,
    /// A script matched; its session will start on [`Conversation::begin`].
    Matched(Arc<Script>),
    /// Nothing matched; a help reply was appended.
    NoMatch,
}

/// Transcript plus the active session.
#[derive(Debug, Clone)]
pub struct Conversation {
    repository: ScriptRepository,
    transcript: Vec<ChatEvent>,
    /// Entries said after the session's chat; misses only arrive when idle
    /// or completed, so the session chat ahead of them no longer grows.
    appended: Vec<ChatEvent>,
    pending: Option<Arc<Script>>,
    session: PlaybackSession,
    view: View,
    generation: u64,
}

impl Conversation {
    /// An empty conversation over `repository`.
    #[must_use]
    pub fn new(repository: ScriptRepository) -> Self {
        Self {
            repository,
            transcript: Vec::new(),
            appended: Vec::new(),
            pending: None,
            session: PlaybackSession::new(),
            view: View::default(),
            generation: 0,
        }
    }

    /// An empty conversation over the built-in catalog.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(ScriptRepository::builtin().clone())
    }

    /// Use a different virtual-time increment per tick.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.session = self.session.with_tick(tick);
        self
    }

    /// Handle a query typed by the user.
    ///
    /// On a match the previous session is torn down completely and the
    /// transcript restarts with the query. On a miss the query and a help
    /// reply are appended and the current session is left alone.
    pub fn submit_query(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Ignored;
        }
        if self.is_busy() {
            warn!(query = %text, "Ignoring query while a demo is playing");
            return SubmitOutcome::Ignored;
        }

        match self.repository.find(text) {
            Ok(script) => {
                self.teardown();
                self.transcript.push(user_entry(text));
                self.pending = Some(Arc::clone(&script));
                info!(query = %text, script = %script.id, "Query matched");
                SubmitOutcome::Matched(script)
            },
            Err(e) => {
                warn!(error = %e, "Replying with help");
                self.appended.push(user_entry(text));
                self.appended.push(ChatEvent::assistant(
                    format!("assistant-{}", Uuid::new_v4()),
                    self.repository.help_message(),
                    Duration::ZERO,
                ));
                SubmitOutcome::NoMatch
            },
        }
    }

    /// Start the matched script's clock. Returns `false` if nothing is pending.
    pub fn begin(&mut self) -> bool {
        let Some(script) = self.pending.take() else {
            return false;
        };
        self.session = std::mem::take(&mut self.session).start(script);
        true
    }

    /// Advance the session by one tick.
    pub fn tick(&mut self) {
        self.session = std::mem::take(&mut self.session).tick();
    }

    /// Type one more line of the current chunk.
    pub fn type_next_line(&mut self) {
        self.session = std::mem::take(&mut self.session).type_next_line();
    }

    /// Forget everything and return to the home screen.
    pub fn new_chat(&mut self) {
        self.teardown();
        info!("New chat");
    }

    /// Flip between code and preview. Only works once the session completed.
    pub fn toggle_view(&mut self) -> bool {
        if !self.session.is_completed() {
            return false;
        }
        self.view = match self.view {
            View::Code => View::Preview,
            View::Preview => View::Code,
        };
        true
    }

    fn teardown(&mut self) {
        self.session = std::mem::take(&mut self.session).reset();
        self.pending = None;
        self.transcript.clear();
        self.appended.clear();
        self.view = View::Code;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Whether a session is waiting to start or playing.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.session.is_running()
    }

    /// Whether nothing has been said yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transcript.is_empty() && self.session.chat().is_empty() && self.appended.is_empty()
    }

    /// Script matched but not started yet.
    #[must_use]
    pub fn pending_script(&self) -> Option<&Arc<Script>> {
        self.pending.as_ref()
    }

    /// The script currently shown, pending or playing.
    #[must_use]
    pub fn active_script(&self) -> Option<&Arc<Script>> {
        self.pending.as_ref().or_else(|| self.session.script())
    }

    /// Every message in the order it was said.
    pub fn transcript(&self) -> impl Iterator<Item = &ChatEvent> {
        self.transcript
            .iter()
            .chain(self.session.chat())
            .chain(&self.appended)
    }

    /// The active session.
    #[must_use]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// The script catalog.
    #[must_use]
    pub fn repository(&self) -> &ScriptRepository {
        &self.repository
    }

    /// Current right-hand view.
    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    /// Bumped on every teardown; timers compare it to detect a superseded session.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::builtin()
    }
}

fn user_entry(text: &str) -> ChatEvent {
    ChatEvent::user(format!("user-{}", Uuid::new_v4()), text, Duration::ZERO)
}
