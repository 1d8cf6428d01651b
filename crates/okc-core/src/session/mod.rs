//! Playback session: timeline clock, event revealer and code typist.
//!
//! [`PlaybackSession`] is a plain value. Every transition consumes it and
//! returns the next value, so a caller either sees the whole effect of a
//! tick or none of it.
//!
//! ```text
//!           start             clock reaches total
//!   Idle ───────────▶ Running ───────────────────▶ Completed
//!     ▲                  │                             │
//!     └──── reset ───────┴────────── reset ────────────┘
//! ```

pub mod reveal;
mod typist;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::script::{ChatEvent, CodeChunk, Script, TaskEvent, as_millis};

use self::typist::Typist;

/// Progress value reported once playback completes.
pub const MAX_PROGRESS: u8 = 10;

/// Highest progress reachable by revealing tasks alone.
const LIVE_PROGRESS_CAP: u8 = 9;

/// Virtual-time increment per tick unless overridden.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

/// Lifecycle of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    /// Nothing playing.
    #[default]
    Idle,
    /// The clock is advancing.
    Running,
    /// The clock reached the script's total duration.
    Completed,
}

/// One playback of one script.
#[derive(Debug, Clone)]
pub struct PlaybackSession {
    script: Option<Arc<Script>>,
    state: PlaybackState,
    virtual_time: Duration,
    tick: Duration,
    chat: Vec<ChatEvent>,
    tasks: Vec<TaskEvent>,
    progress: u8,
    typist: Typist,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self {
            script: None,
            state: PlaybackState::Idle,
            virtual_time: Duration::ZERO,
            tick: DEFAULT_TICK,
            chat: Vec::new(),
            tasks: Vec::new(),
            progress: 0,
            typist: Typist::default(),
        }
    }
}

impl PlaybackSession {
    /// An idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different virtual-time increment per tick (at least 1ms).
    ///
    /// [`DEFAULT_TICK`] (100ms) is the reference cadence: scripted offsets,
    /// progress checkpoints and the timing tests all assume it.
    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick.max(Duration::from_millis(1));
        self
    }

    /// Bind `script` and start the clock at zero.
    ///
    /// Whatever the session held before is discarded.
    #[must_use]
    pub fn start(self, script: Arc<Script>) -> Self {
        info!(script = %script.id, total_ms = script.total_duration.as_millis(), "Playback started");
        Self {
            script: Some(script),
            state: PlaybackState::Running,
            ..self.reset()
        }
    }

    /// Advance the clock by one tick and apply all three projections.
    ///
    /// A no-op unless running. Reaching the total duration clamps the clock,
    /// reveals whatever is due at the clamped time, completes the session and
    /// pins progress to [`MAX_PROGRESS`].
    #[must_use]
    pub fn tick(mut self) -> Self {
        if self.state != PlaybackState::Running {
            return self;
        }
        let Some(script) = self.script.clone() else {
            return self;
        };

        let next = self.virtual_time.saturating_add(self.tick);
        if next >= script.total_duration {
            self.virtual_time = script.total_duration;
            self = self.reveal(&script);
            self.state = PlaybackState::Completed;
            self.progress = MAX_PROGRESS;
            info!(script = %script.id, "Playback completed");
        } else {
            self.virtual_time = next;
            self = self.reveal(&script);
        }
        self
    }

    /// Type the next line of the current chunk.
    ///
    /// A no-op unless running with lines left.
    #[must_use]
    pub fn type_next_line(mut self) -> Self {
        if self.state != PlaybackState::Running {
            return self;
        }
        if let Some(script) = &self.script {
            self.typist = self.typist.advance(&script.chunks);
        }
        self
    }

    /// Back to idle with nothing revealed. Keeps the tick increment.
    #[must_use]
    pub fn reset(self) -> Self {
        if let Some(script) = &self.script {
            debug!(script = %script.id, state = ?self.state, "Playback reset");
        }
        Self {
            tick: self.tick,
            ..Self::default()
        }
    }

    fn reveal(mut self, script: &Script) -> Self {
        let at = self.virtual_time;

        let chat = reveal::due(&script.chat, at, &self.chat);
        let tasks = reveal::due(&script.tasks, at, &self.tasks);
        let selected = reveal::select_chunk(&script.chunks, at);

        for task in &tasks {
            debug!(task = %task.id, label = %task.label, at_ms = at.as_millis(), "Task revealed");
            self.progress = self.progress.saturating_add(1).min(LIVE_PROGRESS_CAP);
        }
        for event in &chat {
            debug!(message = %event.id, at_ms = at.as_millis(), "Chat revealed");
        }
        self.chat.extend(chat);
        self.tasks.extend(tasks);

        let typist = self.typist.follow(&script.chunks, selected);
        if typist.chunk() != self.typist.chunk() {
            if let Some(chunk) = typist.chunk().and_then(|i| script.chunks.get(i)) {
                debug!(file = %chunk.file_name, at_ms = at.as_millis(), "Code chunk switched");
            }
        }
        self.typist = typist;
        self
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Whether the clock is advancing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == PlaybackState::Running
    }

    /// Whether the clock reached the end.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == PlaybackState::Completed
    }

    /// The bound script, if any.
    #[must_use]
    pub fn script(&self) -> Option<&Arc<Script>> {
        self.script.as_ref()
    }

    /// Current virtual time.
    #[must_use]
    pub fn virtual_time(&self) -> Duration {
        self.virtual_time
    }

    /// Virtual-time increment per tick.
    #[must_use]
    pub fn tick_increment(&self) -> Duration {
        self.tick
    }

    /// Time left until completion; zero when idle or done.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.script
            .as_ref()
            .map(|s| s.total_duration.saturating_sub(self.virtual_time))
            .unwrap_or_default()
    }

    /// Revealed chat events, in reveal order.
    #[must_use]
    pub fn chat(&self) -> &[ChatEvent] {
        &self.chat
    }

    /// Revealed task events, in reveal order.
    #[must_use]
    pub fn tasks(&self) -> &[TaskEvent] {
        &self.tasks
    }

    /// Coarse progress, 0 to [`MAX_PROGRESS`].
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// The chunk being typed, if one has started.
    #[must_use]
    pub fn current_chunk(&self) -> Option<&CodeChunk> {
        let script = self.script.as_ref()?;
        script.chunks.get(self.typist.chunk()?)
    }

    /// Lines of the current chunk typed so far.
    #[must_use]
    pub fn visible_lines(&self) -> &[String] {
        self.script
            .as_ref()
            .map(|s| self.typist.visible(&s.chunks))
            .unwrap_or_default()
    }

    /// Number of lines typed in the current chunk.
    #[must_use]
    pub fn line_cursor(&self) -> usize {
        self.typist.cursor()
    }

    /// Whether the current chunk still has lines to type.
    #[must_use]
    pub fn has_pending_lines(&self) -> bool {
        self.script
            .as_ref()
            .is_some_and(|s| self.typist.has_pending(&s.chunks))
    }

    /// The final artifact, only once completed.
    #[must_use]
    pub fn artifact(&self) -> Option<&str> {
        if self.is_completed() {
            self.script.as_deref().map(|s| s.artifact.as_str())
        } else {
            None
        }
    }

    /// Borrowed, serializable snapshot of everything a renderer needs.
    #[must_use]
    pub fn view(&self) -> SessionView<'_> {
        let chunk = self.current_chunk();
        SessionView {
            script: self.script.as_deref().map(|s| s.id.as_str()),
            state: self.state,
            virtual_time: self.virtual_time,
            remaining: self.remaining(),
            progress: self.progress,
            chat: &self.chat,
            tasks: &self.tasks,
            current_file: chunk.map(|c| c.file_name.as_str()),
            current_path: chunk.map(|c| c.file_path.as_str()),
            visible_lines: self.visible_lines(),
            artifact: self.artifact(),
        }
    }
}

/// Rendering contract of a session at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView<'a> {
    /// Id of the bound script.
    pub script: Option<&'a str>,
    /// Lifecycle state.
    pub state: PlaybackState,
    /// Current virtual time.
    #[serde(rename = "virtual_time_ms", serialize_with = "as_millis")]
    pub virtual_time: Duration,
    /// Time left until completion.
    #[serde(rename = "remaining_ms", serialize_with = "as_millis")]
    pub remaining: Duration,
    /// Coarse progress out of [`MAX_PROGRESS`].
    pub progress: u8,
    /// Revealed chat.
    pub chat: &'a [ChatEvent],
    /// Revealed tasks.
    pub tasks: &'a [TaskEvent],
    /// File name of the current chunk.
    pub current_file: Option<&'a str>,
    /// File path of the current chunk.
    pub current_path: Option<&'a str>,
    /// Typed lines of the current chunk.
    pub visible_lines: &'a [String],
    /// Final artifact, once completed.
    pub artifact: Option<&'a str>,
}
