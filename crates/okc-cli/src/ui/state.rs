//! App state and the interactive run loop.

use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use okc_core::{ChatEvent, ChatRole, Player};

use super::Term;

/// Character-by-character reveal of assistant messages.
///
/// Display only: the playback engine has already revealed the full text.
#[derive(Debug, Clone)]
pub(crate) struct Typewriter {
    chars_per_frame: usize,
    instant: bool,
    shown: HashMap<String, usize>,
}

impl Typewriter {
    pub(crate) fn new(chars_per_frame: usize) -> Self {
        Self {
            chars_per_frame: chars_per_frame.max(1),
            instant: false,
            shown: HashMap::new(),
        }
    }

    /// A typewriter that always shows the full text (snapshots).
    pub(crate) fn instant() -> Self {
        Self {
            instant: true,
            ..Self::new(1)
        }
    }

    /// Advance every partially shown assistant message by one frame.
    pub(crate) fn advance<'a>(&mut self, transcript: impl Iterator<Item = &'a ChatEvent>) {
        if self.instant {
            return;
        }
        for event in transcript.filter(|e| e.role == ChatRole::Assistant) {
            let total = event.content.chars().count();
            let shown = self.shown.entry(event.id.clone()).or_insert(0);
            *shown = shown.saturating_add(self.chars_per_frame).min(total);
        }
    }

    /// The part of `event` currently on screen.
    pub(crate) fn visible<'a>(&self, event: &'a ChatEvent) -> &'a str {
        if self.instant || event.role == ChatRole::User {
            return &event.content;
        }
        let shown = self.shown.get(&event.id).copied().unwrap_or(0);
        match event.content.char_indices().nth(shown) {
            Some((byte, _)) => &event.content[..byte],
            None => &event.content,
        }
    }

    /// Forget all progress (new chat).
    pub(crate) fn clear(&mut self) {
        self.shown.clear();
    }
}

/// Everything on screen that is not part of the conversation.
#[derive(Debug, Clone)]
pub(crate) struct Chrome {
    /// Text in the input line.
    pub(crate) input: String,
    /// Cursor position in characters.
    pub(crate) cursor: usize,
    pub(crate) typewriter: Typewriter,
}

impl Chrome {
    pub(crate) fn new(typewriter: Typewriter) -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            typewriter,
        }
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }

    pub(crate) fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.input.insert(at, c);
        self.cursor = self.cursor.saturating_add(1);
    }

    pub(crate) fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor = self.cursor.saturating_sub(1);
        let at = self.byte_index();
        self.input.remove(at);
    }

    pub(crate) fn delete(&mut self) {
        if self.cursor < self.input.chars().count() {
            let at = self.byte_index();
            self.input.remove(at);
        }
    }

    pub(crate) fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn move_right(&mut self) {
        self.cursor = self.cursor.saturating_add(1).min(self.input.chars().count());
    }

    pub(crate) fn home(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    /// Take the input, leaving the line empty.
    pub(crate) fn take_input(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.input)
    }
}

/// Interactive application.
pub(crate) struct App {
    pub(crate) player: Player,
    pub(crate) chrome: Chrome,
    pub(crate) should_quit: bool,
    frame: Duration,
    last_render: Option<Instant>,
}

impl App {
    pub(crate) fn new(player: Player, frame: Duration, chars_per_frame: usize) -> Self {
        Self {
            player,
            chrome: Chrome::new(Typewriter::new(chars_per_frame)),
            should_quit: false,
            frame: frame.max(Duration::from_millis(1)),
            last_render: None,
        }
    }

    /// Submit the input line.
    pub(crate) fn submit_input(&mut self) {
        let text = self.chrome.take_input();
        self.submit(&text);
    }

    /// Submit `text` as a query.
    pub(crate) fn submit(&mut self, text: &str) {
        let outcome = self.player.submit_query(text);
        tracing::debug!(?outcome, "query submitted");
    }

    /// Submit the query of preset `index` (zero-based).
    pub(crate) fn submit_preset(&mut self, index: usize) {
        let query = self
            .player
            .conversation()
            .repository()
            .presets()
            .into_iter()
            .nth(index)
            .map(|p| p.query);
        if let Some(query) = query {
            self.submit(&query);
        }
    }

    pub(crate) fn new_chat(&mut self) {
        self.player.new_chat();
        self.chrome.typewriter.clear();
    }

    pub(crate) fn toggle_view(&mut self) {
        let _ = self.player.toggle_view();
    }

    /// Main loop: redraw every frame, poll input in between.
    pub(crate) fn run(&mut self, terminal: &mut Term) -> io::Result<()> {
        loop {
            let due = self
                .last_render
                .is_none_or(|last| last.elapsed() >= self.frame);
            if due {
                {
                    let conversation = self.player.conversation();
                    self.chrome.typewriter.advance(conversation.transcript());
                }
                let conversation = self.player.conversation().clone();
                terminal.draw(|frame| super::render_frame(frame, &conversation, &self.chrome))?;
                self.last_render = Some(Instant::now());
            }

            if crossterm::event::poll(Duration::from_millis(10))? {
                super::handle_input(self)?;
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }
}
