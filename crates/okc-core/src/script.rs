//! Script schema.
//!
//! A [`Script`] is an immutable, hand-authored timeline: chat events, task
//! events and code chunks, each scheduled at an offset from the start of
//! playback, plus one opaque final artifact (rendered HTML for the built-in
//! demos).

use std::collections::HashSet;
use std::time::Duration;

use serde::{Serialize, Serializer};

use crate::error::{CoreError, CoreResult};

/// Serialize a [`Duration`] as whole milliseconds.
#[allow(clippy::trivially_copy_pass_by_ref)] // serde's serialize_with signature
pub(crate) fn as_millis<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Who a chat event is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// The person typing requests.
    User,
    /// The simulated assistant.
    Assistant,
}

/// Kind of a task step, used by frontends to pick a glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Reading the todo list.
    ReadTodo,
    /// Writing or updating the todo list.
    WriteTodo,
    /// Creating a file.
    CreateFile,
    /// Thinking about the problem.
    Thinking,
    /// Deploying the finished artifact.
    Deploy,
}

impl TaskKind {
    /// Stable snake_case name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadTodo => "read_todo",
            Self::WriteTodo => "write_todo",
            Self::CreateFile => "create_file",
            Self::Thinking => "thinking",
            Self::Deploy => "deploy",
        }
    }
}

/// A chat message scheduled on the script timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatEvent {
    /// Identifier, unique within the script.
    pub id: String,
    /// Author of the message.
    pub role: ChatRole,
    /// Literal message text.
    pub content: String,
    /// Offset from the start of playback.
    #[serde(rename = "offset_ms", serialize_with = "as_millis")]
    pub offset: Duration,
}

impl ChatEvent {
    /// A user-authored message.
    #[must_use]
    pub fn user(id: impl Into<String>, content: impl Into<String>, offset: Duration) -> Self {
        Self {
            id: id.into(),
            role: ChatRole::User,
            content: content.into(),
            offset,
        }
    }

    /// An assistant-authored message.
    #[must_use]
    pub fn assistant(id: impl Into<String>, content: impl Into<String>, offset: Duration) -> Self {
        Self {
            id: id.into(),
            role: ChatRole::Assistant,
            content: content.into(),
            offset,
        }
    }
}

/// A task step scheduled on the script timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEvent {
    /// Identifier, unique within the script.
    pub id: String,
    /// Kind of step.
    pub kind: TaskKind,
    /// Short label shown next to the glyph.
    pub label: String,
    /// File the step is about, if any.
    pub file_name: Option<String>,
    /// Offset from the start of playback.
    #[serde(rename = "offset_ms", serialize_with = "as_millis")]
    pub offset: Duration,
}

impl TaskEvent {
    /// Create a task step with no associated file.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: TaskKind,
        label: impl Into<String>,
        offset: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            label: label.into(),
            file_name: None,
            offset,
        }
    }

    /// Attach a file name.
    #[must_use]
    pub fn with_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }
}

/// A unit of source code typed out line by line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeChunk {
    /// File name, also the chunk's identity for switching.
    pub file_name: String,
    /// Path displayed above the code.
    pub file_path: String,
    /// Literal source lines, in typing order.
    pub lines: Vec<String>,
    /// Offset from the start of playback.
    #[serde(rename = "offset_ms", serialize_with = "as_millis")]
    pub offset: Duration,
}

impl CodeChunk {
    /// Build a chunk from a block of source text, one entry per line.
    #[must_use]
    pub fn from_source(
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        source: &str,
        offset: Duration,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            file_path: file_path.into(),
            lines: source.lines().map(str::to_owned).collect(),
            offset,
        }
    }
}

/// Anything with an identity and a place on the timeline.
pub trait Scheduled {
    /// Identifier used to avoid revealing an event twice.
    fn id(&self) -> &str;
    /// Offset from the start of playback.
    fn offset(&self) -> Duration;
}

impl Scheduled for ChatEvent {
    fn id(&self) -> &str {
        &self.id
    }

    fn offset(&self) -> Duration {
        self.offset
    }
}

impl Scheduled for TaskEvent {
    fn id(&self) -> &str {
        &self.id
    }

    fn offset(&self) -> Duration {
        self.offset
    }
}

/// An immutable, self-contained demo timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    /// Short identifier, also matched as a substring of queries.
    pub id: String,
    /// Display name, listed in the help message.
    pub name: String,
    /// Canonical trigger phrase.
    pub query: String,
    /// One-line description.
    pub description: String,
    /// Clock ceiling; playback completes when virtual time reaches it.
    pub total_duration: Duration,
    /// Chat events; storage order is reveal order among simultaneously due events.
    pub chat: Vec<ChatEvent>,
    /// Task events.
    pub tasks: Vec<TaskEvent>,
    /// Code chunks.
    pub chunks: Vec<CodeChunk>,
    /// Final artifact payload (opaque, typically HTML).
    pub artifact: String,
}

impl Script {
    /// Latest offset across all events, or zero for an empty script.
    #[must_use]
    pub fn last_offset(&self) -> Duration {
        self.chat
            .iter()
            .map(|e| e.offset)
            .chain(self.tasks.iter().map(|e| e.offset))
            .chain(self.chunks.iter().map(|c| c.offset))
            .max()
            .unwrap_or_default()
    }

    /// Check the authoring invariants.
    ///
    /// The id must be non-empty and lowercase: the matcher looks for it inside
    /// the lowercased query. Every offset must fit within `total_duration`,
    /// chat and task ids must be unique, and chunks need a file name and at
    /// least one line.
    ///
    /// Playback never calls this; malformed data is an authoring defect and
    /// is caught by tests.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidScript`] naming the first violation.
    pub fn validate(&self) -> CoreResult<()> {
        let invalid = |reason: String| CoreError::InvalidScript {
            script: self.id.clone(),
            reason,
        };

        if self.id.is_empty() || self.id != self.id.to_lowercase() {
            return Err(invalid(format!("id '{}' must be non-empty lowercase", self.id)));
        }
        if self.name.is_empty() {
            return Err(invalid("display name is empty".to_string()));
        }
        if self.query.trim().is_empty() {
            return Err(invalid("trigger phrase is empty".to_string()));
        }

        let last = self.last_offset();
        if last > self.total_duration {
            return Err(invalid(format!(
                "event at {}ms is past the total duration of {}ms",
                last.as_millis(),
                self.total_duration.as_millis()
            )));
        }

        let mut chat_ids = HashSet::new();
        for event in &self.chat {
            if !chat_ids.insert(event.id.as_str()) {
                return Err(invalid(format!("duplicate chat id '{}'", event.id)));
            }
        }

        let mut task_ids = HashSet::new();
        for task in &self.tasks {
            if !task_ids.insert(task.id.as_str()) {
                return Err(invalid(format!("duplicate task id '{}'", task.id)));
            }
        }

        for chunk in &self.chunks {
            if chunk.file_name.is_empty() {
                return Err(invalid("code chunk without a file name".to_string()));
            }
            if chunk.lines.is_empty() {
                return Err(invalid(format!("code chunk '{}' has no lines", chunk.file_name)));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Small script used across the crate's unit tests.
    pub(crate) fn sample_script() -> Script {
        Script {
            id: "sample".to_string(),
            name: "Sample App".to_string(),
            query: "Create sample app".to_string(),
            description: "A tiny script for tests".to_string(),
            total_duration: ms(3000),
            chat: vec![
                ChatEvent::assistant("m1", "Starting", ms(200)),
                ChatEvent::assistant("m2", "Halfway", ms(1500)),
            ],
            tasks: vec![
                TaskEvent::new("t1", TaskKind::ReadTodo, "Read Todo", ms(300)),
                TaskEvent::new("t2", TaskKind::CreateFile, "Create", ms(500)).with_file("a.js"),
                TaskEvent::new("t3", TaskKind::CreateFile, "Create", ms(1000)).with_file("b.js"),
                TaskEvent::new("t4", TaskKind::Deploy, "Deploy", ms(2500)),
            ],
            chunks: vec![
                CodeChunk::from_source("a.js", "/out/a.js", "let a = 1;\nlet b = 2;\n", ms(500)),
                CodeChunk::from_source("b.js", "/out/b.js", "// b\nrun();\nstop();\n", ms(1000)),
            ],
            artifact: "<html>sample</html>".to_string(),
        }
    }

    #[test]
    fn test_sample_script_is_valid() {
        assert!(sample_script().validate().is_ok());
    }

    #[test]
    fn test_last_offset() {
        assert_eq!(sample_script().last_offset(), ms(2500));
    }

    #[test]
    fn test_validate_rejects_event_past_end() {
        let mut script = sample_script();
        script
            .tasks
            .push(TaskEvent::new("t9", TaskKind::Thinking, "Late", ms(3001)));
        let err = script.validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidScript { .. }));
        assert!(err.to_string().contains("3001ms"));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut script = sample_script();
        script
            .chat
            .push(ChatEvent::assistant("m1", "again", ms(100)));
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_uppercase_id() {
        let mut script = sample_script();
        script.id = "Sample".to_string();
        let err = script.validate().unwrap_err();
        assert!(err.to_string().contains("lowercase"));

        script.id = String::new();
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_chunk() {
        let mut script = sample_script();
        script.chunks[0].lines.clear();
        assert!(script.validate().is_err());
    }

    #[test]
    fn test_chunk_from_source_splits_lines() {
        let chunk = CodeChunk::from_source("x.js", "/x.js", "a\n\nb\n", Duration::ZERO);
        assert_eq!(chunk.lines, vec!["a", "", "b"]);
    }

    #[test]
    fn test_chat_event_serializes_offset_in_millis() {
        let event = ChatEvent::assistant("m1", "hi", ms(1500));
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"offset_ms\":1500"));
        assert!(json.contains("\"role\":\"assistant\""));
    }

    #[test]
    fn test_task_kind_names() {
        assert_eq!(TaskKind::ReadTodo.as_str(), "read_todo");
        assert_eq!(TaskKind::Deploy.as_str(), "deploy");
    }
}
