//! Compiled-in demo scripts, one module per script.
//!
//! Source lines and final HTML live under `assets/` and are pulled in with
//! `include_str!`.

pub(crate) mod calculator;
pub(crate) mod pacman;
pub(crate) mod snake;
pub(crate) mod todo;
pub(crate) mod xoxo;

use std::time::Duration;

use crate::script::{CodeChunk, TaskEvent, TaskKind};

/// Directory the simulated assistant writes its output to.
const OUTPUT_DIR: &str = "/mnt/okcomputer/output";

pub(crate) const fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

pub(crate) fn read_todo(id: &str, at: u64) -> TaskEvent {
    TaskEvent::new(id, TaskKind::ReadTodo, "Read Todo", ms(at))
}

pub(crate) fn write_todo(id: &str, label: &str, at: u64) -> TaskEvent {
    TaskEvent::new(id, TaskKind::WriteTodo, label, ms(at))
}

pub(crate) fn create_file(id: &str, file_name: &str, at: u64) -> TaskEvent {
    TaskEvent::new(id, TaskKind::CreateFile, "Create", ms(at)).with_file(file_name)
}

pub(crate) fn deploy(id: &str, label: &str, at: u64) -> TaskEvent {
    TaskEvent::new(id, TaskKind::Deploy, label, ms(at))
}

pub(crate) fn code(file_name: &str, source: &str, at: u64) -> CodeChunk {
    CodeChunk::from_source(
        file_name,
        format!("{OUTPUT_DIR}/{file_name}"),
        source,
        ms(at),
    )
}
