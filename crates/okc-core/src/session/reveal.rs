//! Reveal projections.
//!
//! Pure functions of `(events, virtual time, already revealed)`. They never
//! look at the session state and are safe to call any number of times with
//! the same arguments.

use std::time::Duration;

use crate::script::{CodeChunk, Scheduled};

/// Events that are due at `at` and not yet in `revealed`.
///
/// The result keeps storage order, so authoring order decides what is
/// appended first when several events fall due together. An empty result
/// is a valid no-op.
#[must_use]
pub fn due<E>(events: &[E], at: Duration, revealed: &[E]) -> Vec<E>
where
    E: Scheduled + Clone,
{
    events
        .iter()
        .filter(|e| e.offset() <= at)
        .filter(|e| !revealed.iter().any(|r| r.id() == e.id()))
        .cloned()
        .collect()
}

/// Index of the most recently started chunk at `at`.
///
/// Picks the greatest offset not after `at`; among chunks sharing that
/// offset the first in storage order wins. `None` until the first chunk is
/// due.
#[must_use]
pub fn select_chunk(chunks: &[CodeChunk], at: Duration) -> Option<usize> {
    let mut best: Option<(usize, Duration)> = None;
    for (index, chunk) in chunks.iter().enumerate() {
        if chunk.offset > at {
            continue;
        }
        match best {
            Some((_, offset)) if offset >= chunk.offset => {},
            _ => best = Some((index, chunk.offset)),
        }
    }
    best.map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::tests::{ms, sample_script};
    use crate::script::{ChatEvent, TaskEvent, TaskKind};

    #[test]
    fn test_nothing_due_before_first_offset() {
        let script = sample_script();
        assert!(due(&script.chat, ms(199), &[]).is_empty());
        assert!(due(&script.tasks, ms(0), &[]).is_empty());
    }

    #[test]
    fn test_offset_is_inclusive() {
        let script = sample_script();
        let fresh = due(&script.chat, ms(200), &[]);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].id, "m1");
    }

    #[test]
    fn test_already_revealed_are_skipped() {
        let script = sample_script();
        let first = due(&script.tasks, ms(600), &[]);
        assert_eq!(first.len(), 2);
        let again = due(&script.tasks, ms(600), &first);
        assert!(again.is_empty());
    }

    #[test]
    fn test_unsorted_storage_keeps_authoring_order() {
        let events = vec![
            ChatEvent::assistant("late", "b", ms(300)),
            ChatEvent::assistant("early", "a", ms(100)),
            ChatEvent::assistant("tie", "c", ms(300)),
        ];
        let ids: Vec<_> = due(&events, ms(1000), &[])
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, ["late", "early", "tie"]);

        let partial: Vec<_> = due(&events, ms(300), &events[..1])
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(partial, ["early", "tie"]);
    }

    #[test]
    fn test_tasks_catch_up_after_a_jump() {
        let script = sample_script();
        let fresh: Vec<TaskEvent> = due(&script.tasks, ms(3000), &[]);
        assert_eq!(fresh.len(), 4);
        assert_eq!(fresh.last().map(|t| t.kind), Some(TaskKind::Deploy));
    }

    #[test]
    fn test_select_chunk_picks_latest_started() {
        let script = sample_script();
        assert_eq!(select_chunk(&script.chunks, ms(499)), None);
        assert_eq!(select_chunk(&script.chunks, ms(500)), Some(0));
        assert_eq!(select_chunk(&script.chunks, ms(999)), Some(0));
        assert_eq!(select_chunk(&script.chunks, ms(1000)), Some(1));
        assert_eq!(select_chunk(&script.chunks, ms(60_000)), Some(1));
    }

    #[test]
    fn test_select_chunk_ties_prefer_storage_order() {
        let chunks = vec![
            CodeChunk::from_source("a.js", "/a.js", "a", ms(100)),
            CodeChunk::from_source("b.js", "/b.js", "b", ms(100)),
        ];
        assert_eq!(select_chunk(&chunks, ms(100)), Some(0));
    }

    #[test]
    fn test_select_chunk_empty() {
        assert_eq!(select_chunk(&[], ms(1000)), None);
    }
}
