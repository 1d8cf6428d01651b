//! Reveal properties checked over random points of every built-in script.

use std::collections::HashSet;
use std::sync::Arc;

use okc_core::session::reveal;
use okc_core::{PlaybackSession, Script, ScriptRepository};
use proptest::prelude::*;

fn script(index: usize) -> Arc<Script> {
    let scripts = ScriptRepository::builtin().scripts();
    Arc::clone(&scripts[index % scripts.len()])
}

fn after_ticks(script: Arc<Script>, ticks: usize) -> PlaybackSession {
    let mut session = PlaybackSession::new().start(script);
    for _ in 0..ticks {
        session = session.tick();
    }
    session
}

fn chat_ids(session: &PlaybackSession) -> HashSet<String> {
    session.chat().iter().map(|e| e.id.clone()).collect()
}

fn task_ids(session: &PlaybackSession) -> HashSet<String> {
    session.tasks().iter().map(|e| e.id.clone()).collect()
}

proptest! {
    #[test]
    fn prop_reveal_is_idempotent(index in 0usize..5, ticks in 0usize..700) {
        let script = script(index);
        let session = after_ticks(Arc::clone(&script), ticks);
        let at = session.virtual_time();

        prop_assert!(reveal::due(&script.chat, at, session.chat()).is_empty());
        prop_assert!(reveal::due(&script.tasks, at, session.tasks()).is_empty());

        let selected = reveal::select_chunk(&script.chunks, at)
            .map(|i| script.chunks[i].file_name.as_str());
        let current = session.current_chunk().map(|c| c.file_name.as_str());
        prop_assert_eq!(selected, current);

        prop_assert_eq!(chat_ids(&session).len(), session.chat().len());
        prop_assert_eq!(task_ids(&session).len(), session.tasks().len());
    }

    #[test]
    fn prop_reveal_is_monotonic(index in 0usize..5, a in 0usize..700, b in 0usize..700) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let script = script(index);
        let early = after_ticks(Arc::clone(&script), lo);
        let late = after_ticks(script, hi);

        prop_assert!(early.virtual_time() <= late.virtual_time());
        prop_assert!(chat_ids(&early).is_subset(&chat_ids(&late)));
        prop_assert!(task_ids(&early).is_subset(&task_ids(&late)));
        prop_assert!(early.progress() <= late.progress());
    }

    #[test]
    fn prop_clock_never_passes_total(index in 0usize..5, ticks in 0usize..1000) {
        let script = script(index);
        let session = after_ticks(Arc::clone(&script), ticks);
        prop_assert!(session.virtual_time() <= script.total_duration);
        if session.is_completed() {
            prop_assert_eq!(session.virtual_time(), script.total_duration);
            prop_assert_eq!(session.progress(), 10);
        } else {
            prop_assert!(session.progress() <= 9);
        }
    }
}
