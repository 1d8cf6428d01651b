//! End-to-end playback scenarios over the built-in catalog.

use std::sync::Arc;
use std::time::Duration;

use okc_core::prelude::*;
use okc_core::MAX_PROGRESS;

fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

fn tick_to(mut session: PlaybackSession, target: Duration) -> PlaybackSession {
    while session.is_running() && session.virtual_time() < target {
        session = session.tick();
    }
    session
}

#[test]
fn create_pacman_game_matches_pacman() {
    let script = ScriptRepository::builtin()
        .match_query("create pacman game")
        .unwrap();
    assert_eq!(script.id, "pacman");
}

#[test]
fn spaceship_query_adds_exactly_one_help_message() {
    let mut conversation = Conversation::builtin();
    let outcome = conversation.submit_query("build me a spaceship");

    assert!(matches!(outcome, SubmitOutcome::NoMatch));
    assert!(!conversation.is_busy());
    assert_eq!(conversation.session().state(), PlaybackState::Idle);

    let assistant: Vec<_> = conversation
        .transcript()
        .filter(|e| e.role == ChatRole::Assistant)
        .collect();
    assert_eq!(assistant.len(), 1);
    for name in ScriptRepository::builtin().display_names() {
        assert!(assistant[0].content.contains(name), "help omits {name}");
    }
}

#[test]
fn reset_midway_clears_the_session() {
    let script = ScriptRepository::builtin().lookup("pacman").unwrap();
    let session = tick_to(PlaybackSession::new().start(script), ms(8000))
        .type_next_line()
        .type_next_line();
    assert!(!session.chat().is_empty());
    assert!(!session.tasks().is_empty());
    assert!(session.current_chunk().is_some());

    let session = session.reset();
    assert_eq!(session.virtual_time(), Duration::ZERO);
    assert!(session.chat().is_empty());
    assert!(session.tasks().is_empty());
    assert!(session.current_chunk().is_none());
    assert!(!session.is_running());
    assert!(!session.is_completed());
}

#[test]
fn new_chat_midway_clears_the_conversation() {
    let mut conversation = Conversation::builtin();
    let _ = conversation.submit_query("Create snake game");
    let mut driver = ManualDriver::new(Timing::default());
    for _ in 0..80 {
        driver.step(&mut conversation);
    }
    assert!(conversation.session().progress() > 0);

    conversation.new_chat();
    let session = conversation.session();
    assert_eq!(session.virtual_time(), Duration::ZERO);
    assert!(session.chat().is_empty());
    assert!(session.tasks().is_empty());
    assert!(session.current_chunk().is_none());
    assert!(!session.is_running());
    assert!(!session.is_completed());
    assert_eq!(conversation.transcript().count(), 0);
}

#[test]
fn calculator_end_to_end() {
    let mut conversation = Conversation::builtin();
    let SubmitOutcome::Matched(script) = conversation.submit_query("Create calculator") else {
        panic!("calculator should match");
    };
    assert_eq!(script.total_duration, ms(45_000));

    let mut driver = ManualDriver::new(Timing::default());
    while conversation.session().virtual_time() < ms(5000) {
        assert!(driver.step(&mut conversation));
    }
    let session = conversation.session();
    assert_eq!(session.virtual_time(), ms(5000));
    let chunk = session.current_chunk().unwrap();
    assert_eq!(chunk.file_name, "calculator.js");
    assert_eq!(chunk.file_path, "/mnt/okcomputer/output/calculator.js");
    assert!(session.visible_lines().len() < chunk.lines.len());
    assert!(session.artifact().is_none());

    while conversation.session().virtual_time() < ms(40_000) {
        assert!(driver.step(&mut conversation));
    }
    assert!(conversation.session().is_running());
    assert_eq!(conversation.session().progress(), 6);

    while driver.step(&mut conversation) {}
    let session = conversation.session();
    assert!(session.is_completed());
    assert_eq!(session.virtual_time(), ms(45_000));
    assert_eq!(session.progress(), MAX_PROGRESS);
    assert_eq!(session.visible_lines().len(), 47);
    let artifact = session.artifact().unwrap();
    assert_eq!(artifact, script.artifact);
    assert!(artifact.contains("Calculator"));
}

#[test]
fn completion_pins_progress_even_without_tasks() {
    let mut script = (*ScriptRepository::builtin().lookup("todo").unwrap()).clone();
    script.tasks.clear();
    let session = tick_to(PlaybackSession::new().start(Arc::new(script)), ms(100_000));
    assert!(session.is_completed());
    assert_eq!(session.progress(), MAX_PROGRESS);
    assert_eq!(session.virtual_time(), ms(40_000));
}

#[test]
fn chunk_switch_resets_typist() {
    let mut script = (*ScriptRepository::builtin().lookup("xoxo").unwrap()).clone();
    let mut second = script.chunks[0].clone();
    second.file_name = "index.html".to_string();
    second.file_path = "/mnt/okcomputer/output/index.html".to_string();
    second.offset = ms(18_000);
    script.chunks.push(second);
    script.validate().unwrap();

    let mut session = tick_to(PlaybackSession::new().start(Arc::new(script)), ms(17_900));
    for _ in 0..10 {
        session = session.type_next_line();
    }
    assert_eq!(session.visible_lines().len(), 10);
    assert_eq!(session.current_chunk().unwrap().file_name, "game.js");

    session = session.tick();
    assert_eq!(session.current_chunk().unwrap().file_name, "index.html");
    assert!(session.visible_lines().is_empty());
    assert_eq!(session.line_cursor(), 0);
}

#[test]
fn every_builtin_script_plays_to_completion() {
    for script in ScriptRepository::builtin().scripts() {
        let mut conversation = Conversation::builtin();
        let _ = conversation.submit_query(&script.query);
        assert_eq!(
            conversation.active_script().map(|s| s.id.as_str()),
            Some(script.id.as_str()),
            "trigger phrase of {} matched another script",
            script.id
        );
        ManualDriver::new(Timing::default()).run_to_end(&mut conversation, 10_000);

        let session = conversation.session();
        assert!(session.is_completed(), "{} did not complete", script.id);
        assert_eq!(session.tasks().len(), script.tasks.len());
        assert_eq!(session.chat().len(), script.chat.len());
        assert!(session.artifact().is_some());
    }
}
