//! Input handling for the TUI.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::io;

use super::state::App;

/// Handle one pending terminal event.
pub(crate) fn handle_input(app: &mut App) -> io::Result<()> {
    if let Event::Key(key) = event::read()?
        && key.kind != KeyEventKind::Release
    {
        handle_key(app, key);
    }
    Ok(())
}

pub(crate) fn handle_key(app: &mut App, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) | (KeyCode::Char('c' | 'd'), KeyModifiers::CONTROL) => {
            app.should_quit = true;
        },

        (KeyCode::Char('n'), KeyModifiers::CONTROL) => app.new_chat(),

        (KeyCode::Tab, _) => app.toggle_view(),

        (KeyCode::Enter, _) => app.submit_input(),

        // Preset shortcuts, only on an empty line so digits can still be typed.
        (KeyCode::Char(c @ '1'..='3'), KeyModifiers::NONE) if app.chrome.input.is_empty() => {
            let index = c.to_digit(10).and_then(|d| usize::try_from(d).ok());
            if let Some(index) = index {
                app.submit_preset(index.saturating_sub(1));
            }
        },

        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => app.chrome.insert(c),
        (KeyCode::Backspace, _) => app.chrome.backspace(),
        (KeyCode::Delete, _) => app.chrome.delete(),
        (KeyCode::Left, _) => app.chrome.move_left(),
        (KeyCode::Right, _) => app.chrome.move_right(),
        (KeyCode::Home, _) | (KeyCode::Char('a'), KeyModifiers::CONTROL) => app.chrome.home(),
        (KeyCode::End, _) | (KeyCode::Char('e'), KeyModifiers::CONTROL) => app.chrome.end(),
        (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
            let _ = app.chrome.take_input();
        },

        _ => {},
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use okc_core::{Conversation, Player, SubmitOutcome, Timing};
    use tokio::runtime::Handle;

    use super::*;

    fn app() -> App {
        let player = Player::new(Conversation::builtin(), Timing::default(), Handle::current());
        App::new(player, Duration::from_millis(16), 1)
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, c: char) {
        handle_key(app, KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_and_enter_submits() {
        let mut app = app();
        for c in "Create snake game".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);

        assert!(app.chrome.input.is_empty());
        let conversation = app.player.conversation();
        assert_eq!(
            conversation.pending_script().map(|s| s.id.as_str()),
            Some("snake")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_preset_keys_only_on_empty_input() {
        let mut app = app();
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.chrome.input, "x2");
        assert!(app.player.conversation().is_empty());

        ctrl(&mut app, 'u');
        press(&mut app, KeyCode::Char('2'));
        assert!(app.chrome.input.is_empty());
        assert_eq!(
            app.player
                .conversation()
                .pending_script()
                .map(|s| s.id.as_str()),
            Some("calculator")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_ctrl_n_clears_and_disarms() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert!(app.player.is_active());

        ctrl(&mut app, 'n');
        assert!(!app.player.is_active());
        assert!(app.player.conversation().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tab_toggles_only_after_completion() {
        let mut app = app();
        assert!(matches!(
            app.player.submit_query("Create xoxo game"),
            SubmitOutcome::Matched(_)
        ));
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.player.conversation().view(), okc_core::View::Code);

        tokio::time::sleep(Duration::from_millis(40_400)).await;
        assert!(app.player.conversation().session().is_completed());
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.player.conversation().view(), okc_core::View::Preview);
    }

    #[tokio::test(start_paused = true)]
    async fn test_escape_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
