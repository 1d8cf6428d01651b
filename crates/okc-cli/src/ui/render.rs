//! Rendering logic for the TUI.
//!
//! The frame is a pure function of the [`Conversation`] and the [`Chrome`],
//! so the interactive loop and headless snapshots draw identical screens.

use okc_core::{ChatRole, Conversation, MAX_PROGRESS, TaskKind, View};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::Theme;
use super::highlight::highlight;
use super::state::Chrome;
use super::theme::spinner_at;

/// Render the whole screen.
pub(crate) fn render_frame(frame: &mut Frame, conversation: &Conversation, chrome: &Chrome) {
    let theme = Theme::default();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Main area
            Constraint::Length(2), // Input (dashed border + line)
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    if conversation.is_empty() && conversation.active_script().is_none() {
        render_home(frame, outer[0], conversation, &theme);
    } else {
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(outer[0]);
        render_chat(frame, panes[0], conversation, chrome, &theme);
        render_code(frame, panes[1], conversation, &theme);
    }

    render_input(frame, outer[1], conversation, chrome, &theme);
    render_status(frame, outer[2], conversation, &theme);
}

// ─── Home ────────────────────────────────────────────────────────

fn render_home(frame: &mut Frame, area: Rect, conversation: &Conversation, theme: &Theme) {
    let mut lines = vec![
        Line::from(Span::styled(
            "OK Computer",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "What should we build today?",
            Style::default().fg(theme.assistant),
        )),
        Line::default(),
    ];

    for (i, preset) in conversation.repository().presets().into_iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("[{}] ", i.saturating_add(1)),
                Style::default().fg(theme.accent),
            ),
            Span::styled(preset.title, Style::default().fg(theme.user)),
            Span::styled(
                format!("  \"{}\"", preset.query),
                Style::default().fg(theme.muted),
            ),
        ]));
    }

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let top = area.y.saturating_add(area.height.saturating_sub(height) / 2);
    let body = Rect::new(area.x, top, area.width, height.min(area.height));
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), body);
}

// ─── Chat ────────────────────────────────────────────────────────

fn task_glyph(kind: TaskKind) -> &'static str {
    match kind {
        TaskKind::ReadTodo => "☰",
        TaskKind::WriteTodo => "✎",
        TaskKind::CreateFile => "+",
        TaskKind::Thinking => "…",
        TaskKind::Deploy => "⇪",
    }
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if len > 0 {
                    out.push(std::mem::take(&mut line));
                    len = 0;
                }
                let rest = word.split_off(width);
                out.push(word.into_iter().collect());
                word = rest;
            }
            let needed = if len == 0 {
                word.len()
            } else {
                len.saturating_add(1).saturating_add(word.len())
            };
            if needed > width {
                out.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len = len.saturating_add(1);
            }
            len = len.saturating_add(word.len());
            line.extend(word);
        }
        out.push(line);
    }

    out
}

fn render_chat(
    frame: &mut Frame,
    area: Rect,
    conversation: &Conversation,
    chrome: &Chrome,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(theme.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = usize::from(inner.width.saturating_sub(2));
    let mut lines: Vec<Line> = Vec::new();

    for event in conversation.transcript() {
        let text = chrome.typewriter.visible(event);
        let (marker, style) = match event.role {
            ChatRole::User => (
                "› ",
                Style::default().fg(theme.user).add_modifier(Modifier::BOLD),
            ),
            ChatRole::Assistant => ("● ", Style::default().fg(theme.assistant)),
        };
        for (i, row) in wrap_text(text, width).into_iter().enumerate() {
            let prefix = if i == 0 { marker } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(prefix, style),
                Span::styled(row, style),
            ]));
        }
        lines.push(Line::default());
    }

    let session = conversation.session();
    for task in session.tasks() {
        let mut spans = vec![
            Span::styled("  ✓ ", Style::default().fg(theme.success)),
            Span::styled(
                format!("{} ", task_glyph(task.kind)),
                Style::default().fg(theme.accent),
            ),
            Span::styled(task.label.clone(), Style::default().fg(theme.user)),
        ];
        if let Some(file) = &task.file_name {
            spans.push(Span::styled(
                format!(" {file}"),
                Style::default().fg(theme.muted),
            ));
        }
        lines.push(Line::from(spans));
    }

    if conversation.is_busy() {
        let seconds_left = session.remaining().as_millis().div_ceil(1000);
        let mut spans = vec![
            Span::styled(
                format!("{} ", spinner_at(session.virtual_time().as_millis())),
                Style::default().fg(theme.working),
            ),
            Span::styled(
                "Working on your project...",
                Style::default().fg(theme.working),
            ),
        ];
        if session.is_running() {
            spans.push(Span::styled(
                format!("  {seconds_left}s left"),
                Style::default().fg(theme.muted),
            ));
        }
        if !session.tasks().is_empty() {
            lines.push(Line::default());
        }
        lines.push(Line::from(spans));
    }

    // Keep the newest lines in view.
    let visible = usize::from(inner.height);
    let skip = lines.len().saturating_sub(visible);
    let lines: Vec<Line> = lines.into_iter().skip(skip).collect();
    let body = Rect::new(
        inner.x.saturating_add(1),
        inner.y,
        inner.width.saturating_sub(1),
        inner.height,
    );
    frame.render_widget(Paragraph::new(lines), body);
}

// ─── Code ────────────────────────────────────────────────────────

fn progress_bar(progress: u8, width: usize) -> String {
    let filled = usize::from(progress)
        .saturating_mul(width)
        .checked_div(usize::from(MAX_PROGRESS))
        .unwrap_or(0)
        .min(width);
    format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(width.saturating_sub(filled))
    )
}

fn render_code(frame: &mut Frame, area: Rect, conversation: &Conversation, theme: &Theme) {
    let session = conversation.session();
    let area = Rect::new(
        area.x.saturating_add(1),
        area.y,
        area.width.saturating_sub(1),
        area.height,
    );

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Progress
            Constraint::Length(1), // File tab
            Constraint::Min(1),    // Body
        ])
        .split(area);

    let progress = session.progress();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                format!("Task Progress {progress}/{MAX_PROGRESS} "),
                Style::default().fg(theme.user).add_modifier(Modifier::BOLD),
            ),
            Span::styled(progress_bar(progress, 20), Style::default().fg(theme.accent)),
        ])),
        rows[0],
    );

    if conversation.view() == View::Preview {
        render_preview(frame, rows[1], rows[2], conversation, theme);
        return;
    }

    let tab = match session.current_chunk() {
        Some(chunk) => Line::from(vec![
            Span::styled(
                format!(" {} ", chunk.file_name),
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::REVERSED),
            ),
            Span::styled(
                format!("  {}", chunk.file_path),
                Style::default().fg(theme.muted),
            ),
        ]),
        None => Line::default(),
    };
    frame.render_widget(Paragraph::new(tab), rows[1]);

    let body = rows[2];
    let visible_lines = session.visible_lines();
    let mut lines: Vec<Line> = Vec::new();

    if visible_lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Waiting for code...",
            Style::default().fg(theme.muted),
        )));
    } else {
        let footer = if session.is_completed() { 2 } else { 0 };
        let room = usize::from(body.height).saturating_sub(footer);
        let skip = visible_lines.len().saturating_sub(room);
        let gutter = visible_lines.len().to_string().len();
        for (i, code) in visible_lines.iter().enumerate().skip(skip) {
            let mut spans = vec![Span::styled(
                format!("{:>gutter$} │ ", i.saturating_add(1)),
                Style::default().fg(theme.line_number),
            )];
            spans.extend(highlight(code, theme).spans);
            lines.push(Line::from(spans));
        }
    }

    if session.is_completed() {
        let name = session.script().map_or("", |s| s.name.as_str());
        lines.push(Line::from(vec![
            Span::styled("✓ ", Style::default().fg(theme.success)),
            Span::styled(
                format!("Deploy completed {name}"),
                Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
            ),
        ]));
        lines.push(Line::from(Span::styled(
            "[Tab] preview",
            Style::default().fg(theme.muted),
        )));
    }

    frame.render_widget(Paragraph::new(lines), body);
}

fn render_preview(
    frame: &mut Frame,
    tab_area: Rect,
    body: Rect,
    conversation: &Conversation,
    theme: &Theme,
) {
    let name = conversation
        .session()
        .script()
        .map_or("", |s| s.name.as_str());
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(
                " Preview ",
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::REVERSED),
            ),
            Span::styled(format!("  {name}"), Style::default().fg(theme.muted)),
        ])),
        tab_area,
    );

    let artifact = conversation.session().artifact().unwrap_or_default();
    let lines: Vec<Line> = artifact
        .lines()
        .map(|l| highlight(l, theme))
        .collect();
    frame.render_widget(Paragraph::new(lines), body);
}

// ─── Input & status ──────────────────────────────────────────────

fn render_input(
    frame: &mut Frame,
    area: Rect,
    conversation: &Conversation,
    chrome: &Chrome,
    theme: &Theme,
) {
    let border = Paragraph::new(Line::from(Span::styled(
        "╌".repeat(usize::from(area.width)),
        Style::default().fg(theme.border),
    )));
    frame.render_widget(border, Rect::new(area.x, area.y, area.width, 1));
    let line_area = Rect::new(
        area.x,
        area.y.saturating_add(1),
        area.width,
        area.height.saturating_sub(1),
    );

    let line = if conversation.is_busy() {
        let name = conversation.active_script().map_or("", |s| s.name.as_str());
        Line::from(Span::styled(
            format!("  Building {name}... (Ctrl+N for a new chat)"),
            Style::default().fg(theme.muted),
        ))
    } else if chrome.input.is_empty() {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.accent)),
            Span::styled("█", Style::default().fg(theme.user)),
            Span::styled(
                " Ask OK Computer to build something...",
                Style::default().fg(theme.muted),
            ),
        ])
    } else {
        let split = chrome
            .input
            .char_indices()
            .nth(chrome.cursor)
            .map_or(chrome.input.len(), |(i, _)| i);
        let (before, after) = chrome.input.split_at(split);
        let mut rest = after.chars();
        let under = rest.next().map_or_else(|| " ".to_owned(), String::from);
        Line::from(vec![
            Span::styled("> ", Style::default().fg(theme.accent)),
            Span::styled(before.to_owned(), Style::default().fg(theme.user)),
            Span::styled(
                under,
                Style::default().fg(theme.user).add_modifier(Modifier::REVERSED),
            ),
            Span::styled(rest.as_str().to_owned(), Style::default().fg(theme.user)),
        ])
    };
    frame.render_widget(Paragraph::new(line), line_area);
}

fn render_status(frame: &mut Frame, area: Rect, conversation: &Conversation, theme: &Theme) {
    let session = conversation.session();
    let state = if conversation.pending_script().is_some() {
        "starting"
    } else if session.is_running() {
        "running"
    } else if session.is_completed() {
        "completed"
    } else {
        "idle"
    };

    let hints = "Enter send · 1-3 presets · Ctrl+N new chat · Tab code/preview · Esc quit";
    let left = format!(" OK Computer · {state}");
    let pad = usize::from(area.width)
        .saturating_sub(left.chars().count())
        .saturating_sub(hints.chars().count())
        .saturating_sub(1);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(left, Style::default().fg(theme.accent)),
            Span::raw(" ".repeat(pad)),
            Span::styled(hints, Style::default().fg(theme.muted)),
        ])),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0, 10), "░░░░░░░░░░");
        assert_eq!(progress_bar(5, 10), "█████░░░░░");
        assert_eq!(progress_bar(10, 4), "████");
    }

    #[test]
    fn test_every_task_kind_has_a_glyph() {
        for kind in [
            TaskKind::ReadTodo,
            TaskKind::WriteTodo,
            TaskKind::CreateFile,
            TaskKind::Thinking,
            TaskKind::Deploy,
        ] {
            assert!(!task_glyph(kind).is_empty());
        }
    }
}
