//! Lightweight single-line syntax highlighting for the code panel.
//!
//! Good enough for the bundled JavaScript and HTML: it knows about `//`
//! comments, quoted strings, a fixed keyword list, numbers and identifiers
//! followed by `(`. Block comments and multi-line strings are not tracked
//! across lines.

use std::iter::Peekable;
use std::str::Chars;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

use super::Theme;

const KEYWORDS: &[&str] = &[
    "async", "await", "break", "case", "catch", "class", "const", "continue", "default",
    "delete", "do", "else", "export", "extends", "false", "finally", "for", "function", "if",
    "import", "in", "instanceof", "let", "new", "null", "of", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "yield",
];

/// Token classes, in the order they are matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Comment,
    String,
    Keyword,
    Number,
    Call,
    Plain,
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Split one line into classified tokens. Concatenating the token text gives
/// back the line.
pub(crate) fn tokenize(line: &str) -> Vec<(TokenKind, String)> {
    let mut tokens: Vec<(TokenKind, String)> = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        let (kind, text) = if c == '/' && starts_with(&chars, "//") {
            (TokenKind::Comment, chars.by_ref().collect())
        } else if matches!(c, '"' | '\'' | '`') {
            (TokenKind::String, take_string(&mut chars, c))
        } else if c.is_ascii_digit() {
            (TokenKind::Number, take_while(&mut chars, |c| {
                c.is_ascii_alphanumeric() || c == '.' || c == '_'
            }))
        } else if is_ident_start(c) {
            let ident = take_while(&mut chars, is_ident_char);
            let kind = if KEYWORDS.contains(&ident.as_str()) {
                TokenKind::Keyword
            } else if next_non_space(&chars) == Some('(') {
                TokenKind::Call
            } else {
                TokenKind::Plain
            };
            (kind, ident)
        } else {
            (TokenKind::Plain, take_while(&mut chars, |c| {
                !(c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '"' | '\'' | '`' | '/'))
            }))
        };

        // A lone '/' (division, closing tag) is plain text.
        let (kind, text) = if text.is_empty() {
            (TokenKind::Plain, chars.next().map(String::from).unwrap_or_default())
        } else {
            (kind, text)
        };

        match tokens.last_mut() {
            Some((last, buf)) if *last == kind && kind == TokenKind::Plain => buf.push_str(&text),
            _ => tokens.push((kind, text)),
        }
    }

    tokens
}

fn starts_with(chars: &Peekable<Chars<'_>>, prefix: &str) -> bool {
    let mut probe = chars.clone();
    prefix.chars().all(|p| probe.next() == Some(p))
}

fn next_non_space(chars: &Peekable<Chars<'_>>) -> Option<char> {
    chars.clone().find(|c| !c.is_whitespace())
}

fn take_while(chars: &mut Peekable<Chars<'_>>, keep: impl Fn(char) -> bool) -> String {
    let mut out = String::new();
    while let Some(c) = chars.next_if(|&c| keep(c)) {
        out.push(c);
    }
    out
}

/// Consume a quoted string, honoring backslash escapes. An unterminated
/// string runs to the end of the line.
fn take_string(chars: &mut Peekable<Chars<'_>>, quote: char) -> String {
    let mut out = String::new();
    if let Some(open) = chars.next() {
        out.push(open);
    }
    let mut escaped = false;
    for c in chars.by_ref() {
        out.push(c);
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            break;
        }
    }
    out
}

/// Render a code line as styled spans.
pub(crate) fn highlight(line: &str, theme: &Theme) -> Line<'static> {
    let spans: Vec<Span<'static>> = tokenize(line)
        .into_iter()
        .map(|(kind, text)| {
            let color = match kind {
                TokenKind::Comment => theme.comment,
                TokenKind::String => theme.string,
                TokenKind::Keyword => theme.keyword,
                TokenKind::Number => theme.number,
                TokenKind::Call => theme.call,
                TokenKind::Plain => theme.code,
            };
            Span::styled(text, Style::default().fg(color))
        })
        .collect();
    Line::from(spans)
}
