//! Color theme for the TUI.

use ratatui::style::Color;

/// Braille spinner frames for the "working" indicator.
const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Spinner frame for a virtual time, so snapshots stay deterministic.
pub(crate) fn spinner_at(elapsed_ms: u128) -> &'static str {
    let len = u128::try_from(SPINNER.len()).unwrap_or(1);
    let index = elapsed_ms
        .checked_div(100)
        .and_then(|step| step.checked_rem(len))
        .unwrap_or(0);
    SPINNER[usize::try_from(index).unwrap_or(0)]
}

/// Color theme - works on both light and dark terminals
#[derive(Debug, Clone)]
pub(crate) struct Theme {
    // ── Chat ──
    /// User messages and input text
    pub(crate) user: Color,
    /// Assistant messages
    pub(crate) assistant: Color,
    /// Muted/metadata text
    pub(crate) muted: Color,
    /// Accent for titles and the file tab
    pub(crate) accent: Color,
    /// Completed tasks and deploy lines
    pub(crate) success: Color,
    /// "Working" indicator
    pub(crate) working: Color,
    /// Border color
    pub(crate) border: Color,

    // ── Code ──
    /// Line numbers
    pub(crate) line_number: Color,
    /// Comments
    pub(crate) comment: Color,
    /// String literals
    pub(crate) string: Color,
    /// Keywords
    pub(crate) keyword: Color,
    /// Numeric literals
    pub(crate) number: Color,
    /// Called identifiers
    pub(crate) call: Color,
    /// Everything else
    pub(crate) code: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            user: Color::White,
            assistant: Color::Gray,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            success: Color::Green,
            working: Color::Magenta,
            border: Color::DarkGray,

            line_number: Color::DarkGray,
            comment: Color::DarkGray,
            string: Color::Green,
            keyword: Color::Magenta,
            number: Color::Yellow,
            call: Color::LightBlue,
            code: Color::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_at(0), "⠋");
        assert_eq!(spinner_at(100), "⠙");
        assert_eq!(spinner_at(1000), "⠋");
    }
}
