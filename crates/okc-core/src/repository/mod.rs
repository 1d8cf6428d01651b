//! Built-in script catalog and the query matcher.

mod scripts;

use std::sync::{Arc, LazyLock};

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::script::Script;

static BUILTIN: LazyLock<ScriptRepository> = LazyLock::new(|| {
    ScriptRepository::new(vec![
        scripts::pacman::build(),
        scripts::calculator::build(),
        scripts::xoxo::build(),
        scripts::snake::build(),
        scripts::todo::build(),
    ])
});

/// A preset-query shortcut shown on the home screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    /// Card title.
    pub title: String,
    /// Query submitted when the preset is chosen.
    pub query: String,
}

/// Ordered, read-only collection of scripts.
#[derive(Debug, Clone, Default)]
pub struct ScriptRepository {
    scripts: Vec<Arc<Script>>,
}

impl ScriptRepository {
    /// Create a repository from scripts in declaration order.
    #[must_use]
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: scripts.into_iter().map(Arc::new).collect(),
        }
    }

    /// The compiled-in catalog, built once on first use.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// All scripts in declaration order.
    #[must_use]
    pub fn scripts(&self) -> &[Arc<Script>] {
        &self.scripts
    }

    /// Look a script up by id.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::UnknownScript`] if no script has that id.
    pub fn lookup(&self, id: &str) -> CoreResult<Arc<Script>> {
        self.scripts
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownScript { id: id.to_string() })
    }

    /// Display names in declaration order.
    #[must_use]
    pub fn display_names(&self) -> Vec<&str> {
        self.scripts.iter().map(|s| s.name.as_str()).collect()
    }

    /// Home-screen shortcuts: the first three scripts.
    #[must_use]
    pub fn presets(&self) -> Vec<Preset> {
        self.scripts
            .iter()
            .take(3)
            .map(|s| Preset {
                title: s.name.clone(),
                query: s.query.clone(),
            })
            .collect()
    }

    /// Map a free-text query to a script.
    ///
    /// Scripts are scanned in declaration order and the first one for which
    /// any of these holds wins:
    ///
    /// 1. the lowercased query contains the script id;
    /// 2. the lowercased query contains the lowercased display name;
    /// 3. the lowercased trigger phrase contains the lowercased query.
    ///
    /// Rule 3 runs in the opposite direction to the first two, so a short
    /// query like `"calc"` still finds `Calculator`. A blank query matches
    /// nothing.
    #[must_use]
    pub fn match_query(&self, query: &str) -> Option<Arc<Script>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        let found = self.scripts.iter().find(|s| {
            query.contains(&s.id)
                || query.contains(&s.name.to_lowercase())
                || s.query.to_lowercase().contains(&query)
        });
        debug!(query = %query, script = ?found.map(|s| &s.id), "Matched query");
        found.cloned()
    }

    /// Like [`match_query`](Self::match_query) but reports a miss as an error.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NoScriptMatch`] when no script matches.
    pub fn find(&self, query: &str) -> CoreResult<Arc<Script>> {
        self.match_query(query)
            .ok_or_else(|| CoreError::NoScriptMatch {
                query: query.to_string(),
            })
    }

    /// Assistant reply used when a query matches nothing.
    #[must_use]
    pub fn help_message(&self) -> String {
        format!(
            "I can help you create: {}. Try asking \"Create pacman game\" or \"Create calculator\"!",
            self.display_names().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::script::TaskKind;

    fn matched_id(query: &str) -> Option<String> {
        ScriptRepository::builtin()
            .match_query(query)
            .map(|s| s.id.clone())
    }

    #[test]
    fn test_builtin_order() {
        let ids: Vec<_> = ScriptRepository::builtin()
            .scripts()
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, ["pacman", "calculator", "xoxo", "snake", "todo"]);
    }

    #[test]
    fn test_builtin_scripts_are_valid() {
        for script in ScriptRepository::builtin().scripts() {
            script
                .validate()
                .unwrap_or_else(|e| panic!("{} failed validation: {e}", script.id));
        }
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = ScriptRepository::builtin().lookup("snake").unwrap();
        let b = ScriptRepository::builtin().lookup("snake").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_match_by_id() {
        assert_eq!(matched_id("create pacman game").as_deref(), Some("pacman"));
        assert_eq!(matched_id("make me an XOXO board").as_deref(), Some("xoxo"));
    }

    #[test]
    fn test_match_by_display_name() {
        assert_eq!(matched_id("I want Tic Tac Toe").as_deref(), Some("xoxo"));
    }

    #[test]
    fn test_match_by_trigger_phrase() {
        assert_eq!(matched_id("  Create Calc ").as_deref(), Some("calculator"));
    }

    #[test]
    fn test_rule_three_prefers_declaration_order() {
        // "create" is contained in every trigger phrase.
        assert_eq!(matched_id("create").as_deref(), Some("pacman"));
    }

    #[test]
    fn test_no_match() {
        assert!(matched_id("build me a spaceship").is_none());
        assert!(matched_id("   ").is_none());
        assert!(matched_id("").is_none());
    }

    #[test]
    fn test_find_reports_no_match() {
        let err = ScriptRepository::builtin().find("spaceship").unwrap_err();
        assert!(matches!(err, CoreError::NoScriptMatch { query } if query == "spaceship"));
    }

    #[test]
    fn test_lookup_unknown() {
        let err = ScriptRepository::builtin().lookup("tetris").unwrap_err();
        assert!(matches!(err, CoreError::UnknownScript { .. }));
    }

    #[test]
    fn test_help_message_lists_every_name() {
        let help = ScriptRepository::builtin().help_message();
        assert_eq!(
            help,
            "I can help you create: Pacman Game, Calculator, Tic Tac Toe, Snake Game, Todo App. \
             Try asking \"Create pacman game\" or \"Create calculator\"!"
        );
    }

    #[test]
    fn test_presets() {
        let presets = ScriptRepository::builtin().presets();
        let queries: Vec<_> = presets.iter().map(|p| p.query.as_str()).collect();
        assert_eq!(
            queries,
            ["Create pacman game", "Create calculator", "Create xoxo game"]
        );
        assert_eq!(presets[0].title, "Pacman Game");
    }

    #[test]
    fn test_calculator_timeline() {
        let calc = ScriptRepository::builtin().lookup("calculator").unwrap();
        assert_eq!(calc.total_duration, Duration::from_secs(45));
        assert_eq!(calc.chunks.len(), 1);
        assert_eq!(calc.chunks[0].file_name, "calculator.js");
        assert_eq!(calc.chunks[0].offset, Duration::from_millis(5000));
        let deploy = calc.tasks.last().unwrap();
        assert_eq!(deploy.kind, TaskKind::Deploy);
        assert_eq!(deploy.label, "Deploy completed Calculator");
        assert!(calc.artifact.contains("<html"));
    }

    #[test]
    fn test_pacman_has_thinking_step() {
        let pacman = ScriptRepository::builtin().lookup("pacman").unwrap();
        assert_eq!(pacman.tasks.len(), 8);
        assert!(pacman.tasks.iter().any(|t| t.kind == TaskKind::Thinking));
    }
}
