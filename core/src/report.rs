//! Cross-level diagnostic aggregation and rendering.
//!
//! Each command level records diagnostics against its own token sequence.
//! The aggregator flattens the levels into one token list, translates
//! level-local token indices into global ones and renders the diagnostics
//! outermost level first, then by position.

use serde::Serialize;

use crate::command::DEFAULT_ERROR_CODE;
use crate::diagnostic::{Diagnostic, Severity};
use crate::token::Token;

/// Tokens and diagnostics of one matched command level.
#[derive(Debug, Clone, Serialize)]
pub struct LevelDiagnostics {
    pub command: String,
    pub depth: usize,
    pub error_code: Option<i32>,
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A diagnostic placed in the whole-input token list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedDiagnostic {
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
    /// Command names from the root to the level that produced it.
    pub command_path: Vec<String>,
    /// Index into the flattened token list.
    pub global_index: usize,
    /// Token at `global_index`, `None` when pointing past the end.
    pub token: Option<Token>,
}

impl ReportedDiagnostic {
    /// Single-line, user-facing message.
    pub fn render(&self) -> String {
        let d = &self.diagnostic;
        let mut context = vec![format!("command '{}'", self.command_path.join(" "))];
        if let Some(argument) = &d.argument {
            context.push(format!("argument '{argument}'"));
        }
        context.push(match &self.token {
            Some(token) => format!("token {} {:?}", self.global_index + 1, token.text),
            None => "end of input".to_string(),
        });
        format!("{}: {} ({})", d.severity, d.kind, context.join(", "))
    }
}

/// Collects the diagnostics of every matched level of one parse.
#[derive(Debug, Clone)]
pub struct ErrorAggregator {
    levels: Vec<LevelDiagnostics>,
    tokens: Vec<Token>,
}

impl ErrorAggregator {
    /// `levels` must be ordered outermost first.
    pub fn new(levels: Vec<LevelDiagnostics>) -> Self {
        let tokens = levels
            .iter()
            .flat_map(|level| level.tokens.iter().cloned())
            .collect();
        Self { levels, tokens }
    }

    pub fn levels(&self) -> &[LevelDiagnostics] {
        &self.levels
    }

    /// Flattened whole-input token list.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// All diagnostics ordered by depth, then by token position. Equal
    /// positions keep recording order (scanner before consumer).
    pub fn diagnostics(&self) -> Vec<ReportedDiagnostic> {
        let mut reported = Vec::new();
        let mut offset = 0;
        let mut path: Vec<String> = Vec::new();

        for level in &self.levels {
            path.push(level.command.clone());
            let mut local: Vec<&Diagnostic> = level.diagnostics.iter().collect();
            local.sort_by_key(|d| d.token_index);

            for diagnostic in local {
                let global_index = offset + diagnostic.token_index;
                reported.push(ReportedDiagnostic {
                    diagnostic: diagnostic.clone(),
                    command_path: path.clone(),
                    global_index,
                    token: self.tokens.get(global_index).cloned(),
                });
            }
            offset += level.tokens.len();
        }

        reported
    }

    /// Rendered messages at or above `display_level`.
    pub fn messages(&self, display_level: Severity) -> Vec<String> {
        self.diagnostics()
            .iter()
            .filter(|d| d.diagnostic.severity >= display_level)
            .map(ReportedDiagnostic::render)
            .collect()
    }

    /// Returns `true` when any diagnostic is at or above `fail_on`.
    ///
    /// INFO never fails a parse: a threshold below WARNING counts as WARNING.
    pub fn has_failures(&self, fail_on: Severity) -> bool {
        let threshold = fail_on.max(Severity::Warning);
        self.levels
            .iter()
            .flat_map(|level| &level.diagnostics)
            .any(|d| d.severity >= threshold)
    }

    /// Zero without failures, otherwise the code declared by the innermost
    /// matched command that declares one, or [`DEFAULT_ERROR_CODE`].
    pub fn error_code(&self, fail_on: Severity) -> i32 {
        if !self.has_failures(fail_on) {
            return 0;
        }
        self.levels
            .iter()
            .rev()
            .find_map(|level| level.error_code)
            .unwrap_or(DEFAULT_ERROR_CODE)
    }
}
