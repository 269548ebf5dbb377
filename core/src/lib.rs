//! Recursive command-line tokenizer and parser for nested command trees.
//!
//! This crate turns one raw input line into a tree of parsed values for a
//! declared tree of commands:
//!
//! - [`Command`] and [`ArgumentSpec`] declare the tree, each argument's
//!   value type ([`ArgumentType`]) and its value-count contract
//!   ([`ValueArity`]).
//! - [`tokenize`] scans the input character by character into [`Token`]s,
//!   handing the remainder to a fresh scanner whenever a chunk names a
//!   subcommand.
//! - The consumer binds tokens to arguments level by level and produces a
//!   [`ParsedArguments`] tree.
//! - [`ErrorAggregator`] merges the [`Diagnostic`]s of every level into one
//!   ordered report with whole-input token positions and an exit code.
//!
//! Problems in the input never abort a parse: they are collected as
//! diagnostics so a single pass reports all of them. Only mistakes in the
//! declaration itself are returned as [`DefinitionError`].
//!
//! # Example
//!
//! ```
//! use argweave_core::*;
//!
//! # fn main() -> Result<(), DefinitionError> {
//! let root = Command::new("git")?
//!     .argument(ArgumentSpec::new("verbose", BooleanType).short('v'))?
//!     .subcommand(
//!         Command::new("commit")?
//!             .argument(ArgumentSpec::new("message", StringType).short('m').required())?
//!             .argument(ArgumentSpec::new("paths", StringsType::default()))?,
//!     )?;
//!
//! let parser = ArgumentParser::new(root);
//! let report = parser.parse("-v commit -m 'first commit' --paths [src docs]");
//! assert!(!report.has_errors());
//! assert_eq!(
//!     report.arguments().get_path("commit.message").and_then(|v| v.as_str()),
//!     Some("first commit")
//! );
//!
//! let report = parser.parse("commit --paths [a");
//! assert_eq!(report.error_code(), 1);
//! assert_eq!(report.messages().len(), 2);
//! # Ok(())
//! # }
//! ```

mod argument;
mod arity;
mod command;
mod definition;
mod diagnostic;
mod error;
mod outcome;
mod parser;
mod report;
mod result;
mod token;
mod tokenizer;
mod value;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use argument::{ArgumentSpec, DEFAULT_PREFIX};
pub use arity::ValueArity;
pub use command::{Command, DEFAULT_ERROR_CODE, TupleDelimiters};
pub use definition::{ArgumentDefinition, CommandDefinition, ValueKind};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use error::DefinitionError;
pub use outcome::ParseOutcome;
pub use report::{ErrorAggregator, LevelDiagnostics, ReportedDiagnostic};
pub use result::ParsedArguments;
pub use token::{Token, TokenKind};
pub use tokenizer::{FORWARD_MARKER, TokenizedLevel, tokenize};
pub use value::{
    ArgumentType, BooleanType, FileType, FnType, IntegerType, KeyValuesType, ParsedValue,
    StringType, StringsType, ValueError, from_fn,
};

/// Parse-time policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Lowest severity that makes a parse fail. INFO never fails a parse, so
    /// `Info` behaves like `Warning`.
    pub fail_on: Severity,
    /// Lowest severity rendered by [`ParseReport::messages`].
    pub display_level: Severity,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            fail_on: Severity::Error,
            display_level: Severity::Info,
        }
    }
}

/// Entry point tying a command tree to a [`ParserConfig`].
///
/// The tree is only read during a parse, so one parser can serve any
/// number of parses, including concurrent ones.
#[derive(Debug, Clone)]
pub struct ArgumentParser {
    root: Command,
    config: ParserConfig,
}

impl ArgumentParser {
    pub fn new(root: Command) -> Self {
        Self::with_config(root, ParserConfig::default())
    }

    pub fn with_config(root: Command, config: ParserConfig) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    pub fn config(&self) -> ParserConfig {
        self.config
    }

    /// Scans `input` without binding anything.
    pub fn tokenize(&self, input: &str) -> TokenizedLevel<'_> {
        tokenize(&self.root, input)
    }

    /// Parses one input line.
    ///
    /// Value callbacks run after every level has been consumed, once per
    /// bound argument that no ERROR diagnostic refers to.
    pub fn parse(&self, input: &str) -> ParseReport {
        let level = tokenize(&self.root, input);
        let (arguments, levels) = parser::consume(&level);
        let aggregator = ErrorAggregator::new(levels);

        run_callbacks(&self.root, &arguments, aggregator.levels());
        debug!(
            command = self.root.name(),
            path = ?arguments.matched_path(),
            diagnostics = aggregator.levels().iter().map(|l| l.diagnostics.len()).sum::<usize>(),
            "parse finished"
        );

        ParseReport {
            arguments,
            aggregator,
            config: self.config,
        }
    }

    /// Parses argv-style input. Elements are joined with spaces; an element
    /// that is empty or contains whitespace or a quote is re-quoted so it
    /// stays one value.
    ///
    /// # Examples
    ///
    /// ```
    /// use argweave_core::{ArgumentParser, ArgumentSpec, Command, StringType};
    ///
    /// # fn main() -> Result<(), argweave_core::DefinitionError> {
    /// let root = Command::new("say")?.argument(ArgumentSpec::new("text", StringType).positional())?;
    /// let report = ArgumentParser::new(root).parse_args(["it's a \"test\""]);
    /// assert_eq!(
    ///     report.arguments().get("text").and_then(|v| v.as_str()),
    ///     Some("it's a \"test\"")
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn parse_args<I, S>(&self, args: I) -> ParseReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let line = args
            .into_iter()
            .map(|arg| quote_arg(arg.as_ref()).into_owned())
            .collect::<Vec<_>>()
            .join(" ");
        self.parse(&line)
    }
}

fn quote_arg(arg: &str) -> Cow<'_, str> {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'');
    if !needs_quotes {
        return Cow::Borrowed(arg);
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\'' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

/// Walks the matched command path alongside the result tree.
fn run_callbacks(root: &Command, arguments: &ParsedArguments, levels: &[LevelDiagnostics]) {
    let mut command = Some(root);
    let mut result = Some(arguments);

    for level in levels {
        let (Some(cmd), Some(args)) = (command, result) else {
            break;
        };

        for spec in cmd.arguments() {
            let Some(callback) = spec.callback() else {
                continue;
            };
            if !args.was_bound(spec.name()) {
                continue;
            }
            let rejected = level
                .diagnostics
                .iter()
                .any(|d| d.is_error() && d.argument.as_deref() == Some(spec.name()));
            if rejected {
                continue;
            }
            if let Some(value) = args.get(spec.name()) {
                callback(value);
            }
        }

        result = args.subcommand();
        command = result.and_then(|sub| cmd.find_subcommand(sub.command()));
    }
}

/// Outcome of one parse: the result tree plus every diagnostic.
#[derive(Debug, Clone)]
pub struct ParseReport {
    arguments: ParsedArguments,
    aggregator: ErrorAggregator,
    config: ParserConfig,
}

impl ParseReport {
    pub fn arguments(&self) -> &ParsedArguments {
        &self.arguments
    }

    pub fn into_arguments(self) -> ParsedArguments {
        self.arguments
    }

    /// Every diagnostic, outermost level first, then by position.
    pub fn diagnostics(&self) -> Vec<ReportedDiagnostic> {
        self.aggregator.diagnostics()
    }

    /// Rendered diagnostics at or above the configured display level.
    pub fn messages(&self) -> Vec<String> {
        self.aggregator.messages(self.config.display_level)
    }

    /// Returns `true` when a diagnostic reaches the configured `fail_on`
    /// severity.
    pub fn has_errors(&self) -> bool {
        self.aggregator.has_failures(self.config.fail_on)
    }

    /// Process exit code for this parse; zero on success.
    pub fn error_code(&self) -> i32 {
        self.aggregator.error_code(self.config.fail_on)
    }

    /// Whole-input token list.
    pub fn tokens(&self) -> &[Token] {
        self.aggregator.tokens()
    }

    pub fn aggregator(&self) -> &ErrorAggregator {
        &self.aggregator
    }
}
