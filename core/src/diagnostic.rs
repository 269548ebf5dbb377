//! Structured, non-fatal records of tokenizing and parsing problems.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::arity::ValueArity;

/// How serious a diagnostic is. Ordered `Info < Warning < Error`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    #[default]
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// What went wrong.
///
/// The first four variants come from the scanner, the rest from the token
/// consumer and argument finalization.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum DiagnosticKind {
    #[error("tuple already open")]
    TupleAlreadyOpen,
    #[error("unexpected tuple close")]
    UnexpectedTupleClose,
    #[error("tuple not closed")]
    TupleNotClosed,
    #[error("string not closed")]
    StringNotClosed,
    #[error("argument {0:?} not found")]
    ArgumentNotFound(String),
    #[error("incorrect number of values: expected {expected}, received {captured}")]
    ArgIncorrectValueNumber { expected: ValueArity, captured: usize },
    #[error("argument used too many times: allowed {max}, used {used}")]
    ArgIncorrectUsagesCount { max: usize, used: usize },
    #[error("argument takes values but is not the last one in the name list")]
    ArgNameListTakeValues,
    #[error("token does not match any argument")]
    UnmatchedToken,
    #[error("required argument not used")]
    RequiredArgumentNotUsed,
    #[error("{0}")]
    InvalidValue(String),
}

impl DiagnosticKind {
    /// Returns `true` for diagnostics raised by the scanner.
    pub fn is_tokenizer_error(&self) -> bool {
        matches!(
            self,
            Self::TupleAlreadyOpen
                | Self::UnexpectedTupleClose
                | Self::TupleNotClosed
                | Self::StringNotClosed
        )
    }
}

/// A diagnostic with the context needed to render it.
///
/// `token_index` is local to the command level that produced it; the
/// [`ErrorAggregator`](crate::ErrorAggregator) translates it to a global
/// index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub token_index: usize,
    pub depth: usize,
    pub argument: Option<String>,
    pub value_count: Option<usize>,
}

impl Diagnostic {
    /// Creates an ERROR-severity diagnostic.
    pub fn new(kind: DiagnosticKind, token_index: usize, depth: usize) -> Self {
        let value_count = match &kind {
            DiagnosticKind::ArgIncorrectValueNumber { captured, .. } => Some(*captured),
            _ => None,
        };
        Self {
            kind,
            severity: Severity::Error,
            token_index,
            depth,
            argument: None,
            value_count,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_argument(mut self, argument: impl Into<String>) -> Self {
        self.argument = Some(argument.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
