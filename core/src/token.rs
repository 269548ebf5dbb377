//! Tokens produced by the per-command scanner.

use std::fmt;

use serde::Serialize;

/// Classification of a scanned chunk of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// Long-form argument alias, e.g. `--output`.
    ArgumentAlias,
    /// Cluster of one-character argument names, e.g. `-abc`.
    ArgumentNameList,
    /// Plain value (quoted string, tuple member or positional candidate).
    ArgumentValue,
    /// Opening tuple delimiter.
    TupleStart,
    /// Closing tuple delimiter.
    TupleEnd,
    /// Name of the subcommand the rest of the input was delegated to.
    SubCommandMarker,
    /// Raw text after a `--` marker, passed through uninterpreted.
    ForwardValue,
}

/// An immutable token with its position in the owning level's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub index: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, index: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            index,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?})", self.kind, self.text)
    }
}
