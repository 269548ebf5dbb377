//! Construction-time errors for command trees.
//!
//! These indicate a mistake in the CLI definition itself, not in user
//! input, so they are returned from the builder calls immediately instead
//! of being collected as diagnostics.

use thiserror::Error;

/// Errors raised while declaring commands, arguments and arities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Command names must be non-empty and purely alphabetic.
    #[error("command name must be alphabetic: {0:?}")]
    InvalidCommandName(String),
    /// Argument names must be non-empty, contain no whitespace and not
    /// start with the argument prefix.
    #[error("invalid argument name: {0:?}")]
    InvalidArgumentName(String),
    /// Two arguments of one command share an alias or short name.
    #[error("duplicate argument identifier {identifier:?} in command {command:?}")]
    DuplicateArgument { command: String, identifier: String },
    /// Two subcommands of one command share a name.
    #[error("duplicate subcommand {name:?} in command {command:?}")]
    DuplicateSubcommand { command: String, name: String },
    /// `min` is greater than `max`.
    #[error("invalid value arity: min {min} is greater than max {max}")]
    InvalidArity { min: usize, max: usize },
    /// Tuple delimiters must be two distinct characters that do not clash
    /// with quotes, whitespace or `=`.
    #[error("invalid tuple delimiters: {open:?} {close:?}")]
    InvalidTupleDelimiters { open: char, close: char },
    /// A positional argument must accept at least one value.
    #[error("positional argument {0:?} must accept at least one value")]
    PositionalWithoutValues(String),
    /// A declared default could not be parsed by the argument's value type.
    #[error("invalid default for argument {argument:?}: {message}")]
    InvalidDefault { argument: String, message: String },
    /// Only `strings` arguments accept an explicit arity in a definition.
    #[error("argument {0:?} does not accept a configurable arity")]
    ArityNotConfigurable(String),
}

/// Convenience alias for results with [`DefinitionError`].
pub type Result<T> = std::result::Result<T, DefinitionError>;
