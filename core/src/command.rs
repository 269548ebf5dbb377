//! Command tree declaration.
//!
//! A [`Command`] is an immutable description once built: every builder
//! call validates its input immediately and returns the command by value,
//! so a tree is assembled with `?` chains. Per-parse state never lives on
//! the tree, which makes one tree reusable across parses and threads.

use serde::{Deserialize, Serialize};

use crate::argument::{ArgumentSpec, DEFAULT_PREFIX};
use crate::error::{DefinitionError, Result};

/// Opening and closing characters of a value tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleDelimiters {
    pub open: char,
    pub close: char,
}

impl TupleDelimiters {
    pub const SQUARE_BRACKETS: Self = Self {
        open: '[',
        close: ']',
    };
    pub const PARENTHESES: Self = Self {
        open: '(',
        close: ')',
    };
    pub const BRACES: Self = Self {
        open: '{',
        close: '}',
    };
    pub const ANGLE_BRACKETS: Self = Self {
        open: '<',
        close: '>',
    };

    /// Creates a delimiter pair.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidTupleDelimiters`] when both
    /// characters are equal, or either one is whitespace, a quote, `=`, a
    /// backslash or the default argument prefix.
    pub fn new(open: char, close: char) -> Result<Self> {
        let reserved = |c: char| {
            c.is_whitespace() || c == DEFAULT_PREFIX || matches!(c, '"' | '\'' | '=' | '\\')
        };
        if open == close || reserved(open) || reserved(close) {
            return Err(DefinitionError::InvalidTupleDelimiters { open, close });
        }
        Ok(Self { open, close })
    }
}

impl Default for TupleDelimiters {
    fn default() -> Self {
        Self::SQUARE_BRACKETS
    }
}

/// Exit code used by failed parses when no command on the matched path
/// declares one.
pub const DEFAULT_ERROR_CODE: i32 = 1;

/// A node of the command tree.
///
/// # Examples
///
/// ```
/// use argweave_core::{ArgumentSpec, BooleanType, Command, DefinitionError, StringType};
///
/// # fn main() -> Result<(), DefinitionError> {
/// let git = Command::new("git")?
///     .argument(ArgumentSpec::new("verbose", BooleanType).short('v'))?
///     .subcommand(
///         Command::new("commit")?
///             .argument(ArgumentSpec::new("message", StringType).short('m'))?
///             .error_code(3),
///     )?;
///
/// assert!(git.find_subcommand("commit").is_some());
/// assert!(matches!(
///     git.clone().subcommand(Command::new("commit")?),
///     Err(DefinitionError::DuplicateSubcommand { .. })
/// ));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    description: Option<String>,
    arguments: Vec<ArgumentSpec>,
    subcommands: Vec<Command>,
    tuple_delimiters: Option<TupleDelimiters>,
    error_code: Option<i32>,
}

impl Command {
    /// Creates an empty command.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidCommandName`] unless `name` is a
    /// non-empty alphabetic word.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() || !name.chars().all(char::is_alphabetic) {
            return Err(DefinitionError::InvalidCommandName(name));
        }
        Ok(Self {
            name,
            description: None,
            arguments: Vec::new(),
            subcommands: Vec::new(),
            tuple_delimiters: None,
            error_code: None,
        })
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the exit code reported when a parse ending in this command
    /// fails.
    pub fn error_code(mut self, code: i32) -> Self {
        self.error_code = Some(code);
        self
    }

    /// Adds an argument.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateArgument`] when the argument
    /// shares an alias or short name with an existing one, or the
    /// argument's own validation error.
    pub fn argument(mut self, argument: ArgumentSpec) -> Result<Self> {
        argument.validate()?;
        if let Some(existing) = self.arguments.iter().find(|a| a.conflicts_with(&argument)) {
            let identifier = argument
                .identifiers()
                .find(|id| existing.identifiers().any(|theirs| &theirs == id))
                .unwrap_or_else(|| argument.name().to_string());
            return Err(DefinitionError::DuplicateArgument {
                command: self.name.clone(),
                identifier,
            });
        }
        self.arguments.push(argument);
        Ok(self)
    }

    /// Adds a child command.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateSubcommand`] when a child with
    /// the same name exists.
    pub fn subcommand(mut self, command: Command) -> Result<Self> {
        if self.find_subcommand(&command.name).is_some() {
            return Err(DefinitionError::DuplicateSubcommand {
                command: self.name.clone(),
                name: command.name,
            });
        }
        self.subcommands.push(command);
        Ok(self)
    }

    /// Overrides the tuple delimiters for this command and, unless they
    /// override it again, its descendants.
    pub fn tuple_delimiters(mut self, delimiters: TupleDelimiters) -> Self {
        self.tuple_delimiters = Some(delimiters);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    pub fn subcommands(&self) -> &[Command] {
        &self.subcommands
    }

    /// Declared exit code, if any.
    pub fn declared_error_code(&self) -> Option<i32> {
        self.error_code
    }

    /// Delimiters declared on this command, if it overrides its parent's.
    pub fn declared_tuple_delimiters(&self) -> Option<TupleDelimiters> {
        self.tuple_delimiters
    }

    pub fn find_subcommand(&self, name: &str) -> Option<&Command> {
        self.subcommands.iter().find(|c| c.name == name)
    }

    /// Index of the argument whose long alias is `text` (prefix included).
    pub fn find_argument_by_alias(&self, text: &str) -> Option<usize> {
        self.arguments.iter().position(|a| a.matches_alias(text))
    }

    /// Index of the argument whose short name is `c`.
    pub fn find_argument_by_short(&self, c: char) -> Option<usize> {
        self.arguments.iter().position(|a| a.matches_short(c))
    }

    /// Indices of the positional arguments, in declaration order.
    pub fn positional_indices(&self) -> Vec<usize> {
        self.arguments
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_positional())
            .map(|(i, _)| i)
            .collect()
    }
}
