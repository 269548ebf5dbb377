//! Declarative argument descriptions.

use std::fmt;
use std::sync::Arc;

use crate::arity::ValueArity;
use crate::error::{DefinitionError, Result};
use crate::value::{ArgumentType, ParsedValue};

/// Default prefix character for aliases (`--name`) and short names (`-n`).
pub const DEFAULT_PREFIX: char = '-';

type Callback = Arc<dyn Fn(&ParsedValue) + Send + Sync>;

/// One declared argument of a [`Command`](crate::Command).
///
/// The `name` is the argument's identifier: it keys the parsed result and
/// is matched as the long alias `--name`. Extra long aliases and a
/// one-character short name (`-n`) are optional. Positional arguments are
/// bound by encounter order before any named argument appears.
///
/// # Examples
///
/// ```
/// use argweave_core::{ArgumentSpec, IntegerType, StringType};
///
/// let count = ArgumentSpec::new("count", IntegerType)
///     .short('c')
///     .alias("num")
///     .required();
/// assert!(count.matches_alias("--count"));
/// assert!(count.matches_alias("--num"));
/// assert!(count.matches_short('c'));
///
/// let file = ArgumentSpec::new("file", StringType).positional();
/// assert!(file.is_positional());
/// ```
#[derive(Clone)]
pub struct ArgumentSpec {
    name: String,
    aliases: Vec<String>,
    short: Option<char>,
    prefix: char,
    positional: bool,
    required: bool,
    max_usages: usize,
    description: Option<String>,
    default: Option<ParsedValue>,
    value_type: Arc<dyn ArgumentType>,
    callback: Option<Callback>,
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>, value_type: impl ArgumentType + 'static) -> Self {
        Self::with_type(name, Arc::new(value_type))
    }

    /// Like [`new`](ArgumentSpec::new) for an already shared value type.
    pub fn with_type(name: impl Into<String>, value_type: Arc<dyn ArgumentType>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            short: None,
            prefix: DEFAULT_PREFIX,
            positional: false,
            required: false,
            max_usages: 1,
            description: None,
            default: None,
            value_type,
            callback: None,
        }
    }

    /// Adds a one-character short name, used as `-c` or inside clusters.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Adds an extra long alias.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Changes the prefix character (default `-`).
    pub fn prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// How many times the argument may appear in one parse.
    pub fn max_usages(mut self, max: usize) -> Self {
        self.max_usages = max.max(1);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, value: ParsedValue) -> Self {
        self.default = Some(value);
        self
    }

    /// Registers a callback run after a parse for the bound value.
    pub fn on_value(mut self, callback: impl Fn(&ParsedValue) + Send + Sync + 'static) -> Self {
        self.callback = Some(Arc::new(callback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn short_name(&self) -> Option<char> {
        self.short
    }

    pub fn prefix_char(&self) -> char {
        self.prefix
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn usage_limit(&self) -> usize {
        self.max_usages
    }

    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn arity(&self) -> ValueArity {
        self.value_type.arity()
    }

    pub fn value_type(&self) -> &dyn ArgumentType {
        self.value_type.as_ref()
    }

    pub(crate) fn callback(&self) -> Option<&Callback> {
        self.callback.as_ref()
    }

    /// Returns `true` when `text` is `<prefix><prefix><name>` or one of the
    /// extra aliases with the doubled prefix.
    pub fn matches_alias(&self, text: &str) -> bool {
        let mut chars = text.chars();
        if chars.next() != Some(self.prefix) || chars.next() != Some(self.prefix) {
            return false;
        }
        let rest = chars.as_str();
        self.name == rest || self.aliases.iter().any(|a| a == rest)
    }

    pub fn matches_short(&self, c: char) -> bool {
        self.short == Some(c)
    }

    /// Identifiers that must be unique within a command: every long alias
    /// plus the short name.
    pub(crate) fn identifiers(&self) -> impl Iterator<Item = String> + '_ {
        std::iter::once(self.name.clone())
            .chain(self.aliases.iter().cloned())
            .chain(self.short.map(String::from))
    }

    /// Returns `true` when both specs share an alias or short name.
    pub fn conflicts_with(&self, other: &ArgumentSpec) -> bool {
        let theirs: Vec<String> = other.identifiers().collect();
        self.identifiers().any(|id| theirs.contains(&id))
    }

    /// Checks names and the positional contract.
    pub(crate) fn validate(&self) -> Result<()> {
        for alias in std::iter::once(&self.name).chain(&self.aliases) {
            if alias.is_empty()
                || alias.starts_with(self.prefix)
                || alias.chars().any(|c| c.is_whitespace() || c == '=')
            {
                return Err(DefinitionError::InvalidArgumentName(alias.clone()));
            }
        }
        if let Some(short) = self.short {
            if short == self.prefix || short.is_whitespace() || short == '=' {
                return Err(DefinitionError::InvalidArgumentName(short.to_string()));
            }
        }
        if self.positional && self.arity().is_zero() {
            return Err(DefinitionError::PositionalWithoutValues(self.name.clone()));
        }
        Ok(())
    }

    /// Value after a parse: the bound value, else the default, else the
    /// type's initial value.
    pub(crate) fn finalize(&self, bound: Option<ParsedValue>) -> Option<ParsedValue> {
        bound
            .or_else(|| self.default.clone())
            .or_else(|| self.value_type.initial_value())
    }
}

impl fmt::Debug for ArgumentSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentSpec")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("short", &self.short)
            .field("positional", &self.positional)
            .field("required", &self.required)
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}
