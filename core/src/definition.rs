//! Serializable command-tree definitions.
//!
//! [`CommandDefinition`] mirrors the builder API as plain data so a tree can
//! be written in YAML or JSON and converted into a validated [`Command`]
//! with [`TryFrom`]. Conversion runs the same checks as the builders and
//! additionally parses every declared `default` through its value type.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::argument::ArgumentSpec;
use crate::arity::ValueArity;
use crate::command::{Command, TupleDelimiters};
use crate::error::{DefinitionError, Result};
use crate::value::{
    ArgumentType, BooleanType, FileType, IntegerType, KeyValuesType, StringType, StringsType,
};

/// Built-in value types available to definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ValueKind {
    /// One string (the default).
    #[default]
    String,
    /// A list of strings; the only kind with a configurable arity.
    Strings,
    Integer,
    /// A flag taking no values.
    Boolean,
    /// A path.
    File,
    /// A path that must exist.
    ExistingFile,
    /// `key=value` pairs with string values.
    KeyValues,
}

/// Data form of an [`ArgumentSpec`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArgumentDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short: Option<char>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<char>,
    #[serde(default)]
    pub positional: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_usages: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_values: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_values: Option<usize>,
    /// Raw default text. Multi-value kinds split it on whitespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Data form of a [`Command`].
///
/// # Examples
///
/// ```
/// use argweave_core::{Command, CommandDefinition};
///
/// let yaml = r#"
/// name: deploy
/// error_code: 4
/// arguments:
///   - name: target
///     positional: true
///   - name: replicas
///     short: r
///     type: integer
///     default: "2"
/// subcommands:
///   - name: rollback
/// "#;
/// let definition: CommandDefinition = serde_yaml::from_str(yaml).unwrap();
/// let command = Command::try_from(&definition).unwrap();
/// assert_eq!(command.arguments().len(), 2);
/// assert!(command.find_subcommand("rollback").is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuple_delimiters: Option<TupleDelimiters>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDefinition>,
    #[serde(default)]
    pub subcommands: Vec<CommandDefinition>,
}

impl ArgumentDefinition {
    fn value_type(&self) -> Result<Arc<dyn ArgumentType>> {
        if self.kind == ValueKind::Strings {
            let min = self.min_values.unwrap_or(1);
            return Ok(Arc::new(StringsType::new(ValueArity::new(
                min,
                self.max_values,
            )?)));
        }
        if self.min_values.is_some() || self.max_values.is_some() {
            return Err(DefinitionError::ArityNotConfigurable(self.name.clone()));
        }
        Ok(match self.kind {
            ValueKind::String | ValueKind::Strings => Arc::new(StringType),
            ValueKind::Integer => Arc::new(IntegerType),
            ValueKind::Boolean => Arc::new(BooleanType),
            ValueKind::File => Arc::new(FileType::default()),
            ValueKind::ExistingFile => Arc::new(FileType::existing()),
            ValueKind::KeyValues => Arc::new(KeyValuesType::default()),
        })
    }
}

impl TryFrom<&ArgumentDefinition> for ArgumentSpec {
    type Error = DefinitionError;

    fn try_from(definition: &ArgumentDefinition) -> Result<Self> {
        let value_type = definition.value_type()?;

        let default = match &definition.default {
            Some(raw) => {
                let arity = value_type.arity();
                let single = arity.max().is_some_and(|max| max <= 1);
                let values: Vec<&str> = if single {
                    vec![raw.as_str()]
                } else {
                    raw.split_whitespace().collect()
                };
                if !single && !arity.contains(values.len()) {
                    return Err(DefinitionError::InvalidDefault {
                        argument: definition.name.clone(),
                        message: format!("expected {arity}, received {}", values.len()),
                    });
                }
                let parsed = value_type.parse(&values).map_err(|err| {
                    DefinitionError::InvalidDefault {
                        argument: definition.name.clone(),
                        message: err.message,
                    }
                })?;
                Some(parsed)
            }
            None => None,
        };

        let mut spec = ArgumentSpec::with_type(definition.name.clone(), value_type);
        if let Some(prefix) = definition.prefix {
            spec = spec.prefix(prefix);
        }
        if let Some(short) = definition.short {
            spec = spec.short(short);
        }
        for alias in &definition.aliases {
            spec = spec.alias(alias.clone());
        }
        if definition.positional {
            spec = spec.positional();
        }
        if definition.required {
            spec = spec.required();
        }
        if let Some(max) = definition.max_usages {
            spec = spec.max_usages(max);
        }
        if let Some(description) = &definition.description {
            spec = spec.description(description.clone());
        }
        if let Some(value) = default {
            spec = spec.default_value(value);
        }
        Ok(spec)
    }
}

impl TryFrom<&CommandDefinition> for Command {
    type Error = DefinitionError;

    fn try_from(definition: &CommandDefinition) -> Result<Self> {
        let mut command = Command::new(definition.name.clone())?;
        if let Some(description) = &definition.description {
            command = command.description(description.clone());
        }
        if let Some(code) = definition.error_code {
            command = command.error_code(code);
        }
        if let Some(d) = definition.tuple_delimiters {
            command = command.tuple_delimiters(TupleDelimiters::new(d.open, d.close)?);
        }
        for argument in &definition.arguments {
            command = command.argument(ArgumentSpec::try_from(argument)?)?;
        }
        for sub in &definition.subcommands {
            command = command.subcommand(Command::try_from(sub)?)?;
        }
        Ok(command)
    }
}
