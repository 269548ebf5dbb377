//! Parsed values and the value-type capability interface.
//!
//! A value type declares how many raw values it consumes ([`ValueArity`])
//! and turns those raw texts into a [`ParsedValue`]. The built-in types
//! cover strings, integers, booleans, files and key/value maps; user types
//! implement [`ArgumentType`] directly or wrap a closure with [`from_fn`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::arity::ValueArity;
use crate::diagnostic::Severity;

/// A value bound to an argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParsedValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    Path(PathBuf),
    List(Vec<ParsedValue>),
    Map(BTreeMap<String, ParsedValue>),
}

impl ParsedValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ParsedValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ParsedValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

/// Rejection of raw values by a value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueError {
    pub message: String,
    pub severity: Severity,
}

impl ValueError {
    /// An ERROR-severity rejection.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Capability interface implemented by every argument value type.
pub trait ArgumentType: fmt::Debug + Send + Sync {
    /// How many raw values this type consumes.
    fn arity(&self) -> ValueArity;

    /// Parses the raw values, given in encounter order. Only called with a
    /// value count inside [`arity`](ArgumentType::arity).
    fn parse(&self, values: &[&str]) -> Result<ParsedValue, ValueError>;

    /// Value an argument holds when it was never used and has no default.
    fn initial_value(&self) -> Option<ParsedValue> {
        None
    }
}

/// A single string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringType;

impl ArgumentType for StringType {
    fn arity(&self) -> ValueArity {
        ValueArity::ONE
    }

    fn parse(&self, values: &[&str]) -> Result<ParsedValue, ValueError> {
        single(values).map(|v| ParsedValue::Text(v.to_string()))
    }
}

/// A list of strings with a configurable arity.
#[derive(Debug, Clone, Copy)]
pub struct StringsType {
    arity: ValueArity,
}

impl StringsType {
    pub fn new(arity: ValueArity) -> Self {
        Self { arity }
    }
}

impl Default for StringsType {
    fn default() -> Self {
        Self::new(ValueArity::AT_LEAST_ONE)
    }
}

impl ArgumentType for StringsType {
    fn arity(&self) -> ValueArity {
        self.arity
    }

    fn parse(&self, values: &[&str]) -> Result<ParsedValue, ValueError> {
        Ok(ParsedValue::List(
            values
                .iter()
                .map(|v| ParsedValue::Text((*v).to_string()))
                .collect(),
        ))
    }
}

/// A signed integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntegerType;

impl ArgumentType for IntegerType {
    fn arity(&self) -> ValueArity {
        ValueArity::ONE
    }

    fn parse(&self, values: &[&str]) -> Result<ParsedValue, ValueError> {
        let raw = single(values)?;
        raw.parse::<i64>()
            .map(ParsedValue::Integer)
            .map_err(|_| ValueError::new(format!("invalid integer value: {raw:?}")))
    }
}

/// A flag. Takes no values on the command line and starts as `false`.
///
/// When parsing a declared default, one textual boolean is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanType;

impl ArgumentType for BooleanType {
    fn arity(&self) -> ValueArity {
        ValueArity::NONE
    }

    fn parse(&self, values: &[&str]) -> Result<ParsedValue, ValueError> {
        match values {
            [] => Ok(ParsedValue::Bool(true)),
            [raw] => match raw.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(ParsedValue::Bool(true)),
                "false" | "no" | "0" => Ok(ParsedValue::Bool(false)),
                _ => Err(ValueError::new(format!("invalid boolean value: {raw:?}"))),
            },
            _ => Err(ValueError::new("expected at most one boolean value")),
        }
    }

    fn initial_value(&self) -> Option<ParsedValue> {
        Some(ParsedValue::Bool(false))
    }
}

/// A filesystem path, optionally required to exist.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileType {
    must_exist: bool,
}

impl FileType {
    /// A path that must exist when parsed.
    pub fn existing() -> Self {
        Self { must_exist: true }
    }
}

impl ArgumentType for FileType {
    fn arity(&self) -> ValueArity {
        ValueArity::ONE
    }

    fn parse(&self, values: &[&str]) -> Result<ParsedValue, ValueError> {
        let path = PathBuf::from(single(values)?);
        if self.must_exist && !path.exists() {
            return Err(ValueError::new(format!(
                "file not found: {}",
                path.display()
            )));
        }
        Ok(ParsedValue::Path(path))
    }
}

/// `key=value` pairs whose values are parsed by an inner single-value type.
///
/// The scanner splits unquoted text on `=`, so pairs are written quoted:
/// `--env ["a=1" "b=2"]`.
#[derive(Debug, Clone)]
pub struct KeyValuesType {
    inner: Arc<dyn ArgumentType>,
}

impl KeyValuesType {
    pub fn new(inner: impl ArgumentType + 'static) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl Default for KeyValuesType {
    fn default() -> Self {
        Self::new(StringType)
    }
}

impl ArgumentType for KeyValuesType {
    fn arity(&self) -> ValueArity {
        ValueArity::AT_LEAST_ONE
    }

    fn parse(&self, values: &[&str]) -> Result<ParsedValue, ValueError> {
        let mut map = BTreeMap::new();
        for raw in values {
            let Some((key, value)) = raw.split_once('=') else {
                return Err(ValueError::new(format!(
                    "expected key=value pair, found {raw:?}"
                )));
            };
            let key = key.trim();
            if key.is_empty() {
                return Err(ValueError::new(format!("empty key in pair {raw:?}")));
            }
            if map.contains_key(key) {
                return Err(ValueError::new(format!("duplicate key {key:?}")));
            }
            map.insert(key.to_string(), self.inner.parse(&[value.trim()])?);
        }
        Ok(ParsedValue::Map(map))
    }
}

type ParseFn = dyn Fn(&[&str]) -> Result<ParsedValue, ValueError> + Send + Sync;

/// A value type backed by a closure.
pub struct FnType {
    arity: ValueArity,
    parse: Box<ParseFn>,
}

impl fmt::Debug for FnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnType")
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl ArgumentType for FnType {
    fn arity(&self) -> ValueArity {
        self.arity
    }

    fn parse(&self, values: &[&str]) -> Result<ParsedValue, ValueError> {
        (self.parse)(values)
    }
}

/// Wraps a closure as a value type.
///
/// # Examples
///
/// ```
/// use argweave_core::{ArgumentType, ParsedValue, ValueArity, from_fn};
///
/// let upper = from_fn(ValueArity::ONE, |values| {
///     Ok(ParsedValue::Text(values[0].to_uppercase()))
/// });
/// assert_eq!(upper.parse(&["abc"]).unwrap(), ParsedValue::Text("ABC".into()));
/// ```
pub fn from_fn<F>(arity: ValueArity, parse: F) -> FnType
where
    F: Fn(&[&str]) -> Result<ParsedValue, ValueError> + Send + Sync + 'static,
{
    FnType {
        arity,
        parse: Box::new(parse),
    }
}

fn single<'a>(values: &[&'a str]) -> Result<&'a str, ValueError> {
    match values {
        [value] => Ok(*value),
        _ => Err(ValueError::new(format!(
            "expected exactly one value, received {}",
            values.len()
        ))),
    }
}
