//! Parsed-result tree mirroring the matched command path.

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::value::ParsedValue;

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    name: String,
    value: Option<ParsedValue>,
    used: bool,
    bound: bool,
}

/// Values bound at one command level, plus the matched subcommand's
/// result.
///
/// Every declared argument has an entry, in declaration order, whose value
/// is the bound value, the default, the type's initial value, or nothing.
///
/// # Examples
///
/// ```
/// use argweave_core::{ArgumentParser, ArgumentSpec, BooleanType, Command, IntegerType};
///
/// # fn main() -> Result<(), argweave_core::DefinitionError> {
/// let root = Command::new("tool")?
///     .argument(ArgumentSpec::new("quiet", BooleanType).short('q'))?
///     .subcommand(Command::new("run")?.argument(ArgumentSpec::new("jobs", IntegerType))?)?;
///
/// let report = ArgumentParser::new(root).parse("-q run --jobs 4");
/// let args = report.arguments();
/// assert_eq!(args.get("quiet").and_then(|v| v.as_bool()), Some(true));
/// assert_eq!(args.get_path("run.jobs").and_then(|v| v.as_int()), Some(4));
/// assert_eq!(args.matched_path(), vec!["tool", "run"]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedArguments {
    command: String,
    entries: Vec<Entry>,
    forward_value: Option<String>,
    subcommand: Option<Box<ParsedArguments>>,
}

impl ParsedArguments {
    pub(crate) fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            entries: Vec::new(),
            forward_value: None,
            subcommand: None,
        }
    }

    /// Records one argument. `bound` is set when the value came from the
    /// input rather than a default.
    pub(crate) fn push(
        &mut self,
        name: impl Into<String>,
        value: Option<ParsedValue>,
        used: bool,
        bound: bool,
    ) {
        self.entries.push(Entry {
            name: name.into(),
            value,
            used,
            bound,
        });
    }

    pub(crate) fn set_forward_value(&mut self, value: Option<String>) {
        self.forward_value = value;
    }

    pub(crate) fn set_subcommand(&mut self, sub: ParsedArguments) {
        self.subcommand = Some(Box::new(sub));
    }

    /// Name of the command this level belongs to.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Value of the argument declared at this level as `name`.
    pub fn get(&self, name: &str) -> Option<&ParsedValue> {
        self.entry(name).and_then(|e| e.value.as_ref())
    }

    /// Returns `true` when the argument appeared in the input.
    pub fn was_used(&self, name: &str) -> bool {
        self.entry(name).is_some_and(|e| e.used)
    }

    /// Returns `true` when the input supplied an accepted value.
    pub fn was_bound(&self, name: &str) -> bool {
        self.entry(name).is_some_and(|e| e.bound)
    }

    /// Returns `true` when `name` is declared at this level.
    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Applies a typed extraction function to a value.
    pub fn extract<T>(&self, name: &str, f: impl FnOnce(&ParsedValue) -> Option<T>) -> Option<T> {
        self.get(name).and_then(f)
    }

    /// Resolves a dotted path: every segment but the last names a
    /// subcommand, the last one an argument (`"remote.add.name"`).
    pub fn get_path(&self, path: &str) -> Option<&ParsedValue> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let name = segments.pop()?;
        let mut level = self;
        for segment in segments {
            level = level.subcommand_named(segment)?;
        }
        level.get(name)
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&ParsedValue>)> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.value.as_ref()))
    }

    /// Result of the subcommand that was invoked, if any.
    pub fn subcommand(&self) -> Option<&ParsedArguments> {
        self.subcommand.as_deref()
    }

    pub fn subcommand_named(&self, name: &str) -> Option<&ParsedArguments> {
        self.subcommand().filter(|s| s.command == name)
    }

    /// Command names from this level down to the innermost matched one.
    pub fn matched_path(&self) -> Vec<&str> {
        let mut path = vec![self.command.as_str()];
        let mut level = self;
        while let Some(sub) = level.subcommand() {
            path.push(sub.command.as_str());
            level = sub;
        }
        path
    }

    /// Text after the forwarding marker, from the innermost level that has
    /// one.
    pub fn forward_value(&self) -> Option<&str> {
        self.subcommand()
            .and_then(ParsedArguments::forward_value)
            .or(self.forward_value.as_deref())
    }

    fn entry(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

struct Entries<'a>(&'a [Entry]);

impl Serialize for Entries<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.name, &entry.value)?;
        }
        map.end()
    }
}

impl Serialize for ParsedArguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ParsedArguments", 4)?;
        state.serialize_field("command", &self.command)?;
        state.serialize_field("arguments", &Entries(&self.entries))?;
        state.serialize_field("forward_value", &self.forward_value)?;
        state.serialize_field("subcommand", &self.subcommand)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedArguments {
        let mut inner = ParsedArguments::new("add");
        inner.push("name", Some(ParsedValue::Text("origin".into())), true, true);
        inner.set_forward_value(Some("rest".into()));

        let mut root = ParsedArguments::new("remote");
        root.push("verbose", Some(ParsedValue::Bool(false)), false, false);
        root.push("config", None, false, false);
        root.set_subcommand(inner);
        root
    }

    #[test]
    fn test_lookup_and_usage() {
        let args = sample();
        assert_eq!(args.get("verbose"), Some(&ParsedValue::Bool(false)));
        assert!(!args.was_used("verbose"));
        assert!(!args.was_bound("verbose"));
        assert!(args.subcommand().is_some_and(|s| s.was_bound("name")));
        assert!(args.contains("config"));
        assert_eq!(args.get("config"), None);
        assert!(!args.contains("missing"));
    }

    #[test]
    fn test_paths() {
        let args = sample();
        assert_eq!(
            args.get_path("add.name").and_then(ParsedValue::as_str),
            Some("origin")
        );
        assert_eq!(args.get_path("other.name"), None);
        assert_eq!(args.get_path("verbose"), Some(&ParsedValue::Bool(false)));
        assert_eq!(args.matched_path(), vec!["remote", "add"]);
        assert_eq!(args.forward_value(), Some("rest"));
    }

    #[test]
    fn test_extract() {
        let args = sample();
        let name: Option<String> = args
            .subcommand()
            .and_then(|s| s.extract("name", |v| v.as_str().map(str::to_uppercase)));
        assert_eq!(name.as_deref(), Some("ORIGIN"));
    }

    #[test]
    fn test_serializes_in_declaration_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"command":"remote","arguments":{"verbose":false,"config":null},"forward_value":null,"subcommand":{"command":"add","arguments":{"name":"origin"},"forward_value":"rest","subcommand":null}}"#
        );
    }
}
