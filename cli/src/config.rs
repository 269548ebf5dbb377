//! Loading command-tree definitions from disk.
//!
//! The format is picked by extension: `.yaml` and `.yml` are read as YAML,
//! everything else as JSON.
//!
//! # Example YAML
//!
//! ```yaml
//! name: git
//! error_code: 2
//! arguments:
//!   - name: verbose
//!     short: v
//!     type: boolean
//! subcommands:
//!   - name: commit
//!     arguments:
//!       - name: message
//!         short: m
//!         required: true
//! ```

use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use argweave_core::{Command, CommandDefinition};
use tracing::debug;

use crate::error::Result;

/// Reads a definition without validating it.
pub fn load_definition(path: impl AsRef<Path>) -> Result<CommandDefinition> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let definition: CommandDefinition = match path.extension().and_then(OsStr::to_str) {
        Some("yaml" | "yml") => serde_yaml::from_reader(reader)?,
        _ => serde_json::from_reader(reader)?,
    };
    debug!(
        path = %path.display(),
        command = %definition.name,
        "loaded definition"
    );
    Ok(definition)
}

/// Reads a definition and builds the validated command tree.
pub fn load_command(path: impl AsRef<Path>) -> Result<Command> {
    let definition = load_definition(path)?;
    Ok(Command::try_from(&definition)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("tool.yml");
        std::fs::write(&yaml, "name: tool\narguments:\n  - name: flag\n    type: boolean\n").unwrap();
        let command = load_command(&yaml).unwrap();
        assert_eq!(command.arguments()[0].name(), "flag");

        let json = dir.path().join("tool.def");
        std::fs::write(&json, r#"{"name":"tool","subcommands":[{"name":"run"}]}"#).unwrap();
        let command = load_command(&json).unwrap();
        assert!(command.find_subcommand("run").is_some());
    }

    #[test]
    fn test_errors_are_classified() {
        let dir = tempfile::tempdir().unwrap();

        let missing = load_command(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(CliError::Io(_))));

        let bad_json = dir.path().join("bad.json");
        std::fs::write(&bad_json, "{ not json").unwrap();
        assert!(matches!(load_command(&bad_json), Err(CliError::Json(_))));

        let invalid = dir.path().join("invalid.yaml");
        std::fs::write(&invalid, "name: tool\nsubcommands:\n  - name: a\n  - name: a\n").unwrap();
        assert!(matches!(load_command(&invalid), Err(CliError::Definition(_))));
    }
}
