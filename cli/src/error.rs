//! Error type for the `argweave` binary.

use argweave_core::DefinitionError;
use thiserror::Error;

/// Failures that stop a CLI invocation before or instead of a parse.
///
/// Problems in the parsed input itself are diagnostics, not errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Definition file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The definition was well-formed data but not a valid command tree.
    #[error("invalid definition: {0}")]
    Definition(#[from] DefinitionError),
}

/// Convenience alias for results with [`CliError`].
pub type Result<T> = std::result::Result<T, CliError>;
