//! Shared command trees for the demos.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use argweave_core::{
    ArgumentSpec, BooleanType, Command, DefinitionError, FileType, IntegerType, KeyValuesType,
    ParsedValue, StringType, StringsType, TupleDelimiters, ValueArity, ValueError, from_fn,
};

/// A small git-like tree:
///
/// ```text
/// git [-v] [-C <dir>]
///   commit -m <msg> [--amend] [--author <name>] [<paths>...]
///   remote
///     add <name> <url> [--tags] [--env (k=v ...)]
///   log [-n <count>] [--format <short|full>]
/// ```
///
/// `counter` is bumped once for every accepted `--verbose`.
pub fn git_command(counter: Arc<AtomicUsize>) -> Result<Command, DefinitionError> {
    let format = from_fn(ValueArity::ONE, |values| match values[0] {
        "short" | "full" => Ok(ParsedValue::Text(values[0].to_string())),
        "oneline" => Err(ValueError::new("use --format short instead of oneline")
            .with_severity(argweave_core::Severity::Warning)),
        other => Err(ValueError::new(format!("unknown log format {other:?}"))),
    });

    let commit = Command::new("commit")?
        .description("Record changes")
        .error_code(3)
        .argument(
            ArgumentSpec::new("message", StringType)
                .short('m')
                .required()
                .description("Commit message"),
        )?
        .argument(ArgumentSpec::new("amend", BooleanType))?
        .argument(ArgumentSpec::new("author", StringType).alias("by"))?
        .argument(ArgumentSpec::new("paths", StringsType::new(ValueArity::ANY)).positional())?;

    let add = Command::new("add")?
        .argument(ArgumentSpec::new("name", StringType).positional())?
        .argument(ArgumentSpec::new("url", StringType).positional())?
        .argument(ArgumentSpec::new("tags", BooleanType).short('t'))?
        .argument(ArgumentSpec::new("env", KeyValuesType::default()))?;

    let remote = Command::new("remote")?
        .tuple_delimiters(TupleDelimiters::PARENTHESES)
        .subcommand(add)?;

    let log = Command::new("log")?
        .argument(
            ArgumentSpec::new("count", IntegerType)
                .short('n')
                .default_value(ParsedValue::Integer(10)),
        )?
        .argument(ArgumentSpec::new("format", format))?;

    Command::new("git")?
        .description("A git-like demo")
        .error_code(2)
        .argument(
            ArgumentSpec::new("verbose", BooleanType)
                .short('v')
                .on_value(move |_| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }),
        )?
        .argument(ArgumentSpec::new("directory", FileType::default()).short('C'))?
        .subcommand(commit)?
        .subcommand(remote)?
        .subcommand(log)
}
