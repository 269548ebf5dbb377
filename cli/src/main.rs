use std::path::PathBuf;

use argweave_core::{ArgumentParser, ParserConfig, Severity};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

mod config;
mod error;
mod output;

use crate::error::Result;
use crate::output::OutputFormat;

/// Severities that can fail a parse.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum FailOn {
    Warning,
    Error,
}

impl From<FailOn> for Severity {
    fn from(fail_on: FailOn) -> Self {
        match fail_on {
            FailOn::Warning => Self::Warning,
            FailOn::Error => Self::Error,
        }
    }
}

/// CLI-side severity with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliSeverity {
    Info,
    Warning,
    Error,
}

impl From<CliSeverity> for Severity {
    fn from(severity: CliSeverity) -> Self {
        match severity {
            CliSeverity::Info => Self::Info,
            CliSeverity::Warning => Self::Warning,
            CliSeverity::Error => Self::Error,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "argweave")]
#[command(about = "Parse input lines against a declared command tree")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    debug: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse input against a definition and print the result tree.
    Parse(ParseArgs),
    /// Print the per-level token tree for an input.
    Tokens(TokensArgs),
    /// Validate a definition and print its command tree.
    Check(CheckArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Command-tree definition file (YAML or JSON).
    #[arg(long)]
    definition: PathBuf,
    /// Output format for the result tree.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Lowest severity that fails the parse.
    #[arg(long, default_value = "error")]
    fail_on: FailOn,
    /// Lowest severity printed to stderr.
    #[arg(long, default_value = "info")]
    display_level: CliSeverity,
    /// Treat each INPUT as one argv element instead of joining raw text.
    #[arg(long)]
    argv: bool,
    /// Input to parse; use `--` before input starting with `-`.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    input: Vec<String>,
}

#[derive(Debug, Args)]
struct TokensArgs {
    /// Command-tree definition file (YAML or JSON).
    #[arg(long)]
    definition: PathBuf,
    /// Input to scan.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    input: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Command-tree definition file (YAML or JSON).
    #[arg(long)]
    definition: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args),
        Command::Tokens(args) => run_tokens(args),
        Command::Check(args) => run_check(args),
    };

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

/// Logs go to stderr. `RUST_LOG` directives override the `-d` level.
fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

fn run_parse(args: ParseArgs) -> Result<i32> {
    let root = config::load_command(&args.definition)?;
    let parser = ArgumentParser::with_config(
        root,
        ParserConfig {
            fail_on: args.fail_on.into(),
            display_level: args.display_level.into(),
        },
    );

    let report = if args.argv {
        parser.parse_args(&args.input)
    } else {
        parser.parse(&args.input.join(" "))
    };
    tracing::info!(
        path = ?report.arguments().matched_path(),
        error_code = report.error_code(),
        "parsed input"
    );

    for message in report.messages() {
        eprintln!("{message}");
    }
    println!("{}", output::format_parse(&report, args.format)?);
    Ok(report.error_code())
}

fn run_tokens(args: TokensArgs) -> Result<i32> {
    let root = config::load_command(&args.definition)?;
    let parser = ArgumentParser::new(root);
    print!("{}", output::format_tokens(&parser.tokenize(&args.input.join(" "))));
    Ok(0)
}

fn run_check(args: CheckArgs) -> Result<i32> {
    let root = config::load_command(&args.definition)?;
    print!("{}", output::format_command_tree(&root));
    Ok(0)
}
