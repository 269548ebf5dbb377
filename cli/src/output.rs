//! Output formatting for parse reports, token trees and command trees.

use argweave_core::{Command, ParseReport, ParsedArguments, ReportedDiagnostic, TokenizedLevel};
use serde::Serialize;

use crate::error::Result;

/// Supported output formats for parse results.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Serialize)]
struct ParseOutput<'a> {
    arguments: &'a ParsedArguments,
    diagnostics: Vec<ReportedDiagnostic>,
    error_code: i32,
}

/// Formats the result tree, every diagnostic and the exit code.
pub fn format_parse(report: &ParseReport, format: OutputFormat) -> Result<String> {
    let output = ParseOutput {
        arguments: report.arguments(),
        diagnostics: report.diagnostics(),
        error_code: report.error_code(),
    };
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(&output)?,
        OutputFormat::Yaml => serde_yaml::to_string(&output)?,
    })
}

/// One block per command level with whole-input token numbering.
pub fn format_tokens(root: &TokenizedLevel<'_>) -> String {
    let mut out = String::new();
    let mut offset = 0;

    for level in root.levels() {
        let indent = "  ".repeat(level.depth());
        out.push_str(&format!(
            "{indent}{} (depth {})\n",
            level.command().name(),
            level.depth()
        ));
        for token in level.tokens() {
            let kind = format!("{:?}", token.kind);
            out.push_str(&format!(
                "{indent}  {:>3}  {kind:<18} {:?}\n",
                offset + token.index,
                token.text
            ));
        }
        for diagnostic in level.diagnostics() {
            out.push_str(&format!(
                "{indent}  !    {} at token {}\n",
                diagnostic.kind,
                offset + diagnostic.token_index
            ));
        }
        offset += level.tokens().len();
    }

    out
}

/// Indented outline of a command tree.
pub fn format_command_tree(command: &Command) -> String {
    let mut out = String::new();
    push_command(&mut out, command, 0);
    out
}

fn push_command(out: &mut String, command: &Command, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&format!("{indent}{}", command.name()));
    if let Some(code) = command.declared_error_code() {
        out.push_str(&format!(" [error code {code}]"));
    }
    if let Some(desc) = command.description_text() {
        out.push_str(&format!(" - {desc}"));
    }
    out.push('\n');

    for argument in command.arguments() {
        let prefix = argument.prefix_char();
        let mut names = if argument.is_positional() {
            vec![format!("<{}>", argument.name())]
        } else {
            vec![format!("{prefix}{prefix}{}", argument.name())]
        };
        names.extend(argument.aliases().iter().map(|a| format!("{prefix}{prefix}{a}")));
        if let Some(short) = argument.short_name() {
            names.push(format!("{prefix}{short}"));
        }

        out.push_str(&format!("{indent}  {}  ({})", names.join(", "), argument.arity()));
        if argument.is_required() {
            out.push_str(" required");
        }
        if let Some(desc) = argument.description_text() {
            out.push_str(&format!(" - {desc}"));
        }
        out.push('\n');
    }

    for sub in command.subcommands() {
        push_command(out, sub, depth + 1);
    }
}
