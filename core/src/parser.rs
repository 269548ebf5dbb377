//! Token-stream consumer.
//!
//! Walks one level's tokens with an explicit cursor, binds them to the
//! command's declared arguments, finalizes every argument and then recurses
//! into the delegated subcommand level. Diagnostics are accumulated through
//! [`ParseOutcome`] so one pass reports every problem it finds.

use tracing::debug;

use crate::arity::ValueArity;
use crate::command::Command;
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::outcome::ParseOutcome;
use crate::report::LevelDiagnostics;
use crate::result::ParsedArguments;
use crate::token::{Token, TokenKind};
use crate::tokenizer::TokenizedLevel;
use crate::value::ParsedValue;

/// Consumes `level` and every level it delegated to.
///
/// Returns the nested result tree and the per-level token/diagnostic
/// records (outermost first) for the
/// [`ErrorAggregator`](crate::ErrorAggregator).
pub fn consume(level: &TokenizedLevel<'_>) -> (ParsedArguments, Vec<LevelDiagnostics>) {
    let command = level.command();
    let (mut arguments, outcome) = TokenConsumer::new(command, level.depth(), level.tokens()).run();

    let scanned = ParseOutcome::from_diagnostics(level.diagnostics().to_vec());
    let diagnostics = scanned.absorb(outcome).into_diagnostics();
    debug!(
        command = command.name(),
        depth = level.depth(),
        tokens = level.tokens().len(),
        diagnostics = diagnostics.len(),
        "consumed level"
    );

    let mut levels = vec![LevelDiagnostics {
        command: command.name().to_string(),
        depth: level.depth(),
        error_code: command.declared_error_code(),
        tokens: level.tokens().to_vec(),
        diagnostics,
    }];

    if let Some(child) = level.child() {
        let (sub, sub_levels) = consume(child);
        arguments.set_subcommand(sub);
        levels.extend(sub_levels);
    }

    (arguments, levels)
}

struct TokenConsumer<'a> {
    command: &'a Command,
    depth: usize,
    tokens: &'a [Token],
    cursor: usize,
    bound: Vec<Option<ParsedValue>>,
    usages: Vec<usize>,
    positional: Vec<usize>,
    next_positional: usize,
    found_named: bool,
    forward_value: Option<String>,
    outcome: ParseOutcome<()>,
}

impl<'a> TokenConsumer<'a> {
    fn new(command: &'a Command, depth: usize, tokens: &'a [Token]) -> Self {
        let count = command.arguments().len();
        Self {
            command,
            depth,
            tokens,
            cursor: 0,
            bound: vec![None; count],
            usages: vec![0; count],
            positional: command.positional_indices(),
            next_positional: 0,
            found_named: false,
            forward_value: None,
            outcome: ParseOutcome::ok(),
        }
    }

    fn run(mut self) -> (ParsedArguments, ParseOutcome<()>) {
        let tokens = self.tokens;

        while let Some(token) = tokens.get(self.cursor) {
            match token.kind {
                TokenKind::ArgumentAlias => {
                    self.found_named = true;
                    let origin = self.cursor;
                    self.cursor += 1;
                    match self.command.find_argument_by_alias(&token.text) {
                        Some(index) => self.execute(index, origin),
                        None => self.report(
                            Diagnostic::new(
                                DiagnosticKind::ArgumentNotFound(token.text.clone()),
                                origin,
                                self.depth,
                            ),
                        ),
                    }
                }
                TokenKind::ArgumentNameList => {
                    self.found_named = true;
                    self.consume_name_list(token);
                }
                TokenKind::ArgumentValue | TokenKind::TupleStart
                    if !self.found_named && self.next_positional < self.positional.len() =>
                {
                    let index = self.positional[self.next_positional];
                    self.next_positional += 1;
                    self.execute(index, self.cursor);
                }
                TokenKind::SubCommandMarker => self.cursor += 1,
                TokenKind::ForwardValue => {
                    self.forward_value = Some(token.text.clone());
                    self.cursor += 1;
                }
                _ => {
                    self.report(Diagnostic::new(
                        DiagnosticKind::UnmatchedToken,
                        self.cursor,
                        self.depth,
                    ));
                    self.cursor += 1;
                }
            }
        }

        self.finalize()
    }

    /// `-abc`: zero-arity members run in place, the last member may take the
    /// following tokens as values, a value-taking member anywhere else stops
    /// the cluster.
    fn consume_name_list(&mut self, token: &Token) {
        let command = self.command;
        let origin = self.cursor;
        let mut chars = token.text.chars();
        let prefix = chars.next();
        let cluster: Vec<char> = chars.collect();
        let mut advanced = false;

        for (position, &c) in cluster.iter().enumerate() {
            let found = command
                .arguments()
                .iter()
                .position(|a| Some(a.prefix_char()) == prefix && a.matches_short(c));
            let Some(index) = found else {
                self.report(Diagnostic::new(
                    DiagnosticKind::ArgumentNotFound(c.to_string()),
                    origin,
                    self.depth,
                ));
                continue;
            };

            let spec = &command.arguments()[index];
            if spec.arity().is_zero() {
                self.execute(index, origin);
            } else if position + 1 == cluster.len() {
                self.cursor += 1;
                advanced = true;
                self.execute(index, origin);
            } else {
                self.report(
                    Diagnostic::new(DiagnosticKind::ArgNameListTakeValues, origin, self.depth)
                        .with_argument(spec.name()),
                );
                break;
            }
        }

        if !advanced {
            self.cursor += 1;
        }
    }

    /// Runs argument `index` with values starting at the cursor. `origin` is
    /// the token diagnostics point at.
    fn execute(&mut self, index: usize, origin: usize) {
        let command = self.command;
        let spec = &command.arguments()[index];
        let arity = spec.arity();

        self.usages[index] += 1;
        let used = self.usages[index];
        let over_used = used > spec.usage_limit();
        if over_used {
            self.report(
                Diagnostic::new(
                    DiagnosticKind::ArgIncorrectUsagesCount {
                        max: spec.usage_limit(),
                        used,
                    },
                    origin,
                    self.depth,
                )
                .with_argument(spec.name()),
            );
        }

        let values = if arity.is_zero() {
            Vec::new()
        } else {
            self.collect_values(arity)
        };

        if !arity.contains(values.len()) {
            self.report(
                Diagnostic::new(
                    DiagnosticKind::ArgIncorrectValueNumber {
                        expected: arity,
                        captured: values.len(),
                    },
                    origin,
                    self.depth,
                )
                .with_argument(spec.name()),
            );
            return;
        }
        if over_used {
            return;
        }

        match spec.value_type().parse(&values) {
            Ok(value) => self.bound[index] = Some(value),
            Err(err) => self.report(
                Diagnostic::new(DiagnosticKind::InvalidValue(err.message), origin, self.depth)
                    .with_severity(err.severity)
                    .with_argument(spec.name()),
            ),
        }
    }

    /// A tuple at the cursor yields everything up to its end regardless of
    /// `max`; otherwise plain values are taken greedily until `max` or the
    /// first non-value token.
    fn collect_values(&mut self, arity: ValueArity) -> Vec<&'a str> {
        let tokens = self.tokens;
        let mut values = Vec::new();

        let in_tuple = tokens
            .get(self.cursor)
            .is_some_and(|t| t.kind == TokenKind::TupleStart);

        if in_tuple {
            let mut i = self.cursor + 1;
            while let Some(token) = tokens.get(i) {
                if token.kind == TokenKind::TupleEnd {
                    break;
                }
                values.push(token.text.as_str());
                i += 1;
            }
            self.cursor = (i + 1).min(tokens.len());
        } else {
            while let Some(token) = tokens.get(self.cursor) {
                if token.kind != TokenKind::ArgumentValue || arity.is_full(values.len()) {
                    break;
                }
                values.push(token.text.as_str());
                self.cursor += 1;
            }
        }

        values
    }

    fn finalize(mut self) -> (ParsedArguments, ParseOutcome<()>) {
        let command = self.command;
        let mut arguments = ParsedArguments::new(command.name());
        let end = self.tokens.len();

        for (index, spec) in command.arguments().iter().enumerate() {
            let bound = self.bound[index].take();
            let is_bound = bound.is_some();
            let used = self.usages[index] > 0;
            if spec.is_required() && !used {
                self.report(
                    Diagnostic::new(DiagnosticKind::RequiredArgumentNotUsed, end, self.depth)
                        .with_argument(spec.name()),
                );
            }
            arguments.push(spec.name(), spec.finalize(bound), used, is_bound);
        }

        arguments.set_forward_value(self.forward_value.take());
        (arguments, self.outcome)
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        let outcome = std::mem::replace(&mut self.outcome, ParseOutcome::ok());
        self.outcome = outcome.absorb(ParseOutcome::failure(diagnostic));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ArgumentSpec;
    use crate::diagnostic::Severity;
    use crate::tokenizer::tokenize;
    use crate::value::{BooleanType, IntegerType, StringType, StringsType, ValueError, from_fn};

    fn kinds(levels: &[LevelDiagnostics]) -> Vec<DiagnosticKind> {
        levels
            .iter()
            .flat_map(|l| l.diagnostics.iter().map(|d| d.kind.clone()))
            .collect()
    }

    fn run(command: &Command, input: &str) -> (ParsedArguments, Vec<LevelDiagnostics>) {
        consume(&tokenize(command, input))
    }

    #[test]
    fn test_greedy_stops_at_max_and_specifiers() {
        let cmd = Command::new("tool")
            .unwrap()
            .argument(ArgumentSpec::new("pair", StringsType::new(ValueArity::exactly(2))))
            .unwrap()
            .argument(ArgumentSpec::new("flag", BooleanType).short('f'))
            .unwrap()
            .argument(ArgumentSpec::new("rest", StringsType::new(ValueArity::ANY)))
            .unwrap();

        let (args, levels) = run(&cmd, "--pair a b --rest c -f");
        assert!(kinds(&levels).is_empty());
        assert_eq!(
            args.get("pair"),
            Some(&ParsedValue::List(vec![
                ParsedValue::Text("a".into()),
                ParsedValue::Text("b".into())
            ]))
        );
        assert_eq!(
            args.get("rest"),
            Some(&ParsedValue::List(vec![ParsedValue::Text("c".into())]))
        );
        assert_eq!(args.get("flag"), Some(&ParsedValue::Bool(true)));

        let (_, levels) = run(&cmd, "--pair a b c");
        assert_eq!(kinds(&levels), vec![DiagnosticKind::UnmatchedToken]);
        assert_eq!(levels[0].diagnostics[0].token_index, 3);
    }

    #[test]
    fn test_too_few_values_reports_count() {
        let cmd = Command::new("tool")
            .unwrap()
            .argument(ArgumentSpec::new("pair", StringsType::new(ValueArity::exactly(2))))
            .unwrap();
        let (args, levels) = run(&cmd, "--pair a");
        let diag = &levels[0].diagnostics[0];
        assert_eq!(
            diag.kind,
            DiagnosticKind::ArgIncorrectValueNumber {
                expected: ValueArity::exactly(2),
                captured: 1
            }
        );
        assert_eq!(diag.value_count, Some(1));
        assert_eq!(diag.argument.as_deref(), Some("pair"));
        assert_eq!(diag.token_index, 0);
        assert_eq!(args.get("pair"), None);
    }

    #[test]
    fn test_positionals_bind_in_order() {
        let cmd = Command::new("copy")
            .unwrap()
            .argument(ArgumentSpec::new("source", StringType).positional())
            .unwrap()
            .argument(ArgumentSpec::new("dest", StringType).positional())
            .unwrap()
            .argument(ArgumentSpec::new("force", BooleanType).short('f'))
            .unwrap();

        let (args, levels) = run(&cmd, "a.txt b.txt -f");
        assert!(kinds(&levels).is_empty());
        assert_eq!(args.get("source").and_then(ParsedValue::as_str), Some("a.txt"));
        assert_eq!(args.get("dest").and_then(ParsedValue::as_str), Some("b.txt"));

        let (_, levels) = run(&cmd, "a.txt b.txt c.txt");
        assert_eq!(kinds(&levels), vec![DiagnosticKind::UnmatchedToken]);
    }

    #[test]
    fn test_positional_accepts_tuple() {
        let cmd = Command::new("tool")
            .unwrap()
            .argument(ArgumentSpec::new("files", StringsType::default()).positional())
            .unwrap();
        let (args, levels) = run(&cmd, "[a b c]");
        assert!(kinds(&levels).is_empty());
        assert_eq!(args.get("files").and_then(ParsedValue::as_list).map(<[_]>::len), Some(3));
    }

    #[test]
    fn test_required_and_usage_limits() {
        let cmd = Command::new("tool")
            .unwrap()
            .argument(ArgumentSpec::new("name", StringType).required())
            .unwrap()
            .argument(ArgumentSpec::new("tag", StringType).short('t').max_usages(2))
            .unwrap();

        let (_, levels) = run(&cmd, "");
        assert_eq!(kinds(&levels), vec![DiagnosticKind::RequiredArgumentNotUsed]);

        let (args, levels) = run(&cmd, "--name a --name b");
        assert_eq!(
            kinds(&levels),
            vec![DiagnosticKind::ArgIncorrectUsagesCount { max: 1, used: 2 }]
        );
        assert_eq!(args.get("name").and_then(ParsedValue::as_str), Some("a"));

        let (args, levels) = run(&cmd, "--name a -t x -t y");
        assert!(kinds(&levels).is_empty());
        assert_eq!(args.get("tag").and_then(ParsedValue::as_str), Some("y"));
    }

    #[test]
    fn test_value_errors_keep_severity() {
        let noisy = from_fn(ValueArity::ONE, |values| {
            Err(ValueError::new(format!("ignored {}", values[0])).with_severity(Severity::Info))
        });
        let cmd = Command::new("tool")
            .unwrap()
            .argument(ArgumentSpec::new("count", IntegerType))
            .unwrap()
            .argument(ArgumentSpec::new("note", noisy))
            .unwrap();

        let (args, levels) = run(&cmd, "--count ten --note x");
        let diags = &levels[0].diagnostics;
        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].severity, Severity::Error);
        assert_eq!(
            diags[0].kind,
            DiagnosticKind::InvalidValue("invalid integer value: \"ten\"".into())
        );
        assert_eq!(diags[1].severity, Severity::Info);
        assert_eq!(args.get("count"), None);
        assert!(args.was_used("note"));
    }

    #[test]
    fn test_unknown_cluster_member() {
        let cmd = Command::new("tool")
            .unwrap()
            .argument(ArgumentSpec::new("all", BooleanType).short('a'))
            .unwrap()
            .argument(ArgumentSpec::new("long", BooleanType).short('l'))
            .unwrap();
        let (args, levels) = run(&cmd, "-axl");
        assert_eq!(
            kinds(&levels),
            vec![DiagnosticKind::ArgumentNotFound("x".into())]
        );
        assert_eq!(args.get("all"), Some(&ParsedValue::Bool(true)));
        assert_eq!(args.get("long"), Some(&ParsedValue::Bool(true)));
    }

    #[test]
    fn test_forward_value_is_recorded() {
        let cmd = Command::new("tool").unwrap();
        let (args, levels) = run(&cmd, "-- anything --goes [here");
        assert!(kinds(&levels).is_empty());
        assert_eq!(args.forward_value(), Some("anything --goes [here"));
    }

    #[test]
    fn test_scanner_diagnostics_come_first() {
        let cmd = Command::new("tool").unwrap();
        let (_, levels) = run(&cmd, "stray 'open");
        assert_eq!(
            kinds(&levels),
            vec![
                DiagnosticKind::StringNotClosed,
                DiagnosticKind::UnmatchedToken,
                DiagnosticKind::UnmatchedToken
            ]
        );
    }
}
