//! Character-level scanner.
//!
//! Each command level scans its part of the input left to right with a
//! single pending-text buffer plus the "inside string" and "inside tuple"
//! flags. When a chunk names a subcommand, the level stops and hands the
//! unconsumed remainder to a fresh scanner for that subcommand, producing a
//! chain of [`TokenizedLevel`]s.

use tracing::{debug, trace};

use crate::command::{Command, TupleDelimiters};
use crate::diagnostic::{Diagnostic, DiagnosticKind};
use crate::token::{Token, TokenKind};

/// Unquoted chunk that forwards the rest of the input verbatim.
pub const FORWARD_MARKER: &str = "--";

/// Tokens and scanner diagnostics of one command level, linked to the
/// level of the subcommand the input was delegated to.
#[derive(Debug, Clone)]
pub struct TokenizedLevel<'c> {
    command: &'c Command,
    depth: usize,
    delimiters: TupleDelimiters,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    child: Option<Box<TokenizedLevel<'c>>>,
}

impl<'c> TokenizedLevel<'c> {
    pub fn command(&self) -> &'c Command {
        self.command
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Delimiters in effect at this level after inheritance.
    pub fn delimiters(&self) -> TupleDelimiters {
        self.delimiters
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// The level of the subcommand this level delegated to.
    pub fn child(&self) -> Option<&TokenizedLevel<'c>> {
        self.child.as_deref()
    }

    /// This level followed by every delegated level, outermost first.
    pub fn levels(&self) -> Vec<&TokenizedLevel<'c>> {
        let mut levels = vec![self];
        let mut current = self;
        while let Some(child) = current.child() {
            levels.push(child);
            current = child;
        }
        levels
    }

    /// Every token of every level in input order.
    pub fn full_token_list(&self) -> Vec<Token> {
        self.levels()
            .into_iter()
            .flat_map(|level| level.tokens.iter().cloned())
            .collect()
    }
}

/// Scans `input` for `root` and, recursively, the subcommands it names.
///
/// # Examples
///
/// ```
/// use argweave_core::{ArgumentSpec, Command, StringType, TokenKind, tokenize};
///
/// # fn main() -> Result<(), argweave_core::DefinitionError> {
/// let root = Command::new("tool")?
///     .subcommand(Command::new("run")?.argument(ArgumentSpec::new("name", StringType))?)?;
///
/// let level = tokenize(&root, "run --name 'a b'");
/// assert_eq!(level.tokens()[0].kind, TokenKind::SubCommandMarker);
///
/// let run = level.child().unwrap();
/// let kinds: Vec<TokenKind> = run.tokens().iter().map(|t| t.kind).collect();
/// assert_eq!(kinds, vec![TokenKind::ArgumentAlias, TokenKind::ArgumentValue]);
/// assert_eq!(run.tokens()[1].text, "a b");
/// # Ok(())
/// # }
/// ```
pub fn tokenize<'c>(root: &'c Command, input: &str) -> TokenizedLevel<'c> {
    let delimiters = root.declared_tuple_delimiters().unwrap_or_default();
    Tokenizer::new(root, delimiters, 0).run(input)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

struct Tokenizer<'c> {
    command: &'c Command,
    delimiters: TupleDelimiters,
    depth: usize,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    current: String,
    string_open: bool,
    tuple_open: bool,
    child: Option<Box<TokenizedLevel<'c>>>,
}

impl<'c> Tokenizer<'c> {
    fn new(command: &'c Command, delimiters: TupleDelimiters, depth: usize) -> Self {
        Self {
            command,
            delimiters,
            depth,
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            current: String::new(),
            string_open: false,
            tuple_open: false,
            child: None,
        }
    }

    fn run(mut self, input: &str) -> TokenizedLevel<'c> {
        let chars: Vec<char> = input.chars().collect();
        let mut stopped = false;
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];

            if self.string_open {
                if c == '\\' {
                    if let Some(&escaped) = chars.get(i + 1) {
                        self.current.push(escaped);
                    }
                    i += 2;
                    continue;
                }
                if c == '"' || c == '\'' {
                    let text = std::mem::take(&mut self.current);
                    self.push(TokenKind::ArgumentValue, text);
                    self.string_open = false;
                } else {
                    self.current.push(c);
                }
            } else if c == '"' || c == '\'' {
                if self.flush(&chars, i) == Flow::Stop {
                    stopped = true;
                    break;
                }
                self.string_open = true;
            } else if c == self.delimiters.open {
                if self.tuple_open {
                    self.abort(DiagnosticKind::TupleAlreadyOpen);
                    stopped = true;
                    break;
                }
                if self.flush(&chars, i) == Flow::Stop {
                    stopped = true;
                    break;
                }
                self.push(TokenKind::TupleStart, c.to_string());
                self.tuple_open = true;
            } else if c == self.delimiters.close {
                if !self.tuple_open {
                    self.abort(DiagnosticKind::UnexpectedTupleClose);
                    stopped = true;
                    break;
                }
                self.flush(&chars, i + 1);
                self.push(TokenKind::TupleEnd, c.to_string());
                self.tuple_open = false;
            } else if c.is_whitespace() || c == '=' {
                if self.flush(&chars, i + 1) == Flow::Stop {
                    stopped = true;
                    break;
                }
            } else {
                self.current.push(c);
            }

            i += 1;
        }

        if !stopped {
            self.finish(&chars);
        }

        TokenizedLevel {
            command: self.command,
            depth: self.depth,
            delimiters: self.delimiters,
            tokens: self.tokens,
            diagnostics: self.diagnostics,
            child: self.child,
        }
    }

    /// End of input: flush trailing text and report unclosed structures.
    fn finish(&mut self, chars: &[char]) {
        if self.string_open {
            if !self.current.is_empty() {
                let text = std::mem::take(&mut self.current);
                self.push(TokenKind::ArgumentValue, text);
            }
        } else if self.flush(chars, chars.len()) == Flow::Stop {
            return;
        }

        if self.tuple_open {
            self.report(DiagnosticKind::TupleNotClosed);
        }
        if self.string_open {
            self.report(DiagnosticKind::StringNotClosed);
        }
    }

    /// Classifies and emits the pending text. `resume_at` is the first
    /// character not consumed by this level if the chunk delegates.
    fn flush(&mut self, chars: &[char], resume_at: usize) -> Flow {
        if self.current.is_empty() {
            return Flow::Continue;
        }
        let text = std::mem::take(&mut self.current);

        if self.tuple_open {
            self.push(TokenKind::ArgumentValue, text);
            return Flow::Continue;
        }

        if text == FORWARD_MARKER {
            let rest: String = chars[resume_at.min(chars.len())..].iter().collect();
            let rest = rest.trim_start();
            if !rest.is_empty() {
                self.push(TokenKind::ForwardValue, rest);
            }
            return Flow::Stop;
        }

        if self.is_alias(&text) {
            self.push(TokenKind::ArgumentAlias, text);
        } else if self.is_name_list(&text) {
            self.push(TokenKind::ArgumentNameList, text);
        } else if let Some(sub) = self.command.find_subcommand(&text) {
            self.push(TokenKind::SubCommandMarker, text);
            let rest: String = chars[resume_at.min(chars.len())..].iter().collect();
            let delimiters = sub.declared_tuple_delimiters().unwrap_or(self.delimiters);
            debug!(
                command = self.command.name(),
                subcommand = sub.name(),
                depth = self.depth + 1,
                "delegating remaining input to subcommand"
            );
            let level = Tokenizer::new(sub, delimiters, self.depth + 1).run(&rest);
            self.child = Some(Box::new(level));
            return Flow::Stop;
        } else {
            self.push(TokenKind::ArgumentValue, text);
        }
        Flow::Continue
    }

    /// Long-form alias: at least two characters, the first two equal, and
    /// a declared argument answers to it.
    fn is_alias(&self, text: &str) -> bool {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(a), Some(b)) if a == b => self.command.find_argument_by_alias(text).is_some(),
            _ => false,
        }
    }

    /// Short-name cluster: prefix followed by a declared one-character name.
    fn is_name_list(&self, text: &str) -> bool {
        let mut chars = text.chars();
        let (Some(prefix), Some(first)) = (chars.next(), chars.next()) else {
            return false;
        };
        self.command
            .arguments()
            .iter()
            .any(|a| a.prefix_char() == prefix && a.matches_short(first))
    }

    fn push(&mut self, kind: TokenKind, text: impl Into<String>) {
        let token = Token::new(kind, text, self.tokens.len());
        trace!(command = self.command.name(), %token, "token");
        self.tokens.push(token);
    }

    fn report(&mut self, kind: DiagnosticKind) {
        self.diagnostics
            .push(Diagnostic::new(kind, self.tokens.len(), self.depth));
    }

    fn abort(&mut self, kind: DiagnosticKind) {
        debug!(
            command = self.command.name(),
            depth = self.depth,
            error = %kind,
            "aborting scan"
        );
        self.report(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::ArgumentSpec;
    use crate::value::{BooleanType, StringType, StringsType};

    fn tool() -> Command {
        Command::new("tool")
            .unwrap()
            .argument(ArgumentSpec::new("flag", BooleanType).short('f'))
            .unwrap()
            .argument(ArgumentSpec::new("name", StringType).short('n'))
            .unwrap()
            .argument(ArgumentSpec::new("items", StringsType::default()))
            .unwrap()
            .subcommand(
                Command::new("sub")
                    .unwrap()
                    .argument(ArgumentSpec::new("deep", BooleanType).short('d'))
                    .unwrap(),
            )
            .unwrap()
    }

    fn kinds(level: &TokenizedLevel<'_>) -> Vec<TokenKind> {
        level.tokens().iter().map(|t| t.kind).collect()
    }

    fn texts(level: &TokenizedLevel<'_>) -> Vec<String> {
        level.tokens().iter().map(|t| t.text.clone()).collect()
    }

    #[test]
    fn test_classification_priority() {
        let cmd = tool();
        let level = tokenize(&cmd, "--flag -fn value --nope sub");
        assert_eq!(
            kinds(&level),
            vec![
                TokenKind::ArgumentAlias,
                TokenKind::ArgumentNameList,
                TokenKind::ArgumentValue,
                TokenKind::ArgumentValue,
                TokenKind::SubCommandMarker,
            ]
        );
        assert!(level.child().is_some());
    }

    #[test]
    fn test_equals_is_a_boundary() {
        let cmd = tool();
        let level = tokenize(&cmd, "--name=value");
        assert_eq!(texts(&level), vec!["--name", "value"]);
    }

    #[test]
    fn test_quotes_and_escapes() {
        let cmd = tool();
        let level = tokenize(&cmd, r#"'it\'s' "say \"hi\"" "mixed \' quote" """#);
        assert_eq!(
            texts(&level),
            vec!["it's", "say \"hi\"", "mixed ' quote", ""]
        );
        assert!(level.diagnostics().is_empty());
    }

    #[test]
    fn test_either_quote_closes_a_string() {
        let cmd = tool();
        let level = tokenize(&cmd, r#""a'b""#);
        assert_eq!(texts(&level), vec!["a", "b"]);
        assert_eq!(level.diagnostics().len(), 1);
        assert_eq!(level.diagnostics()[0].kind, DiagnosticKind::StringNotClosed);
        assert_eq!(level.diagnostics()[0].token_index, 2);

        let level = tokenize(&cmd, r#"'x" y'"#);
        assert_eq!(texts(&level), vec!["x", "y"]);
        assert_eq!(level.diagnostics()[0].kind, DiagnosticKind::StringNotClosed);
    }

    #[test]
    fn test_tuple_contents_are_values() {
        let cmd = tool();
        let level = tokenize(&cmd, "--items [--flag sub 'x y']");
        assert_eq!(
            kinds(&level),
            vec![
                TokenKind::ArgumentAlias,
                TokenKind::TupleStart,
                TokenKind::ArgumentValue,
                TokenKind::ArgumentValue,
                TokenKind::ArgumentValue,
                TokenKind::TupleEnd,
            ]
        );
        assert!(level.child().is_none());
    }

    #[test]
    fn test_tuple_adjacent_to_text() {
        let cmd = tool();
        let level = tokenize(&cmd, "--items[a]b");
        assert_eq!(texts(&level), vec!["--items", "[", "a", "]", "b"]);
    }

    #[test]
    fn test_unclosed_tuple_points_at_end() {
        let cmd = tool();
        let level = tokenize(&cmd, "[a b");
        assert_eq!(level.tokens().len(), 3);
        assert_eq!(level.diagnostics().len(), 1);
        assert_eq!(level.diagnostics()[0].kind, DiagnosticKind::TupleNotClosed);
        assert_eq!(level.diagnostics()[0].token_index, 3);
    }

    #[test]
    fn test_unclosed_string_keeps_pending_text() {
        let cmd = tool();
        let level = tokenize(&cmd, "a 'b c");
        assert_eq!(texts(&level), vec!["a", "b c"]);
        assert_eq!(level.diagnostics()[0].kind, DiagnosticKind::StringNotClosed);
        assert_eq!(level.diagnostics()[0].token_index, 2);
    }

    #[test]
    fn test_structural_errors_abort_scan() {
        let cmd = tool();
        let level = tokenize(&cmd, "a ] b c");
        assert_eq!(texts(&level), vec!["a"]);
        assert_eq!(level.diagnostics().len(), 1);
        assert_eq!(level.diagnostics()[0].kind, DiagnosticKind::UnexpectedTupleClose);
        assert_eq!(level.diagnostics()[0].token_index, 1);

        let level = tokenize(&cmd, "[a [b] c");
        assert_eq!(texts(&level), vec!["[", "a"]);
        assert_eq!(level.diagnostics().len(), 1);
        assert_eq!(level.diagnostics()[0].kind, DiagnosticKind::TupleAlreadyOpen);
    }

    #[test]
    fn test_delegation_hands_over_remainder() {
        let cmd = tool();
        let level = tokenize(&cmd, "-f sub -d 'x' [y]");
        assert_eq!(texts(&level), vec!["-f", "sub"]);

        let sub = level.child().unwrap();
        assert_eq!(sub.depth(), 1);
        assert_eq!(sub.command().name(), "sub");
        assert_eq!(texts(sub), vec!["-d", "x", "[", "y", "]"]);
        assert_eq!(level.full_token_list().len(), 7);
        assert_eq!(level.levels().len(), 2);
    }

    #[test]
    fn test_delegation_before_quote_keeps_quote() {
        let cmd = tool();
        let level = tokenize(&cmd, "sub'quoted text'");
        let sub = level.child().unwrap();
        assert_eq!(texts(sub), vec!["quoted text"]);
    }

    #[test]
    fn test_forward_value() {
        let cmd = tool();
        let level = tokenize(&cmd, "-f --   raw [stuff 'here");
        assert_eq!(
            kinds(&level),
            vec![TokenKind::ArgumentNameList, TokenKind::ForwardValue]
        );
        assert_eq!(level.tokens()[1].text, "raw [stuff 'here");
        assert!(level.diagnostics().is_empty());
    }

    #[test]
    fn test_delimiters_are_inherited_unless_overridden() {
        let cmd = Command::new("root")
            .unwrap()
            .tuple_delimiters(TupleDelimiters::PARENTHESES)
            .subcommand(Command::new("inherit").unwrap())
            .unwrap()
            .subcommand(
                Command::new("own")
                    .unwrap()
                    .tuple_delimiters(TupleDelimiters::BRACES),
            )
            .unwrap();

        let level = tokenize(&cmd, "inherit (a)");
        let child = level.child().unwrap();
        assert_eq!(child.delimiters(), TupleDelimiters::PARENTHESES);
        assert_eq!(kinds(child)[0], TokenKind::TupleStart);

        let level = tokenize(&cmd, "own {a}");
        let child = level.child().unwrap();
        assert_eq!(child.delimiters(), TupleDelimiters::BRACES);
        assert_eq!(texts(child), vec!["{", "a", "}"]);
    }

    #[test]
    fn test_empty_input() {
        let cmd = tool();
        let level = tokenize(&cmd, "   ");
        assert!(level.tokens().is_empty());
        assert!(level.diagnostics().is_empty());
    }
}
