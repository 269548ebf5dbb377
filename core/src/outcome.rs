//! Composable success-or-diagnostics results.

use crate::diagnostic::Diagnostic;

/// Either a value, or a non-empty list of diagnostics and no value.
///
/// Outcomes compose with [`merge`](ParseOutcome::merge): the merge is a
/// success only when both sides are, otherwise the diagnostics of both
/// sides are concatenated in order.
///
/// # Examples
///
/// ```
/// use argweave_core::{Diagnostic, DiagnosticKind, ParseOutcome};
///
/// let ok: ParseOutcome<u8> = ParseOutcome::Success(1);
/// let bad: ParseOutcome<u8> =
///     ParseOutcome::failure(Diagnostic::new(DiagnosticKind::UnmatchedToken, 0, 0));
///
/// assert_eq!(ok.clone().merge(ParseOutcome::Success(2)).into_result(), Ok((1, 2)));
/// assert_eq!(ok.merge(bad).diagnostics().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum ParseOutcome<T> {
    Success(T),
    Failure(Vec<Diagnostic>),
}

impl<T> ParseOutcome<T> {
    /// A failure carrying one diagnostic.
    pub fn failure(diagnostic: Diagnostic) -> Self {
        Self::Failure(vec![diagnostic])
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Diagnostics carried by this outcome (empty on success).
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Success(_) => &[],
            Self::Failure(diagnostics) => diagnostics,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        match self {
            Self::Success(value) => ParseOutcome::Success(f(value)),
            Self::Failure(diagnostics) => ParseOutcome::Failure(diagnostics),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> ParseOutcome<U>) -> ParseOutcome<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Failure(diagnostics) => ParseOutcome::Failure(diagnostics),
        }
    }

    /// Combines two outcomes, keeping diagnostics in left-to-right order.
    pub fn merge<U>(self, other: ParseOutcome<U>) -> ParseOutcome<(T, U)> {
        match (self, other) {
            (Self::Success(a), ParseOutcome::Success(b)) => ParseOutcome::Success((a, b)),
            (Self::Success(_), ParseOutcome::Failure(d)) => ParseOutcome::Failure(d),
            (Self::Failure(d), ParseOutcome::Success(_)) => ParseOutcome::Failure(d),
            (Self::Failure(mut left), ParseOutcome::Failure(right)) => {
                left.extend(right);
                ParseOutcome::Failure(left)
            }
        }
    }

    pub fn into_result(self) -> Result<T, Vec<Diagnostic>> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failure(diagnostics) => Err(diagnostics),
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        match self {
            Self::Success(_) => Vec::new(),
            Self::Failure(diagnostics) => diagnostics,
        }
    }
}

impl ParseOutcome<()> {
    pub fn ok() -> Self {
        Self::Success(())
    }

    /// Builds an outcome from a diagnostic list, success when it is empty.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            Self::Success(())
        } else {
            Self::Failure(diagnostics)
        }
    }

    /// Merges `other` into `self`, discarding the unit values.
    pub fn absorb(self, other: ParseOutcome<()>) -> Self {
        self.merge(other).map(|_| ())
    }
}

impl<T> FromIterator<ParseOutcome<T>> for ParseOutcome<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = ParseOutcome<T>>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ParseOutcome::Success(Vec::new()), |acc, next| {
                acc.merge(next).map(|(mut values, value)| {
                    values.push(value);
                    values
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::DiagnosticKind;

    fn diag(index: usize) -> Diagnostic {
        Diagnostic::new(DiagnosticKind::UnmatchedToken, index, 0)
    }

    #[test]
    fn test_merge_concatenates_in_order() {
        let merged = ParseOutcome::<()>::failure(diag(1)).absorb(ParseOutcome::failure(diag(2)));
        let indices: Vec<usize> = merged.diagnostics().iter().map(|d| d.token_index).collect();
        assert_eq!(indices, vec![1, 2]);
    }

    #[test]
    fn test_success_only_when_both_succeed() {
        assert!(ParseOutcome::ok().absorb(ParseOutcome::ok()).is_success());
        assert!(!ParseOutcome::ok().absorb(ParseOutcome::failure(diag(0))).is_success());
        assert!(!ParseOutcome::failure(diag(0)).absorb(ParseOutcome::ok()).is_success());
    }

    #[test]
    fn test_collect() {
        let all: ParseOutcome<Vec<u8>> =
            vec![ParseOutcome::Success(1), ParseOutcome::Success(2)].into_iter().collect();
        assert_eq!(all.into_result(), Ok(vec![1, 2]));

        let some: ParseOutcome<Vec<u8>> = vec![
            ParseOutcome::Success(1),
            ParseOutcome::failure(diag(7)),
            ParseOutcome::failure(diag(8)),
        ]
        .into_iter()
        .collect();
        assert_eq!(some.into_diagnostics().len(), 2);
    }

    #[test]
    fn test_from_diagnostics() {
        assert!(ParseOutcome::from_diagnostics(Vec::new()).is_success());
        assert!(!ParseOutcome::from_diagnostics(vec![diag(0)]).is_success());
    }
}
