//! Value-count contracts for arguments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, Result};

/// How many values an argument consumes.
///
/// A closed range `min..=max` where `max` may be unbounded. The degenerate
/// range `0..=0` means the argument takes no values at all (a flag).
///
/// # Examples
///
/// ```
/// use argweave_core::ValueArity;
///
/// let arity = ValueArity::new(1, Some(3)).unwrap();
/// assert!(arity.contains(2));
/// assert!(!arity.contains(4));
///
/// assert!(ValueArity::NONE.is_zero());
/// assert!(ValueArity::AT_LEAST_ONE.contains(100));
/// assert!(ValueArity::new(3, Some(1)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueArity {
    min: usize,
    max: Option<usize>,
}

impl ValueArity {
    /// No values.
    pub const NONE: Self = Self {
        min: 0,
        max: Some(0),
    };
    /// Exactly one value.
    pub const ONE: Self = Self {
        min: 1,
        max: Some(1),
    };
    /// Any number of values, including none.
    pub const ANY: Self = Self { min: 0, max: None };
    /// One or more values.
    pub const AT_LEAST_ONE: Self = Self { min: 1, max: None };

    /// Creates a range. `max = None` means unbounded.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::InvalidArity`] when `min > max`.
    pub fn new(min: usize, max: Option<usize>) -> Result<Self> {
        if let Some(max) = max {
            if min > max {
                return Err(DefinitionError::InvalidArity { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Exactly `n` values.
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// `n` or more values.
    pub const fn at_least(n: usize) -> Self {
        Self { min: n, max: None }
    }

    pub fn min(&self) -> usize {
        self.min
    }

    /// Upper bound, `None` when unbounded.
    pub fn max(&self) -> Option<usize> {
        self.max
    }

    /// Returns `true` when the argument takes no values.
    pub fn is_zero(&self) -> bool {
        self.max == Some(0)
    }

    /// Returns `true` when `count` values satisfy this arity.
    pub fn contains(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }

    /// Returns `true` when `count` values already reach the upper bound.
    pub fn is_full(&self, count: usize) -> bool {
        self.max.is_some_and(|max| count >= max)
    }
}

impl Default for ValueArity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for ValueArity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (min, Some(max)) if min == max => {
                write!(f, "{min} value{}", if min == 1 { "" } else { "s" })
            }
            (min, Some(max)) => write!(f, "from {min} to {max} values"),
            (min, None) => write!(f, "from {min} to any number of values"),
        }
    }
}
