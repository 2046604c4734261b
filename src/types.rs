//! Core value types: game states and the two-action move set.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An opaque game state: a fixed-arity tuple of integers supplied by the
/// environment adapter.
///
/// The estimation engine never interprets the components beyond what the
/// fixed default policy needs (player total and usable-ace flag); equality
/// and hashing are structural. The wire form used by the persistence codec
/// is a parenthesized, space-free integer list, e.g. `(14,0,6)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State(Vec<i32>);

impl State {
    /// Create a state from its integer components.
    pub fn new(components: impl Into<Vec<i32>>) -> Self {
        Self(components.into())
    }

    /// The raw integer components, in declaration order.
    pub fn components(&self) -> &[i32] {
        &self.0
    }

    /// Parse the wire form `(a,b,...)`. Returns `None` on any deviation:
    /// missing parentheses, embedded spaces, or non-integer components.
    pub fn parse(text: &str) -> Option<Self> {
        let inner = text.strip_prefix('(')?.strip_suffix(')')?;
        if inner.is_empty() || inner.contains(' ') {
            return None;
        }
        let components = inner
            .split(',')
            .map(|part| part.parse::<i32>().ok())
            .collect::<Option<Vec<i32>>>()?;
        Some(Self(components))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, component) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{component}")?;
        }
        write!(f, ")")
    }
}

impl<const N: usize> From<[i32; N]> for State {
    fn from(components: [i32; N]) -> Self {
        Self(components.to_vec())
    }
}

impl std::ops::Index<usize> for State {
    type Output = i32;

    fn index(&self, index: usize) -> &i32 {
        &self.0[index]
    }
}

/// One of the two moves available in every non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Hit,
    Stand,
}

impl Action {
    /// Both actions, in table-index order.
    pub const ALL: [Action; 2] = [Action::Hit, Action::Stand];

    /// Index of this action within per-action table entries.
    pub fn index(self) -> usize {
        match self {
            Action::Hit => 0,
            Action::Stand => 1,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Hit => write!(f, "hit"),
            Action::Stand => write!(f, "stand"),
        }
    }
}
