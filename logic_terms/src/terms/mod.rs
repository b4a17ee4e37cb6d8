//! Term and statement definitions.

mod sentence;

pub use sentence::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix marking a variable in the text format.
pub const VARIABLE_PREFIX: char = '?';

/// A single argument of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Term {
    /// A ground symbol such as `cube`.
    Constant(String),
    /// A variable; the stored name excludes the leading `?`.
    Variable(String),
}

impl Term {
    /// Create a constant term.
    pub fn constant(name: impl Into<String>) -> Self {
        Term::Constant(name.into())
    }

    /// Create a variable term. A leading `?` is stripped if present.
    pub fn variable(name: impl Into<String>) -> Self {
        let name = name.into();
        match name.strip_prefix(VARIABLE_PREFIX) {
            Some(stripped) => Term::Variable(stripped.to_string()),
            None => Term::Variable(name),
        }
    }

    /// Read a term from its textual form: `?x` is a variable, anything else a constant.
    pub fn from_symbol(symbol: &str) -> Self {
        if symbol.starts_with(VARIABLE_PREFIX) {
            Term::variable(symbol)
        } else {
            Term::constant(symbol)
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// The bare name, without any variable prefix.
    pub fn name(&self) -> &str {
        match self {
            Term::Constant(name) | Term::Variable(name) => name,
        }
    }

    fn is_well_formed(&self) -> bool {
        is_symbol(self.name())
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Constant(name) => write!(f, "{}", name),
            Term::Variable(name) => write!(f, "{}{}", VARIABLE_PREFIX, name),
        }
    }
}

/// A predicate applied to an ordered list of terms, e.g. `(isa cube block)`.
///
/// Equality is purely structural: `(p ?x)` and `(p ?y)` are different
/// statements.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Statement {
    pub predicate: String,
    pub terms: Vec<Term>,
}

impl Statement {
    /// Create a statement from a predicate and its terms.
    pub fn new(predicate: impl Into<String>, terms: impl IntoIterator<Item = Term>) -> Self {
        Self {
            predicate: predicate.into(),
            terms: terms.into_iter().collect(),
        }
    }

    /// Build a statement from textual symbols, e.g. `Statement::from_symbols("isa", ["?x", "block"])`.
    pub fn from_symbols<'a>(
        predicate: impl Into<String>,
        symbols: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::new(predicate, symbols.into_iter().map(Term::from_symbol))
    }

    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    /// Variables occurring in this statement, in order of first appearance.
    pub fn variables(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for term in &self.terms {
            if let Term::Variable(name) = term {
                if !seen.contains(&name.as_str()) {
                    seen.push(name.as_str());
                }
            }
        }
        seen
    }

    /// Check whether the statement contains no variables.
    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(Term::is_constant)
    }

    /// A statement is well formed when its predicate is a plain symbol (not a
    /// variable) and every term name is a plain symbol.
    pub fn is_well_formed(&self) -> bool {
        is_symbol(&self.predicate)
            && !self.predicate.starts_with(VARIABLE_PREFIX)
            && self.terms.iter().all(Term::is_well_formed)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.predicate)?;
        for term in &self.terms {
            write!(f, " {}", term)?;
        }
        write!(f, ")")
    }
}

/// A symbol is non-empty and free of whitespace and parentheses.
pub(crate) fn is_symbol(s: &str) -> bool {
    !s.is_empty()
        && s != "?"
        && !s
            .chars()
            .any(|c| c.is_whitespace() || c == '(' || c == ')')
}
