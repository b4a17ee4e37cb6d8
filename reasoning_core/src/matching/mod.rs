//! Matching module - unification of statements and instantiation of templates.
//!
//! - **Bindings**: a consistent assignment of variables to terms
//! - **Unifier**: computes the bindings that make two statements equal
//! - **Instantiator**: substitutes bindings into a statement template

mod instantiate;
mod unify;

pub use instantiate::*;
pub use unify::*;

use logic_terms::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single consistent assignment from variable names to terms.
///
/// A variable may be bound to another variable; [`Bindings::resolve`] follows
/// such chains to their end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    bindings: BTreeMap<String, Term>,
}

impl Bindings {
    /// Create an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The term a variable is directly bound to, if any.
    pub fn bound_to(&self, variable: &str) -> Option<&Term> {
        self.bindings.get(variable)
    }

    /// Follow variable-to-variable bindings until reaching a constant or an
    /// unbound variable.
    pub fn resolve(&self, term: &Term) -> Term {
        let mut current = term;
        // A chain can never be longer than the number of bindings.
        for _ in 0..=self.bindings.len() {
            match current {
                Term::Variable(name) => match self.bindings.get(name) {
                    Some(next) => current = next,
                    None => break,
                },
                Term::Constant(_) => break,
            }
        }
        current.clone()
    }

    /// Bind a variable. Callers must resolve first; rebinding is not checked here.
    pub(crate) fn bind(&mut self, variable: impl Into<String>, value: Term) {
        self.bindings.insert(variable.into(), value);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over direct bindings, ordered by variable name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bindings.is_empty() {
            return write!(f, "(no bindings)");
        }
        for (i, (variable, value)) in self.bindings.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "?{} : {}", variable, self.resolve(value))?;
        }
        Ok(())
    }
}
