//! Inference Engine - one forward-chaining step from a fact and a rule.
//!
//! A step works as follows:
//! 1. **Match**: Unify the fact with the rule's first antecedent
//! 2. **Fact**: If that was the only antecedent, instantiate the consequent as a new fact
//! 3. **Rule**: Otherwise, instantiate the remaining antecedents and the
//!    consequent as a new, more specific rule
//!
//! The engine never touches the knowledge base. It returns a [`Derivation`]
//! which the knowledge base merges into its store and justification graph.

use logic_terms::Sentence;
use tracing::{debug, trace};

use crate::config::Verbosity;
use crate::knowledge_base::{Fact, Rule, Support};
use crate::matching::{instantiate, match_statements, Bindings};

/// A sentence derived from a fact and a rule, with the justification to record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub sentence: Sentence,
    pub support: Support,
    /// The bindings under which the rule fired.
    pub bindings: Bindings,
}

/// Forward-chaining inference engine.
#[derive(Debug, Clone, Default)]
pub struct InferenceEngine {
    verbosity: Verbosity,
}

impl InferenceEngine {
    /// Create a new inference engine with the given verbosity.
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Try to derive a new fact or rule from `fact` and `rule`.
    ///
    /// Returns `None` when the fact does not unify with the rule's first
    /// antecedent; a mismatch is an ordinary outcome, not an error.
    pub fn infer(&self, fact: &Fact, rule: &Rule) -> Option<Derivation> {
        if self.verbosity >= Verbosity::Inference {
            trace!(fact = %fact.statement, rule = %rule, "attempting to infer");
        }

        let (first, rest) = rule.lhs.split_first()?;
        let bindings = match_statements(&fact.statement, first)?;

        let sentence = if rest.is_empty() {
            Sentence::Fact(instantiate(&rule.rhs, &bindings))
        } else {
            Sentence::Rule {
                lhs: rest.iter().map(|s| instantiate(s, &bindings)).collect(),
                rhs: instantiate(&rule.rhs, &bindings),
            }
        };

        if self.verbosity >= Verbosity::Inference {
            debug!(derived = %sentence, bindings = %bindings, "inferred");
        }

        Some(Derivation {
            sentence,
            support: Support::new(fact.id, rule.id),
            bindings,
        })
    }
}
