//! Sentences - the items a caller asserts, retracts, or asks about.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Statement;

/// A fact or a rule in its caller-facing form, before it enters a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentence {
    /// A single statement, e.g. `fact: (isa cube block)`.
    Fact(Statement),

    /// An implication from antecedents to a consequent, e.g.
    /// `rule: ((isa ?x ?y) (isa ?y ?z)) -> (isa ?x ?z)`.
    Rule {
        lhs: Vec<Statement>,
        rhs: Statement,
    },
}

impl Sentence {
    /// Create a fact sentence.
    pub fn fact(statement: Statement) -> Self {
        Sentence::Fact(statement)
    }

    /// Create a rule sentence.
    pub fn rule(lhs: impl IntoIterator<Item = Statement>, rhs: Statement) -> Self {
        Sentence::Rule {
            lhs: lhs.into_iter().collect(),
            rhs,
        }
    }

    pub fn is_fact(&self) -> bool {
        matches!(self, Sentence::Fact(_))
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, Sentence::Rule { .. })
    }

    /// The statement of a fact sentence.
    pub fn as_fact(&self) -> Option<&Statement> {
        match self {
            Sentence::Fact(statement) => Some(statement),
            Sentence::Rule { .. } => None,
        }
    }

    /// Explain why this sentence is ill formed, or `None` if it is well formed.
    pub fn defect(&self) -> Option<String> {
        match self {
            Sentence::Fact(statement) => {
                (!statement.is_well_formed()).then(|| format!("ill-formed statement {}", statement))
            }
            Sentence::Rule { lhs, rhs } => {
                if lhs.is_empty() {
                    return Some("rule has no antecedents".to_string());
                }
                lhs.iter()
                    .chain(std::iter::once(rhs))
                    .find(|s| !s.is_well_formed())
                    .map(|s| format!("ill-formed statement {}", s))
            }
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.defect().is_none()
    }
}

impl From<Statement> for Sentence {
    fn from(statement: Statement) -> Self {
        Sentence::Fact(statement)
    }
}

impl fmt::Display for Sentence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sentence::Fact(statement) => write!(f, "fact: {}", statement),
            Sentence::Rule { lhs, rhs } => {
                write!(f, "rule: (")?;
                for (i, statement) in lhs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", statement)?;
                }
                write!(f, ") -> {}", rhs)
            }
        }
    }
}
