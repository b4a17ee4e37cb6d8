//! Rule definitions - implications held by the knowledge base.

use logic_terms::Statement;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use super::{FactId, ItemId, Justified, Support};

/// Unique identifier for rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleId(pub Uuid);

impl RuleId {
    /// Create a new random rule ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An implication from antecedents (`lhs`) to a consequent (`rhs`).
///
/// Two rules are the same rule when both `lhs` and `rhs` are structurally equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    pub id: RuleId,

    /// Antecedents, matched first to last. Never empty.
    pub lhs: Vec<Statement>,

    pub rhs: Statement,

    pub asserted: bool,

    pub supported_by: Vec<Support>,

    pub supports_facts: HashSet<FactId>,

    pub supports_rules: HashSet<RuleId>,
}

impl Rule {
    /// Create a rule asserted directly by a user.
    pub fn new(lhs: Vec<Statement>, rhs: Statement) -> Self {
        Self {
            id: RuleId::new(),
            lhs,
            rhs,
            asserted: true,
            supported_by: Vec::new(),
            supports_facts: HashSet::new(),
            supports_rules: HashSet::new(),
        }
    }

    /// Create a rule produced by inference.
    pub fn derived(lhs: Vec<Statement>, rhs: Statement, support: Support) -> Self {
        Self {
            asserted: false,
            supported_by: vec![support],
            ..Self::new(lhs, rhs)
        }
    }
}

impl Justified for Rule {
    fn id(&self) -> ItemId {
        ItemId::Rule(self.id)
    }

    fn asserted(&self) -> bool {
        self.asserted
    }

    fn set_asserted(&mut self, asserted: bool) {
        self.asserted = asserted;
    }

    fn supported_by(&self) -> &[Support] {
        &self.supported_by
    }

    fn supported_by_mut(&mut self) -> &mut Vec<Support> {
        &mut self.supported_by
    }

    fn supports_facts(&self) -> &HashSet<FactId> {
        &self.supports_facts
    }

    fn supports_facts_mut(&mut self) -> &mut HashSet<FactId> {
        &mut self.supports_facts
    }

    fn supports_rules(&self) -> &HashSet<RuleId> {
        &self.supports_rules
    }

    fn supports_rules_mut(&mut self) -> &mut HashSet<RuleId> {
        &mut self.supports_rules
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rule: (")?;
        for (i, statement) in self.lhs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", statement)?;
        }
        write!(f, ") -> {}", self.rhs)
    }
}
