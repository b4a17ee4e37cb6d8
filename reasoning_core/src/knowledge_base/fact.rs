//! Fact definitions - statements held by the knowledge base.

use logic_terms::Statement;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use uuid::Uuid;

use super::{ItemId, Justified, RuleId, Support};

/// Unique identifier for facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FactId(pub Uuid);

impl FactId {
    /// Create a new random fact ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A statement stored in the knowledge base, with its justifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub id: FactId,

    pub statement: Statement,

    /// Whether a user asserted this fact directly.
    pub asserted: bool,

    /// Every derivation that produced this fact. May repeat a pair when the
    /// same derivation was recorded more than once.
    pub supported_by: Vec<Support>,

    pub supports_facts: HashSet<FactId>,

    pub supports_rules: HashSet<RuleId>,
}

impl Fact {
    /// Create a fact asserted directly by a user.
    pub fn new(statement: Statement) -> Self {
        Self {
            id: FactId::new(),
            statement,
            asserted: true,
            supported_by: Vec::new(),
            supports_facts: HashSet::new(),
            supports_rules: HashSet::new(),
        }
    }

    /// Create a fact produced by inference.
    pub fn derived(statement: Statement, support: Support) -> Self {
        Self {
            asserted: false,
            supported_by: vec![support],
            ..Self::new(statement)
        }
    }
}

impl Justified for Fact {
    fn id(&self) -> ItemId {
        ItemId::Fact(self.id)
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

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fact: {}", self.statement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asserted_fact() {
        let fact = Fact::new(Statement::from_symbols("isa", ["cube", "block"]));
        assert!(fact.asserted);
        assert!(fact.supported_by.is_empty());
        assert!(fact.is_live());
        assert_eq!(fact.to_string(), "fact: (isa cube block)");
    }

    #[test]
    fn test_derived_fact() {
        let support = Support::new(FactId::new(), RuleId::new());
        let fact = Fact::derived(Statement::from_symbols("isa", ["cube", "shape"]), support);
        assert!(!fact.asserted);
        assert_eq!(fact.supported_by, vec![support]);
        assert!(fact.is_live());
        assert!(fact.depends_on(ItemId::Rule(support.rule)));
    }

    #[test]
    fn test_orphaned_fact_is_not_live() {
        let mut fact = Fact::new(Statement::from_symbols("on", ["a", "b"]));
        fact.set_asserted(false);
        assert!(!fact.is_live());
    }

    #[test]
    fn test_dependents() {
        let mut fact = Fact::new(Statement::from_symbols("on", ["a", "b"]));
        let derived_fact = FactId::new();
        let derived_rule = RuleId::new();

        fact.add_dependent(ItemId::Fact(derived_fact));
        fact.add_dependent(ItemId::Rule(derived_rule));
        fact.add_dependent(ItemId::Fact(derived_fact));

        let dependents = fact.dependents();
        assert_eq!(dependents.len(), 2);
        assert_eq!(dependents[0], ItemId::Fact(derived_fact));

        fact.remove_dependent(ItemId::Fact(derived_fact));
        assert!(fact.supports_facts.is_empty());
        assert_eq!(fact.supports_rules.len(), 1);
    }
}
