//! Justifications and the interface shared by facts and rules.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::{FactId, RuleId};

/// Identifies either kind of entry in the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemId {
    Fact(FactId),
    Rule(RuleId),
}

impl ItemId {
    pub fn is_fact(&self) -> bool {
        matches!(self, ItemId::Fact(_))
    }

    pub fn is_rule(&self) -> bool {
        matches!(self, ItemId::Rule(_))
    }
}

impl From<FactId> for ItemId {
    fn from(id: FactId) -> Self {
        ItemId::Fact(id)
    }
}

impl From<RuleId> for ItemId {
    fn from(id: RuleId) -> Self {
        ItemId::Rule(id)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Fact(id) => write!(f, "fact {}", id),
            ItemId::Rule(id) => write!(f, "rule {}", id),
        }
    }
}

/// One justification: the item was derived by matching `fact` against the
/// first antecedent of `rule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Support {
    pub fact: FactId,
    pub rule: RuleId,
}

impl Support {
    pub fn new(fact: FactId, rule: RuleId) -> Self {
        Self { fact, rule }
    }

    /// Check whether this justification depends on the given item.
    pub fn names(&self, item: ItemId) -> bool {
        match item {
            ItemId::Fact(id) => self.fact == id,
            ItemId::Rule(id) => self.rule == id,
        }
    }

    /// Both items this justification depends on.
    pub fn parents(&self) -> [ItemId; 2] {
        [ItemId::Fact(self.fact), ItemId::Rule(self.rule)]
    }
}

/// Justification bookkeeping common to facts and rules.
///
/// An item is live while it is asserted or has at least one justification;
/// only items that are not live may be deleted.
pub trait Justified {
    fn id(&self) -> ItemId;

    fn asserted(&self) -> bool;

    fn set_asserted(&mut self, asserted: bool);

    fn supported_by(&self) -> &[Support];

    fn supported_by_mut(&mut self) -> &mut Vec<Support>;

    /// Facts derived with this item as one of their parents.
    fn supports_facts(&self) -> &HashSet<FactId>;

    fn supports_facts_mut(&mut self) -> &mut HashSet<FactId>;

    /// Rules derived with this item as one of their parents.
    fn supports_rules(&self) -> &HashSet<RuleId>;

    fn supports_rules_mut(&mut self) -> &mut HashSet<RuleId>;

    fn is_live(&self) -> bool {
        self.asserted() || !self.supported_by().is_empty()
    }

    /// Record a derived item as depending on this one.
    fn add_dependent(&mut self, dependent: ItemId) {
        match dependent {
            ItemId::Fact(id) => {
                self.supports_facts_mut().insert(id);
            }
            ItemId::Rule(id) => {
                self.supports_rules_mut().insert(id);
            }
        }
    }

    fn remove_dependent(&mut self, dependent: ItemId) {
        match dependent {
            ItemId::Fact(id) => {
                self.supports_facts_mut().remove(&id);
            }
            ItemId::Rule(id) => {
                self.supports_rules_mut().remove(&id);
            }
        }
    }

    /// Every item derived with this one as a parent, facts first.
    fn dependents(&self) -> Vec<ItemId> {
        self.supports_facts()
            .iter()
            .map(|id| ItemId::Fact(*id))
            .chain(self.supports_rules().iter().map(|id| ItemId::Rule(*id)))
            .collect()
    }

    /// Check whether any remaining justification depends on `item`.
    fn depends_on(&self, item: ItemId) -> bool {
        self.supported_by().iter().any(|s| s.names(item))
    }
}
