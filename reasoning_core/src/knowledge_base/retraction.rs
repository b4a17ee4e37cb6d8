//! Retraction and cascading removal of unsupported items.
//!
//! Retracting clears an item's asserted flag. If nothing else justifies it,
//! the item is removed, and so is everything whose last justification
//! mentioned it, breadth first through the dependency graph.

use logic_terms::Sentence;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

use super::{Fact, ItemId, Justified, KnowledgeBase, Rule, Support};
use crate::error::{KbError, Result};

/// Everything a retraction deleted, in removal order.
#[derive(Debug, Clone, Default)]
pub struct Removal {
    pub facts: Vec<Fact>,
    pub rules: Vec<Rule>,
}

impl Removal {
    pub fn len(&self) -> usize {
        self.facts.len() + self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.rules.is_empty()
    }
}

/// What a call to [`KnowledgeBase::retract`] did.
#[derive(Debug, Clone)]
pub enum RetractOutcome {
    /// No equal fact or rule was stored.
    NotFound,
    /// The item lost its asserted flag but is still derived from other items.
    StillSupported(ItemId),
    Removed(Removal),
}

impl RetractOutcome {
    /// Items deleted by the retraction; empty unless something was removed.
    pub fn removed_count(&self) -> usize {
        match self {
            RetractOutcome::Removed(removal) => removal.len(),
            RetractOutcome::NotFound | RetractOutcome::StillSupported(_) => 0,
        }
    }
}

impl KnowledgeBase {
    /// Withdraw a user assertion.
    ///
    /// The item is removed only if no justification remains; removal then
    /// cascades to every dependent left without support.
    pub fn retract(&mut self, sentence: impl Into<Sentence>) -> Result<RetractOutcome> {
        let sentence = sentence.into();

        if self.config().logs_operations() {
            info!(sentence = %sentence, "retracting");
        }

        let Some(id) = self.lookup(&sentence) else {
            if self.config().logs_operations() {
                info!(sentence = %sentence, "nothing to retract");
            }
            return Ok(RetractOutcome::NotFound);
        };

        let entry = self.entry_mut(id)?;
        entry.set_asserted(false);
        if entry.is_live() {
            if self.config().logs_operations() {
                info!(item = %id, "still supported, kept");
            }
            return Ok(RetractOutcome::StillSupported(id));
        }

        let removal = self.remove_cascade(id)?;

        if self.config().logs_operations() {
            info!(
                facts = removal.facts.len(),
                rules = removal.rules.len(),
                "retraction complete"
            );
        }

        Ok(RetractOutcome::Removed(removal))
    }

    /// Delete `root` and everything that loses its last justification as a
    /// result. Every item deleted must be neither asserted nor supported.
    fn remove_cascade(&mut self, root: ItemId) -> Result<Removal> {
        let mut removal = Removal::default();
        let mut queue = VecDeque::from([root]);
        let mut scheduled = HashSet::from([root]);

        while let Some(id) = queue.pop_front() {
            let dependents = {
                let entry = self.entry(id)?;
                if entry.is_live() {
                    return Err(KbError::InvariantViolation(format!(
                        "{} is asserted or supported but was scheduled for removal",
                        id
                    )));
                }
                entry.dependents()
            };

            for dependent in dependents {
                let orphaned = self.detach(dependent, id)?;
                if orphaned && scheduled.insert(dependent) {
                    queue.push_back(dependent);
                }
            }

            if self.config().logs_inference() {
                debug!(item = %id, "removing");
            }

            match id {
                ItemId::Fact(fact) => {
                    let fact = self
                        .take_fact(fact)
                        .ok_or(KbError::DanglingReference(id))?;
                    removal.facts.push(fact);
                }
                ItemId::Rule(rule) => {
                    let rule = self
                        .take_rule(rule)
                        .ok_or(KbError::DanglingReference(id))?;
                    removal.rules.push(rule);
                }
            }
        }

        Ok(removal)
    }

    /// Drop every justification of `dependent` that names `removed`, and the
    /// back-references those justifications held on their other parent.
    ///
    /// Returns true if `dependent` is left neither asserted nor supported.
    fn detach(&mut self, dependent: ItemId, removed: ItemId) -> Result<bool> {
        let (dropped, orphaned, remaining): (Vec<Support>, bool, Vec<ItemId>) = {
            let entry = self.entry_mut(dependent)?;
            let (dropped, kept): (Vec<Support>, Vec<Support>) = entry
                .supported_by_mut()
                .drain(..)
                .partition(|support| support.names(removed));
            *entry.supported_by_mut() = kept;

            let still_linked = dropped
                .iter()
                .flat_map(Support::parents)
                .filter(|parent| *parent != removed && entry.depends_on(*parent))
                .collect();
            (dropped, !entry.is_live(), still_linked)
        };

        let mut unlinked = HashSet::new();
        for parent in dropped.iter().flat_map(Support::parents) {
            if parent == removed || remaining.contains(&parent) || !unlinked.insert(parent) {
                continue;
            }
            self.entry_mut(parent)?.remove_dependent(dependent);
        }

        Ok(orphaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logic_terms::{parse_sentence, parse_statement, Statement};

    fn sentence(text: &str) -> Sentence {
        parse_sentence(text).unwrap()
    }

    fn statement(text: &str) -> Statement {
        parse_statement(text).unwrap()
    }

    fn kb_with(lines: &[&str]) -> KnowledgeBase {
        let mut kb = KnowledgeBase::with_defaults();
        for line in lines {
            kb.assert(sentence(line)).unwrap();
        }
        kb
    }

    /// Every back-reference has a matching justification and vice versa.
    fn assert_links_symmetric(kb: &KnowledgeBase) {
        let items: Vec<&dyn Justified> = kb
            .facts()
            .map(|f| f as &dyn Justified)
            .chain(kb.rules().map(|r| r as &dyn Justified))
            .collect();

        for item in &items {
            for support in item.supported_by() {
                for parent in support.parents() {
                    let parent = kb.item(parent).expect("justification names a missing item");
                    assert!(parent.dependents().contains(&item.id()));
                }
            }
            for dependent in item.dependents() {
                let dependent = kb.item(dependent).expect("back-reference to a missing item");
                assert!(dependent.depends_on(item.id()));
            }
        }
    }

    #[test]
    fn test_retract_cascades_to_derived_facts() {
        let mut kb = kb_with(&["fact: (f a)", "rule: ((f ?x)) -> (g ?x)"]);

        let outcome = kb.retract(sentence("fact: (f a)")).unwrap();
        let RetractOutcome::Removed(removal) = outcome else {
            panic!("expected removal");
        };

        let removed: Vec<String> = removal
            .facts
            .iter()
            .map(|f| f.statement.to_string())
            .collect();
        assert_eq!(removed, vec!["(f a)", "(g a)"]);
        assert!(removal.rules.is_empty());
        assert_eq!(kb.fact_count(), 0);
        assert_eq!(kb.rule_count(), 1);

        let rule = kb.rules().next().unwrap();
        assert!(rule.supports_facts.is_empty());
        assert_links_symmetric(&kb);
    }

    #[test]
    fn test_retract_keeps_asserted_dependents() {
        let mut kb = kb_with(&[
            "fact: (f a)",
            "rule: ((f ?x)) -> (g ?x)",
            "fact: (g a)",
        ]);

        kb.retract(sentence("fact: (f a)")).unwrap();

        let g = kb.find_fact(&statement("(g a)")).unwrap();
        assert!(g.asserted);
        assert!(g.supported_by.is_empty());
        assert!(!kb.contains(&sentence("fact: (f a)")));
        assert_links_symmetric(&kb);
    }

    #[test]
    fn test_retract_rule_removes_derived_rules_and_facts() {
        let mut kb = kb_with(&[
            "fact: (p a)",
            "fact: (q a)",
            "rule: ((p ?x) (q ?x)) -> (r ?x)",
        ]);
        assert_eq!(kb.rule_count(), 2);

        let outcome = kb
            .retract(sentence("rule: ((p ?x) (q ?x)) -> (r ?x)"))
            .unwrap();
        assert_eq!(outcome.removed_count(), 3);

        assert_eq!(kb.rule_count(), 0);
        assert!(!kb.contains(&sentence("fact: (r a)")));
        assert!(kb.contains(&sentence("fact: (p a)")));
        assert!(kb.contains(&sentence("fact: (q a)")));

        for fact in kb.facts() {
            assert!(fact.supports_rules.is_empty());
            assert!(fact.supports_facts.is_empty());
        }
        assert_links_symmetric(&kb);
    }

    #[test]
    fn test_retract_second_antecedent_removes_chain() {
        let mut kb = kb_with(&[
            "fact: (p a)",
            "fact: (q a)",
            "rule: ((p ?x) (q ?x)) -> (r ?x)",
        ]);

        kb.retract(sentence("fact: (q a)")).unwrap();

        assert!(!kb.contains(&sentence("fact: (r a)")));
        // The intermediate rule only needed (p a) and the original rule.
        assert!(kb.contains(&sentence("rule: ((q a)) -> (r a)")));
        assert_links_symmetric(&kb);

        kb.retract(sentence("fact: (p a)")).unwrap();
        assert!(!kb.contains(&sentence("rule: ((q a)) -> (r a)")));
        assert_eq!(kb.rule_count(), 1);
        assert_eq!(kb.fact_count(), 0);
        assert_links_symmetric(&kb);
    }

    #[test]
    fn test_retract_keeps_items_with_other_support() {
        let mut kb = kb_with(&[
            "fact: (f a)",
            "fact: (h a)",
            "rule: ((f ?x)) -> (g ?x)",
            "rule: ((h ?x)) -> (g ?x)",
        ]);

        kb.retract(sentence("fact: (f a)")).unwrap();

        let g = kb.find_fact(&statement("(g a)")).unwrap();
        assert_eq!(g.supported_by.len(), 1);
        assert_eq!(
            g.supported_by[0].fact,
            kb.find_fact(&statement("(h a)")).unwrap().id
        );
        assert_links_symmetric(&kb);
    }

    #[test]
    fn test_retract_not_found() {
        let mut kb = kb_with(&["fact: (f a)"]);
        let outcome = kb.retract(sentence("fact: (f b)")).unwrap();
        assert!(matches!(outcome, RetractOutcome::NotFound));
        assert_eq!(kb.fact_count(), 1);
    }

    #[test]
    fn test_retract_derived_fact_is_still_supported() {
        let mut kb = kb_with(&["fact: (f a)", "rule: ((f ?x)) -> (g ?x)"]);

        let outcome = kb.retract(sentence("fact: (g a)")).unwrap();
        assert!(matches!(outcome, RetractOutcome::StillSupported(ItemId::Fact(_))));
        assert!(kb.contains(&sentence("fact: (g a)")));
        assert_eq!(outcome.removed_count(), 0);
    }

    #[test]
    fn test_retract_asserted_and_derived_fact_keeps_it() {
        let mut kb = kb_with(&[
            "fact: (f a)",
            "rule: ((f ?x)) -> (g ?x)",
            "fact: (g a)",
        ]);

        let outcome = kb.retract(sentence("fact: (g a)")).unwrap();
        assert!(matches!(outcome, RetractOutcome::StillSupported(_)));

        let g = kb.find_fact(&statement("(g a)")).unwrap();
        assert!(!g.asserted);
        assert_eq!(g.supported_by.len(), 1);
    }

    #[test]
    fn test_retract_then_reassert() {
        let mut kb = kb_with(&["fact: (f a)", "rule: ((f ?x)) -> (g ?x)"]);

        kb.retract(sentence("fact: (f a)")).unwrap();
        assert!(!kb.contains(&sentence("fact: (g a)")));

        kb.assert(sentence("fact: (f a)")).unwrap();
        assert!(kb.contains(&sentence("fact: (g a)")));
        assert_links_symmetric(&kb);
    }
}
