//! Knowledge Base - the store of facts and rules, and the assert path.

use logic_terms::{parse_program, Sentence, Statement};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use tracing::{debug, info, warn};

use super::{Fact, FactId, ItemId, Justified, Rule, RuleId, Support};
use crate::config::EngineConfig;
use crate::error::{KbError, Result};
use crate::inference::InferenceEngine;

/// Whether an added sentence created a new entry or merged into an equal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStatus {
    Added,
    Merged,
}

/// What a call to [`KnowledgeBase::assert`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertOutcome {
    /// The entry now holding the asserted sentence.
    pub item: ItemId,
    pub status: AddStatus,
    /// New facts created by the derivations this assertion triggered.
    pub derived_facts: usize,
    /// New rules created by the derivations this assertion triggered.
    pub derived_rules: usize,
    /// Inference attempts skipped because of `max_derivation_depth`.
    pub truncated: usize,
}

/// A pending inference attempt on the agenda.
#[derive(Debug, Clone, Copy)]
struct Attempt {
    fact: FactId,
    rule: RuleId,
    depth: usize,
}

type RuleKey = (Vec<Statement>, Statement);

/// The knowledge base: facts, rules, and the justifications linking them.
///
/// Facts are unique by statement and rules by `(lhs, rhs)`. Asserting an
/// item runs forward chaining to exhaustion; retracting one removes
/// everything left without support.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    /// All facts stored by ID.
    facts: HashMap<FactId, Fact>,

    /// All rules stored by ID.
    rules: HashMap<RuleId, Rule>,

    /// Insertion order, for deterministic iteration.
    fact_order: Vec<FactId>,
    rule_order: Vec<RuleId>,

    /// Index: Statement -> the fact holding it.
    fact_index: HashMap<Statement, FactId>,

    /// Index: (lhs, rhs) -> the rule holding it.
    rule_index: HashMap<RuleKey, RuleId>,

    engine: InferenceEngine,

    config: EngineConfig,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl KnowledgeBase {
    /// Create an empty knowledge base with the given configuration.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            facts: HashMap::new(),
            rules: HashMap::new(),
            fact_order: Vec::new(),
            rule_order: Vec::new(),
            fact_index: HashMap::new(),
            rule_index: HashMap::new(),
            engine: InferenceEngine::new(config.verbosity),
            config,
        }
    }

    /// Create an empty knowledge base with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(EngineConfig::default())
    }

    /// Create a knowledge base seeded with user assertions.
    ///
    /// Seeding goes through [`KnowledgeBase::assert`], so everything derivable
    /// from the initial sentences is present once this returns.
    pub fn from_sentences(
        sentences: impl IntoIterator<Item = Sentence>,
        config: EngineConfig,
    ) -> Result<Self> {
        let mut kb = Self::new(config);
        for sentence in sentences {
            kb.assert(sentence)?;
        }
        Ok(kb)
    }

    /// Parse a knowledge-base description and seed a knowledge base from it.
    pub fn from_program(input: &str, config: EngineConfig) -> Result<Self> {
        let sentences = parse_program(input)?;
        Self::from_sentences(sentences, config)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Assert a fact or rule as directly known.
    ///
    /// If an equal item already exists it is marked asserted; otherwise it is
    /// inserted and every fact/rule pairing it forms is tried exactly once,
    /// recursively through everything derived.
    pub fn assert(&mut self, sentence: impl Into<Sentence>) -> Result<AssertOutcome> {
        let sentence = sentence.into();

        if let Some(defect) = sentence.defect() {
            warn!(sentence = %sentence, defect = %defect, "rejected assertion");
            return Err(KbError::InvalidSentence(defect));
        }

        if self.config.logs_operations() {
            info!(sentence = %sentence, "asserting");
        }

        let mut agenda = VecDeque::new();
        let (item, status) = self.add(sentence, None, 0, &mut agenda)?;

        let mut outcome = AssertOutcome {
            item,
            status,
            derived_facts: 0,
            derived_rules: 0,
            truncated: 0,
        };
        self.run_agenda(agenda, &mut outcome)?;

        if self.config.logs_operations() {
            info!(
                status = ?outcome.status,
                derived_facts = outcome.derived_facts,
                derived_rules = outcome.derived_rules,
                "assertion complete"
            );
        }

        Ok(outcome)
    }

    /// Add a sentence, either as a bare assertion (`support == None`) or as a
    /// derivation. New entries schedule one attempt against every existing
    /// counterpart; merges never schedule anything.
    fn add(
        &mut self,
        sentence: Sentence,
        support: Option<Support>,
        depth: usize,
        agenda: &mut VecDeque<Attempt>,
    ) -> Result<(ItemId, AddStatus)> {
        if self.config.logs_inference() {
            debug!(sentence = %sentence, derived = support.is_some(), "adding");
        }

        let (id, status) = match self.lookup(&sentence) {
            Some(id) => {
                let entry = self.entry_mut(id)?;
                match support {
                    Some(support) => entry.supported_by_mut().push(support),
                    None => entry.set_asserted(true),
                }
                (id, AddStatus::Merged)
            }
            None => (self.insert(sentence, support), AddStatus::Added),
        };

        if let Some(support) = support {
            self.link(support, id)?;
        }

        if status == AddStatus::Added {
            self.schedule(id, depth, agenda);
        }

        Ok((id, status))
    }

    fn insert(&mut self, sentence: Sentence, support: Option<Support>) -> ItemId {
        match sentence {
            Sentence::Fact(statement) => {
                let fact = match support {
                    Some(support) => Fact::derived(statement, support),
                    None => Fact::new(statement),
                };
                let id = fact.id;
                self.fact_index.insert(fact.statement.clone(), id);
                self.fact_order.push(id);
                self.facts.insert(id, fact);
                ItemId::Fact(id)
            }
            Sentence::Rule { lhs, rhs } => {
                let rule = match support {
                    Some(support) => Rule::derived(lhs, rhs, support),
                    None => Rule::new(lhs, rhs),
                };
                let id = rule.id;
                self.rule_index
                    .insert((rule.lhs.clone(), rule.rhs.clone()), id);
                self.rule_order.push(id);
                self.rules.insert(id, rule);
                ItemId::Rule(id)
            }
        }
    }

    /// Register `dependent` on both parents named by `support`.
    fn link(&mut self, support: Support, dependent: ItemId) -> Result<()> {
        for parent in support.parents() {
            self.entry_mut(parent)?.add_dependent(dependent);
        }
        Ok(())
    }

    fn schedule(&self, id: ItemId, depth: usize, agenda: &mut VecDeque<Attempt>) {
        match id {
            ItemId::Fact(fact) => agenda.extend(
                self.rule_order
                    .iter()
                    .map(|&rule| Attempt { fact, rule, depth }),
            ),
            ItemId::Rule(rule) => agenda.extend(
                self.fact_order
                    .iter()
                    .map(|&fact| Attempt { fact, rule, depth }),
            ),
        }
    }

    /// Work through pending inference attempts until none remain.
    fn run_agenda(
        &mut self,
        mut agenda: VecDeque<Attempt>,
        outcome: &mut AssertOutcome,
    ) -> Result<()> {
        while let Some(attempt) = agenda.pop_front() {
            if let Some(max_depth) = self.config.max_derivation_depth {
                if attempt.depth >= max_depth {
                    outcome.truncated += 1;
                    continue;
                }
            }

            let derivation = {
                let fact = self
                    .facts
                    .get(&attempt.fact)
                    .ok_or(KbError::DanglingReference(ItemId::Fact(attempt.fact)))?;
                let rule = self
                    .rules
                    .get(&attempt.rule)
                    .ok_or(KbError::DanglingReference(ItemId::Rule(attempt.rule)))?;
                self.engine.infer(fact, rule)
            };

            let Some(derivation) = derivation else {
                continue;
            };

            let (id, status) = self.add(
                derivation.sentence,
                Some(derivation.support),
                attempt.depth + 1,
                &mut agenda,
            )?;

            if status == AddStatus::Added {
                match id {
                    ItemId::Fact(_) => outcome.derived_facts += 1,
                    ItemId::Rule(_) => outcome.derived_rules += 1,
                }
            }
        }

        if outcome.truncated > 0 {
            warn!(
                truncated = outcome.truncated,
                max_depth = ?self.config.max_derivation_depth,
                "derivation depth limit reached, some inferences were skipped"
            );
        }

        Ok(())
    }

    /// Find the entry structurally equal to a sentence.
    pub fn lookup(&self, sentence: &Sentence) -> Option<ItemId> {
        match sentence {
            Sentence::Fact(statement) => self.find_fact(statement).map(|f| ItemId::Fact(f.id)),
            Sentence::Rule { lhs, rhs } => self.find_rule(lhs, rhs).map(|r| ItemId::Rule(r.id)),
        }
    }

    /// Check if an equal fact or rule is stored.
    pub fn contains(&self, sentence: &Sentence) -> bool {
        self.lookup(sentence).is_some()
    }

    /// Get fact by ID.
    pub fn fact(&self, id: FactId) -> Option<&Fact> {
        self.facts.get(&id)
    }

    /// Get rule by ID.
    pub fn rule(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(&id)
    }

    /// Get either kind of entry through its justification interface.
    pub fn item(&self, id: ItemId) -> Option<&dyn Justified> {
        match id {
            ItemId::Fact(id) => self.facts.get(&id).map(|f| f as &dyn Justified),
            ItemId::Rule(id) => self.rules.get(&id).map(|r| r as &dyn Justified),
        }
    }

    pub fn find_fact(&self, statement: &Statement) -> Option<&Fact> {
        self.fact_index
            .get(statement)
            .and_then(|id| self.facts.get(id))
    }

    pub fn find_rule(&self, lhs: &[Statement], rhs: &Statement) -> Option<&Rule> {
        self.rule_index
            .get(&(lhs.to_vec(), rhs.clone()))
            .and_then(|id| self.rules.get(id))
    }

    /// All facts in insertion order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.fact_order.iter().filter_map(|id| self.facts.get(id))
    }

    /// All rules in insertion order.
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.rule_order.iter().filter_map(|id| self.rules.get(id))
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub(super) fn entry(&self, id: ItemId) -> Result<&dyn Justified> {
        self.item(id).ok_or(KbError::DanglingReference(id))
    }

    pub(super) fn entry_mut(&mut self, id: ItemId) -> Result<&mut dyn Justified> {
        let entry = match id {
            ItemId::Fact(fact) => self.facts.get_mut(&fact).map(|f| f as &mut dyn Justified),
            ItemId::Rule(rule) => self.rules.get_mut(&rule).map(|r| r as &mut dyn Justified),
        };
        entry.ok_or(KbError::DanglingReference(id))
    }

    /// Remove a fact from the store and its indexes.
    pub(super) fn take_fact(&mut self, id: FactId) -> Option<Fact> {
        let fact = self.facts.remove(&id)?;
        self.fact_index.remove(&fact.statement);
        self.fact_order.retain(|f| *f != id);
        Some(fact)
    }

    /// Remove a rule from the store and its indexes.
    pub(super) fn take_rule(&mut self, id: RuleId) -> Option<Rule> {
        let rule = self.rules.remove(&id)?;
        self.rule_index.remove(&(rule.lhs.clone(), rule.rhs.clone()));
        self.rule_order.retain(|r| *r != id);
        Some(rule)
    }

    /// Render the justification tree of a stored fact or rule.
    ///
    /// Returns `None` if the sentence is not in the knowledge base.
    pub fn explain(&self, sentence: &Sentence) -> Option<String> {
        let id = self.lookup(sentence)?;
        let mut out = String::new();
        let mut path = Vec::new();
        self.explain_item(id, 0, &mut path, &mut out);
        Some(out)
    }

    fn explain_item(&self, id: ItemId, depth: usize, path: &mut Vec<ItemId>, out: &mut String) {
        let (label, entry): (String, &dyn Justified) = match id {
            ItemId::Fact(fact) => match self.facts.get(&fact) {
                Some(f) => (f.to_string(), f as &dyn Justified),
                None => return,
            },
            ItemId::Rule(rule) => match self.rules.get(&rule) {
                Some(r) => (r.to_string(), r as &dyn Justified),
                None => return,
            },
        };

        let indent = "  ".repeat(depth);
        let marker = if entry.asserted() { " ASSERTED" } else { "" };
        out.push_str(&format!("{}{}{}\n", indent, label, marker));

        // Circular support: the item is already being explained further up.
        if path.contains(&id) {
            return;
        }

        path.push(id);
        for support in entry.supported_by() {
            out.push_str(&format!("{}  SUPPORTED BY\n", indent));
            self.explain_item(ItemId::Fact(support.fact), depth + 2, path, out);
            self.explain_item(ItemId::Rule(support.rule), depth + 2, path, out);
        }
        path.pop();
    }
}

impl fmt::Display for KnowledgeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Knowledge Base:")?;
        for fact in self.facts() {
            writeln!(f, "{}", fact)?;
        }
        for rule in self.rules() {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
