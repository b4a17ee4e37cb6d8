//! Queries against the facts of a knowledge base.

use logic_terms::{parse_sentence, Sentence};
use std::fmt;
use tracing::{info, warn};

use super::{Fact, KnowledgeBase};
use crate::matching::{match_statements, Bindings};

/// One answer to a query: the bindings and the fact(s) they came from.
#[derive(Debug, Clone)]
pub struct QueryMatch<'kb> {
    pub bindings: Bindings,
    pub facts: Vec<&'kb Fact>,
}

/// Every answer to a query, in the order the matching facts were added.
#[derive(Debug, Clone, Default)]
pub struct ListOfBindings<'kb> {
    matches: Vec<QueryMatch<'kb>>,
}

impl<'kb> ListOfBindings<'kb> {
    pub fn new() -> Self {
        Self {
            matches: Vec::new(),
        }
    }

    /// Record an answer.
    pub fn add_bindings(&mut self, bindings: Bindings, facts: Vec<&'kb Fact>) {
        self.matches.push(QueryMatch { bindings, facts });
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&QueryMatch<'kb>> {
        self.matches.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueryMatch<'kb>> {
        self.matches.iter()
    }

    pub fn as_slice(&self) -> &[QueryMatch<'kb>] {
        &self.matches
    }
}

impl fmt::Display for ListOfBindings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.matches.iter().enumerate() {
            let sources: Vec<String> = m.facts.iter().map(|fact| fact.to_string()).collect();
            writeln!(f, "{}: {}  [{}]", i, m.bindings, sources.join(", "))?;
        }
        Ok(())
    }
}

/// The result of [`KnowledgeBase::ask`].
///
/// `NoMatch` and `Invalid` both carry no bindings but are distinct outcomes.
#[derive(Debug, Clone)]
pub enum AskOutcome<'kb> {
    Matched(ListOfBindings<'kb>),
    NoMatch,
    /// The query was not a well-formed fact; the reason is attached.
    Invalid(String),
}

impl<'kb> AskOutcome<'kb> {
    /// The answers, empty for both `NoMatch` and `Invalid`.
    pub fn bindings(&self) -> &[QueryMatch<'kb>] {
        match self {
            AskOutcome::Matched(list) => list.as_slice(),
            AskOutcome::NoMatch | AskOutcome::Invalid(_) => &[],
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, AskOutcome::Matched(_))
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, AskOutcome::Invalid(_))
    }

    pub fn into_list(self) -> ListOfBindings<'kb> {
        match self {
            AskOutcome::Matched(list) => list,
            AskOutcome::NoMatch | AskOutcome::Invalid(_) => ListOfBindings::new(),
        }
    }
}

impl KnowledgeBase {
    /// Ask which stored facts match a fact pattern.
    ///
    /// Only facts are queried. A rule, or an ill-formed statement, yields
    /// [`AskOutcome::Invalid`] and is reported as a warning.
    pub fn ask(&self, query: &Sentence) -> AskOutcome<'_> {
        if self.config().logs_operations() {
            info!(query = %query, "asking");
        }

        let statement = match query {
            Sentence::Fact(statement) if statement.is_well_formed() => statement,
            Sentence::Fact(statement) => {
                return self.invalid_query(query, format!("ill-formed statement {}", statement))
            }
            Sentence::Rule { .. } => {
                return self.invalid_query(query, "only facts can be queried".to_string())
            }
        };

        let mut list = ListOfBindings::new();
        for fact in self.facts() {
            if let Some(bindings) = match_statements(statement, &fact.statement) {
                list.add_bindings(bindings, vec![fact]);
            }
        }

        if self.config().logs_operations() {
            info!(query = %query, answers = list.len(), "query complete");
        }

        if list.is_empty() {
            AskOutcome::NoMatch
        } else {
            AskOutcome::Matched(list)
        }
    }

    /// Parse a `fact:` line and ask it. Unparseable input is an invalid query.
    pub fn ask_text(&self, query: &str) -> AskOutcome<'_> {
        match parse_sentence(query) {
            Ok(sentence) => self.ask(&sentence),
            Err(e) => {
                warn!(query = %query, error = %e, "invalid ask");
                AskOutcome::Invalid(e.to_string())
            }
        }
    }

    fn invalid_query(&self, query: &Sentence, reason: String) -> AskOutcome<'_> {
        warn!(query = %query, reason = %reason, "invalid ask");
        AskOutcome::Invalid(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logic_terms::{parse_statement, Term};

    fn kb_with(lines: &[&str]) -> KnowledgeBase {
        let mut kb = KnowledgeBase::with_defaults();
        for line in lines {
            kb.assert(parse_sentence(line).unwrap()).unwrap();
        }
        kb
    }

    #[test]
    fn test_ask_returns_each_match() {
        let kb = kb_with(&["fact: (p a)", "fact: (p b)", "fact: (q c)"]);

        let outcome = kb.ask_text("fact: (p ?x)");
        let answers = outcome.bindings();
        assert_eq!(answers.len(), 2);

        assert_eq!(answers[0].bindings.bound_to("x"), Some(&Term::constant("a")));
        assert_eq!(answers[0].facts.len(), 1);
        assert_eq!(answers[0].facts[0].statement, parse_statement("(p a)").unwrap());

        assert_eq!(answers[1].bindings.bound_to("x"), Some(&Term::constant("b")));
        assert_eq!(answers[1].facts[0].statement, parse_statement("(p b)").unwrap());
    }

    #[test]
    fn test_ask_ground_query() {
        let kb = kb_with(&["fact: (isa cube block)"]);

        let outcome = kb.ask_text("fact: (isa cube block)");
        assert!(outcome.is_match());
        assert_eq!(outcome.bindings().len(), 1);
        assert!(outcome.bindings()[0].bindings.is_empty());
    }

    #[test]
    fn test_ask_finds_derived_facts() {
        let kb = kb_with(&[
            "fact: (isa cube block)",
            "rule: ((isa ?x block)) -> (shape ?x)",
        ]);

        let list = kb.ask_text("fact: (shape ?s)").into_list();
        assert_eq!(list.len(), 1);
        assert!(!list.get(0).unwrap().facts[0].asserted);
    }

    #[test]
    fn test_ask_no_match_and_invalid_are_distinct() {
        let kb = kb_with(&["fact: (p a)", "rule: ((p ?x)) -> (q ?x)"]);

        let no_match = kb.ask_text("fact: (r ?x)");
        assert!(matches!(no_match, AskOutcome::NoMatch));
        assert!(no_match.bindings().is_empty());
        assert!(!no_match.is_invalid());

        let rule_query = kb.ask_text("rule: ((p ?x)) -> (q ?x)");
        assert!(rule_query.is_invalid());
        assert!(rule_query.bindings().is_empty());

        let unparseable = kb.ask_text("fact: (p");
        assert!(unparseable.is_invalid());

        let ill_formed = kb.ask(&Sentence::Fact(logic_terms::Statement::from_symbols(
            "?p",
            ["a"],
        )));
        assert!(ill_formed.is_invalid());
    }

    #[test]
    fn test_ask_does_not_modify_kb() {
        let kb = kb_with(&["fact: (p a)"]);
        let before = kb.to_string();
        let _ = kb.ask_text("fact: (p ?x)");
        let _ = kb.ask_text("rule: ((p ?x)) -> (q ?x)");
        assert_eq!(kb.to_string(), before);
    }

    #[test]
    fn test_list_of_bindings_display() {
        let kb = kb_with(&["fact: (p a)", "fact: (p b)"]);
        let list = kb.ask_text("fact: (p ?x)").into_list();
        assert_eq!(
            list.to_string(),
            "0: ?x : a  [fact: (p a)]\n1: ?x : b  [fact: (p b)]\n"
        );
    }
}
