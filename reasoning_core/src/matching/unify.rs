//! Unification of statements.

use logic_terms::{Statement, Term};

use super::Bindings;

/// Compute the bindings that make two statements structurally identical.
///
/// Variables on either side may be bound, including to other variables.
/// Returns `None` when the predicates, the arities, or any pair of resolved
/// constants differ. A successful match of two ground statements yields an
/// empty binding set.
pub fn match_statements(a: &Statement, b: &Statement) -> Option<Bindings> {
    match_with(a, b, Bindings::new())
}

/// Like [`match_statements`], but extends an existing binding set.
pub fn match_with(a: &Statement, b: &Statement, mut bindings: Bindings) -> Option<Bindings> {
    if a.predicate != b.predicate || a.arity() != b.arity() {
        return None;
    }

    for (left, right) in a.terms.iter().zip(&b.terms) {
        if !unify_terms(left, right, &mut bindings) {
            return None;
        }
    }

    Some(bindings)
}

fn unify_terms(left: &Term, right: &Term, bindings: &mut Bindings) -> bool {
    let left = bindings.resolve(left);
    let right = bindings.resolve(right);

    if left == right {
        return true;
    }

    match (left, right) {
        (Term::Variable(variable), value) | (value, Term::Variable(variable)) => {
            bindings.bind(variable, value);
            true
        }
        // Two different constants.
        _ => false,
    }
}
