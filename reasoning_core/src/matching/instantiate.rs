//! Substitution of bindings into statement templates.

use logic_terms::Statement;

use super::Bindings;

/// Replace every bound variable in `template` with its resolved value.
///
/// Unbound variables are left in place, so a rule's later antecedents can be
/// partially instantiated.
pub fn instantiate(template: &Statement, bindings: &Bindings) -> Statement {
    Statement {
        predicate: template.predicate.clone(),
        terms: template.terms.iter().map(|t| bindings.resolve(t)).collect(),
    }
}
