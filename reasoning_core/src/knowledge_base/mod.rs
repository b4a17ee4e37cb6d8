//! Knowledge Base module - facts, rules, and the justification graph between them.
//!
//! The knowledge base consists of:
//! - **Facts**: Statements, asserted by a user or derived by inference
//! - **Rules**: Implications from antecedents to a consequent
//! - **Supports**: `(fact, rule)` justifications linking each derived item to its parents
//!
//! Every entry is owned by [`KnowledgeBase`] and addressed by id, so the
//! (generally cyclic) justification graph holds no owning references.

mod fact;
mod graph;
mod query;
mod retraction;
mod rule;
mod support;

pub use fact::*;
pub use graph::*;
pub use query::*;
pub use retraction::*;
pub use rule::*;
pub use support::*;
