//! # Reasoning Core
//!
//! A forward-chaining rule engine over a mutable knowledge base, with
//! justification tracking so that retracting an assertion removes exactly the
//! knowledge that depended on it. Builds on the statement model in
//! `logic_terms`.
//!
//! ## Core Components
//!
//! - **matching**: Unification of statements and instantiation of templates
//! - **knowledge_base**: Facts, rules, their justification graph, and the
//!   assert/ask/retract operations
//! - **inference**: One forward-chaining step from a fact and a rule
//! - **config**: Engine configuration, including verbosity
//!
//! ## Design Philosophy
//!
//! - **Arena-Owned**: The knowledge base owns every fact and rule; entries refer to each other by id
//! - **Run to Completion**: Every operation finishes all derivation or cascade work before returning
//! - **Typed Outcomes**: Query and retraction results distinguish every observable case

pub mod config;
pub mod error;
pub mod inference;
pub mod knowledge_base;
pub mod matching;

pub use config::*;
pub use error::{KbError, Result};
pub use inference::*;
pub use knowledge_base::*;
pub use matching::*;
