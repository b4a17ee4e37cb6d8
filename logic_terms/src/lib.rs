//! # Logic Terms
//!
//! The vocabulary of the knowledge base - terms, statements, and the
//! sentences a caller asserts, retracts, or asks about. This crate also owns
//! the line-oriented text format and does not contain any inference logic.

pub mod parser;
pub mod terms;

pub use parser::*;
pub use terms::*;
