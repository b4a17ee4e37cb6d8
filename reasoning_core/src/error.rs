//! Error types for `reasoning_core`.

use thiserror::Error;

use crate::knowledge_base::ItemId;

#[derive(Debug, Error)]
pub enum KbError {
    #[error("invalid sentence: {0}")]
    InvalidSentence(String),

    /// A live item was scheduled for deletion. Indicates broken justification bookkeeping.
    #[error("justification invariant violated: {0}")]
    InvariantViolation(String),

    #[error("dangling reference to {0}")]
    DanglingReference(ItemId),

    #[error("parse error: {0}")]
    Parse(#[from] logic_terms::ParseError),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}

pub type Result<T, E = KbError> = std::result::Result<T, E>;
