//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How much of the engine's work is reported through `tracing`.
///
/// Warnings (invalid queries, truncated derivations) are emitted at every level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    #[default]
    Quiet,
    /// Assert, retract, and ask calls with their outcomes.
    Operations,
    /// Everything above, plus every add and inference attempt.
    Inference,
}

/// Configuration for a knowledge base and its inference engine.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub verbosity: Verbosity,

    /// Maximum derivation depth below a user assertion. `None` means unbounded,
    /// which only terminates for rule sets that cannot generate new statements forever.
    pub max_derivation_depth: Option<usize>,
}

impl EngineConfig {
    /// Read a configuration from TOML, e.g.
    ///
    /// ```toml
    /// verbosity = "inference"
    /// max_derivation_depth = 64
    /// ```
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Set the verbosity.
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Bound the derivation depth.
    pub fn with_max_derivation_depth(mut self, depth: usize) -> Self {
        self.max_derivation_depth = Some(depth);
        self
    }

    pub fn logs_operations(&self) -> bool {
        self.verbosity >= Verbosity::Operations
    }

    pub fn logs_inference(&self) -> bool {
        self.verbosity >= Verbosity::Inference
    }
}
