//! Builder settings

use serde::{Deserialize, Serialize};

use crate::detection::rules::default_physics_rules;
use crate::detection::PatternRule;

/// Configuration for reconstruction.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BuilderConfig {
    /// Blocks that need a support and are placed last.
    pub physics_patterns: Vec<PatternRule>,
    /// If non-empty, only these identifiers (and air) may be placed.
    pub allowed_blocks: Vec<String>,
    /// Distinct problems kept verbatim in a build report.
    pub max_reported_errors: usize,
    /// Undo entries kept per actor.
    pub max_undo_depth: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            physics_patterns: default_physics_rules(),
            allowed_blocks: Vec::new(),
            max_reported_errors: 5,
            max_undo_depth: 10,
        }
    }
}
