//! Detection limits and classification tables

use serde::{Deserialize, Serialize};

use super::rules::{
    default_built_material_rules, default_indicator_blocks, default_natural_blocks,
    default_vegetation_rules, PatternRule,
};

/// Configuration for structure detection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DetectionConfig {
    /// Identifiers of terrain blocks that bound a structure.
    pub natural_blocks: Vec<String>,
    /// Identifiers that seed detection and chunk scans.
    pub structure_indicator_blocks: Vec<String>,
    /// Organic blocks excluded from structures.
    pub vegetation_patterns: Vec<PatternRule>,
    /// Name patterns of processed building materials.
    pub built_material_patterns: Vec<PatternRule>,
    /// Cells dequeued before the flood fill gives up.
    pub max_flood_iterations: usize,
    /// Radius of the indicator search around a natural seed.
    pub search_radius: i32,
    pub min_structure_size: usize,
    pub max_structure_size: usize,
    /// Maximum extent along x, y and z.
    pub max_dimensions: [i32; 3],
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            natural_blocks: default_natural_blocks(),
            structure_indicator_blocks: default_indicator_blocks(),
            vegetation_patterns: default_vegetation_rules(),
            built_material_patterns: default_built_material_rules(),
            max_flood_iterations: 100_000,
            search_radius: 64,
            min_structure_size: 20,
            max_structure_size: 50_000,
            max_dimensions: [128, 128, 128],
        }
    }
}
