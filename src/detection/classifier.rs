//! Block classification for detection.
//!
//! Built once from a [`DetectionConfig`] and immutable afterwards.

use std::collections::HashSet;

use log::warn;

use super::config::DetectionConfig;
use super::rules::{any_match, PatternRule};
use crate::voxel::block_state::{identifier_path, is_air, normalize_identifier};
use crate::voxel::BlockState;

/// Classification of a block for detection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockClass {
    /// Terrain that bounds a structure
    Natural,
    /// Configured seed block
    StructureIndicator,
    /// Any other structure part
    ManMade,
    Air,
    /// Vegetation and anything else that is neither terrain nor structure
    Other,
}

/// Immutable classifier built from detection configuration
#[derive(Clone, Debug)]
pub struct VoxelClassifier {
    natural: HashSet<String>,
    indicators: HashSet<String>,
    vegetation: Vec<PatternRule>,
    built: Vec<PatternRule>,
}

fn normalized_set(ids: &[String], table: &str) -> HashSet<String> {
    ids.iter()
        .filter_map(|raw| {
            let id = normalize_identifier(raw);
            if id.is_none() {
                warn!("Ignoring malformed identifier '{raw}' in {table}");
            }
            id
        })
        .collect()
}

impl VoxelClassifier {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            natural: normalized_set(&config.natural_blocks, "natural-blocks"),
            indicators: normalized_set(&config.structure_indicator_blocks, "structure-indicator-blocks"),
            vegetation: config.vegetation_patterns.clone(),
            built: config.built_material_patterns.clone(),
        }
    }

    /// Classify a raw identifier. Malformed identifiers are logged and
    /// classified as `Other`.
    pub fn classify(&self, raw: &str) -> BlockClass {
        match normalize_identifier(raw) {
            Some(id) => self.classify_normalized(&id),
            None => {
                warn!("Cannot classify malformed identifier '{raw}'");
                BlockClass::Other
            }
        }
    }

    /// Classify a block state read from a grid
    pub fn classify_state(&self, state: &BlockState) -> BlockClass {
        self.classify_normalized(state.id())
    }

    fn classify_normalized(&self, id: &str) -> BlockClass {
        if is_air(id) {
            BlockClass::Air
        } else if self.natural.contains(id) {
            BlockClass::Natural
        } else if self.indicators.contains(id) {
            BlockClass::StructureIndicator
        } else if self.is_part(id) {
            BlockClass::ManMade
        } else {
            BlockClass::Other
        }
    }

    pub fn is_air(&self, state: &BlockState) -> bool {
        state.is_air()
    }

    pub fn is_natural(&self, state: &BlockState) -> bool {
        self.natural.contains(state.id())
    }

    pub fn is_structure_indicator(&self, state: &BlockState) -> bool {
        self.indicators.contains(state.id())
    }

    /// Part of a structure: not air, not natural, not vegetation
    pub fn is_structure_part(&self, state: &BlockState) -> bool {
        self.is_part(state.id())
    }

    fn is_part(&self, id: &str) -> bool {
        !is_air(id) && !self.natural.contains(id) && !any_match(&self.vegetation, identifier_path(id))
    }

    /// Processed building material: an indicator or a built-material name match
    pub fn is_built_material(&self, state: &BlockState) -> bool {
        self.is_structure_indicator(state) || any_match(&self.built, state.path())
    }
}
