//! Placement entries, classes and ordered plans

use std::collections::BTreeMap;

use crate::core::{Error, IVec3, Result};
use crate::math::BoundingVolume;
use crate::structure::{BlockEntry, PaletteStructure, PortableStructure};
use crate::voxel::block_state::normalize_identifier;
use crate::voxel::BlockState;

/// One cell to place, relative to the structure origin
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementEntry {
    pub offset: IVec3,
    /// Identifier as written in the source structure
    pub block: String,
    /// Discrete properties, parsed leniently
    pub properties: BTreeMap<String, String>,
    /// Full state string, tried before the discrete properties
    pub full_state: Option<String>,
}

impl PlacementEntry {
    pub fn from_block_entry(entry: &BlockEntry) -> Self {
        let properties = entry
            .data
            .as_deref()
            .map(|data| BlockState::parse_lenient(data).properties)
            .unwrap_or_default();
        Self {
            offset: entry.offset(),
            block: entry.block.clone(),
            properties,
            full_state: entry.data.clone(),
        }
    }

    /// Entry from a palette value such as `minecraft:oak_door[half=upper]`
    pub fn from_state_string(offset: IVec3, state: &str) -> Self {
        let parsed = BlockState::parse_lenient(state);
        Self {
            offset,
            block: parsed.id.unwrap_or_else(|| state.to_string()),
            properties: parsed.properties,
            full_state: Some(state.to_string()),
        }
    }

    /// Normalized identifier, if well formed
    pub fn identifier(&self) -> Option<String> {
        normalize_identifier(&self.block)
    }

    /// Second cell of a two-cell block: `half=upper|top` or `part=head`
    pub fn is_upper_part(&self) -> bool {
        matches!(self.properties.get("half").map(String::as_str), Some("upper" | "top"))
            || self.properties.get("part").map(String::as_str) == Some("head")
    }
}

/// Placement pass a cell belongs to, in placement order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlacementClass {
    Solid,
    UpperPart,
    PhysicsDependent,
}

/// A cell with its world position and class
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedBlock {
    pub position: IVec3,
    pub class: PlacementClass,
    pub entry: PlacementEntry,
}

/// Ordered placement sequence for one structure at one origin
#[derive(Clone, Debug)]
pub struct PlacementPlan {
    pub origin: IVec3,
    pub size: IVec3,
    pub steps: Vec<PlannedBlock>,
}

impl PlacementPlan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// World volume covered by the structure's size at the origin
    pub fn volume(&self, world: &str) -> BoundingVolume {
        BoundingVolume::from_corners(world, self.origin, self.origin + self.size - IVec3::ONE)
    }
}

/// Anything a plan can be built from
pub trait PlacementSource {
    fn size(&self) -> IVec3;

    /// Cells in source order
    fn placement_entries(&self) -> Result<Vec<PlacementEntry>>;
}

impl PlacementSource for PortableStructure {
    fn size(&self) -> IVec3 {
        PortableStructure::size(self)
    }

    fn placement_entries(&self) -> Result<Vec<PlacementEntry>> {
        self.validate()?;
        Ok(self.blocks.iter().map(PlacementEntry::from_block_entry).collect())
    }
}

impl PlacementSource for PaletteStructure {
    fn size(&self) -> IVec3 {
        PaletteStructure::size(self)
    }

    fn placement_entries(&self) -> Result<Vec<PlacementEntry>> {
        self.validate()?;
        let entries: Vec<PlacementEntry> = self
            .entries()
            .into_iter()
            .map(|(offset, state)| PlacementEntry::from_state_string(offset, state))
            .collect();
        if entries.is_empty() && !self.layers.is_empty() {
            return Err(Error::InvalidStructure("no layer cell resolves to a palette entry".into()));
        }
        Ok(entries)
    }
}
