//! Flat interchange form: one entry per captured cell.
//!
//! ```json
//! {
//!   "name": "hut",
//!   "size": [5, 4, 5],
//!   "blocks": [{ "x": 0, "y": 0, "z": 0, "block": "minecraft:oak_planks" }],
//!   "metadata": { "sourceWorld": "world", "captureMode": "auto-scan", ... }
//! }
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Error, IVec3, Result};

/// One captured cell, positioned relative to the structure's minimum corner
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEntry {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    /// Identifier (`minecraft:oak_door`)
    pub block: String,
    /// Full state string, when captured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl BlockEntry {
    pub fn new(offset: IVec3, block: impl Into<String>) -> Self {
        Self {
            x: offset.x,
            y: offset.y,
            z: offset.z,
            block: block.into(),
            data: None,
        }
    }

    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn offset(&self) -> IVec3 {
        IVec3::new(self.x, self.y, self.z)
    }
}

/// Provenance of a captured structure
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_world: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_mode: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capture_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_by: Option<String>,
    #[serde(default)]
    pub original_x: i32,
    #[serde(default)]
    pub original_y: i32,
    #[serde(default)]
    pub original_z: i32,
}

impl StructureMetadata {
    /// Metadata stamped with the current time
    pub fn captured_now(source_world: &str, origin: IVec3) -> Self {
        Self {
            source_world: Some(source_world.to_string()),
            capture_time: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
            original_x: origin.x,
            original_y: origin.y,
            original_z: origin.z,
            ..Default::default()
        }
    }

    pub fn with_capture_mode(mut self, mode: impl Into<String>) -> Self {
        self.capture_mode = Some(mode.into());
        self
    }

    pub fn with_captured_by(mut self, actor: impl Into<String>) -> Self {
        self.captured_by = Some(actor.into());
        self
    }

    /// World position of the captured minimum corner
    pub fn original_origin(&self) -> IVec3 {
        IVec3::new(self.original_x, self.original_y, self.original_z)
    }
}

/// A captured structure in flat form
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortableStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Extent along x, y, z
    pub size: [i32; 3],
    #[serde(default)]
    pub blocks: Vec<BlockEntry>,
    #[serde(default)]
    pub metadata: StructureMetadata,
}

impl PortableStructure {
    pub fn new(name: Option<String>, size: IVec3) -> Self {
        Self {
            name,
            size: size.to_array(),
            blocks: Vec::new(),
            metadata: StructureMetadata::default(),
        }
    }

    pub fn size(&self) -> IVec3 {
        IVec3::from_array(self.size)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn push(&mut self, entry: BlockEntry) {
        self.blocks.push(entry);
    }

    /// Check that every entry lies inside `size` and no offset repeats
    pub fn validate(&self) -> Result<()> {
        let size = self.size();
        if size.cmple(IVec3::ZERO).any() {
            return Err(Error::InvalidStructure(format!("size {:?} must be positive", self.size)));
        }

        let mut seen = HashSet::with_capacity(self.blocks.len());
        for entry in &self.blocks {
            let offset = entry.offset();
            if offset.cmplt(IVec3::ZERO).any() || offset.cmpge(size).any() {
                return Err(Error::InvalidStructure(format!(
                    "block {} at {offset} lies outside size {:?}",
                    entry.block, self.size
                )));
            }
            if !seen.insert(offset) {
                return Err(Error::InvalidStructure(format!("duplicate block at {offset}")));
            }
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let structure: Self = serde_json::from_str(json)?;
        structure.validate()?;
        Ok(structure)
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path, pretty: bool) -> Result<()> {
        let json = if pretty { self.to_json_pretty()? } else { self.to_json()? };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PortableStructure {
        let mut s = PortableStructure::new(Some("hut".into()), IVec3::new(2, 2, 1));
        s.push(BlockEntry::new(IVec3::new(0, 0, 0), "minecraft:oak_planks"));
        s.push(
            BlockEntry::new(IVec3::new(1, 0, 0), "minecraft:oak_door")
                .with_data("minecraft:oak_door[facing=north,half=lower]"),
        );
        s.metadata = StructureMetadata::captured_now("world", IVec3::new(10, 64, -5))
            .with_capture_mode("manual")
            .with_captured_by("alex");
        s
    }

    #[test]
    fn test_json_field_names() {
        let json = sample().to_json().unwrap();
        assert!(json.contains("\"sourceWorld\":\"world\""));
        assert!(json.contains("\"originalX\":10"));
        assert!(json.contains("\"captureTime\""));
        assert!(json.contains("\"captureMode\":\"manual\""));
        assert!(json.contains("\"capturedBy\":\"alex\""));
        // data omitted for entries without a full state
        assert!(json.contains("{\"x\":0,\"y\":0,\"z\":0,\"block\":\"minecraft:oak_planks\"}"));
    }

    #[test]
    fn test_reads_external_document() {
        let json = r#"{
            "size": [1, 2, 1],
            "blocks": [
                {"x": 0, "y": 0, "z": 0, "block": "minecraft:oak_door", "data": "minecraft:oak_door[half=lower]"},
                {"x": 0, "y": 1, "z": 0, "block": "minecraft:oak_door", "data": "minecraft:oak_door[half=upper]"}
            ],
            "metadata": {"sourceWorld": "elsewhere", "captureMode": "manual", "originalX": 3}
        }"#;
        let s = PortableStructure::from_json(json).unwrap();
        assert_eq!(s.name, None);
        assert_eq!(s.block_count(), 2);
        assert_eq!(s.metadata.capture_mode.as_deref(), Some("manual"));
        assert_eq!(s.metadata.original_origin(), IVec3::new(3, 0, 0));
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let mut s = sample();
        s.push(BlockEntry::new(IVec3::new(2, 0, 0), "minecraft:stone"));
        assert!(matches!(s.validate(), Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let mut s = sample();
        s.push(BlockEntry::new(IVec3::new(0, 0, 0), "minecraft:stone"));
        assert!(matches!(s.validate(), Err(Error::InvalidStructure(_))));
    }

    #[test]
    fn test_save_and_load_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("hut.json");
        let s = sample();
        s.save_sync(&path, true).unwrap();

        let loaded = PortableStructure::load_sync(&path).unwrap();
        assert_eq!(loaded, s);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            PortableStructure::from_json("{\"size\": [1,1"),
            Err(Error::Serialization(_))
        ));
    }
}
