//! Palette interchange form: a key → block-state table plus per-layer grids.
//!
//! `layers` maps a y index to rows indexed by z, each row indexed by x. A
//! null or empty key leaves the cell untouched when building.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use super::portable::{BlockEntry, PortableStructure};
use crate::core::{Error, IVec3, Result};
use crate::voxel::BlockState;

const KEY_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Palette key for the n-th distinct state: A..Z, a..z, AA, AB, ...
fn palette_key(index: usize) -> String {
    let base = KEY_ALPHABET.len();
    let mut n = index;
    let mut key = Vec::new();
    loop {
        key.push(KEY_ALPHABET[n % base]);
        n /= base;
        if n == 0 {
            break;
        }
        n -= 1;
    }
    key.reverse();
    String::from_utf8_lossy(&key).into_owned()
}

/// A structure in palette form
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub size: [i32; 3],
    pub palette: BTreeMap<String, String>,
    pub layers: BTreeMap<i32, Vec<Vec<Option<String>>>>,
}

impl PaletteStructure {
    pub fn size(&self) -> IVec3 {
        IVec3::from_array(self.size)
    }

    /// Check that every layer, row and column fits inside `size` and every
    /// non-empty key names a palette entry
    pub fn validate(&self) -> Result<()> {
        let size = self.size();
        if size.cmple(IVec3::ZERO).any() {
            return Err(Error::InvalidStructure(format!("size {:?} must be positive", self.size)));
        }
        for (&y, rows) in &self.layers {
            if !(0..size.y).contains(&y) {
                return Err(Error::InvalidStructure(format!("layer {y} outside height {}", size.y)));
            }
            if rows.len() > size.z as usize {
                return Err(Error::InvalidStructure(format!(
                    "layer {y} has {} rows, depth is {}",
                    rows.len(),
                    size.z
                )));
            }
            if let Some(row) = rows.iter().find(|row| row.len() > size.x as usize) {
                return Err(Error::InvalidStructure(format!(
                    "layer {y} has a row of {} cells, width is {}",
                    row.len(),
                    size.x
                )));
            }
            let unknown = rows
                .iter()
                .flatten()
                .filter_map(|key| key.as_deref())
                .find(|key| !key.is_empty() && !self.palette.contains_key(*key));
            if let Some(key) = unknown {
                return Err(Error::InvalidStructure(format!("layer {y} uses unknown palette key '{key}'")));
            }
        }
        Ok(())
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let structure: Self = serde_json::from_str(json)?;
        structure.validate()?;
        Ok(structure)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
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

    /// Resolve a palette key at a relative position
    pub fn block_at(&self, offset: IVec3) -> Option<&str> {
        let row = self.layers.get(&offset.y)?.get(usize::try_from(offset.z).ok()?)?;
        let key = row.get(usize::try_from(offset.x).ok()?)?.as_deref()?;
        self.palette.get(key).map(String::as_str)
    }

    /// Every filled cell with its state string, layers ascending then z then x.
    /// Keys missing from the palette are logged and skipped.
    pub fn entries(&self) -> Vec<(IVec3, &str)> {
        let mut entries = Vec::new();
        for (&y, rows) in &self.layers {
            for (z, row) in rows.iter().enumerate() {
                for (x, key) in row.iter().enumerate() {
                    let Some(key) = key.as_deref().filter(|k| !k.is_empty()) else {
                        continue;
                    };
                    match self.palette.get(key) {
                        Some(state) => entries.push((IVec3::new(x as i32, y, z as i32), state.as_str())),
                        None => warn!("Unknown palette key '{key}' at layer {y}"),
                    }
                }
            }
        }
        entries
    }

    /// Build the palette form of a flat structure. Each distinct state string
    /// gets its own key in first-seen order.
    pub fn from_portable(structure: &PortableStructure) -> Result<Self> {
        structure.validate()?;
        let size = structure.size();

        let mut keys: HashMap<&str, String> = HashMap::new();
        let mut palette = BTreeMap::new();
        let mut layers: BTreeMap<i32, Vec<Vec<Option<String>>>> = BTreeMap::new();

        for entry in &structure.blocks {
            let state = entry.data.as_deref().unwrap_or(&entry.block);
            let next = keys.len();
            let key = keys
                .entry(state)
                .or_insert_with(|| {
                    let key = palette_key(next);
                    palette.insert(key.clone(), state.to_string());
                    key
                })
                .clone();

            let rows = layers
                .entry(entry.y)
                .or_insert_with(|| vec![vec![None; size.x as usize]; size.z as usize]);
            rows[entry.z as usize][entry.x as usize] = Some(key);
        }

        Ok(Self {
            name: structure.name.clone(),
            size: structure.size,
            palette,
            layers,
        })
    }

    /// Flat form of this structure; each entry carries the full state string
    pub fn to_portable(&self) -> PortableStructure {
        let mut structure = PortableStructure::new(self.name.clone(), self.size());
        for (offset, state) in self.entries() {
            let block = BlockState::parse_lenient(state)
                .id
                .unwrap_or_else(|| state.to_string());
            structure.push(BlockEntry::new(offset, block).with_data(state));
        }
        structure
    }
}
