//! Structure export settings and async file I/O

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::portable::PortableStructure;
use crate::core::Result;

/// Settings for captured structure output
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ExportConfig {
    /// Keep air cells in captured structures
    pub include_air: bool,
    pub pretty_json: bool,
    /// Directory scan results are written to
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            include_air: false,
            pretty_json: true,
            output_dir: PathBuf::from("captures"),
        }
    }
}

impl ExportConfig {
    /// Output path for a structure file name, `.json` appended
    pub fn path_for(&self, stem: &str) -> PathBuf {
        self.output_dir.join(format!("{stem}.json"))
    }
}

/// Write a structure to disk, creating parent directories
pub async fn save_structure(path: &Path, structure: &PortableStructure, pretty: bool) -> Result<()> {
    let json = if pretty { structure.to_json_pretty()? } else { structure.to_json()? };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;

    Ok(())
}

/// Load a structure from disk (if it exists)
pub async fn load_structure(path: &Path) -> Result<Option<PortableStructure>> {
    if !tokio::fs::try_exists(path).await? {
        return Ok(None);
    }

    let json = tokio::fs::read_to_string(path).await?;
    Ok(Some(PortableStructure::from_json(&json)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IVec3;
    use crate::structure::BlockEntry;

    #[tokio::test]
    async fn test_save_and_load_structure() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExportConfig {
            output_dir: dir.path().join("out"),
            ..Default::default()
        };

        let mut structure = PortableStructure::new(Some("post".into()), IVec3::new(1, 2, 1));
        structure.push(BlockEntry::new(IVec3::ZERO, "minecraft:oak_fence"));
        structure.push(BlockEntry::new(IVec3::new(0, 1, 0), "minecraft:torch"));

        let path = config.path_for("post");
        save_structure(&path, &structure, config.pretty_json).await.unwrap();

        let loaded = load_structure(&path).await.unwrap().expect("file should exist");
        assert_eq!(loaded, structure);
    }

    #[tokio::test]
    async fn test_load_missing_structure() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_structure(&dir.path().join("missing.json")).await.unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_config_from_partial_json() {
        let config: ExportConfig = serde_json::from_str(r#"{"include-air": true}"#).unwrap();
        assert!(config.include_air);
        assert!(config.pretty_json);
    }
}
