//! Capture settings loaded once at startup.
//!
//! All sections are optional in the JSON file; missing keys keep their
//! defaults.
//!
//! ```json
//! {
//!   "detection": { "max-flood-iterations": 100000, "min-structure-size": 20 },
//!   "scanner": { "chunks-per-tick": 2, "initial-radius": 8 },
//!   "builder": { "allowed-blocks": [] },
//!   "export": { "include-air": false }
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::BuilderConfig;
use crate::core::Result;
use crate::detection::DetectionConfig;
use crate::scanner::ScannerConfig;
use crate::structure::ExportConfig;

/// Aggregate configuration for detection, scanning, building and export
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CaptureSettings {
    pub detection: DetectionConfig,
    pub scanner: ScannerConfig,
    pub builder: BuilderConfig,
    pub export: ExportConfig,
}

impl CaptureSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from file (sync)
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let settings = CaptureSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, CaptureSettings::default());
        assert_eq!(settings.detection.max_flood_iterations, 100_000);
        assert_eq!(settings.detection.search_radius, 64);
        assert_eq!(settings.detection.min_structure_size, 20);
        assert_eq!(settings.detection.max_structure_size, 50_000);
        assert_eq!(settings.detection.max_dimensions, [128, 128, 128]);
        assert_eq!(settings.scanner.chunks_per_tick, 2);
        assert_eq!(settings.scanner.initial_radius, 8);
        assert!(settings.scanner.unload_chunks);
        assert_eq!(settings.builder.max_undo_depth, 10);
        assert!(!settings.export.include_air);
    }

    #[test]
    fn test_partial_sections() {
        let json = r#"{
            "detection": { "min-structure-size": 5, "natural-blocks": ["stone"] },
            "scanner": { "max-chunk-radius": 4 }
        }"#;
        let settings = CaptureSettings::from_json_str(json).unwrap();
        assert_eq!(settings.detection.min_structure_size, 5);
        assert_eq!(settings.detection.natural_blocks, vec!["stone".to_string()]);
        assert_eq!(settings.detection.max_structure_size, 50_000);
        assert_eq!(settings.scanner.max_chunk_radius, Some(4));
        assert_eq!(settings.scanner.chunks_per_tick, 2);
    }

    #[test]
    fn test_save_and_load_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.json");
        let mut settings = CaptureSettings::default();
        settings.export.include_air = true;
        settings.save_sync(&path).unwrap();

        assert_eq!(CaptureSettings::load_sync(&path).unwrap(), settings);
    }

    #[test]
    fn test_malformed_document() {
        assert!(CaptureSettings::from_json_str("{\"scanner\": 3}").is_err());
    }
}
