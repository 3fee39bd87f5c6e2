//! Scanner pacing and duplicate suppression settings

use serde::{Deserialize, Serialize};

/// Configuration for fleet scans.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScannerConfig {
    /// Chunks processed per tick.
    pub chunks_per_tick: usize,
    /// Radius in chunks of the square queued at start.
    pub initial_radius: i32,
    /// Structures whose centers are closer than this are duplicates.
    pub min_structure_distance: f64,
    /// Fraction of already-claimed cells above which a detection is a duplicate.
    pub overlap_threshold: f64,
    /// Unload chunks the scanner loaded itself.
    pub unload_chunks: bool,
    /// Stop expanding past this Chebyshev distance from the start chunk.
    pub max_chunk_radius: Option<i32>,
    /// Log progress every this many scanned chunks.
    pub progress_interval: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            chunks_per_tick: 2,
            initial_radius: 8,
            min_structure_distance: 5.0,
            overlap_threshold: 0.3,
            unload_chunks: true,
            max_chunk_radius: None,
            progress_interval: 50,
        }
    }
}
