//! Bounded flood fill from a seed cell.
//!
//! The fill walks 6-connected neighbors. Natural cells stop it, structure
//! parts are collected and expanded, air is expanded only when at least two
//! of its face neighbors are structure parts (enclosed interior air), and
//! everything else is a terminal cell.

use std::collections::{HashSet, VecDeque};

use log::debug;

use super::classifier::{BlockClass, VoxelClassifier};
use super::config::DetectionConfig;
use crate::core::{Error, IVec3, Result, NEIGHBOR_OFFSETS};
use crate::math::BoundingVolume;
use crate::voxel::GridAccessor;

/// Structure-part neighbors needed for air to count as interior
const ENCLOSED_AIR_NEIGHBORS: usize = 2;

/// Order in which the frontier is consumed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum QueueDiscipline {
    /// First in, first out
    #[default]
    BreadthFirst,
    /// Last in, first out
    DepthFirst,
}

/// Result of a successful detection
#[derive(Clone, Debug)]
pub struct Detection {
    pub volume: BoundingVolume,
    pub blocks: HashSet<IVec3>,
    /// Cell the fill started from, after indicator promotion
    pub seed: IVec3,
    /// Cells dequeued during the fill
    pub iterations: usize,
    /// The fill hit the iteration cap with cells still queued
    pub truncated: bool,
}

impl Detection {
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

/// Finds the extent of a structure around a seed cell
#[derive(Clone, Debug)]
pub struct StructureDetector {
    classifier: VoxelClassifier,
    config: DetectionConfig,
}

impl StructureDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            classifier: VoxelClassifier::new(&config),
            config,
        }
    }

    pub fn classifier(&self) -> &VoxelClassifier {
        &self.classifier
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Detect with breadth-first traversal
    pub fn detect<G: GridAccessor + ?Sized>(&self, grid: &G, seed: IVec3) -> Result<Detection> {
        self.detect_with(grid, seed, QueueDiscipline::BreadthFirst)
    }

    /// Detect the structure containing `seed`.
    ///
    /// A natural seed is first replaced by the nearest indicator cell within
    /// the search radius. The filled set is then checked against the size and
    /// dimension limits.
    pub fn detect_with<G: GridAccessor + ?Sized>(
        &self,
        grid: &G,
        seed: IVec3,
        discipline: QueueDiscipline,
    ) -> Result<Detection> {
        let start = if self.classifier.is_natural(&grid.block(seed)?) {
            self.find_nearest_indicator(grid, seed)?
                .ok_or_else(|| Error::NoStructureFound {
                    reason: format!(
                        "no structure indicator within {} blocks of {seed}",
                        self.config.search_radius
                    ),
                })?
        } else {
            seed
        };

        let detection = self.flood_fill(grid, start, discipline);
        self.check_limits(detection)
    }

    /// Search cubic shells of growing radius around `center` for an
    /// indicator cell. Only the surface of each shell is probed, so the first
    /// hit is the nearest by Chebyshev distance.
    pub fn find_nearest_indicator<G: GridAccessor + ?Sized>(
        &self,
        grid: &G,
        center: IVec3,
    ) -> Result<Option<IVec3>> {
        for r in 1..=self.config.search_radius {
            for dx in -r..=r {
                for dy in -r..=r {
                    for dz in -r..=r {
                        if dx.abs() != r && dy.abs() != r && dz.abs() != r {
                            continue;
                        }
                        let pos = center + IVec3::new(dx, dy, dz);
                        if self.classifier.is_structure_indicator(&grid.block(pos)?) {
                            return Ok(Some(pos));
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    fn flood_fill<G: GridAccessor + ?Sized>(
        &self,
        grid: &G,
        start: IVec3,
        discipline: QueueDiscipline,
    ) -> Detection {
        let mut visited = HashSet::from([start]);
        let mut frontier = VecDeque::from([start]);
        let mut blocks = HashSet::new();
        let mut volume: Option<BoundingVolume> = None;
        let mut iterations = 0;

        while iterations < self.config.max_flood_iterations {
            let next = match discipline {
                QueueDiscipline::BreadthFirst => frontier.pop_front(),
                QueueDiscipline::DepthFirst => frontier.pop_back(),
            };
            let Some(pos) = next else {
                break;
            };
            iterations += 1;

            let state = match grid.block(pos) {
                Ok(state) => state,
                Err(e) => {
                    debug!("Treating unreadable cell {pos} as a boundary: {e}");
                    continue;
                }
            };

            let expand = match self.classifier.classify_state(&state) {
                BlockClass::Natural | BlockClass::Other => false,
                BlockClass::Air => self.is_enclosed_air(grid, pos),
                BlockClass::StructureIndicator | BlockClass::ManMade => {
                    if !self.classifier.is_structure_part(&state) {
                        continue;
                    }
                    blocks.insert(pos);
                    match volume.as_mut() {
                        Some(v) => v.expand(pos),
                        None => volume = Some(BoundingVolume::from_point(grid.name(), pos)),
                    }
                    true
                }
            };

            if expand {
                for offset in NEIGHBOR_OFFSETS {
                    let neighbor = pos + offset;
                    if visited.insert(neighbor) {
                        frontier.push_back(neighbor);
                    }
                }
            }
        }

        let truncated = !frontier.is_empty();
        if truncated {
            debug!("Flood fill from {start} stopped after {iterations} iterations");
        }

        Detection {
            volume: volume.unwrap_or_else(|| BoundingVolume::from_point(grid.name(), start)),
            blocks,
            seed: start,
            iterations,
            truncated,
        }
    }

    fn is_enclosed_air<G: GridAccessor + ?Sized>(&self, grid: &G, pos: IVec3) -> bool {
        NEIGHBOR_OFFSETS
            .iter()
            .filter(|&&offset| {
                grid.block(pos + offset)
                    .map(|state| self.classifier.is_structure_part(&state))
                    .unwrap_or(false)
            })
            .count()
            >= ENCLOSED_AIR_NEIGHBORS
    }

    fn check_limits(&self, detection: Detection) -> Result<Detection> {
        let count = detection.block_count();
        if count == 0 {
            return Err(Error::NoStructureFound {
                reason: format!("no structure blocks connected to {}", detection.seed),
            });
        }
        if count < self.config.min_structure_size {
            return Err(Error::StructureTooSmall { count, min: self.config.min_structure_size });
        }
        if count > self.config.max_structure_size {
            return Err(Error::StructureTooLarge { count, max: self.config.max_structure_size });
        }

        let size = detection.volume.size();
        let max = self.config.max_dimensions;
        if size.x > max[0] || size.y > max[1] || size.z > max[2] {
            return Err(Error::DimensionsExceeded { size: size.to_array(), max, count });
        }
        Ok(detection)
    }
}
