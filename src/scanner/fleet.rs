//! Tick-driven fleet scanner.
//!
//! A session starts with the square of chunks around a center and grows
//! outward through planar neighbors. Each tick processes a fixed number of
//! chunks; the host calls [`FleetScanner::tick`] from its own scheduler.

use log::{debug, info};

use super::config::ScannerConfig;
use super::state::ScanState;
use crate::core::{CaptureSettings, Error, IVec3, Result};
use crate::detection::{Detection, StructureDetector};
use crate::structure::{PortableStructure, StructureExtractor};
use crate::voxel::{ChunkPos, GridAccessor, CHUNK_WIDTH};

/// Capture mode recorded on scanner output
pub const AUTO_SCAN_MODE: &str = "auto-scan";

/// Lifecycle of the scanner
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanPhase {
    /// No session has run, or the last one drained its queue
    Idle,
    Scanning,
    /// The last session was stopped explicitly
    Stopped,
}

/// Counters reported while scanning and when a session ends
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub chunks_scanned: usize,
    pub structures_found: usize,
    pub chunks_remaining: usize,
    /// Detections rejected as duplicates of accepted structures
    pub duplicates_skipped: usize,
    pub world: Option<String>,
}

/// A structure accepted by the scanner
#[derive(Clone, Debug)]
pub struct ScanHit {
    pub structure: PortableStructure,
    pub detection: Detection,
    pub center: IVec3,
}

/// Single-session world scanner
pub struct FleetScanner {
    detector: StructureDetector,
    extractor: StructureExtractor,
    config: ScannerConfig,
    phase: ScanPhase,
    state: Option<ScanState>,
    stats: ScanStats,
}

impl FleetScanner {
    pub fn new(detector: StructureDetector, extractor: StructureExtractor, config: ScannerConfig) -> Self {
        Self {
            detector,
            extractor,
            config,
            phase: ScanPhase::Idle,
            state: None,
            stats: ScanStats::default(),
        }
    }

    pub fn from_settings(settings: &CaptureSettings) -> Self {
        Self::new(
            StructureDetector::new(settings.detection.clone()),
            StructureExtractor::new(settings.export.include_air),
            settings.scanner.clone(),
        )
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == ScanPhase::Scanning
    }

    pub fn detector(&self) -> &StructureDetector {
        &self.detector
    }

    /// Begin a session around `center`, or the grid's spawn point.
    /// Returns the number of chunks queued.
    pub fn start<G: GridAccessor + ?Sized>(&mut self, grid: &G, center: Option<IVec3>) -> Result<usize> {
        if self.is_scanning() {
            return Err(Error::ScanInProgress);
        }

        let center = center.unwrap_or_else(|| grid.spawn_point());
        let mut state = ScanState::new(grid.name(), ChunkPos::from_block(center), self.config.max_chunk_radius);
        let queued = state.enqueue_square(self.config.initial_radius);

        info!(
            "Queued {queued} chunks for scanning around {}, {} in '{}'",
            center.x,
            center.z,
            grid.name()
        );

        self.stats = ScanStats {
            world: Some(grid.name().to_string()),
            chunks_remaining: queued,
            ..Default::default()
        };
        self.state = Some(state);
        self.phase = ScanPhase::Scanning;
        Ok(queued)
    }

    /// Process up to `chunks_per_tick` chunks. Returns the structures accepted
    /// during this tick. The session ends on its own once the queue drains.
    pub fn tick<G: GridAccessor + ?Sized>(&mut self, grid: &mut G) -> Result<Vec<ScanHit>> {
        let mut hits = Vec::new();
        if !self.is_scanning() {
            return Ok(hits);
        }
        let Some(mut state) = self.state.take() else {
            self.phase = ScanPhase::Idle;
            return Ok(hits);
        };
        if state.world() != grid.name() {
            let err = Error::InvalidVolume(format!(
                "scan session belongs to '{}', grid is '{}'",
                state.world(),
                grid.name()
            ));
            self.state = Some(state);
            return Err(err);
        }

        for _ in 0..self.config.chunks_per_tick {
            let Some(chunk) = state.next_chunk() else {
                break;
            };
            self.process_chunk(grid, &mut state, chunk, &mut hits);
        }

        self.stats.chunks_remaining = state.remaining();
        if state.remaining() == 0 {
            info!(
                "Finished scanning '{}': {} chunks scanned, {} structures found",
                state.world(),
                self.stats.chunks_scanned,
                self.stats.structures_found
            );
            self.phase = ScanPhase::Idle;
        } else {
            self.state = Some(state);
        }
        Ok(hits)
    }

    /// Tick until the queue drains, collecting every accepted structure
    pub fn run_to_completion<G: GridAccessor + ?Sized>(&mut self, grid: &mut G) -> Result<Vec<ScanHit>> {
        let mut hits = Vec::new();
        while self.is_scanning() {
            hits.extend(self.tick(grid)?);
        }
        Ok(hits)
    }

    /// End the session and return its final counters
    pub fn stop(&mut self) -> ScanStats {
        if let Some(state) = self.state.take() {
            self.stats.chunks_remaining = state.remaining();
            info!(
                "Stopped scanning '{}': {} chunks scanned, {} structures found",
                state.world(),
                self.stats.chunks_scanned,
                self.stats.structures_found
            );
            self.phase = ScanPhase::Stopped;
        }
        self.stats.clone()
    }

    /// Counters of the current or last session
    pub fn stats(&self) -> ScanStats {
        self.stats.clone()
    }

    fn process_chunk<G: GridAccessor + ?Sized>(
        &mut self,
        grid: &mut G,
        state: &mut ScanState,
        chunk: ChunkPos,
        hits: &mut Vec<ScanHit>,
    ) {
        let was_loaded = grid.is_chunk_loaded(chunk);
        if !was_loaded {
            if !grid.is_chunk_generated(chunk) {
                return;
            }
            if let Err(e) = grid.load_chunk(chunk) {
                debug!("Skipping chunk ({}, {}): {e}", chunk.x, chunk.z);
                return;
            }
        }
        self.stats.chunks_scanned += 1;

        let heights = grid.height_range();
        for lx in 0..CHUNK_WIDTH {
            for lz in 0..CHUNK_WIDTH {
                for y in heights.clone() {
                    let pos = IVec3::new(chunk.min_block_x() + lx, y, chunk.min_block_z() + lz);
                    let is_indicator = grid
                        .block(pos)
                        .is_ok_and(|b| self.detector.classifier().is_structure_indicator(&b));
                    if is_indicator && !state.is_claimed(pos) {
                        if let Some(hit) = self.try_accept(&*grid, state, pos) {
                            hits.push(hit);
                        }
                    }
                }
            }
        }

        let interval = self.config.progress_interval.max(1);
        if self.stats.chunks_scanned % interval == 0 {
            info!(
                "Scan progress: {} chunks scanned, {} structures found, {} chunks remaining",
                self.stats.chunks_scanned,
                self.stats.structures_found,
                state.remaining()
            );
        }

        if !was_loaded && self.config.unload_chunks {
            grid.unload_chunk(chunk);
        }

        for neighbor in chunk.neighbors() {
            state.enqueue(neighbor);
        }
    }

    fn try_accept<G: GridAccessor + ?Sized>(
        &mut self,
        grid: &G,
        state: &mut ScanState,
        start: IVec3,
    ) -> Option<ScanHit> {
        let detection = match self.detector.detect(grid, start) {
            Ok(detection) => detection,
            Err(e) => {
                debug!("No capture from {start}: {e}");
                return None;
            }
        };

        let center = detection.volume.center();
        if state.near_existing_center(center, self.config.min_structure_distance) {
            self.stats.duplicates_skipped += 1;
            return None;
        }

        let overlap = state.overlap_fraction(grid, &detection.volume);
        if overlap > self.config.overlap_threshold {
            debug!("Skipping duplicate structure at {center} ({:.0}% overlap)", overlap * 100.0);
            self.stats.duplicates_skipped += 1;
            return None;
        }

        state.accept(grid, &detection.volume);

        let mut structure = match self.extractor.extract(grid, &detection.volume, None) {
            Ok(structure) => structure,
            Err(e) => {
                debug!("Extraction of {} failed: {e}", detection.volume);
                return None;
            }
        };
        structure.metadata = structure.metadata.with_capture_mode(AUTO_SCAN_MODE);
        self.stats.structures_found += 1;

        info!(
            "Captured structure at {center} ({} blocks, {})",
            structure.block_count(),
            detection.volume
        );
        Some(ScanHit { structure, detection, center })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::DetectionConfig;
    use crate::math::BoundingVolume;
    use crate::voxel::{BlockState, World};

    fn scanner(config: ScannerConfig) -> FleetScanner {
        FleetScanner::new(
            StructureDetector::new(DetectionConfig::default()),
            StructureExtractor::default(),
            config,
        )
    }

    /// Stone floor over chunks -1..=1 with plank huts standing on it
    fn world_with_huts(huts: &[IVec3]) -> World {
        let mut world = World::new("scan", 0..32);
        world
            .fill(IVec3::new(-16, 0, -16), IVec3::new(31, 0, 31), &BlockState::new("stone").unwrap())
            .unwrap();
        let planks = BlockState::new("oak_planks").unwrap();
        for &corner in huts {
            let volume = BoundingVolume::from_corners("scan", corner, corner + IVec3::new(4, 3, 4));
            for pos in volume.positions() {
                let rel = pos - corner;
                if rel.x == 0 || rel.x == 4 || rel.y == 0 || rel.y == 3 || rel.z == 0 || rel.z == 4 {
                    world.set_block(pos, &planks).unwrap();
                }
            }
        }
        world
    }

    #[test]
    fn test_finds_each_hut_once() {
        let mut world = world_with_huts(&[IVec3::new(2, 1, 2), IVec3::new(20, 1, 2), IVec3::new(-12, 1, 20)]);
        let mut scanner = scanner(ScannerConfig { initial_radius: 0, ..Default::default() });

        assert_eq!(scanner.start(&world, Some(IVec3::ZERO)).unwrap(), 1);
        let hits = scanner.run_to_completion(&mut world).unwrap();

        assert_eq!(hits.len(), 3);
        assert_eq!(scanner.phase(), ScanPhase::Idle);
        let stats = scanner.stats();
        assert_eq!(stats.structures_found, 3);
        assert_eq!(stats.chunks_scanned, 9);
        assert_eq!(stats.chunks_remaining, 0);
        assert_eq!(stats.world.as_deref(), Some("scan"));
        for hit in &hits {
            assert_eq!(hit.structure.metadata.capture_mode.as_deref(), Some(AUTO_SCAN_MODE));
            assert_eq!(hit.structure.size, [5, 4, 5]);
        }
        // loaded chunks are released again
        assert_eq!(world.loaded_count(), 0);
    }

    #[test]
    fn test_second_start_rejected() {
        let world = world_with_huts(&[]);
        let mut scanner = scanner(ScannerConfig::default());
        scanner.start(&world, None).unwrap();
        assert!(matches!(scanner.start(&world, None), Err(Error::ScanInProgress)));
    }

    #[test]
    fn test_stop_reports_remaining() {
        let mut world = world_with_huts(&[IVec3::new(2, 1, 2)]);
        let mut scanner = scanner(ScannerConfig {
            chunks_per_tick: 1,
            initial_radius: 1,
            max_chunk_radius: Some(1),
            ..Default::default()
        });
        assert_eq!(scanner.start(&world, Some(IVec3::ZERO)).unwrap(), 9);

        scanner.tick(&mut world).unwrap();
        let stats = scanner.stop();
        assert_eq!(stats.chunks_scanned, 1);
        assert_eq!(stats.chunks_remaining, 8);
        assert_eq!(scanner.phase(), ScanPhase::Stopped);
        assert!(scanner.tick(&mut world).unwrap().is_empty());

        // a new session may start after stop
        assert!(scanner.start(&world, Some(IVec3::ZERO)).is_ok());
    }

    #[test]
    fn test_ungenerated_chunks_do_not_expand() {
        let mut world = world_with_huts(&[]);
        let mut scanner = scanner(ScannerConfig { initial_radius: 0, ..Default::default() });
        scanner.start(&world, Some(IVec3::new(500, 0, 500))).unwrap();
        let hits = scanner.run_to_completion(&mut world).unwrap();
        assert!(hits.is_empty());
        assert_eq!(scanner.stats().chunks_scanned, 0);
    }

    #[test]
    fn test_duplicate_rules() {
        let mut world = world_with_huts(&[IVec3::new(2, 1, 2)]);
        let mut scanner = scanner(ScannerConfig::default());
        let mut state = ScanState::new("scan", ChunkPos::new(0, 0), None);

        let first = scanner.try_accept(&world, &mut state, IVec3::new(2, 1, 2)).unwrap();
        assert_eq!(first.center, IVec3::new(4, 2, 4));

        // same structure from another seed: center distance 0
        assert!(scanner.try_accept(&world, &mut state, IVec3::new(6, 4, 6)).is_none());

        // extend the hut with a long wall: the center moves far away but most
        // non-air cells of the new volume are already claimed
        world
            .fill(IVec3::new(7, 1, 2), IVec3::new(26, 1, 2), &BlockState::new("oak_planks").unwrap())
            .unwrap();
        assert!(scanner.try_accept(&world, &mut state, IVec3::new(26, 1, 2)).is_none());

        assert_eq!(scanner.stats().duplicates_skipped, 2);
        assert_eq!(scanner.stats().structures_found, 1);
        assert_eq!(state.centers(), &[IVec3::new(4, 2, 4)]);
    }

    #[test]
    fn test_wrong_world_tick() {
        let world = world_with_huts(&[]);
        let mut other = World::new("other", 0..32);
        let mut scanner = scanner(ScannerConfig::default());
        scanner.start(&world, None).unwrap();
        assert!(matches!(scanner.tick(&mut other), Err(Error::InvalidVolume(_))));
        assert!(scanner.is_scanning());
    }
}
