//! Per-session scan bookkeeping

use std::collections::{HashSet, VecDeque};

use crate::core::IVec3;
use crate::math::BoundingVolume;
use crate::voxel::{ChunkPos, GridAccessor};

/// Work queue and duplicate-suppression state of one scan session.
///
/// Every chunk is enqueued at most once. Claimed cells and accepted centers
/// only grow during a session.
#[derive(Debug)]
pub struct ScanState {
    world: String,
    origin: ChunkPos,
    max_radius: Option<i32>,
    queue: VecDeque<ChunkPos>,
    visited_chunks: HashSet<ChunkPos>,
    claimed: HashSet<IVec3>,
    centers: Vec<IVec3>,
}

impl ScanState {
    pub fn new(world: impl Into<String>, origin: ChunkPos, max_radius: Option<i32>) -> Self {
        Self {
            world: world.into(),
            origin,
            max_radius,
            queue: VecDeque::new(),
            visited_chunks: HashSet::new(),
            claimed: HashSet::new(),
            centers: Vec::new(),
        }
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn origin(&self) -> ChunkPos {
        self.origin
    }

    /// Queue a chunk unless it was queued before or lies past the radius cap
    pub fn enqueue(&mut self, chunk: ChunkPos) -> bool {
        if self.max_radius.is_some_and(|r| self.origin.distance(chunk) > r) {
            return false;
        }
        if !self.visited_chunks.insert(chunk) {
            return false;
        }
        self.queue.push_back(chunk);
        true
    }

    /// Queue the square of chunks within `radius` of the origin
    pub fn enqueue_square(&mut self, radius: i32) -> usize {
        let mut queued = 0;
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                if self.enqueue(ChunkPos::new(self.origin.x + dx, self.origin.z + dz)) {
                    queued += 1;
                }
            }
        }
        queued
    }

    pub fn next_chunk(&mut self) -> Option<ChunkPos> {
        self.queue.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_claimed(&self, pos: IVec3) -> bool {
        self.claimed.contains(&pos)
    }

    pub fn claimed_count(&self) -> usize {
        self.claimed.len()
    }

    /// True if `center` is closer than `min_distance` to an accepted center
    pub fn near_existing_center(&self, center: IVec3, min_distance: f64) -> bool {
        self.centers
            .iter()
            .any(|c| (*c - center).as_dvec3().length() < min_distance)
    }

    /// Fraction of non-air cells in the volume that are already claimed.
    /// Zero for a volume without non-air cells.
    pub fn overlap_fraction<G: GridAccessor + ?Sized>(&self, grid: &G, volume: &BoundingVolume) -> f64 {
        let mut total = 0usize;
        let mut overlap = 0usize;
        for pos in non_air_cells(grid, volume) {
            total += 1;
            if self.claimed.contains(&pos) {
                overlap += 1;
            }
        }
        if total == 0 { 0.0 } else { overlap as f64 / total as f64 }
    }

    /// Claim every non-air cell of an accepted volume and record its center
    pub fn accept<G: GridAccessor + ?Sized>(&mut self, grid: &G, volume: &BoundingVolume) {
        self.claimed.extend(non_air_cells(grid, volume));
        self.centers.push(volume.center());
    }

    pub fn centers(&self) -> &[IVec3] {
        &self.centers
    }
}

fn non_air_cells<'a, G: GridAccessor + ?Sized>(
    grid: &'a G,
    volume: &'a BoundingVolume,
) -> impl Iterator<Item = IVec3> + 'a {
    volume
        .positions()
        .filter(|&pos| grid.block(pos).is_ok_and(|state| !state.is_air()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{BlockState, World};

    #[test]
    fn test_enqueue_once() {
        let mut state = ScanState::new("w", ChunkPos::new(0, 0), None);
        assert!(state.enqueue(ChunkPos::new(1, 0)));
        assert!(!state.enqueue(ChunkPos::new(1, 0)));
        assert_eq!(state.remaining(), 1);
        state.next_chunk();
        assert!(!state.enqueue(ChunkPos::new(1, 0)));
    }

    #[test]
    fn test_square_and_radius_cap() {
        let mut state = ScanState::new("w", ChunkPos::new(5, 5), Some(1));
        assert_eq!(state.enqueue_square(2), 9);
        assert!(!state.enqueue(ChunkPos::new(7, 5)));
    }

    #[test]
    fn test_overlap_and_claims() {
        let mut world = World::new("w", 0..16);
        world
            .fill(IVec3::new(0, 0, 0), IVec3::new(3, 0, 0), &BlockState::new("bricks").unwrap())
            .unwrap();

        let mut state = ScanState::new("w", ChunkPos::new(0, 0), None);
        let left = BoundingVolume::from_corners("w", IVec3::new(0, 0, 0), IVec3::new(1, 1, 0));
        assert_eq!(state.overlap_fraction(&world, &left), 0.0);

        state.accept(&world, &left);
        assert_eq!(state.claimed_count(), 2);
        assert!(state.is_claimed(IVec3::new(1, 0, 0)));
        assert!(!state.is_claimed(IVec3::new(1, 1, 0)));

        let all = BoundingVolume::from_corners("w", IVec3::new(0, 0, 0), IVec3::new(3, 0, 0));
        assert_eq!(state.overlap_fraction(&world, &all), 0.5);
    }

    #[test]
    fn test_center_distance() {
        let mut world = World::new("w", 0..16);
        world.set_block(IVec3::ZERO, &BlockState::new("bricks").unwrap()).unwrap();
        let mut state = ScanState::new("w", ChunkPos::new(0, 0), None);
        state.accept(&world, &BoundingVolume::from_point("w", IVec3::ZERO));

        assert!(state.near_existing_center(IVec3::new(3, 0, 3), 5.0));
        assert!(!state.near_existing_center(IVec3::new(3, 0, 4), 5.0));
    }
}
