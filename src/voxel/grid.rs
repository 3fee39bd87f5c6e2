//! Grid accessor interface between the capture pipeline and a host world

use std::ops::Range;

use super::block_state::BlockState;
use super::registry::BlockRegistry;
use crate::core::{IVec3, Result};

/// Width of a chunk column in blocks along x and z
pub const CHUNK_WIDTH: i32 = 16;

/// Column coordinate of a chunk in the x/z plane
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing a block position
    pub fn from_block(pos: IVec3) -> Self {
        Self {
            x: pos.x.div_euclid(CHUNK_WIDTH),
            z: pos.z.div_euclid(CHUNK_WIDTH),
        }
    }

    /// Minimum block x of this chunk
    pub fn min_block_x(&self) -> i32 {
        self.x * CHUNK_WIDTH
    }

    /// Minimum block z of this chunk
    pub fn min_block_z(&self) -> i32 {
        self.z * CHUNK_WIDTH
    }

    /// The four planar neighbors (+x, -x, +z, -z)
    pub fn neighbors(&self) -> [ChunkPos; 4] {
        [
            ChunkPos::new(self.x + 1, self.z),
            ChunkPos::new(self.x - 1, self.z),
            ChunkPos::new(self.x, self.z + 1),
            ChunkPos::new(self.x, self.z - 1),
        ]
    }

    /// Chebyshev distance in chunks
    pub fn distance(&self, other: ChunkPos) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }
}

/// Access to a host voxel world.
///
/// Reads return the block state at a position, writes replace it. Chunk
/// residency is exposed so scanners can visit the generated area without
/// generating new terrain.
pub trait GridAccessor {
    /// Identity of the world, recorded in captured metadata
    fn name(&self) -> &str;

    /// Registry used to validate writes
    fn registry(&self) -> &BlockRegistry;

    /// Vertical extent, `min..max` (max exclusive)
    fn height_range(&self) -> Range<i32>;

    fn spawn_point(&self) -> IVec3;

    fn block(&self, pos: IVec3) -> Result<BlockState>;

    fn set_block(&mut self, pos: IVec3, state: &BlockState) -> Result<()>;

    /// Apply a full state string directly. Fails if the string does not parse
    /// strictly or the registry rejects it.
    fn set_block_data(&mut self, pos: IVec3, data: &str) -> Result<()> {
        let state = BlockState::parse(data)?;
        self.registry().validate(&state)?;
        self.set_block(pos, &state)
    }

    fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool;

    fn is_chunk_generated(&self, chunk: ChunkPos) -> bool;

    fn load_chunk(&mut self, chunk: ChunkPos) -> Result<()>;

    fn unload_chunk(&mut self, chunk: ChunkPos);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_from_block_negative() {
        assert_eq!(ChunkPos::from_block(IVec3::new(0, 64, 15)), ChunkPos::new(0, 0));
        assert_eq!(ChunkPos::from_block(IVec3::new(-1, 0, -16)), ChunkPos::new(-1, -1));
        assert_eq!(ChunkPos::from_block(IVec3::new(-17, 0, 16)), ChunkPos::new(-2, 1));
    }

    #[test]
    fn test_neighbors_and_distance() {
        let origin = ChunkPos::new(0, 0);
        for n in origin.neighbors() {
            assert_eq!(origin.distance(n), 1);
        }
        assert_eq!(origin.distance(ChunkPos::new(-3, 2)), 3);
        assert_eq!(ChunkPos::new(2, -1).min_block_x(), 32);
        assert_eq!(ChunkPos::new(2, -1).min_block_z(), -16);
    }
}
