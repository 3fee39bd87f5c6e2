//! In-memory world implementing the grid accessor

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use super::block_state::BlockState;
use super::chunk::Chunk;
use super::grid::{ChunkPos, GridAccessor};
use super::registry::BlockRegistry;
use crate::core::{Error, IVec3, Result};

/// Container for a world composed of column chunks.
///
/// A chunk is "generated" once it exists in the map and "loaded" while it is
/// in the loaded set. Reads of ungenerated cells return air.
pub struct World {
    name: String,
    height: Range<i32>,
    spawn: IVec3,
    registry: BlockRegistry,
    /// Map from chunk position to generated chunks
    chunks: HashMap<ChunkPos, Chunk>,
    loaded: HashSet<ChunkPos>,
    /// Chunks written since the list was last taken
    modified_chunks: Vec<ChunkPos>,
}

impl World {
    /// Create an empty world with an open registry
    pub fn new(name: impl Into<String>, height: Range<i32>) -> Self {
        let spawn_y = height.start.max(0).min(height.end - 1);
        Self {
            name: name.into(),
            height,
            spawn: IVec3::new(0, spawn_y, 0),
            registry: BlockRegistry::open(),
            chunks: HashMap::new(),
            loaded: HashSet::new(),
            modified_chunks: Vec::new(),
        }
    }

    pub fn with_registry(mut self, registry: BlockRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_spawn(mut self, spawn: IVec3) -> Self {
        self.spawn = spawn;
        self
    }

    /// Create an empty chunk if it does not exist yet
    pub fn generate_chunk(&mut self, pos: ChunkPos) -> &mut Chunk {
        let (min_y, height) = (self.height.start, self.height.end - self.height.start);
        self.chunks
            .entry(pos)
            .or_insert_with(|| Chunk::new(pos, min_y, height))
    }

    pub fn get_chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    pub fn get_chunk_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        self.chunks.get_mut(&pos)
    }

    /// Number of generated chunks
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of currently loaded chunks
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }

    /// Fill an inclusive box with one state, returning the number of cells written
    pub fn fill(&mut self, a: IVec3, b: IVec3, state: &BlockState) -> Result<usize> {
        let (min, max) = (a.min(b), a.max(b));
        let mut written = 0;
        for y in min.y..=max.y {
            for z in min.z..=max.z {
                for x in min.x..=max.x {
                    self.set_block(IVec3::new(x, y, z), state)?;
                    written += 1;
                }
            }
        }
        Ok(written)
    }

    /// Mark a chunk as modified
    pub fn mark_modified(&mut self, pos: ChunkPos) {
        if !self.modified_chunks.contains(&pos) {
            self.modified_chunks.push(pos);
        }
        if let Some(chunk) = self.chunks.get_mut(&pos) {
            chunk.modified = true;
        }
    }

    /// Take the list of modified chunks and clear the internal list
    pub fn take_modified(&mut self) -> Vec<ChunkPos> {
        for pos in &self.modified_chunks {
            if let Some(chunk) = self.chunks.get_mut(pos) {
                chunk.modified = false;
            }
        }
        std::mem::take(&mut self.modified_chunks)
    }
}

impl GridAccessor for World {
    fn name(&self) -> &str {
        &self.name
    }

    fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    fn height_range(&self) -> Range<i32> {
        self.height.clone()
    }

    fn spawn_point(&self) -> IVec3 {
        self.spawn
    }

    fn block(&self, pos: IVec3) -> Result<BlockState> {
        let chunk_pos = ChunkPos::from_block(pos);
        Ok(self
            .chunks
            .get(&chunk_pos)
            .map(|chunk| {
                chunk
                    .get(pos.x - chunk_pos.min_block_x(), pos.y, pos.z - chunk_pos.min_block_z())
                    .clone()
            })
            .unwrap_or_default())
    }

    fn set_block(&mut self, pos: IVec3, state: &BlockState) -> Result<()> {
        if !self.height.contains(&pos.y) {
            return Err(Error::GridMutation(format!(
                "y={} outside height range {}..{}",
                pos.y, self.height.start, self.height.end
            )));
        }
        if !self.registry.is_known(state.id()) {
            return Err(Error::UnknownBlockIdentifier(state.id().to_string()));
        }

        let chunk_pos = ChunkPos::from_block(pos);
        let chunk = self.generate_chunk(chunk_pos);
        if !chunk.set(pos.x - chunk_pos.min_block_x(), pos.y, pos.z - chunk_pos.min_block_z(), state) {
            return Err(Error::GridMutation(format!("could not write {pos}")));
        }
        self.mark_modified(chunk_pos);
        Ok(())
    }

    fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool {
        self.loaded.contains(&chunk)
    }

    fn is_chunk_generated(&self, chunk: ChunkPos) -> bool {
        self.chunks.contains_key(&chunk)
    }

    fn load_chunk(&mut self, chunk: ChunkPos) -> Result<()> {
        if !self.chunks.contains_key(&chunk) {
            return Err(Error::GridRead(format!("chunk ({}, {}) has not been generated", chunk.x, chunk.z)));
        }
        self.loaded.insert(chunk);
        Ok(())
    }

    fn unload_chunk(&mut self, chunk: ChunkPos) {
        self.loaded.remove(&chunk);
    }
}
