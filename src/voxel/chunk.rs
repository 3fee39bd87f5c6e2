//! Column chunk storing block states as palette indices

use std::collections::HashMap;

use super::block_state::BlockState;
use super::grid::{ChunkPos, CHUNK_WIDTH};

/// A 16-wide column of blocks spanning the world's height range.
///
/// Each cell is an index into a per-chunk palette; index 0 is always air.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// Column coordinate of this chunk
    pub pos: ChunkPos,
    min_y: i32,
    height: i32,
    palette: Vec<BlockState>,
    palette_index: HashMap<BlockState, u16>,
    cells: Vec<u16>,
    /// Whether this chunk has been written since last taken
    pub modified: bool,
}

impl Chunk {
    /// Create an all-air chunk
    pub fn new(pos: ChunkPos, min_y: i32, height: i32) -> Self {
        let air = BlockState::air();
        let height = height.max(0);
        Self {
            pos,
            min_y,
            height,
            palette_index: HashMap::from([(air.clone(), 0)]),
            palette: vec![air],
            cells: vec![0; (CHUNK_WIDTH * CHUNK_WIDTH * height) as usize],
            modified: false,
        }
    }

    /// Cell index for chunk-local x/z and world y
    fn index(&self, x: i32, y: i32, z: i32) -> Option<usize> {
        let ly = y - self.min_y;
        if !(0..CHUNK_WIDTH).contains(&x) || !(0..CHUNK_WIDTH).contains(&z) || !(0..self.height).contains(&ly) {
            return None;
        }
        Some(((ly * CHUNK_WIDTH + z) * CHUNK_WIDTH + x) as usize)
    }

    /// Block at chunk-local x/z and world y; out of range reads as air
    pub fn get(&self, x: i32, y: i32, z: i32) -> &BlockState {
        let slot = self.index(x, y, z).map_or(0, |i| self.cells[i]);
        &self.palette[slot as usize]
    }

    /// Write a block; returns false if the position is outside the chunk or
    /// the palette has no free slot for a new state
    pub fn set(&mut self, x: i32, y: i32, z: i32, state: &BlockState) -> bool {
        let Some(i) = self.index(x, y, z) else {
            return false;
        };
        let slot = match self.palette_index.get(state) {
            Some(&slot) => slot,
            None => {
                let Ok(slot) = u16::try_from(self.palette.len()) else {
                    return false;
                };
                self.palette.push(state.clone());
                self.palette_index.insert(state.clone(), slot);
                slot
            }
        };
        self.cells[i] = slot;
        self.modified = true;
        true
    }

    /// Number of distinct states ever written to this chunk, air included
    pub fn palette_len(&self) -> usize {
        self.palette.len()
    }

    /// Number of cells holding something other than air
    pub fn non_air_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&slot| !self.palette[slot as usize].is_air())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_chunk_is_air() {
        let chunk = Chunk::new(ChunkPos::new(0, 0), -64, 384);
        assert!(chunk.get(0, -64, 0).is_air());
        assert!(chunk.get(15, 319, 15).is_air());
        assert_eq!(chunk.non_air_count(), 0);
        assert!(!chunk.modified);
    }

    #[test]
    fn test_set_and_get_shares_palette() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 0, 16);
        let stone = BlockState::new("stone").unwrap();
        assert!(chunk.set(1, 2, 3, &stone));
        assert!(chunk.set(4, 5, 6, &stone));
        assert_eq!(chunk.get(1, 2, 3), &stone);
        assert_eq!(chunk.palette_len(), 2);
        assert_eq!(chunk.non_air_count(), 2);
        assert!(chunk.modified);
    }

    #[test]
    fn test_out_of_range() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 0, 16);
        let stone = BlockState::new("stone").unwrap();
        assert!(!chunk.set(16, 0, 0, &stone));
        assert!(!chunk.set(0, 16, 0, &stone));
        assert!(chunk.get(0, -1, 0).is_air());
    }

    #[test]
    fn test_palette_full() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 0, 1);
        let base = BlockState::new("oak_sign").unwrap();
        for i in 1..=u16::MAX as usize {
            let state = base.clone().with_property("n", &i.to_string());
            chunk.palette_index.insert(state.clone(), i as u16);
            chunk.palette.push(state);
        }
        assert_eq!(chunk.palette_len(), u16::MAX as usize + 1);

        let stone = BlockState::new("stone").unwrap();
        assert!(!chunk.set(0, 0, 0, &stone));
        assert!(chunk.get(0, 0, 0).is_air());
        // states already in the palette still write
        assert!(chunk.set(0, 0, 0, &base.with_property("n", "7")));
        assert_eq!(chunk.get(0, 0, 0).property("n"), Some("7"));
    }
}
