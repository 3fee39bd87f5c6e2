//! Noise-based terrain for populating in-memory worlds

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::block_state::BlockState;
use super::grid::{ChunkPos, GridAccessor, CHUNK_WIDTH};
use super::world::World;
use crate::core::{IVec3, Result};

/// Parameters controlling terrain generation
#[derive(Clone, Debug)]
pub struct TerrainParams {
    pub seed: u32,
    pub scale: f64,        // Horizontal scale (larger = smoother)
    pub height_scale: f64, // Vertical amplitude above base height
    pub base_height: i32,
    pub octaves: usize,
    pub persistence: f64,
    pub lacunarity: f64,
    pub sea_level: i32,
    pub soil_depth: i32,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            seed: 12345,
            scale: 100.0,
            height_scale: 24.0,
            base_height: 56,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            sea_level: 62,
            soil_depth: 3,
        }
    }
}

/// Fractal Brownian motion heightfield terrain
pub struct TerrainGenerator {
    params: TerrainParams,
    noise: Fbm<Perlin>,
    stone: BlockState,
    dirt: BlockState,
    grass: BlockState,
    water: BlockState,
}

impl TerrainGenerator {
    pub fn new(params: TerrainParams) -> Result<Self> {
        let noise = Fbm::<Perlin>::new(params.seed)
            .set_octaves(params.octaves)
            .set_persistence(params.persistence)
            .set_lacunarity(params.lacunarity);

        Ok(Self {
            params,
            noise,
            stone: BlockState::new("stone")?,
            dirt: BlockState::new("dirt")?,
            grass: BlockState::new("grass_block")?,
            water: BlockState::new("water")?,
        })
    }

    pub fn params(&self) -> &TerrainParams {
        &self.params
    }

    /// Surface height at a column
    pub fn height_at(&self, x: i32, z: i32) -> i32 {
        let nx = x as f64 / self.params.scale;
        let nz = z as f64 / self.params.scale;
        let normalized = (self.noise.get([nx, nz]) + 1.0) / 2.0;
        self.params.base_height + (normalized * self.params.height_scale) as i32
    }

    /// Fill one chunk column with stone, soil, grass and water up to sea level
    pub fn generate_chunk(&self, world: &mut World, pos: ChunkPos) -> Result<()> {
        let range = world.height_range();
        world.generate_chunk(pos);

        for lz in 0..CHUNK_WIDTH {
            for lx in 0..CHUNK_WIDTH {
                let x = pos.min_block_x() + lx;
                let z = pos.min_block_z() + lz;
                let surface = self.height_at(x, z).clamp(range.start, range.end - 1);
                let water_top = self.params.sea_level.min(range.end - 1);

                for y in range.start..=surface.max(water_top) {
                    let state = if y > surface {
                        &self.water
                    } else if y == surface && surface >= self.params.sea_level {
                        &self.grass
                    } else if y > surface - self.params.soil_depth {
                        &self.dirt
                    } else {
                        &self.stone
                    };
                    world.set_block(IVec3::new(x, y, z), state)?;
                }
            }
        }
        Ok(())
    }

    /// Generate a square of chunks around a center chunk
    pub fn generate_area(&self, world: &mut World, center: ChunkPos, radius: i32) -> Result<usize> {
        let mut generated = 0;
        for cz in center.z - radius..=center.z + radius {
            for cx in center.x - radius..=center.x + radius {
                self.generate_chunk(world, ChunkPos::new(cx, cz))?;
                generated += 1;
            }
        }
        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_is_deterministic() {
        let a = TerrainGenerator::new(TerrainParams::default()).unwrap();
        let b = TerrainGenerator::new(TerrainParams::default()).unwrap();
        assert_eq!(a.height_at(10, -20), b.height_at(10, -20));

        let h = a.height_at(0, 0);
        assert!(h >= 56 && h <= 56 + 24);
    }

    #[test]
    fn test_generate_chunk_fills_column() {
        let generator = TerrainGenerator::new(TerrainParams::default()).unwrap();
        let mut world = World::new("terrain", -64..320);
        generator.generate_chunk(&mut world, ChunkPos::new(0, 0)).unwrap();

        assert!(world.is_chunk_generated(ChunkPos::new(0, 0)));
        let surface = generator.height_at(3, 3);
        assert_eq!(world.block(IVec3::new(3, -64, 3)).unwrap().id(), "minecraft:stone");
        assert!(!world.block(IVec3::new(3, surface, 3)).unwrap().is_air());
        let above = surface.max(generator.params().sea_level) + 1;
        assert!(world.block(IVec3::new(3, above, 3)).unwrap().is_air());
    }
}
