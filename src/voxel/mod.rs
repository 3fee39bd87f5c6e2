//! Voxel grid model: block states, the block registry, the grid accessor
//! interface and an in-memory world implementing it.

pub mod block_state;
pub mod registry;
pub mod grid;
pub mod chunk;
pub mod world;
pub mod terrain;

pub use block_state::{BlockState, AIR, DEFAULT_NAMESPACE};
pub use registry::{BlockKind, BlockRegistry, Capability, CompassFace, FaceSet, Facing, HalfStyle};
pub use grid::{ChunkPos, GridAccessor, CHUNK_WIDTH};
pub use chunk::Chunk;
pub use world::World;
pub use terrain::{TerrainGenerator, TerrainParams};
