//! Extraction of a bounding volume into the flat form

use log::debug;

use super::portable::{BlockEntry, PortableStructure, StructureMetadata};
use crate::core::{Error, IVec3, Result};
use crate::math::BoundingVolume;
use crate::voxel::GridAccessor;

/// Reads every cell of a volume into a [`PortableStructure`]
#[derive(Clone, Debug, Default)]
pub struct StructureExtractor {
    include_air: bool,
}

impl StructureExtractor {
    pub fn new(include_air: bool) -> Self {
        Self { include_air }
    }

    pub fn include_air(&self) -> bool {
        self.include_air
    }

    /// Capture a volume. Offsets are relative to the volume's minimum corner
    /// and entries follow y, then z, then x order. Unreadable cells are
    /// skipped.
    pub fn extract<G: GridAccessor + ?Sized>(
        &self,
        grid: &G,
        volume: &BoundingVolume,
        name: Option<&str>,
    ) -> Result<PortableStructure> {
        if volume.world() != grid.name() {
            return Err(Error::InvalidVolume(format!(
                "volume belongs to '{}', grid is '{}'",
                volume.world(),
                grid.name()
            )));
        }

        let origin = volume.min();
        let mut structure = PortableStructure::new(name.map(str::to_string), volume.size());
        structure.metadata = StructureMetadata::captured_now(grid.name(), origin);

        for pos in volume.positions() {
            let state = match grid.block(pos) {
                Ok(state) => state,
                Err(e) => {
                    debug!("Skipping unreadable cell {pos}: {e}");
                    continue;
                }
            };
            if state.is_air() && !self.include_air {
                continue;
            }
            structure.push(BlockEntry::new(pos - origin, state.id()).with_data(state.to_string()));
        }

        debug!("Extracted {} blocks from {volume}", structure.block_count());
        Ok(structure)
    }

    /// Capture the box spanned by two corners of a manual selection
    pub fn extract_selection<G: GridAccessor + ?Sized>(
        &self,
        grid: &G,
        a: IVec3,
        b: IVec3,
        name: Option<&str>,
    ) -> Result<PortableStructure> {
        let volume = BoundingVolume::from_corners(grid.name(), a, b);
        let mut structure = self.extract(grid, &volume, name)?;
        structure.metadata = structure.metadata.with_capture_mode("manual");
        Ok(structure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxel::{BlockState, World};

    fn world() -> World {
        let mut world = World::new("overworld", 0..64);
        world.set_block(IVec3::new(10, 5, 10), &BlockState::new("cobblestone").unwrap()).unwrap();
        world
            .set_block_data(IVec3::new(11, 6, 10), "minecraft:oak_stairs[facing=east,half=bottom]")
            .unwrap();
        world
    }

    #[test]
    fn test_extract_relative_offsets() {
        let world = world();
        let volume = BoundingVolume::from_corners("overworld", IVec3::new(10, 5, 10), IVec3::new(11, 6, 11));
        let s = StructureExtractor::new(false).extract(&world, &volume, Some("steps")).unwrap();

        assert_eq!(s.size, [2, 2, 2]);
        assert_eq!(s.block_count(), 2);
        assert_eq!(s.blocks[0].offset(), IVec3::ZERO);
        assert_eq!(s.blocks[0].data.as_deref(), Some("minecraft:cobblestone"));
        assert_eq!(s.blocks[1].offset(), IVec3::new(1, 1, 0));
        assert_eq!(s.blocks[1].block, "minecraft:oak_stairs");
        assert_eq!(
            s.blocks[1].data.as_deref(),
            Some("minecraft:oak_stairs[facing=east,half=bottom]")
        );
        assert_eq!(s.metadata.source_world.as_deref(), Some("overworld"));
        assert_eq!(s.metadata.original_origin(), IVec3::new(10, 5, 10));
        assert!(s.metadata.capture_time.is_some());
    }

    #[test]
    fn test_include_air() {
        let world = world();
        let volume = BoundingVolume::from_corners("overworld", IVec3::new(10, 5, 10), IVec3::new(11, 6, 11));
        let s = StructureExtractor::new(true).extract(&world, &volume, None).unwrap();
        assert_eq!(s.block_count(), 8);
        assert_eq!(s.blocks[1].block, "minecraft:air");
    }

    #[test]
    fn test_wrong_world() {
        let world = world();
        let volume = BoundingVolume::from_point("nether", IVec3::ZERO);
        assert!(matches!(
            StructureExtractor::default().extract(&world, &volume, None),
            Err(Error::InvalidVolume(_))
        ));
    }

    #[test]
    fn test_selection_marks_manual() {
        let world = world();
        let s = StructureExtractor::default()
            .extract_selection(&world, IVec3::new(11, 6, 10), IVec3::new(10, 5, 10), None)
            .unwrap();
        assert_eq!(s.block_count(), 2);
        assert_eq!(s.metadata.capture_mode.as_deref(), Some("manual"));
    }
}
