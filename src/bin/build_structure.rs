//! Structure builder binary: loads a captured structure, rebuilds it into a
//! fresh flat world, prints the build report, then undoes the build and
//! checks that every touched cell was restored.
//!
//! Usage: cargo run --release --bin build_structure -- [OPTIONS]
//!
//! Options:
//!   --file <PATH>   Flat or palette structure JSON (default: built-in tower)
//!   --x <X>         Build origin X (default: 0)
//!   --y <Y>         Build origin Y (default: 1)
//!   --z <Z>         Build origin Z (default: 0)
//!   --actor <NAME>  Name recorded in the undo history (default: builder)

use std::path::PathBuf;
use std::time::Instant;

use voxcap::builder::{BuilderConfig, PlacementSource, ReconstructionPlanner, UndoStore};
use voxcap::core::{logging, Error, IVec3, Result};
use voxcap::math::BoundingVolume;
use voxcap::structure::{PaletteStructure, PortableStructure};
use voxcap::voxel::{BlockState, ChunkPos, GridAccessor, World};

/// A small watchtower in the flat format: stone base, ladder, lantern on a chain
const TOWER: &str = r#"{
    "name": "watchtower",
    "size": [3, 6, 3],
    "blocks": [
        {"x": 0, "y": 0, "z": 0, "block": "minecraft:stone_bricks"},
        {"x": 1, "y": 0, "z": 0, "block": "minecraft:stone_bricks"},
        {"x": 2, "y": 0, "z": 0, "block": "minecraft:stone_bricks"},
        {"x": 0, "y": 0, "z": 2, "block": "minecraft:stone_bricks"},
        {"x": 1, "y": 0, "z": 2, "block": "minecraft:stone_bricks"},
        {"x": 2, "y": 0, "z": 2, "block": "minecraft:stone_bricks"},
        {"x": 0, "y": 0, "z": 1, "block": "minecraft:stone_bricks"},
        {"x": 2, "y": 0, "z": 1, "block": "minecraft:stone_bricks"},
        {"x": 0, "y": 1, "z": 0, "block": "minecraft:oak_fence"},
        {"x": 2, "y": 1, "z": 0, "block": "minecraft:oak_fence"},
        {"x": 0, "y": 1, "z": 2, "block": "minecraft:oak_fence"},
        {"x": 2, "y": 1, "z": 2, "block": "minecraft:oak_fence"},
        {"x": 0, "y": 2, "z": 0, "block": "minecraft:oak_fence"},
        {"x": 2, "y": 2, "z": 0, "block": "minecraft:oak_fence"},
        {"x": 0, "y": 2, "z": 2, "block": "minecraft:oak_fence"},
        {"x": 2, "y": 2, "z": 2, "block": "minecraft:oak_fence"},
        {"x": 1, "y": 1, "z": 1, "block": "minecraft:ladder"},
        {"x": 1, "y": 2, "z": 1, "block": "minecraft:ladder"},
        {"x": 0, "y": 3, "z": 0, "block": "minecraft:oak_slab", "data": "minecraft:oak_slab[type=bottom]"},
        {"x": 1, "y": 3, "z": 0, "block": "minecraft:oak_planks"},
        {"x": 2, "y": 3, "z": 0, "block": "minecraft:oak_slab", "data": "minecraft:oak_slab[type=bottom]"},
        {"x": 0, "y": 3, "z": 1, "block": "minecraft:oak_planks"},
        {"x": 1, "y": 3, "z": 1, "block": "minecraft:oak_planks"},
        {"x": 2, "y": 3, "z": 1, "block": "minecraft:oak_planks"},
        {"x": 0, "y": 3, "z": 2, "block": "minecraft:oak_slab", "data": "minecraft:oak_slab[type=bottom]"},
        {"x": 1, "y": 3, "z": 2, "block": "minecraft:oak_planks"},
        {"x": 2, "y": 3, "z": 2, "block": "minecraft:oak_slab", "data": "minecraft:oak_slab[type=bottom]"},
        {"x": 1, "y": 5, "z": 1, "block": "minecraft:oak_planks"},
        {"x": 1, "y": 4, "z": 1, "block": "minecraft:chain", "data": "minecraft:chain[axis=y]"},
        {"x": 0, "y": 4, "z": 0, "block": "minecraft:torch"},
        {"x": 2, "y": 4, "z": 2, "block": "minecraft:torch"}
    ]
}"#;

fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let origin = IVec3::new(
        parse_i32_arg(&args, "--x").unwrap_or(0),
        parse_i32_arg(&args, "--y").unwrap_or(1),
        parse_i32_arg(&args, "--z").unwrap_or(0),
    );
    let actor = parse_str_arg(&args, "--actor").unwrap_or_else(|| "builder".to_string());

    let json = match parse_str_arg(&args, "--file") {
        Some(path) => std::fs::read_to_string(PathBuf::from(path))?,
        None => TOWER.to_string(),
    };
    let structure = load_any(&json)?;
    let size = structure.size();

    println!("=== Voxcap Structure Builder ===");
    println!("Size:   {} x {} x {}", size.x, size.y, size.z);
    println!("Origin: ({}, {}, {})", origin.x, origin.y, origin.z);
    println!();

    // Flat stone world covering the footprint plus a one-chunk margin
    let mut world = World::new("sandbox", -64..320);
    let far = origin + size;
    let (min_chunk, max_chunk) = (ChunkPos::from_block(origin), ChunkPos::from_block(far));
    for cx in (min_chunk.x - 1)..=(max_chunk.x + 1) {
        for cz in (min_chunk.z - 1)..=(max_chunk.z + 1) {
            world.generate_chunk(ChunkPos::new(cx, cz));
        }
    }
    let floor = BlockState::new("minecraft:stone")?;
    let margin = IVec3::new(16, 0, 16);
    world.fill(
        IVec3::new(origin.x, origin.y - 1, origin.z) - margin,
        IVec3::new(far.x, origin.y - 1, far.z) + margin,
        &floor,
    )?;

    let volume = BoundingVolume::from_corners(world.name(), origin, far - IVec3::ONE);
    let before: Vec<(IVec3, BlockState)> = volume
        .positions()
        .map(|pos| world.block(pos).map(|state| (pos, state)))
        .collect::<Result<_>>()?;

    let start = Instant::now();
    let planner = ReconstructionPlanner::new(BuilderConfig::default());
    let mut history = UndoStore::new(planner.config().max_undo_depth);
    let report = planner.build(structure.as_ref(), origin, &mut world, &actor, &mut history)?;
    println!("Build:  {} in {:.2?}", report, start.elapsed());
    for message in report.messages() {
        println!("  - {}", message);
    }

    let restored = history.undo(&actor, &mut world);
    let mut mismatched = 0;
    for (pos, prior) in &before {
        if world.block(*pos)? != *prior {
            mismatched += 1;
        }
    }
    println!("Undo:   {} cells restored, {} mismatched", restored, mismatched);

    if mismatched > 0 {
        return Err(Error::GridMutation(format!("{mismatched} cells differ after undo")));
    }
    println!();
    println!("=== Done ===");
    Ok(())
}

/// Accept either interchange form. The palette form is tried first since a
/// palette document also deserializes as a flat structure with no blocks.
fn load_any(json: &str) -> Result<Box<dyn PlacementSource>> {
    match PaletteStructure::from_json(json) {
        Ok(palette) => Ok(Box::new(palette)),
        Err(palette_err) => {
            log::debug!("Not a palette structure: {palette_err}");
            Ok(Box::new(PortableStructure::from_json(json)?))
        }
    }
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
