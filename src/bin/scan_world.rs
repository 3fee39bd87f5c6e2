//! World scanner binary: generates terrain, stamps sample buildings and
//! captures every structure the fleet scanner finds.
//!
//! Usage: cargo run --release --bin scan_world -- [OPTIONS]
//!
//! Options:
//!   --seed <SEED>       Terrain seed (default: 12345)
//!   --radius <CHUNKS>   Generated area radius in chunks (default: 4)
//!   --houses <N>        Sample buildings to stamp (default: 6)
//!   --config <PATH>     Capture settings JSON (default: built-in defaults)
//!   --out <DIR>         Output directory (default: export.output-dir)
//!
//! Output structure:
//!   <out>/<world>/
//!     structure_001.json
//!     structure_002.json
//!     ...

use std::path::PathBuf;
use std::time::Instant;

use voxcap::builder::{ReconstructionPlanner, UndoStore};
use voxcap::core::{logging, CaptureSettings, IVec3, Result};
use voxcap::scanner::FleetScanner;
use voxcap::structure::{save_structure, PaletteStructure};
use voxcap::voxel::{ChunkPos, GridAccessor, TerrainGenerator, TerrainParams, World};

/// A 7x5x6 cottage: cobblestone walls, plank floor and roof, a door and a torch
const COTTAGE: &str = r#"{
    "name": "cottage",
    "size": [7, 5, 6],
    "palette": {
        "C": "minecraft:cobblestone",
        "P": "minecraft:oak_planks",
        "G": "minecraft:glass_pane",
        "D": "minecraft:oak_door[facing=north,half=lower,hinge=left,open=false,powered=false]",
        "U": "minecraft:oak_door[facing=north,half=upper,hinge=left,open=false,powered=false]",
        "T": "minecraft:wall_torch[facing=south]",
        "E": "minecraft:air"
    },
    "layers": {
        "0": [["P","P","P","P","P","P","P"],["P","P","P","P","P","P","P"],["P","P","P","P","P","P","P"],
              ["P","P","P","P","P","P","P"],["P","P","P","P","P","P","P"],["P","P","P","P","P","P","P"]],
        "1": [["C","C","C","D","C","C","C"],["C","E","E","E","E","E","C"],["C","E","E","E","E","E","C"],
              ["C","E","E","E","E","E","C"],["C","E","E","E","E","E","C"],["C","C","C","C","C","C","C"]],
        "2": [["C","G","C","U","C","G","C"],["C","E","E","E","E","E","C"],["G","E","E","E","E","E","G"],
              ["C","E","E","E","E","E","C"],["C","E","E","T","E","E","C"],["C","C","G","C","G","C","C"]],
        "3": [["C","C","C","C","C","C","C"],["C","E","E","E","E","E","C"],["C","E","E","E","E","E","C"],
              ["C","E","E","E","E","E","C"],["C","E","E","E","E","E","C"],["C","C","C","C","C","C","C"]],
        "4": [["P","P","P","P","P","P","P"],["P","P","P","P","P","P","P"],["P","P","P","P","P","P","P"],
              ["P","P","P","P","P","P","P"],["P","P","P","P","P","P","P"],["P","P","P","P","P","P","P"]]
    }
}"#;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().collect();
    let seed = parse_u32_arg(&args, "--seed").unwrap_or(12345);
    let radius = parse_i32_arg(&args, "--radius").unwrap_or(4);
    let houses = parse_usize_arg(&args, "--houses").unwrap_or(6);
    let settings = match parse_str_arg(&args, "--config") {
        Some(path) => CaptureSettings::load_sync(&PathBuf::from(path))?,
        None => CaptureSettings::default(),
    };
    let out_root = parse_str_arg(&args, "--out")
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.export.output_dir.clone());

    println!("=== Voxcap World Scanner ===");
    println!("Seed:   {}", seed);
    println!("Area:   {} chunks radius", radius);
    println!("Houses: {}", houses);
    println!("Output: {}", out_root.display());
    println!();

    let start = Instant::now();
    let mut world = World::new("overworld", -64..320);
    let terrain = TerrainGenerator::new(TerrainParams { seed, ..Default::default() })?;
    let generated = terrain.generate_area(&mut world, ChunkPos::new(0, 0), radius)?;
    println!("Generated {} chunks in {:.2?}", generated, start.elapsed());

    // Stamp cottages on a ring around spawn, resting on the local surface
    let cottage = PaletteStructure::from_json(COTTAGE)?;
    let planner = ReconstructionPlanner::new(settings.builder.clone());
    let mut history = UndoStore::new(settings.builder.max_undo_depth);
    let ring = (radius * 16 - 12).max(8) as f64;
    for i in 0..houses {
        let angle = i as f64 / houses.max(1) as f64 * std::f64::consts::TAU;
        let x = (angle.cos() * ring * 0.6) as i32;
        let z = (angle.sin() * ring * 0.6) as i32;
        let y = terrain.height_at(x, z).max(terrain.params().sea_level) + 1;
        let report = planner.build(&cottage, IVec3::new(x, y, z), &mut world, "worldgen", &mut history)?;
        println!("  cottage {} at ({}, {}, {}): {}", i + 1, x, y, z, report);
    }

    let mut scanner = FleetScanner::from_settings(&settings);
    let queued = scanner.start(&world, None)?;
    println!("Scanning {} initial chunks...", queued);

    let world_dir = out_root.join(world.name());
    let mut written = 0;
    while scanner.is_scanning() {
        for hit in scanner.tick(&mut world)? {
            written += 1;
            let mut structure = hit.structure;
            let name = format!("structure_{:03}", written);
            structure.name = Some(name.clone());
            let path = world_dir.join(format!("{name}.json"));
            save_structure(&path, &structure, settings.export.pretty_json).await?;
            println!(
                "  {} ({} blocks, center {}) -> {}",
                name,
                structure.block_count(),
                hit.center,
                path.display()
            );
        }
    }

    let stats = scanner.stats();
    println!();
    println!("=== Done in {:.2?} ===", start.elapsed());
    println!("Chunks scanned:     {}", stats.chunks_scanned);
    println!("Structures found:   {}", stats.structures_found);
    println!("Duplicates skipped: {}", stats.duplicates_skipped);
    Ok(())
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_i32_arg(args: &[String], flag: &str) -> Option<i32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
