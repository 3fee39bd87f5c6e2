//! Substring pattern rules and the default rule tables

use serde::{Deserialize, Serialize};

/// Matches identifier paths containing `contains`, unless they also contain
/// one of the `unless` exceptions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRule {
    pub contains: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unless: Vec<String>,
}

impl PatternRule {
    pub fn new(contains: &str) -> Self {
        Self {
            contains: contains.to_ascii_lowercase(),
            unless: Vec::new(),
        }
    }

    pub fn unless(mut self, exceptions: &[&str]) -> Self {
        self.unless
            .extend(exceptions.iter().map(|e| e.to_ascii_lowercase()));
        self
    }

    /// Test a lowercase identifier path
    pub fn matches(&self, path: &str) -> bool {
        path.contains(self.contains.as_str()) && !self.unless.iter().any(|e| path.contains(e.as_str()))
    }
}

/// True if any rule in the table matches
pub fn any_match(rules: &[PatternRule], path: &str) -> bool {
    rules.iter().any(|rule| rule.matches(path))
}

fn plain(patterns: &[&str]) -> Vec<PatternRule> {
    patterns.iter().map(|p| PatternRule::new(p)).collect()
}

/// Natural blocks: terrain, fluids and ground cover
pub fn default_natural_blocks() -> Vec<String> {
    [
        "stone", "granite", "diorite", "andesite", "deepslate", "tuff", "calcite", "dirt",
        "grass_block", "coarse_dirt", "podzol", "rooted_dirt", "mud", "sand", "red_sand", "gravel",
        "clay", "sandstone", "red_sandstone", "water", "lava", "bedrock", "netherrack",
        "soul_sand", "soul_soil", "basalt", "blackstone", "end_stone", "ice", "packed_ice",
        "blue_ice", "snow", "snow_block", "powder_snow", "coal_ore", "iron_ore", "copper_ore",
        "gold_ore", "redstone_ore", "lapis_ore", "diamond_ore", "emerald_ore",
        "deepslate_coal_ore", "deepslate_iron_ore", "deepslate_copper_ore", "deepslate_gold_ore",
        "deepslate_redstone_ore", "deepslate_lapis_ore", "deepslate_diamond_ore",
        "deepslate_emerald_ore", "short_grass", "grass", "tall_grass", "fern", "large_fern",
        "dead_bush", "dripstone_block", "pointed_dripstone", "magma_block", "obsidian",
    ]
    .iter()
    .map(|id| format!("minecraft:{id}"))
    .collect()
}

/// Indicator blocks: man-made blocks that seed detection and scans
pub fn default_indicator_blocks() -> Vec<String> {
    [
        "oak_planks", "spruce_planks", "birch_planks", "jungle_planks", "acacia_planks",
        "dark_oak_planks", "mangrove_planks", "cherry_planks", "bamboo_planks",
        "crimson_planks", "warped_planks", "cobblestone", "mossy_cobblestone", "stone_bricks",
        "mossy_stone_bricks", "cracked_stone_bricks", "bricks", "glass", "glass_pane",
        "white_wool", "crafting_table", "furnace", "chest", "bookshelf", "torch", "wall_torch",
        "lantern", "oak_door", "spruce_door", "birch_door", "iron_door", "oak_stairs",
        "cobblestone_stairs", "stone_brick_stairs", "oak_slab", "cobblestone_slab",
        "oak_fence", "cobblestone_wall", "white_bed", "red_bed", "smooth_stone", "polished_andesite",
        "polished_granite", "polished_diorite", "terracotta", "white_concrete",
    ]
    .iter()
    .map(|id| format!("minecraft:{id}"))
    .collect()
}

/// Vegetation and organic blocks that never count as structure parts
pub fn default_vegetation_rules() -> Vec<PatternRule> {
    let mut rules = plain(&["leaves", "log", "wood", "sapling"]);
    rules.push(PatternRule::new("mushroom").unless(&["block"]));
    rules.extend(plain(&["flower", "azalea", "dripleaf", "spore"]));
    rules.push(PatternRule::new("moss").unless(&["mossy"]));
    rules.extend(plain(&["vine", "lichen"]));
    rules.push(PatternRule::new("coral").unless(&["block"]));
    rules.extend(plain(&["kelp", "seagrass", "sweet_berry", "sugar_cane"]));
    rules.push(PatternRule::new("bamboo").unless(&["planks", "block"]));
    rules.push(PatternRule::new("cactus"));
    rules.push(PatternRule::new("melon").unless(&["stem"]));
    rules.push(PatternRule::new("pumpkin").unless(&["carved", "jack"]));
    rules
}

/// Name patterns of processed building materials
pub fn default_built_material_rules() -> Vec<PatternRule> {
    plain(&[
        // Building materials
        "planks", "bricks", "stairs", "slab", "fence", "wall", "door", "trapdoor", "glass",
        "carpet", "wool", "concrete", "terracotta", "glazed",
        // Furniture and decoration
        "bed", "banner", "sign", "button", "lever", "pressure_plate", "torch", "lantern",
        "campfire", "chain", "iron_bars",
        // Functional blocks
        "anvil", "cauldron", "brewing", "enchanting", "barrel", "composter", "smoker",
        "blast_furnace", "cartography", "fletching", "grindstone", "lectern", "loom",
        "smithing", "stonecutter", "bell", "lodestone",
        // Processed stone
        "polished", "cut_", "smooth_", "chiseled", "carved", "pillar",
    ])
}

/// Blocks that need a supporting neighbor and are placed last
pub fn default_physics_rules() -> Vec<PatternRule> {
    let mut rules = plain(&[
        // Torches, lights and redstone
        "torch", "lever", "tripwire", "button", "pressure_plate", "carpet", "rail",
        "redstone_wire", "repeater", "comparator", "ladder",
        // Plants
        "dandelion", "poppy", "blue_orchid", "allium", "azure_bluet", "tulip", "oxeye_daisy",
        "cornflower", "lily_of_the_valley", "wither_rose", "sunflower", "lilac", "rose_bush",
        "peony", "fern", "dead_bush", "seagrass", "wheat", "carrots", "potatoes", "beetroots",
        "sweet_berry_bush", "nether_wart", "cocoa", "sapling",
        // Decorations
        "sign", "banner", "skull", "painting", "item_frame", "bell", "scaffolding",
        "candle",
        // Other
        "pointed_dripstone", "spore_blossom", "glow_lichen", "vine",
    ]);
    rules.push(PatternRule::new("lantern").unless(&["sea_", "jack_o"]));
    rules.push(PatternRule::new("head").unless(&["piston_head"]));
    rules.push(PatternRule::new("chain").unless(&["chainmail", "chain_command"]));
    rules.push(PatternRule::new("grass").unless(&["grass_block"]));
    rules.push(PatternRule::new("stem").unless(&["mushroom_stem", "crimson_stem", "warped_stem"]));
    rules.push(PatternRule::new("snow").unless(&["snow_block", "powder_snow"]));
    rules
}
