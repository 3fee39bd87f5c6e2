//! Block registry and the capability table.
//!
//! The registry answers two questions for the host grid: is an identifier a
//! block it knows, and which block-state properties does that block accept.
//! Properties are grouped into capabilities (facing, axis, half, ...) and each
//! block kind declares the capabilities it carries.

use std::collections::HashSet;

use log::warn;

use super::block_state::{identifier_path, normalize_identifier, BlockState};
use crate::core::{Error, Result};

/// Cardinal and vertical facing directions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Facing {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Facing {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "north" => Some(Self::North),
            "south" => Some(Self::South),
            "east" => Some(Self::East),
            "west" => Some(Self::West),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    pub fn is_horizontal(self) -> bool {
        !matches!(self, Self::Up | Self::Down)
    }
}

/// Set of faces a directional block may point at
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FaceSet {
    /// North, south, east, west
    Horizontal,
    /// All six faces
    All,
    /// Horizontal faces plus down (hoppers)
    HorizontalAndDown,
}

impl FaceSet {
    pub fn contains(self, facing: Facing) -> bool {
        match self {
            FaceSet::Horizontal => facing.is_horizontal(),
            FaceSet::All => true,
            FaceSet::HorizontalAndDown => facing != Facing::Up,
        }
    }
}

/// The 16-point compass used by rotatable blocks (signs, banners, heads).
///
/// Discriminants are the rotation property values: 0 is south, 4 west,
/// 8 north and 12 east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CompassFace {
    South = 0,
    SouthSouthWest,
    SouthWest,
    WestSouthWest,
    West,
    WestNorthWest,
    NorthWest,
    NorthNorthWest,
    North,
    NorthNorthEast,
    NorthEast,
    EastNorthEast,
    East,
    EastSouthEast,
    SouthEast,
    SouthSouthEast,
}

impl CompassFace {
    const ALL: [CompassFace; 16] = [
        Self::South,
        Self::SouthSouthWest,
        Self::SouthWest,
        Self::WestSouthWest,
        Self::West,
        Self::WestNorthWest,
        Self::NorthWest,
        Self::NorthNorthWest,
        Self::North,
        Self::NorthNorthEast,
        Self::NorthEast,
        Self::EastNorthEast,
        Self::East,
        Self::EastSouthEast,
        Self::SouthEast,
        Self::SouthSouthEast,
    ];

    /// Map a rotation value to a compass face; out-of-range values map to south
    pub fn from_rotation(rotation: i32) -> Self {
        usize::try_from(rotation)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(Self::South)
    }

    pub fn rotation(self) -> u8 {
        self as u8
    }
}

/// Which value pair a `half` property uses
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HalfStyle {
    /// Doors and tall plants
    UpperLower,
    /// Stairs and trapdoors
    TopBottom,
}

/// A settable block-state attribute
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    Facing(FaceSet),
    Axis,
    Half(HalfStyle),
    StairShape,
    Waterlogged,
    Hinge,
    Open,
    Powered,
    SlabType,
    BedPart,
    Occupied,
    InWall,
    Hanging,
    Rotation,
    AttachFace,
    ChestType,
}

fn one_of(value: &str, allowed: &[&str]) -> Option<String> {
    let value = value.trim().to_ascii_lowercase();
    allowed.contains(&value.as_str()).then_some(value)
}

impl Capability {
    /// Property key this capability reads and writes
    pub fn key(self) -> &'static str {
        match self {
            Capability::Facing(_) => "facing",
            Capability::Axis => "axis",
            Capability::Half(_) => "half",
            Capability::StairShape => "shape",
            Capability::Waterlogged => "waterlogged",
            Capability::Hinge => "hinge",
            Capability::Open => "open",
            Capability::Powered => "powered",
            Capability::SlabType | Capability::ChestType => "type",
            Capability::BedPart => "part",
            Capability::Occupied => "occupied",
            Capability::InWall => "in_wall",
            Capability::Hanging => "hanging",
            Capability::Rotation => "rotation",
            Capability::AttachFace => "face",
        }
    }

    /// Normalize a value into this capability's domain, or `None` if it
    /// cannot be interpreted
    pub fn normalize(self, value: &str) -> Option<String> {
        const BOOL: &[&str] = &["true", "false"];
        match self {
            Capability::Facing(set) => Facing::parse(value)
                .filter(|f| set.contains(*f))
                .map(|f| f.as_str().to_string()),
            Capability::Axis => one_of(value, &["x", "y", "z"]),
            Capability::Half(HalfStyle::UpperLower) => one_of(value, &["upper", "lower"]),
            Capability::Half(HalfStyle::TopBottom) => one_of(value, &["top", "bottom"]),
            Capability::StairShape => one_of(
                value,
                &["straight", "inner_left", "inner_right", "outer_left", "outer_right"],
            ),
            Capability::Waterlogged
            | Capability::Open
            | Capability::Powered
            | Capability::Occupied
            | Capability::InWall
            | Capability::Hanging => one_of(value, BOOL),
            Capability::Hinge => one_of(value, &["left", "right"]),
            Capability::SlabType => one_of(value, &["top", "bottom", "double"]),
            Capability::BedPart => one_of(value, &["head", "foot"]),
            Capability::Rotation => value
                .trim()
                .parse::<i32>()
                .ok()
                .map(|r| CompassFace::from_rotation(r).rotation().to_string()),
            Capability::AttachFace => one_of(value, &["floor", "wall", "ceiling"]),
            Capability::ChestType => one_of(value, &["single", "left", "right"]),
        }
    }
}

/// Shape family of a block, which fixes the capabilities it carries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Plain,
    Directional(FaceSet),
    Orientable,
    Stairs,
    Door,
    Trapdoor,
    Slab,
    Bed,
    FenceGate,
    Lantern,
    Chain,
    Rotatable,
    WallSign,
    /// Buttons and levers
    Switch,
    Chest,
    /// Blocks whose only state is `powered` (pressure plates)
    Powerable,
    /// Two-cell plants (tall grass, sunflowers, ...)
    TallPlant,
}

impl BlockKind {
    pub fn capabilities(self) -> &'static [Capability] {
        use Capability::*;
        match self {
            BlockKind::Plain => &[],
            BlockKind::Directional(FaceSet::Horizontal) => &[Facing(FaceSet::Horizontal)],
            BlockKind::Directional(FaceSet::All) => &[Facing(FaceSet::All)],
            BlockKind::Directional(FaceSet::HorizontalAndDown) => &[Facing(FaceSet::HorizontalAndDown)],
            BlockKind::Orientable => &[Axis],
            BlockKind::Stairs => &[
                Facing(FaceSet::Horizontal),
                Half(HalfStyle::TopBottom),
                StairShape,
                Waterlogged,
            ],
            BlockKind::Door => &[
                Facing(FaceSet::Horizontal),
                Half(HalfStyle::UpperLower),
                Hinge,
                Open,
                Powered,
            ],
            BlockKind::Trapdoor => &[
                Facing(FaceSet::Horizontal),
                Half(HalfStyle::TopBottom),
                Open,
                Powered,
                Waterlogged,
            ],
            BlockKind::Slab => &[SlabType, Waterlogged],
            BlockKind::Bed => &[Facing(FaceSet::Horizontal), BedPart, Occupied],
            BlockKind::FenceGate => &[Facing(FaceSet::Horizontal), Open, Powered, InWall],
            BlockKind::Lantern => &[Hanging, Waterlogged],
            BlockKind::Chain => &[Axis, Waterlogged],
            BlockKind::Rotatable => &[Rotation, Waterlogged],
            BlockKind::WallSign => &[Facing(FaceSet::Horizontal), Waterlogged],
            BlockKind::Switch => &[Facing(FaceSet::Horizontal), AttachFace, Powered],
            BlockKind::Chest => &[Facing(FaceSet::Horizontal), ChestType, Waterlogged],
            BlockKind::Powerable => &[Powered],
            BlockKind::TallPlant => &[Half(HalfStyle::UpperLower)],
        }
    }

    /// Capability owning a property key, if this kind carries one
    pub fn capability(self, key: &str) -> Option<Capability> {
        self.capabilities().iter().copied().find(|c| c.key() == key)
    }

    /// Face set of the `facing` capability, if present
    pub fn facing(self) -> Option<FaceSet> {
        self.capabilities().iter().find_map(|c| match c {
            Capability::Facing(set) => Some(*set),
            _ => None,
        })
    }

    /// Derive the kind from an identifier's path
    pub fn for_identifier(id: &str) -> Self {
        let path = identifier_path(id);
        let ends = |suffix: &str| path.ends_with(suffix);

        if ends("_trapdoor") {
            BlockKind::Trapdoor
        } else if ends("_door") {
            BlockKind::Door
        } else if ends("_stairs") {
            BlockKind::Stairs
        } else if ends("_slab") {
            BlockKind::Slab
        } else if ends("_bed") {
            BlockKind::Bed
        } else if ends("_fence_gate") {
            BlockKind::FenceGate
        } else if ends("_wall_sign") || ends("_wall_hanging_sign") {
            BlockKind::WallSign
        } else if ends("_wall_torch")
            || ends("_wall_banner")
            || ends("_wall_head")
            || ends("_wall_skull")
            || ends("_glazed_terracotta")
            || matches!(
                path,
                "ladder"
                    | "wall_torch"
                    | "furnace"
                    | "blast_furnace"
                    | "smoker"
                    | "ender_chest"
                    | "carved_pumpkin"
                    | "jack_o_lantern"
                    | "loom"
                    | "stonecutter"
                    | "lectern"
                    | "beehive"
                    | "bee_nest"
                    | "anvil"
                    | "chipped_anvil"
                    | "damaged_anvil"
                    | "repeater"
                    | "comparator"
                    | "tripwire_hook"
                    | "campfire"
                    | "soul_campfire"
            )
        {
            BlockKind::Directional(FaceSet::Horizontal)
        } else if path == "hopper" {
            BlockKind::Directional(FaceSet::HorizontalAndDown)
        } else if ends("_sign") || ends("_banner") || ends("_skull") || (ends("_head") && path != "piston_head") {
            BlockKind::Rotatable
        } else if ends("lantern") && path != "sea_lantern" {
            BlockKind::Lantern
        } else if path == "chain" || ends("_chain") {
            BlockKind::Chain
        } else if ends("_button") || path == "lever" {
            BlockKind::Switch
        } else if path == "chest" || path == "trapped_chest" {
            BlockKind::Chest
        } else if ends("_pressure_plate") {
            BlockKind::Powerable
        } else if ends("_shulker_box")
            || ends("_bud")
            || matches!(
                path,
                "observer"
                    | "piston"
                    | "sticky_piston"
                    | "dispenser"
                    | "dropper"
                    | "end_rod"
                    | "lightning_rod"
                    | "barrel"
                    | "command_block"
                    | "shulker_box"
                    | "piston_head"
                    | "amethyst_cluster"
            )
        {
            BlockKind::Directional(FaceSet::All)
        } else if (ends("_log") || ends("_wood") || ends("_hyphae") || ends("_pillar"))
            || (ends("_stem") && !matches!(path, "melon_stem" | "pumpkin_stem" | "mushroom_stem" | "attached_melon_stem" | "attached_pumpkin_stem"))
            || matches!(
                path,
                "hay_block" | "bone_block" | "basalt" | "polished_basalt" | "deepslate" | "bamboo_block"
            )
        {
            BlockKind::Orientable
        } else if matches!(
            path,
            "tall_grass" | "large_fern" | "sunflower" | "lilac" | "rose_bush" | "peony" | "tall_seagrass"
        ) {
            BlockKind::TallPlant
        } else {
            BlockKind::Plain
        }
    }
}

/// Registry of known block identifiers.
///
/// An open registry accepts every well-formed identifier; a closed one only
/// the identifiers it was built from.
#[derive(Clone, Debug, Default)]
pub struct BlockRegistry {
    known: Option<HashSet<String>>,
}

impl BlockRegistry {
    /// Registry accepting any well-formed identifier
    pub fn open() -> Self {
        Self { known: None }
    }

    /// Registry limited to the given identifiers. Malformed entries are
    /// logged and skipped.
    pub fn with_blocks<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut known = HashSet::new();
        for raw in ids {
            match normalize_identifier(raw.as_ref()) {
                Some(id) => {
                    known.insert(id);
                }
                None => warn!("Skipping malformed block identifier '{}'", raw.as_ref()),
            }
        }
        Self { known: Some(known) }
    }

    /// Check whether an identifier names a block this registry knows.
    /// Air variants are always known.
    pub fn is_known(&self, id: &str) -> bool {
        let Some(id) = normalize_identifier(id) else {
            return false;
        };
        match &self.known {
            None => true,
            Some(known) => super::block_state::is_air(&id) || known.contains(&id),
        }
    }

    pub fn kind_of(&self, id: &str) -> BlockKind {
        BlockKind::for_identifier(id)
    }

    /// Strict validation used when a full state string is applied directly.
    ///
    /// Rejects unknown identifiers and any capability property whose value is
    /// outside its domain. Keys that no capability owns are passed through to
    /// the host untouched.
    pub fn validate(&self, state: &BlockState) -> Result<()> {
        if !self.is_known(state.id()) {
            return Err(Error::UnknownBlockIdentifier(state.id().to_string()));
        }

        let kind = self.kind_of(state.id());
        for (key, value) in state.properties() {
            let Some(capability) = kind.capability(key) else {
                continue;
            };
            if capability.normalize(value).as_deref() != Some(value.as_str()) {
                return Err(Error::UnsupportedProperty {
                    block: state.id().to_string(),
                    key: key.clone(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_compass() {
        assert_eq!(CompassFace::from_rotation(0), CompassFace::South);
        assert_eq!(CompassFace::from_rotation(4), CompassFace::West);
        assert_eq!(CompassFace::from_rotation(8), CompassFace::North);
        assert_eq!(CompassFace::from_rotation(12), CompassFace::East);
        assert_eq!(CompassFace::from_rotation(15), CompassFace::SouthSouthEast);
        assert_eq!(CompassFace::from_rotation(16), CompassFace::South);
        assert_eq!(CompassFace::from_rotation(-1), CompassFace::South);
    }

    #[test]
    fn test_kinds_from_identifiers() {
        assert_eq!(BlockKind::for_identifier("minecraft:oak_door"), BlockKind::Door);
        assert_eq!(BlockKind::for_identifier("minecraft:oak_trapdoor"), BlockKind::Trapdoor);
        assert_eq!(BlockKind::for_identifier("minecraft:stone_brick_stairs"), BlockKind::Stairs);
        assert_eq!(BlockKind::for_identifier("minecraft:oak_log"), BlockKind::Orientable);
        assert_eq!(BlockKind::for_identifier("minecraft:melon_stem"), BlockKind::Plain);
        assert_eq!(BlockKind::for_identifier("minecraft:oak_sign"), BlockKind::Rotatable);
        assert_eq!(BlockKind::for_identifier("minecraft:oak_wall_sign"), BlockKind::WallSign);
        assert_eq!(BlockKind::for_identifier("minecraft:lantern"), BlockKind::Lantern);
        assert_eq!(BlockKind::for_identifier("minecraft:sea_lantern"), BlockKind::Plain);
        assert_eq!(
            BlockKind::for_identifier("minecraft:jack_o_lantern"),
            BlockKind::Directional(FaceSet::Horizontal)
        );
        assert_eq!(
            BlockKind::for_identifier("minecraft:wall_torch"),
            BlockKind::Directional(FaceSet::Horizontal)
        );
        assert_eq!(
            BlockKind::for_identifier("minecraft:soul_wall_torch"),
            BlockKind::Directional(FaceSet::Horizontal)
        );
        assert_eq!(BlockKind::for_identifier("minecraft:stone"), BlockKind::Plain);
    }

    #[test]
    fn test_capability_normalize() {
        assert_eq!(
            Capability::Facing(FaceSet::Horizontal).normalize("NORTH").as_deref(),
            Some("north")
        );
        assert_eq!(Capability::Facing(FaceSet::Horizontal).normalize("up"), None);
        assert_eq!(Capability::Facing(FaceSet::All).normalize("up").as_deref(), Some("up"));
        assert_eq!(Capability::Rotation.normalize("12").as_deref(), Some("12"));
        assert_eq!(Capability::Rotation.normalize("40").as_deref(), Some("0"));
        assert_eq!(Capability::Rotation.normalize("x"), None);
        assert_eq!(Capability::Half(HalfStyle::UpperLower).normalize("top"), None);
    }

    #[test]
    fn test_validate_strict() {
        let registry = BlockRegistry::open();
        let door = BlockState::parse("minecraft:oak_door[facing=north,half=lower]").unwrap();
        assert!(registry.validate(&door).is_ok());

        let bad = BlockState::parse("minecraft:oak_door[facing=up]").unwrap();
        assert!(matches!(
            registry.validate(&bad),
            Err(Error::UnsupportedProperty { .. })
        ));

        // keys the model does not own are passed through
        let rail = BlockState::parse("minecraft:rail[shape=north_south]").unwrap();
        assert!(registry.validate(&rail).is_ok());
    }

    #[test]
    fn test_closed_registry() {
        let registry = BlockRegistry::with_blocks(["stone", "minecraft:oak_planks", "bad id"]);
        assert!(registry.is_known("minecraft:stone"));
        assert!(registry.is_known("OAK_PLANKS"));
        assert!(registry.is_known("minecraft:cave_air"));
        assert!(!registry.is_known("minecraft:diamond_block"));
        assert!(!registry.is_known("bad id"));

        let state = BlockState::new("diamond_block").unwrap();
        assert!(matches!(
            registry.validate(&state),
            Err(Error::UnknownBlockIdentifier(_))
        ));
    }
}
