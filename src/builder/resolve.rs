//! Fallback property resolution and auto-orientation.
//!
//! Used when a full state string is missing or rejected: the identifier is
//! set first, then each discrete property is applied through the block's
//! capabilities. Properties the block cannot take are returned for
//! reporting rather than failing the cell.

use std::collections::BTreeMap;

use crate::core::IVec3;
use crate::voxel::block_state::identifier_path;
use crate::voxel::{BlockKind, BlockState, Facing};

/// Result of resolving discrete properties onto an identifier
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    pub state: BlockState,
    /// Properties that were dropped, as `(key, value)`
    pub ignored: Vec<(String, String)>,
}

/// Apply discrete properties to `state` via the kind's capabilities. A block
/// that takes a facing but got none is oriented from its position.
pub fn resolve_state(
    mut state: BlockState,
    kind: BlockKind,
    properties: &BTreeMap<String, String>,
    offset: IVec3,
    size: IVec3,
) -> Resolution {
    let mut ignored = Vec::new();

    for (key, value) in properties {
        match kind.capability(key).and_then(|cap| cap.normalize(value)) {
            Some(normalized) => state.set_property(key, &normalized),
            None => ignored.push((key.clone(), value.clone())),
        }
    }

    if let Some(faces) = kind.facing() {
        if state.property("facing").is_none() {
            if let Some(facing) = auto_facing(state.id(), offset, size).filter(|f| faces.contains(*f)) {
                state.set_property("facing", facing.as_str());
            }
        }
    }

    Resolution { state, ignored }
}

/// Facing for ladders and doors on the structure's outer walls.
///
/// Ladders face away from the wall they hang on (x first, then z); doors
/// check z walls before x walls.
pub fn auto_facing(id: &str, offset: IVec3, size: IVec3) -> Option<Facing> {
    let path = identifier_path(id);
    let max = size - IVec3::ONE;

    let x_wall = || {
        if offset.x == 0 {
            Some(Facing::East)
        } else if offset.x == max.x {
            Some(Facing::West)
        } else {
            None
        }
    };
    let z_wall = || {
        if offset.z == 0 {
            Some(Facing::South)
        } else if offset.z == max.z {
            Some(Facing::North)
        } else {
            None
        }
    };

    if path.contains("ladder") {
        x_wall().or_else(z_wall)
    } else if path.contains("door") {
        z_wall().or_else(x_wall)
    } else {
        None
    }
}
