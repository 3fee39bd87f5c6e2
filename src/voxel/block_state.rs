//! Block state: a namespaced identifier plus an ordered property map.
//!
//! The canonical string form is `namespace:name[key=value,...]` with keys
//! sorted. Keys and values are case-insensitive (stored lowercase) and a
//! repeated key keeps the last value written.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::core::{Error, Result};

/// Namespace assumed when an identifier has none
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Plain air identifier
pub const AIR: &str = "minecraft:air";

/// The three air variants of the host block set
pub const AIR_VARIANTS: [&str; 3] = ["minecraft:air", "minecraft:cave_air", "minecraft:void_air"];

/// Check whether a normalized identifier is one of the air variants
pub fn is_air(id: &str) -> bool {
    AIR_VARIANTS.contains(&id)
}

/// Normalize a raw identifier: trim, lowercase, add the default namespace.
///
/// Returns `None` when the identifier is empty or contains characters outside
/// `[a-z0-9_.-]` (plus `/` in the path part).
pub fn normalize_identifier(raw: &str) -> Option<String> {
    let id = raw.trim().to_ascii_lowercase();
    let (namespace, path) = match id.split_once(':') {
        Some((ns, path)) => (ns, path),
        None => (DEFAULT_NAMESPACE, id.as_str()),
    };

    if !valid_token(namespace, false) || !valid_token(path, true) {
        return None;
    }
    Some(format!("{namespace}:{path}"))
}

/// The path part of a namespaced identifier (`minecraft:oak_door` -> `oak_door`)
pub fn identifier_path(id: &str) -> &str {
    id.split_once(':').map_or(id, |(_, path)| path)
}

fn valid_token(token: &str, allow_slash: bool) -> bool {
    !token.is_empty()
        && token.chars().all(|c| {
            c.is_ascii_lowercase()
                || c.is_ascii_digit()
                || matches!(c, '_' | '-' | '.')
                || (allow_slash && c == '/')
        })
}

fn valid_property_token(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Result of the lenient parser used by the fallback placement path
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LenientState {
    /// Identifier, if the string carried a well-formed one
    pub id: Option<String>,
    /// Every `key=value` pair that split cleanly
    pub properties: BTreeMap<String, String>,
}

/// A block identifier with its properties
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockState {
    id: String,
    properties: BTreeMap<String, String>,
}

impl BlockState {
    /// Create a state with no properties, normalizing the identifier
    pub fn new(id: &str) -> Result<Self> {
        let id = normalize_identifier(id)
            .ok_or_else(|| Error::UnknownBlockIdentifier(id.to_string()))?;
        Ok(Self { id, properties: BTreeMap::new() })
    }

    /// Plain air
    pub fn air() -> Self {
        Self { id: AIR.to_string(), properties: BTreeMap::new() }
    }

    /// Normalized identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Identifier path without the namespace
    pub fn path(&self) -> &str {
        identifier_path(&self.id)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Look up a property (key is case-insensitive)
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(&key.to_ascii_lowercase()).map(String::as_str)
    }

    /// Set a property; a previous value for the same key is replaced
    pub fn set_property(&mut self, key: &str, value: &str) {
        self.properties
            .insert(key.trim().to_ascii_lowercase(), value.trim().to_ascii_lowercase());
    }

    /// Builder-style variant of [`set_property`](Self::set_property)
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.set_property(key, value);
        self
    }

    /// Check if this is any of the air variants
    pub fn is_air(&self) -> bool {
        is_air(&self.id)
    }

    /// Strict parse of `namespace:name[key=value,...]`.
    ///
    /// Fails with `UnknownBlockIdentifier` for a malformed identifier and with
    /// `InvalidBlockState` for malformed property syntax.
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (id_part, props_part) = match input.find('[') {
            Some(open) => {
                let inner = input[open + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| Error::InvalidBlockState(input.to_string()))?;
                (&input[..open], Some(inner))
            }
            None => (input, None),
        };

        if id_part.contains(']') {
            return Err(Error::InvalidBlockState(input.to_string()));
        }
        let mut state = Self::new(id_part)?;

        let Some(props) = props_part else {
            return Ok(state);
        };
        if props.trim().is_empty() {
            return Ok(state);
        }
        if props.contains('[') || props.contains(']') {
            return Err(Error::InvalidBlockState(input.to_string()));
        }

        for pair in props.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| Error::InvalidBlockState(input.to_string()))?;
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim().to_ascii_lowercase();
            if !valid_property_token(&key) || !valid_property_token(&value) {
                return Err(Error::InvalidBlockState(input.to_string()));
            }
            state.properties.insert(key, value);
        }

        Ok(state)
    }

    /// Lenient parse: malformed pairs are skipped, a missing `]` is tolerated
    /// and a property-only string (`[facing=north]`) yields no identifier.
    pub fn parse_lenient(input: &str) -> LenientState {
        let input = input.trim();
        let (id_part, props_part) = match input.find('[') {
            Some(open) => {
                let end = input.rfind(']').filter(|&end| end > open).unwrap_or(input.len());
                (&input[..open], Some(&input[open + 1..end]))
            }
            None => (input, None),
        };

        let mut properties = BTreeMap::new();
        for pair in props_part.into_iter().flat_map(|p| p.split(',')) {
            let parts: Vec<&str> = pair.split('=').collect();
            if let [key, value] = parts.as_slice() {
                let key = key.trim().to_ascii_lowercase();
                if !key.is_empty() {
                    properties.insert(key, value.trim().to_ascii_lowercase());
                }
            }
        }

        LenientState {
            id: normalize_identifier(id_part),
            properties,
        }
    }
}

impl Default for BlockState {
    fn default() -> Self {
        Self::air()
    }
}

impl FromStr for BlockState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)?;
        if !self.properties.is_empty() {
            f.write_str("[")?;
            for (i, (key, value)) in self.properties.iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                write!(f, "{key}={value}")?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_identifier() {
        assert_eq!(normalize_identifier("STONE").as_deref(), Some("minecraft:stone"));
        assert_eq!(normalize_identifier(" minecraft:Oak_Door ").as_deref(), Some("minecraft:oak_door"));
        assert_eq!(normalize_identifier("mod:deco/lamp").as_deref(), Some("mod:deco/lamp"));
        assert_eq!(normalize_identifier(""), None);
        assert_eq!(normalize_identifier("bad block"), None);
        assert_eq!(normalize_identifier("ns/x:stone"), None);
    }

    #[test]
    fn test_parse_full_state() {
        let state = BlockState::parse(
            "minecraft:oak_door[facing=north,half=lower,hinge=left,open=false,powered=false]",
        )
        .unwrap();
        assert_eq!(state.id(), "minecraft:oak_door");
        assert_eq!(state.property("half"), Some("lower"));
        assert_eq!(state.property("FACING"), Some("north"));
        assert_eq!(state.properties().len(), 5);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let state = BlockState::parse("minecraft:oak_log[AXIS=x,axis=Y]").unwrap();
        assert_eq!(state.properties().len(), 1);
        assert_eq!(state.property("axis"), Some("y"));
    }

    #[test]
    fn test_display_is_canonical() {
        let state = BlockState::parse("oak_stairs[half=bottom,facing=east]").unwrap();
        assert_eq!(state.to_string(), "minecraft:oak_stairs[facing=east,half=bottom]");
        assert_eq!(BlockState::parse(&state.to_string()).unwrap(), state);
        assert_eq!(BlockState::air().to_string(), "minecraft:air");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            BlockState::parse("minecraft:oak_door[facing=north"),
            Err(Error::InvalidBlockState(_))
        ));
        assert!(matches!(
            BlockState::parse("minecraft:oak_door[facing]"),
            Err(Error::InvalidBlockState(_))
        ));
        assert!(matches!(
            BlockState::parse("[facing=north]"),
            Err(Error::UnknownBlockIdentifier(_))
        ));
    }

    #[test]
    fn test_parse_lenient() {
        let parsed = BlockState::parse_lenient("minecraft:oak_door[facing=north,garbage,half=upper");
        assert_eq!(parsed.id.as_deref(), Some("minecraft:oak_door"));
        assert_eq!(parsed.properties.get("facing").map(String::as_str), Some("north"));
        assert_eq!(parsed.properties.get("half").map(String::as_str), Some("upper"));
        assert_eq!(parsed.properties.len(), 2);

        let legacy = BlockState::parse_lenient("[axis=x]");
        assert_eq!(legacy.id, None);
        assert_eq!(legacy.properties.get("axis").map(String::as_str), Some("x"));
    }

    #[test]
    fn test_air_variants() {
        assert!(BlockState::new("cave_air").unwrap().is_air());
        assert!(BlockState::air().is_air());
        assert!(!BlockState::new("glass").unwrap().is_air());
    }
}
