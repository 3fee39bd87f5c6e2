//! Error types for structure capture and reconstruction

use thiserror::Error;

/// Main error type for the crate
#[derive(Debug, Error)]
pub enum Error {
    #[error("No structure found: {reason}")]
    NoStructureFound { reason: String },

    #[error("Structure too small ({count} blocks, minimum {min})")]
    StructureTooSmall { count: usize, min: usize },

    #[error("Structure too large ({count} blocks, maximum {max})")]
    StructureTooLarge { count: usize, max: usize },

    #[error("Structure dimensions {size:?} exceed limits {max:?} ({count} blocks)")]
    DimensionsExceeded { size: [i32; 3], max: [i32; 3], count: usize },

    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    #[error("Unknown block identifier: {0}")]
    UnknownBlockIdentifier(String),

    #[error("Unsupported property {key}={value} on {block}")]
    UnsupportedProperty { block: String, key: String, value: String },

    #[error("Invalid block state: {0}")]
    InvalidBlockState(String),

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Grid read error: {0}")]
    GridRead(String),

    #[error("Grid mutation error: {0}")]
    GridMutation(String),

    #[error("A scan is already in progress")]
    ScanInProgress,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Number of structure blocks found before the detection was rejected, if any
    pub fn partial_count(&self) -> Option<usize> {
        match self {
            Error::StructureTooSmall { count, .. }
            | Error::StructureTooLarge { count, .. }
            | Error::DimensionsExceeded { count, .. } => Some(*count),
            Error::NoStructureFound { .. } => Some(0),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_counts() {
        let err = Error::StructureTooSmall { count: 19, min: 20 };
        assert_eq!(err.to_string(), "Structure too small (19 blocks, minimum 20)");
        assert_eq!(err.partial_count(), Some(19));
    }

    #[test]
    fn test_plumbing_errors_have_no_count() {
        let err = Error::GridMutation("out of range".into());
        assert_eq!(err.partial_count(), None);
    }
}
