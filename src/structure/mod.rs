//! Portable structures: the flat and palette interchange forms, extraction
//! from a grid and file export.

pub mod portable;
pub mod palette;
pub mod extractor;
pub mod export;

pub use portable::{BlockEntry, PortableStructure, StructureMetadata};
pub use palette::PaletteStructure;
pub use extractor::StructureExtractor;
pub use export::{ExportConfig, load_structure, save_structure};
