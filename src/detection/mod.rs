//! Structure detection: block classification and bounded flood fill

pub mod rules;
pub mod config;
pub mod classifier;
pub mod flood_fill;

pub use rules::PatternRule;
pub use config::DetectionConfig;
pub use classifier::{BlockClass, VoxelClassifier};
pub use flood_fill::{Detection, QueueDiscipline, StructureDetector};
