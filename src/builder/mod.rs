//! Reconstruction: order a structure's cells for placement, write them into
//! a grid and keep enough history to undo the build.

pub mod config;
pub mod plan;
pub mod resolve;
pub mod report;
pub mod undo;
pub mod planner;

pub use config::BuilderConfig;
pub use plan::{PlacementClass, PlacementEntry, PlacementPlan, PlacementSource, PlannedBlock};
pub use report::BuildReport;
pub use undo::{UndoEntry, UndoRecord, UndoStore};
pub use planner::{BuildOutcome, ReconstructionPlanner};
