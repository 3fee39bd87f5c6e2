//! Voxcap - detect man-made structures in voxel worlds, capture them as
//! portable block lists and rebuild them elsewhere in a safe placement order.

pub mod core;
pub mod math;
pub mod voxel;
pub mod detection;
pub mod structure;
pub mod scanner;
pub mod builder;
