//! Integer bounding volumes

pub mod bounds;

pub use bounds::BoundingVolume;
