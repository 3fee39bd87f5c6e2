//! Inclusive integer bounding volume bound to a world

use std::fmt;

use crate::core::IVec3;

/// Axis-aligned box of block positions, both corners inclusive.
///
/// The volume belongs to one world; `min <= max` holds component-wise.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundingVolume {
    world: String,
    min: IVec3,
    max: IVec3,
}

impl BoundingVolume {
    /// Volume spanning two arbitrary corners
    pub fn from_corners(world: impl Into<String>, a: IVec3, b: IVec3) -> Self {
        Self {
            world: world.into(),
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Single-cell volume
    pub fn from_point(world: impl Into<String>, p: IVec3) -> Self {
        Self::from_corners(world, p, p)
    }

    pub fn world(&self) -> &str {
        &self.world
    }

    pub fn min(&self) -> IVec3 {
        self.min
    }

    pub fn max(&self) -> IVec3 {
        self.max
    }

    /// Grow to include a point
    pub fn expand(&mut self, p: IVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Grow by `n` cells on every side (negative values are ignored)
    pub fn pad(&mut self, n: i32) {
        let n = IVec3::splat(n.max(0));
        self.min -= n;
        self.max += n;
    }

    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    pub fn intersects(&self, other: &BoundingVolume) -> bool {
        self.world == other.world && self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// Extent in cells along each axis
    pub fn size(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Number of cells enclosed
    pub fn volume(&self) -> i64 {
        let s = self.size();
        s.x as i64 * s.y as i64 * s.z as i64
    }

    /// Integer center, `(min + max) / 2` truncated toward zero
    pub fn center(&self) -> IVec3 {
        (self.min + self.max) / 2
    }

    /// Every enclosed position, y outermost then z then x
    pub fn positions(&self) -> impl Iterator<Item = IVec3> + '_ {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z).flat_map(move |z| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }
}

impl fmt::Display for BoundingVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, {}) -> ({}, {}, {})",
            self.world, self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z
        )
    }
}
