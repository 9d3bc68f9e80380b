//! Collision shapes
//!
//! The axis-aligned bounding box is the only collision primitive: rigid
//! bodies carry one in local space, and the cloth collides against one.

use crate::error::PhysicsError;
use tumble_math::{Axis, Vec3};

/// An axis-aligned bounding box
///
/// Invariant: `min <= max` componentwise. Boxes are values; translation
/// and splitting produce new boxes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABB {
    /// Minimum corner (all components are minimums)
    pub min: Vec3,
    /// Maximum corner (all components are maximums)
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from two corners
    ///
    /// The corners are reordered componentwise, so `min <= max` holds
    /// whatever order they are passed in.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min_components(b),
            max: a.max_components(b),
        }
    }

    /// Create an AABB centered at a position with given half-extents
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half_extents = half_extents.abs();
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Smallest box enclosing every point
    pub fn from_points(points: &[Vec3]) -> Result<Self, PhysicsError> {
        let (first, rest) = points.split_first().ok_or(PhysicsError::EmptyPointSet)?;
        let (min, max) = rest.iter().fold((*first, *first), |(min, max), p| {
            (min.min_components(*p), max.max_components(*p))
        });
        Ok(Self { min, max })
    }

    /// Create a unit cube centered at the origin
    pub fn unit() -> Self {
        Self::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents (half the size in each dimension)
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Get the full size in each dimension
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point is inside or on the AABB
    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if two boxes overlap on all three axes (touching counts)
    pub fn intersects(&self, other: &Self) -> bool {
        Axis::ALL.iter().all(|&axis| {
            self.min.component(axis) <= other.max.component(axis)
                && self.max.component(axis) >= other.min.component(axis)
        })
    }

    /// The axis along which the box is largest
    ///
    /// Ties resolve toward X, then Y.
    pub fn largest_axis(&self) -> Axis {
        let size = self.size();
        if size.x >= size.y && size.x >= size.z {
            Axis::X
        } else if size.y >= size.z {
            Axis::Y
        } else {
            Axis::Z
        }
    }

    /// Bisect the box at the midpoint of `axis`
    pub fn split(&self, axis: Axis) -> (Self, Self) {
        let mid = (self.min.component(axis) + self.max.component(axis)) * 0.5;
        let first = Self {
            min: self.min,
            max: self.max.with_component(axis, mid),
        };
        let second = Self {
            min: self.min.with_component(axis, mid),
            max: self.max,
        };
        (first, second)
    }

    /// Bisect the box along its largest axis
    pub fn split_largest(&self) -> (Self, Self) {
        self.split(self.largest_axis())
    }

    /// Translate the AABB by a delta
    pub fn translated(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// The eight corners, indexed by bit pattern (bit 0 = x, bit 1 = y, bit 2 = z)
    pub fn corners(&self) -> [Vec3; 8] {
        let mut corners = [Vec3::ZERO; 8];
        for (i, corner) in corners.iter_mut().enumerate() {
            *corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
        }
        corners
    }

    /// The twelve box edges as segment endpoint pairs
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let c = self.corners();
        // Corner pairs differing in exactly one bit.
        [
            (c[0], c[1]),
            (c[2], c[3]),
            (c[4], c[5]),
            (c[6], c[7]),
            (c[0], c[2]),
            (c[1], c[3]),
            (c[4], c[6]),
            (c[5], c[7]),
            (c[0], c[4]),
            (c[1], c[5]),
            (c[2], c[6]),
            (c[3], c[7]),
        ]
    }
}
