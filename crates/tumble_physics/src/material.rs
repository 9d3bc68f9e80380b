//! Contact response coefficients

use serde::{Deserialize, Serialize};

/// Restitution and friction applied when something hits a surface
///
/// `friction` is a velocity retention factor: tangential velocity is
/// multiplied by it on contact (1.0 = frictionless, 0.0 = full stop).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContactMaterial {
    /// Fraction of normal speed kept (sign-inverted) after a bounce
    pub restitution: f64,
    /// Fraction of tangential speed kept after a contact
    pub friction: f64,
}

impl Default for ContactMaterial {
    fn default() -> Self {
        Self::CLOTH
    }
}

impl ContactMaterial {
    /// Bouncy rigid body on the ground
    pub const RIGID: Self = Self {
        restitution: 0.8,
        friction: 1.0,
    };

    /// Cloth against a box or the floor
    pub const CLOTH: Self = Self {
        restitution: 0.2,
        friction: 0.9,
    };

    /// Create a material with coefficients clamped to [0.0, 1.0]
    pub fn new(restitution: f64, friction: f64) -> Self {
        Self {
            restitution: restitution.clamp(0.0, 1.0),
            friction: friction.clamp(0.0, 1.0),
        }
    }
}
