//! Rigid body types

use crate::forces::ForceSet;
use crate::shapes::AABB;
use slotmap::new_key_type;
use tumble_math::Vec3;

// Define generational key type for rigid bodies
new_key_type! {
    /// Key to a rigid body in the physics world
    ///
    /// Uses generational indexing: once a body is removed, its old key
    /// returns None even if the slot is reused.
    pub struct BodyKey;
}

/// A point-mass rigid body with an axis-aligned collision box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RigidBody {
    /// Position in world space (m)
    pub position: Vec3,
    /// Velocity (m/s)
    pub velocity: Vec3,
    /// Mass (kg), strictly positive
    pub mass: f64,
    /// Dimensionless drag coefficient Cd
    pub drag_coefficient: f64,
    /// Cross-section facing the flow (m²)
    pub frontal_area: f64,
    /// Collision box relative to `position`
    pub local_bounds: AABB,
    /// Force contributions applied by the integrator
    pub forces: ForceSet,
}

impl RigidBody {
    /// Create a resting body with unit mass, gravity and drag
    pub fn new(position: Vec3, local_bounds: AABB) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            mass: 1.0,
            drag_coefficient: 0.47,
            frontal_area: 0.1,
            local_bounds,
            forces: ForceSet::AMBIENT,
        }
    }

    /// Create a body whose collision box is a cube of the given half size
    pub fn new_cube(position: Vec3, half_size: f64) -> Self {
        Self::new(
            position,
            AABB::from_center_half_extents(Vec3::ZERO, Vec3::splat(half_size)),
        )
    }

    /// Set the velocity of this body
    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    /// Set the mass of this body
    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    /// Set the aerodynamic drag parameters
    pub fn with_drag(mut self, drag_coefficient: f64, frontal_area: f64) -> Self {
        self.drag_coefficient = drag_coefficient;
        self.frontal_area = frontal_area;
        self
    }

    /// Set which forces act on this body
    pub fn with_forces(mut self, forces: ForceSet) -> Self {
        self.forces = forces;
        self
    }

    /// Collision box in world space
    pub fn world_bounds(&self) -> AABB {
        self.local_bounds.translated(self.position)
    }

    /// Center of the world-space collision box
    pub fn world_center(&self) -> Vec3 {
        self.world_bounds().center()
    }

    /// Apply a positional correction (e.g., from collision resolution)
    pub fn apply_correction(&mut self, correction: Vec3) {
        self.position += correction;
    }

    /// Kinetic energy, `0.5 * m * |v|^2`
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.length_squared()
    }
}
