//! Force field model
//!
//! Instantaneous force contributions: uniform gravity, quadratic
//! aerodynamic drag and a synthetic vortex ("tornado") field around a
//! vertical axis. Every function here is pure; integration happens in
//! [`crate::integrator`] and [`crate::cloth`].

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tumble_math::Vec3;

/// Standard gravitational acceleration magnitude (m/s²)
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Sea-level air density (kg/m³)
pub const AIR_DENSITY: f64 = 1.225;

bitflags! {
    /// Which force contributions act on a rigid body
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ForceSet: u8 {
        /// Uniform gravity, `mass * g`
        const GRAVITY = 1 << 0;
        /// Quadratic air drag opposing velocity
        const DRAG = 1 << 1;
        /// Vortex field pull, spin and lift
        const VORTEX = 1 << 2;
        /// Gravity and drag, the free-fall setup
        const AMBIENT = Self::GRAVITY.bits() | Self::DRAG.bits();
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        ForceSet::AMBIENT
    }
}

/// Gravity force on a mass
#[inline]
pub fn gravity(mass: f64, g: Vec3) -> Vec3 {
    g * mass
}

/// Quadratic drag force: `-0.5 * rho * |v|^2 * Cd * A * v_hat`
///
/// Zero for a body at rest.
pub fn drag(velocity: Vec3, drag_coefficient: f64, frontal_area: f64, air_density: f64) -> Vec3 {
    let speed = velocity.length();
    if speed > 0.0 {
        // |v|^2 * v_hat == |v| * v
        velocity * (-0.5 * air_density * speed * drag_coefficient * frontal_area)
    } else {
        Vec3::ZERO
    }
}

/// A vortex around a vertical axis through `center`
///
/// The field pulls toward the axis, spins around it and lifts along it.
/// Beyond `max_radius` an extra pull grows linearly with the excess
/// horizontal distance.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct VortexField {
    /// A point on the vortex axis
    pub center: Vec3,
    /// Horizontal radius beyond which the pull-back term kicks in
    pub max_radius: f64,
    /// Magnitude of the pull toward the axis
    pub inward_strength: f64,
    /// Magnitude of the tangential push
    pub spiral_strength: f64,
    /// Magnitude of the constant upward force
    pub lift_strength: f64,
    /// Pull-back force per unit of distance past `max_radius`
    pub pullback_gain: f64,
    /// Damping rate applied to outward radial speed (1/s)
    pub radial_braking: f64,
    /// Distances below this are treated as "at the center"
    pub epsilon: f64,
}

impl Default for VortexField {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            max_radius: 6.0,
            inward_strength: 10.0,
            spiral_strength: 10.0,
            lift_strength: 10.0,
            pullback_gain: 20.0,
            radial_braking: 2.0,
            epsilon: 1e-5,
        }
    }
}

impl VortexField {
    /// Create a field with default strengths around `center`
    pub fn new(center: Vec3) -> Self {
        Self {
            center,
            ..Self::default()
        }
    }

    /// Set the maximum radius
    pub fn with_max_radius(mut self, max_radius: f64) -> Self {
        self.max_radius = max_radius;
        self
    }

    /// Set inward, spiral and lift strengths
    pub fn with_strengths(mut self, inward: f64, spiral: f64, lift: f64) -> Self {
        self.inward_strength = inward;
        self.spiral_strength = spiral;
        self.lift_strength = lift;
        self
    }

    /// Unit vector from `position` toward the axis and the horizontal distance to it
    ///
    /// `None` when the position sits on the axis.
    fn inward_direction(&self, position: Vec3) -> Option<(Vec3, f64)> {
        let horizontal = (self.center - position).horizontal();
        let distance = horizontal.length();
        if distance < self.epsilon {
            None
        } else {
            Some((horizontal / distance, distance))
        }
    }

    /// Force exerted by the field at `position`
    pub fn force(&self, position: Vec3) -> Vec3 {
        if position.distance(self.center) < self.epsilon {
            return Vec3::ZERO;
        }

        let lift = Vec3::Y * self.lift_strength;
        let Some((inward, distance)) = self.inward_direction(position) else {
            // On the axis the pull and spin directions are undefined
            return lift;
        };

        // Perpendicular to both the center vector and the vertical axis
        let spiral = inward.cross(Vec3::Y);

        let mut force = inward * self.inward_strength + spiral * self.spiral_strength + lift;
        if distance > self.max_radius {
            force += inward * ((distance - self.max_radius) * self.pullback_gain);
        }
        force
    }

    /// Damp the part of `velocity` carrying the body away from the axis
    ///
    /// Runs after the force has been integrated into velocity. The removed
    /// fraction is `radial_braking * dt`, capped at the full outward speed.
    pub fn brake_radial(&self, position: Vec3, velocity: Vec3, dt: f64) -> Vec3 {
        let Some((inward, _)) = self.inward_direction(position) else {
            return velocity;
        };

        let outward_speed = velocity.dot(-inward);
        if outward_speed > 0.0 {
            let fraction = (self.radial_braking * dt).min(1.0);
            velocity + inward * (outward_speed * fraction)
        } else {
            velocity
        }
    }
}

/// Constants shared by every force evaluation in a scene
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Gravitational acceleration vector
    pub gravity: Vec3,
    /// Air density used by the drag term
    pub air_density: f64,
    /// Vortex field (only applied when [`ForceSet::VORTEX`] is active)
    pub vortex: VortexField,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -STANDARD_GRAVITY, 0.0),
            air_density: AIR_DENSITY,
            vortex: VortexField::default(),
        }
    }
}

impl Environment {
    /// Create an environment with downward gravity of the given magnitude
    pub fn with_gravity_magnitude(magnitude: f64) -> Self {
        Self {
            gravity: Vec3::new(0.0, -magnitude.abs(), 0.0),
            ..Self::default()
        }
    }

    /// Replace the vortex field
    pub fn with_vortex(mut self, vortex: VortexField) -> Self {
        self.vortex = vortex;
        self
    }

    /// Sum of the active force contributions on a body
    pub fn total_force(
        &self,
        forces: ForceSet,
        mass: f64,
        drag_coefficient: f64,
        frontal_area: f64,
        position: Vec3,
        velocity: Vec3,
    ) -> Vec3 {
        let mut total = Vec3::ZERO;
        if forces.contains(ForceSet::GRAVITY) {
            total += gravity(mass, self.gravity);
        }
        if forces.contains(ForceSet::DRAG) {
            total += drag(velocity, drag_coefficient, frontal_area, self.air_density);
        }
        if forces.contains(ForceSet::VORTEX) {
            total += self.vortex.force(position);
        }
        total
    }
}
