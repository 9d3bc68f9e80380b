//! Rigid-body integrator
//!
//! One tick of a single body: sum the active forces, advance with
//! semi-implicit Euler, then resolve contact with the ground plane once.

use crate::body::RigidBody;
use crate::forces::{Environment, ForceSet};
use serde::{Deserialize, Serialize};

/// Ground plane response for rigid bodies
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundContact {
    /// Height of the ground plane
    pub height: f64,
    /// Fraction of downward speed returned as upward speed on impact
    pub restitution: f64,
    /// Vertical speeds below this are clamped to zero after a bounce
    pub rest_speed: f64,
}

impl Default for GroundContact {
    fn default() -> Self {
        Self {
            height: 0.0,
            restitution: 0.8,
            rest_speed: 0.1,
        }
    }
}

/// Advance position and velocity by `dt` under the body's active forces
///
/// `velocity += a * dt` comes first, then `position += velocity * dt`.
/// With the vortex active, outward radial speed is braked between the two.
pub fn integrate(body: &mut RigidBody, env: &Environment, dt: f64) {
    let force = env.total_force(
        body.forces,
        body.mass,
        body.drag_coefficient,
        body.frontal_area,
        body.position,
        body.velocity,
    );
    let acceleration = force / body.mass;

    body.velocity += acceleration * dt;
    if body.forces.contains(ForceSet::VORTEX) {
        body.velocity = env.vortex.brake_radial(body.position, body.velocity, dt);
    }
    body.position += body.velocity * dt;
}

/// Push a body out of the ground plane
///
/// Returns true if the body's box was below the ground. A downward
/// velocity is reflected with restitution, and a vertical speed below
/// `rest_speed` is clamped to exactly zero.
pub fn resolve_ground_contact(body: &mut RigidBody, ground: &GroundContact) -> bool {
    let bottom = body.world_bounds().min.y;
    if bottom >= ground.height {
        return false;
    }

    let penetration = ground.height - bottom;
    body.position.y += penetration;

    if body.velocity.y < 0.0 {
        body.velocity.y = -body.velocity.y * ground.restitution;
    }
    if body.velocity.y.abs() < ground.rest_speed {
        body.velocity.y = 0.0;
    }

    log::trace!(
        "ground contact: penetration {:.6}, vy {:.6}",
        penetration,
        body.velocity.y
    );
    true
}

/// Integrate one tick and resolve ground contact
///
/// Returns true if the body touched the ground this tick.
pub fn step_body(body: &mut RigidBody, env: &Environment, ground: &GroundContact, dt: f64) -> bool {
    integrate(body, env, dt);
    resolve_ground_contact(body, ground)
}
