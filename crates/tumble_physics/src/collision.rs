//! Multi-body collision
//!
//! Pairwise world-box overlap tests among independently integrated bodies.
//! The response is deliberately approximate: overlapping bodies are nudged
//! apart by a fixed offset along the line between their centers and then
//! swap velocity vectors. This is not a momentum-conserving impulse solve
//! for unequal masses; callers rely on the exact swap behaviour.

use crate::body::RigidBody;
use serde::{Deserialize, Serialize};
use tumble_math::Vec3;

/// Parameters for the body-body response
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PairResponse {
    /// Distance each body is moved along the separation axis
    pub push_distance: f64,
    /// Center distances below this count as coincident
    pub epsilon: f64,
    /// Separation axis used when the centers coincide
    pub fallback_axis: Vec3,
}

impl Default for PairResponse {
    fn default() -> Self {
        Self {
            push_distance: 0.01,
            epsilon: 1e-9,
            fallback_axis: Vec3::X,
        }
    }
}

/// Check whether two bodies' world boxes overlap on all three axes
pub fn bodies_overlap(a: &RigidBody, b: &RigidBody) -> bool {
    a.world_bounds().intersects(&b.world_bounds())
}

/// Unit vector from `a`'s center toward `b`'s center
pub fn separation_axis(a: &RigidBody, b: &RigidBody, response: &PairResponse) -> Vec3 {
    (b.world_center() - a.world_center())
        .try_normalized(response.epsilon)
        .unwrap_or(response.fallback_axis)
}

/// Resolve a single pair
///
/// Returns true if the pair overlapped and was resolved.
pub fn resolve_pair(a: &mut RigidBody, b: &mut RigidBody, response: &PairResponse) -> bool {
    if !bodies_overlap(a, b) {
        return false;
    }

    let axis = separation_axis(a, b, response);
    let push = axis * response.push_distance;
    a.apply_correction(-push);
    b.apply_correction(push);

    std::mem::swap(&mut a.velocity, &mut b.velocity);
    true
}

/// Resolve every overlapping unordered pair once, in index order
///
/// Returns the number of pairs resolved. Later pairs see the corrections
/// made by earlier ones.
pub fn resolve_collisions(bodies: &mut [RigidBody], response: &PairResponse) -> usize {
    let mut resolved = 0;
    for i in 0..bodies.len() {
        let (head, tail) = bodies.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if resolve_pair(a, b, response) {
                resolved += 1;
            }
        }
    }
    if resolved > 0 {
        log::debug!("resolved {} body pair collisions", resolved);
    }
    resolved
}
