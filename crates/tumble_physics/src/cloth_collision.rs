//! Cloth against a static box and the ground plane
//!
//! Two passes, both no-ops when nothing penetrates:
//!
//! - the volume pass pushes particles that ended up inside the box out
//!   through the nearest candidate face, then lifts anything under the
//!   floor, repeated a fixed number of times per tick;
//! - the edge pass finds cloth springs passing within `thickness` of one
//!   of the box's twelve edges and pushes both spring endpoints away.

use crate::cloth::Cloth;
use crate::material::ContactMaterial;
use crate::shapes::AABB;
use serde::{Deserialize, Serialize};
use tumble_math::{Axis, Vec3};

/// A face of an axis-aligned box
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoxFace {
    /// +Y
    Top,
    /// -Y
    Bottom,
    /// -X
    Left,
    /// +X
    Right,
    /// +Z
    Front,
    /// -Z
    Back,
}

impl BoxFace {
    /// All six faces
    pub const ALL: [BoxFace; 6] = [
        BoxFace::Top,
        BoxFace::Bottom,
        BoxFace::Left,
        BoxFace::Right,
        BoxFace::Front,
        BoxFace::Back,
    ];

    /// Faces a particle may be pushed out through by the volume pass
    ///
    /// `Back` is not a candidate; a particle nearest the back face leaves
    /// through whichever of the other five is closest.
    pub const EXIT_CANDIDATES: [BoxFace; 5] = [
        BoxFace::Top,
        BoxFace::Bottom,
        BoxFace::Left,
        BoxFace::Right,
        BoxFace::Front,
    ];

    /// Axis the face is perpendicular to
    pub fn axis(self) -> Axis {
        match self {
            BoxFace::Top | BoxFace::Bottom => Axis::Y,
            BoxFace::Left | BoxFace::Right => Axis::X,
            BoxFace::Front | BoxFace::Back => Axis::Z,
        }
    }

    /// True for faces on the max side of their axis
    pub fn is_max_side(self) -> bool {
        matches!(self, BoxFace::Top | BoxFace::Right | BoxFace::Front)
    }

    /// Unit normal pointing out of the box
    pub fn outward_normal(self) -> Vec3 {
        if self.is_max_side() {
            self.axis().unit()
        } else {
            -self.axis().unit()
        }
    }

    /// Coordinate of the face plane along its axis
    pub fn plane(self, aabb: &AABB) -> f64 {
        if self.is_max_side() {
            aabb.max.component(self.axis())
        } else {
            aabb.min.component(self.axis())
        }
    }

    /// Distance from `point` to the face plane, positive toward the box interior
    pub fn depth(self, aabb: &AABB, point: Vec3) -> f64 {
        (self.plane(aabb) - point.component(self.axis())) * self.outward_normal().component(self.axis())
    }

    /// `point` moved onto the outside of the face, `skin` past the plane
    pub fn exit_point(self, aabb: &AABB, point: Vec3, skin: f64) -> Vec3 {
        let offset = if self.is_max_side() { skin } else { -skin };
        point.with_component(self.axis(), self.plane(aabb) + offset)
    }
}

/// Tunables for cloth collision
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClothCollisionParams {
    /// Restitution and friction for particle contacts
    pub material: ContactMaterial,
    /// Only particles closer than this to an exit face are pushed out
    pub penetration_threshold: f64,
    /// Distance outside a face a pushed particle is placed at
    pub skin: f64,
    /// Minimum clearance between cloth springs and box edges
    pub thickness: f64,
    /// Segment pairs with a smaller determinant are treated as parallel
    pub parallel_threshold: f64,
    /// Volume-pass repetitions per tick
    pub iterations: u32,
    /// Height of the ground plane
    pub floor_height: f64,
    /// Particles are kept at least this far above the floor
    pub floor_epsilon: f64,
}

impl Default for ClothCollisionParams {
    fn default() -> Self {
        Self {
            material: ContactMaterial::CLOTH,
            penetration_threshold: 0.1,
            skin: 1e-3,
            thickness: 0.02,
            parallel_threshold: 1e-9,
            iterations: 3,
            floor_height: 0.0,
            floor_epsilon: 1e-3,
        }
    }
}

/// Counts of corrections made by [`resolve_cloth_collisions`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClothCollisionReport {
    /// Particle snaps out of the box or off the floor (all iterations)
    pub particle_corrections: usize,
    /// Spring/box-edge contacts resolved
    pub edge_contacts: usize,
}

/// Nearest exit face for a point inside the box and its depth
///
/// `None` when the point is outside. `Bottom` is only a candidate when its
/// plane lies above `floor`; a box resting on the ground has no bottom exit.
pub fn nearest_exit_face(aabb: &AABB, point: Vec3, floor: f64) -> Option<(BoxFace, f64)> {
    if !aabb.contains(point) {
        return None;
    }
    BoxFace::EXIT_CANDIDATES
        .iter()
        .filter(|&&face| face != BoxFace::Bottom || face.plane(aabb) > floor)
        .map(|&face| (face, face.depth(aabb, point)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// Reflect the normal velocity component if it points into the surface
/// and scale the tangential part by the friction factor
fn respond(velocity: Vec3, normal: Vec3, material: &ContactMaterial) -> Vec3 {
    let mut normal_speed = velocity.dot(normal);
    let tangential = velocity - normal * normal_speed;
    if normal_speed < 0.0 {
        normal_speed = -normal_speed * material.restitution;
    }
    normal * normal_speed + tangential * material.friction
}

/// Push particles out of the obstacle box and above the floor
///
/// Returns the number of corrections made across all iterations.
pub fn resolve_volume(cloth: &mut Cloth, obstacle: &AABB, params: &ClothCollisionParams) -> usize {
    let floor = params.floor_height + params.floor_epsilon;
    let mut corrections = 0;

    for _ in 0..params.iterations.max(1) {
        for (position, velocity) in cloth.positions.iter_mut().zip(cloth.velocities.iter_mut()) {
            if let Some((face, depth)) = nearest_exit_face(obstacle, *position, floor) {
                if depth < params.penetration_threshold {
                    *position = face.exit_point(obstacle, *position, params.skin);
                    *velocity = respond(*velocity, face.outward_normal(), &params.material);
                    corrections += 1;
                }
            }

            if floor_contact(position, velocity, floor, &params.material) {
                corrections += 1;
            }
        }
    }

    if corrections > 0 {
        log::trace!("volume pass made {} particle corrections", corrections);
    }
    corrections
}

/// Lift a particle below `floor` onto it, returning true if it moved
fn floor_contact(position: &mut Vec3, velocity: &mut Vec3, floor: f64, material: &ContactMaterial) -> bool {
    if position.y < floor {
        position.y = floor;
        *velocity = respond(*velocity, Vec3::Y, material);
        true
    } else {
        false
    }
}

/// Ground-plane check alone, for scenes without an obstacle box
pub fn resolve_floor(cloth: &mut Cloth, params: &ClothCollisionParams) -> usize {
    let floor = params.floor_height + params.floor_epsilon;
    let mut corrections = 0;
    for (position, velocity) in cloth.positions.iter_mut().zip(cloth.velocities.iter_mut()) {
        if floor_contact(position, velocity, floor, &params.material) {
            corrections += 1;
        }
    }
    corrections
}

/// Closest points between two segments
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentClosestPoints {
    /// Closest point on the first segment
    pub on_first: Vec3,
    /// Closest point on the second segment
    pub on_second: Vec3,
    /// Parameter of `on_first` along the first segment, in [0, 1]
    pub s: f64,
    /// Parameter of `on_second` along the second segment, in [0, 1]
    pub t: f64,
}

impl SegmentClosestPoints {
    /// Distance between the two closest points
    pub fn distance(&self) -> f64 {
        self.on_first.distance(self.on_second)
    }
}

/// Closest points between segments `p1-q1` and `p2-q2`
///
/// Returns `None` without dividing when `|d1|²|d2|² - (d1·d2)²` is below
/// `parallel_threshold`, which covers parallel and zero-length segments.
pub fn closest_points_between_segments(
    p1: Vec3,
    q1: Vec3,
    p2: Vec3,
    q2: Vec3,
    parallel_threshold: f64,
) -> Option<SegmentClosestPoints> {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let b = d1.dot(d2);
    let c = d1.dot(r);
    let f = d2.dot(r);

    let denom = a * e - b * b;
    // a * e >= denom, so a and e are both nonzero past this check
    if !(denom >= parallel_threshold.max(f64::MIN_POSITIVE)) {
        return None;
    }

    let mut s = ((b * f - c * e) / denom).clamp(0.0, 1.0);
    let mut t = (b * s + f) / e;
    if t < 0.0 {
        t = 0.0;
        s = (-c / a).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((b - c) / a).clamp(0.0, 1.0);
    }

    Some(SegmentClosestPoints {
        on_first: p1 + d1 * s,
        on_second: p2 + d2 * t,
        s,
        t,
    })
}

/// Separate cloth springs from the obstacle's edges
///
/// Returns the number of spring/box-edge contacts resolved.
pub fn resolve_edges(cloth: &mut Cloth, obstacle: &AABB, params: &ClothCollisionParams) -> usize {
    let box_edges = obstacle.edges();
    let restitution = params.material.restitution;
    let mut contacts = 0;

    for &[a, b] in &cloth.edges {
        for &(box_start, box_end) in &box_edges {
            let Some(closest) = closest_points_between_segments(
                cloth.positions[a],
                cloth.positions[b],
                box_start,
                box_end,
                params.parallel_threshold,
            ) else {
                continue;
            };

            let separation = closest.on_first - closest.on_second;
            let distance = separation.length();
            if distance >= params.thickness {
                continue;
            }
            // Spring touching the box edge exactly: no direction to push along
            let Some(normal) = separation.try_normalized(f64::EPSILON) else {
                continue;
            };

            let correction = normal * ((params.thickness - distance) * 0.5);
            cloth.positions[a] += correction;
            cloth.positions[b] += correction;

            let contact_velocity = cloth.velocities[a].lerp(cloth.velocities[b], closest.s);
            let closing_speed = contact_velocity.dot(normal);
            if closing_speed < 0.0 {
                let impulse = normal * (-(1.0 + restitution) * closing_speed);
                cloth.velocities[a] += impulse;
                cloth.velocities[b] += impulse;
            }
            contacts += 1;
        }
    }

    if contacts > 0 {
        log::trace!("edge pass resolved {} contacts", contacts);
    }
    contacts
}

/// Run the volume pass followed by the edge pass
pub fn resolve_cloth_collisions(
    cloth: &mut Cloth,
    obstacle: &AABB,
    params: &ClothCollisionParams,
) -> ClothCollisionReport {
    ClothCollisionReport {
        particle_corrections: resolve_volume(cloth, obstacle, params),
        edge_contacts: resolve_edges(cloth, obstacle, params),
    }
}
