//! Mass-spring cloth
//!
//! Particles connected by structural springs (one per grid edge, no shear
//! or bend springs). Each tick the caller zeroes the force buffer, adds
//! spring and gravity forces, then integrates with semi-implicit Euler,
//! optionally over several substeps.

use std::collections::HashSet;

use crate::error::{validate_mass, PhysicsError};
use crate::shapes::AABB;
use serde::{Deserialize, Serialize};
use tumble_math::Vec3;

/// A spring between two particle indices
pub type Edge = [usize; 2];

/// Hookean spring constants
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    /// Stiffness ks (N/m)
    pub stiffness: f64,
    /// Damping kd along the spring axis (N·s/m)
    pub damping: f64,
    /// Springs shorter than this exert no force
    pub min_length: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            damping: 1.5,
            min_length: 1e-9,
        }
    }
}

impl SpringParams {
    /// Create spring constants with the default length cutoff
    pub fn new(stiffness: f64, damping: f64) -> Self {
        Self {
            stiffness,
            damping,
            ..Self::default()
        }
    }
}

/// Particle-spring network
#[derive(Clone, Debug)]
pub struct Cloth {
    pub(crate) positions: Vec<Vec3>,
    pub(crate) velocities: Vec<Vec3>,
    forces: Vec<Vec3>,
    pub(crate) edges: Vec<Edge>,
    rest_lengths: Vec<f64>,
    mass: f64,
}

impl Cloth {
    /// Build a cloth from particle positions and an edge list
    ///
    /// Edges are deduplicated regardless of endpoint order; rest lengths
    /// come from the initial positions. Fails on an empty particle list,
    /// an out-of-range index, a self-loop or a non-positive mass.
    pub fn new<I>(positions: Vec<Vec3>, edges: I, mass: f64) -> Result<Self, PhysicsError>
    where
        I: IntoIterator<Item = Edge>,
    {
        if positions.is_empty() {
            return Err(PhysicsError::EmptyCloth);
        }
        let mass = validate_mass(mass)?;
        let particle_count = positions.len();

        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for (edge_index, [a, b]) in edges.into_iter().enumerate() {
            for index in [a, b] {
                if index >= particle_count {
                    return Err(PhysicsError::EdgeOutOfBounds {
                        edge: edge_index,
                        index,
                        particle_count,
                    });
                }
            }
            if a == b {
                return Err(PhysicsError::DegenerateEdge {
                    edge: edge_index,
                    index: a,
                });
            }
            if seen.insert((a.min(b), a.max(b))) {
                unique.push([a, b]);
            }
        }

        let rest_lengths = unique
            .iter()
            .map(|&[a, b]| positions[a].distance(positions[b]))
            .collect();

        log::debug!(
            "built cloth with {} particles and {} springs",
            particle_count,
            unique.len()
        );

        Ok(Self {
            velocities: vec![Vec3::ZERO; particle_count],
            forces: vec![Vec3::ZERO; particle_count],
            positions,
            edges: unique,
            rest_lengths,
            mass,
        })
    }

    /// A flat square grid of `n × n` quads in the horizontal plane
    ///
    /// Particle `(row, col)` has index `row * (n + 1) + col` and sits at
    /// `origin + (col, 0, row) * size / n`. Springs connect horizontal and
    /// vertical neighbours only.
    pub fn grid(n: usize, size: f64, origin: Vec3, mass: f64) -> Result<Self, PhysicsError> {
        let n = n.max(1);
        let side = n + 1;
        let spacing = size / n as f64;

        let mut positions = Vec::with_capacity(side * side);
        for row in 0..side {
            for col in 0..side {
                positions.push(origin + Vec3::new(col as f64 * spacing, 0.0, row as f64 * spacing));
            }
        }

        let mut edges = Vec::with_capacity(2 * n * side);
        for row in 0..side {
            for col in 0..side {
                let i = row * side + col;
                if col < n {
                    edges.push([i, i + 1]);
                }
                if row < n {
                    edges.push([i, i + side]);
                }
            }
        }

        Self::new(positions, edges, mass)
    }

    /// Particle positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Mutable particle positions (for pinning or scripted motion)
    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    /// Particle velocities
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Mutable particle velocities
    pub fn velocities_mut(&mut self) -> &mut [Vec3] {
        &mut self.velocities
    }

    /// Accumulated forces since the last [`Cloth::clear_forces`]
    pub fn forces(&self) -> &[Vec3] {
        &self.forces
    }

    /// Spring edges, each stored once
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Rest length of each edge, parallel to [`Cloth::edges`]
    pub fn rest_lengths(&self) -> &[f64] {
        &self.rest_lengths
    }

    /// Mass of every particle
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Number of particles
    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    /// Box enclosing all particles
    pub fn bounds(&self) -> AABB {
        // Construction guarantees at least one particle
        AABB::from_points(&self.positions).unwrap_or(AABB::new(Vec3::ZERO, Vec3::ZERO))
    }

    /// Zero the force accumulator
    pub fn clear_forces(&mut self) {
        self.forces.fill(Vec3::ZERO);
    }

    /// Accumulate Hookean spring and axial damping forces for every edge
    ///
    /// With `d` the unit vector from the second endpoint to the first, the
    /// first endpoint receives `(-ks * (len - rest) - kd * (v_rel · d)) * d`
    /// and the second the opposite. Springs shorter than `min_length` are
    /// skipped since their direction is undefined.
    pub fn compute_spring_forces(&mut self, params: &SpringParams) {
        for (&[a, b], &rest) in self.edges.iter().zip(&self.rest_lengths) {
            let delta = self.positions[a] - self.positions[b];
            let length = delta.length();
            if length < params.min_length {
                continue;
            }
            let direction = delta / length;

            let relative_velocity = self.velocities[a] - self.velocities[b];
            let spring = -params.stiffness * (length - rest);
            let damping = -params.damping * relative_velocity.dot(direction);
            let force = direction * (spring + damping);

            self.forces[a] += force;
            self.forces[b] -= force;
        }
    }

    /// Add gravity, `mass * g`, to every particle
    pub fn apply_external_forces(&mut self, gravity: Vec3) {
        let weight = gravity * self.mass;
        for force in &mut self.forces {
            *force += weight;
        }
    }

    /// Semi-implicit Euler: velocity from force, then position from velocity
    pub fn integrate(&mut self, dt: f64) {
        let inv_mass = 1.0 / self.mass;
        for ((position, velocity), force) in self
            .positions
            .iter_mut()
            .zip(self.velocities.iter_mut())
            .zip(&self.forces)
        {
            *velocity += *force * (inv_mass * dt);
            *position += *velocity * dt;
        }
    }

    /// Advance a frame of length `dt` split into `substeps` equal substeps
    ///
    /// Each substep clears forces, adds springs and gravity, and integrates.
    /// A substep count of zero is treated as one.
    pub fn step(&mut self, params: &SpringParams, gravity: Vec3, dt: f64, substeps: u32) {
        let substeps = substeps.max(1);
        let h = dt / substeps as f64;
        for _ in 0..substeps {
            self.clear_forces();
            self.compute_spring_forces(params);
            self.apply_external_forces(gravity);
            self.integrate(h);
        }
    }
}

/// Quads per side of a square grid with roughly `faces` quads
///
/// Rounds to the nearest perfect square, never below one quad.
pub fn grid_size_for_faces(faces: usize) -> usize {
    ((faces as f64).sqrt().round() as usize).max(1)
}

/// Two counter-clockwise (seen from +Y) triangles per quad of an `n × n` grid
pub fn grid_triangles(n: usize) -> Vec<[usize; 3]> {
    let n = n.max(1);
    let side = n + 1;
    let mut triangles = Vec::with_capacity(2 * n * n);
    for row in 0..n {
        for col in 0..n {
            let i = row * side + col;
            triangles.push([i, i + side, i + 1]);
            triangles.push([i + 1, i + side, i + side + 1]);
        }
    }
    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn single_spring() -> Cloth {
        Cloth::new(vec![Vec3::ZERO, Vec3::X], [[0, 1]], 1.0).unwrap()
    }

    #[test]
    fn test_grid_topology() {
        let cloth = Cloth::grid(3, 3.0, Vec3::ZERO, 0.1).unwrap();
        assert_eq!(cloth.particle_count(), 16);
        // 2 * n * (n + 1) structural springs
        assert_eq!(cloth.edges().len(), 24);
        assert_eq!(cloth.rest_lengths().len(), cloth.edges().len());
        for &rest in cloth.rest_lengths() {
            assert!((rest - 1.0).abs() < EPS);
        }
        for &[a, b] in cloth.edges() {
            assert_ne!(a, b);
            assert!(a < 16 && b < 16);
        }
    }

    #[test]
    fn test_grid_is_flat() {
        let origin = Vec3::new(-1.0, 4.0, -1.0);
        let cloth = Cloth::grid(4, 2.0, origin, 0.1).unwrap();
        assert!(cloth.positions().iter().all(|p| p.y == 4.0));
        let bounds = cloth.bounds();
        assert_eq!(bounds.min, origin);
        assert_eq!(bounds.max, Vec3::new(1.0, 4.0, 1.0));
    }

    #[test]
    fn test_new_deduplicates_edges() {
        let positions = vec![Vec3::ZERO, Vec3::X, Vec3::Z];
        let cloth = Cloth::new(positions, [[0, 1], [1, 0], [1, 2], [0, 1]], 1.0).unwrap();
        assert_eq!(cloth.edges(), &[[0, 1], [1, 2]]);
        assert_eq!(cloth.rest_lengths().len(), 2);
        assert!((cloth.rest_lengths()[1] - 2.0_f64.sqrt()).abs() < EPS);
    }

    #[test]
    fn test_new_rejects_bad_input() {
        assert_eq!(
            Cloth::new(Vec::new(), Vec::<[usize; 2]>::new(), 1.0).unwrap_err(),
            PhysicsError::EmptyCloth
        );
        assert_eq!(
            Cloth::new(vec![Vec3::ZERO, Vec3::X], [[0, 2]], 1.0).unwrap_err(),
            PhysicsError::EdgeOutOfBounds {
                edge: 0,
                index: 2,
                particle_count: 2
            }
        );
        assert_eq!(
            Cloth::new(vec![Vec3::ZERO, Vec3::X], [[0, 1], [1, 1]], 1.0).unwrap_err(),
            PhysicsError::DegenerateEdge { edge: 1, index: 1 }
        );
        assert_eq!(
            Cloth::new(vec![Vec3::ZERO], Vec::<[usize; 2]>::new(), 0.0).unwrap_err(),
            PhysicsError::InvalidMass(0.0)
        );
    }

    #[test]
    fn test_spring_force_zero_at_rest_length() {
        let mut cloth = single_spring();
        cloth.compute_spring_forces(&SpringParams::new(100.0, 1.5));
        assert_eq!(cloth.forces()[0], Vec3::ZERO);
        assert_eq!(cloth.forces()[1], Vec3::ZERO);
    }

    #[test]
    fn test_spring_damping_only_at_rest_length() {
        let mut cloth = single_spring();
        cloth.velocities_mut()[1] = Vec3::new(2.0, 0.0, 0.0);
        cloth.compute_spring_forces(&SpringParams::new(100.0, 1.5));
        // Separating at 2 m/s: damping pulls the ends together with kd * 2
        assert!((cloth.forces()[0].x - 3.0).abs() < EPS);
        assert!((cloth.forces()[1].x + 3.0).abs() < EPS);
    }

    #[test]
    fn test_stretched_spring_restoring_force() {
        let mut cloth = single_spring();
        let delta = 0.25;
        cloth.positions_mut()[1] = Vec3::new(1.0 + delta, 0.0, 0.0);
        cloth.compute_spring_forces(&SpringParams::new(100.0, 1.5));

        assert!((cloth.forces()[0].length() - 100.0 * delta).abs() < EPS);
        // Equal and opposite, pulling the ends together
        assert!((cloth.forces()[0] + cloth.forces()[1]).length() < EPS);
        assert!(cloth.forces()[0].x > 0.0);
    }

    #[test]
    fn test_compressed_spring_pushes_apart() {
        let mut cloth = single_spring();
        cloth.positions_mut()[1] = Vec3::new(0.5, 0.0, 0.0);
        cloth.compute_spring_forces(&SpringParams::new(100.0, 0.0));
        assert!((cloth.forces()[0].x + 50.0).abs() < EPS);
        assert!((cloth.forces()[1].x - 50.0).abs() < EPS);
    }

    #[test]
    fn test_zero_length_spring_is_skipped() {
        let mut cloth = single_spring();
        cloth.positions_mut()[1] = Vec3::ZERO;
        cloth.compute_spring_forces(&SpringParams::default());
        assert!(cloth.forces().iter().all(|f| *f == Vec3::ZERO));
    }

    #[test]
    fn test_stretched_edge_contracts_after_one_step() {
        let mut cloth = single_spring();
        // Twice the rest length, at rest
        cloth.positions_mut()[1] = Vec3::new(2.0, 0.0, 0.0);
        let before = cloth.positions()[0].distance(cloth.positions()[1]);

        cloth.clear_forces();
        cloth.compute_spring_forces(&SpringParams::new(100.0, 1.5));
        cloth.integrate(0.01);

        let after = cloth.positions()[0].distance(cloth.positions()[1]);
        assert!(after < before);
        assert!(cloth.positions()[0].x > 0.0);
        assert!(cloth.positions()[1].x < 2.0);
    }

    #[test]
    fn test_apply_external_forces() {
        let mut cloth = Cloth::grid(1, 1.0, Vec3::ZERO, 0.5).unwrap();
        cloth.apply_external_forces(Vec3::new(0.0, -10.0, 0.0));
        assert!(cloth.forces().iter().all(|f| *f == Vec3::new(0.0, -5.0, 0.0)));
        cloth.clear_forces();
        assert!(cloth.forces().iter().all(|f| *f == Vec3::ZERO));
    }

    #[test]
    fn test_unconstrained_grid_falls_uniformly() {
        let mut cloth = Cloth::grid(2, 2.0, Vec3::new(0.0, 10.0, 0.0), 0.1).unwrap();
        let gravity = Vec3::new(0.0, -9.81, 0.0);
        cloth.step(&SpringParams::default(), gravity, 0.1, 4);

        let first = cloth.positions()[0].y;
        assert!(first < 10.0);
        // No stretch, so every particle moves identically
        for p in cloth.positions() {
            assert!((p.y - first).abs() < EPS);
        }
    }

    #[test]
    fn test_substeps_zero_treated_as_one() {
        let gravity = Vec3::new(0.0, -9.81, 0.0);
        let mut a = single_spring();
        let mut b = single_spring();
        a.step(&SpringParams::default(), gravity, 0.01, 0);
        b.step(&SpringParams::default(), gravity, 0.01, 1);
        assert_eq!(a.positions(), b.positions());
    }

    #[test]
    fn test_grid_size_for_faces() {
        assert_eq!(grid_size_for_faces(0), 1);
        assert_eq!(grid_size_for_faces(1), 1);
        assert_eq!(grid_size_for_faces(100), 10);
        // sqrt(110) ~ 10.49
        assert_eq!(grid_size_for_faces(110), 10);
        // sqrt(111) ~ 10.54
        assert_eq!(grid_size_for_faces(111), 11);
    }

    #[test]
    fn test_grid_triangles() {
        let triangles = grid_triangles(2);
        assert_eq!(triangles.len(), 8);
        assert_eq!(triangles[0], [0, 3, 1]);
        assert!(triangles.iter().flatten().all(|&i| i < 9));
    }
}
