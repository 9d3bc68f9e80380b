//! Physics world and simulation

use crate::body::{BodyKey, RigidBody};
use crate::cloth::{Cloth, SpringParams};
use crate::cloth_collision::{resolve_cloth_collisions, resolve_floor, ClothCollisionParams, ClothCollisionReport};
use crate::collision::{resolve_collisions, PairResponse};
use crate::error::{validate_mass, PhysicsError};
use crate::forces::Environment;
use crate::integrator::{step_body, GroundContact};
use crate::shapes::AABB;
use slotmap::SlotMap;

/// Configuration for the physics simulation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsConfig {
    /// Gravity, air density and vortex field
    pub environment: Environment,
    /// Ground plane response for rigid bodies
    pub ground: GroundContact,
    /// Body-body response
    pub pairs: PairResponse,
    /// Cloth spring constants
    pub springs: SpringParams,
    /// Cloth against obstacle and floor
    pub cloth_collision: ClothCollisionParams,
    /// Cloth integration substeps per tick
    pub substeps: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            ground: GroundContact::default(),
            pairs: PairResponse::default(),
            springs: SpringParams::default(),
            cloth_collision: ClothCollisionParams::default(),
            substeps: 1,
        }
    }
}

impl PhysicsConfig {
    /// Create a config with the given environment and defaults elsewhere
    pub fn new(environment: Environment) -> Self {
        Self {
            environment,
            ..Self::default()
        }
    }
}

/// What happened during one [`PhysicsWorld::step`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Bodies that touched the ground
    pub ground_contacts: usize,
    /// Overlapping body pairs resolved
    pub body_pairs: usize,
    /// Cloth particle corrections (obstacle and floor)
    pub particle_corrections: usize,
    /// Cloth spring/box-edge contacts
    pub edge_contacts: usize,
}

/// The physics world containing rigid bodies and an optional cloth
pub struct PhysicsWorld {
    /// All rigid bodies in the world (using generational keys)
    bodies: SlotMap<BodyKey, RigidBody>,
    /// Cloth, if the scene has one
    cloth: Option<Cloth>,
    /// Static box the cloth collides with
    obstacle: Option<AABB>,
    /// Physics configuration
    pub config: PhysicsConfig,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        Self {
            bodies: SlotMap::with_key(),
            cloth: None,
            obstacle: None,
            config,
        }
    }

    /// Add a body to the world and return its key
    ///
    /// Fails if the body's mass is not finite and positive.
    pub fn add_body(&mut self, body: RigidBody) -> Result<BodyKey, PhysicsError> {
        validate_mass(body.mass)?;
        Ok(self.bodies.insert(body))
    }

    /// Remove a body from the world and return it
    pub fn remove_body(&mut self, key: BodyKey) -> Option<RigidBody> {
        self.bodies.remove(key)
    }

    /// Get an immutable reference to a body by key
    pub fn get_body(&self, key: BodyKey) -> Option<&RigidBody> {
        self.bodies.get(key)
    }

    /// Get a mutable reference to a body by key
    pub fn get_body_mut(&mut self, key: BodyKey) -> Option<&mut RigidBody> {
        self.bodies.get_mut(key)
    }

    /// Get the number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Iterate over all body keys
    pub fn body_keys(&self) -> impl Iterator<Item = BodyKey> + '_ {
        self.bodies.keys()
    }

    /// Iterate over all bodies
    pub fn bodies(&self) -> impl Iterator<Item = (BodyKey, &RigidBody)> + '_ {
        self.bodies.iter()
    }

    /// Place a cloth in the world, replacing any previous one
    pub fn set_cloth(&mut self, cloth: Cloth) -> Option<Cloth> {
        self.cloth.replace(cloth)
    }

    /// Get the cloth, if any
    pub fn cloth(&self) -> Option<&Cloth> {
        self.cloth.as_ref()
    }

    /// Get mutable access to the cloth (for pinning or scripted motion)
    pub fn cloth_mut(&mut self) -> Option<&mut Cloth> {
        self.cloth.as_mut()
    }

    /// Set or clear the static box the cloth collides with
    pub fn set_obstacle(&mut self, obstacle: Option<AABB>) {
        self.obstacle = obstacle;
    }

    /// Get the obstacle box, if any
    pub fn obstacle(&self) -> Option<&AABB> {
        self.obstacle.as_ref()
    }

    /// Step the physics simulation forward by dt seconds
    ///
    /// This performs:
    /// 1. Force integration and ground contact for every body
    /// 2. Body-body collision detection and resolution
    /// 3. For each cloth substep: spring and gravity forces, integration,
    ///    then collision against the obstacle (volume, then edges) and floor
    pub fn step(&mut self, dt: f64) -> StepReport {
        let mut report = StepReport::default();

        // Phase 1: Integrate bodies and resolve ground contact
        for (_key, body) in &mut self.bodies {
            if step_body(body, &self.config.environment, &self.config.ground, dt) {
                report.ground_contacts += 1;
            }
        }

        // Phase 2: Resolve body-body collisions
        report.body_pairs = self.resolve_body_collisions();

        // Phase 3: Advance the cloth, colliding after every substep
        if let Some(cloth) = self.cloth.as_mut() {
            let substeps = self.config.substeps.max(1);
            let h = dt / substeps as f64;

            for _ in 0..substeps {
                cloth.step(&self.config.springs, self.config.environment.gravity, h, 1);

                let cloth_report = match &self.obstacle {
                    Some(obstacle) => resolve_cloth_collisions(cloth, obstacle, &self.config.cloth_collision),
                    None => ClothCollisionReport {
                        particle_corrections: resolve_floor(cloth, &self.config.cloth_collision),
                        edge_contacts: 0,
                    },
                };
                report.particle_corrections += cloth_report.particle_corrections;
                report.edge_contacts += cloth_report.edge_contacts;
            }
        }

        report
    }

    /// Resolve every overlapping pair once, in key order
    fn resolve_body_collisions(&mut self) -> usize {
        let (keys, mut bodies): (Vec<BodyKey>, Vec<RigidBody>) =
            self.bodies.iter().map(|(key, body)| (key, *body)).unzip();

        let resolved = resolve_collisions(&mut bodies, &self.config.pairs);

        for (key, body) in keys.into_iter().zip(bodies) {
            self.bodies[key] = body;
        }
        resolved
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::ForceSet;
    use tumble_math::Vec3;

    fn falling_cube(x: f64, y: f64) -> RigidBody {
        RigidBody::new_cube(Vec3::new(x, y, 0.0), 0.5).with_forces(ForceSet::GRAVITY)
    }

    #[test]
    fn test_physics_config_default() {
        let config = PhysicsConfig::default();
        assert_eq!(config.environment.gravity, Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(config.substeps, 1);
    }

    #[test]
    fn test_world_add_body() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(falling_cube(0.0, 5.0)).unwrap();

        assert_eq!(world.body_count(), 1);
        assert_eq!(world.get_body(key).unwrap().position.y, 5.0);
    }

    #[test]
    fn test_world_rejects_bad_mass() {
        let mut world = PhysicsWorld::new();
        let result = world.add_body(falling_cube(0.0, 5.0).with_mass(0.0));

        assert_eq!(result, Err(PhysicsError::InvalidMass(0.0)));
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn test_world_get_body_mut() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(falling_cube(0.0, 5.0)).unwrap();

        world.get_body_mut(key).unwrap().velocity = Vec3::X;
        assert_eq!(world.get_body(key).unwrap().velocity, Vec3::X);
    }

    #[test]
    fn test_stale_key_returns_none() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(falling_cube(0.0, 5.0)).unwrap();

        assert!(world.remove_body(key).is_some());
        let _reused = world.add_body(falling_cube(1.0, 5.0)).unwrap();

        assert!(world.get_body(key).is_none());
        assert!(world.remove_body(key).is_none());
        assert_eq!(world.body_count(), 1);
    }

    #[test]
    fn test_step_integrates_bodies() {
        let mut world = PhysicsWorld::new();
        let key = world.add_body(falling_cube(0.0, 5.0)).unwrap();

        let report = world.step(0.1);

        let body = world.get_body(key).unwrap();
        assert!((body.velocity.y + 0.981).abs() < 1e-12);
        assert!((body.position.y - 4.9019).abs() < 1e-12);
        assert_eq!(report, StepReport::default());
    }

    #[test]
    fn test_step_reports_ground_contact() {
        let mut world = PhysicsWorld::new();
        world.add_body(falling_cube(0.0, 0.5)).unwrap();

        let report = world.step(0.1);
        assert_eq!(report.ground_contacts, 1);
    }

    #[test]
    fn test_step_resolves_overlapping_pair() {
        let mut world = PhysicsWorld::new();
        let a = world
            .add_body(falling_cube(0.0, 5.0).with_velocity(Vec3::X))
            .unwrap();
        let b = world
            .add_body(falling_cube(0.5, 5.0).with_velocity(-Vec3::X))
            .unwrap();

        let report = world.step(0.01);

        assert_eq!(report.body_pairs, 1);
        // Velocities swapped after both were integrated
        assert!(world.get_body(a).unwrap().velocity.x < 0.0);
        assert!(world.get_body(b).unwrap().velocity.x > 0.0);
    }

    #[test]
    fn test_cloth_without_obstacle_lands_on_floor() {
        let mut world = PhysicsWorld::new();
        let cloth = Cloth::grid(2, 1.0, Vec3::new(0.0, 0.05, 0.0), 0.1).unwrap();
        world.set_cloth(cloth);

        let mut corrected = 0;
        for _ in 0..50 {
            corrected += world.step(0.02).particle_corrections;
        }

        assert!(corrected > 0);
        let floor = world.config.cloth_collision.floor_height;
        for p in world.cloth().unwrap().positions() {
            assert!(p.y >= floor);
        }
    }

    #[test]
    fn test_fast_particle_caught_by_substep_collision() {
        let mut world = PhysicsWorld::new();
        world.config.substeps = 10;
        let obstacle = AABB::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5));
        world.set_obstacle(Some(obstacle));
        let mut cloth = Cloth::new(vec![Vec3::new(0.0, 1.05, 0.0)], Vec::<[usize; 2]>::new(), 0.05).unwrap();
        cloth.velocities_mut()[0] = Vec3::new(0.0, -3.0, 0.0);
        world.set_cloth(cloth);

        // One tick travels well past the penetration threshold; each
        // substep does not
        for _ in 0..10 {
            world.step(0.1);
        }

        let p = world.cloth().unwrap().positions()[0];
        let threshold = world.config.cloth_collision.penetration_threshold;
        assert!(p.y >= obstacle.max.y - threshold, "particle fell to {:?}", p);
    }

    #[test]
    fn test_cloth_drapes_over_obstacle() {
        let mut world = PhysicsWorld::new();
        world.config.substeps = 4;
        let obstacle = AABB::new(Vec3::new(-0.5, 0.0, -0.5), Vec3::new(0.5, 1.0, 0.5));
        world.set_obstacle(Some(obstacle));
        world.set_cloth(Cloth::grid(4, 2.0, Vec3::new(-1.0, 1.2, -1.0), 0.05).unwrap());

        let mut report = StepReport::default();
        for _ in 0..100 {
            let r = world.step(0.01);
            report.particle_corrections += r.particle_corrections;
            report.edge_contacts += r.edge_contacts;
        }

        assert!(report.particle_corrections > 0);
        // Particle above the box center rests on the top face
        let cloth = world.cloth().unwrap();
        let center = cloth.positions()[12];
        assert!(center.y > obstacle.max.y - 0.1);
    }
}
