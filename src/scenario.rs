//! Reference scenes
//!
//! Each scenario turns an [`AppConfig`] into a populated [`PhysicsWorld`].
//! Initial placement never depends on a random source, so two runs with
//! the same configuration produce identical trajectories.

use crate::config::AppConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use tumble_math::Vec3;
use tumble_physics::{grid_size_for_faces, Cloth, PhysicsError, PhysicsWorld, RigidBody};

/// Which reference scene to build
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    /// One body dropped from (0, 5, 0)
    FreeFall,
    /// One body caught in the vortex
    Tornado,
    /// Several bodies falling and colliding
    MultiBody,
    /// A sheet of cloth falling onto a box
    Cloth,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 4] = [
        ScenarioKind::FreeFall,
        ScenarioKind::Tornado,
        ScenarioKind::MultiBody,
        ScenarioKind::Cloth,
    ];

    /// Name as written in configuration files
    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::FreeFall => "free_fall",
            ScenarioKind::Tornado => "tornado",
            ScenarioKind::MultiBody => "multi_body",
            ScenarioKind::Cloth => "cloth",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Build the world for `kind` from `config`
pub fn build_world(kind: ScenarioKind, config: &AppConfig) -> Result<PhysicsWorld, PhysicsError> {
    let mut world = PhysicsWorld::with_config(config.to_physics_config());

    match kind {
        ScenarioKind::FreeFall => {
            world.add_body(scenario_body(Vec3::new(0.0, 5.0, 0.0), 1.0, false, config))?;
        }
        ScenarioKind::Tornado => {
            let vortex = &config.forces.vortex;
            let start = Vec3::new(
                vortex.center[0] + 0.5 * vortex.max_radius,
                config.ground.height + config.bodies.half_size,
                vortex.center[2],
            );
            world.add_body(scenario_body(start, 1.0, true, config))?;
        }
        ScenarioKind::MultiBody => {
            for body in multi_body_placement(config.simulation.body_count, config) {
                world.add_body(body)?;
            }
        }
        ScenarioKind::Cloth => {
            let obstacle = config.obstacle.to_aabb();
            let n = grid_size_for_faces(config.simulation.cloth_faces);
            let center = obstacle.center();
            let half = 0.5 * config.cloth.size;
            let origin = Vec3::new(center.x - half, config.cloth.height, center.z - half);

            world.set_cloth(Cloth::grid(n, config.cloth.size, origin, config.cloth.mass)?);
            world.set_obstacle(Some(obstacle));
        }
    }

    log::debug!(
        "built scenario '{}' with {} bodies{}",
        kind,
        world.body_count(),
        if world.cloth().is_some() { " and a cloth" } else { "" }
    );
    Ok(world)
}

fn scenario_body(position: Vec3, mass: f64, vortex: bool, config: &AppConfig) -> RigidBody {
    RigidBody::new_cube(position, config.bodies.half_size)
        .with_mass(mass)
        .with_drag(config.forces.drag_coefficient, config.forces.frontal_area)
        .with_forces(config.forces.force_set(vortex))
}

// Fractional parts of sqrt(2), sqrt(3), sqrt(5), sqrt(7)
const SEQUENCE_STEPS: [f64; 4] = [
    0.414_213_562_373_095_1,
    0.732_050_807_568_877_2,
    0.236_067_977_499_789_7,
    0.645_751_311_064_590_6,
];

/// Low-discrepancy sample in [0, 1) for body `index` on sequence `dim`
fn sample(index: usize, dim: usize) -> f64 {
    (0.5 + SEQUENCE_STEPS[dim] * (index as f64 + 1.0)).fract()
}

/// Bodies spread over x, z in [-5, 5] and y in [2, 5], masses within the configured range
pub fn multi_body_placement(count: usize, config: &AppConfig) -> Vec<RigidBody> {
    let bodies = &config.bodies;
    (0..count)
        .map(|i| {
            let position = Vec3::new(
                -5.0 + 10.0 * sample(i, 0),
                2.0 + 3.0 * sample(i, 1),
                -5.0 + 10.0 * sample(i, 2),
            );
            let mass = bodies.min_mass + (bodies.max_mass - bodies.min_mass) * sample(i, 3);
            scenario_body(position, mass, false, config)
        })
        .collect()
}
