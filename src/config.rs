//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`TUMBLE_SECTION__KEY`)

use crate::scenario::ScenarioKind;
use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use tumble_math::Vec3;
use tumble_physics::{
    ClothCollisionParams, ContactMaterial, Environment, ForceSet, GroundContact, PairResponse,
    PhysicsConfig, SpringParams, VortexField, AABB,
};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Scenario selection and time stepping
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Force field constants
    #[serde(default)]
    pub forces: ForcesConfig,
    /// Rigid-body ground contact
    #[serde(default)]
    pub ground: GroundConfig,
    /// Rigid-body placement and pair response
    #[serde(default)]
    pub bodies: BodiesConfig,
    /// Cloth material and placement
    #[serde(default)]
    pub cloth: ClothConfig,
    /// Static box the cloth falls onto
    #[serde(default)]
    pub obstacle: ObstacleConfig,
    /// Cloth collision tunables
    #[serde(default)]
    pub cloth_collision: ClothCollisionConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`TUMBLE_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // TUMBLE_SIMULATION__DT=0.05 -> simulation.dt = 0.05
        figment = figment.merge(Env::prefixed("TUMBLE_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }

    /// Assemble the physics world configuration from every section
    pub fn to_physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            environment: self.forces.to_environment(),
            ground: self.ground.to_ground_contact(),
            pairs: self.bodies.to_pair_response(),
            springs: self.cloth.to_spring_params(),
            cloth_collision: self.cloth_collision.to_params(self.ground.height),
            substeps: self.simulation.substeps,
        }
    }
}

/// Scenario selection and time stepping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Which scene to run
    pub scenario: ScenarioKind,
    /// Tick length in seconds
    pub dt: f64,
    /// Number of ticks to run
    pub frames: u32,
    /// Cloth substeps per tick
    pub substeps: u32,
    /// Body count for the multi-body scene
    pub body_count: usize,
    /// Requested cloth face count, rounded to a square grid
    pub cloth_faces: usize,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            scenario: ScenarioKind::FreeFall,
            dt: 0.1,
            frames: 100,
            substeps: 20,
            body_count: 10,
            cloth_faces: 100,
            log_level: "info".to_string(),
        }
    }
}

/// Force field constants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ForcesConfig {
    /// Gravity magnitude, applied downward
    pub gravity: f64,
    /// Air density (kg/m³)
    pub air_density: f64,
    /// Drag coefficient given to scenario bodies
    pub drag_coefficient: f64,
    /// Frontal area given to scenario bodies (m²)
    pub frontal_area: f64,
    /// Apply quadratic drag to rigid bodies
    pub drag: bool,
    /// Tornado parameters
    pub vortex: VortexConfig,
}

impl Default for ForcesConfig {
    fn default() -> Self {
        Self {
            gravity: tumble_physics::STANDARD_GRAVITY,
            air_density: tumble_physics::AIR_DENSITY,
            drag_coefficient: 0.47,
            frontal_area: 0.1,
            drag: true,
            vortex: VortexConfig::default(),
        }
    }
}

impl ForcesConfig {
    pub fn to_environment(&self) -> Environment {
        let mut environment = Environment::with_gravity_magnitude(self.gravity).with_vortex(self.vortex.to_field());
        environment.air_density = self.air_density;
        environment
    }

    /// Force set for a body, with or without the vortex
    pub fn force_set(&self, vortex: bool) -> ForceSet {
        let mut forces = ForceSet::GRAVITY;
        forces.set(ForceSet::DRAG, self.drag);
        forces.set(ForceSet::VORTEX, vortex);
        forces
    }
}

/// Tornado field parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VortexConfig {
    /// Axis position [x, y, z]; only x and z matter
    pub center: [f64; 3],
    pub max_radius: f64,
    pub inward_strength: f64,
    pub spiral_strength: f64,
    pub lift_strength: f64,
    /// Restoring gain beyond `max_radius`
    pub pullback_gain: f64,
    /// Outward radial velocity damping rate (1/s)
    pub radial_braking: f64,
}

impl Default for VortexConfig {
    fn default() -> Self {
        let field = VortexField::default();
        Self {
            center: field.center.to_array(),
            max_radius: field.max_radius,
            inward_strength: field.inward_strength,
            spiral_strength: field.spiral_strength,
            lift_strength: field.lift_strength,
            pullback_gain: field.pullback_gain,
            radial_braking: field.radial_braking,
        }
    }
}

impl VortexConfig {
    pub fn to_field(&self) -> VortexField {
        VortexField {
            max_radius: self.max_radius,
            pullback_gain: self.pullback_gain,
            radial_braking: self.radial_braking,
            ..VortexField::new(Vec3::from(self.center))
        }
        .with_strengths(self.inward_strength, self.spiral_strength, self.lift_strength)
    }
}

/// Rigid-body ground contact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Ground plane height
    pub height: f64,
    /// Bounce restitution
    pub restitution: f64,
    /// Vertical speeds below this settle to zero
    pub rest_speed: f64,
}

impl Default for GroundConfig {
    fn default() -> Self {
        let ground = GroundContact::default();
        Self {
            height: ground.height,
            restitution: ground.restitution,
            rest_speed: ground.rest_speed,
        }
    }
}

impl GroundConfig {
    pub fn to_ground_contact(&self) -> GroundContact {
        GroundContact {
            height: self.height,
            restitution: self.restitution,
            rest_speed: self.rest_speed,
        }
    }
}

/// Rigid-body placement and pair response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BodiesConfig {
    /// Half size of each body's cube
    pub half_size: f64,
    /// Lower end of the multi-body mass range
    pub min_mass: f64,
    /// Upper end of the multi-body mass range
    pub max_mass: f64,
    /// Distance each body of an overlapping pair is pushed
    pub push_distance: f64,
    /// Center distance below which a pair counts as coincident
    pub epsilon: f64,
}

impl Default for BodiesConfig {
    fn default() -> Self {
        let response = PairResponse::default();
        Self {
            half_size: 0.5,
            min_mass: 20.0,
            max_mass: 30.0,
            push_distance: response.push_distance,
            epsilon: response.epsilon,
        }
    }
}

impl BodiesConfig {
    pub fn to_pair_response(&self) -> PairResponse {
        PairResponse {
            push_distance: self.push_distance,
            epsilon: self.epsilon,
            ..PairResponse::default()
        }
    }
}

/// Cloth material and placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothConfig {
    /// Mass of each particle
    pub mass: f64,
    /// Spring stiffness ks
    pub stiffness: f64,
    /// Spring damping kd
    pub damping: f64,
    /// Side length of the square sheet
    pub size: f64,
    /// Initial height of the sheet
    pub height: f64,
}

impl Default for ClothConfig {
    fn default() -> Self {
        let springs = SpringParams::default();
        Self {
            mass: 0.05,
            stiffness: springs.stiffness,
            damping: springs.damping,
            size: 2.0,
            height: 1.5,
        }
    }
}

impl ClothConfig {
    pub fn to_spring_params(&self) -> SpringParams {
        SpringParams::new(self.stiffness, self.damping)
    }
}

/// Static box the cloth falls onto
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Minimum corner [x, y, z]
    pub min: [f64; 3],
    /// Maximum corner [x, y, z]
    pub max: [f64; 3],
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            min: [-0.5, 0.0, -0.5],
            max: [0.5, 1.0, 0.5],
        }
    }
}

impl ObstacleConfig {
    pub fn to_aabb(&self) -> AABB {
        AABB::new(Vec3::from(self.min), Vec3::from(self.max))
    }
}

/// Cloth collision tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClothCollisionConfig {
    pub restitution: f64,
    /// Tangential velocity retained per contact
    pub friction: f64,
    pub penetration_threshold: f64,
    pub skin: f64,
    pub thickness: f64,
    pub parallel_threshold: f64,
    /// Volume-pass repetitions per tick
    pub iterations: u32,
    pub floor_epsilon: f64,
}

impl Default for ClothCollisionConfig {
    fn default() -> Self {
        let params = ClothCollisionParams::default();
        Self {
            restitution: params.material.restitution,
            friction: params.material.friction,
            penetration_threshold: params.penetration_threshold,
            skin: params.skin,
            thickness: params.thickness,
            parallel_threshold: params.parallel_threshold,
            iterations: params.iterations,
            floor_epsilon: params.floor_epsilon,
        }
    }
}

impl ClothCollisionConfig {
    /// Collision params with the floor placed at `floor_height`
    pub fn to_params(&self, floor_height: f64) -> ClothCollisionParams {
        ClothCollisionParams {
            material: ContactMaterial::new(self.restitution, self.friction),
            penetration_threshold: self.penetration_threshold,
            skin: self.skin,
            thickness: self.thickness,
            parallel_threshold: self.parallel_threshold,
            iterations: self.iterations,
            floor_height,
            floor_epsilon: self.floor_epsilon,
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
