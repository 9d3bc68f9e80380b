//! Rigid-body and cloth simulation for Tumble
//!
//! This crate provides:
//! - Axis-aligned boxes and their splitting/corner queries
//! - Gravity, quadratic drag and a tornado-style vortex field
//! - A semi-implicit Euler integrator with ground contact
//! - Pairwise box collision between bodies
//! - A mass-spring cloth and its collision with a static box

pub mod body;
pub mod cloth;
pub mod cloth_collision;
pub mod collision;
pub mod error;
pub mod forces;
pub mod integrator;
pub mod material;
pub mod shapes;
pub mod world;

// Re-export commonly used types
pub use body::{BodyKey, RigidBody};
pub use cloth::{grid_size_for_faces, grid_triangles, Cloth, Edge, SpringParams};
pub use cloth_collision::{
    closest_points_between_segments, nearest_exit_face, resolve_cloth_collisions, resolve_edges, resolve_floor,
    resolve_volume, BoxFace, ClothCollisionParams, ClothCollisionReport, SegmentClosestPoints,
};
pub use collision::{bodies_overlap, resolve_collisions, resolve_pair, PairResponse};
pub use error::PhysicsError;
pub use forces::{drag, gravity, Environment, ForceSet, VortexField, AIR_DENSITY, STANDARD_GRAVITY};
pub use integrator::{integrate, resolve_ground_contact, step_body, GroundContact};
pub use material::ContactMaterial;
pub use shapes::AABB;
pub use world::{PhysicsConfig, PhysicsWorld, StepReport};
