//! Physics error types
//!
//! Only caller-supplied input is validated here. Numerical degeneracies that
//! show up during a tick (zero velocity, coincident points, parallel edges)
//! are absorbed by the routines themselves and never become errors.

use std::fmt;

/// Error type for constructing physics entities from caller input
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// A cloth needs at least one particle
    EmptyCloth,
    /// A bounding box cannot be reduced from an empty point set
    EmptyPointSet,
    /// An edge references a particle index past the end of the position list
    EdgeOutOfBounds {
        edge: usize,
        index: usize,
        particle_count: usize,
    },
    /// An edge connects a particle to itself
    DegenerateEdge { edge: usize, index: usize },
    /// Mass must be finite and strictly positive
    InvalidMass(f64),
}

impl fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhysicsError::EmptyCloth => write!(f, "Cloth has no particles"),
            PhysicsError::EmptyPointSet => write!(f, "Cannot build a bounding box from zero points"),
            PhysicsError::EdgeOutOfBounds {
                edge,
                index,
                particle_count,
            } => write!(
                f,
                "Edge {} references particle {} but the cloth has {} particles",
                edge, index, particle_count
            ),
            PhysicsError::DegenerateEdge { edge, index } => {
                write!(f, "Edge {} connects particle {} to itself", edge, index)
            }
            PhysicsError::InvalidMass(mass) => write!(f, "Invalid mass: {}", mass),
        }
    }
}

impl std::error::Error for PhysicsError {}

/// Check that a mass is usable as a divisor
pub(crate) fn validate_mass(mass: f64) -> Result<f64, PhysicsError> {
    if mass.is_finite() && mass > 0.0 {
        Ok(mass)
    } else {
        Err(PhysicsError::InvalidMass(mass))
    }
}
