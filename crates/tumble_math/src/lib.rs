//! 3D Mathematics Library
//!
//! Vector types shared by the Tumble physics core and its scene drivers.
//!
//! ## Core Types
//!
//! - [`Vec3`] - double-precision 3D vector
//! - [`Axis`] - one of the three coordinate axes

mod axis;
mod vec3;

pub use axis::Axis;
pub use vec3::Vec3;
