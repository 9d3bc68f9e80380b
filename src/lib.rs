//! Tumble - rigid-body and cloth simulation scenes
//!
//! Configuration loading and the reference scenarios built on `tumble_physics`.

pub mod config;
pub mod scenario;
