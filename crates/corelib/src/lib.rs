//! Core types: math re-exports, Transform, Camera, scene World,
//! the flight animator and the frame driver that applies it.

pub use glam::{DVec3, EulerRot, Mat4, Quat, Vec2, Vec3, vec3};

pub mod animator;
pub mod camera;
pub mod driver;
pub mod ecs;
pub mod transform;
