//! First-person camera for scene viewing.
//!
//! Provides a left-handed fly camera plus a controller that applies
//! mouse-look and held-key movement.

/// Mouse-look and movement controller.
pub mod controller;
/// Core camera struct and matrices.
pub mod core;

pub use controller::{CameraController, Movement};
pub use self::core::Camera;
