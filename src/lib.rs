// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Mouse-ray triangle picking over a small wgpu mesh viewer.
//!
//! A click at a pixel becomes a ray in view space, is carried into each
//! object's local space through the inverse view and inverse world
//! matrices, and is tested against every triangle with a Möller–Trumbore
//! intersector. The nearest hit is staged for a highlight overlay drawn
//! on top of the scene.
//!
//! # Key entry points
//!
//! - [`picking::Picker`] - screen point to nearest [`picking::PickHit`]
//! - [`picking::Ray`] - screen-to-ray conversion and space transforms
//! - [`picking::Intersector`] - ray/triangle and ray/mesh tests
//! - [`Engine`] - GPU context, scene, camera, input and pick state
//! - [`options::Options`] - runtime configuration loaded from TOML
//!
//! # Architecture
//!
//! Picking runs entirely on the CPU against the same [`scene::Mesh`] data
//! that is uploaded for drawing. The renderer draws lit objects, optional
//! planar shadows, then the picked triangle through a 3-vertex dynamic
//! buffer that is rewritten in place on every successful pick.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod picking;
pub mod renderer;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use camera::Camera;
pub use engine::Engine;
pub use error::TripickError;
pub use input::{Command, InputEvent, MouseButton};
pub use options::Options;
pub use picking::{PickHit, PickState, Picker, Ray};
pub use scene::{Mesh, Scene};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
