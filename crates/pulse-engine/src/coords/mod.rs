//! Coordinate types shared by the scene tree, the scheduler and render backends.
//!
//! Canonical CPU space:
//! - Logical pixels
//! - Origin top-left
//! - +X right, +Y down
//! - Rotation in radians, clockwise on screen (because +Y points down)

mod vec2;

pub use vec2::Vec2;
