//! Paint model shared between the scene tree and render backends.
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
