//! Pulse engine crate.
//!
//! Runs simulation logic at a fixed tick rate while rendering at whatever rate the
//! display delivers, blending scene transforms between logic ticks.

pub mod window;
pub mod time;
pub mod core;
pub mod sched;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
