//! Frame scheduling and render interpolation.
//!
//! [`FrameScheduler`] owns a fixed-rate logic clock. Each display refresh it converts
//! elapsed wall time into whole logic ticks, then renders once with scene transforms
//! blended between the last two ticks. Interpolated values only exist for the
//! duration of the backend's draw call; logic always sees ground truth.
//!
//! Intended usage:
//! - build with [`FrameScheduler::builder`]
//! - call [`FrameScheduler::start`], then [`FrameScheduler::on_refresh`] once per display refresh
//! - keep requesting refreshes while [`FrameScheduler::is_running`]

mod config;
mod error;
mod scheduler;
mod shadow;

pub use config::InterpolationConfig;
pub use error::{ConfigError, RateAxis};
pub use scheduler::{FrameOutcome, FrameScheduler, SchedulerBuilder, SchedulerStats, UpdateFn, MAX_FRAME_GAP};
