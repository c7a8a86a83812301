//! Time subsystem.
//!
//! Frame timing utilities that stay decoupled from the runtime:
//! - one `FrameClock` per window; `tick()` once per display refresh to obtain `FrameTime`
//! - `tick_duration` converts a rate in Hz into a fixed step

mod frame_clock;
mod rate;

pub use frame_clock::{FrameClock, FrameTime};
pub use rate::{tick_duration, MAX_RATE_HZ};
