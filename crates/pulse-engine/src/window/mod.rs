//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, and delivers one `App::on_frame` per
//! redraw. Redraws are requested continuously while the app returns `Continue`,
//! which makes the redraw cadence the display-refresh notification source.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
