//! Core engine-facing contracts.
//!
//! Stable interface between the runtime (platform loop) and applications. The runtime
//! turns display refreshes into [`App::on_frame`] calls; the app decides whether it
//! wants another one.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
