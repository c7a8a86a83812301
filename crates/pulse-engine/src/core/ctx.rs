use std::sync::Arc;

use winit::window::{Window, WindowId};

use crate::time::FrameTime;
use crate::window::RuntimeCtx;

/// Window handle and metadata for the current callback.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Arc<Window>,
}

/// Per-refresh context passed to `core::App::on_frame`.
pub struct FrameCtx<'a> {
    pub window:  WindowCtx<'a>,
    pub time:    FrameTime,
    /// Smoothed display refresh rate in Hz.
    pub fps:     f32,
    pub runtime: &'a mut RuntimeCtx,
}
