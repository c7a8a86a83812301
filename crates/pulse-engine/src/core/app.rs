use std::sync::Arc;

use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::Window;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    /// Request another display refresh.
    Continue,
    /// Stop requesting refreshes until a later callback returns `Continue`.
    Wait,
    Exit,
}

/// Application contract implemented by binaries.
pub trait App {
    /// Called once the window exists, before the first frame.
    fn on_start(&mut self, window: &Arc<Window>) -> Result<()> {
        let _ = window;
        Ok(())
    }

    /// Called for every window event, before the runtime handles it.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per display refresh while the app keeps returning `Continue`.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl;
}
