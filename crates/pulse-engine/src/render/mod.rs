//! Render backend seam.
//!
//! The engine does not rasterize anything itself. A backend receives the scene once
//! per render frame, already holding interpolated transforms, and draws it to its
//! target however it likes (software framebuffer, GPU, recording for tests).

use anyhow::Result;

use crate::scene::SceneGraph;

/// Draws a scene tree to a target.
///
/// Called at most once per display refresh by the frame scheduler. The scene must be
/// treated as read-only: live transforms are restored right after `draw` returns.
pub trait RenderBackend<G: SceneGraph + ?Sized> {
    fn draw(&mut self, scene: &G) -> Result<()>;
}

impl<G, F> RenderBackend<G> for F
where
    G: SceneGraph + ?Sized,
    F: FnMut(&G) -> Result<()>,
{
    #[inline]
    fn draw(&mut self, scene: &G) -> Result<()> {
        self(scene)
    }
}
