//! Software render backend.
//!
//! Rasterizes scene sprites into an RGBA8 buffer on the CPU and presents it through
//! `pixels`, which scales the buffer to the window surface.

use std::sync::Arc;

use anyhow::{Context, Result};
use pixels::wgpu::SurfaceError;
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use pulse_engine::coords::Vec2;
use pulse_engine::paint::Color;
use pulse_engine::render::RenderBackend;
use pulse_engine::scene::{NodeKind, Scene, Shape, WorldTransform};

/// `RenderBackend<Scene>` drawing into a fixed-size framebuffer.
///
/// Until a window is attached, draws only rasterize into an offscreen buffer.
pub struct Raster {
    width: u32,
    height: u32,
    clear: Color,
    offscreen: Vec<u8>,
    surface: Option<(Arc<Window>, Pixels<'static>)>,
}

impl Raster {
    pub fn new(width: u32, height: u32, clear: Color) -> Self {
        Self {
            width,
            height,
            clear,
            offscreen: vec![0; (width * height * 4) as usize],
            surface: None,
        }
    }

    /// Creates the presentation surface for `window`.
    pub fn attach(&mut self, window: &Arc<Window>) -> Result<()> {
        let size = window.inner_size();
        let texture = SurfaceTexture::new(size.width.max(1), size.height.max(1), Arc::clone(window));
        let pixels = Pixels::new(self.width, self.height, texture)
            .context("failed to create pixel surface")?;

        log::info!(
            "raster surface {}x{} presenting to {}x{}",
            self.width,
            self.height,
            size.width,
            size.height
        );
        self.surface = Some((Arc::clone(window), pixels));
        Ok(())
    }

    /// Follows window resizes. Zero-sized (minimized) windows are ignored.
    pub fn resize(&mut self, size: PhysicalSize<u32>) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            return Ok(());
        }
        if let Some((_, pixels)) = self.surface.as_mut() {
            pixels
                .resize_surface(size.width, size.height)
                .context("failed to resize pixel surface")?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn offscreen(&self) -> &[u8] {
        &self.offscreen
    }
}

impl RenderBackend<Scene> for Raster {
    fn draw(&mut self, scene: &Scene) -> Result<()> {
        match self.surface.as_mut() {
            Some((window, pixels)) => {
                paint(pixels.frame_mut(), self.width, self.height, self.clear, scene);
                window.pre_present_notify();

                let Err(err) = pixels.render() else {
                    return Ok(());
                };
                match present_action(&err) {
                    PresentAction::SkipFrame => log::warn!("frame not presented: {err}"),
                    PresentAction::Reconfigure => {
                        log::warn!("{err}; reconfiguring pixel surface");
                        let size = window.inner_size();
                        if size.width > 0 && size.height > 0 {
                            pixels
                                .resize_surface(size.width, size.height)
                                .context("failed to reconfigure pixel surface")?;
                        }
                    }
                    PresentAction::Fatal => return Err(err).context("failed to present frame"),
                }
            }
            None => paint(&mut self.offscreen, self.width, self.height, self.clear, scene),
        }
        Ok(())
    }
}

/// What to do after `Pixels::render` fails.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PresentAction {
    /// Surface went stale; reconfigure and draw again next refresh.
    Reconfigure,
    SkipFrame,
    Fatal,
}

fn present_action(err: &pixels::Error) -> PresentAction {
    match err {
        pixels::Error::Surface(SurfaceError::Lost | SurfaceError::Outdated) => PresentAction::Reconfigure,
        pixels::Error::Surface(SurfaceError::Timeout) => PresentAction::SkipFrame,
        _ => PresentAction::Fatal,
    }
}

/// Clears `frame` and draws every sprite of `scene` in paint order.
pub fn paint(frame: &mut [u8], width: u32, height: u32, clear: Color, scene: &Scene) {
    let clear = clear.to_rgba8();
    for px in frame.chunks_exact_mut(4) {
        px.copy_from_slice(&clear);
    }

    for (id, world) in scene.world_transforms() {
        let Some(node) = scene.node(id) else {
            continue;
        };
        if let NodeKind::Sprite(sprite) = &node.kind {
            let color = sprite.color.with_alpha_scaled(world.opacity);
            if color.a > 0.0 {
                fill(frame, width, height, sprite.shape, &world, color);
            }
        }
    }
}

fn fill(frame: &mut [u8], width: u32, height: u32, shape: Shape, world: &WorldTransform, color: Color) {
    let half = world.size * 0.5;
    if half.x <= 0.0 || half.y <= 0.0 || !world.position.is_finite() {
        return;
    }

    // Bounding circle of the rotated box.
    let reach = (half.x * half.x + half.y * half.y).sqrt();
    let x0 = (world.position.x - reach).floor().max(0.0) as u32;
    let y0 = (world.position.y - reach).floor().max(0.0) as u32;
    let x1 = ((world.position.x + reach).ceil().max(0.0) as u32).min(width);
    let y1 = ((world.position.y + reach).ceil().max(0.0) as u32).min(height);

    let src = color.to_rgba8();
    let alpha = color.a;

    for y in y0..y1 {
        for x in x0..x1 {
            let center = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let local = (center - world.position).rotated(-world.rotation);

            let inside = match shape {
                Shape::Rect => local.x.abs() <= half.x && local.y.abs() <= half.y,
                Shape::Circle => {
                    let nx = local.x / half.x;
                    let ny = local.y / half.y;
                    nx * nx + ny * ny <= 1.0
                }
            };
            if !inside {
                continue;
            }

            let i = ((y * width + x) * 4) as usize;
            blend(&mut frame[i..i + 4], src, alpha);
        }
    }
}

/// Source-over onto an opaque destination.
fn blend(dst: &mut [u8], src: [u8; 4], alpha: f32) {
    if alpha >= 1.0 {
        dst.copy_from_slice(&src);
        return;
    }
    for c in 0..3 {
        let s = src[c] as f32;
        let d = dst[c] as f32;
        dst[c] = (s * alpha + d * (1.0 - alpha) + 0.5) as u8;
    }
    dst[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_engine::scene::{Sprite, Transform};

    const W: u32 = 20;
    const H: u32 = 20;

    fn pixel(frame: &[u8], x: u32, y: u32) -> [u8; 4] {
        let i = ((y * W + x) * 4) as usize;
        [frame[i], frame[i + 1], frame[i + 2], frame[i + 3]]
    }

    fn black() -> Color {
        Color::new(0.0, 0.0, 0.0, 1.0)
    }

    fn red() -> Color {
        Color::new(1.0, 0.0, 0.0, 1.0)
    }

    // ── presentation errors ───────────────────────────────────────────────

    #[test]
    fn transient_surface_errors_do_not_end_the_demo() {
        let lost = pixels::Error::Surface(SurfaceError::Lost);
        let outdated = pixels::Error::Surface(SurfaceError::Outdated);
        let timeout = pixels::Error::Surface(SurfaceError::Timeout);
        let other = pixels::Error::Surface(SurfaceError::Other);

        assert_eq!(present_action(&lost), PresentAction::Reconfigure);
        assert_eq!(present_action(&outdated), PresentAction::Reconfigure);
        assert_eq!(present_action(&timeout), PresentAction::SkipFrame);
        assert_eq!(present_action(&other), PresentAction::SkipFrame);
    }

    #[test]
    fn out_of_memory_and_setup_errors_are_fatal() {
        let oom = pixels::Error::Surface(SurfaceError::OutOfMemory);
        assert_eq!(present_action(&oom), PresentAction::Fatal);
        assert_eq!(present_action(&pixels::Error::AdapterNotFound), PresentAction::Fatal);
    }

    // ── painting ──────────────────────────────────────────────────────────

    #[test]
    fn empty_scene_is_cleared() {
        let mut raster = Raster::new(W, H, Color::from_srgb_u8(1, 2, 3, 255));
        raster.draw(&Scene::new()).unwrap();
        assert!(raster.offscreen().chunks_exact(4).all(|px| px == [1, 2, 3, 255]));
    }

    #[test]
    fn rect_covers_its_box_only() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene
            .add_sprite(
                root,
                Sprite::new(Shape::Rect, red()),
                Transform::at(Vec2::new(10.0, 10.0)).with_size(Vec2::new(6.0, 4.0)),
            )
            .unwrap();

        let mut frame = vec![0u8; (W * H * 4) as usize];
        paint(&mut frame, W, H, black(), &scene);

        assert_eq!(pixel(&frame, 10, 10), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 7, 8), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 10, 13), [0, 0, 0, 255]);
        assert_eq!(pixel(&frame, 14, 10), [0, 0, 0, 255]);
    }

    #[test]
    fn circle_leaves_corners_empty() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene
            .add_sprite(
                root,
                Sprite::new(Shape::Circle, red()),
                Transform::at(Vec2::new(10.0, 10.0)).with_size(Vec2::new(10.0, 10.0)),
            )
            .unwrap();

        let mut frame = vec![0u8; (W * H * 4) as usize];
        paint(&mut frame, W, H, black(), &scene);

        assert_eq!(pixel(&frame, 10, 10), [255, 0, 0, 255]);
        assert_eq!(pixel(&frame, 5, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn opacity_blends_with_background() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene
            .add_sprite(
                root,
                Sprite::new(Shape::Rect, Color::new(1.0, 1.0, 1.0, 1.0)),
                Transform::at(Vec2::new(10.0, 10.0))
                    .with_size(Vec2::new(4.0, 4.0))
                    .with_opacity(0.5),
            )
            .unwrap();

        let mut frame = vec![0u8; (W * H * 4) as usize];
        paint(&mut frame, W, H, black(), &scene);

        let px = pixel(&frame, 10, 10);
        assert!((127..=129).contains(&px[0]), "{px:?}");
        assert_eq!(px[3], 255);
    }

    #[test]
    fn offscreen_sprites_are_clipped() {
        let mut scene = Scene::new();
        let root = scene.root();
        scene
            .add_sprite(
                root,
                Sprite::new(Shape::Rect, red()),
                Transform::at(Vec2::new(-50.0, 200.0)).with_size(Vec2::new(10.0, 10.0)),
            )
            .unwrap();

        let mut frame = vec![0u8; (W * H * 4) as usize];
        paint(&mut frame, W, H, black(), &scene);
        assert!(frame.chunks_exact(4).all(|px| px == [0, 0, 0, 255]));
    }
}
