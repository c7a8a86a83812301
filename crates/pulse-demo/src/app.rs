use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::Window;

use pulse_engine::coords::Vec2;
use pulse_engine::core::{App, AppControl, FrameCtx};
use pulse_engine::paint::Color;
use pulse_engine::scene::{NodeId, Scene, Shape, Sprite, Transform};
use pulse_engine::sched::{FrameScheduler, InterpolationConfig};

use crate::ball::{Arena, BallState};
use crate::raster::Raster;
use crate::sync::SharedValue;

/// Framebuffer size, also the arena size.
pub const ARENA_W: u32 = 640;
pub const ARENA_H: u32 = 360;

const BALL_RADIUS: f32 = 18.0;
const DEFAULT_LOGIC_HZ: f64 = 30.0;
const CAPPED_RENDER_HZ: f64 = 30.0;
/// Step length used for physics when logic runs uncapped.
const UNCAPPED_STEP_SECS: f32 = 1.0 / 60.0;
const TITLE_EVERY_FRAMES: u64 = 15;

/// Bouncing-ball demo driven by a [`FrameScheduler`].
pub struct DemoApp {
    scheduler: FrameScheduler<Scene, Raster>,
    /// What a second client would hold; writes here win over local physics.
    peer: SharedValue<BallState>,
    /// Physics step length, kept in sync with the logic rate.
    step_secs: Rc<Cell<f32>>,
    logic_hz: Option<f64>,
    render_cap: bool,
}

impl DemoApp {
    pub fn new() -> Result<Self> {
        let arena = Arena {
            size: Vec2::new(ARENA_W as f32, ARENA_H as f32),
            radius: BALL_RADIUS,
        };
        let shared = SharedValue::new(BallState {
            position: Vec2::new(120.0, 90.0),
            velocity: Vec2::new(260.0, 190.0),
            angle: 0.0,
            spin: 2.5,
        });

        let (scene, ball) = build_scene(&arena, shared.get());
        let root = scene.root();

        let step_secs = Rc::new(Cell::new((1.0 / DEFAULT_LOGIC_HZ) as f32));
        let local = shared.replica();
        let dt = Rc::clone(&step_secs);

        let scheduler = FrameScheduler::builder()
            .backend(Raster::new(ARENA_W, ARENA_H, Color::from_srgb_u8(18, 20, 28, 255)))
            .scene(scene)
            .root(root)
            .update(move |scene: &mut Scene| {
                let next = arena.step(local.get(), dt.get());
                local.set(next);
                if let Some(t) = scene.transform_mut(ball) {
                    t.position = next.position;
                    t.rotation = next.angle;
                }
            })
            .logic_rate(DEFAULT_LOGIC_HZ)
            .attributes(InterpolationConfig::default())
            .build()?;

        Ok(Self {
            scheduler,
            peer: shared.replica(),
            step_secs,
            logic_hz: Some(DEFAULT_LOGIC_HZ),
            render_cap: false,
        })
    }

    fn control(&self) -> AppControl {
        if self.scheduler.is_running() {
            AppControl::Continue
        } else {
            AppControl::Wait
        }
    }

    fn set_logic_rate(&mut self, hz: Option<f64>) {
        match self.scheduler.set_logic_rate(hz) {
            Ok(()) => {
                self.logic_hz = hz;
                let step = hz.map(|h| (1.0 / h) as f32).unwrap_or(UNCAPPED_STEP_SECS);
                self.step_secs.set(step);
            }
            Err(e) => log::warn!("{e}"),
        }
    }

    fn on_key(&mut self, code: KeyCode) -> AppControl {
        match code {
            KeyCode::Escape => return AppControl::Exit,
            KeyCode::Space => {
                if self.scheduler.is_paused() {
                    self.scheduler.resume();
                } else {
                    self.scheduler.pause();
                }
            }
            KeyCode::KeyS => {
                if self.scheduler.is_running() {
                    self.scheduler.stop();
                } else {
                    self.scheduler.start();
                }
            }
            KeyCode::KeyI => {
                let on = !self.scheduler.interpolation();
                self.scheduler.set_interpolation(on);
            }
            KeyCode::Digit1 => self.set_logic_rate(Some(10.0)),
            KeyCode::Digit2 => self.set_logic_rate(Some(30.0)),
            KeyCode::Digit3 => self.set_logic_rate(Some(60.0)),
            KeyCode::KeyU => self.set_logic_rate(None),
            KeyCode::KeyR => {
                let cap = if self.render_cap { None } else { Some(CAPPED_RENDER_HZ) };
                match self.scheduler.set_render_rate(cap) {
                    Ok(()) => self.render_cap = cap.is_some(),
                    Err(e) => log::warn!("{e}"),
                }
            }
            KeyCode::KeyN => {
                // Simulated remote edit: the peer kicks the ball upward.
                self.peer.modify(|s| s.velocity = Vec2::new(s.velocity.x, -s.velocity.y.abs() - 120.0));
                log::info!("peer nudged the ball (version {})", self.peer.version());
            }
            _ => {}
        }
        self.control()
    }

    fn title(&self, fps: f32) -> String {
        let logic = match self.logic_hz {
            Some(hz) => format!("logic {hz}/s"),
            None => "logic uncapped".to_string(),
        };
        let render = if self.render_cap {
            format!("render cap {CAPPED_RENDER_HZ}/s")
        } else {
            "render uncapped".to_string()
        };
        let lerp = if self.scheduler.interpolation() { "lerp on" } else { "lerp off" };
        let paused = if self.scheduler.is_paused() { " [paused]" } else { "" };

        format!(
            "pulse · {logic} · {render} · {lerp} · fraction {:.2} · {fps:.0} Hz{paused}",
            self.scheduler.fraction()
        )
    }
}

impl App for DemoApp {
    fn on_start(&mut self, window: &Arc<Window>) -> Result<()> {
        self.scheduler.backend_mut().attach(window)?;
        self.scheduler.start();
        log::info!(
            "keys: space pause · s stop/start · i interpolation · 1/2/3 logic 10/30/60 · u uncapped · r render cap · n nudge · esc quit"
        );
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed && !event.repeat =>
            {
                if let PhysicalKey::Code(code) = event.physical_key {
                    return self.on_key(code);
                }
            }
            WindowEvent::Resized(size) => {
                if let Err(e) = self.scheduler.backend_mut().resize(*size) {
                    log::error!("{e:#}");
                    return AppControl::Exit;
                }
            }
            _ => {}
        }
        self.control()
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_>) -> AppControl {
        if let Err(e) = self.scheduler.on_refresh(ctx.time.now) {
            log::error!("frame failed: {e:#}");
            return AppControl::Exit;
        }

        if ctx.time.frame_index % TITLE_EVERY_FRAMES == 0 {
            ctx.runtime.set_title(self.title(ctx.fps));
        }
        self.control()
    }
}

/// Arena background plus a ball group (disc and spin marker). Returns the ball group.
fn build_scene(arena: &Arena, initial: BallState) -> (Scene, NodeId) {
    let mut scene = Scene::new();
    let root = scene.root();

    let _ = scene.add_sprite(
        root,
        Sprite::new(Shape::Rect, Color::from_srgb_u8(30, 34, 48, 255)),
        Transform::at(arena.size * 0.5).with_size(arena.size - Vec2::splat(8.0)),
    );

    let ball = scene
        .add_container(root, Transform::at(initial.position).with_rotation(initial.angle))
        .unwrap_or(root);
    let diameter = Vec2::splat(arena.radius * 2.0);
    let _ = scene.add_sprite(
        ball,
        Sprite::new(Shape::Circle, Color::from_srgb_u8(255, 170, 60, 255)),
        Transform::default().with_size(diameter),
    );
    let _ = scene.add_sprite(
        ball,
        Sprite::new(Shape::Rect, Color::from_srgb_u8(40, 24, 8, 255)),
        Transform::at(Vec2::new(arena.radius * 0.55, 0.0)).with_size(Vec2::new(10.0, 4.0)),
    );

    (scene, ball)
}
