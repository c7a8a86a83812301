use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::render::RenderBackend;
use crate::scene::{NodeId, SceneGraph};
use crate::time::tick_duration;

use super::config::InterpolationConfig;
use super::error::{ConfigError, RateAxis};
use super::shadow::ShadowTable;

/// Logic step callback. Receives the scene because the scheduler owns it.
pub type UpdateFn<G> = Box<dyn FnMut(&mut G)>;

/// Elapsed-time ceiling between two drains.
///
/// Larger gaps (debugger stops, minimized windows, backgrounded tabs) are replaced by
/// a single tick instead of being replayed as a burst of catch-up steps.
pub const MAX_FRAME_GAP: Duration = Duration::from_millis(1000);

/// Largest `f32` strictly below 1.0.
const FRACTION_BELOW_ONE: f32 = 1.0 - f32::EPSILON / 2.0;

/// What one display refresh did.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Stopped or paused: nothing ran.
    Idle,
    /// Render cap not reached yet: neither logic nor rendering ran.
    Skipped,
    /// `steps` logic ticks ran (possibly zero), then one render at `fraction`.
    Rendered { steps: u32, fraction: f32 },
}

/// Running totals, for diagnostics.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SchedulerStats {
    pub logic_steps: u64,
    pub renders: u64,
    pub skipped: u64,
    pub clamped_gaps: u64,
}

/// Fixed-tick logic driver with interpolated rendering.
///
/// Lifetimes of interpolated state:
/// - `previous` snapshots are taken right before each logic tick
/// - `current` snapshots are taken right before each render and written back after it
///
/// so the update callback never observes a blended transform.
pub struct FrameScheduler<G, B>
where
    G: SceneGraph,
    B: RenderBackend<G>,
{
    backend: B,
    scene: G,
    root: NodeId,
    update: UpdateFn<G>,

    interpolate: bool,
    attributes: InterpolationConfig,

    /// `None`: uncapped, one update per refresh.
    logic_tick: Option<Duration>,
    /// `None`: render whenever logic runs.
    render_tick: Option<Duration>,

    last_update: Option<Instant>,
    lag: Duration,
    next_render: Option<Instant>,

    running: bool,
    paused: bool,
    fraction: f32,

    shadows: ShadowTable,
    stats: SchedulerStats,
}

/// Flat, named construction options for [`FrameScheduler`].
///
/// `backend`, `scene`, `root` and `update` are required.
pub struct SchedulerBuilder<G, B> {
    backend: Option<B>,
    scene: Option<G>,
    root: Option<NodeId>,
    update: Option<UpdateFn<G>>,
    interpolate: bool,
    attributes: InterpolationConfig,
    logic_rate: Option<f64>,
    render_rate: Option<f64>,
}

impl<G, B> Default for SchedulerBuilder<G, B> {
    fn default() -> Self {
        Self {
            backend: None,
            scene: None,
            root: None,
            update: None,
            interpolate: true,
            attributes: InterpolationConfig::default(),
            logic_rate: None,
            render_rate: None,
        }
    }
}

impl<G, B> SchedulerBuilder<G, B>
where
    G: SceneGraph,
    B: RenderBackend<G>,
{
    pub fn backend(mut self, backend: B) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn scene(mut self, scene: G) -> Self {
        self.scene = Some(scene);
        self
    }

    /// Node the tree passes start from. Usually the scene's root container.
    pub fn root(mut self, root: NodeId) -> Self {
        self.root = Some(root);
        self
    }

    pub fn update<F>(mut self, update: F) -> Self
    where
        F: FnMut(&mut G) + 'static,
    {
        self.update = Some(Box::new(update));
        self
    }

    /// Enables render interpolation. Default `true`.
    pub fn interpolate(mut self, enabled: bool) -> Self {
        self.interpolate = enabled;
        self
    }

    pub fn attributes(mut self, attributes: InterpolationConfig) -> Self {
        self.attributes = attributes;
        self
    }

    /// Logic steps per second. Unset: one update per display refresh.
    pub fn logic_rate(mut self, steps_per_sec: f64) -> Self {
        self.logic_rate = Some(steps_per_sec);
        self
    }

    /// Render frames per second cap. Unset: render whenever logic runs.
    pub fn render_rate(mut self, frames_per_sec: f64) -> Self {
        self.render_rate = Some(frames_per_sec);
        self
    }

    /// Validates every option and builds a stopped scheduler.
    pub fn build(self) -> Result<FrameScheduler<G, B>, ConfigError> {
        let backend = self.backend.ok_or(ConfigError::Missing("backend"))?;
        let scene = self.scene.ok_or(ConfigError::Missing("scene"))?;
        let root = self.root.ok_or(ConfigError::Missing("root"))?;
        let update = self.update.ok_or(ConfigError::Missing("update"))?;

        if !scene.contains(root) {
            return Err(ConfigError::UnknownRoot(root));
        }

        let logic_tick = checked_tick(RateAxis::Logic, self.logic_rate)?;
        let render_tick = checked_tick(RateAxis::Render, self.render_rate)?;

        log::debug!(
            "frame scheduler built: logic={:?} render={:?} interpolate={} attributes={:?}",
            self.logic_rate,
            self.render_rate,
            self.interpolate,
            self.attributes,
        );

        Ok(FrameScheduler {
            backend,
            scene,
            root,
            update,
            interpolate: self.interpolate,
            attributes: self.attributes,
            logic_tick,
            render_tick,
            last_update: None,
            lag: Duration::ZERO,
            next_render: None,
            running: false,
            paused: false,
            fraction: 0.0,
            shadows: ShadowTable::default(),
            stats: SchedulerStats::default(),
        })
    }
}

fn checked_tick(axis: RateAxis, rate: Option<f64>) -> Result<Option<Duration>, ConfigError> {
    match rate {
        None => Ok(None),
        Some(value) => tick_duration(value)
            .map(Some)
            .ok_or(ConfigError::InvalidRate { axis, value }),
    }
}

impl<G, B> FrameScheduler<G, B>
where
    G: SceneGraph,
    B: RenderBackend<G>,
{
    pub fn builder() -> SchedulerBuilder<G, B> {
        SchedulerBuilder::default()
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    /// Starts accepting refresh notifications. The clock baseline is the next refresh.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.reset_clock();
        log::debug!("frame scheduler started");
    }

    /// Stops accepting refresh notifications. The host should stop requesting them.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::debug!("frame scheduler stopped");
    }

    /// Suspends logic and rendering. Refresh notifications keep arriving and are ignored.
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::debug!("frame scheduler paused");
        }
    }

    /// Resumes after [`pause`](Self::pause).
    ///
    /// The clock baseline is reset, so time spent paused is never replayed.
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.last_update = None;
            self.next_render = None;
            log::debug!("frame scheduler resumed");
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    fn reset_clock(&mut self) {
        self.last_update = None;
        self.next_render = None;
        self.lag = Duration::ZERO;
    }

    // ── rates ─────────────────────────────────────────────────────────────

    /// Sets the logic rate in steps per second. `None` runs one update per refresh.
    ///
    /// Invalid rates leave the scheduler unchanged.
    pub fn set_logic_rate(&mut self, steps_per_sec: Option<f64>) -> Result<(), ConfigError> {
        let tick = checked_tick(RateAxis::Logic, steps_per_sec)?;

        if self.logic_tick.is_none() && tick.is_some() {
            // No snapshots were taken while uncapped; blending from them would jump.
            self.shadows.clear();
        }
        if tick.is_none() {
            self.lag = Duration::ZERO;
        }
        self.logic_tick = tick;

        log::info!("logic rate set to {}", describe_rate(steps_per_sec));
        Ok(())
    }

    /// Sets the render cap in frames per second. `None` renders whenever logic runs.
    ///
    /// Invalid rates leave the scheduler unchanged.
    pub fn set_render_rate(&mut self, frames_per_sec: Option<f64>) -> Result<(), ConfigError> {
        self.render_tick = checked_tick(RateAxis::Render, frames_per_sec)?;
        self.next_render = None;

        log::info!("render rate set to {}", describe_rate(frames_per_sec));
        Ok(())
    }

    #[inline]
    pub fn logic_tick(&self) -> Option<Duration> {
        self.logic_tick
    }

    #[inline]
    pub fn render_tick(&self) -> Option<Duration> {
        self.render_tick
    }

    // ── interpolation ─────────────────────────────────────────────────────

    pub fn set_interpolation(&mut self, enabled: bool) {
        if self.interpolate != enabled {
            self.interpolate = enabled;
            self.shadows.clear();
            log::debug!("interpolation {}", if enabled { "enabled" } else { "disabled" });
        }
    }

    #[inline]
    pub fn interpolation(&self) -> bool {
        self.interpolate
    }

    pub fn set_attributes(&mut self, attributes: InterpolationConfig) {
        if self.attributes != attributes {
            self.attributes = attributes;
            self.shadows.clear();
        }
    }

    #[inline]
    pub fn attributes(&self) -> InterpolationConfig {
        self.attributes
    }

    /// Blend factor used by the latest render: `lag / tick` in fixed-tick mode, `1.0` uncapped.
    #[inline]
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Wall time not yet consumed by a whole logic tick.
    #[inline]
    pub fn lag(&self) -> Duration {
        self.lag
    }

    #[inline]
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    // ── owned parts ───────────────────────────────────────────────────────

    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn scene(&self) -> &G {
        &self.scene
    }

    /// Mutable scene access between refreshes. Changes are ground truth, never blended.
    #[inline]
    pub fn scene_mut(&mut self) -> &mut G {
        &mut self.scene
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    // ── per refresh ───────────────────────────────────────────────────────

    /// Handles one display refresh stamped `now`.
    ///
    /// Backend draw errors are returned after live transforms have been restored.
    pub fn on_refresh(&mut self, now: Instant) -> Result<FrameOutcome> {
        if !self.running || self.paused {
            return Ok(FrameOutcome::Idle);
        }

        let Some(tick) = self.logic_tick else {
            self.last_update = Some(now);
            (self.update)(&mut self.scene);
            self.stats.logic_steps += 1;
            self.fraction = 1.0;
            self.draw_live()?;
            return Ok(FrameOutcome::Rendered { steps: 1, fraction: 1.0 });
        };

        if let Some(render_tick) = self.render_tick {
            if self.next_render.is_some_and(|next| now < next) {
                self.stats.skipped += 1;
                return Ok(FrameOutcome::Skipped);
            }
            self.next_render = Some(now + render_tick);
        }

        let steps = self.drain(now, tick);
        let fraction = self.fraction;
        self.render(fraction)?;

        log::trace!("refresh: steps={steps} fraction={fraction:.3} lag={:?}", self.lag);
        Ok(FrameOutcome::Rendered { steps, fraction })
    }

    /// Converts elapsed time into whole logic ticks and updates the fraction.
    fn drain(&mut self, now: Instant, tick: Duration) -> u32 {
        let mut elapsed = self
            .last_update
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_update = Some(now);

        if elapsed > MAX_FRAME_GAP.max(tick) {
            log::warn!("frame gap of {elapsed:?} clamped to one logic tick ({tick:?})");
            self.stats.clamped_gaps += 1;
            elapsed = tick;
        }

        self.lag += elapsed;

        let mut steps = 0u32;
        while self.lag >= tick {
            if self.interpolate {
                self.shadows.capture_previous(&mut self.scene, self.root, self.attributes);
            }
            (self.update)(&mut self.scene);
            self.lag -= tick;
            steps += 1;
        }
        self.stats.logic_steps += u64::from(steps);

        let fraction = (self.lag.as_secs_f64() / tick.as_secs_f64()) as f32;
        self.fraction = fraction.clamp(0.0, FRACTION_BELOW_ONE);

        steps
    }

    /// Draws once at `fraction`, interpolating and restoring around the draw call.
    fn render(&mut self, fraction: f32) -> Result<()> {
        if !self.interpolate {
            return self.draw_live();
        }

        self.stats.renders += 1;
        self.shadows.interpolate(&mut self.scene, self.root, self.attributes, fraction);
        let drawn = self.backend.draw(&self.scene);
        self.shadows.restore(&mut self.scene, self.root, self.attributes);
        self.shadows.prune();

        drawn.context("render backend failed to draw frame")
    }

    /// Draws live values as they are. No tree walks.
    fn draw_live(&mut self) -> Result<()> {
        self.stats.renders += 1;
        self.backend.draw(&self.scene).context("render backend failed to draw frame")
    }
}

fn describe_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{r}/s"),
        None => "uncapped".to_string(),
    }
}
