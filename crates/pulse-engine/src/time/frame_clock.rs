use std::time::{Duration, Instant};

/// Timing snapshot for one display refresh.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Raw time since the previous refresh, in seconds. Zero on the first tick.
    pub dt: f32,

    /// Monotonic timestamp taken at the refresh.
    pub now: Instant,

    /// Monotonic refresh counter.
    pub frame_index: u64,
}

/// Stamps display refreshes.
///
/// Unlike a simulation clock this does not clamp `dt`: consumers such as the frame
/// scheduler apply their own gap policy to `now`. The clock also keeps a smoothed
/// refresh rate for diagnostics.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Option<Instant>,
    frame_index: u64,
    fps: f32,
    smoothing: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_smoothing(0.1)
    }

    /// `smoothing` is the weight of the newest sample in the fps moving average,
    /// clamped to `(0, 1]`.
    pub fn with_smoothing(smoothing: f32) -> Self {
        Self {
            last: None,
            frame_index: 0,
            fps: 0.0,
            smoothing: smoothing.clamp(f32::EPSILON, 1.0),
        }
    }

    /// Forgets the previous refresh so the next tick reports `dt == 0`.
    ///
    /// Useful after a window is recreated or the app resumes from suspension.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Advances the clock using the current time.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock using an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now);

        let secs = dt.as_secs_f32();
        if secs > 0.0 {
            let sample = 1.0 / secs;
            self.fps = if self.fps == 0.0 {
                sample
            } else {
                self.fps + (sample - self.fps) * self.smoothing
            };
        }

        let ft = FrameTime {
            dt: secs,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }

    /// Smoothed refresh rate in Hz. Zero until two ticks have been observed.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_has_zero_dt() {
        let mut clock = FrameClock::new();
        let ft = clock.tick_at(Instant::now());
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn dt_and_index_advance() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        let ft = clock.tick_at(t0 + Duration::from_millis(20));
        assert!((ft.dt - 0.020).abs() < 1e-6);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn fps_converges_on_steady_refresh() {
        let mut clock = FrameClock::with_smoothing(0.5);
        let t0 = Instant::now();
        for i in 0..40u32 {
            clock.tick_at(t0 + Duration::from_millis(10) * i);
        }
        assert!((clock.fps() - 100.0).abs() < 0.5);
    }

    #[test]
    fn reset_forgets_previous_tick() {
        let mut clock = FrameClock::new();
        let t0 = Instant::now();
        clock.tick_at(t0);
        clock.reset();
        let ft = clock.tick_at(t0 + Duration::from_secs(5));
        assert_eq!(ft.dt, 0.0);
    }
}
