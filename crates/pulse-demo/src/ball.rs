//! Placeholder bounce physics.

use pulse_engine::coords::Vec2;

/// Shared ball state. This is what replicas exchange.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BallState {
    /// Center, in arena pixels.
    pub position: Vec2,
    /// Pixels per second.
    pub velocity: Vec2,
    /// Radians.
    pub angle: f32,
    /// Radians per second. Flips on every bounce.
    pub spin: f32,
}

/// Rectangular play field with its origin at the top-left corner.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Arena {
    pub size: Vec2,
    pub radius: f32,
}

impl Arena {
    /// Advances `state` by `dt` seconds, reflecting off the walls.
    pub fn step(&self, mut state: BallState, dt: f32) -> BallState {
        state.position = state.position + state.velocity * dt;
        state.angle += state.spin * dt;

        let r = self.radius;
        let mut bounced = false;

        if state.position.x - r < 0.0 {
            state.position.x = r;
            state.velocity.x = state.velocity.x.abs();
            bounced = true;
        } else if state.position.x + r > self.size.x {
            state.position.x = self.size.x - r;
            state.velocity.x = -state.velocity.x.abs();
            bounced = true;
        }

        if state.position.y - r < 0.0 {
            state.position.y = r;
            state.velocity.y = state.velocity.y.abs();
            bounced = true;
        } else if state.position.y + r > self.size.y {
            state.position.y = self.size.y - r;
            state.velocity.y = -state.velocity.y.abs();
            bounced = true;
        }

        if bounced {
            state.spin = -state.spin;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Arena {
        Arena { size: Vec2::new(100.0, 50.0), radius: 5.0 }
    }

    fn state(position: Vec2, velocity: Vec2) -> BallState {
        BallState { position, velocity, angle: 0.0, spin: 1.0 }
    }

    #[test]
    fn moves_freely_inside_arena() {
        let s = arena().step(state(Vec2::new(50.0, 25.0), Vec2::new(10.0, -10.0)), 0.5);
        assert_eq!(s.position, Vec2::new(55.0, 20.0));
        assert_eq!(s.angle, 0.5);
        assert_eq!(s.spin, 1.0);
    }

    #[test]
    fn bounces_off_right_wall() {
        let s = arena().step(state(Vec2::new(94.0, 25.0), Vec2::new(100.0, 0.0)), 0.1);
        assert_eq!(s.position.x, 95.0);
        assert!(s.velocity.x < 0.0);
        assert_eq!(s.spin, -1.0);
    }

    #[test]
    fn bounces_off_top_wall() {
        let s = arena().step(state(Vec2::new(50.0, 6.0), Vec2::new(0.0, -100.0)), 0.1);
        assert_eq!(s.position.y, 5.0);
        assert!(s.velocity.y > 0.0);
    }

    #[test]
    fn never_leaves_arena() {
        let a = arena();
        let mut s = state(Vec2::new(20.0, 20.0), Vec2::new(313.0, -271.0));
        for _ in 0..10_000 {
            s = a.step(s, 1.0 / 60.0);
            assert!(s.position.x >= a.radius && s.position.x <= a.size.x - a.radius);
            assert!(s.position.y >= a.radius && s.position.y <= a.size.y - a.radius);
        }
    }
}
