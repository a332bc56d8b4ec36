use super::config::CursorConfig;
use super::constants::{CURSOR_MAX_DT_SEC, CURSOR_START, CURSOR_SUBSTEP_SEC};
use glam::Vec2;

/// Spring-follower for the decorative cursor sprite.
#[derive(Clone, Debug)]
pub struct SpringCursor {
    stiffness: f32,
    damping: f32,
    hotspot: f32,
    spin_deg_per_sec: f32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub target: Vec2,
    /// Slow continuous spin in degrees, kept in [0, 360).
    pub rotation_deg: f32,
}

impl SpringCursor {
    pub fn new(config: &CursorConfig) -> Self {
        let start = Vec2::splat(CURSOR_START);
        Self {
            stiffness: config.stiffness,
            damping: config.damping,
            hotspot: config.hotspot,
            spin_deg_per_sec: 360.0 / config.spin_period_sec,
            position: start,
            velocity: Vec2::ZERO,
            target: start,
            rotation_deg: 0.0,
        }
    }

    /// Pointer moved to client coordinates `(x, y)`.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.target = Vec2::new(x, y) - Vec2::splat(self.hotspot);
    }

    /// Integrate the spring (unit mass) over `dt_sec` using fixed sub-steps.
    pub fn step(&mut self, dt_sec: f32) {
        let dt = dt_sec.clamp(0.0, CURSOR_MAX_DT_SEC);
        let mut remaining = dt;
        while remaining > 0.0 {
            let h = remaining.min(CURSOR_SUBSTEP_SEC);
            let accel = (self.target - self.position) * self.stiffness - self.velocity * self.damping;
            self.velocity += accel * h;
            self.position += self.velocity * h;
            remaining -= h;
        }
        self.rotation_deg = (self.rotation_deg + self.spin_deg_per_sec * dt).rem_euclid(360.0);
    }

    /// CSS transform placing the sprite at the current position.
    pub fn transform(&self) -> String {
        format!(
            "translate({:.2}px, {:.2}px) translate(-50%, -50%) rotate({:.2}deg)",
            self.position.x, self.position.y, self.rotation_deg
        )
    }
}
