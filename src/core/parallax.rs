use super::config::ParallaxConfig;

/// Scroll-linked vertical offset for a decorative layer.
///
/// Feed it the scroll position once per animation frame. Large jumps between
/// frames (fast flings, anchor jumps) freeze the offset for a short cooldown
/// so the layer does not visibly snap.
#[derive(Clone, Debug)]
pub struct ParallaxTracker {
    speed: f32,
    max_offset: f32,
    fast_scroll_px: f32,
    cooldown_ms: f64,
    last_scroll: f32,
    frozen_until_ms: f64,
    offset: f32,
}

impl ParallaxTracker {
    pub fn new(config: &ParallaxConfig) -> Self {
        Self::with_speed(config, config.speed)
    }

    /// Same limits as `config` but a per-layer speed factor.
    pub fn with_speed(config: &ParallaxConfig, speed: f32) -> Self {
        Self {
            speed,
            max_offset: config.max_offset,
            fast_scroll_px: config.fast_scroll_px,
            cooldown_ms: config.cooldown_ms,
            last_scroll: 0.0,
            frozen_until_ms: f64::NEG_INFINITY,
            offset: 0.0,
        }
    }

    /// Parallax is skipped for users who prefer reduced motion and on
    /// narrow (mobile) viewports.
    pub fn enabled(config: &ParallaxConfig, prefers_reduced_motion: bool, viewport_width: f32) -> bool {
        !prefers_reduced_motion && viewport_width >= config.min_viewport
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Returns the new offset, or `None` while frozen after a fast scroll.
    pub fn update(&mut self, scroll_y: f32, now_ms: f64) -> Option<f32> {
        let delta = (scroll_y - self.last_scroll).abs();
        self.last_scroll = scroll_y;
        if delta > self.fast_scroll_px {
            self.frozen_until_ms = now_ms + self.cooldown_ms;
        }
        if now_ms < self.frozen_until_ms {
            return None;
        }
        self.offset = (scroll_y * self.speed).min(self.max_offset);
        Some(self.offset)
    }
}
