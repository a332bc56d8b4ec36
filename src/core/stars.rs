//! Twinkling background starfield with a heart constellation and shooting stars.

use super::config::{Span, StarfieldConfig};
use super::constants::*;
use super::surface::{Rgba, Surface};
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

const TRAIL_CYAN: Rgba = Rgba::new(34, 211, 238, 1.0);

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub base_opacity: f32,
    /// Last computed display opacity, always within the legal range.
    pub opacity: f32,
    pub twinkle_phase: f32,
    pub twinkle_speed: f32,
}

impl Star {
    /// Advance the twinkle and recompute the clamped opacity.
    #[inline]
    pub fn twinkle(&mut self, amplitude: f32) {
        self.twinkle_phase += self.twinkle_speed;
        // Keep the phase bounded so long sessions do not lose precision.
        if self.twinkle_phase > TAU {
            self.twinkle_phase %= TAU;
        }
        self.opacity = twinkle_opacity(self.base_opacity, self.twinkle_phase, amplitude);
    }
}

#[inline]
pub fn twinkle_opacity(base: f32, phase: f32, amplitude: f32) -> f32 {
    (base + amplitude * phase.sin()).clamp(MIN_STAR_OPACITY, MAX_STAR_OPACITY)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShootingStar {
    pub pos: Vec2,
    /// Travel direction in radians, measured clockwise from +x in canvas space.
    pub angle: f32,
    pub speed: f32,
    /// Trail length in pixels.
    pub length: f32,
    pub active: bool,
}

impl ShootingStar {
    #[inline]
    pub fn direction(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin())
    }

    #[inline]
    pub fn tail(&self) -> Vec2 {
        self.pos - self.direction() * self.length
    }

    /// Move one frame and flag the star once its trail has left the viewport
    /// through any edge.
    pub fn advance(&mut self, width: f32, height: f32) {
        self.pos += self.direction() * self.speed;
        let margin = self.length;
        if self.pos.x > width + margin
            || self.pos.y > height + margin
            || self.pos.x < -margin
            || self.pos.y < -margin
        {
            self.active = false;
        }
    }
}

pub struct StarField {
    config: StarfieldConfig,
    width: f32,
    height: f32,
    stars: Vec<Star>,
    shooting: Vec<ShootingStar>,
    rng: StdRng,
}

impl StarField {
    pub fn new(config: StarfieldConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: StarfieldConfig, rng: StdRng) -> Self {
        Self {
            config,
            width: 0.0,
            height: 0.0,
            stars: Vec::new(),
            shooting: Vec::new(),
            rng,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn shooting_stars(&self) -> &[ShootingStar] {
        &self.shooting
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Expected population after a successful `initialize`.
    pub fn expected_len(&self) -> usize {
        self.config.star_count + self.config.heart_star_count
    }

    /// Regenerate every star for a new viewport. Prior state is discarded;
    /// a zero-size viewport leaves the field empty.
    pub fn initialize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        self.stars.clear();
        self.shooting.clear();
        if !(width > 0.0 && height > 0.0) {
            log::debug!("[starfield] skip init for empty viewport {width}x{height}");
            return;
        }
        self.stars.reserve(self.expected_len());
        for _ in 0..self.config.star_count {
            let star = self.background_star();
            self.stars.push(star);
        }
        for _ in 0..self.config.heart_star_count {
            let star = self.heart_star();
            self.stars.push(star);
        }
        log::debug!(
            "[starfield] {} stars for {}x{}",
            self.stars.len(),
            width,
            height
        );
    }

    /// Viewport changed: regenerate to avoid clustering.
    #[inline]
    pub fn resize(&mut self, width: f32, height: f32) {
        self.initialize(width, height);
    }

    fn background_star(&mut self) -> Star {
        let depth: f32 = self.rng.gen();
        let band = DEPTH_BANDS
            .iter()
            .find(|(limit, ..)| depth < *limit)
            .unwrap_or(&DEPTH_BANDS[DEPTH_BANDS.len() - 1]);
        let (_, size, opacity, twinkle) = *band;
        let size = Span::from(size).sample(&mut self.rng);
        let opacity = Span::from(opacity).sample(&mut self.rng);
        let twinkle_speed = Span::from(twinkle).sample(&mut self.rng);
        Star {
            pos: Vec2::new(
                self.rng.gen::<f32>() * self.width,
                self.rng.gen::<f32>() * self.height,
            ),
            size,
            base_opacity: opacity,
            opacity,
            twinkle_speed,
            twinkle_phase: self.rng.gen::<f32>() * TAU,
        }
    }

    fn heart_star(&mut self) -> Star {
        let center = Vec2::new(
            self.width * HEART_CENTER[0],
            self.height * HEART_CENTER[1],
        );
        let scale = self.width.min(self.height) / HEART_SCALE_DIVISOR;
        let t = self.rng.gen::<f32>() * TAU;
        let jitter = Vec2::new(
            (self.rng.gen::<f32>() - 0.5) * scale * 2.0 * HEART_FUZZ,
            (self.rng.gen::<f32>() - 0.5) * scale * 2.0 * HEART_FUZZ,
        );
        Star {
            pos: center + heart_point(t) * scale + jitter,
            size: Span::from(HEART_SIZE).sample(&mut self.rng),
            base_opacity: HEART_OPACITY,
            opacity: HEART_OPACITY,
            twinkle_speed: Span::from(HEART_TWINKLE).sample(&mut self.rng),
            twinkle_phase: self.rng.gen::<f32>() * TAU,
        }
    }

    /// Run one full frame: clear, twinkle and draw stars, move shooting stars,
    /// then maybe spawn a new one.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear(self.width, self.height);
        self.tick(surface);
        self.tick_shooting_stars(surface);
        self.maybe_spawn_shooting_star();
    }

    /// Twinkle and draw every background star.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let amplitude = self.config.twinkle_amplitude;
        for star in &mut self.stars {
            star.twinkle(amplitude);
            surface.fill_circle(star.pos, star.size, Rgba::white(star.opacity));
            if star.size > GLOW_SIZE_THRESHOLD {
                surface.radial_glow(
                    star.pos,
                    star.size * GLOW_RADIUS_FACTOR,
                    Rgba::white(star.opacity * 0.5),
                );
            }
        }
    }

    /// Spawn with the configured per-frame probability. Returns whether a
    /// star was spawned. Concurrent shooting stars are not capped.
    pub fn maybe_spawn_shooting_star(&mut self) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        if self.rng.gen::<f64>() < self.config.shooting_star_chance {
            self.spawn_shooting_star();
            true
        } else {
            false
        }
    }

    pub fn spawn_shooting_star(&mut self) {
        let c = &self.config;
        let angle = c.shooting_angle_deg.sample(&mut self.rng).to_radians();
        let speed = c.shooting_speed.sample(&mut self.rng);
        let length = c.shooting_length.sample(&mut self.rng);
        let band = c.spawn_band;
        let pos = Vec2::new(
            self.rng.gen::<f32>() * self.width,
            self.rng.gen::<f32>() * self.height * band,
        );
        self.shooting.push(ShootingStar {
            pos,
            angle,
            speed,
            length,
            active: true,
        });
    }

    /// Move, draw and cull shooting stars. After this call only active
    /// entries remain.
    pub fn tick_shooting_stars<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        let (width, height) = (self.width, self.height);
        for star in &mut self.shooting {
            star.advance(width, height);
            if !star.active {
                continue;
            }
            surface.gradient_line(
                star.pos,
                star.tail(),
                SHOOTING_TRAIL_WIDTH,
                &[
                    (0.0, TRAIL_CYAN),
                    (0.2, TRAIL_CYAN.with_alpha(0.4)),
                    (1.0, TRAIL_CYAN.with_alpha(0.0)),
                ],
            );
            surface.glow_point(
                star.pos,
                SHOOTING_HEAD_RADIUS,
                Rgba::white(1.0),
                TRAIL_CYAN.with_alpha(0.8),
                SHOOTING_HEAD_BLUR,
            );
        }
        self.shooting.retain(|s| s.active);
    }

    /// Add a shooting star with explicit parameters.
    pub fn push_shooting_star(&mut self, star: ShootingStar) {
        self.shooting.push(star);
    }
}

/// Classic heart curve, y flipped for a y-down canvas. Roughly spans
/// x in [-16, 16] and y in [-12, 17].
#[inline]
pub fn heart_point(t: f32) -> Vec2 {
    let x = 16.0 * t.sin().powi(3);
    let y = -(13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos());
    Vec2::new(x, y)
}
