//! "Ice Giant mode": a timed shower of falling ice glyphs.

use super::config::IceConfig;
use super::constants::ICE_GLYPH_PX;
use super::surface::{Rgba, Surface};
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

pub const ICE_GLYPH: &str = "\u{2744}";

/// Cyan at the top, clear through the middle, pale blue at the bottom.
pub const ICE_TINT: [(f32, Rgba); 3] = [
    (0.0, Rgba::new(34, 211, 238, 0.1)),
    (0.5, Rgba::new(0, 0, 0, 0.0)),
    (1.0, Rgba::new(147, 197, 253, 0.1)),
];

// Vertical travel as fractions of the viewport height.
const FALL_FROM: f32 = -0.1;
const FALL_TO: f32 = 1.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IceParticle {
    /// Horizontal position in percent of the viewport width.
    pub x_pct: f32,
    pub duration: f32,
    pub delay: f32,
}

/// Where one particle is at a given moment of the shower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IcePose {
    pub y_frac: f32,
    pub opacity: f32,
    pub angle: f32,
}

impl IceParticle {
    /// `None` before the particle's delay has elapsed or after it landed.
    pub fn pose(&self, elapsed: f32) -> Option<IcePose> {
        let t = elapsed - self.delay;
        if t < 0.0 || t > self.duration {
            return None;
        }
        let progress = t / self.duration;
        Some(IcePose {
            y_frac: FALL_FROM + (FALL_TO - FALL_FROM) * progress,
            opacity: fade_keyframes(progress),
            angle: progress * TAU,
        })
    }
}

/// Opacity keyframes 0 -> 1 -> 1 -> 0 evenly spaced over the fall.
#[inline]
fn fade_keyframes(progress: f32) -> f32 {
    let third = 1.0 / 3.0;
    if progress < third {
        progress / third
    } else if progress < 2.0 * third {
        1.0
    } else {
        ((1.0 - progress) / third).max(0.0)
    }
}

pub struct IceShower {
    config: IceConfig,
    particles: Vec<IceParticle>,
    elapsed: f32,
    rng: StdRng,
}

impl IceShower {
    pub fn new(config: IceConfig, seed: u64) -> Self {
        Self {
            config,
            particles: Vec::new(),
            elapsed: 0.0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.particles.is_empty()
    }

    pub fn particles(&self) -> &[IceParticle] {
        &self.particles
    }

    /// Start (or restart) the shower with a fresh set of particles.
    pub fn activate(&mut self) {
        let c = &self.config;
        self.particles = (0..c.particle_count)
            .map(|_| IceParticle {
                x_pct: self.rng.gen::<f32>() * 100.0,
                duration: c.duration_sec.sample(&mut self.rng),
                delay: c.delay_sec.sample(&mut self.rng),
            })
            .collect();
        self.elapsed = 0.0;
        log::info!("[ice] shower activated with {} particles", self.particles.len());
    }

    /// Advance by `dt_sec`. Returns `true` exactly on the frame the shower ends.
    pub fn advance(&mut self, dt_sec: f32) -> bool {
        if !self.is_active() {
            return false;
        }
        self.elapsed += dt_sec;
        if self.elapsed >= self.config.active_sec {
            self.particles.clear();
            self.elapsed = 0.0;
            log::info!("[ice] shower finished");
            return true;
        }
        false
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, width: f32, height: f32) {
        if !self.is_active() {
            return;
        }
        surface.tint(width, height, &ICE_TINT);
        for p in &self.particles {
            if let Some(pose) = p.pose(self.elapsed) {
                let center = Vec2::new(p.x_pct / 100.0 * width, pose.y_frac * height);
                surface.glyph(ICE_GLYPH, center, ICE_GLYPH_PX, pose.angle, pose.opacity);
            }
        }
    }
}
