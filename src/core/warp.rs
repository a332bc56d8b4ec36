use super::config::WarpConfig;
use super::constants::{WARP_MAX_SIZE, WARP_Z_STEP};
use super::surface::{Rgba, Surface};
use glam::Vec2;
use rand::prelude::*;

const STREAK: Rgba = Rgba::new(200, 255, 255, 1.0);

/// A point in the tunnel. `x`/`y` are in screen-relative units, `z` is depth
/// measured in the same units as the viewport width.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WarpStar {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Perspective star tunnel rushing toward the viewer.
pub struct WarpField {
    config: WarpConfig,
    width: f32,
    height: f32,
    /// Far plane the current stars were laid out for.
    depth: f32,
    stars: Vec<WarpStar>,
    rng: StdRng,
}

impl WarpField {
    pub fn new(config: WarpConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: WarpConfig, rng: StdRng) -> Self {
        Self {
            config,
            width: 0.0,
            height: 0.0,
            depth: 0.0,
            stars: Vec::new(),
            rng,
        }
    }

    pub fn stars(&self) -> &[WarpStar] {
        &self.stars
    }

    #[inline]
    fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    fn step(&self) -> f32 {
        self.config.speed * WARP_Z_STEP
    }

    /// Track the new viewport. Stars are created the first time a non-empty
    /// size arrives; later resizes keep them, rescaling depth so every star
    /// stays within `(0, width]`.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        if self.stars.is_empty() {
            let mut stars = Vec::with_capacity(self.config.star_count);
            for _ in 0..self.config.star_count {
                let z = (1.0 - self.rng.gen::<f32>()) * width;
                stars.push(self.fresh_star(z));
            }
            self.stars = stars;
        } else if self.depth != width {
            let scale = width / self.depth;
            for star in &mut self.stars {
                star.z = (star.z * scale).clamp(f32::MIN_POSITIVE, width);
            }
        }
        self.depth = width;
    }

    fn fresh_star(&mut self, z: f32) -> WarpStar {
        WarpStar {
            x: (self.rng.gen::<f32>() - 0.5) * self.width * 2.0,
            y: (self.rng.gen::<f32>() - 0.5) * self.height * 2.0,
            z,
        }
    }

    /// Move every star toward the viewer, recycling those that pass it.
    pub fn update(&mut self) {
        if self.width <= 0.0 {
            return;
        }
        let step = self.step();
        let far = self.width;
        for i in 0..self.stars.len() {
            let z = self.stars[i].z - step;
            if z <= 0.0 {
                self.stars[i] = self.fresh_star(far);
            } else {
                self.stars[i].z = z;
            }
        }
    }

    #[inline]
    fn project(&self, star: &WarpStar, z: f32) -> Vec2 {
        Vec2::new(star.x / z * self.width, star.y / z * self.height) + self.center()
    }

    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        if self.width <= 0.0 {
            return;
        }
        let step = self.step();
        for star in &self.stars {
            let head = self.project(star, star.z);
            if head.x < 0.0 || head.x > self.width || head.y < 0.0 || head.y > self.height {
                continue;
            }
            let nearness = 1.0 - star.z / self.width;
            let size = nearness * WARP_MAX_SIZE;
            let tail = self.project(star, star.z + step);
            surface.line(tail, head, size, STREAK.with_alpha(nearness));
            surface.fill_circle(head, size / 2.0, Rgba::white(nearness));
        }
    }

    /// Fade the previous frame, advance and redraw.
    pub fn frame<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.fade(self.width, self.height, self.config.fade_alpha);
        self.update();
        self.draw(surface);
    }
}
