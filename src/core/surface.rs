use glam::Vec2;

/// Straight (non-premultiplied) color with an alpha in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn white(a: f32) -> Self {
        Self::new(255, 255, 255, a)
    }

    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` form accepted by canvas style setters.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// 2D drawing target for the particle effects.
///
/// The browser implementation wraps a `CanvasRenderingContext2d`; tests use a
/// recorder. Coordinates are canvas pixels.
pub trait Surface {
    /// Clear to transparent.
    fn clear(&mut self, width: f32, height: f32);
    /// Paint a translucent black veil over the whole surface (motion trails).
    fn fade(&mut self, width: f32, height: f32, alpha: f32);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Radial falloff from `color` at the center to transparent at `radius`.
    fn radial_glow(&mut self, center: Vec2, radius: f32, color: Rgba);
    /// Gradient stroke from `head` to `tail`; stops are `(offset, color)`.
    fn gradient_line(&mut self, head: Vec2, tail: Vec2, width: f32, stops: &[(f32, Rgba)]);
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);
    /// Filled circle with a blurred shadow halo.
    fn glow_point(&mut self, center: Vec2, radius: f32, fill: Rgba, halo: Rgba, blur: f32);
    /// Top-to-bottom tint gradient across the whole surface; stops are
    /// `(offset, color)`.
    fn tint(&mut self, width: f32, height: f32, stops: &[(f32, Rgba)]);
    /// Draw a text glyph centered on `center`, rotated by `angle` radians.
    fn glyph(&mut self, text: &str, center: Vec2, size: f32, angle: f32, alpha: f32);
}
