// Linear RGBA color used by recolor slots, tints and shader uniforms

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

use super::math::clamp01;

/// RGBA color with `f32` channels, nominally in [0, 1]
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from all four channels
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Create a color from 8-bit channels
    pub fn from_rgba8(rgba: [u8; 4]) -> Self {
        Self::rgba(
            rgba[0] as f32 / 255.0,
            rgba[1] as f32 / 255.0,
            rgba[2] as f32 / 255.0,
            rgba[3] as f32 / 255.0,
        )
    }

    /// Convert to 8-bit channels, clamping out-of-range values
    pub fn to_rgba8(self) -> [u8; 4] {
        let quantize = |c: f32| (clamp01(c) * 255.0).round() as u8;
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    pub fn rgb_vec(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(self.r, self.g, self.b, self.a)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Build a color from an RGB vector and an explicit alpha
    pub fn from_rgb_vec(rgb: Vec3, a: f32) -> Self {
        Self::rgba(rgb.x, rgb.y, rgb.z, a)
    }

    /// Clamp every RGB channel into [0, 1] (alpha untouched)
    pub fn clamp_rgb(self) -> Self {
        Self::rgba(clamp01(self.r), clamp01(self.g), clamp01(self.b), self.a)
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Euclidean distance between the RGB parts of two colors
    pub fn rgb_distance(self, other: Color) -> f32 {
        self.rgb_vec().distance(other.rgb_vec())
    }
}

impl From<Vec4> for Color {
    fn from(v: Vec4) -> Self {
        Self::rgba(v.x, v.y, v.z, v.w)
    }
}

impl From<Color> for Vec4 {
    fn from(c: Color) -> Self {
        c.to_vec4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rgba8_roundtrip_endpoints() {
        assert_eq!(Color::WHITE.to_rgba8(), [255, 255, 255, 255]);
        assert_eq!(Color::TRANSPARENT.to_rgba8(), [0, 0, 0, 0]);
        assert_eq!(Color::from_rgba8([255, 0, 0, 255]), Color::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_to_rgba8_clamps() {
        let c = Color::rgba(1.4, -0.2, 0.5, 1.0);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn test_clamp_rgb_keeps_alpha() {
        let c = Color::rgba(1.5, -1.0, 0.3, 0.25).clamp_rgb();
        assert_eq!(c, Color::rgba(1.0, 0.0, 0.3, 0.25));
    }

    #[test]
    fn test_rgb_distance_ignores_alpha() {
        let a = Color::rgba(0.0, 0.0, 0.0, 0.0);
        let b = Color::rgba(0.0, 3.0, 4.0, 1.0);
        assert_relative_eq!(a.rgb_distance(b), 5.0);
    }

    #[test]
    fn test_vec4_conversion() {
        let c = Color::rgba(0.1, 0.2, 0.3, 0.4);
        let v: Vec4 = c.into();
        assert_eq!(Color::from(v), c);
    }
}
