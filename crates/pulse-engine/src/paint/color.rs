/// Straight-alpha RGBA color with `f32` channels in `[0, 1]`.
///
/// Backends in this workspace blend on the CPU into 8-bit framebuffers, so colors
/// stay in straight alpha until [`to_rgba8`](Self::to_rgba8).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from sRGB bytes (`0`–`255`).
    #[inline]
    pub fn from_srgb_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Returns the same color with alpha multiplied by `factor` (clamped to `[0, 1]`).
    ///
    /// Used to apply node opacity at draw time.
    #[inline]
    pub fn with_alpha_scaled(self, factor: f32) -> Self {
        Self { a: (self.a * factor).clamp(0.0, 1.0), ..self }
    }

    /// Converts to `[r, g, b, a]` bytes, clamping every channel.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}
