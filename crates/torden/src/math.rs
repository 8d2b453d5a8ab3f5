//! Math types and glam re-exports.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. Projections handed to the renderer are plain
//! [`Mat4`] values in column-major order.

pub use glam::{Mat4, Vec2, Vec4};

/// A normalized rectangle within a texture (UV space, 0.0–1.0).
///
/// Used to select a sub-region of a texture layer — for example, a single
/// frame from a sprite sheet or a glyph cell in a font atlas. Coordinates are
/// in UV space where (0,0) is the top-left corner and (1,1) is the
/// bottom-right corner.
#[derive(Debug, Clone, Copy)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    /// The full texture (0,0) to (1,1).
    pub const FULL: Self = Self {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };

    /// Build from pixel coordinates and texture dimensions.
    pub fn from_pixels(x: f32, y: f32, w: f32, h: f32, tex_w: f32, tex_h: f32) -> Self {
        Self {
            min: Vec2::new(x / tex_w, y / tex_h),
            max: Vec2::new((x + w) / tex_w, (y + h) / tex_h),
        }
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::FULL
    }
}
