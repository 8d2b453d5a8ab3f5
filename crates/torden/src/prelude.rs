//! Convenience re-exports: `use torden::prelude::*`.

pub use crate::math::{Mat4, Rect, Vec2, Vec4};
pub use crate::render::{begin_frame, ClearColor, FrameContext, GpuContext};
pub use crate::render2d::{
    BatchMaterial, BatchRenderer, Color, DebugOverlay, Drawable, DrawableHandle, Font, Glyph,
    Line, Point, Sprite, TextPainter, TextureArray, UiGlyph, UiQuad, WgpuGeometry,
};

#[cfg(feature = "text")]
pub use crate::render2d::{rasterize_font, FontAtlas};
