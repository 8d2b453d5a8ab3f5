//! # Render2d — batched, retained 2D primitive rendering
//!
//! Everything on screen is a [`Drawable`]: a quad sprite, a thick line, a
//! point marker, a UI quad, a text glyph. Drawables register with a
//! [`BatchRenderer`] for their vertex family, which packs the whole
//! population into one vertex/index buffer pair and keeps the GPU mirror in
//! sync as attributes change.
//!
//! ## Architecture
//!
//! ```text
//!   host / UI / overlay code
//!     │ mutate through Rc<RefCell<…>> handles  (sets dirty flags)
//!     ▼
//!  ┌──────────────────────────────┐       ┌───────────────────────────┐
//!  │ BatchRenderer<V, G>          │       │ concrete drawables        │
//!  │  population: Vec<handle>     │◄──────│ Sprite / Line / Point /   │
//!  │  live index count            │       │ UiQuad / UiGlyph          │
//!  │  repack()      full rebuild  │       └───────────────────────────┘
//!  │  patch_dirty() dirty blocks  │
//!  │  draw()        one call      │
//!  └──────────────┬───────────────┘
//!                 ▼
//!  ┌──────────────────────────────┐
//!  │ GeometryBuffers (trait)      │   WgpuGeometry: buffer pair +
//!  │  replace / write / draw      │   BatchMaterial (pipeline, camera
//!  └──────────────────────────────┘   uniform, texture array bind group)
//! ```
//!
//! The steady-state frame costs O(changed drawables): mutate, `patch_dirty`,
//! `draw`. Structural changes (add/remove, z-order) need a `repack`, which
//! re-sorts and re-uploads everything. See [`batch`] for the full contract,
//! including the staleness rules the patch path imposes on callers.
//!
//! Three vertex families keep the pipelines simple and statically typed:
//! sprites ([`SpriteVertex`]), lines/points ([`ShapeVertex`]), UI quads and
//! glyphs ([`UiVertex`]). Each family gets its own `BatchRenderer`; the
//! [`TextureArray`] is shared across the textured families, with the
//! per-vertex texture attribute selecting a layer.

pub mod batch;
pub mod buffers;
pub mod drawable;
pub mod font;
pub mod overlay;
pub(crate) mod pipeline;
pub mod shapes;
pub mod sprite;
pub mod text;
pub mod texture;
pub mod ui;
pub(crate) mod vertex;

pub use batch::BatchRenderer;
pub use buffers::{GeometryBuffers, WgpuGeometry};
pub use drawable::{BufferSlot, Drawable, DrawableHandle};
pub use font::{Font, Glyph};
#[cfg(feature = "text")]
pub use font::{rasterize_font, FontAtlas};
pub use overlay::DebugOverlay;
pub use pipeline::BatchMaterial;
pub use shapes::{Line, Point};
pub use sprite::Sprite;
pub use text::TextPainter;
pub use texture::TextureArray;
pub use ui::{UiGlyph, UiQuad};
pub use vertex::{
    ShapeVertex, SpriteVertex, UiVertex, SHAPE_KIND_LINE, SHAPE_KIND_POINT, UI_KIND_QUAD,
    UI_KIND_TEXT,
};

/// An RGBA color with floating-point components in [0, 1].
#[derive(Debug, Clone, Copy)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self { r: 1.0, g: 1.0, b: 1.0, a: 1.0 };
    pub const BLACK: Self = Self { r: 0.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const RED: Self = Self { r: 1.0, g: 0.0, b: 0.0, a: 1.0 };
    pub const GREEN: Self = Self { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };
    pub const BLUE: Self = Self { r: 0.0, g: 0.0, b: 1.0, a: 1.0 };

    /// Create a color from RGB (alpha = 1).
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub(crate) fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}
