//! # UI primitives — quads and text glyphs
//!
//! Both share the [`UiVertex`] family and one pipeline; a per-vertex `kind`
//! discriminator tells the fragment stage whether to treat the texture sample
//! as glyph coverage (font path) or as a plain texel (widget skins, flat
//! fills).
//!
//! A [`UiQuad`] is a sprite's UI-space sibling: rotatable, four assignable
//! texture coordinates, so the same type serves flat-colored panels and
//! atlas-skinned buttons.
//!
//! A [`UiGlyph`] is one character cell: an axis-aligned quad sampling a UV
//! region of a font atlas layer. Glyphs carry a visibility flag instead of
//! being unregistered when text changes — a hidden glyph keeps its buffer
//! slot and emits alpha-zero records, which lets the text layer recycle pool
//! entries through cheap incremental patches instead of forcing a full
//! repack every frame. Atlas V grows downward (image convention), so the
//! bottom-left corner samples `(u_min, v_max)`.

use crate::math::{Rect, Vec2};

use super::drawable::{quad_indices, BufferSlot, Drawable};
use super::vertex::{UiVertex, UI_KIND_QUAD, UI_KIND_TEXT};
use super::Color;

/// A rotatable UI rectangle with assignable texture coordinates.
#[derive(Debug)]
pub struct UiQuad {
    position: Vec2,
    scale: Vec2,
    rotation: f32,
    color: Color,
    texture: i32,
    uvs: [Vec2; 4],
    z_order: i32,
    dirty: bool,
    slot: BufferSlot,
}

impl UiQuad {
    pub fn new(position: Vec2, scale: Vec2, color: Color, texture: i32) -> Self {
        Self {
            position,
            scale,
            rotation: 0.0,
            color,
            texture,
            uvs: [
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            z_order: 0,
            dirty: true,
            slot: BufferSlot::default(),
        }
    }

    pub fn with_z_order(mut self, z: i32) -> Self {
        self.z_order = z;
        self
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.dirty = true;
    }

    pub fn set_rotation(&mut self, radians: f32) {
        self.rotation = radians;
        self.dirty = true;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.dirty = true;
    }

    pub fn set_texture(&mut self, layer: i32) {
        self.texture = layer;
        self.dirty = true;
    }

    pub fn set_uvs(&mut self, uvs: [Vec2; 4]) {
        self.uvs = uvs;
        self.dirty = true;
    }

    /// Sample a sub-rectangle of the texture layer (widget skin cell).
    pub fn set_uv_rect(&mut self, rect: Rect) {
        self.set_uvs([
            Vec2::new(rect.min.x, rect.min.y),
            Vec2::new(rect.max.x, rect.min.y),
            Vec2::new(rect.max.x, rect.max.y),
            Vec2::new(rect.min.x, rect.max.y),
        ]);
    }

    pub fn set_z_order(&mut self, z: i32) {
        self.z_order = z;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Drawable<UiVertex> for UiQuad {
    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_clean(&mut self) {
        self.dirty = false;
    }

    fn z_order(&self) -> i32 {
        self.z_order
    }

    fn texture_key(&self) -> i32 {
        self.texture
    }

    fn vertex_count(&self) -> usize {
        4
    }

    fn index_count(&self) -> usize {
        6
    }

    fn vertices(&self) -> Vec<UiVertex> {
        let half = self.scale * 0.5;
        let mut corners = [
            Vec2::new(-half.x, -half.y),
            Vec2::new(half.x, -half.y),
            Vec2::new(half.x, half.y),
            Vec2::new(-half.x, half.y),
        ];

        if self.rotation != 0.0 {
            let rot = Vec2::from_angle(self.rotation);
            for corner in &mut corners {
                *corner = rot.rotate(*corner);
            }
        }

        let color = self.color.to_array();
        corners
            .iter()
            .zip(self.uvs.iter())
            .map(|(corner, uv)| UiVertex {
                position: [corner.x + self.position.x, corner.y + self.position.y],
                uv: [uv.x, uv.y],
                color,
                texture: self.texture,
                kind: UI_KIND_QUAD,
            })
            .collect()
    }

    fn indices(&self, base: u32) -> Vec<u32> {
        quad_indices(base)
    }

    fn slot(&self) -> BufferSlot {
        self.slot
    }

    fn assign_slot(&mut self, slot: BufferSlot) {
        self.slot = slot;
    }
}

/// One character cell sampling a font-atlas region.
///
/// Glyphs always report z-order 0 — text layering is decided by draw order
/// of the owning renderer, not per character.
#[derive(Debug)]
pub struct UiGlyph {
    position: Vec2,
    scale: Vec2,
    color: Color,
    uv_min: Vec2,
    uv_max: Vec2,
    texture: i32,
    visible: bool,
    dirty: bool,
    slot: BufferSlot,
}

impl UiGlyph {
    pub fn new(position: Vec2, scale: Vec2, uv_min: Vec2, uv_max: Vec2, texture: i32) -> Self {
        Self {
            position,
            scale,
            color: Color::WHITE,
            uv_min,
            uv_max,
            texture,
            visible: true,
            dirty: true,
            slot: BufferSlot::default(),
        }
    }

    /// An off-screen placeholder for pooling; invisible until shaped.
    pub fn empty() -> Self {
        let mut glyph = Self::new(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, 0);
        glyph.visible = false;
        glyph
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the glyph. Hidden glyphs keep their buffer slot and emit
    /// alpha-zero records. Dirties only on an actual change.
    pub fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            self.visible = visible;
            self.dirty = true;
        }
    }

    /// Whether the glyph already shows exactly this shape — used by the text
    /// layer to skip re-dirtying unchanged characters.
    pub fn matches(
        &self,
        position: Vec2,
        scale: Vec2,
        uv_min: Vec2,
        uv_max: Vec2,
        color: Color,
        texture: i32,
    ) -> bool {
        self.position == position
            && self.scale == scale
            && self.uv_min == uv_min
            && self.uv_max == uv_max
            && self.color.to_array() == color.to_array()
            && self.texture == texture
    }

    /// Reshape the glyph to a new character cell.
    pub fn shape(
        &mut self,
        position: Vec2,
        scale: Vec2,
        uv_min: Vec2,
        uv_max: Vec2,
        color: Color,
        texture: i32,
    ) {
        self.position = position;
        self.scale = scale;
        self.uv_min = uv_min;
        self.uv_max = uv_max;
        self.color = color;
        self.texture = texture;
        self.dirty = true;
    }
}

impl Drawable<UiVertex> for UiGlyph {
    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn set_clean(&mut self) {
        self.dirty = false;
    }

    fn z_order(&self) -> i32 {
        0
    }

    fn texture_key(&self) -> i32 {
        self.texture
    }

    fn vertex_count(&self) -> usize {
        4
    }

    fn index_count(&self) -> usize {
        6
    }

    fn vertices(&self) -> Vec<UiVertex> {
        let half = self.scale * 0.5;
        let corners = [
            Vec2::new(self.position.x - half.x, self.position.y - half.y),
            Vec2::new(self.position.x + half.x, self.position.y - half.y),
            Vec2::new(self.position.x + half.x, self.position.y + half.y),
            Vec2::new(self.position.x - half.x, self.position.y + half.y),
        ];
        // Atlas V grows downward, world Y grows upward.
        let uvs = [
            [self.uv_min.x, self.uv_max.y],
            [self.uv_max.x, self.uv_max.y],
            [self.uv_max.x, self.uv_min.y],
            [self.uv_min.x, self.uv_min.y],
        ];

        let alpha = if self.visible { self.color.a } else { 0.0 };
        let color = [self.color.r, self.color.g, self.color.b, alpha];

        corners
            .iter()
            .zip(uvs.iter())
            .map(|(corner, uv)| UiVertex {
                position: [corner.x, corner.y],
                uv: *uv,
                color,
                texture: self.texture,
                kind: UI_KIND_TEXT,
            })
            .collect()
    }

    fn indices(&self, base: u32) -> Vec<u32> {
        quad_indices(base)
    }

    fn slot(&self) -> BufferSlot {
        self.slot
    }

    fn assign_slot(&mut self, slot: BufferSlot) {
        self.slot = slot;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_kind_discriminator() {
        let quad = UiQuad::new(Vec2::ZERO, Vec2::ONE, Color::WHITE, 1);
        assert!(quad.vertices().iter().all(|v| v.kind == UI_KIND_QUAD));
    }

    #[test]
    fn hidden_glyph_emits_zero_alpha() {
        let mut glyph = UiGlyph::new(
            Vec2::ZERO,
            Vec2::new(8.0, 12.0),
            Vec2::new(0.1, 0.2),
            Vec2::new(0.3, 0.4),
            1,
        );
        glyph.set_visible(false);
        let verts = glyph.vertices();
        assert!(verts.iter().all(|v| v.color[3] == 0.0));
        // Geometry and UVs stay intact; only alpha is zeroed.
        assert_eq!(verts[0].uv, [0.1, 0.4]);
        assert_eq!(verts[3].uv, [0.1, 0.2]);
    }

    #[test]
    fn set_visible_dirties_only_on_change() {
        let mut glyph = UiGlyph::empty();
        glyph.set_clean();
        glyph.set_visible(false);
        assert!(!glyph.is_dirty());
        glyph.set_visible(true);
        assert!(glyph.is_dirty());
    }

    #[test]
    fn matches_detects_unchanged_shape() {
        let glyph = UiGlyph::new(
            Vec2::new(1.0, 2.0),
            Vec2::new(8.0, 12.0),
            Vec2::ZERO,
            Vec2::ONE,
            1,
        );
        assert!(glyph.matches(
            Vec2::new(1.0, 2.0),
            Vec2::new(8.0, 12.0),
            Vec2::ZERO,
            Vec2::ONE,
            Color::WHITE,
            1
        ));
        assert!(!glyph.matches(
            Vec2::new(1.0, 2.0),
            Vec2::new(8.0, 12.0),
            Vec2::ZERO,
            Vec2::ONE,
            Color::RED,
            1
        ));
    }
}
