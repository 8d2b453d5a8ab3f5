//! # Sprite — a textured, rotatable world-space quad
//!
//! A sprite is a unit quad centered on `position` with half-extent
//! `scale / 2`, rotated about its own center, carrying a solid tint color, a
//! texture-array layer, and four independently assignable texture
//! coordinates. Independent UVs are what make sub-rectangle atlasing work:
//! an animation system retargets the same sprite at successive sheet frames
//! by swapping the UV set, without touching the quad geometry.
//!
//! Rotation is applied to the corner offsets *before* translation, so the
//! quad spins in place. A rotation of exactly zero skips the trig entirely —
//! axis-aligned sprites reproduce `position ± scale/2` with no float drift.

use crate::math::{Rect, Vec2};

use super::drawable::{quad_indices, BufferSlot, Drawable};
use super::vertex::SpriteVertex;
use super::Color;

/// Default UV set: full texture, counter-clockwise from bottom-left.
const FULL_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
];

/// A quad sprite. Register with a [`BatchRenderer`](super::BatchRenderer)
/// over [`SpriteVertex`] records.
///
/// Every mutator marks the sprite dirty; the renderer clears the flag when
/// it next consumes the geometry (full repack or incremental patch).
#[derive(Debug)]
pub struct Sprite {
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

impl Sprite {
    /// Create a sprite at `position` with extent `scale`, sampling the given
    /// texture-array layer. Starts dirty, white tint, full-texture UVs.
    pub fn new(position: Vec2, scale: Vec2, texture: i32) -> Self {
        Self {
            position,
            scale,
            rotation: 0.0,
            color: Color::WHITE,
            texture,
            uvs: FULL_UVS,
            z_order: 0,
            dirty: true,
            slot: BufferSlot::default(),
        }
    }

    /// Set the tint color (builder form, for pre-registration setup).
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set the draw priority (builder form).
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

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Rotation in radians about the sprite center.
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

    /// Assign all four texture coordinates directly (counter-clockwise from
    /// bottom-left).
    pub fn set_uvs(&mut self, uvs: [Vec2; 4]) {
        self.uvs = uvs;
        self.dirty = true;
    }

    /// Point the sprite at a sub-rectangle of its texture layer — the usual
    /// way to select an animation frame from a sheet.
    pub fn set_uv_rect(&mut self, rect: Rect) {
        self.set_uvs([
            Vec2::new(rect.min.x, rect.min.y),
            Vec2::new(rect.max.x, rect.min.y),
            Vec2::new(rect.max.x, rect.max.y),
            Vec2::new(rect.min.x, rect.max.y),
        ]);
    }

    /// Change draw priority. Takes effect at the next full repack.
    pub fn set_z_order(&mut self, z: i32) {
        self.z_order = z;
        self.dirty = true;
    }

    /// Force regeneration without changing any attribute.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Drawable<SpriteVertex> for Sprite {
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

    fn vertices(&self) -> Vec<SpriteVertex> {
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
            .map(|(corner, uv)| SpriteVertex {
                position: [corner.x + self.position.x, corner.y + self.position.y],
                uv: [uv.x, uv.y],
                color,
                texture: self.texture,
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
    fn unrotated_corners_are_exact() {
        // With rotation 0 the trig path is skipped, so corners must equal
        // position ± scale/2 with no floating drift.
        let sprite = Sprite::new(Vec2::new(3.5, -2.25), Vec2::new(5.0, 7.0), 0);
        let verts = sprite.vertices();
        assert_eq!(verts[0].position, [1.0, -5.75]);
        assert_eq!(verts[1].position, [6.0, -5.75]);
        assert_eq!(verts[2].position, [6.0, 1.25]);
        assert_eq!(verts[3].position, [1.0, 1.25]);
    }

    #[test]
    fn rotation_spins_in_place() {
        // A quarter turn maps the bottom-right corner onto the (pre-turn)
        // top-right corner position.
        let mut sprite = Sprite::new(Vec2::new(10.0, 10.0), Vec2::new(2.0, 2.0), 0);
        sprite.set_rotation(std::f32::consts::FRAC_PI_2);
        let verts = sprite.vertices();
        let br = verts[1].position;
        assert!((br[0] - 11.0).abs() < 1e-5);
        assert!((br[1] - 11.0).abs() < 1e-5);
    }

    #[test]
    fn uv_rect_selects_sub_rectangle() {
        let mut sprite = Sprite::new(Vec2::ZERO, Vec2::ONE, 2);
        sprite.set_uv_rect(Rect::from_pixels(32.0, 0.0, 32.0, 32.0, 128.0, 64.0));
        let verts = sprite.vertices();
        assert_eq!(verts[0].uv, [0.25, 0.0]);
        assert_eq!(verts[2].uv, [0.5, 0.5]);
        assert!(verts.iter().all(|v| v.texture == 2));
    }

    #[test]
    fn mutators_set_dirty_and_counts_are_fixed() {
        let mut sprite = Sprite::new(Vec2::ZERO, Vec2::ONE, 0);
        sprite.set_clean();
        assert!(!sprite.is_dirty());
        sprite.set_position(Vec2::new(1.0, 0.0));
        assert!(sprite.is_dirty());
        assert_eq!(sprite.vertex_count(), 4);
        assert_eq!(sprite.index_count(), 6);
        assert_eq!(sprite.vertices().len(), 4);
        assert_eq!(sprite.indices(12).len(), 6);
    }
}
