//! # Shapes — thick line segments and point markers
//!
//! Lines and points share one vertex family ([`ShapeVertex`]) and one
//! pipeline; a per-vertex `kind` scalar tells the fragment stage whether to
//! feather a line edge or mask a point disc. Both emit a single quad.
//!
//! A line is extruded to a rectangle: take the segment direction, its
//! perpendicular, normalize, scale by half the thickness, and push the two
//! endpoints apart. A zero-length segment normalizes to the zero vector and
//! degenerates to a zero-area quad rather than failing — callers that
//! collapse a line to a point get nothing on screen, not a crash.

use crate::math::Vec2;

use super::drawable::{quad_indices, BufferSlot, Drawable};
use super::vertex::{ShapeVertex, SHAPE_KIND_LINE, SHAPE_KIND_POINT};
use super::Color;

const LOCAL_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// A thickness-extruded line segment.
#[derive(Debug)]
pub struct Line {
    start: Vec2,
    end: Vec2,
    thickness: f32,
    color: Color,
    z_order: i32,
    dirty: bool,
    slot: BufferSlot,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2, color: Color, thickness: f32) -> Self {
        Self {
            start,
            end,
            thickness,
            color,
            z_order: 0,
            dirty: true,
            slot: BufferSlot::default(),
        }
    }

    pub fn with_z_order(mut self, z: i32) -> Self {
        self.z_order = z;
        self
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn end(&self) -> Vec2 {
        self.end
    }

    pub fn set_endpoints(&mut self, start: Vec2, end: Vec2) {
        self.start = start;
        self.end = end;
        self.dirty = true;
    }

    pub fn set_thickness(&mut self, thickness: f32) {
        self.thickness = thickness;
        self.dirty = true;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.dirty = true;
    }

    pub fn set_z_order(&mut self, z: i32) {
        self.z_order = z;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Drawable<ShapeVertex> for Line {
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
        0
    }

    fn vertex_count(&self) -> usize {
        4
    }

    fn index_count(&self) -> usize {
        6
    }

    fn vertices(&self) -> Vec<ShapeVertex> {
        let dir = self.end - self.start;
        let perp = Vec2::new(-dir.y, dir.x).normalize_or_zero() * (self.thickness * 0.5);

        let corners = [
            self.start - perp,
            self.start + perp,
            self.end + perp,
            self.end - perp,
        ];

        let color = self.color.to_array();
        corners
            .iter()
            .zip(LOCAL_UVS.iter())
            .map(|(corner, local)| ShapeVertex {
                position: [corner.x, corner.y],
                color,
                thickness: self.thickness,
                kind: SHAPE_KIND_LINE,
                local: *local,
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

/// An axis-aligned square point marker, rendered as a disc by the fragment
/// stage.
#[derive(Debug)]
pub struct Point {
    position: Vec2,
    size: f32,
    color: Color,
    z_order: i32,
    dirty: bool,
    slot: BufferSlot,
}

impl Point {
    pub fn new(position: Vec2, color: Color, size: f32) -> Self {
        Self {
            position,
            size,
            color,
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

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.dirty = true;
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size;
        self.dirty = true;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.dirty = true;
    }

    pub fn set_z_order(&mut self, z: i32) {
        self.z_order = z;
        self.dirty = true;
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

impl Drawable<ShapeVertex> for Point {
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
        0
    }

    fn vertex_count(&self) -> usize {
        4
    }

    fn index_count(&self) -> usize {
        6
    }

    fn vertices(&self) -> Vec<ShapeVertex> {
        let half = self.size * 0.5;
        let corners = [
            Vec2::new(self.position.x - half, self.position.y - half),
            Vec2::new(self.position.x + half, self.position.y - half),
            Vec2::new(self.position.x + half, self.position.y + half),
            Vec2::new(self.position.x - half, self.position.y + half),
        ];

        let color = self.color.to_array();
        corners
            .iter()
            .zip(LOCAL_UVS.iter())
            .map(|(corner, local)| ShapeVertex {
                position: [corner.x, corner.y],
                color,
                thickness: self.size,
                kind: SHAPE_KIND_POINT,
                local: *local,
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
    fn horizontal_line_extrudes_vertically() {
        // Perpendicular of a horizontal segment is vertical: thickness 2
        // pushes the corners one unit up and down.
        let line = Line::new(Vec2::ZERO, Vec2::new(10.0, 0.0), Color::WHITE, 2.0);
        let verts = line.vertices();
        assert_eq!(verts[0].position, [0.0, -1.0]);
        assert_eq!(verts[1].position, [0.0, 1.0]);
        assert_eq!(verts[2].position, [10.0, 1.0]);
        assert_eq!(verts[3].position, [10.0, -1.0]);
        assert!(verts.iter().all(|v| v.kind == SHAPE_KIND_LINE));
    }

    #[test]
    fn zero_length_line_degenerates_quietly() {
        let line = Line::new(Vec2::new(3.0, 4.0), Vec2::new(3.0, 4.0), Color::RED, 5.0);
        let verts = line.vertices();
        // All four corners collapse onto the endpoint — zero-area quad.
        for v in &verts {
            assert_eq!(v.position, [3.0, 4.0]);
        }
    }

    #[test]
    fn point_is_centered_square() {
        let point = Point::new(Vec2::new(2.0, 2.0), Color::GREEN, 4.0);
        let verts = point.vertices();
        assert_eq!(verts[0].position, [0.0, 0.0]);
        assert_eq!(verts[2].position, [4.0, 4.0]);
        assert!(verts.iter().all(|v| v.kind == SHAPE_KIND_POINT));
        assert!(verts.iter().all(|v| v.thickness == 4.0));
    }

    #[test]
    fn locals_span_unit_square() {
        let point = Point::new(Vec2::ZERO, Color::WHITE, 1.0);
        let verts = point.vertices();
        assert_eq!(verts[0].local, [0.0, 0.0]);
        assert_eq!(verts[2].local, [1.0, 1.0]);
    }
}
