//! # Overlay — retained debug lines and points
//!
//! A thin convenience layer for the classic debug-draw use case: physics
//! collider outlines, contact points, velocity vectors. It owns a
//! shape-family batch and hands out indices into its line/point tables, so
//! call sites can update an existing segment every frame instead of
//! respawning it.
//!
//! [`render`](DebugOverlay::render) runs a full repack before drawing, so
//! membership changes made since the last frame are picked up without the
//! caller thinking about synchronization strategies. For overlays that only
//! mutate (endpoints, colors) this still costs one full rebuild per dirty
//! frame — acceptable for debug geometry counts; use the batch renderer
//! directly if you need patch-granularity control.

use std::cell::RefCell;
use std::rc::Rc;

use crate::math::{Mat4, Vec2};

use super::batch::BatchRenderer;
use super::buffers::GeometryBuffers;
use super::drawable::DrawableHandle;
use super::shapes::{Line, Point};
use super::vertex::ShapeVertex;
use super::Color;

/// Retained debug-draw layer over a shape batch.
pub struct DebugOverlay<G> {
    batch: BatchRenderer<ShapeVertex, G>,
    lines: Vec<Rc<RefCell<Line>>>,
    points: Vec<Rc<RefCell<Point>>>,
}

impl<G: GeometryBuffers> DebugOverlay<G> {
    pub fn new(buffers: G) -> Self {
        Self {
            batch: BatchRenderer::new(buffers),
            lines: Vec::new(),
            points: Vec::new(),
        }
    }

    /// Register a line segment; returns its index for later lookups.
    pub fn add_line(&mut self, start: Vec2, end: Vec2, color: Color, thickness: f32) -> usize {
        let line = Rc::new(RefCell::new(Line::new(start, end, color, thickness)));
        self.batch.add(line.clone());
        self.lines.push(line);
        self.lines.len() - 1
    }

    /// Register a point marker; returns its index for later lookups.
    pub fn add_point(&mut self, position: Vec2, color: Color, size: f32) -> usize {
        let point = Rc::new(RefCell::new(Point::new(position, color, size)));
        self.batch.add(point.clone());
        self.points.push(point);
        self.points.len() - 1
    }

    /// Handle to a registered line, for mutation.
    pub fn line(&self, index: usize) -> Rc<RefCell<Line>> {
        self.lines[index].clone()
    }

    /// Handle to a registered point, for mutation.
    pub fn point(&self, index: usize) -> Rc<RefCell<Point>> {
        self.points[index].clone()
    }

    /// Move a line's endpoints.
    pub fn set_line(&mut self, index: usize, start: Vec2, end: Vec2) {
        self.lines[index].borrow_mut().set_endpoints(start, end);
    }

    /// Move a point.
    pub fn set_point(&mut self, index: usize, position: Vec2) {
        self.points[index].borrow_mut().set_position(position);
    }

    /// Unregister a line from the batch. The table keeps its slot so other
    /// indices stay valid; the geometry disappears at the next dirty
    /// rebuild.
    pub fn remove_line(&mut self, index: usize) -> bool {
        let handle: DrawableHandle<ShapeVertex> = self.lines[index].clone();
        self.batch.remove(&handle)
    }

    /// Unregister a point from the batch.
    pub fn remove_point(&mut self, index: usize) -> bool {
        let handle: DrawableHandle<ShapeVertex> = self.points[index].clone();
        self.batch.remove(&handle)
    }

    /// Rebuild if anything changed, then draw.
    pub fn render(&mut self, frame: &mut G::Frame<'_>, projection: Mat4) {
        self.batch.repack();
        self.batch.draw(frame, projection);
    }

    /// The underlying batch, for direct synchronization control.
    pub fn batch_mut(&mut self) -> &mut BatchRenderer<ShapeVertex, G> {
        &mut self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::super::buffers::RecordingBuffers;
    use super::*;

    #[test]
    fn render_packs_lines_and_points_together() {
        let mut overlay = DebugOverlay::new(RecordingBuffers::default());
        overlay.add_line(Vec2::ZERO, Vec2::new(10.0, 0.0), Color::GREEN, 1.0);
        overlay.add_point(Vec2::new(5.0, 5.0), Color::RED, 4.0);

        overlay.render(&mut (), Mat4::IDENTITY);
        assert_eq!(overlay.batch_mut().live_index_count(), 12);
        assert_eq!(overlay.batch_mut().buffers().draws, vec![12]);
    }

    #[test]
    fn mutation_marks_dirty_and_rebuilds() {
        let mut overlay = DebugOverlay::new(RecordingBuffers::default());
        let id = overlay.add_line(Vec2::ZERO, Vec2::new(1.0, 0.0), Color::WHITE, 1.0);
        overlay.render(&mut (), Mat4::IDENTITY);
        let rebuilds = overlay.batch_mut().buffers().replaces.len();

        overlay.set_line(id, Vec2::ZERO, Vec2::new(2.0, 0.0));
        overlay.render(&mut (), Mat4::IDENTITY);
        assert_eq!(overlay.batch_mut().buffers().replaces.len(), rebuilds + 1);

        // Quiet frame: the dirty scan bails out.
        overlay.render(&mut (), Mat4::IDENTITY);
        assert_eq!(overlay.batch_mut().buffers().replaces.len(), rebuilds + 1);
    }

    #[test]
    fn removal_needs_a_dirty_neighbor_to_take_effect() {
        let mut overlay = DebugOverlay::new(RecordingBuffers::default());
        let kept = overlay.add_point(Vec2::ZERO, Color::RED, 2.0);
        let dropped = overlay.add_point(Vec2::ONE, Color::RED, 2.0);
        overlay.render(&mut (), Mat4::IDENTITY);
        assert_eq!(overlay.batch_mut().live_index_count(), 12);

        // A pure removal leaves every survivor clean, so the next render
        // still replays both blocks.
        assert!(overlay.remove_point(dropped));
        overlay.render(&mut (), Mat4::IDENTITY);
        assert_eq!(overlay.batch_mut().live_index_count(), 12);

        overlay.point(kept).borrow_mut().mark_dirty();
        overlay.render(&mut (), Mat4::IDENTITY);
        assert_eq!(overlay.batch_mut().live_index_count(), 6);
    }
}
