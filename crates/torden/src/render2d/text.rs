//! # Text — pooled glyph layout over a batch renderer
//!
//! Rebuilding a buffer pair every time a label changes would throw away the
//! whole point of retained batching, so text goes through a glyph pool
//! instead. The painter owns a pool of [`UiGlyph`] drawables registered with
//! the host's UI batch. Each frame the host brackets its text with
//! [`begin`](TextPainter::begin) / [`end`](TextPainter::end) and lays out
//! strings with [`draw_text`](TextPainter::draw_text):
//!
//! - layout walks the string with the font metrics and takes the next pooled
//!   glyph per visible character, growing the pool (and repacking the batch)
//!   only when a frame uses more glyphs than any frame before;
//! - a glyph whose character cell is unchanged from last frame is left
//!   alone — no dirty flag, no buffer write;
//! - `end` hides pool entries unused this frame. Hidden glyphs keep their
//!   buffer slot and patch to alpha zero, so shrinking text never forces a
//!   repack.
//!
//! Steady-state text is therefore pure incremental patching: the host calls
//! the batch's `patch_dirty` + `draw` after `end`, and a static label costs
//! zero buffer writes per frame.

use std::cell::RefCell;
use std::rc::Rc;

use crate::math::Vec2;

use super::batch::BatchRenderer;
use super::buffers::GeometryBuffers;
use super::font::Font;
use super::ui::UiGlyph;
use super::vertex::UiVertex;
use super::Color;

/// Pooled-glyph text layout for one font atlas layer.
pub struct TextPainter {
    font: Font,
    atlas_layer: i32,
    pool: Vec<Rc<RefCell<UiGlyph>>>,
    cursor: usize,
}

impl TextPainter {
    /// `atlas_layer` is the texture-array layer holding this font's atlas.
    pub fn new(font: Font, atlas_layer: i32) -> Self {
        Self {
            font,
            atlas_layer,
            pool: Vec::new(),
            cursor: 0,
        }
    }

    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Start a frame: rewind the pool cursor.
    pub fn begin(&mut self) {
        self.cursor = 0;
    }

    /// Lay out `text` with its baseline origin at `origin`, scaled by
    /// `scale`. Newlines advance down by the font's line height.
    pub fn draw_text<G: GeometryBuffers>(
        &mut self,
        batch: &mut BatchRenderer<UiVertex, G>,
        text: &str,
        origin: Vec2,
        scale: f32,
        color: Color,
    ) {
        let mut cursor_x = origin.x;
        let mut cursor_y = origin.y;

        for ch in text.chars() {
            if ch == '\n' {
                cursor_x = origin.x;
                cursor_y -= self.font.line_height() * scale;
                continue;
            }

            let Some(glyph) = self.font.glyph(ch).copied() else {
                continue;
            };

            // Zero-size glyphs (space) just advance the cursor.
            if glyph.width == 0.0 || glyph.height == 0.0 {
                cursor_x += glyph.advance * scale;
                continue;
            }

            let x0 = cursor_x + glyph.offset_x * scale;
            let y0 = cursor_y + glyph.offset_y * scale;
            let w = glyph.width * scale;
            let h = glyph.height * scale;

            let position = Vec2::new(x0 + w * 0.5, y0 + h * 0.5);
            let size = Vec2::new(w, h);
            let uv_min = Vec2::new(glyph.u_min, glyph.v_min);
            let uv_max = Vec2::new(glyph.u_max, glyph.v_max);

            let pooled = self.take_glyph(batch);
            {
                let mut pooled = pooled.borrow_mut();
                if !pooled.matches(position, size, uv_min, uv_max, color, self.atlas_layer) {
                    pooled.shape(position, size, uv_min, uv_max, color, self.atlas_layer);
                }
                pooled.set_visible(true);
            }

            cursor_x += glyph.advance * scale;
        }
    }

    /// Finish a frame: hide pool entries no string used this time. Hidden
    /// glyphs patch to alpha zero and keep their buffer slots.
    pub fn end(&mut self) {
        for pooled in &self.pool[self.cursor..] {
            pooled.borrow_mut().set_visible(false);
        }
    }

    /// Take the next pooled glyph, growing the pool and repacking the batch
    /// when every existing entry is in use.
    fn take_glyph<G: GeometryBuffers>(
        &mut self,
        batch: &mut BatchRenderer<UiVertex, G>,
    ) -> Rc<RefCell<UiGlyph>> {
        if self.cursor >= self.pool.len() {
            let fresh = Rc::new(RefCell::new(UiGlyph::empty()));
            self.pool.push(fresh.clone());
            batch.add(fresh);
            // The new glyph starts dirty, so this rebuild always runs and
            // assigns it a slot.
            batch.repack();
        }
        let pooled = self.pool[self.cursor].clone();
        self.cursor += 1;
        pooled
    }
}

#[cfg(test)]
mod tests {
    use super::super::buffers::RecordingBuffers;
    use super::super::drawable::Drawable;
    use super::super::font::Glyph;
    use super::*;

    fn test_font() -> Font {
        let cell = |u: f32| {
            Some(Glyph {
                u_min: u,
                v_min: 0.0,
                u_max: u + 0.1,
                v_max: 0.1,
                advance: 10.0,
                offset_x: 1.0,
                offset_y: -2.0,
                width: 8.0,
                height: 12.0,
            })
        };
        let mut glyphs = vec![None; 95];
        glyphs[('A' as usize) - 32] = cell(0.0);
        glyphs[('B' as usize) - 32] = cell(0.1);
        // Space: advance only.
        glyphs[0] = Some(Glyph {
            u_min: 0.0,
            v_min: 0.0,
            u_max: 0.0,
            v_max: 0.0,
            advance: 5.0,
            offset_x: 0.0,
            offset_y: 0.0,
            width: 0.0,
            height: 0.0,
        });
        Font::from_glyphs(glyphs, 16.0)
    }

    fn batch() -> BatchRenderer<UiVertex, RecordingBuffers> {
        BatchRenderer::new(RecordingBuffers::default())
    }

    #[test]
    fn pool_grows_once_then_recycles() {
        let mut painter = TextPainter::new(test_font(), 1);
        let mut batch = batch();

        painter.begin();
        painter.draw_text(&mut batch, "AB", Vec2::ZERO, 1.0, Color::WHITE);
        painter.end();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.live_index_count(), 12);

        // Same text next frame: no growth, and after the flush above there
        // is nothing dirty left to write.
        batch.patch_dirty();
        painter.begin();
        painter.draw_text(&mut batch, "AB", Vec2::ZERO, 1.0, Color::WHITE);
        painter.end();
        assert_eq!(batch.len(), 2);
        let writes_before = batch.buffers().vertex_writes.len();
        batch.patch_dirty();
        assert_eq!(batch.buffers().vertex_writes.len(), writes_before);
    }

    #[test]
    fn spaces_advance_without_glyphs() {
        let mut painter = TextPainter::new(test_font(), 1);
        let mut batch = batch();

        painter.begin();
        painter.draw_text(&mut batch, "A B", Vec2::ZERO, 1.0, Color::WHITE);
        painter.end();
        // Two visible glyphs; the space spent only advance.
        assert_eq!(batch.len(), 2);

        // 'B' starts after A's advance (10) plus the space (5).
        let second = painter.pool[1].borrow();
        let verts = second.vertices();
        // x0 = 15 + offset_x 1, center = x0 + 4 → left edge = 16.
        assert_eq!(verts[0].position[0], 16.0);
    }

    #[test]
    fn shrinking_text_hides_leftovers() {
        let mut painter = TextPainter::new(test_font(), 1);
        let mut batch = batch();

        painter.begin();
        painter.draw_text(&mut batch, "AB", Vec2::ZERO, 1.0, Color::WHITE);
        painter.end();
        batch.patch_dirty();

        painter.begin();
        painter.draw_text(&mut batch, "A", Vec2::ZERO, 1.0, Color::WHITE);
        painter.end();

        assert!(painter.pool[0].borrow().is_visible());
        assert!(!painter.pool[1].borrow().is_visible());
        // The hidden glyph patched in place — population unchanged.
        assert_eq!(batch.len(), 2);
        batch.patch_dirty();
        let (_, bytes) = batch.buffers().vertex_writes.last().unwrap();
        let patched: &[UiVertex] = bytemuck::cast_slice(bytes);
        assert!(patched.iter().all(|v| v.color[3] == 0.0));
    }

    #[test]
    fn recoloring_dirties_every_glyph() {
        let mut painter = TextPainter::new(test_font(), 1);
        let mut batch = batch();

        painter.begin();
        painter.draw_text(&mut batch, "AB", Vec2::ZERO, 1.0, Color::WHITE);
        painter.end();
        batch.patch_dirty();
        let baseline = batch.buffers().vertex_writes.len();

        painter.begin();
        painter.draw_text(&mut batch, "AB", Vec2::ZERO, 1.0, Color::RED);
        painter.end();
        batch.patch_dirty();
        assert_eq!(batch.buffers().vertex_writes.len(), baseline + 2);
    }

    #[test]
    fn newline_drops_a_line() {
        let mut painter = TextPainter::new(test_font(), 1);
        let mut batch = batch();

        painter.begin();
        painter.draw_text(&mut batch, "A\nA", Vec2::new(0.0, 100.0), 1.0, Color::WHITE);
        painter.end();

        let first = painter.pool[0].borrow().vertices();
        let second = painter.pool[1].borrow().vertices();
        // Same left edge, one line height apart.
        assert_eq!(first[0].position[0], second[0].position[0]);
        assert_eq!(first[0].position[1] - second[0].position[1], 16.0);
    }
}
