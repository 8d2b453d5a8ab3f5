//! # Batch — retained draw-buffer management for 2D primitives
//!
//! This module is the CPU-side heart of the renderer. It owns a population
//! of [`Drawable`]s and a GPU buffer pair, and keeps the two in sync with as
//! little re-upload as it can get away with. Unlike an immediate-mode
//! collector that rebuilds every buffer every frame, the population here is
//! *retained*: a sprite registered once keeps its block of vertex and index
//! records across frames, and only changed blocks are re-sent.
//!
//! ## Two synchronization strategies
//!
//! ```text
//!  repack() — full relinearization            patch_dirty() — incremental
//!  ┌─────────────────────────────┐            ┌──────────────────────────┐
//!  │ any drawable dirty?  ──no──► return      │ for each dirty drawable: │
//!  │ stable sort by z-order      │            │   regenerate records     │
//!  │ walk population:            │            │   sub-range write at the │
//!  │   assign fresh slots        │            │   slot recorded by the   │
//!  │   regenerate all records    │            │   last repack            │
//!  │ replace both buffers        │            │   clear dirty flag       │
//!  │ store live index count      │            └──────────────────────────┘
//!  └─────────────────────────────┘            cost: O(dirty count)
//!  cost: O(population)
//! ```
//!
//! The per-frame loop is: mutate drawables through their handles (each
//! mutator raises the sticky dirty flag), call [`patch_dirty`] to push only
//! the changed blocks, call [`draw`]. [`repack`] is for structural changes —
//! membership (add/remove) or z-order — because only a full rebuild
//! reassigns slots and the live index count.
//!
//! ## Caller discipline
//!
//! Incremental patching trusts state recorded by the last repack, which puts
//! two rules on the caller:
//!
//! - a drawable's record counts are fixed for its lifetime; patching writes
//!   exactly those counts at the recorded offsets, so a count change between
//!   repacks would silently corrupt the neighboring blocks;
//! - after [`add`]/[`remove`] or a z-order change, the buffers and the live
//!   index count are stale until the next [`repack`] — draws in between
//!   replay the old linearization, including blocks of already-removed
//!   drawables.
//!
//! One consequence is easy to trip over, so it gets called out here: the
//! early-exit in [`repack`] looks only at dirty flags, and removal does not
//! dirty anything. Removing a drawable while every survivor is clean makes
//! the next `repack` a no-op and the removed geometry keeps drawing
//! indefinitely. Known quirk, kept deliberately; callers that remove
//! quiescent drawables should mark any survivor dirty to force the rebuild.
//!
//! [`add`]: BatchRenderer::add
//! [`remove`]: BatchRenderer::remove
//! [`repack`]: BatchRenderer::repack
//! [`patch_dirty`]: BatchRenderer::patch_dirty
//! [`draw`]: BatchRenderer::draw

use std::rc::Rc;

use crate::math::Mat4;

use super::buffers::GeometryBuffers;
use super::drawable::{BufferSlot, DrawableHandle};

/// Retained batch renderer for one vertex family.
///
/// `V` is the family's vertex record type; `G` the buffer-pair backend.
/// Holds strong handles to its drawables — the host typically keeps another
/// handle to each for mutation, and the object lives as long as the longest
/// holder.
pub struct BatchRenderer<V, G> {
    drawables: Vec<DrawableHandle<V>>,
    buffers: G,
    live_index_count: u32,
}

impl<V: bytemuck::Pod, G: GeometryBuffers> BatchRenderer<V, G> {
    pub fn new(buffers: G) -> Self {
        Self {
            drawables: Vec::new(),
            buffers,
            live_index_count: 0,
        }
    }

    /// Append a drawable to the population. O(1); no slot is assigned and
    /// nothing is uploaded until the next [`repack`](Self::repack).
    pub fn add(&mut self, drawable: DrawableHandle<V>) {
        self.drawables.push(drawable);
    }

    /// Remove a drawable by handle identity. O(population size).
    ///
    /// Does not compact the buffers or touch the live index count — the
    /// removed block keeps drawing until the next
    /// [`repack`](Self::repack). Returns whether the handle was present.
    pub fn remove(&mut self, drawable: &DrawableHandle<V>) -> bool {
        match self
            .drawables
            .iter()
            .position(|d| Rc::ptr_eq(d, drawable))
        {
            Some(index) => {
                self.drawables.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registered drawables.
    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Indices the next [`draw`](Self::draw) will issue. Set only by
    /// [`repack`](Self::repack).
    pub fn live_index_count(&self) -> u32 {
        self.live_index_count
    }

    /// Access the underlying buffer backend.
    pub fn buffers(&self) -> &G {
        &self.buffers
    }

    /// Full relinearization: stable-sort the population ascending by
    /// z-order (ties keep insertion order), reassign every slot, regenerate
    /// every record, replace both buffers wholesale, and refresh the live
    /// index count.
    ///
    /// Early-exits without touching anything when no drawable is dirty —
    /// see the module docs for the removal caveat this implies.
    pub fn repack(&mut self) {
        if self.drawables.is_empty() {
            return;
        }
        if !self.drawables.iter().any(|d| d.borrow().is_dirty()) {
            return;
        }

        self.drawables.sort_by_key(|d| d.borrow().z_order());

        let mut vertices: Vec<V> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();

        for handle in &self.drawables {
            let mut drawable = handle.borrow_mut();
            let slot = BufferSlot {
                vertex_offset: vertices.len(),
                index_offset: indices.len(),
            };
            drawable.assign_slot(slot);

            let block_vertices = drawable.vertices();
            let block_indices = drawable.indices(slot.vertex_offset as u32);
            debug_assert_eq!(block_vertices.len(), drawable.vertex_count());
            debug_assert_eq!(block_indices.len(), drawable.index_count());

            vertices.extend(block_vertices);
            indices.extend(block_indices);
            drawable.set_clean();
        }

        self.buffers
            .replace(bytemuck::cast_slice(&vertices), bytemuck::cast_slice(&indices));
        self.live_index_count = indices.len() as u32;
    }

    /// Incremental patch: regenerate every dirty drawable at its recorded
    /// slot and sub-range-write exactly its fixed record counts, leaving
    /// the rest of the buffers untouched. O(dirty count).
    ///
    /// Slots are whatever the last [`repack`](Self::repack) recorded — no
    /// resorting happens here, and a stale slot is written as-is.
    pub fn patch_dirty(&mut self) {
        let vertex_stride = std::mem::size_of::<V>() as u64;
        let index_stride = std::mem::size_of::<u32>() as u64;

        for handle in &self.drawables {
            let mut drawable = handle.borrow_mut();
            if !drawable.is_dirty() {
                continue;
            }

            let slot = drawable.slot();
            let block_vertices = drawable.vertices();
            let block_indices = drawable.indices(slot.vertex_offset as u32);
            debug_assert_eq!(block_vertices.len(), drawable.vertex_count());
            debug_assert_eq!(block_indices.len(), drawable.index_count());

            self.buffers.write_vertices(
                slot.vertex_offset as u64 * vertex_stride,
                bytemuck::cast_slice(&block_vertices),
            );
            self.buffers.write_indices(
                slot.index_offset as u64 * index_stride,
                bytemuck::cast_slice(&block_indices),
            );
            drawable.set_clean();
        }
    }

    /// Issue one indexed draw of the live index count with the given
    /// column-major projection. No-op when the population is empty.
    pub fn draw(&mut self, frame: &mut G::Frame<'_>, projection: Mat4) {
        if self.drawables.is_empty() {
            return;
        }
        self.buffers.draw(frame, projection, self.live_index_count);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::math::{Mat4, Vec2};

    use super::super::buffers::RecordingBuffers;
    use super::super::drawable::Drawable;
    use super::super::sprite::Sprite;
    use super::super::vertex::SpriteVertex;
    use super::super::Color;
    use super::*;

    fn sprite_at(x: f32, z: i32) -> Rc<RefCell<Sprite>> {
        Rc::new(RefCell::new(
            Sprite::new(Vec2::new(x, 0.0), Vec2::new(2.0, 2.0), 0).with_z_order(z),
        ))
    }

    fn renderer() -> BatchRenderer<SpriteVertex, RecordingBuffers> {
        BatchRenderer::new(RecordingBuffers::default())
    }

    const VERTEX_STRIDE: usize = std::mem::size_of::<SpriteVertex>();

    #[test]
    fn repack_sorts_and_counts() {
        // Three sprites registered with z-orders 5, 1, 3.
        let mut batch = renderer();
        let a = sprite_at(50.0, 5);
        let b = sprite_at(10.0, 1);
        let c = sprite_at(30.0, 3);
        batch.add(a.clone());
        batch.add(b.clone());
        batch.add(c.clone());

        batch.repack();

        // 3 quads → 18 live indices, and the packed order is z-ascending.
        assert_eq!(batch.live_index_count(), 18);
        assert_eq!(a.borrow().slot().vertex_offset, 8);
        assert_eq!(b.borrow().slot().vertex_offset, 0);
        assert_eq!(c.borrow().slot().vertex_offset, 4);

        let (vertex_bytes, index_bytes) = batch.buffers().replaces.last().unwrap().clone();
        let packed: &[SpriteVertex] = bytemuck::cast_slice(&vertex_bytes);
        assert_eq!(packed.len(), 12);
        // First block belongs to the z=1 sprite centered at x=10.
        assert_eq!(packed[0].position, [9.0, -1.0]);
        let indices: &[u32] = bytemuck::cast_slice(&index_bytes);
        assert_eq!(&indices[..6], &[0, 1, 2, 2, 3, 0]);
        assert_eq!(&indices[6..12], &[4, 5, 6, 6, 7, 4]);
    }

    #[test]
    fn slots_are_contiguous() {
        let mut batch = renderer();
        let handles: Vec<_> = [(0.0, 2), (1.0, 0), (2.0, 1), (3.0, 1)]
            .iter()
            .map(|&(x, z)| {
                let s = sprite_at(x, z);
                batch.add(s.clone());
                s
            })
            .collect();

        batch.repack();

        // Walk the post-sort order: each block must start where the previous
        // one ended, and the last must end at the totals.
        let mut ordered: Vec<_> = handles
            .iter()
            .map(|h| (h.borrow().slot(), h.borrow().vertex_count(), h.borrow().index_count()))
            .collect();
        ordered.sort_by_key(|(slot, _, _)| slot.vertex_offset);

        let mut vertex_running = 0;
        let mut index_running = 0;
        for (slot, vcount, icount) in ordered {
            assert_eq!(slot.vertex_offset, vertex_running);
            assert_eq!(slot.index_offset, index_running);
            vertex_running += vcount;
            index_running += icount;
        }
        assert_eq!(vertex_running, 16);
        assert_eq!(index_running, 24);
        assert_eq!(batch.live_index_count(), 24);
    }

    #[test]
    fn equal_z_preserves_insertion_order() {
        let mut batch = renderer();
        let first = sprite_at(1.0, 7);
        let second = sprite_at(2.0, 7);
        let third = sprite_at(3.0, 7);
        batch.add(first.clone());
        batch.add(second.clone());
        batch.add(third.clone());

        batch.repack();

        assert_eq!(first.borrow().slot().vertex_offset, 0);
        assert_eq!(second.borrow().slot().vertex_offset, 4);
        assert_eq!(third.borrow().slot().vertex_offset, 8);
    }

    #[test]
    fn add_assigns_no_slot_until_repack() {
        let mut batch = renderer();
        let s = sprite_at(5.0, 0);
        batch.add(s.clone());
        assert_eq!(s.borrow().slot(), crate::render2d::BufferSlot::default());
        assert!(batch.buffers().replaces.is_empty());
        assert_eq!(batch.live_index_count(), 0);
    }

    #[test]
    fn patch_touches_only_the_dirty_block() {
        let mut batch = renderer();
        let a = sprite_at(0.0, 0);
        let b = sprite_at(10.0, 1);
        let c = sprite_at(20.0, 2);
        batch.add(a.clone());
        batch.add(b.clone());
        batch.add(c.clone());
        batch.repack();
        batch.buffers.clear();

        b.borrow_mut().set_color(Color::RED);
        batch.patch_dirty();

        // Exactly one sub-range write per buffer, sized to one quad block.
        assert_eq!(batch.buffers().vertex_writes.len(), 1);
        let (offset, bytes) = &batch.buffers().vertex_writes[0];
        assert_eq!(*offset, 4 * VERTEX_STRIDE as u64);
        assert_eq!(bytes.len(), 4 * VERTEX_STRIDE);
        let patched: &[SpriteVertex] = bytemuck::cast_slice(bytes);
        assert_eq!(patched[0].color, Color::RED.to_array());

        assert_eq!(batch.buffers().index_writes.len(), 1);
        let (offset, bytes) = &batch.buffers().index_writes[0];
        assert_eq!(*offset, 6 * 4);
        assert_eq!(bytes.len(), 6 * 4);

        // No full replacement happened.
        assert!(batch.buffers().replaces.is_empty());
    }

    #[test]
    fn clean_population_writes_nothing() {
        let mut batch = renderer();
        batch.add(sprite_at(0.0, 0));
        batch.add(sprite_at(1.0, 0));
        batch.repack();
        batch.buffers.clear();

        // Everything was cleaned by the repack: both strategies are no-ops.
        batch.repack();
        batch.patch_dirty();
        assert!(batch.buffers().replaces.is_empty());
        assert!(batch.buffers().vertex_writes.is_empty());
        assert!(batch.buffers().index_writes.is_empty());
    }

    #[test]
    fn draw_replays_stale_count_after_removal() {
        let mut batch = renderer();
        let a = sprite_at(0.0, 0);
        let b = sprite_at(1.0, 1);
        batch.add(a.clone());
        batch.add(b.clone());
        batch.repack();
        assert_eq!(batch.live_index_count(), 12);

        let handle: DrawableHandle<SpriteVertex> = b;
        assert!(batch.remove(&handle));

        // No repack ran: the draw still covers both blocks, removed one
        // included.
        batch.draw(&mut (), Mat4::IDENTITY);
        assert_eq!(batch.buffers().draws, vec![12]);
    }

    #[test]
    fn pure_removal_skips_the_next_repack() {
        let mut batch = renderer();
        let a = sprite_at(0.0, 0);
        let b = sprite_at(1.0, 1);
        batch.add(a.clone());
        batch.add(b.clone());
        batch.repack();
        batch.buffers.clear();

        // Removal alone leaves the survivor clean, so the dirty scan bails
        // out and the stale linearization survives.
        let handle: DrawableHandle<SpriteVertex> = b;
        batch.remove(&handle);
        batch.repack();
        assert!(batch.buffers().replaces.is_empty());
        assert_eq!(batch.live_index_count(), 12);

        // Dirtying the survivor is what actually reclaims the slot.
        a.borrow_mut().mark_dirty();
        batch.repack();
        assert_eq!(batch.live_index_count(), 6);
    }

    #[test]
    fn empty_population_never_draws() {
        let mut batch = renderer();
        batch.repack();
        batch.draw(&mut (), Mat4::IDENTITY);
        assert!(batch.buffers().draws.is_empty());

        let s = sprite_at(0.0, 0);
        batch.add(s.clone());
        batch.repack();
        let handle: DrawableHandle<SpriteVertex> = s;
        batch.remove(&handle);
        batch.draw(&mut (), Mat4::IDENTITY);
        assert!(batch.buffers().draws.is_empty());
    }

    #[test]
    fn remove_by_identity_only() {
        let mut batch = renderer();
        let registered = sprite_at(0.0, 0);
        let stranger = sprite_at(0.0, 0);
        batch.add(registered.clone());

        let stranger_handle: DrawableHandle<SpriteVertex> = stranger;
        assert!(!batch.remove(&stranger_handle));
        assert_eq!(batch.len(), 1);

        let handle: DrawableHandle<SpriteVertex> = registered;
        assert!(batch.remove(&handle));
        assert!(batch.is_empty());
    }

    #[test]
    fn patch_writes_at_the_recorded_slot_even_if_stale() {
        let mut batch = renderer();
        let a = sprite_at(0.0, 0);
        let b = sprite_at(10.0, 1);
        batch.add(a.clone());
        batch.add(b.clone());
        batch.repack();

        // Drop the first drawable, then mutate the second: its slot still
        // points at the second block, and patch trusts it verbatim.
        let handle: DrawableHandle<SpriteVertex> = a;
        batch.remove(&handle);
        batch.buffers.clear();

        b.borrow_mut().set_position(Vec2::new(11.0, 0.0));
        batch.patch_dirty();
        let (offset, _) = &batch.buffers().vertex_writes[0];
        assert_eq!(*offset, 4 * VERTEX_STRIDE as u64);
    }
}
