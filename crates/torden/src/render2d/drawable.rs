//! # Drawable — the contract between primitives and the batch renderer
//!
//! A drawable is anything that contributes a fixed-size block of vertex and
//! index records to a batched buffer pair: a sprite, a thick line, a point
//! marker, a UI quad, a glyph. The renderer never looks inside a drawable's
//! attributes — it only asks for the finished records, plus a little
//! bookkeeping metadata:
//!
//! - a **sticky dirty flag**, raised by every mutator and cleared only by the
//!   renderer once it has consumed the regenerated geometry;
//! - a **z-order** (ascending draw priority) and an informational texture key;
//! - **fixed record counts** — a concrete type must report the same
//!   `vertex_count`/`index_count` for its entire lifetime, because the
//!   renderer patches its buffer region in place between full rebuilds;
//! - a [`BufferSlot`] recording where in the linear buffers the drawable's
//!   block currently lives. Slots are assigned only during a full repack and
//!   go stale if the population changes afterwards — that staleness is the
//!   caller-discipline cost of cheap incremental patching (see
//!   [`BatchRenderer`](super::batch::BatchRenderer)).
//!
//! Drawables are shared: the renderer holds one strong handle, the host
//! usually keeps another to mutate attributes frame to frame. That dual
//! ownership is modeled with `Rc<RefCell<…>>` ([`DrawableHandle`]), which is
//! fine because everything here runs on the single frame-owning thread.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to a drawable, held by both the renderer and the host.
pub type DrawableHandle<V> = Rc<RefCell<dyn Drawable<V>>>;

/// Position of a drawable's block within the linear buffers, in records.
///
/// Assigned by the renderer during a full repack; meaningless before the
/// first repack and stale after any membership or z-order change that hasn't
/// been followed by one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BufferSlot {
    pub vertex_offset: usize,
    pub index_offset: usize,
}

/// A renderable primitive contributing a fixed-size record block.
///
/// Generic over the vertex record type `V` so that each primitive family
/// (sprite, shape, UI) gets its own statically typed renderer; within a
/// family, concrete types are mixed as trait objects.
pub trait Drawable<V> {
    /// Whether this drawable's geometry needs regenerating. Sticky — set by
    /// mutators, never self-clearing.
    fn is_dirty(&self) -> bool;

    /// Clear the dirty flag. Called by the renderer after consuming geometry.
    fn set_clean(&mut self);

    /// Ascending draw priority. Ties keep population order.
    fn z_order(&self) -> i32;

    /// Opaque binding identifier. Informational only — the renderer does not
    /// partition buffers by texture.
    fn texture_key(&self) -> i32;

    /// Number of vertex records produced by [`vertices`](Self::vertices).
    /// Constant for the lifetime of the instance.
    fn vertex_count(&self) -> usize;

    /// Number of index records produced by [`indices`](Self::indices).
    /// Constant for the lifetime of the instance.
    fn index_count(&self) -> usize;

    /// Recompute world-space geometry from current attributes. Returns
    /// exactly [`vertex_count`](Self::vertex_count) records in a fixed
    /// winding order.
    fn vertices(&self) -> Vec<V>;

    /// Index records referencing this drawable's own vertex block, offset by
    /// `base`. Returns exactly [`index_count`](Self::index_count) values.
    fn indices(&self, base: u32) -> Vec<u32>;

    /// The block position recorded at the last full repack.
    fn slot(&self) -> BufferSlot;

    /// Record the block position. Only the renderer calls this.
    fn assign_slot(&mut self, slot: BufferSlot);
}

/// Two-triangle index pattern for a quad: `0,1,2 / 2,3,0`, offset by `base`.
///
/// Every current concrete type is quad-shaped, so they all share this.
pub(crate) fn quad_indices(base: u32) -> Vec<u32> {
    vec![base, base + 1, base + 2, base + 2, base + 3, base]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_pattern() {
        assert_eq!(quad_indices(0), vec![0, 1, 2, 2, 3, 0]);
        assert_eq!(quad_indices(8), vec![8, 9, 10, 10, 11, 8]);
    }
}
