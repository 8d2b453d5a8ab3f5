//! # Torden — Batched 2D Draw-Buffer Engine
//!
//! A retained-mode batching core for 2D rendering with wgpu: heterogeneous
//! primitives (sprites, thick lines, point markers, UI quads, text glyphs)
//! packed into shared vertex/index buffer pairs, kept synchronized with the
//! GPU through incremental patches so quiet frames cost almost nothing.
//!
//! Start at [`render2d`] — the five-operation surface is
//! [`BatchRenderer`](render2d::BatchRenderer)'s `add`, `remove`, `repack`,
//! `patch_dirty`, and `draw`.

pub mod math;
pub mod prelude;
pub mod render;
pub mod render2d;
