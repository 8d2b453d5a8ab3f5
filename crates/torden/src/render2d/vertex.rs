//! # Vertex records — per-corner data sent to the GPU
//!
//! Each primitive family packs its per-vertex attributes into a flat
//! `#[repr(C)]` struct. The GPU reads these as raw bytes at fixed offsets, so
//! the layout must be predictable — no field reordering, no surprise padding.
//! The `bytemuck` traits `Pod` and `Zeroable` let us cast `&[SpriteVertex]`
//! to `&[u8]` for upload without copies.
//!
//! Three families exist, one per pipeline:
//!
//! ```text
//! SpriteVertex (36 bytes)           world sprites
//! ┌──────────┬──────────┬──────────┬─────────┐
//! │ position │ uv       │ color    │ texture │
//! │ [f32;2]  │ [f32;2]  │ [f32;4]  │ i32     │
//! └──────────┴──────────┴──────────┴─────────┘
//!
//! ShapeVertex (40 bytes)            lines and point markers
//! ┌──────────┬──────────┬───────────┬──────┬─────────┐
//! │ position │ color    │ thickness │ kind │ local   │
//! │ [f32;2]  │ [f32;4]  │ f32       │ f32  │ [f32;2] │
//! └──────────┴──────────┴───────────┴──────┴─────────┘
//!
//! UiVertex (40 bytes)               UI quads and text glyphs
//! ┌──────────┬──────────┬──────────┬─────────┬──────┐
//! │ position │ uv       │ color    │ texture │ kind │
//! │ [f32;2]  │ [f32;2]  │ [f32;4]  │ i32     │ i32  │
//! └──────────┴──────────┴──────────┴─────────┴──────┘
//! ```
//!
//! Positions are already in world space — drawables bake their own transform
//! into the corner positions on the CPU, and the shader only applies the
//! projection matrix. That is what lets primitives with different transforms
//! share one draw call.
//!
//! The `kind` fields are consumed by the fragment stage: shape shaders branch
//! between line edge-feathering and circular point masks, UI shaders between
//! font-alpha sampling and plain textured quads.

use bytemuck::{Pod, Zeroable};

/// Fragment-stage discriminator for [`ShapeVertex::kind`]: thick line segment.
pub const SHAPE_KIND_LINE: f32 = 0.0;
/// Fragment-stage discriminator for [`ShapeVertex::kind`]: square point marker.
pub const SHAPE_KIND_POINT: f32 = 1.0;

/// Fragment-stage discriminator for [`UiVertex::kind`]: font glyph (atlas
/// coverage drives alpha).
pub const UI_KIND_TEXT: i32 = 0;
/// Fragment-stage discriminator for [`UiVertex::kind`]: textured/flat element.
pub const UI_KIND_QUAD: i32 = 1;

/// Per-vertex data for world-space sprite quads.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    /// Layer index into the bound texture array.
    pub texture: i32,
}

impl SpriteVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
            // texture layer
            wgpu::VertexAttribute {
                offset: 32,
                shader_location: 3,
                format: wgpu::VertexFormat::Sint32,
            },
        ],
    };
}

/// Per-vertex data shared by thick lines and point markers.
///
/// `local` is a per-corner 0..1 coordinate used by the fragment stage for
/// anti-aliased edges (lines feather across `local.x`, points mask a disc).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
    /// Line thickness or point side length, in world units.
    pub thickness: f32,
    /// [`SHAPE_KIND_LINE`] or [`SHAPE_KIND_POINT`].
    pub kind: f32,
    pub local: [f32; 2],
}

impl ShapeVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<ShapeVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
            // thickness
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32,
            },
            // kind
            wgpu::VertexAttribute {
                offset: 28,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32,
            },
            // local uv
            wgpu::VertexAttribute {
                offset: 32,
                shader_location: 4,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };
}

/// Per-vertex data shared by UI quads and text glyphs.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct UiVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [f32; 4],
    /// Layer index into the bound texture array.
    pub texture: i32,
    /// [`UI_KIND_TEXT`] or [`UI_KIND_QUAD`].
    pub kind: i32,
}

impl UiVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<UiVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // color
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x4,
            },
            // texture layer
            wgpu::VertexAttribute {
                offset: 32,
                shader_location: 3,
                format: wgpu::VertexFormat::Sint32,
            },
            // kind
            wgpu::VertexAttribute {
                offset: 36,
                shader_location: 4,
                format: wgpu::VertexFormat::Sint32,
            },
        ],
    };
}

/// Projection matrix uploaded as a uniform buffer (column-major 4x4).
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes_match_layout_strides() {
        assert_eq!(std::mem::size_of::<SpriteVertex>(), 36);
        assert_eq!(std::mem::size_of::<ShapeVertex>(), 40);
        assert_eq!(std::mem::size_of::<UiVertex>(), 40);
        assert_eq!(SpriteVertex::LAYOUT.array_stride, 36);
        assert_eq!(ShapeVertex::LAYOUT.array_stride, 40);
        assert_eq!(UiVertex::LAYOUT.array_stride, 40);
    }

    #[test]
    fn attribute_offsets_cover_all_fields() {
        // Last attribute offset + its size must equal the stride for the
        // tightly packed records above.
        let last = SpriteVertex::LAYOUT.attributes.last().unwrap();
        assert_eq!(last.offset + 4, SpriteVertex::LAYOUT.array_stride);
        let last = ShapeVertex::LAYOUT.attributes.last().unwrap();
        assert_eq!(last.offset + 8, ShapeVertex::LAYOUT.array_stride);
        let last = UiVertex::LAYOUT.attributes.last().unwrap();
        assert_eq!(last.offset + 4, UiVertex::LAYOUT.array_stride);
    }
}
