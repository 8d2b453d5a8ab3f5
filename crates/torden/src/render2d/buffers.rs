//! # Geometry buffers — the resource seam under the batch renderer
//!
//! [`GeometryBuffers`] is the narrow interface the batch renderer drives: a
//! full buffer-pair replacement, byte-offset sub-range writes into either
//! buffer, and an indexed draw into a backend-defined frame type. Everything
//! above this trait is pure CPU bookkeeping, which is what makes the
//! renderer testable without a GPU — the unit tests run against an
//! in-memory recorder.
//!
//! [`WgpuGeometry`] is the real backend: a vertex/index `wgpu::Buffer` pair
//! plus the [`BatchMaterial`] that knows how to draw them. Buffers are sized
//! to the capacity chosen at construction; a full replacement that outgrows
//! the capacity recreates the buffer instead of failing, so a zero-capacity
//! construction behaves as "grow on every full reload". Sub-range writes
//! never grow anything — they trust the offsets recorded at the last full
//! repack, which is exactly the contract the renderer's patch path relies
//! on.

use wgpu::util::DeviceExt;

use crate::math::Mat4;
use crate::render::GpuContext;

use super::pipeline::BatchMaterial;
use super::vertex::CameraUniform;

/// Buffer-pair resource consumed by the batch renderer.
///
/// `Frame` is whatever the backend needs to record a draw into — a
/// `wgpu::RenderPass` for the GPU backend, `()` for test recorders.
pub trait GeometryBuffers {
    type Frame<'a>;

    /// Replace both buffers wholesale with freshly packed data.
    fn replace(&mut self, vertices: &[u8], indices: &[u8]);

    /// Overwrite a byte range of the vertex buffer in place.
    fn write_vertices(&mut self, offset: u64, bytes: &[u8]);

    /// Overwrite a byte range of the index buffer in place.
    fn write_indices(&mut self, offset: u64, bytes: &[u8]);

    /// Bind material state and issue one indexed draw of `index_count`
    /// indices with the given column-major projection.
    fn draw(&mut self, frame: &mut Self::Frame<'_>, projection: Mat4, index_count: u32);
}

/// wgpu-backed buffer pair plus its material.
pub struct WgpuGeometry {
    device: wgpu::Device,
    queue: wgpu::Queue,
    material: BatchMaterial,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: u64,
    index_capacity: u64,
}

impl WgpuGeometry {
    /// Allocate a buffer pair sized for `max_vertices` records of type `V`
    /// and `max_indices` u32 records. Passing zero for both defers all
    /// allocation to the first full reload.
    pub fn new<V: bytemuck::Pod>(
        gpu: &GpuContext,
        material: BatchMaterial,
        max_vertices: usize,
        max_indices: usize,
    ) -> Self {
        let vertex_capacity = (max_vertices * std::mem::size_of::<V>()) as u64;
        let index_capacity = (max_indices * std::mem::size_of::<u32>()) as u64;

        let vertex_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("batch vertex buffer"),
            size: vertex_capacity,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let index_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("batch index buffer"),
            size: index_capacity,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            device: gpu.device.clone(),
            queue: gpu.queue.clone(),
            material,
            vertex_buffer,
            index_buffer,
            vertex_capacity,
            index_capacity,
        }
    }
}

impl GeometryBuffers for WgpuGeometry {
    type Frame<'a> = wgpu::RenderPass<'a>;

    fn replace(&mut self, vertices: &[u8], indices: &[u8]) {
        if (vertices.len() as u64) <= self.vertex_capacity {
            self.queue.write_buffer(&self.vertex_buffer, 0, vertices);
        } else {
            self.vertex_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("batch vertex buffer"),
                    contents: vertices,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
            self.vertex_capacity = vertices.len() as u64;
        }

        if (indices.len() as u64) <= self.index_capacity {
            self.queue.write_buffer(&self.index_buffer, 0, indices);
        } else {
            self.index_buffer = self
                .device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("batch index buffer"),
                    contents: indices,
                    usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                });
            self.index_capacity = indices.len() as u64;
        }
    }

    fn write_vertices(&mut self, offset: u64, bytes: &[u8]) {
        self.queue.write_buffer(&self.vertex_buffer, offset, bytes);
    }

    fn write_indices(&mut self, offset: u64, bytes: &[u8]) {
        self.queue.write_buffer(&self.index_buffer, offset, bytes);
    }

    fn draw(&mut self, pass: &mut wgpu::RenderPass<'_>, projection: Mat4, index_count: u32) {
        let uniform = CameraUniform {
            view_proj: projection.to_cols_array_2d(),
        };
        self.queue.write_buffer(
            &self.material.camera_buffer,
            0,
            bytemuck::cast_slice(&[uniform]),
        );

        pass.set_pipeline(&self.material.pipeline);
        pass.set_bind_group(0, &self.material.camera_bind_group, &[]);
        if let Some(textures) = &self.material.texture_bind_group {
            pass.set_bind_group(1, textures, &[]);
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        if index_count > 0 {
            pass.draw_indexed(0..index_count, 0, 0..1);
        }
    }
}

/// In-memory recorder used by the renderer's unit tests.
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingBuffers {
    /// Full replacements: (vertex bytes, index bytes).
    pub replaces: Vec<(Vec<u8>, Vec<u8>)>,
    /// Sub-range vertex writes: (byte offset, bytes).
    pub vertex_writes: Vec<(u64, Vec<u8>)>,
    /// Sub-range index writes: (byte offset, bytes).
    pub index_writes: Vec<(u64, Vec<u8>)>,
    /// Index counts of issued draws.
    pub draws: Vec<u32>,
}

#[cfg(test)]
impl RecordingBuffers {
    pub fn clear(&mut self) {
        self.replaces.clear();
        self.vertex_writes.clear();
        self.index_writes.clear();
        self.draws.clear();
    }
}

#[cfg(test)]
impl GeometryBuffers for RecordingBuffers {
    type Frame<'a> = ();

    fn replace(&mut self, vertices: &[u8], indices: &[u8]) {
        self.replaces.push((vertices.to_vec(), indices.to_vec()));
    }

    fn write_vertices(&mut self, offset: u64, bytes: &[u8]) {
        self.vertex_writes.push((offset, bytes.to_vec()));
    }

    fn write_indices(&mut self, offset: u64, bytes: &[u8]) {
        self.index_writes.push((offset, bytes.to_vec()));
    }

    fn draw(&mut self, _frame: &mut (), _projection: Mat4, index_count: u32) {
        self.draws.push(index_count);
    }
}
