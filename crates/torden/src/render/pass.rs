//! Per-frame orchestration: acquire the surface, clear, hand out render
//! passes, present.
//!
//! The only recoverable error in the whole frame path is surface
//! acquisition ([`wgpu::SurfaceError`]); it propagates out of
//! [`begin_frame`] so the host can reconfigure on `Outdated`/`Lost` and
//! retry next frame. Everything after acquisition is infallible.

use super::gpu::GpuContext;

/// The background clear color.
#[derive(Debug, Clone, Copy)]
pub struct ClearColor(pub [f64; 4]);

impl Default for ClearColor {
    fn default() -> Self {
        // A pleasant dark blue, like a night sky.
        Self([0.1, 0.1, 0.15, 1.0])
    }
}

/// One in-flight frame: the acquired surface texture, its view, and the
/// command encoder every batch draws into.
pub struct FrameContext<'gpu> {
    gpu: &'gpu GpuContext,
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    output: wgpu::SurfaceTexture,
}

/// Acquire the next surface texture, clear it, and open a frame.
pub fn begin_frame(
    gpu: &GpuContext,
    clear_color: ClearColor,
) -> Result<FrameContext<'_>, wgpu::SurfaceError> {
    let output = gpu.surface.get_current_texture()?;
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());

    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("torden frame encoder"),
        });

    // Clear pass: runs first so later passes can load what's there.
    {
        let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: clear_color.0[0],
                        g: clear_color.0[1],
                        b: clear_color.0[2],
                        a: clear_color.0[3],
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }

    Ok(FrameContext {
        gpu,
        encoder,
        view,
        output,
    })
}

impl FrameContext<'_> {
    /// Open a render pass over the frame's surface view, loading what
    /// earlier passes drew. Drop the pass before opening the next one.
    pub fn pass(&mut self) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("batch pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        })
    }

    /// Submit the frame's commands and present the surface texture.
    pub fn present(self) {
        self.gpu.queue.submit(std::iter::once(self.encoder.finish()));
        self.output.present();
    }
}
