//! # Texture array — image layers behind one bind group
//!
//! The batch renderer deliberately does not partition its buffers by
//! texture: a single draw call covers the whole population, so every texture
//! a population can reference must be reachable from one bound resource.
//! The answer here is a 2D array texture — a stack of same-sized RGBA
//! layers — where the per-vertex `texture` attribute selects the layer in
//! the fragment shader.
//!
//! Layer 0 is always solid white. An untextured primitive samples it and
//! multiplies by its tint color, producing a flat fill through the same
//! shader path as everything else — no separate "untextured" pipeline.
//!
//! Layers share the dimensions chosen at construction. That suits the
//! intended use (same-sized atlas pages: sprite sheets, font atlases, widget
//! skins); loading a mismatched image is a construction-time bug and
//! panics.

use crate::render::GpuContext;

/// A stack of same-sized RGBA texture layers plus the shared sampler.
pub struct TextureArray {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: wgpu::Sampler,
    width: u32,
    height: u32,
    layer_count: u32,
    next_layer: u32,
}

impl TextureArray {
    /// Allocate `layers` RGBA layers of `width` × `height`. Layer 0 is
    /// filled with solid white.
    pub fn new(gpu: &GpuContext, width: u32, height: u32, layers: u32) -> Self {
        assert!(layers >= 1, "texture array needs at least the white layer");

        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("batch texture array"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: layers,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("batch texture array view"),
            dimension: Some(wgpu::TextureViewDimension::D2Array),
            ..Default::default()
        });

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("batch texture sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let mut this = Self {
            texture,
            view,
            sampler,
            width,
            height,
            layer_count: layers,
            next_layer: 0,
        };

        // Layer 0: solid white, so tint-only primitives have something to
        // sample.
        let white = vec![255u8; (width * height * 4) as usize];
        this.push_rgba(gpu, &white);
        this
    }

    /// The always-white layer.
    pub fn white(&self) -> i32 {
        0
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn sampler(&self) -> &wgpu::Sampler {
        &self.sampler
    }

    /// Upload raw RGBA8 pixels (layer-sized) into the next free layer and
    /// return its index for use as a per-vertex texture attribute.
    pub fn push_rgba(&mut self, gpu: &GpuContext, data: &[u8]) -> i32 {
        assert!(
            self.next_layer < self.layer_count,
            "texture array full ({} layers)",
            self.layer_count
        );
        assert_eq!(
            data.len() as u32,
            self.width * self.height * 4,
            "layer data must be {}x{} RGBA",
            self.width,
            self.height
        );

        let layer = self.next_layer;
        gpu.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: layer,
                },
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        self.next_layer += 1;
        layer as i32
    }

    /// Load a PNG/JPEG from disk into the next free layer.
    ///
    /// The image must match the layer dimensions exactly.
    pub fn load(&mut self, gpu: &GpuContext, path: &str) -> i32 {
        let img = image::open(path)
            .unwrap_or_else(|e| panic!("Failed to load texture '{}': {}", path, e))
            .to_rgba8();
        let (width, height) = img.dimensions();
        assert_eq!(
            (width, height),
            (self.width, self.height),
            "texture '{}' is {}x{}, array layers are {}x{}",
            path,
            width,
            height,
            self.width,
            self.height
        );
        self.push_rgba(gpu, &img.into_raw())
    }
}
