//! # Pipeline — one material per vertex family
//!
//! A [`BatchMaterial`] bundles what the GPU needs to draw one primitive
//! family: the render pipeline (shader pair, vertex layout, blend state),
//! the projection uniform buffer with its bind group, and — for the textured
//! families — a bind group exposing the shared texture array.
//!
//! All three materials share the same pipeline shape: triangle lists, no
//! culling (2D quads are double-sided), standard alpha blending, no depth
//! buffer. Layering comes from the batch renderer's z-sorted packing order
//! (painter's algorithm), so a depth test would only break blending of
//! semi-transparent primitives.
//!
//! Bind group 0 is always the projection uniform; bind group 1, when
//! present, is the texture array + sampler. The shape material has no
//! textures at all — lines and points are pure vertex color.

use wgpu::util::DeviceExt;

use crate::render::GpuContext;

use super::texture::TextureArray;
use super::vertex::{CameraUniform, ShapeVertex, SpriteVertex, UiVertex};

/// GPU material for one primitive family.
pub struct BatchMaterial {
    pub(crate) pipeline: wgpu::RenderPipeline,
    pub(crate) camera_buffer: wgpu::Buffer,
    pub(crate) camera_bind_group: wgpu::BindGroup,
    pub(crate) texture_bind_group: Option<wgpu::BindGroup>,
}

impl BatchMaterial {
    /// Material for world sprites: textured quads over [`SpriteVertex`].
    pub fn sprite(gpu: &GpuContext, textures: &TextureArray) -> Self {
        Self::build(
            gpu,
            "sprite",
            include_str!("sprite.wgsl"),
            SpriteVertex::LAYOUT,
            Some(textures),
        )
    }

    /// Material for lines and point markers: untextured [`ShapeVertex`].
    pub fn shape(gpu: &GpuContext) -> Self {
        Self::build(
            gpu,
            "shape",
            include_str!("shape.wgsl"),
            ShapeVertex::LAYOUT,
            None,
        )
    }

    /// Material for UI quads and glyphs over [`UiVertex`].
    pub fn ui(gpu: &GpuContext, textures: &TextureArray) -> Self {
        Self::build(
            gpu,
            "ui",
            include_str!("ui.wgsl"),
            UiVertex::LAYOUT,
            Some(textures),
        )
    }

    fn build(
        gpu: &GpuContext,
        label: &str,
        shader_source: &str,
        vertex_layout: wgpu::VertexBufferLayout<'static>,
        textures: Option<&TextureArray>,
    ) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        // Bind group layout 0: projection uniform
        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("batch camera bind group layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        // Bind group layout 1: texture array + sampler (textured families only)
        let texture_bind_group_layout = textures.map(|_| {
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("batch texture bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2Array,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            })
        });

        let mut bind_group_layouts: Vec<&wgpu::BindGroupLayout> = vec![&camera_bind_group_layout];
        if let Some(layout) = &texture_bind_group_layout {
            bind_group_layouts.push(layout);
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // 2D quads are double-sided
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Projection uniform (identity initially)
        let camera_uniform = CameraUniform {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
        };
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("batch camera uniform buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("batch camera bind group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let texture_bind_group = match (textures, &texture_bind_group_layout) {
            (Some(textures), Some(layout)) => {
                Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("batch texture bind group"),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(textures.view()),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(textures.sampler()),
                        },
                    ],
                }))
            }
            _ => None,
        };

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            texture_bind_group,
        }
    }
}
