//! WebGPU render pipeline for blob fans
//!
//! Each submitted mesh becomes one draw call with its own `u_fill` and
//! `u_resolution`. Meshes are queued in a [`DrawQueue`] during the draw pass
//! and uploaded in one go when the frame finishes, so every draw keeps its own
//! slice of the vertex buffer and its own dynamic-offset slot in the uniform
//! buffer.

use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use super::MeshSink;
use super::draw_queue::DrawQueue;
use super::shapes::{FanMesh, fan_indices};
use super::vertex::{DrawUniforms, Vertex, colors};
use crate::consts::MAX_FAN_SEGMENTS;
use crate::error::RenderError;

/// Embedded WGSL for the blob pipeline
pub const BLOB_SHADER: &str = include_str!("blob_shader.wgsl");

/// Draws the buffers hold before they grow
const INITIAL_DRAW_CAPACITY: usize = 64;

const UNIFORM_SIZE: u64 = std::mem::size_of::<DrawUniforms>() as u64;
const VERTEX_SIZE: u64 = std::mem::size_of::<Vertex>() as u64;

pub struct BlobRenderer {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub pipeline: wgpu::RenderPipeline,

    uniform_layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    /// Byte distance between dynamic uniform slots
    uniform_stride: u64,
    vertex_buffer: wgpu::Buffer,
    /// Fan indices for `MAX_FAN_SEGMENTS`; shorter fans use a prefix
    index_buffer: wgpu::Buffer,
    /// Draws the uniform and vertex buffers can hold
    draw_capacity: usize,

    pending: DrawQueue,

    /// Drawable size in device pixels
    pub size: (u32, u32),
}

impl BlobRenderer {
    /// Acquire the device, compile the shader and build the pipeline
    ///
    /// Any failure here is fatal; shader compile errors carry the compiler's
    /// messages.
    pub async fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
        shader_source: &str,
    ) -> Result<Self, RenderError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("blob-arena-device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await
            .map_err(|e| RenderError::Device(e.to_string()))?;

        let surface_caps = surface.get_capabilities(adapter);
        log::info!("Surface formats: {:?}", surface_caps.formats);

        // Fill colors are already sRGB-encoded, so prefer a non-sRGB target
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| RenderError::Surface("surface reports no formats".into()))?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        log::info!("Using surface format: {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blob_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });
        check_compilation(&shader).await?;
        log::info!("Shader module compiled");

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blob_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(UNIFORM_SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blob_pipeline_layout"),
            bind_group_layouts: &[&uniform_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("blob_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("fan_index_buffer"),
            contents: bytemuck::cast_slice(&fan_indices(MAX_FAN_SEGMENTS)),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_stride = uniform_stride(device.limits().min_uniform_buffer_offset_alignment);
        let draw_capacity = INITIAL_DRAW_CAPACITY;
        let uniform_buffer = create_uniform_buffer(&device, uniform_stride, draw_capacity);
        let uniform_bind_group = create_uniform_bind_group(&device, &uniform_layout, &uniform_buffer);
        let vertex_buffer = create_vertex_buffer(&device, draw_capacity);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            pipeline,
            uniform_layout,
            uniform_buffer,
            uniform_bind_group,
            uniform_stride,
            vertex_buffer,
            index_buffer,
            draw_capacity,
            pending: DrawQueue::new((width, height)),
            size: (width, height),
        })
    }

    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width > 0 && new_height > 0 {
            self.size = (new_width, new_height);
            self.pending.set_resolution(self.size);
            self.config.width = new_width;
            self.config.height = new_height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigure the surface after it was lost or outdated
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    /// Drop anything queued by an earlier, unfinished frame
    pub fn begin_frame(&mut self) {
        self.pending.clear();
    }

    /// Upload queued meshes and issue one draw per mesh, in submission order
    pub fn finish_frame(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ensure_capacity(self.pending.len());

        if !self.pending.is_empty() {
            self.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(self.pending.vertices()),
            );
            let uniform_bytes = self.pending.uniform_bytes(self.uniform_stride as usize);
            self.queue.write_buffer(&self.uniform_buffer, 0, &uniform_bytes);
        }

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("blob_encoder"),
            });

        {
            let [r, g, b, a] = colors::BACKGROUND.map(f64::from);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("blob_render_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (i, draw) in self.pending.draws().iter().enumerate() {
                let start = draw.first_vertex as u64 * VERTEX_SIZE;
                let end = start + draw.vertex_count as u64 * VERTEX_SIZE;
                let offset = (i as u64 * self.uniform_stride) as u32;

                render_pass.set_bind_group(0, &self.uniform_bind_group, &[offset]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(start..end));
                render_pass.draw_indexed(0..draw.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.begin_frame();
        Ok(())
    }

    /// Grow GPU buffers so `draws` meshes fit
    fn ensure_capacity(&mut self, draws: usize) {
        if draws <= self.draw_capacity {
            return;
        }
        let capacity = draws.next_power_of_two();
        log::info!("Growing blob buffers: {} -> {} draws", self.draw_capacity, capacity);

        self.uniform_buffer = create_uniform_buffer(&self.device, self.uniform_stride, capacity);
        self.uniform_bind_group =
            create_uniform_bind_group(&self.device, &self.uniform_layout, &self.uniform_buffer);
        self.vertex_buffer = create_vertex_buffer(&self.device, capacity);
        self.draw_capacity = capacity;
    }
}

impl MeshSink for BlobRenderer {
    fn draw_mesh(&mut self, mesh: &FanMesh, fill: [f32; 4]) {
        self.pending.draw_mesh(mesh, fill);
    }
}

/// Fail with the compiler's diagnostics if the shader has errors
async fn check_compilation(shader: &wgpu::ShaderModule) -> Result<(), RenderError> {
    let info = shader.get_compilation_info().await;
    let errors: Vec<String> = info
        .messages
        .iter()
        .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
        .map(|m| match &m.location {
            Some(loc) => format!("{}:{}: {}", loc.line_number, loc.line_position, m.message),
            None => m.message.clone(),
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(RenderError::ShaderCompile {
            diagnostics: errors.join("\n"),
        })
    }
}

/// Uniform slot size rounded up to the device's dynamic offset alignment
fn uniform_stride(alignment: u32) -> u64 {
    let alignment = alignment.max(1) as u64;
    UNIFORM_SIZE.div_ceil(alignment) * alignment
}

fn create_uniform_buffer(device: &wgpu::Device, stride: u64, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("blob_uniforms"),
        size: stride * capacity as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_uniform_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("blob_uniform_bind_group"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer,
                offset: 0,
                size: NonZeroU64::new(UNIFORM_SIZE),
            }),
        }],
    })
}

fn create_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    let per_draw = (MAX_FAN_SEGMENTS as u64 + 2) * VERTEX_SIZE;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("blob_vertices"),
        size: per_draw * capacity as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
