//! GPU state and draw passes for the stage.
//!
//! One surface, three pipelines: the plasma background (full-viewport
//! triangle, drawn first), the instanced particle quads, and the spark
//! line list on top. All three blend over the clear color; the draw
//! order is the depth model.

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::error::GpuError;
use crate::field::ParticleInstance;
use crate::plasma::PLASMA_WGSL;
use crate::spark::SparkSegment;

/// Perspective field of view for the particle camera, matching the
/// original site's framing.
const CAMERA_FOV_DEGREES: f32 = 35.0;
/// Camera distance from the particle volume.
const CAMERA_DISTANCE: f32 = 50.0;

const PARTICLE_WGSL: &str = r#"
struct StageParams {
    view_proj: mat4x4<f32>,
    time: f32,
}

@group(0) @binding(0)
var<uniform> stage: StageParams;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
    @location(2) alpha: f32,
}

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) position: vec3<f32>,
    @location(1) scale: f32,
    @location(2) color: vec3<f32>,
    @location(3) alpha: f32,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    let half_size = scale * 0.004;

    var clip_pos = stage.view_proj * vec4<f32>(position, 1.0);
    clip_pos.x += quad_pos.x * half_size * clip_pos.w;
    clip_pos.y += quad_pos.y * half_size * clip_pos.w;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = color;
    out.uv = quad_pos;
    out.alpha = alpha;

    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let soft = 1.0 - smoothstep(0.5, 1.0, dist);
    return vec4<f32>(in.color, soft * in.alpha);
}
"#;

const SPARK_WGSL: &str = r#"
struct SparkParams {
    resolution: vec2<f32>,
    color: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> spark: SparkParams;

@vertex
fn vs_main(@location(0) position: vec2<f32>) -> @builtin(position) vec4<f32> {
    let ndc = vec2<f32>(
        position.x / spark.resolution.x * 2.0 - 1.0,
        1.0 - position.y / spark.resolution.y * 2.0,
    );
    return vec4<f32>(ndc, 0.0, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return spark.color;
}
"#;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct StageUniforms {
    view_proj: [[f32; 4]; 4],
    time: f32,
    _padding: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct SparkUniforms {
    resolution: [f32; 2],
    _padding: [f32; 2],
    color: [f32; 4],
}

/// Everything drawn for one frame. Inert components pass `None`.
pub struct FrameDraw<'a> {
    pub time: f32,
    pub particles: Option<&'a [ParticleInstance]>,
    pub plasma_uniforms: Option<&'a [u8]>,
    pub spark_segments: &'a [SparkSegment],
    pub spark_color: Vec3,
}

struct PlasmaPass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    particle_pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u32,
    stage_uniform_buffer: wgpu::Buffer,
    stage_bind_group: wgpu::BindGroup,
    plasma: Option<PlasmaPass>,
    spark_pipeline: wgpu::RenderPipeline,
    spark_vertex_buffer: wgpu::Buffer,
    spark_capacity: u32,
    spark_uniform_buffer: wgpu::Buffer,
    spark_bind_group: wgpu::BindGroup,
}

impl GpuState {
    /// Bring up the surface and all pipelines.
    ///
    /// `particle_capacity` and `spark_capacity` size the per-frame upload
    /// buffers; `plasma_uniform_size` is the validated uniform table size,
    /// or zero to skip the plasma pass entirely.
    pub async fn new(
        window: Arc<Window>,
        particle_capacity: u32,
        spark_capacity: u32,
        plasma_uniform_size: u32,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(GpuError::NoAdapter)?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Device"),
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: Default::default(),
                },
                None,
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Stage uniforms (camera + clock), shared by the particle pass
        let stage_uniforms = StageUniforms {
            view_proj: view_proj(config.width, config.height).to_cols_array_2d(),
            time: 0.0,
            _padding: [0.0; 3],
        };

        let stage_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Stage Uniform Buffer"),
            contents: bytemuck::bytes_of(&stage_uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let stage_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Stage Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: stage_uniform_buffer.as_entire_binding(),
            }],
        });

        // Particle pass: instanced quads expanded in the vertex stage
        let instance_capacity = particle_capacity.max(1);
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Particle Instance Buffer"),
            size: (instance_capacity as usize * std::mem::size_of::<ParticleInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let particle_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(PARTICLE_WGSL.into()),
        });

        let particle_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let particle_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Particle Pipeline"),
            layout: Some(&particle_layout),
            vertex: wgpu::VertexState {
                module: &particle_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3, // position
                        },
                        wgpu::VertexAttribute {
                            offset: 12,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32, // scale
                        },
                        wgpu::VertexAttribute {
                            offset: 16,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Float32x3, // color
                        },
                        wgpu::VertexAttribute {
                            offset: 28,
                            shader_location: 3,
                            format: wgpu::VertexFormat::Float32, // alpha
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &particle_shader,
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
            multiview: None,
            cache: None,
        });

        // Plasma pass, if a validated component asked for one
        let plasma = if plasma_uniform_size > 0 {
            Some(Self::build_plasma_pass(
                &device,
                &uniform_layout,
                config.format,
                plasma_uniform_size,
            ))
        } else {
            None
        };

        // Spark pass: line list in pixel space
        let spark_capacity = spark_capacity.max(1);
        let spark_vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Spark Vertex Buffer"),
            size: (spark_capacity as usize * 2 * std::mem::size_of::<[f32; 2]>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let spark_uniforms = SparkUniforms {
            resolution: [config.width as f32, config.height as f32],
            _padding: [0.0; 2],
            color: [1.0, 1.0, 1.0, 1.0],
        };
        let spark_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Spark Uniform Buffer"),
            contents: bytemuck::bytes_of(&spark_uniforms),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let spark_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Spark Bind Group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: spark_uniform_buffer.as_entire_binding(),
            }],
        });

        let spark_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Spark Shader"),
            source: wgpu::ShaderSource::Wgsl(SPARK_WGSL.into()),
        });

        let spark_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Spark Pipeline Layout"),
            bind_group_layouts: &[&uniform_layout],
            push_constant_ranges: &[],
        });

        let spark_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Spark Pipeline"),
            layout: Some(&spark_layout),
            vertex: wgpu::VertexState {
                module: &spark_shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        offset: 0,
                        shader_location: 0,
                        format: wgpu::VertexFormat::Float32x2,
                    }],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &spark_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            surface,
            device,
            queue,
            config,
            particle_pipeline,
            instance_buffer,
            instance_capacity,
            stage_uniform_buffer,
            stage_bind_group,
            plasma,
            spark_pipeline,
            spark_vertex_buffer,
            spark_capacity,
            spark_uniform_buffer,
            spark_bind_group,
        })
    }

    fn build_plasma_pass(
        device: &wgpu::Device,
        uniform_layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
        uniform_size: u32,
    ) -> PlasmaPass {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Plasma Uniform Buffer"),
            size: uniform_size as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Plasma Bind Group"),
            layout: uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Plasma Shader"),
            source: wgpu::ShaderSource::Wgsl(PLASMA_WGSL.into()),
        });

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Plasma Pipeline Layout"),
            bind_group_layouts: &[uniform_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Plasma Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
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
            multiview: None,
            cache: None,
        });

        PlasmaPass {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Draw one frame.
    pub fn render(&mut self, draw: &FrameDraw<'_>) -> Result<(), wgpu::SurfaceError> {
        let stage_uniforms = StageUniforms {
            view_proj: view_proj(self.config.width, self.config.height).to_cols_array_2d(),
            time: draw.time,
            _padding: [0.0; 3],
        };
        self.queue.write_buffer(
            &self.stage_uniform_buffer,
            0,
            bytemuck::bytes_of(&stage_uniforms),
        );

        let instance_count = match draw.particles {
            Some(instances) if !instances.is_empty() => {
                let count = (instances.len() as u32).min(self.instance_capacity);
                self.queue.write_buffer(
                    &self.instance_buffer,
                    0,
                    bytemuck::cast_slice(&instances[..count as usize]),
                );
                count
            }
            _ => 0,
        };

        if let (Some(plasma), Some(bytes)) = (&self.plasma, draw.plasma_uniforms) {
            self.queue.write_buffer(&plasma.uniform_buffer, 0, bytes);
        }

        let spark_vertex_count = {
            let max_segments = self.spark_capacity as usize;
            let segments = &draw.spark_segments[..draw.spark_segments.len().min(max_segments)];
            if !segments.is_empty() {
                let vertices: Vec<[f32; 2]> = segments
                    .iter()
                    .flat_map(|s| [s.from.to_array(), s.to.to_array()])
                    .collect();
                self.queue
                    .write_buffer(&self.spark_vertex_buffer, 0, bytemuck::cast_slice(&vertices));

                let spark_uniforms = SparkUniforms {
                    resolution: [self.config.width as f32, self.config.height as f32],
                    _padding: [0.0; 2],
                    color: [draw.spark_color.x, draw.spark_color.y, draw.spark_color.z, 1.0],
                };
                self.queue.write_buffer(
                    &self.spark_uniform_buffer,
                    0,
                    bytemuck::bytes_of(&spark_uniforms),
                );
            }
            (segments.len() * 2) as u32
        };

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.02,
                            g: 0.02,
                            b: 0.05,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Background first, overlays last
            if let (Some(plasma), Some(_)) = (&self.plasma, draw.plasma_uniforms) {
                render_pass.set_pipeline(&plasma.pipeline);
                render_pass.set_bind_group(0, &plasma.bind_group, &[]);
                render_pass.draw(0..3, 0..1);
            }

            if instance_count > 0 {
                render_pass.set_pipeline(&self.particle_pipeline);
                render_pass.set_bind_group(0, &self.stage_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                render_pass.draw(0..6, 0..instance_count);
            }

            if spark_vertex_count > 0 {
                render_pass.set_pipeline(&self.spark_pipeline);
                render_pass.set_bind_group(0, &self.spark_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.spark_vertex_buffer.slice(..));
                render_pass.draw(0..spark_vertex_count, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

fn view_proj(width: u32, height: u32) -> Mat4 {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let proj = Mat4::perspective_rh(CAMERA_FOV_DEGREES.to_radians(), aspect, 0.1, 1000.0);
    let view = Mat4::look_at_rh(
        Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
        Vec3::ZERO,
        Vec3::Y,
    );
    proj * view
}
