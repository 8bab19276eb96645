use super::helpers::{self, ADDITIVE_BLEND, DEPTH_FORMAT, HDR_FORMAT};
use crate::constants::{
    MAX_POINT_LIGHTS, PARTICLE_INSTANCE_BYTES, SHADOW_DISTANCE, SHADOW_EXTENT, SHADOW_FAR, SHADOW_MAP_SIZE,
};
use crate::core::geometry::MeshVertex;
use crate::core::scene::{DrawItem, Lights, Material};
use crate::core::Camera;
use glam::{Mat4, Vec3};

/// Frame-wide uniform; mirrors `Globals` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct GlobalsUniform {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    camera_pos: [f32; 4],
    ambient: [f32; 4],
    dir_dir: [f32; 4],
    dir_color: [f32; 4],
    point_pos: [[f32; 4]; MAX_POINT_LIGHTS],
    point_color: [[f32; 4]; MAX_POINT_LIGHTS],
    viewport: [f32; 4],
}

impl GlobalsUniform {
    pub(crate) fn new(
        camera: &Camera,
        lights: &Lights,
        time: f32,
        shadows: bool,
        viewport: [f32; 2],
        pixel_ratio: f32,
    ) -> Self {
        let scaled = |c: [f32; 3], k: f32| [c[0] * k, c[1] * k, c[2] * k, 1.0];
        let mut point_pos = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut point_color = [[0.0; 4]; MAX_POINT_LIGHTS];
        for (i, light) in lights.points.iter().take(MAX_POINT_LIGHTS).enumerate() {
            point_pos[i] = light.position.extend(light.range).to_array();
            point_color[i] = scaled(light.color, light.intensity.max(0.0));
        }
        let dir = lights.directional.direction;
        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light_view_proj: light_view_projection(dir).to_cols_array_2d(),
            camera_pos: camera.eye.extend(time).to_array(),
            ambient: scaled(lights.ambient.color, lights.ambient.intensity),
            dir_dir: dir.extend(if shadows { 1.0 } else { 0.0 }).to_array(),
            dir_color: scaled(lights.directional.color, lights.directional.intensity),
            point_pos,
            point_color,
            viewport: [viewport[0], viewport[1], pixel_ratio, 0.0],
        }
    }
}

/// Orthographic light frustum centered on the origin.
pub(crate) fn light_view_projection(direction: Vec3) -> Mat4 {
    let dir = direction.try_normalize().unwrap_or(Vec3::NEG_Y);
    let up = if dir.abs().dot(Vec3::Y) > 0.99 { Vec3::Z } else { Vec3::Y };
    let view = Mat4::look_at_rh(-dir * SHADOW_DISTANCE, Vec3::ZERO, up);
    let proj = Mat4::orthographic_rh(
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        -SHADOW_EXTENT,
        SHADOW_EXTENT,
        1.0,
        SHADOW_FAR,
    );
    proj * view
}

/// Per-object uniform; mirrors `Object` in scene.wgsl.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ObjectUniform {
    model: [[f32; 4]; 4],
    color: [f32; 4],
    params: [f32; 4],
}

impl ObjectUniform {
    pub(crate) fn new(material: &Material, model: Mat4, color: [f32; 3], opacity: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], opacity.clamp(0.0, 1.0)],
            params: [
                material.emissive,
                if material.lit { 1.0 } else { 0.0 },
                material.point_size,
                0.0,
            ],
        }
    }

    pub(crate) fn from_draw(material: &Material, item: &DrawItem) -> Self {
        Self::new(material, item.model, item.color, item.opacity)
    }
}

/// One particle as uploaded to the instance buffer.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct ParticleInstance {
    pub(crate) position: [f32; 3],
    pub(crate) color: [f32; 3],
}

const MESH_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

fn mesh_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<MeshVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &MESH_ATTRIBUTES,
    }
}

/// Point clouds reuse `MeshVertex` data per instance: the normal slot carries
/// the color, which is zero for plain point geometry.
fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: PARTICLE_INSTANCE_BYTES,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBUTES,
    }
}

pub(crate) struct ScenePipelines {
    pub(crate) globals_bgl: wgpu::BindGroupLayout,
    pub(crate) object_bgl: wgpu::BindGroupLayout,
    pub(crate) mesh_alpha: wgpu::RenderPipeline,
    pub(crate) mesh_additive: wgpu::RenderPipeline,
    pub(crate) lines: wgpu::RenderPipeline,
    pub(crate) points: wgpu::RenderPipeline,
    pub(crate) shadow: wgpu::RenderPipeline,
}

struct PipelineDesc<'a> {
    label: &'a str,
    vs: &'a str,
    fs: &'a str,
    buffer: wgpu::VertexBufferLayout<'static>,
    topology: wgpu::PrimitiveTopology,
    blend: wgpu::BlendState,
    depth_write: bool,
}

impl ScenePipelines {
    pub(crate) fn new(device: &wgpu::Device, shadow_bgl: &wgpu::BindGroupLayout) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::SCENE_WGSL.into()),
        });
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[helpers::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let object_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object_bgl"),
            entries: &[helpers::uniform_entry(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });
        let main_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_scene"),
            bind_group_layouts: &[&globals_bgl, &object_bgl, shadow_bgl],
            push_constant_ranges: &[],
        });
        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_shadow"),
            bind_group_layouts: &[&globals_bgl, &object_bgl],
            push_constant_ranges: &[],
        });

        let make = |desc: PipelineDesc| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(desc.label),
                layout: Some(&main_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some(desc.vs),
                    buffers: &[desc.buffer],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                primitive: wgpu::PrimitiveState {
                    topology: desc.topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: desc.depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some(desc.fs),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: HDR_FORMAT,
                        blend: Some(desc.blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                cache: None,
                multiview: None,
            })
        };

        let mesh_alpha = make(PipelineDesc {
            label: "mesh_alpha",
            vs: "vs_mesh",
            fs: "fs_mesh",
            buffer: mesh_layout(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: wgpu::BlendState::ALPHA_BLENDING,
            depth_write: true,
        });
        let mesh_additive = make(PipelineDesc {
            label: "mesh_additive",
            vs: "vs_mesh",
            fs: "fs_mesh",
            buffer: mesh_layout(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: ADDITIVE_BLEND,
            depth_write: false,
        });
        let lines = make(PipelineDesc {
            label: "lines",
            vs: "vs_mesh",
            fs: "fs_mesh",
            buffer: mesh_layout(),
            topology: wgpu::PrimitiveTopology::LineList,
            blend: ADDITIVE_BLEND,
            depth_write: false,
        });
        let points = make(PipelineDesc {
            label: "points",
            vs: "vs_points",
            fs: "fs_points",
            buffer: instance_layout(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            blend: ADDITIVE_BLEND,
            depth_write: false,
        });

        let shadow = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow"),
            layout: Some(&shadow_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                buffers: &[mesh_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: None,
            cache: None,
            multiview: None,
        });

        Self {
            globals_bgl,
            object_bgl,
            mesh_alpha,
            mesh_additive,
            lines,
            points,
            shadow,
        }
    }
}

/// Depth map sampled by the lit mesh shader. When shadows are disabled a
/// 1×1 map keeps the bind group layout valid.
pub(crate) struct ShadowMap {
    pub(crate) enabled: bool,
    pub(crate) texture: wgpu::Texture,
    pub(crate) view: wgpu::TextureView,
    pub(crate) bgl: wgpu::BindGroupLayout,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl ShadowMap {
    pub(crate) fn new(device: &wgpu::Device, enabled: bool) -> Self {
        let size = if enabled { SHADOW_MAP_SIZE } else { 1 };
        let (texture, view) = helpers::create_depth_texture(device, "shadow_map", size, size);
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Depth,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_bg"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });
        Self {
            enabled,
            texture,
            view,
            bgl,
            bind_group,
        }
    }
}
