use super::helpers;
use crate::constants::{EXPOSURE_ACES, EXPOSURE_LINEAR, POST_UNIFORM_BYTES};
use crate::core::ToneMapping;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    exposure: f32,
    mode: f32,
    _pad: [f32; 2],
}

impl PostUniforms {
    pub(crate) fn for_tone_mapping(tone_mapping: ToneMapping) -> Self {
        let (exposure, mode) = match tone_mapping {
            ToneMapping::Linear => (EXPOSURE_LINEAR, 0.0),
            ToneMapping::AcesFilmic => (EXPOSURE_ACES, 1.0),
        };
        Self {
            exposure,
            mode,
            _pad: [0.0; 2],
        }
    }
}

pub(crate) struct PostResources {
    pub(crate) bgl: wgpu::BindGroupLayout, // hdr tex + sampler + uniform
    pub(crate) uniform_buffer: wgpu::Buffer,
    pub(crate) sampler: wgpu::Sampler,
    pub(crate) tonemap_pipeline: wgpu::RenderPipeline,
    pub(crate) bind_group: wgpu::BindGroup,
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        hdr_view: &wgpu::TextureView,
        swap_format: wgpu::TextureFormat,
        tone_mapping: ToneMapping,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::core::POST_WGSL.into()),
        });
        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
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
                helpers::uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let uniform_buffer = helpers::uniform_buffer(device, "post_uniforms", POST_UNIFORM_BYTES);
        queue.write_buffer(
            &uniform_buffer,
            0,
            bytemuck::bytes_of(&PostUniforms::for_tone_mapping(tone_mapping)),
        );
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post"),
            bind_group_layouts: &[&bgl],
            push_constant_ranges: &[],
        });
        let tonemap_pipeline = helpers::make_post_pipeline(
            device,
            &layout,
            &shader,
            "fs_tonemap",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );
        let bind_group = create_bind_group(device, &bgl, hdr_view, &sampler, &uniform_buffer);
        Self {
            bgl,
            uniform_buffer,
            sampler,
            tonemap_pipeline,
            bind_group,
        }
    }

    /// The HDR view changes on every resize.
    pub(crate) fn rebind(&mut self, device: &wgpu::Device, hdr_view: &wgpu::TextureView) {
        self.bind_group = create_bind_group(device, &self.bgl, hdr_view, &self.sampler, &self.uniform_buffer);
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    bgl: &wgpu::BindGroupLayout,
    hdr_view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniform_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("bg_hdr"),
        layout: bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(hdr_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: uniform_buffer.as_entire_binding(),
            },
        ],
    })
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bind_group: &wgpu::BindGroup,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bind_group, &[]);
    r.draw(0..3, 0..1);
}
