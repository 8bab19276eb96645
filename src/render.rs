use crate::constants::{CLEAR_COLOR, GLOBALS_UNIFORM_BYTES, OBJECT_UNIFORM_BYTES, PARTICLE_INSTANCE_BYTES};
use crate::core::geometry::{MeshData, Topology};
use crate::core::scene::{BlendMode, Material, Renderable};
use crate::core::{DeviceProfile, EngineError, FrameView, ResourceHandle, ResourceKind};
use fnv::FnvHashMap;
use glam::Mat4;
use smallvec::SmallVec;
use web_sys as web;
use wgpu::util::DeviceExt;

mod helpers;
mod post;
mod scene;
mod targets;

use post::PostResources;
use scene::{GlobalsUniform, ObjectUniform, ParticleInstance, ScenePipelines, ShadowMap};
use targets::RenderTargets;

/// Device, queue and configured surface for one canvas. Created
/// asynchronously before the engine starts.
pub struct GpuContext {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    pub async fn new(canvas: web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width().max(1);
        let height = canvas.height().max(1);

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    // Default limits; older WebGPU implementations reject unknown fields
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: Some("backdrop_device"),
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| {
                matches!(
                    f,
                    wgpu::TextureFormat::Bgra8UnormSrgb | wgpu::TextureFormat::Rgba8UnormSrgb
                )
            })
            .or_else(|| caps.formats.first().copied())
            .ok_or_else(|| anyhow::anyhow!("surface reports no formats"))?;
        let alpha_mode = caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!("[gpu] device ready format={:?} size={}x{}", format, width, height);
        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    /// Release the device when the context is never installed.
    pub fn destroy(self) {
        self.device.destroy();
    }
}

struct GpuGeometry {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    vertex_count: u32,
    topology: Topology,
}

struct GpuMaterial {
    material: Material,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

struct GpuParticles {
    buffer: wgpu::Buffer,
    capacity: usize,
    live: u32,
}

/// The scene renderer. GPU objects are kept in arenas keyed by the engine's
/// handle ids and destroyed individually when the registry releases them.
pub struct Renderer {
    gpu: GpuContext,
    pipelines: ScenePipelines,
    shadow: ShadowMap,
    targets: RenderTargets,
    post: PostResources,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    geometries: FnvHashMap<u32, GpuGeometry>,
    materials: FnvHashMap<u32, GpuMaterial>,
    particles: FnvHashMap<u32, GpuParticles>,
    instance_scratch: Vec<ParticleInstance>,
    pixel_ratio: f32,
    viewport: [f32; 2],
}

impl Renderer {
    pub fn new(gpu: GpuContext, profile: &DeviceProfile) -> Self {
        let device = &gpu.device;
        let shadow = ShadowMap::new(device, profile.shadows_enabled);
        let pipelines = ScenePipelines::new(device, &shadow.bgl);
        let globals_buffer = helpers::uniform_buffer(device, "globals", GLOBALS_UNIFORM_BYTES);
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &pipelines.globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let targets = RenderTargets::new(device, gpu.config.width, gpu.config.height);
        let post = PostResources::new(
            device,
            &gpu.queue,
            &targets.hdr_view,
            gpu.config.format,
            profile.tone_mapping,
        );
        log::info!(
            "[gpu] renderer ready shadows={} tone_mapping={:?}",
            shadow.enabled,
            profile.tone_mapping
        );
        Self {
            viewport: [gpu.config.width as f32, gpu.config.height as f32],
            gpu,
            pipelines,
            shadow,
            targets,
            post,
            globals_buffer,
            globals_bind_group,
            geometries: FnvHashMap::default(),
            materials: FnvHashMap::default(),
            particles: FnvHashMap::default(),
            instance_scratch: Vec::new(),
            pixel_ratio: 1.0,
        }
    }

    pub fn create_geometry(&mut self, handle: ResourceHandle, mesh: &MeshData) -> Result<(), EngineError> {
        if mesh.vertices.is_empty() || mesh.indices.is_empty() {
            return Err(EngineError::allocation(handle.kind, "empty mesh"));
        }
        let device = &self.gpu.device;
        // Point geometry is drawn instanced, so its vertices double as instances.
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        self.geometries.insert(
            handle.id,
            GpuGeometry {
                vertex_buffer,
                index_buffer,
                index_count: mesh.index_count() as u32,
                vertex_count: mesh.vertex_count() as u32,
                topology: mesh.topology,
            },
        );
        Ok(())
    }

    pub fn create_material(&mut self, handle: ResourceHandle, material: &Material) -> Result<(), EngineError> {
        let device = &self.gpu.device;
        let uniform_buffer = helpers::uniform_buffer(device, "object_uniforms", OBJECT_UNIFORM_BYTES);
        let initial = ObjectUniform::new(material, Mat4::IDENTITY, material.color, material.opacity);
        self.gpu
            .queue
            .write_buffer(&uniform_buffer, 0, bytemuck::bytes_of(&initial));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bg"),
            layout: &self.pipelines.object_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        self.materials.insert(
            handle.id,
            GpuMaterial {
                material: material.clone(),
                uniform_buffer,
                bind_group,
            },
        );
        Ok(())
    }

    pub fn create_particle_buffer(&mut self, handle: ResourceHandle, capacity: usize) -> Result<(), EngineError> {
        let size = PARTICLE_INSTANCE_BYTES * capacity.max(1) as u64;
        if size > self.gpu.device.limits().max_buffer_size {
            return Err(EngineError::allocation(
                ResourceKind::ParticleBuffer,
                format!("{} particles exceed the buffer limit", capacity),
            ));
        }
        let buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("particle_instances"),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.particles.insert(
            handle.id,
            GpuParticles {
                buffer,
                capacity,
                live: 0,
            },
        );
        Ok(())
    }

    /// Destroy the GPU object behind one handle. Unknown ids are ignored.
    pub fn dispose(&mut self, handle: ResourceHandle) {
        match handle.kind {
            ResourceKind::Geometry => {
                if let Some(g) = self.geometries.remove(&handle.id) {
                    g.vertex_buffer.destroy();
                    g.index_buffer.destroy();
                }
            }
            ResourceKind::Material => {
                if let Some(m) = self.materials.remove(&handle.id) {
                    m.uniform_buffer.destroy();
                }
            }
            ResourceKind::ParticleBuffer => {
                if let Some(p) = self.particles.remove(&handle.id) {
                    p.buffer.destroy();
                }
            }
            _ => {}
        }
    }

    pub fn live_objects(&self) -> usize {
        self.geometries.len() + self.materials.len() + self.particles.len()
    }

    /// Resize the surface and offscreen targets to a physical size.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.pixel_ratio = pixel_ratio;
        if width == 0 || height == 0 {
            return;
        }
        if width == self.gpu.config.width && height == self.gpu.config.height {
            return;
        }
        self.gpu.config.width = width;
        self.gpu.config.height = height;
        self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
        self.targets.recreate(&self.gpu.device, width, height);
        self.post.rebind(&self.gpu.device, &self.targets.hdr_view);
        self.viewport = [width as f32, height as f32];
        log::debug!("[gpu] resized to {}x{}", width, height);
    }

    pub fn render(&mut self, frame: &FrameView<'_>) -> Result<(), EngineError> {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.gpu.surface.configure(&self.gpu.device, &self.gpu.config);
                return Err(EngineError::Render("surface lost; reconfigured".into()));
            }
            Err(e) => return Err(EngineError::Render(format!("{:?}", e))),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let scene = frame.scene;
        let globals = GlobalsUniform::new(
            &frame.camera,
            &scene.lights,
            frame.time,
            self.shadow.enabled,
            self.viewport,
            self.pixel_ratio,
        );
        self.gpu
            .queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        // Mesh and line draws: one object uniform per material.
        let mut draws: SmallVec<[Renderable; 64]> = SmallVec::new();
        for item in scene.draw_items() {
            let Some(material) = self.materials.get(&item.renderable.material.id) else {
                continue;
            };
            let uniform = ObjectUniform::from_draw(&material.material, &item);
            self.gpu
                .queue
                .write_buffer(&material.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
            draws.push(item.renderable);
        }

        // Particle layers: refresh the instance buffers.
        for layer in &scene.particles {
            let (Some(particles), Some(material)) = (
                self.particles.get_mut(&layer.buffer.id),
                self.materials.get(&layer.material.id),
            ) else {
                continue;
            };
            let n = layer.system.count().min(particles.capacity);
            self.instance_scratch.clear();
            self.instance_scratch.extend(
                layer.system.positions()[..n]
                    .iter()
                    .zip(&layer.system.colors()[..n])
                    .map(|(p, c)| ParticleInstance {
                        position: p.to_array(),
                        color: *c,
                    }),
            );
            if n > 0 {
                self.gpu.queue.write_buffer(
                    &particles.buffer,
                    0,
                    bytemuck::cast_slice(&self.instance_scratch),
                );
            }
            particles.live = n as u32;
            let uniform = ObjectUniform::new(
                &material.material,
                Mat4::IDENTITY,
                material.material.color,
                layer.opacity,
            );
            self.gpu
                .queue
                .write_buffer(&material.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
        }

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        if self.shadow.enabled {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipelines.shadow);
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for r in &draws {
                let (Some(geometry), Some(material)) = (
                    self.geometries.get(&r.geometry.id),
                    self.materials.get(&r.material.id),
                ) else {
                    continue;
                };
                if !material.material.lit || geometry.topology != Topology::Triangles {
                    continue;
                }
                pass.set_bind_group(1, &material.bind_group, &[]);
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..geometry.index_count, 0, 0..1);
            }
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.targets.hdr_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: CLEAR_COLOR[0],
                            g: CLEAR_COLOR[1],
                            b: CLEAR_COLOR[2],
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.globals_bind_group, &[]);
            pass.set_bind_group(2, &self.shadow.bind_group, &[]);

            for r in &draws {
                let (Some(geometry), Some(material)) = (
                    self.geometries.get(&r.geometry.id),
                    self.materials.get(&r.material.id),
                ) else {
                    continue;
                };
                let pipeline = match (geometry.topology, material.material.blend) {
                    (Topology::Triangles, BlendMode::Alpha) => &self.pipelines.mesh_alpha,
                    (Topology::Triangles, BlendMode::Additive) => &self.pipelines.mesh_additive,
                    (Topology::Lines, _) => &self.pipelines.lines,
                    (Topology::Points, _) => &self.pipelines.points,
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(1, &material.bind_group, &[]);
                pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
                if geometry.topology == Topology::Points {
                    pass.draw(0..6, 0..geometry.vertex_count);
                } else {
                    pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..geometry.index_count, 0, 0..1);
                }
            }

            pass.set_pipeline(&self.pipelines.points);
            for layer in &scene.particles {
                let (Some(particles), Some(material)) = (
                    self.particles.get(&layer.buffer.id),
                    self.materials.get(&layer.material.id),
                ) else {
                    continue;
                };
                if particles.live == 0 {
                    continue;
                }
                pass.set_bind_group(1, &material.bind_group, &[]);
                pass.set_vertex_buffer(0, particles.buffer.slice(..));
                pass.draw(0..6, 0..particles.live);
            }
        }

        post::blit(
            &mut encoder,
            "tonemap",
            &view,
            &self.post.tonemap_pipeline,
            &self.post.bind_group,
        );

        self.gpu.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    /// Destroy every remaining GPU object and the device itself.
    pub fn destroy(self) {
        let leftover = self.live_objects();
        let Renderer {
            gpu,
            shadow,
            targets,
            post,
            globals_buffer,
            geometries,
            materials,
            particles,
            ..
        } = self;
        for g in geometries.into_values() {
            g.vertex_buffer.destroy();
            g.index_buffer.destroy();
        }
        for m in materials.into_values() {
            m.uniform_buffer.destroy();
        }
        for p in particles.into_values() {
            p.buffer.destroy();
        }
        globals_buffer.destroy();
        post.uniform_buffer.destroy();
        shadow.texture.destroy();
        targets.destroy();
        gpu.destroy();
        log::info!("[gpu] device destroyed ({} objects still live)", leftover);
    }
}
