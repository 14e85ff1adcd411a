use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::device::Gpu;
use crate::scene::{
    FrameSubmission, GeometryDesc, MaterialDesc, PostPass, ResourceHandle, ResourceKind,
    SceneBackend, SceneError, SurfaceSize, TextureDesc,
};

use super::pipelines::{CameraUniform, MaterialUniform, MeshPipeline, PostPipelines, PostUniform};
use super::shaders;
use super::targets::OffscreenTargets;

struct GpuGeometry {
    vertices: wgpu::Buffer,
    indices: wgpu::Buffer,
    index_count: u32,
}

struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

struct GpuMaterial {
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    tint: [f32; 4],
}

struct GpuPass {
    pipeline: wgpu::RenderPipeline,
    uniform: wgpu::Buffer,
    params: [f32; 4],
}

/// [`SceneBackend`] on wgpu.
///
/// Frame layout:
/// 1. planes are drawn into offscreen target A
/// 2. each post pass samples the previous target and writes the next one;
///    the last pass writes the swapchain image (a plain blit if the chain
///    has no effects)
pub struct WgpuSceneBackend {
    gpu: Gpu,
    sampler: wgpu::Sampler,
    mesh: MeshPipeline,
    post: PostPipelines,
    blit: GpuPass,
    camera_buffer: wgpu::Buffer,
    camera_group: wgpu::BindGroup,
    targets: OffscreenTargets,

    geometries: HashMap<u64, GpuGeometry>,
    textures: HashMap<u64, GpuTexture>,
    materials: HashMap<u64, GpuMaterial>,
    passes: HashMap<u64, GpuPass>,
    next_id: u64,
}

impl WgpuSceneBackend {
    pub fn new(gpu: Gpu) -> Self {
        let device = gpu.device();
        let format = gpu.surface_format();

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("glide linear sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let mesh = MeshPipeline::new(device, format);
        let post = PostPipelines::new(device, format);

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("glide camera ubo"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glide camera bind group"),
            layout: &mesh.camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let blit = GpuPass {
            pipeline: post.pipeline(device, shaders::BLIT_ENTRY),
            uniform: post_uniform_buffer(device),
            params: [0.0; 4],
        };

        let size = gpu.size();
        let targets = OffscreenTargets::new(device, format, size.width, size.height);

        Self {
            gpu,
            sampler,
            mesh,
            post,
            blit,
            camera_buffer,
            camera_group,
            targets,
            geometries: HashMap::new(),
            textures: HashMap::new(),
            materials: HashMap::new(),
            passes: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn gpu(&self) -> &Gpu {
        &self.gpu
    }

    fn issue(&mut self, kind: ResourceKind) -> ResourceHandle {
        let handle = ResourceHandle::new(kind, self.next_id);
        self.next_id += 1;
        handle
    }
}

fn post_uniform_buffer(device: &wgpu::Device) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("glide post ubo"),
        size: std::mem::size_of::<PostUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn clear_color(c: [f32; 4]) -> wgpu::Color {
    wgpu::Color {
        r: f64::from(c[0]),
        g: f64::from(c[1]),
        b: f64::from(c[2]),
        a: f64::from(c[3]),
    }
}

fn color_attachment(view: &wgpu::TextureView, clear: wgpu::Color) -> wgpu::RenderPassColorAttachment<'_> {
    wgpu::RenderPassColorAttachment {
        view,
        resolve_target: None,
        ops: wgpu::Operations {
            load: wgpu::LoadOp::Clear(clear),
            store: wgpu::StoreOp::Store,
        },
        depth_slice: None,
    }
}

impl SceneBackend for WgpuSceneBackend {
    fn resize(&mut self, size: SurfaceSize) -> Result<(), SceneError> {
        let physical = self.gpu.window().inner_size();
        self.gpu.resize(physical);
        if physical.width == 0 || physical.height == 0 {
            // Minimized; keep the old targets until there is area again.
            return Ok(());
        }
        if self.targets.size() != (physical.width, physical.height) {
            self.targets = OffscreenTargets::new(
                self.gpu.device(),
                self.gpu.surface_format(),
                physical.width,
                physical.height,
            );
        }
        log::debug!(
            "render targets {}x{} px for {}x{} logical",
            physical.width,
            physical.height,
            size.width,
            size.height
        );
        Ok(())
    }

    fn create_geometry(&mut self, desc: &GeometryDesc) -> Result<ResourceHandle, SceneError> {
        if desc.indices.is_empty() {
            return Err(SceneError::InvalidResource(format!("{} has no indices", desc.label)));
        }
        let device = self.gpu.device();
        let geometry = GpuGeometry {
            vertices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(desc.label),
                contents: bytemuck::cast_slice(&desc.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            }),
            indices: device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(desc.label),
                contents: bytemuck::cast_slice(&desc.indices),
                usage: wgpu::BufferUsages::INDEX,
            }),
            index_count: desc.indices.len() as u32,
        };
        let handle = self.issue(ResourceKind::Geometry);
        self.geometries.insert(handle.id(), geometry);
        Ok(handle)
    }

    fn create_texture(&mut self, desc: &TextureDesc) -> Result<ResourceHandle, SceneError> {
        let expected = desc.width as usize * desc.height as usize * 4;
        if desc.width == 0 || desc.height == 0 || desc.rgba.len() != expected {
            return Err(SceneError::InvalidResource(format!(
                "{}: {} bytes for {}x{}",
                desc.label,
                desc.rgba.len(),
                desc.width,
                desc.height
            )));
        }

        let size = wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: 1,
        };
        let texture = self.gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label.as_str()),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &desc.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(desc.width * 4),
                rows_per_image: Some(desc.height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let handle = self.issue(ResourceKind::Texture);
        self.textures.insert(handle.id(), GpuTexture { texture, view });
        Ok(handle)
    }

    fn create_material(&mut self, desc: &MaterialDesc) -> Result<ResourceHandle, SceneError> {
        let texture = self
            .textures
            .get(&desc.texture.id())
            .ok_or(SceneError::UnknownResource(desc.texture))?;

        let device = self.gpu.device();
        let initial = MaterialUniform {
            model: glam::Mat4::IDENTITY.to_cols_array_2d(),
            tint: desc.tint,
        };
        let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("glide material ubo"),
            contents: bytemuck::bytes_of(&initial),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("glide material bind group"),
            layout: &self.mesh.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let handle = self.issue(ResourceKind::Material);
        self.materials.insert(
            handle.id(),
            GpuMaterial {
                uniform,
                bind_group,
                tint: desc.tint,
            },
        );
        Ok(handle)
    }

    fn create_pass(&mut self, pass: &PostPass) -> Result<ResourceHandle, SceneError> {
        let PostPass::Effect(effect) = pass else {
            return Err(SceneError::InvalidResource("the render pass is implicit".into()));
        };
        let device = self.gpu.device();
        let gpu_pass = GpuPass {
            pipeline: self.post.pipeline(device, shaders::effect_entry(effect)),
            uniform: post_uniform_buffer(device),
            params: effect.params(),
        };
        let handle = self.issue(ResourceKind::Pass);
        self.passes.insert(handle.id(), gpu_pass);
        log::debug!("post pass {} compiled", effect.name());
        Ok(handle)
    }

    fn submit(&mut self, frame: &FrameSubmission<'_>) -> Result<(), SceneError> {
        // Resolve every handle before touching the swapchain.
        let mut draws = Vec::with_capacity(frame.draws.len());
        for draw in frame.draws {
            let geometry = self
                .geometries
                .get(&draw.geometry.id())
                .ok_or(SceneError::UnknownResource(draw.geometry))?;
            let material = self
                .materials
                .get(&draw.material.id())
                .ok_or(SceneError::UnknownResource(draw.material))?;
            draws.push((geometry, material, draw.model));
        }
        let mut chain = Vec::with_capacity(frame.passes.len().max(1));
        for handle in frame.passes {
            chain.push(self.passes.get(&handle.id()).ok_or(SceneError::UnknownResource(*handle))?);
        }
        if chain.is_empty() {
            chain.push(&self.blit);
        }

        let mut gpu_frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(&err);
                log::warn!("surface frame unavailable ({err}); {action:?}");
                return Err(action.into_scene_error(&err));
            }
        };

        let queue = self.gpu.queue();
        let device = self.gpu.device();

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: frame.view_projection().to_cols_array_2d(),
            }),
        );
        for (_, material, model) in &draws {
            queue.write_buffer(
                &material.uniform,
                0,
                bytemuck::bytes_of(&MaterialUniform {
                    model: model.to_cols_array_2d(),
                    tint: material.tint,
                }),
            );
        }
        for pass in &chain {
            queue.write_buffer(
                &pass.uniform,
                0,
                bytemuck::bytes_of(&PostUniform {
                    resolution: frame.uniforms.resolution,
                    time: frame.uniforms.time,
                    velocity: frame.uniforms.scroll_velocity,
                    params: pass.params,
                }),
            );
        }

        {
            let mut rpass = gpu_frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("glide scene pass"),
                color_attachments: &[Some(color_attachment(
                    self.targets.view(0),
                    clear_color(frame.clear_color),
                ))],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&self.mesh.pipeline);
            rpass.set_bind_group(0, &self.camera_group, &[]);
            for (geometry, material, _) in &draws {
                rpass.set_bind_group(1, &material.bind_group, &[]);
                rpass.set_vertex_buffer(0, geometry.vertices.slice(..));
                rpass.set_index_buffer(geometry.indices.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..geometry.index_count, 0, 0..1);
            }
        }

        let last = chain.len() - 1;
        for (i, pass) in chain.iter().enumerate() {
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("glide post bind group"),
                layout: &self.post.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(self.targets.view(i)),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: pass.uniform.as_entire_binding(),
                    },
                ],
            });
            let output = if i == last { &gpu_frame.view } else { self.targets.view(i + 1) };

            let mut rpass = gpu_frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("glide post pass"),
                color_attachments: &[Some(color_attachment(output, wgpu::Color::BLACK))],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });
            rpass.set_pipeline(&pass.pipeline);
            rpass.set_bind_group(0, &bind_group, &[]);
            rpass.draw(0..3, 0..1);
        }

        self.gpu.submit(gpu_frame);
        Ok(())
    }

    fn release(&mut self, handle: ResourceHandle) {
        let id = handle.id();
        let found = match handle.kind() {
            ResourceKind::Geometry => self.geometries.remove(&id).is_some(),
            ResourceKind::Texture => self.textures.remove(&id).map(|t| t.texture.destroy()).is_some(),
            ResourceKind::Material => self.materials.remove(&id).is_some(),
            ResourceKind::Pass => self.passes.remove(&id).is_some(),
        };
        if !found {
            log::debug!("release of unknown {handle:?} ignored");
        }
    }
}
