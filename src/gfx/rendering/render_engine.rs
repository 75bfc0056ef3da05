//! WGPU-based rendering engine
//!
//! Uploads a [`Scene`]'s meshes and textures once, then executes the scene's
//! [`FramePlan`] every frame with the uniforms its shader sinks collected.

use std::{collections::HashMap, sync::Arc};

use anyhow::Context;
use wgpu::Device;

use crate::gfx::{
    geometry::{AttributePresence, MeshData},
    resources::texture_resource::TextureResource,
    scene::{DrawTarget, FramePlan, Object, Scene, ShaderKind},
    uniforms::{ShaderSet, UniformTable},
};
use crate::wgpu_utils::{self, UniformBuffer};

use super::{
    gpu_mesh::{DrawMesh, GpuIndexedMesh, GpuMesh},
    pipeline_manager::{required_attributes, PipelineManager},
    shader_uniforms::{ObjectUniforms, SceneUniforms, SkyboxUniforms},
};

const FALLBACK_ALBEDO: [u8; 4] = [255, 255, 255, 255];
const FALLBACK_NORMAL: [u8; 4] = [128, 128, 255, 255];

/// A uniform buffer together with the bind group exposing it.
struct UniformBinding<T> {
    buffer: UniformBuffer<T>,
    bind_group: wgpu::BindGroup,
}

impl<T: bytemuck::Pod> UniformBinding<T> {
    fn new(device: &Device, layout: &wgpu::BindGroupLayout, initial: &T, label: &str) -> Self {
        let buffer = UniformBuffer::new_with_data(device, initial);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.binding_resource(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn update(&mut self, queue: &wgpu::Queue, content: T) {
        self.buffer.update_content(queue, content);
    }
}

struct BindLayouts {
    uniform: wgpu::BindGroupLayout,
    material: wgpu::BindGroupLayout,
    cube: wgpu::BindGroupLayout,
}

impl BindLayouts {
    fn new(device: &Device) -> Self {
        let filtering = wgpu_utils::sampler(wgpu::SamplerBindingType::Filtering);
        Self {
            uniform: wgpu_utils::layout(device, "Uniform Layout", &[wgpu_utils::uniform()]),
            material: wgpu_utils::layout(
                device,
                "Material Layout",
                &[wgpu_utils::texture_2d(), wgpu_utils::texture_2d(), filtering],
            ),
            cube: wgpu_utils::layout(
                device,
                "Skybox Layout",
                &[wgpu_utils::texture_cube(), filtering],
            ),
        }
    }
}

/// GPU resources for one mesh the scene draws.
struct Drawable {
    mesh: GpuMesh,
    object: UniformBinding<ObjectUniforms>,
    material: Option<wgpu::BindGroup>,
}

struct GpuSkybox {
    mesh: GpuIndexedMesh,
    textures: wgpu::BindGroup,
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    pub pipeline_manager: PipelineManager,
    layouts: BindLayouts,
    player_scene: UniformBinding<SceneUniforms>,
    model_scene: UniformBinding<SceneUniforms>,
    skybox_scene: UniformBinding<SkyboxUniforms>,
    drawables: HashMap<DrawTarget, Drawable>,
    skybox: Option<GpuSkybox>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> anyhow::Result<RenderEngine> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .context("Surface reports no supported formats")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        log::info!(
            "Surface configured: {}x{} {:?}, adapter {}",
            config.width,
            config.height,
            format,
            adapter.get_info().name
        );

        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let layouts = BindLayouts::new(&device);
        let player_scene = UniformBinding::new(
            &device,
            &layouts.uniform,
            &SceneUniforms::from_table(&UniformTable::new()),
            "Player Scene Bind Group",
        );
        let model_scene = UniformBinding::new(
            &device,
            &layouts.uniform,
            &SceneUniforms::from_table(&UniformTable::new()),
            "Model Scene Bind Group",
        );
        let skybox_scene = UniformBinding::new(
            &device,
            &layouts.uniform,
            &SkyboxUniforms::from_table(&UniformTable::new()),
            "Skybox Scene Bind Group",
        );

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone(), format);

        let common = include_str!("shaders/common.wgsl");
        pipeline_manager.load_shader(
            ShaderKind::Player,
            &format!("{common}\n{}", include_str!("shaders/player.wgsl")),
        );
        pipeline_manager.load_shader(
            ShaderKind::Model,
            &format!("{common}\n{}", include_str!("shaders/model.wgsl")),
        );
        pipeline_manager.load_shader(
            ShaderKind::Marker,
            &format!("{common}\n{}", include_str!("shaders/marker.wgsl")),
        );
        pipeline_manager.load_shader(ShaderKind::Skybox, include_str!("shaders/skybox.wgsl"));

        let lit = vec![
            layouts.uniform.clone(),
            layouts.uniform.clone(),
            layouts.material.clone(),
        ];
        pipeline_manager.register_layouts(ShaderKind::Player, lit.clone());
        pipeline_manager.register_layouts(ShaderKind::Model, lit);
        pipeline_manager.register_layouts(
            ShaderKind::Marker,
            vec![layouts.uniform.clone(), layouts.uniform.clone()],
        );
        pipeline_manager.register_layouts(
            ShaderKind::Skybox,
            vec![layouts.uniform.clone(), layouts.cube.clone()],
        );

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            pipeline_manager,
            layouts,
            player_scene,
            model_scene,
            skybox_scene,
            drawables: HashMap::new(),
            skybox: None,
        })
    }

    /// Uploads every mesh and texture the scene can draw, replacing any
    /// previously uploaded scene.
    pub fn upload_scene(&mut self, scene: &Scene) {
        self.drawables.clear();

        self.upload_object(DrawTarget::Player, ShaderKind::Player, &scene.player.object);
        for (i, object) in scene.scenery.iter().enumerate() {
            self.upload_object(DrawTarget::Scenery(i), ShaderKind::Model, object);
        }
        if let Some(marker) = &scene.light_marker {
            self.upload_object(DrawTarget::LightMarker, ShaderKind::Marker, marker);
        }

        let cube = TextureResource::load_cube_or_fallback(
            &self.device,
            &self.queue,
            &scene.skybox.faces,
        );
        let textures = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Skybox Texture Bind Group"),
            layout: &self.layouts.cube,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&cube.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&cube.sampler),
                },
            ],
        });
        self.skybox = Some(GpuSkybox {
            mesh: GpuIndexedMesh::new(&self.device, &scene.skybox.geometry, "Skybox"),
            textures,
        });

        log::info!("Uploaded {} meshes and the skybox", self.drawables.len());
    }

    fn upload_object(&mut self, target: DrawTarget, shader: ShaderKind, object: &Object) {
        if !can_draw(&object.mesh, shader) {
            log::warn!(
                "Skipping '{}': its mesh lacks attributes the {:?} shader needs",
                object.name,
                shader
            );
            return;
        }

        let mesh = GpuMesh::new(&self.device, &object.mesh, &object.name);
        let object_binding = UniformBinding::new(
            &self.device,
            &self.layouts.uniform,
            &ObjectUniforms::new(object.model_matrix(), None),
            &format!("{} Object Bind Group", object.name),
        );

        let material = match shader {
            ShaderKind::Player | ShaderKind::Model => Some(self.material_bind_group(object)),
            ShaderKind::Marker | ShaderKind::Skybox => None,
        };

        self.drawables.insert(
            target,
            Drawable {
                mesh,
                object: object_binding,
                material,
            },
        );
    }

    fn material_bind_group(&self, object: &Object) -> wgpu::BindGroup {
        let albedo = TextureResource::load_or_fallback(
            &self.device,
            &self.queue,
            object.albedo.as_deref(),
            wgpu::TextureFormat::Rgba8UnormSrgb,
            FALLBACK_ALBEDO,
        );
        let normal = TextureResource::load_or_fallback(
            &self.device,
            &self.queue,
            object.normal_map.as_deref(),
            wgpu::TextureFormat::Rgba8Unorm,
            FALLBACK_NORMAL,
        );

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Material Bind Group", object.name)),
            layout: &self.layouts.material,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&albedo.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&albedo.sampler),
                },
            ],
        })
    }

    /// Renders one frame from the scene's plan and the uniforms its shader
    /// sinks collected this frame.
    ///
    /// A lost or outdated surface is reconfigured and the frame is skipped.
    pub fn render_frame(
        &mut self,
        plan: &FramePlan,
        sinks: &ShaderSet<UniformTable>,
    ) -> anyhow::Result<()> {
        self.player_scene
            .update(&self.queue, SceneUniforms::from_table(&sinks.player));
        self.model_scene
            .update(&self.queue, SceneUniforms::from_table(&sinks.model));
        self.skybox_scene
            .update(&self.queue, SkyboxUniforms::from_table(&sinks.skybox));
        for step in &plan.steps {
            if let Some(drawable) = self.drawables.get_mut(&step.target) {
                drawable
                    .object
                    .update(&self.queue, ObjectUniforms::from_step(step));
            }
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring the surface texture");
                return Ok(());
            }
            Err(err) => {
                return Err(anyhow::Error::new(err).context("Failed to acquire surface texture"))
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.0,
                            g: 0.05,
                            b: 0.1,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some([r, g, b, a]) = plan.blend.constant() {
                render_pass.set_blend_constant(wgpu::Color {
                    r: r as f64,
                    g: g as f64,
                    b: b as f64,
                    a: a as f64,
                });
            }

            for step in &plan.steps {
                if step.target == DrawTarget::Skybox {
                    let Some(skybox) = &self.skybox else {
                        continue;
                    };
                    let Some(pipeline) = self.pipeline_manager.get_pipeline(
                        ShaderKind::Skybox,
                        AttributePresence::POSITION_ONLY,
                        plan.blend,
                        step.depth,
                    ) else {
                        continue;
                    };
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(0, &self.skybox_scene.bind_group, &[]);
                    render_pass.set_bind_group(1, &skybox.textures, &[]);
                    render_pass.draw_indexed_mesh(&skybox.mesh);
                    continue;
                }

                let Some(drawable) = self.drawables.get(&step.target) else {
                    continue;
                };
                if drawable.mesh.vertex_count == 0 {
                    continue;
                }
                let Some(pipeline) = self.pipeline_manager.get_pipeline(
                    step.shader,
                    drawable.mesh.presence,
                    plan.blend,
                    step.depth,
                ) else {
                    continue;
                };

                let scene_group = match step.shader {
                    ShaderKind::Player => &self.player_scene.bind_group,
                    _ => &self.model_scene.bind_group,
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(0, scene_group, &[]);
                render_pass.set_bind_group(1, &drawable.object.bind_group, &[]);
                if let Some(material) = &drawable.material {
                    render_pass.set_bind_group(2, material, &[]);
                }
                render_pass.draw_mesh(&drawable.mesh);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }

    /// Resizes the render engine surface and recreates depth buffer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }
}

/// Whether a mesh carries every attribute `shader` reads.
fn can_draw(mesh: &MeshData, shader: ShaderKind) -> bool {
    mesh.presence.satisfies(&required_attributes(shader))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenery_without_uvs_is_not_drawable() {
        let mesh = MeshData {
            presence: AttributePresence {
                position: true,
                normal: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!can_draw(&mesh, ShaderKind::Model));
        assert!(can_draw(&mesh, ShaderKind::Marker));
    }
}
