//! Render pipeline management system for wgpu
//!
//! Pipelines are created lazily and cached by [`PipelineKey`]: the shader,
//! the vertex attributes of the mesh being drawn, whether the frame blends,
//! and the depth state of the draw.

use std::{collections::HashMap, sync::Arc};
use wgpu::*;

use crate::gfx::{
    geometry::AttributePresence,
    resources::texture_resource::TextureResource,
    scene::{BlendMode, DepthState, ShaderKind},
};

/// Attributes a shader reads from its vertex buffer.
pub fn required_attributes(shader: ShaderKind) -> AttributePresence {
    match shader {
        ShaderKind::Player => AttributePresence {
            position: true,
            normal: true,
            uv: true,
            tangent: true,
            bitangent: true,
        },
        ShaderKind::Model => AttributePresence {
            position: true,
            normal: true,
            uv: true,
            ..Default::default()
        },
        ShaderKind::Marker | ShaderKind::Skybox => AttributePresence::POSITION_ONLY,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub shader: ShaderKind,
    pub attributes: u8,
    pub blend: bool,
    pub depth: DepthState,
}

/// Configuration for creating a render pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub label: String,
    pub shader: ShaderKind,
    pub bind_group_layouts: Vec<BindGroupLayout>,
    pub presence: AttributePresence,
    pub depth: DepthState,
    pub color_format: TextureFormat,
    pub blend: Option<BlendState>,
}

impl PipelineConfig {
    pub fn new(shader: ShaderKind, color_format: TextureFormat) -> Self {
        Self {
            label: format!("{shader:?}"),
            shader,
            bind_group_layouts: Vec::new(),
            presence: required_attributes(shader),
            depth: DepthState::Standard,
            color_format,
            blend: None,
        }
    }

    pub fn with_bind_group_layouts(mut self, layouts: Vec<BindGroupLayout>) -> Self {
        self.bind_group_layouts = layouts;
        self
    }

    /// Sets the vertex layout the pipeline reads.
    pub fn with_presence(mut self, presence: AttributePresence) -> Self {
        self.presence = presence;
        self
    }

    pub fn with_depth(mut self, depth: DepthState) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_blend(mut self, blend: BlendMode) -> Self {
        self.blend = blend.blend_state();
        self
    }

    pub fn key(&self) -> PipelineKey {
        PipelineKey {
            shader: self.shader,
            attributes: self.presence.bits(),
            blend: self.blend.is_some(),
            depth: self.depth,
        }
    }
}

/// Manages render pipelines with caching and lazy creation
pub struct PipelineManager {
    device: Arc<Device>,
    color_format: TextureFormat,
    pipelines: HashMap<PipelineKey, RenderPipeline>,
    shader_modules: HashMap<ShaderKind, ShaderModule>,
    layouts: HashMap<ShaderKind, Vec<BindGroupLayout>>,
}

impl PipelineManager {
    pub fn new(device: Arc<Device>, color_format: TextureFormat) -> Self {
        Self {
            device,
            color_format,
            pipelines: HashMap::new(),
            shader_modules: HashMap::new(),
            layouts: HashMap::new(),
        }
    }

    /// Compiles a WGSL module for `shader`.
    pub fn load_shader(&mut self, shader: ShaderKind, source: &str) {
        let module = self.device.create_shader_module(ShaderModuleDescriptor {
            label: Some(&format!("{shader:?} Shader")),
            source: ShaderSource::Wgsl(source.into()),
        });
        self.shader_modules.insert(shader, module);
    }

    /// Registers the bind group layouts every pipeline for `shader` uses.
    pub fn register_layouts(&mut self, shader: ShaderKind, layouts: Vec<BindGroupLayout>) {
        self.layouts.insert(shader, layouts);
    }

    /// Returns the cached pipeline for a draw, creating it on first use.
    ///
    /// Returns `None` when the mesh lacks attributes the shader reads or the
    /// shader was never loaded.
    pub fn get_pipeline(
        &mut self,
        shader: ShaderKind,
        presence: AttributePresence,
        blend: BlendMode,
        depth: DepthState,
    ) -> Option<&RenderPipeline> {
        let config = PipelineConfig::new(shader, self.color_format)
            .with_presence(presence)
            .with_blend(blend)
            .with_depth(depth)
            .with_bind_group_layouts(self.layouts.get(&shader).cloned().unwrap_or_default());
        let key = config.key();

        if !self.pipelines.contains_key(&key) {
            if !presence.satisfies(&required_attributes(shader)) {
                log::warn!(
                    "Mesh with attributes {:05b} cannot be drawn with the {:?} shader",
                    presence.bits(),
                    shader
                );
                return None;
            }
            match self.create_pipeline_from_config(&config) {
                Ok(pipeline) => {
                    log::debug!("Created pipeline {:?}", key);
                    self.pipelines.insert(key, pipeline);
                }
                Err(e) => {
                    log::error!("Failed to create pipeline '{}': {}", config.label, e);
                    return None;
                }
            }
        }

        self.pipelines.get(&key)
    }

    fn create_pipeline_from_config(&self, config: &PipelineConfig) -> Result<RenderPipeline, String> {
        let shader = self
            .shader_modules
            .get(&config.shader)
            .ok_or_else(|| format!("Shader '{:?}' not loaded", config.shader))?;

        let bind_group_layout_refs: Vec<&BindGroupLayout> =
            config.bind_group_layouts.iter().collect();
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", config.label)),
                bind_group_layouts: &bind_group_layout_refs,
                push_constant_ranges: &[],
            });

        let attributes = config.presence.wgpu_attributes();
        let vertex_buffers = [config.presence.buffer_layout(&attributes)];

        let color_targets = [Some(ColorTargetState {
            format: config.color_format,
            blend: config.blend.or(Some(BlendState::REPLACE)),
            write_mask: ColorWrites::ALL,
        })];

        let depth_stencil = Some(DepthStencilState {
            format: TextureResource::DEPTH_FORMAT,
            depth_write_enabled: config.depth.write_enabled(),
            depth_compare: config.depth.compare(),
            stencil: StencilState::default(),
            bias: DepthBiasState::default(),
        });

        let pipeline = self
            .device
            .create_render_pipeline(&RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &vertex_buffers,
                    compilation_options: PipelineCompilationOptions::default(),
                },
                fragment: Some(FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &color_targets,
                    compilation_options: PipelineCompilationOptions::default(),
                }),
                primitive: PrimitiveState {
                    topology: PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: FrontFace::Ccw,
                    // Imported models mix windings and the skybox is seen from inside.
                    cull_mode: None,
                    polygon_mode: PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil,
                multisample: MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_shader_needs_tangent_frame() {
        let required = required_attributes(ShaderKind::Player);
        let without_tangents = AttributePresence {
            position: true,
            normal: true,
            uv: true,
            ..Default::default()
        };
        assert!(!without_tangents.satisfies(&required));
        assert!(without_tangents.satisfies(&required_attributes(ShaderKind::Model)));
        assert!(AttributePresence::POSITION_ONLY.satisfies(&required_attributes(ShaderKind::Skybox)));
    }

    #[test]
    fn test_keys_distinguish_blend_and_depth() {
        let base = PipelineConfig::new(ShaderKind::Model, TextureFormat::Bgra8Unorm);
        let tinted = base
            .clone()
            .with_blend(BlendMode::ConstantTint(BlendMode::COCKPIT_TINT));
        let backdrop = base.clone().with_depth(DepthState::Backdrop);

        assert_ne!(base.key(), tinted.key());
        assert_ne!(base.key(), backdrop.key());
        assert!(tinted.key().blend);
        assert_eq!(base.key().attributes, required_attributes(ShaderKind::Model).bits());
    }

    #[test]
    fn test_presence_changes_key() {
        let config = PipelineConfig::new(ShaderKind::Marker, TextureFormat::Bgra8Unorm);
        let richer = config.clone().with_presence(AttributePresence {
            position: true,
            normal: true,
            ..Default::default()
        });
        assert_ne!(config.key(), richer.key());
    }
}
