//! The ordered list of draws a scene wants for one frame.
//!
//! The scene never touches the GPU. It describes each frame as a
//! [`FramePlan`] which the render engine executes step by step.

use cgmath::{Matrix4, Vector3};

/// Shader program a draw uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    /// Normal-mapped shading for the player mesh.
    Player,
    /// Textured shading for scenery.
    Model,
    /// Flat tinted light marker.
    Marker,
    /// Cube-mapped backdrop.
    Skybox,
}

/// Frame-wide color blending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendMode {
    Disabled,
    /// `src * constant + dst * 0`, tinting every fragment by a constant color.
    ConstantTint([f32; 4]),
}

impl BlendMode {
    pub const COCKPIT_TINT: [f32; 4] = [0.0, 1.0, 0.25, 1.0];

    pub fn constant(&self) -> Option<[f32; 4]> {
        match self {
            BlendMode::Disabled => None,
            BlendMode::ConstantTint(color) => Some(*color),
        }
    }

    pub fn blend_state(&self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Disabled => None,
            BlendMode::ConstantTint(_) => {
                let component = wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::Constant,
                    dst_factor: wgpu::BlendFactor::Zero,
                    operation: wgpu::BlendOperation::Add,
                };
                Some(wgpu::BlendState {
                    color: component,
                    alpha: component,
                })
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DepthState {
    /// `Less` with depth writes.
    #[default]
    Standard,
    /// `LessEqual` without depth writes, for the backdrop.
    Backdrop,
}

impl DepthState {
    pub fn compare(self) -> wgpu::CompareFunction {
        match self {
            DepthState::Standard => wgpu::CompareFunction::Less,
            DepthState::Backdrop => wgpu::CompareFunction::LessEqual,
        }
    }

    pub fn write_enabled(self) -> bool {
        matches!(self, DepthState::Standard)
    }
}

/// What a draw step renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawTarget {
    Player,
    Scenery(usize),
    LightMarker,
    Skybox,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStep {
    pub target: DrawTarget,
    pub shader: ShaderKind,
    pub model: Matrix4<f32>,
    /// Flat color override, used by the light marker.
    pub tint: Option<Vector3<f32>>,
    pub depth: DepthState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    pub blend: BlendMode,
    pub use_texture: bool,
    pub steps: Vec<DrawStep>,
}

impl FramePlan {
    pub fn targets(&self) -> Vec<DrawTarget> {
        self.steps.iter().map(|step| step.target).collect()
    }

    pub fn contains(&self, target: DrawTarget) -> bool {
        self.steps.iter().any(|step| step.target == target)
    }
}
