//! GPU-side uniform layouts packed from a [`UniformTable`].
//!
//! Every block is made of `vec4`/`mat4x4` sized fields so the Rust and WGSL
//! layouts agree without manual padding rules. A light block whose prefix was
//! never written is packed with `enabled = 0` and the shader skips it.

use bytemuck::{Pod, Zeroable};
use cgmath::{Matrix, Matrix4, SquareMatrix, Vector3};

use crate::gfx::{
    camera::camera_utils::convert_matrix4_to_array,
    scene::DrawStep,
    uniforms::UniformTable,
};

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

fn mat4(table: &UniformTable, name: &str) -> [[f32; 4]; 4] {
    table
        .get_mat4(name)
        .map(convert_matrix4_to_array)
        .unwrap_or(IDENTITY)
}

fn vec4(table: &UniformTable, name: &str, w: f32) -> [f32; 4] {
    let v = table.get_vec3(name).unwrap_or(Vector3::new(0.0, 0.0, 0.0));
    [v.x, v.y, v.z, w]
}

fn float(table: &UniformTable, name: &str) -> f32 {
    table.get_float(name).unwrap_or(0.0)
}

/// Parameters shared by every light kind.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LightBlock {
    /// rgb color, intensity in w.
    pub color: [f32; 4],
    /// ambient strength, specular strength, specular phong, enabled.
    pub strengths: [f32; 4],
    pub position: [f32; 4],
    pub direction: [f32; 4],
    /// constant, linear, quadratic.
    pub attenuation: [f32; 4],
    /// cos(cutoff), cos(outer cutoff).
    pub cutoffs: [f32; 4],
}

impl LightBlock {
    pub fn from_table(table: &UniformTable, prefix: &str) -> Self {
        if !table.has_prefix(prefix) {
            return Self::zeroed();
        }
        let name = |field: &str| format!("{prefix}.{field}");
        Self {
            color: vec4(table, &name("color"), float(table, &name("intensity"))),
            strengths: [
                float(table, &name("ambientStrength")),
                float(table, &name("specularStrength")),
                float(table, &name("specularPhong")),
                1.0,
            ],
            position: vec4(table, &name("position"), 1.0),
            direction: vec4(table, &name("direction"), 0.0),
            attenuation: [
                float(table, &name("constant")),
                float(table, &name("linear")),
                float(table, &name("quadratic")),
                0.0,
            ],
            cutoffs: [
                float(table, &name("cutoff")),
                float(table, &name("outerCutoff")),
                0.0,
                0.0,
            ],
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.strengths[3] > 0.0
    }
}

/// Camera and lighting state for the lit shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SceneUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    /// Eye position, `useTexture` in w.
    pub camera_pos: [f32; 4],
    pub directional: LightBlock,
    pub point: LightBlock,
    pub spot: LightBlock,
}

impl SceneUniforms {
    pub fn from_table(table: &UniformTable) -> Self {
        let use_texture = table.get_int("useTexture").unwrap_or(1);
        Self {
            view: mat4(table, "view"),
            projection: mat4(table, "projection"),
            camera_pos: vec4(table, "cameraPos", use_texture as f32),
            directional: LightBlock::from_table(table, "directionalLight"),
            point: LightBlock::from_table(table, "pointLight"),
            spot: LightBlock::from_table(table, "spotLight"),
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SkyboxUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

impl SkyboxUniforms {
    pub fn from_table(table: &UniformTable) -> Self {
        Self {
            view: mat4(table, "view"),
            projection: mat4(table, "projection"),
        }
    }
}

/// Per-draw transform and tint.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix for normals.
    pub normal: [[f32; 4]; 4],
    /// Flat color in rgb; w is 1 when the tint replaces shading.
    pub tint: [f32; 4],
}

impl ObjectUniforms {
    pub fn new(model: Matrix4<f32>, tint: Option<Vector3<f32>>) -> Self {
        let normal = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or(Matrix4::identity());
        let tint = match tint {
            Some(color) => [color.x, color.y, color.z, 1.0],
            None => [1.0, 1.0, 1.0, 0.0],
        };
        Self {
            model: convert_matrix4_to_array(model),
            normal: convert_matrix4_to_array(normal),
            tint,
        }
    }

    pub fn from_step(step: &DrawStep) -> Self {
        Self::new(step.model, step.tint)
    }
}
