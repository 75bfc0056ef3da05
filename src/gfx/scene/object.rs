use std::path::PathBuf;

use cgmath::Matrix4;

use super::transform::Transform;
use crate::gfx::geometry::MeshData;

/// A textured mesh placed in the world.
#[derive(Debug, Clone)]
pub struct Object {
    pub name: String,
    pub transform: Transform,
    pub mesh: MeshData,
    pub albedo: Option<PathBuf>,
    pub normal_map: Option<PathBuf>,
}

impl Object {
    pub fn new(name: impl Into<String>, mesh: MeshData, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            mesh,
            albedo: None,
            normal_map: None,
        }
    }

    pub fn with_albedo(mut self, path: impl Into<PathBuf>) -> Self {
        self.albedo = Some(path.into());
        self
    }

    pub fn with_normal_map(mut self, path: impl Into<PathBuf>) -> Self {
        self.normal_map = Some(path.into());
        self
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.transform.matrix()
    }
}
