use std::path::PathBuf;

use cgmath::{Matrix3, Matrix4};

use crate::gfx::geometry::{skybox_cube, IndexedGeometry};

/// A cube-mapped backdrop drawn around the camera.
#[derive(Debug, Clone)]
pub struct Skybox {
    /// Face images in +x, -x, +y, -y, +z, -z order.
    pub faces: [PathBuf; 6],
    pub geometry: IndexedGeometry,
}

impl Skybox {
    pub fn new(faces: [PathBuf; 6]) -> Self {
        Self {
            faces,
            geometry: skybox_cube(),
        }
    }

    /// Uniform scale that keeps the cube beyond the scene for a viewport.
    pub fn scale_for(viewport_height: u32) -> f32 {
        viewport_height as f32 / 50.0 + 2.0
    }

    /// The camera view with its translation removed, scaled so the cube
    /// encloses everything drawn before it.
    pub fn view_matrix(view: Matrix4<f32>, viewport_height: u32) -> Matrix4<f32> {
        let rotation = Matrix3::from_cols(view.x.truncate(), view.y.truncate(), view.z.truncate());
        Matrix4::from(rotation) * Matrix4::from_scale(Self::scale_for(viewport_height))
    }
}
