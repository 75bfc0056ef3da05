//! # Primitive Shapes
//!
//! Built-in geometry that the scene needs without an OBJ file.

use super::mesh_builder::{Corner, MeshSource};

/// Corners of the skybox cube, spanning -1..1 on every axis.
pub const SKYBOX_POSITIONS: [[f32; 3]; 8] = [
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
];

/// Two triangles per face, wound to face the inside of the cube.
pub const SKYBOX_INDICES: [u16; 36] = [
    1, 2, 6, 6, 5, 1, // +x
    0, 4, 7, 7, 3, 0, // -x
    4, 5, 6, 6, 7, 4, // +y
    0, 3, 2, 2, 1, 0, // -y
    0, 1, 5, 5, 4, 0, // +z
    3, 7, 6, 6, 2, 3, // -z
];

/// Indexed position-only cube, uploaded as-is for the skybox draw.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedGeometry {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u16>,
}

impl IndexedGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The same shape as a per-corner mesh source, for the interleaving path.
    pub fn to_mesh_source(&self) -> MeshSource {
        MeshSource {
            positions: self.positions.clone(),
            normals: Vec::new(),
            texcoords: Vec::new(),
            corners: self
                .indices
                .iter()
                .map(|&index| Corner::uniform(index as usize))
                .collect(),
        }
    }
}

pub fn skybox_cube() -> IndexedGeometry {
    IndexedGeometry {
        positions: SKYBOX_POSITIONS.to_vec(),
        indices: SKYBOX_INDICES.to_vec(),
    }
}

/// A small cube with outward normals, used as the point-light marker when
/// the light has no model of its own.
pub fn marker_cube(half_extent: f32) -> MeshSource {
    let h = half_extent;
    // (normal, four corners counter-clockwise seen from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0], [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]]),
        ([0.0, 0.0, -1.0], [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]]),
        ([-1.0, 0.0, 0.0], [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]]),
        ([1.0, 0.0, 0.0], [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]]),
        ([0.0, 1.0, 0.0], [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]]),
        ([0.0, -1.0, 0.0], [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]]),
    ];

    let mut source = MeshSource::default();
    for (face, (normal, corners)) in faces.iter().enumerate() {
        source.normals.push(*normal);
        let base = source.positions.len();
        source.positions.extend_from_slice(corners);
        for offset in [0, 1, 2, 2, 3, 0] {
            source.corners.push(Corner::new(base + offset, face, 0));
        }
    }
    source
}
