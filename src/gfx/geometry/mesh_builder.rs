//! # Mesh Builder
//!
//! Turns indexed mesh data, as produced by an OBJ parser, into a single
//! interleaved vertex buffer ready for upload.
//!
//! The source keeps positions, normals and texture coordinates in separate
//! arrays and describes every triangle corner with an index triple into them.
//! The builder emits one vertex per corner (no de-duplication), so the result
//! is drawn as a plain triangle list. When texture coordinates are present it
//! also derives a tangent and bitangent for every triangle so normal maps can
//! be sampled in model space.

use cgmath::{InnerSpace, Vector2, Vector3};

use super::vertex::{AttributePresence, VertexAttribute};
use crate::error::{FathomError, Result};

/// Index triple describing one triangle corner.
///
/// Indices that refer to an attribute the source does not carry are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Corner {
    pub position: usize,
    pub normal: usize,
    pub texcoord: usize,
}

impl Corner {
    pub fn new(position: usize, normal: usize, texcoord: usize) -> Self {
        Self {
            position,
            normal,
            texcoord,
        }
    }

    /// A corner that uses the same index for every attribute.
    pub fn uniform(index: usize) -> Self {
        Self::new(index, index, index)
    }
}

/// Raw mesh data with per-corner indices, grouped in triangles of three
/// consecutive corners. An empty attribute array means the mesh does not
/// carry that attribute at all.
#[derive(Debug, Clone, Default)]
pub struct MeshSource {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub corners: Vec<Corner>,
}

impl MeshSource {
    /// Attributes the built buffer will carry when tangents are generated.
    pub fn presence(&self) -> AttributePresence {
        let position = !self.positions.is_empty();
        let uv = !self.texcoords.is_empty();
        AttributePresence {
            position,
            normal: !self.normals.is_empty(),
            uv,
            tangent: position && uv,
            bitangent: position && uv,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }
}

/// An interleaved vertex buffer and the layout describing it.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub presence: AttributePresence,
    /// Triangles whose texture coordinates could not span a tangent frame.
    pub degenerate_triangles: usize,
}

impl MeshData {
    pub fn stride(&self) -> usize {
        self.presence.stride()
    }

    pub fn vertex_count(&self) -> usize {
        match self.stride() {
            0 => 0,
            stride => self.vertices.len() / stride,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The floats of one interleaved vertex.
    pub fn vertex(&self, index: usize) -> Option<&[f32]> {
        let stride = self.stride();
        let start = index.checked_mul(stride)?;
        self.vertices.get(start..start + stride)
    }

    /// One attribute of one vertex, if the mesh carries it.
    pub fn attribute(&self, index: usize, attribute: VertexAttribute) -> Option<&[f32]> {
        let (_, offset) = self
            .presence
            .offsets()
            .into_iter()
            .find(|(candidate, _)| *candidate == attribute)?;
        self.vertex(index)
            .map(|vertex| &vertex[offset..offset + attribute.components()])
    }
}

/// Per-triangle tangent frame shared by all three corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TangentFrame {
    pub tangent: Vector3<f32>,
    pub bitangent: Vector3<f32>,
}

/// Converts a [`MeshSource`] into [`MeshData`].
pub struct MeshBuilder<'a> {
    source: &'a MeshSource,
    generate_tangents: bool,
}

impl<'a> MeshBuilder<'a> {
    pub fn new(source: &'a MeshSource) -> Self {
        Self {
            source,
            generate_tangents: true,
        }
    }

    /// Whether to emit tangent and bitangent attributes when UVs exist.
    pub fn tangents(mut self, enabled: bool) -> Self {
        self.generate_tangents = enabled;
        self
    }

    pub fn presence(&self) -> AttributePresence {
        let mut presence = self.source.presence();
        if !self.generate_tangents {
            presence.tangent = false;
            presence.bitangent = false;
        }
        presence
    }

    pub fn build(&self) -> Result<MeshData> {
        let source = self.source;
        if source.corners.len() % 3 != 0 {
            return Err(FathomError::IncompleteTriangle(source.corners.len()));
        }

        let presence = self.presence();
        self.validate_indices(&presence)?;

        let (frames, degenerate_triangles) = if presence.tangent {
            self.tangent_frames()
        } else {
            (Vec::new(), 0)
        };

        let mut vertices = Vec::with_capacity(source.corners.len() * presence.stride());
        for (i, corner) in source.corners.iter().enumerate() {
            if presence.position {
                vertices.extend_from_slice(&source.positions[corner.position]);
            }
            if presence.normal {
                vertices.extend_from_slice(&source.normals[corner.normal]);
            }
            if presence.uv {
                vertices.extend_from_slice(&source.texcoords[corner.texcoord]);
            }
            if let Some(frame) = frames.get(i / 3) {
                let t = frame.tangent;
                let b = frame.bitangent;
                vertices.extend_from_slice(&[t.x, t.y, t.z]);
                vertices.extend_from_slice(&[b.x, b.y, b.z]);
            }
        }

        if degenerate_triangles > 0 {
            log::warn!(
                "{} of {} triangles have degenerate texture coordinates; using edge-aligned tangents",
                degenerate_triangles,
                source.triangle_count()
            );
        }
        log::debug!(
            "Built mesh: {} corners, stride {} ({:?})",
            source.corners.len(),
            presence.stride(),
            presence
        );

        Ok(MeshData {
            vertices,
            presence,
            degenerate_triangles,
        })
    }

    fn validate_indices(&self, presence: &AttributePresence) -> Result<()> {
        let source = self.source;
        for (i, corner) in source.corners.iter().enumerate() {
            let checks = [
                (presence.position, "position", corner.position, source.positions.len()),
                (presence.normal, "normal", corner.normal, source.normals.len()),
                (presence.uv, "texcoord", corner.texcoord, source.texcoords.len()),
            ];
            for (present, attribute, index, available) in checks {
                if present && index >= available {
                    return Err(FathomError::IndexOutOfRange {
                        corner: i,
                        attribute,
                        index,
                        available,
                    });
                }
            }
        }
        Ok(())
    }

    /// One tangent frame per triangle plus the number of degenerate ones.
    fn tangent_frames(&self) -> (Vec<TangentFrame>, usize) {
        let source = self.source;
        let mut degenerate = 0;
        let frames = source
            .corners
            .chunks_exact(3)
            .map(|triangle| {
                let v1 = Vector3::from(source.positions[triangle[0].position]);
                let v2 = Vector3::from(source.positions[triangle[1].position]);
                let v3 = Vector3::from(source.positions[triangle[2].position]);
                let uv1 = Vector2::from(source.texcoords[triangle[0].texcoord]);
                let uv2 = Vector2::from(source.texcoords[triangle[1].texcoord]);
                let uv3 = Vector2::from(source.texcoords[triangle[2].texcoord]);

                match triangle_tangent_frame([v1, v2, v3], [uv1, uv2, uv3]) {
                    Some(frame) => frame,
                    None => {
                        degenerate += 1;
                        fallback_frame(v2 - v1, v3 - v1)
                    }
                }
            })
            .collect();
        (frames, degenerate)
    }
}

/// Tangent and bitangent spanning the UV parameterisation of a triangle.
///
/// Returns `None` when the UV edges are collinear, in which case the
/// determinant is zero and no frame exists.
pub fn triangle_tangent_frame(
    positions: [Vector3<f32>; 3],
    uvs: [Vector2<f32>; 3],
) -> Option<TangentFrame> {
    let delta_pos1 = positions[1] - positions[0];
    let delta_pos2 = positions[2] - positions[0];
    let delta_uv1 = uvs[1] - uvs[0];
    let delta_uv2 = uvs[2] - uvs[0];

    // Relative to the UV edge lengths so texel-sized triangles still count.
    let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
    if det.abs() <= f32::EPSILON * delta_uv1.magnitude() * delta_uv2.magnitude() {
        return None;
    }
    let r = 1.0 / det;
    if !r.is_finite() {
        return None;
    }

    Some(TangentFrame {
        tangent: (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r,
        bitangent: (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * r,
    })
}

/// Frame aligned with the first edge and the face normal.
fn fallback_frame(edge1: Vector3<f32>, edge2: Vector3<f32>) -> TangentFrame {
    let tangent = if edge1.magnitude2() > f32::EPSILON {
        edge1.normalize()
    } else {
        Vector3::unit_x()
    };

    let normal = edge1.cross(edge2);
    let bitangent = if normal.magnitude2() > f32::EPSILON {
        normal.normalize().cross(tangent)
    } else {
        let helper = if tangent.x.abs() < 0.9 {
            Vector3::unit_x()
        } else {
            Vector3::unit_y()
        };
        tangent.cross(helper).normalize()
    };

    TangentFrame { tangent, bitangent }
}
