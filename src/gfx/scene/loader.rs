//! OBJ loading into [`MeshSource`] values.

use std::path::Path;

use crate::error::{FathomError, Result};
use crate::gfx::geometry::{Corner, MeshSource};

/// Loads every model in an OBJ file into one merged mesh source.
///
/// Faces are triangulated and each attribute keeps its own index stream, so
/// positions, normals and texture coordinates are not duplicated on load.
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshSource> {
    let path = path.as_ref();
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: false,
            ..Default::default()
        },
    )
    .map_err(|source| FathomError::ObjLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let source = merge_models(&models);
    if source.corners.is_empty() {
        return Err(FathomError::EmptyModel(path.to_path_buf()));
    }

    log::info!(
        "Loaded {}: {} models, {} triangles",
        path.display(),
        models.len(),
        source.triangle_count()
    );
    Ok(source)
}

/// Concatenates the models' attribute arrays and rebases their indices.
///
/// The first model with geometry decides which attributes the mesh carries;
/// later models that disagree are skipped.
pub fn merge_models(models: &[tobj::Model]) -> MeshSource {
    let mut source = MeshSource::default();
    let mut layout: Option<(bool, bool)> = None;

    for model in models {
        let mesh = &model.mesh;
        if mesh.positions.is_empty() || mesh.indices.is_empty() {
            continue;
        }

        let has_normals = !mesh.normals.is_empty() && mesh.normal_indices.len() == mesh.indices.len();
        let has_texcoords =
            !mesh.texcoords.is_empty() && mesh.texcoord_indices.len() == mesh.indices.len();

        match layout {
            None => layout = Some((has_normals, has_texcoords)),
            Some(expected) if expected != (has_normals, has_texcoords) => {
                log::warn!(
                    "Skipping model '{}': attribute layout differs from the first model",
                    model.name
                );
                continue;
            }
            Some(_) => (),
        }

        let position_base = source.positions.len();
        let normal_base = source.normals.len();
        let texcoord_base = source.texcoords.len();

        source
            .positions
            .extend(mesh.positions.chunks_exact(3).map(|p| [p[0], p[1], p[2]]));
        if has_normals {
            source
                .normals
                .extend(mesh.normals.chunks_exact(3).map(|n| [n[0], n[1], n[2]]));
        }
        if has_texcoords {
            source
                .texcoords
                .extend(mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]));
        }

        for (i, &index) in mesh.indices.iter().enumerate() {
            let normal = if has_normals {
                normal_base + mesh.normal_indices[i] as usize
            } else {
                0
            };
            let texcoord = if has_texcoords {
                texcoord_base + mesh.texcoord_indices[i] as usize
            } else {
                0
            };
            source
                .corners
                .push(Corner::new(position_base + index as usize, normal, texcoord));
        }
    }

    source
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_model(name: &str, with_texcoords: bool) -> tobj::Model {
        let mut mesh = tobj::Mesh {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            normals: vec![0.0, 0.0, 1.0],
            indices: vec![0, 1, 2],
            normal_indices: vec![0, 0, 0],
            ..Default::default()
        };
        if with_texcoords {
            mesh.texcoords = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
            mesh.texcoord_indices = vec![0, 1, 2];
        }
        tobj::Model::new(mesh, name.to_string())
    }

    #[test]
    fn test_merge_rebases_indices() {
        let models = vec![triangle_model("a", true), triangle_model("b", true)];
        let source = merge_models(&models);

        assert_eq!(source.positions.len(), 6);
        assert_eq!(source.normals.len(), 2);
        assert_eq!(source.texcoords.len(), 6);
        assert_eq!(source.corners.len(), 6);
        assert_eq!(source.corners[3], Corner::new(3, 1, 3));
        assert_eq!(source.corners[5], Corner::new(5, 1, 5));
    }

    #[test]
    fn test_mismatched_layout_is_skipped() {
        let models = vec![triangle_model("a", true), triangle_model("b", false)];
        let source = merge_models(&models);
        assert_eq!(source.corners.len(), 3);
        assert_eq!(source.positions.len(), 3);
    }

    #[test]
    fn test_missing_texcoords_leave_array_empty() {
        let source = merge_models(&[triangle_model("plain", false)]);
        assert!(source.texcoords.is_empty());
        assert!(!source.presence().uv);
        assert!(source.presence().normal);
    }

    #[test]
    fn test_missing_file_reports_path() {
        match load_obj("no/such/model.obj") {
            Err(FathomError::ObjLoad { path, .. }) => {
                assert_eq!(path, Path::new("no/such/model.obj"));
            }
            other => panic!("expected ObjLoad error, got {:?}", other.map(|s| s.corners.len())),
        }
    }
}
