//! Error types for scene loading and mesh building.
//!
//! Per-frame code never returns these: rendering degradations (missing
//! uniforms, absent attributes, unreadable textures) are absorbed where they
//! happen. Only startup paths (reading configuration, parsing OBJ files,
//! building vertex buffers) surface a [`FathomError`].

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FathomError {
    #[error("failed to load OBJ file '{path}': {source}")]
    ObjLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("OBJ file '{0}' contains no geometry")]
    EmptyModel(PathBuf),

    #[error("corner {corner} references {attribute} index {index}, but only {available} are available")]
    IndexOutOfRange {
        corner: usize,
        attribute: &'static str,
        index: usize,
        available: usize,
    },

    #[error("corner count {0} is not a multiple of three")]
    IncompleteTriangle(usize),

    #[error("failed to read config '{path}': {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode texture '{path}': {source}")]
    Texture {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, FathomError>;
