//! # Geometry
//!
//! Vertex layouts, mesh interleaving and the handful of built-in shapes.
//!
//! ```rust
//! use fathom::gfx::geometry::{Corner, MeshBuilder, MeshSource};
//!
//! let source = MeshSource {
//!     positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
//!     normals: vec![],
//!     texcoords: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]],
//!     corners: (0..3).map(Corner::uniform).collect(),
//! };
//! let mesh = MeshBuilder::new(&source).build().unwrap();
//! assert_eq!(mesh.vertices.len(), mesh.vertex_count() * mesh.stride());
//! ```

pub mod mesh_builder;
pub mod primitives;
pub mod vertex;

pub use mesh_builder::{Corner, MeshBuilder, MeshData, MeshSource, TangentFrame};
pub use primitives::{marker_cube, skybox_cube, IndexedGeometry};
pub use vertex::{AttributePresence, VertexAttribute};
