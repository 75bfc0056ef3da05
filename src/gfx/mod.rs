//! # Graphics Module
//!
//! Everything between the scene description and the GPU.
//!
//! ## Architecture Overview
//!
//! - **Geometry** ([`geometry`]) - Vertex layouts, interleaving and tangent frames
//! - **Camera System** ([`camera`]) - Orbit, first-person and top-down cameras
//! - **Lighting** ([`lighting`]) - Directional, point and spot lights
//! - **Scene Management** ([`scene`]) - Entities, input routing and frame plans
//! - **Rendering Pipeline** ([`rendering`]) - Uniform packing, pipelines and draws
//! - **Resource Management** ([`resources`]) - Depth buffers and textures
//!
//! Cameras and lights publish their state through [`uniforms::UniformSink`],
//! so everything above the rendering layer runs without a GPU.

pub mod camera;
pub mod geometry;
pub mod input;
pub mod lighting;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod uniforms;

// Re-export commonly used types
pub use camera::OrbitCamera;
pub use rendering::RenderEngine;
pub use scene::Scene;
