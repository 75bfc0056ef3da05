// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Turns a scene's frame plan into wgpu draw calls: uniform packing, mesh
//! buffers, the pipeline cache and the render engine itself.

pub mod gpu_mesh;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shader_uniforms;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineKey, PipelineManager};
pub use render_engine::RenderEngine;
pub use shader_uniforms::{LightBlock, ObjectUniforms, SceneUniforms, SkyboxUniforms};
