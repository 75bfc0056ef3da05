// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Small wrappers for uniform buffers and bind group layouts.

pub mod binding_types;
pub mod uniform_buffer;

pub use binding_types::*;
pub use uniform_buffer::UniformBuffer;
