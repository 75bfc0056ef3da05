// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Depth buffers and textures decoded from image files.

pub mod texture_resource;

pub use texture_resource::{RgbaImage, TextureResource};
