// src/lib.rs
//! Fathom
//!
//! An underwater 3D scene viewer built on wgpu and winit: a steerable
//! submarine, scenery models, a skybox, three lights and three cameras.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::FathomApp;
pub use error::{FathomError, Result};
