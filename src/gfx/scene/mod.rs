//! # Scene Module
//!
//! The entities on screen and the orchestration that ties them together each
//! frame. Nothing in here touches the GPU: the [`Scene`] publishes uniforms
//! through a [`UniformSink`](crate::gfx::uniforms::UniformSink) and describes
//! its draws as a [`FramePlan`] that the render engine executes.
//!
//! ## Key Components
//!
//! - [`Scene`] - Owns the player, scenery, skybox, lights and cameras
//! - [`Player`] - The steerable submarine everything else follows
//! - [`Object`] - A mesh placed in the world with optional textures
//! - [`Skybox`] - Cube-mapped backdrop drawn last
//! - [`FramePlan`] - Ordered draw steps for one frame
//!
//! ## Usage
//!
//! ```no_run
//! use fathom::config::SceneConfig;
//! use fathom::gfx::{scene::Scene, uniforms::{ShaderSet, UniformTable}};
//!
//! let config = SceneConfig::default();
//! let mut scene = Scene::load(&config).unwrap();
//! let mut sinks = ShaderSet::<UniformTable>::default();
//! scene.update(&mut sinks);
//! let plan = scene.frame_plan();
//! ```

pub mod frame;
pub mod loader;
pub mod object;
pub mod player;
pub mod scene;
pub mod skybox;
pub mod transform;

pub use frame::{BlendMode, DepthState, DrawStep, DrawTarget, FramePlan, ShaderKind};
pub use loader::load_obj;
pub use object::Object;
pub use player::{Anchor, Player};
pub use scene::{Scene, SceneStatistics};
pub use skybox::Skybox;
pub use transform::Transform;
