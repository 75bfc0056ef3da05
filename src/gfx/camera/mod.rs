pub mod camera_controller;
pub mod camera_utils;
pub mod first_person_camera;
pub mod orbit_camera;
pub mod ortho_camera;

// Re-export main types
pub use camera_controller::CameraController;
pub use camera_utils::{CameraManager, CameraMode, CameraModel, Projection};
pub use first_person_camera::FirstPersonCamera;
pub use orbit_camera::{OffsetSign, OrbitCamera};
pub use ortho_camera::OrthoCamera;
