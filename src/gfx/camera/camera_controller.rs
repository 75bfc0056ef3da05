use super::{camera_utils::CameraMode, orbit_camera::OrbitCamera, ortho_camera::OrthoCamera};

/// Tracks the drag button and routes pointer motion to the active camera.
#[derive(Debug, Clone, Default)]
pub struct CameraController {
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the drag button state. Returns true on a fresh press.
    pub fn process_button(&mut self, pressed: bool) -> bool {
        let was_pressed = self.is_mouse_pressed;
        self.is_mouse_pressed = pressed;
        pressed && !was_pressed
    }

    pub fn is_dragging(&self) -> bool {
        self.is_mouse_pressed
    }

    pub fn process_pointer_move(
        &self,
        x: f32,
        y: f32,
        mode: CameraMode,
        orbit: &mut OrbitCamera,
        ortho: &mut OrthoCamera,
    ) {
        match mode {
            CameraMode::ThirdPerson if self.is_mouse_pressed => orbit.process_pointer(x, y),
            CameraMode::TopDown => ortho.process_pointer(x, y, self.is_mouse_pressed),
            _ => (),
        }
    }
}
