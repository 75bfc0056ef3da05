use cgmath::Vector3;

use super::camera_utils::{CameraModel, Projection};

/// Top-down orthographic camera panned across the ground plane by dragging.
#[derive(Debug, Clone, Copy)]
pub struct OrthoCamera {
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub projection: Projection,
    /// World units moved per pixel dragged.
    pub pan_sensitivity: f32,
    /// Eye height used when snapping above a new anchor.
    pub height: f32,
    last_pointer: Option<(f32, f32)>,
}

impl CameraModel for OrthoCamera {
    fn eye(&self) -> Vector3<f32> {
        self.eye
    }

    fn target(&self) -> Vector3<f32> {
        self.target
    }

    fn up(&self) -> Vector3<f32> {
        self.up
    }

    fn projection(&self) -> &Projection {
        &self.projection
    }
}

impl OrthoCamera {
    /// Offset along +z that keeps the look direction off the up axis.
    pub const TILT: f32 = 0.1;

    pub fn new(eye: Vector3<f32>, target: Vector3<f32>, projection: Projection) -> Self {
        Self {
            eye,
            target,
            up: Vector3::unit_y(),
            projection,
            pan_sensitivity: 0.02,
            height: eye.y - target.y,
            last_pointer: None,
        }
    }

    /// Places the camera straight above `anchor`, looking down at ground level.
    pub fn snapshot(&mut self, anchor: Vector3<f32>) {
        self.target = Vector3::new(anchor.x, 0.0, anchor.z);
        self.eye = Vector3::new(anchor.x, self.height, anchor.z + Self::TILT);
    }

    /// Pans while `dragging`; otherwise only tracks the pointer.
    pub fn process_pointer(&mut self, x: f32, y: f32, dragging: bool) {
        let Some((last_x, last_y)) = self.last_pointer.replace((x, y)) else {
            return;
        };
        if !dragging {
            return;
        }

        let dx = x - last_x;
        let dy = last_y - y;
        let pan = Vector3::new(dx * self.pan_sensitivity, 0.0, -dy * self.pan_sensitivity);
        self.eye += pan;
        self.target += pan;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::InnerSpace;

    fn camera() -> OrthoCamera {
        OrthoCamera::new(
            Vector3::new(0.0, 10.0, 0.1),
            Vector3::new(0.0, 0.0, 0.0),
            Projection::orthographic(100.0, 600, 600, -100.0, 100.0),
        )
    }

    #[test]
    fn test_pan_moves_eye_and_target_together() {
        let mut camera = camera();
        camera.process_pointer(100.0, 100.0, true);
        assert_eq!(camera.eye, Vector3::new(0.0, 10.0, 0.1));

        let look = camera.target - camera.eye;
        camera.process_pointer(150.0, 80.0, true);
        // dx = 50, dy = 20
        assert!((camera.target - Vector3::new(1.0, 0.0, -0.4)).magnitude() < 1e-6);
        assert!(((camera.target - camera.eye) - look).magnitude() < 1e-6);
    }

    #[test]
    fn test_hover_only_relatches() {
        let mut camera = camera();
        camera.process_pointer(0.0, 0.0, false);
        camera.process_pointer(200.0, 200.0, false);
        assert_eq!(camera.target, Vector3::new(0.0, 0.0, 0.0));

        // The next drag starts from the hover position, not the first latch.
        camera.process_pointer(210.0, 200.0, true);
        assert!((camera.target.x - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_above_anchor() {
        let mut camera = camera();
        camera.snapshot(Vector3::new(-4.0, -30.0, 12.0));
        assert_eq!(camera.target, Vector3::new(-4.0, 0.0, 12.0));
        assert!((camera.eye - Vector3::new(-4.0, 10.0, 12.1)).magnitude() < 1e-6);
    }
}
