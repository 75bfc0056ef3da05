use cgmath::{Vector3, Zero};

use super::camera_utils::{CameraModel, Projection};

/// Camera sitting at the anchor and looking along its heading.
#[derive(Debug, Clone, Copy)]
pub struct FirstPersonCamera {
    /// How far ahead of the anchor the look-at target sits.
    pub distance: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub projection: Projection,
}

impl CameraModel for FirstPersonCamera {
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

impl FirstPersonCamera {
    pub fn new(distance: f32, projection: Projection) -> Self {
        Self {
            distance,
            eye: Vector3::zero(),
            target: Vector3::new(0.0, 0.0, -distance),
            up: Vector3::unit_y(),
            projection,
        }
    }

    pub fn update_anchor(&mut self, position: Vector3<f32>, direction: Vector3<f32>) {
        self.eye = position;
        self.target = position + direction * self.distance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follows_anchor_heading() {
        let mut camera =
            FirstPersonCamera::new(5.0, Projection::perspective(45.0, 600, 600, 0.1, 100.0));
        camera.update_anchor(Vector3::new(1.0, -10.0, 2.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(camera.eye(), Vector3::new(1.0, -10.0, 2.0));
        assert_eq!(camera.target(), Vector3::new(1.0, -10.0, -3.0));
    }
}
