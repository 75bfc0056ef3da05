use cgmath::*;

use super::camera_utils::{CameraModel, Projection};

/// Pitch is held strictly inside (-90, 90) so the view direction never
/// becomes parallel to the up vector.
pub const MAX_PITCH: f32 = 89.99;

/// Which side of the anchor the orbit offset is applied on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetSign {
    /// `eye = anchor + offset`
    Positive,
    /// `eye = anchor - offset`
    #[default]
    Negative,
}

impl OffsetSign {
    pub fn apply(self, anchor: Vector3<f32>, offset: Vector3<f32>) -> Vector3<f32> {
        match self {
            OffsetSign::Positive => anchor + offset,
            OffsetSign::Negative => anchor - offset,
        }
    }
}

/// Third-person camera orbiting a moving anchor at a fixed distance.
///
/// Yaw and pitch are in degrees and driven by pointer drags. The eye is
/// recomputed from them whenever the anchor is updated.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub sensitivity: f32,
    pub sign: OffsetSign,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub projection: Projection,
    last_pointer: Option<(f32, f32)>,
}

impl CameraModel for OrbitCamera {
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

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32, sign: OffsetSign, projection: Projection) -> Self {
        let mut camera = Self {
            distance,
            yaw,
            pitch: pitch.clamp(-MAX_PITCH, MAX_PITCH),
            sensitivity: 1.0,
            sign,
            eye: Vector3::zero(), // Will be auto-calculated in `update_anchor()` nevertheless.
            target: Vector3::zero(),
            up: Vector3::unit_y(),
            projection,
            last_pointer: None,
        };
        camera.update_anchor(Vector3::zero());
        camera
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Unit-length direction scaled to the orbit distance.
    pub fn offset(&self) -> Vector3<f32> {
        calculate_orbit_offset(self.yaw, self.pitch, self.distance)
    }

    /// Re-centres the orbit on `anchor`.
    pub fn update_anchor(&mut self, anchor: Vector3<f32>) {
        self.eye = self.sign.apply(anchor, self.offset());
        self.target = anchor;
    }

    /// Applies a pointer position. The first call after construction or
    /// [`Self::reset_pointer`] only latches the position.
    pub fn process_pointer(&mut self, x: f32, y: f32) {
        let Some((last_x, last_y)) = self.last_pointer.replace((x, y)) else {
            return;
        };

        let dx = x - last_x;
        let dy = last_y - y;
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Forgets the latched pointer so the next move starts a fresh drag.
    pub fn reset_pointer(&mut self) {
        self.last_pointer = None;
    }

    pub fn is_latched(&self) -> bool {
        self.last_pointer.is_some()
    }
}

fn calculate_orbit_offset(yaw: f32, pitch: f32, distance: f32) -> Vector3<f32> {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    let direction = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
    direction.normalize() * distance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(sign: OffsetSign) -> OrbitCamera {
        OrbitCamera::new(
            5.0,
            -90.0,
            0.0,
            sign,
            Projection::perspective(45.0, 600, 600, 0.1, 40.0),
        )
    }

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-4
    }

    #[test]
    fn test_reference_position_for_each_sign() {
        let positive = camera(OffsetSign::Positive);
        assert!(approx(positive.eye, Vector3::new(0.0, 0.0, -5.0)));

        let negative = camera(OffsetSign::Negative);
        assert!(approx(negative.eye, Vector3::new(0.0, 0.0, 5.0)));

        // Both conventions mirror each other through the anchor.
        assert!(approx(positive.eye + negative.eye, Vector3::zero()));
    }

    #[test]
    fn test_distance_is_preserved_for_all_angles() {
        let mut camera = camera(OffsetSign::Negative);
        let anchor = Vector3::new(3.0, -10.0, 7.5);
        let mut yaw = -180.0;
        while yaw <= 180.0 {
            let mut pitch = -MAX_PITCH;
            while pitch <= MAX_PITCH {
                camera.yaw = yaw;
                camera.pitch = pitch;
                camera.update_anchor(anchor);
                assert!(((camera.eye - anchor).magnitude() - 5.0).abs() < 1e-4);
                assert_eq!(camera.target, anchor);
                pitch += 9.999;
            }
            yaw += 15.0;
        }
    }

    #[test]
    fn test_first_pointer_move_only_latches() {
        let mut camera = camera(OffsetSign::Negative);
        camera.process_pointer(300.0, 300.0);
        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, 0.0);
        assert!(camera.is_latched());

        camera.process_pointer(310.0, 290.0);
        assert_eq!(camera.yaw, -80.0);
        assert_eq!(camera.pitch, 10.0);
    }

    #[test]
    fn test_pitch_clamps_at_limits() {
        let mut camera = camera(OffsetSign::Negative);
        camera.process_pointer(0.0, 0.0);
        camera.process_pointer(0.0, -500.0);
        assert_eq!(camera.pitch, MAX_PITCH);

        camera.process_pointer(0.0, 1000.0);
        assert_eq!(camera.pitch, -MAX_PITCH);

        camera.update_anchor(Vector3::zero());
        assert!(camera.eye.magnitude().is_finite());
        assert!(camera.view_matrix().x.x.is_finite());
    }

    #[test]
    fn test_reset_pointer_prevents_jump() {
        let mut camera = camera(OffsetSign::Negative);
        camera.process_pointer(100.0, 100.0);
        camera.reset_pointer();
        camera.process_pointer(500.0, 500.0);
        assert_eq!(camera.yaw, -90.0);
        assert_eq!(camera.pitch, 0.0);
    }

    #[test]
    fn test_sensitivity_scales_deltas() {
        let mut camera = camera(OffsetSign::Negative).with_sensitivity(0.5);
        camera.process_pointer(0.0, 0.0);
        camera.process_pointer(10.0, 0.0);
        assert_eq!(camera.yaw, -85.0);
    }

    #[test]
    fn test_distance_is_fixed_after_construction() {
        let mut camera = camera(OffsetSign::Positive);
        camera.process_pointer(0.0, 0.0);
        camera.process_pointer(40.0, 25.0);
        camera.update_anchor(Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.distance(), 5.0);
        assert!((camera.offset().magnitude() - 5.0).abs() < 1e-4);
    }
}
