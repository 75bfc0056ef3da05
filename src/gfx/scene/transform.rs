use cgmath::{Deg, Matrix4, Vector3, Zero};

/// Position, scale and Euler rotation (degrees) of a scene entity.
///
/// The model matrix is composed as `T * S * Rx * Ry * Rz`: rotation about X is
/// applied first in matrix order, then Y, then Z, and the result is scaled
/// before it is translated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    /// Euler angles in degrees, applied X then Y then Z.
    pub rotation: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::zero(),
        }
    }
}

impl Transform {
    pub fn new(position: Vector3<f32>, scale: Vector3<f32>, rotation: Vector3<f32>) -> Self {
        Self {
            position,
            scale,
            rotation,
        }
    }

    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Model matrix: translate, scale, then rotate about X, Y and Z.
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
            * Matrix4::from_angle_x(Deg(self.rotation.x))
            * Matrix4::from_angle_y(Deg(self.rotation.y))
            * Matrix4::from_angle_z(Deg(self.rotation.z))
    }

    /// Heading on the ground plane derived from the Y rotation.
    pub fn direction(&self) -> Vector3<f32> {
        let yaw = self.rotation.y.to_radians();
        Vector3::new(yaw.sin(), 0.0, yaw.cos())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector4};

    fn approx(a: Vector3<f32>, b: Vector3<f32>) -> bool {
        (a - b).magnitude() < 1e-5
    }

    #[test]
    fn test_identity_transform() {
        let transform = Transform::default();
        let m = transform.matrix();
        let p = m * Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert!(approx(p.truncate(), Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_translation_applied_after_scale() {
        let transform = Transform::new(
            Vector3::new(10.0, 0.0, 0.0),
            Vector3::new(2.0, 2.0, 2.0),
            Vector3::zero(),
        );
        let p = transform.matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!(approx(p.truncate(), Vector3::new(12.0, 0.0, 0.0)));
    }

    #[test]
    fn test_rotation_order_is_x_then_y_then_z() {
        let transform = Transform::new(
            Vector3::zero(),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(90.0, 90.0, 0.0),
        );
        let expected = Matrix4::from_angle_x(Deg(90.0)) * Matrix4::from_angle_y(Deg(90.0));
        let v = Vector4::new(0.0, 0.0, 1.0, 0.0);
        assert!(approx(
            (transform.matrix() * v).truncate(),
            (expected * v).truncate()
        ));

        // Swapping the composition order gives a different answer.
        let swapped = Matrix4::from_angle_y(Deg(90.0)) * Matrix4::from_angle_x(Deg(90.0));
        assert!(!approx(
            (transform.matrix() * v).truncate(),
            (swapped * v).truncate()
        ));
    }

    #[test]
    fn test_direction_from_yaw() {
        let mut transform = Transform::default();
        transform.rotation.y = 180.0;
        assert!(approx(transform.direction(), Vector3::new(0.0, 0.0, -1.0)));

        transform.rotation.y = 90.0;
        assert!(approx(transform.direction(), Vector3::new(1.0, 0.0, 0.0)));
    }
}
