use cgmath::{ortho, perspective, Deg, Matrix4, Point3, Vector3};

use crate::gfx::uniforms::UniformSink;

use super::{
    camera_controller::CameraController, first_person_camera::FirstPersonCamera,
    orbit_camera::OrbitCamera, ortho_camera::OrthoCamera,
};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// A camera that can be asked for its view and projection every frame.
pub trait CameraModel {
    fn eye(&self) -> Vector3<f32>;
    fn target(&self) -> Vector3<f32>;
    fn up(&self) -> Vector3<f32>;
    fn projection(&self) -> &Projection;

    fn view_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::new(self.eye().x, self.eye().y, self.eye().z);
        let target = Point3::new(self.target().x, self.target().y, self.target().z);
        Matrix4::look_at_rh(eye, target, self.up())
    }

    fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection().matrix()
    }

    /// Publishes `view`, `projection` and `cameraPos`.
    fn write_uniforms(&self, sink: &mut dyn UniformSink) {
        sink.set_mat4("view", self.view_matrix());
        sink.set_mat4("projection", self.projection_matrix());
        sink.set_vec3("cameraPos", self.eye());
    }
}

/// Projection parameters, fixed per camera at construction apart from the
/// viewport-dependent terms updated by [`Projection::resize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        fovy: Deg<f32>,
        aspect: f32,
        znear: f32,
        zfar: f32,
    },
    /// Symmetric orthographic volume sized from the viewport in pixels.
    Orthographic {
        pixels_per_unit: f32,
        half_width: f32,
        half_height: f32,
        znear: f32,
        zfar: f32,
    },
}

impl Projection {
    pub fn perspective(fovy: f32, width: u32, height: u32, znear: f32, zfar: f32) -> Self {
        let mut projection = Projection::Perspective {
            fovy: Deg(fovy),
            aspect: 1.0,
            znear,
            zfar,
        };
        projection.resize(width, height);
        projection
    }

    pub fn orthographic(pixels_per_unit: f32, width: u32, height: u32, znear: f32, zfar: f32) -> Self {
        let mut projection = Projection::Orthographic {
            pixels_per_unit,
            half_width: 1.0,
            half_height: 1.0,
            znear,
            zfar,
        };
        projection.resize(width, height);
        projection
    }

    /// Recomputes the aspect ratio or the orthographic extents. A zero-sized
    /// viewport (minimised window) leaves the projection unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        match self {
            Projection::Perspective { aspect, .. } => {
                *aspect = width as f32 / height as f32;
            }
            Projection::Orthographic {
                pixels_per_unit,
                half_width,
                half_height,
                ..
            } => {
                *half_width = width as f32 / *pixels_per_unit;
                *half_height = height as f32 / *pixels_per_unit;
            }
        }
    }

    /// Clip-space projection in wgpu's 0..1 depth convention.
    pub fn matrix(&self) -> Matrix4<f32> {
        let gl = match *self {
            Projection::Perspective {
                fovy,
                aspect,
                znear,
                zfar,
            } => perspective(fovy, aspect, znear, zfar),
            Projection::Orthographic {
                half_width,
                half_height,
                znear,
                zfar,
                ..
            } => ortho(-half_width, half_width, -half_height, half_height, znear, zfar),
        };
        OPENGL_TO_WGPU_MATRIX * gl
    }
}

/// Which camera is currently rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMode {
    ThirdPerson,
    FirstPerson,
    TopDown,
}

impl CameraMode {
    pub fn is_perspective(self) -> bool {
        !matches!(self, CameraMode::TopDown)
    }
}

/// Owns the three scene cameras and the switching state machine.
pub struct CameraManager {
    pub third_person: OrbitCamera,
    pub first_person: FirstPersonCamera,
    pub top_down: OrthoCamera,
    pub controller: CameraController,
    mode: CameraMode,
    last_perspective: CameraMode,
}

impl CameraManager {
    pub fn new(
        third_person: OrbitCamera,
        first_person: FirstPersonCamera,
        top_down: OrthoCamera,
    ) -> Self {
        Self {
            third_person,
            first_person,
            top_down,
            controller: CameraController::new(),
            mode: CameraMode::ThirdPerson,
            last_perspective: CameraMode::ThirdPerson,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// The perspective camera that a top-down exit returns to.
    pub fn last_perspective(&self) -> CameraMode {
        self.last_perspective
    }

    pub fn active(&self) -> &dyn CameraModel {
        match self.mode {
            CameraMode::ThirdPerson => &self.third_person,
            CameraMode::FirstPerson => &self.first_person,
            CameraMode::TopDown => &self.top_down,
        }
    }

    /// Swaps between the third- and first-person cameras. From top-down
    /// this switches to the perspective opposite the remembered one.
    pub fn toggle_perspective(&mut self) {
        let current = if self.mode.is_perspective() {
            self.mode
        } else {
            self.last_perspective
        };
        let next = match current {
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
            _ => CameraMode::FirstPerson,
        };
        self.mode = next;
        self.last_perspective = next;
        log::info!("Camera switched to {:?}", next);
    }

    /// Enters top-down above `anchor`, or leaves it for the last perspective.
    pub fn toggle_top_down(&mut self, anchor: Vector3<f32>) {
        if self.mode == CameraMode::TopDown {
            self.mode = self.last_perspective;
        } else {
            self.top_down.snapshot(anchor);
            self.mode = CameraMode::TopDown;
        }
        log::info!("Camera switched to {:?}", self.mode);
    }

    /// Moves the anchored cameras to follow the player.
    pub fn update_anchor(&mut self, position: Vector3<f32>, direction: Vector3<f32>) {
        self.third_person.update_anchor(position);
        self.first_person.update_anchor(position, direction);
    }

    pub fn process_pointer_button(&mut self, pressed: bool) {
        if self.controller.process_button(pressed) {
            self.third_person.reset_pointer();
        }
    }

    pub fn process_pointer_move(&mut self, x: f32, y: f32) {
        self.controller.process_pointer_move(
            x,
            y,
            self.mode,
            &mut self.third_person,
            &mut self.top_down,
        );
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.third_person.projection.resize(width, height);
        self.first_person.projection.resize(width, height);
        self.top_down.projection.resize(width, height);
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::camera::orbit_camera::OffsetSign;
    use crate::gfx::uniforms::UniformTable;
    use cgmath::{InnerSpace, SquareMatrix, Vector4};

    fn manager() -> CameraManager {
        CameraManager::new(
            OrbitCamera::new(
                5.0,
                -90.0,
                0.0,
                OffsetSign::Negative,
                Projection::perspective(45.0, 600, 600, 0.1, 40.0),
            ),
            FirstPersonCamera::new(5.0, Projection::perspective(45.0, 600, 600, 0.1, 100.0)),
            OrthoCamera::new(
                Vector3::new(0.0, 10.0, 0.1),
                Vector3::new(0.0, 0.0, 0.0),
                Projection::orthographic(100.0, 600, 600, -100.0, 100.0),
            ),
        )
    }

    #[test]
    fn test_starts_in_third_person() {
        let cameras = manager();
        assert_eq!(cameras.mode(), CameraMode::ThirdPerson);
        assert_eq!(cameras.last_perspective(), CameraMode::ThirdPerson);
    }

    #[test]
    fn test_top_down_round_trip_keeps_last_perspective() {
        let mut cameras = manager();
        cameras.toggle_top_down(Vector3::new(0.0, -10.0, 0.0));
        assert_eq!(cameras.mode(), CameraMode::TopDown);
        assert_eq!(cameras.last_perspective(), CameraMode::ThirdPerson);

        cameras.toggle_top_down(Vector3::new(0.0, -10.0, 0.0));
        assert_eq!(cameras.mode(), CameraMode::ThirdPerson);
    }

    #[test]
    fn test_perspective_toggle_is_remembered_across_top_down() {
        let mut cameras = manager();
        cameras.toggle_perspective();
        assert_eq!(cameras.mode(), CameraMode::FirstPerson);
        assert_eq!(cameras.last_perspective(), CameraMode::FirstPerson);

        cameras.toggle_top_down(Vector3::new(3.0, -10.0, 4.0));
        cameras.toggle_top_down(Vector3::new(3.0, -10.0, 4.0));
        assert_eq!(cameras.mode(), CameraMode::FirstPerson);

        cameras.toggle_perspective();
        assert_eq!(cameras.mode(), CameraMode::ThirdPerson);
        assert_eq!(cameras.last_perspective(), CameraMode::ThirdPerson);
    }

    #[test]
    fn test_perspective_toggle_from_top_down() {
        let mut cameras = manager();
        cameras.toggle_top_down(Vector3::new(0.0, 0.0, 0.0));
        cameras.toggle_perspective();
        assert_eq!(cameras.mode(), CameraMode::FirstPerson);
        assert_eq!(cameras.last_perspective(), CameraMode::FirstPerson);
    }

    #[test]
    fn test_top_down_snapshots_anchor() {
        let mut cameras = manager();
        cameras.toggle_top_down(Vector3::new(3.0, -10.0, 4.0));
        let active = cameras.active();
        assert!((active.target() - Vector3::new(3.0, 0.0, 4.0)).magnitude() < 1e-6);
        assert!((active.eye() - Vector3::new(3.0, 10.0, 4.1)).magnitude() < 1e-6);
    }

    #[test]
    fn test_write_uniforms_publishes_active_camera() {
        let mut cameras = manager();
        cameras.update_anchor(Vector3::new(0.0, -10.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        let mut table = UniformTable::new();
        cameras.active().write_uniforms(&mut table);

        assert_eq!(table.get_vec3("cameraPos"), Some(cameras.third_person.eye()));
        assert!(table.get_mat4("view").is_some());
        assert!(table.get_mat4("projection").is_some());
    }

    #[test]
    fn test_perspective_resize_updates_aspect() {
        let mut projection = Projection::perspective(45.0, 600, 600, 0.1, 40.0);
        projection.resize(800, 400);
        match projection {
            Projection::Perspective { aspect, .. } => assert!((aspect - 2.0).abs() < 1e-6),
            _ => panic!("expected perspective"),
        }
        // A minimised window is ignored.
        projection.resize(0, 0);
        assert!(projection.matrix().is_invertible());
    }

    #[test]
    fn test_orthographic_extents_follow_viewport() {
        let projection = Projection::orthographic(100.0, 600, 400, -100.0, 100.0);
        match projection {
            Projection::Orthographic {
                half_width,
                half_height,
                ..
            } => {
                assert!((half_width - 6.0).abs() < 1e-6);
                assert!((half_height - 4.0).abs() < 1e-6);
            }
            _ => panic!("expected orthographic"),
        }
        // The right edge maps to x = 1 in clip space.
        let clip = projection.matrix() * Vector4::new(6.0, 0.0, 0.0, 1.0);
        assert!((clip.x - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_projection_depth_range_is_zero_to_one() {
        let projection = Projection::perspective(45.0, 600, 600, 0.1, 40.0);
        let near = projection.matrix() * Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = projection.matrix() * Vector4::new(0.0, 0.0, -40.0, 1.0);
        assert!((near.z / near.w).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_convert_matrix4_to_array_is_column_major() {
        let m = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let array = convert_matrix4_to_array(m);
        assert_eq!(array[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(convert_matrix4_to_array(Matrix4::identity())[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
