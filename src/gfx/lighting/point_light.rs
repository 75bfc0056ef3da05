use cgmath::{Deg, Matrix4, Vector3, Zero};

use super::{Attenuation, LightModel, LightProperties, INTENSITY_STEP};
use crate::gfx::{scene::transform::Transform, uniforms::UniformSink};

/// Degrees added to a revolution angle per key press.
pub const REVOLVE_STEP: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevolveAxis {
    X,
    Y,
    Z,
}

/// A light that revolves around the world origin.
///
/// The current position is always the initial position rotated by the
/// accumulated revolution angles, composed as `Rx * Ry * Rz`. The light also
/// carries a [`Transform`] so its marker mesh can be drawn where it shines from.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub properties: LightProperties,
    pub attenuation: Attenuation,
    pub initial_position: Vector3<f32>,
    /// Accumulated angles in degrees. Never wrapped.
    pub revolution: Vector3<f32>,
    pub position: Vector3<f32>,
    pub selected_color: Vector3<f32>,
    pub idle_color: Vector3<f32>,
    pub marker: Transform,
    selected: bool,
}

impl PointLight {
    pub fn new(properties: LightProperties, attenuation: Attenuation, position: Vector3<f32>) -> Self {
        Self {
            idle_color: properties.color,
            properties,
            attenuation,
            initial_position: position,
            revolution: Vector3::zero(),
            position,
            selected_color: Vector3::new(0.5, 1.0, 0.5),
            marker: Transform::from_position(position),
            selected: false,
        }
    }

    pub fn with_marker(mut self, marker: Transform) -> Self {
        self.marker = marker;
        self.marker.position = self.position;
        self
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// Flips selection and swaps the color to match.
    pub fn toggle_selected(&mut self) {
        self.selected = !self.selected;
        self.properties.color = if self.selected {
            self.selected_color
        } else {
            self.idle_color
        };
        log::info!(
            "Point light {}",
            if self.selected { "selected" } else { "released" }
        );
    }

    /// Adds `sign * 5` degrees about `axis` and moves the light.
    pub fn revolve(&mut self, axis: RevolveAxis, sign: f32) {
        let step = sign.signum() * REVOLVE_STEP;
        match axis {
            RevolveAxis::X => self.revolution.x += step,
            RevolveAxis::Y => self.revolution.y += step,
            RevolveAxis::Z => self.revolution.z += step,
        }
        self.recompute_position();
    }

    pub fn recompute_position(&mut self) {
        let rotation = Matrix4::from_angle_x(Deg(self.revolution.x))
            * Matrix4::from_angle_y(Deg(self.revolution.y))
            * Matrix4::from_angle_z(Deg(self.revolution.z));
        self.position = (rotation * self.initial_position.extend(1.0)).truncate();
        self.marker.position = self.position;
    }

    pub fn brighten(&mut self) {
        self.properties.adjust_intensity(INTENSITY_STEP);
        log::debug!("Point light intensity: {:.3}", self.properties.intensity());
    }

    pub fn dim(&mut self) {
        self.properties.adjust_intensity(-INTENSITY_STEP);
        log::debug!("Point light intensity: {:.3}", self.properties.intensity());
    }
}

impl LightModel for PointLight {
    fn prefix(&self) -> &'static str {
        "pointLight"
    }

    fn properties(&self) -> &LightProperties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut LightProperties {
        &mut self.properties
    }

    fn write_geometry(&self, sink: &mut dyn UniformSink) {
        sink.set_vec3("pointLight.position", self.position);
        self.attenuation.write_uniforms("pointLight", sink);
    }
}
