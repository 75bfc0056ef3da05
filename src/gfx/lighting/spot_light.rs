use cgmath::Vector3;

use super::{Attenuation, LightModel, LightProperties};
use crate::gfx::uniforms::UniformSink;

/// Cone light that follows an anchor, e.g. a headlamp in front of the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub properties: LightProperties,
    pub attenuation: Attenuation,
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
    /// Inner cone half-angle in degrees.
    pub cutoff: f32,
    /// Outer cone half-angle in degrees; equal to `cutoff` for a hard edge.
    pub outer_cutoff: f32,
    /// How far ahead of the anchor the light sits.
    pub lead: f32,
    intensity_level: i32,
}

impl SpotLight {
    pub fn new(
        properties: LightProperties,
        position: Vector3<f32>,
        direction: Vector3<f32>,
        cutoff: f32,
        outer_cutoff: f32,
    ) -> Self {
        Self {
            properties,
            attenuation: Attenuation::NARROW,
            position,
            direction,
            cutoff,
            outer_cutoff,
            lead: 1.0,
            intensity_level: 0,
        }
    }

    pub fn update_anchor(&mut self, position: Vector3<f32>, direction: Vector3<f32>) {
        self.position = position;
        self.direction = direction;
    }

    /// Places the light `lead` units ahead of the anchor, pointing its way.
    pub fn follow(&mut self, anchor: Vector3<f32>, heading: Vector3<f32>) {
        self.update_anchor(anchor + heading * self.lead, heading);
    }

    pub fn intensity_level(&self) -> i32 {
        self.intensity_level
    }

    /// Steps through the three brightness levels.
    pub fn cycle_intensity(&mut self) {
        self.intensity_level = self.intensity_level.wrapping_add(1);
        self.properties
            .set_intensity(intensity_for_level(self.intensity_level));
        log::info!(
            "Spot light intensity: {}",
            self.properties.intensity()
        );
    }

    pub fn cutoff_cosine(&self) -> f32 {
        self.cutoff.to_radians().cos()
    }

    pub fn outer_cutoff_cosine(&self) -> f32 {
        self.outer_cutoff.to_radians().cos()
    }
}

/// 1, 2, 3, 1, 2, ... for levels 0, 1, 2, 3, 4, ...
pub fn intensity_for_level(level: i32) -> f32 {
    (level.rem_euclid(3) + 1) as f32
}

impl LightModel for SpotLight {
    fn prefix(&self) -> &'static str {
        "spotLight"
    }

    fn properties(&self) -> &LightProperties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut LightProperties {
        &mut self.properties
    }

    fn write_geometry(&self, sink: &mut dyn UniformSink) {
        sink.set_vec3("spotLight.position", self.position);
        sink.set_vec3("spotLight.direction", self.direction);
        self.attenuation.write_uniforms("spotLight", sink);
        sink.set_float("spotLight.cutoff", self.cutoff_cosine());
        sink.set_float("spotLight.outerCutoff", self.outer_cutoff_cosine());
    }
}
