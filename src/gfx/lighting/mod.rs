//! # Lighting
//!
//! One directional light plus one local light (point or spot) light the
//! scene. Every light publishes its parameters through a
//! [`UniformSink`] under its own prefix, e.g. `spotLight.intensity`.

pub mod directional_light;
pub mod point_light;
pub mod spot_light;

use cgmath::Vector3;

use crate::gfx::uniforms::UniformSink;

pub use directional_light::DirectionalLight;
pub use point_light::{PointLight, RevolveAxis};
pub use spot_light::SpotLight;

/// Amount a single intensity key press changes a dimmable light by.
pub const INTENSITY_STEP: f32 = 0.025;

/// Shading parameters shared by every light type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProperties {
    pub ambient_strength: f32,
    pub specular_strength: f32,
    pub specular_phong: f32,
    pub color: Vector3<f32>,
    intensity: f32,
}

impl LightProperties {
    pub fn new(
        ambient_strength: f32,
        specular_strength: f32,
        specular_phong: f32,
        color: Vector3<f32>,
        intensity: f32,
    ) -> Self {
        Self {
            ambient_strength,
            specular_strength,
            specular_phong,
            color,
            intensity: intensity.max(0.0),
        }
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    /// Sets the intensity, clamping at zero.
    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    pub fn adjust_intensity(&mut self, delta: f32) {
        self.set_intensity(self.intensity + delta);
    }

    pub fn write_uniforms(&self, prefix: &str, sink: &mut dyn UniformSink) {
        sink.set_float(&format!("{prefix}.ambientStrength"), self.ambient_strength);
        sink.set_float(&format!("{prefix}.specularStrength"), self.specular_strength);
        sink.set_float(&format!("{prefix}.specularPhong"), self.specular_phong);
        sink.set_vec3(&format!("{prefix}.color"), self.color);
        sink.set_float(&format!("{prefix}.intensity"), self.intensity);
    }
}

/// Constant, linear and quadratic distance falloff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attenuation {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl Attenuation {
    /// Long range falloff (roughly 3000 units).
    pub const WIDE: Attenuation = Attenuation {
        constant: 1.0,
        linear: 0.0014,
        quadratic: 0.000007,
    };

    /// Short range falloff (roughly 100 units).
    pub const NARROW: Attenuation = Attenuation {
        constant: 1.0,
        linear: 0.045,
        quadratic: 0.0075,
    };

    pub fn new(constant: f32, linear: f32, quadratic: f32) -> Self {
        Self {
            constant,
            linear,
            quadratic,
        }
    }

    /// Light fraction that survives `distance` units.
    pub fn factor(&self, distance: f32) -> f32 {
        1.0 / (self.constant + self.linear * distance + self.quadratic * distance * distance)
    }

    pub fn write_uniforms(&self, prefix: &str, sink: &mut dyn UniformSink) {
        sink.set_float(&format!("{prefix}.constant"), self.constant);
        sink.set_float(&format!("{prefix}.linear"), self.linear);
        sink.set_float(&format!("{prefix}.quadratic"), self.quadratic);
    }
}

/// Common contract of every light.
pub trait LightModel {
    /// Uniform name prefix, e.g. `"pointLight"`.
    fn prefix(&self) -> &'static str;
    fn properties(&self) -> &LightProperties;
    fn properties_mut(&mut self) -> &mut LightProperties;

    /// Writes the variant-specific parameters.
    fn write_geometry(&self, sink: &mut dyn UniformSink);

    fn write_uniforms(&self, sink: &mut dyn UniformSink) {
        self.properties().write_uniforms(self.prefix(), sink);
        self.write_geometry(sink);
    }
}

/// The positional light of a scene.
#[derive(Debug, Clone)]
pub enum LocalLight {
    Point(PointLight),
    Spot(SpotLight),
}

impl LocalLight {
    pub fn as_point(&self) -> Option<&PointLight> {
        match self {
            LocalLight::Point(light) => Some(light),
            LocalLight::Spot(_) => None,
        }
    }

    pub fn as_point_mut(&mut self) -> Option<&mut PointLight> {
        match self {
            LocalLight::Point(light) => Some(light),
            LocalLight::Spot(_) => None,
        }
    }

    pub fn as_spot_mut(&mut self) -> Option<&mut SpotLight> {
        match self {
            LocalLight::Spot(light) => Some(light),
            LocalLight::Point(_) => None,
        }
    }

    fn model(&self) -> &dyn LightModel {
        match self {
            LocalLight::Point(light) => light,
            LocalLight::Spot(light) => light,
        }
    }

    fn model_mut(&mut self) -> &mut dyn LightModel {
        match self {
            LocalLight::Point(light) => light,
            LocalLight::Spot(light) => light,
        }
    }
}

impl LightModel for LocalLight {
    fn prefix(&self) -> &'static str {
        self.model().prefix()
    }

    fn properties(&self) -> &LightProperties {
        self.model().properties()
    }

    fn properties_mut(&mut self) -> &mut LightProperties {
        self.model_mut().properties_mut()
    }

    fn write_geometry(&self, sink: &mut dyn UniformSink) {
        self.model().write_geometry(sink);
    }
}

/// Every light the scene owns.
#[derive(Debug, Clone)]
pub struct LightSet {
    pub directional: DirectionalLight,
    pub local: LocalLight,
}

impl LightSet {
    pub fn new(directional: DirectionalLight, local: LocalLight) -> Self {
        Self { directional, local }
    }

    pub fn write_uniforms(&self, sink: &mut dyn UniformSink) {
        self.directional.write_uniforms(sink);
        self.local.write_uniforms(sink);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::uniforms::UniformTable;

    fn white() -> Vector3<f32> {
        Vector3::new(1.0, 1.0, 1.0)
    }

    #[test]
    fn test_intensity_never_negative() {
        let mut properties = LightProperties::new(0.1, 0.5, 16.0, white(), 0.01);
        properties.adjust_intensity(-INTENSITY_STEP);
        assert_eq!(properties.intensity(), 0.0);

        let clamped = LightProperties::new(0.1, 0.5, 16.0, white(), -3.0);
        assert_eq!(clamped.intensity(), 0.0);
    }

    #[test]
    fn test_common_uniform_names() {
        let properties = LightProperties::new(0.1, 0.5, 16.0, white(), 1.0);
        let mut table = UniformTable::new();
        properties.write_uniforms("directionalLight", &mut table);

        assert_eq!(table.get_float("directionalLight.ambientStrength"), Some(0.1));
        assert_eq!(table.get_float("directionalLight.specularStrength"), Some(0.5));
        assert_eq!(table.get_float("directionalLight.specularPhong"), Some(16.0));
        assert_eq!(table.get_vec3("directionalLight.color"), Some(white()));
        assert_eq!(table.get_float("directionalLight.intensity"), Some(1.0));
    }

    #[test]
    fn test_attenuation_factor() {
        assert_eq!(Attenuation::WIDE.factor(0.0), 1.0);
        assert!(Attenuation::NARROW.factor(10.0) < Attenuation::WIDE.factor(10.0));
    }

    #[test]
    fn test_light_set_writes_both_lights() {
        let spot = SpotLight::new(
            LightProperties::new(0.05, 1.0, 16.0, white(), 0.5),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            25.0,
            35.0,
        );
        let set = LightSet::new(DirectionalLight::default(), LocalLight::Spot(spot));
        let mut table = UniformTable::new();
        set.write_uniforms(&mut table);

        assert!(table.has_prefix("directionalLight"));
        assert!(table.has_prefix("spotLight"));
        assert!(!table.has_prefix("pointLight"));
        assert_eq!(set.local.prefix(), "spotLight");
    }
}
