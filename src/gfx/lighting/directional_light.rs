use cgmath::Vector3;

use super::{LightModel, LightProperties, INTENSITY_STEP};
use crate::gfx::uniforms::UniformSink;

/// Sun-like light with a direction and no position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub properties: LightProperties,
    pub direction: Vector3<f32>,
}

impl Default for DirectionalLight {
    /// White light shining straight down.
    fn default() -> Self {
        Self::new(
            LightProperties::new(0.1, 0.5, 16.0, Vector3::new(1.0, 1.0, 1.0), 1.0),
            Vector3::new(0.0, -1.0, 0.0),
        )
    }
}

impl DirectionalLight {
    pub fn new(properties: LightProperties, direction: Vector3<f32>) -> Self {
        Self {
            properties,
            direction,
        }
    }

    pub fn brighten(&mut self) {
        self.properties.adjust_intensity(INTENSITY_STEP);
        log::debug!("Directional light intensity: {:.3}", self.properties.intensity());
    }

    pub fn dim(&mut self) {
        self.properties.adjust_intensity(-INTENSITY_STEP);
        log::debug!("Directional light intensity: {:.3}", self.properties.intensity());
    }
}

impl LightModel for DirectionalLight {
    fn prefix(&self) -> &'static str {
        "directionalLight"
    }

    fn properties(&self) -> &LightProperties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut LightProperties {
        &mut self.properties
    }

    fn write_geometry(&self, sink: &mut dyn UniformSink) {
        sink.set_vec3("directionalLight.direction", self.direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::uniforms::UniformTable;

    #[test]
    fn test_fifty_dims_reach_zero() {
        let mut light = DirectionalLight::default();
        for _ in 0..50 {
            light.dim();
            assert!(light.properties.intensity() >= 0.0);
        }
        assert_eq!(light.properties.intensity(), 0.0);

        light.dim();
        assert_eq!(light.properties.intensity(), 0.0);
    }

    #[test]
    fn test_brighten() {
        let mut light = DirectionalLight::default();
        light.brighten();
        assert!((light.properties.intensity() - 1.025).abs() < 1e-6);
    }

    #[test]
    fn test_uniforms_include_direction() {
        let light = DirectionalLight::default();
        let mut table = UniformTable::new();
        light.write_uniforms(&mut table);
        assert_eq!(
            table.get_vec3("directionalLight.direction"),
            Some(Vector3::new(0.0, -1.0, 0.0))
        );
        assert_eq!(table.get_float("directionalLight.intensity"), Some(1.0));
        assert_eq!(table.len(), 6);
    }
}
