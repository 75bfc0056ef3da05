//! Scene configuration.
//!
//! Everything the viewer builds at startup (models, textures, lights and
//! camera parameters) is described by a [`SceneConfig`]. The default value is
//! the underwater submarine scene; a JSON file may override any subset of it.

use std::fs;
use std::path::{Path, PathBuf};

use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{FathomError, Result};
use crate::gfx::camera::OffsetSign;
use crate::gfx::lighting::{Attenuation, LightProperties};
use crate::gfx::scene::transform::Transform;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    /// Directory every relative asset path is resolved against.
    pub asset_root: PathBuf,
    pub player: ModelConfig,
    pub movement: MovementConfig,
    pub scenery: Vec<ModelConfig>,
    pub skybox: SkyboxConfig,
    pub directional_light: DirectionalLightConfig,
    pub local_light: LocalLightConfig,
    pub camera: CameraConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let scenery = [
            ("megalodon", [40.0, -30.0, -75.0], 0.2, [-25.0, 225.0, -25.0]),
            ("turtle", [0.0, -30.0, -100.0], 0.03, [-25.0, 225.0, 0.0]),
            ("enemy_submarine", [40.0, -80.0, -20.0], 0.5, [45.0, 45.0, 0.0]),
            ("seahorse", [-45.0, -20.0, -75.0], 0.03, [0.0, 25.0, 0.0]),
            ("starfish", [0.0, -5.0, -50.0], 0.2, [0.0, 25.0, 25.0]),
            ("koi", [-65.0, 0.0, -50.0], 0.1, [0.0, 0.0, 0.0]),
        ]
        .into_iter()
        .map(|(name, position, scale, rotation)| ModelConfig {
            albedo: Some(PathBuf::from(format!("3D/{name}_texture.png"))),
            ..ModelConfig::named(name, position, scale, rotation)
        })
        .collect();

        Self {
            window: WindowConfig::default(),
            asset_root: PathBuf::from("."),
            player: ModelConfig {
                albedo: Some(PathBuf::from("3D/submarine_texture.png")),
                normal_map: Some(PathBuf::from("3D/submarine_normal.png")),
                ..ModelConfig::named("submarine", [0.0, -10.0, 0.0], 0.00375, [0.0, 180.0, 0.0])
            },
            movement: MovementConfig::default(),
            scenery,
            skybox: SkyboxConfig::default(),
            directional_light: DirectionalLightConfig::default(),
            local_light: LocalLightConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Reads a JSON config. Missing fields keep their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| FathomError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|source| FathomError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Resolves an asset path against [`Self::asset_root`].
    pub fn asset(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.asset_root.join(path)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Fathom".to_string(),
            width: 600,
            height: 600,
        }
    }
}

/// An OBJ model with its textures and initial placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub obj: PathBuf,
    pub albedo: Option<PathBuf>,
    pub normal_map: Option<PathBuf>,
    pub position: [f32; 3],
    pub scale: [f32; 3],
    /// Euler angles in degrees.
    pub rotation: [f32; 3],
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            obj: PathBuf::new(),
            albedo: None,
            normal_map: None,
            position: [0.0; 3],
            scale: [1.0; 3],
            rotation: [0.0; 3],
        }
    }
}

impl ModelConfig {
    fn named(name: &str, position: [f32; 3], scale: f32, rotation: [f32; 3]) -> Self {
        Self {
            name: name.to_string(),
            obj: PathBuf::from(format!("3D/{name}.obj")),
            position,
            scale: [scale; 3],
            rotation,
            ..Default::default()
        }
    }

    pub fn transform(&self) -> Transform {
        Transform::new(
            Vector3::from(self.position),
            Vector3::from(self.scale),
            Vector3::from(self.rotation),
        )
    }
}

/// Per-key step sizes for the player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub move_step: f32,
    /// Degrees per key press.
    pub turn_step: f32,
    pub depth_step: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_step: 0.4,
            turn_step: 2.0,
            depth_step: 0.2,
        }
    }
}

/// Cube map face images in +x, -x, +y, -y, +z, -z order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxConfig {
    pub faces: [PathBuf; 6],
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            faces: ["rt", "lf", "up", "dn", "ft", "bk"]
                .map(|face| PathBuf::from(format!("Skybox/uw_{face}.jpg"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub ambient_strength: f32,
    pub specular_strength: f32,
    pub specular_phong: f32,
    pub color: [f32; 3],
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            ambient_strength: 0.1,
            specular_strength: 0.5,
            specular_phong: 16.0,
            color: [1.0; 3],
            intensity: 1.0,
        }
    }
}

impl LightConfig {
    pub fn properties(&self) -> LightProperties {
        LightProperties::new(
            self.ambient_strength,
            self.specular_strength,
            self.specular_phong,
            Vector3::from(self.color),
            self.intensity,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttenuationConfig {
    pub constant: f32,
    pub linear: f32,
    pub quadratic: f32,
}

impl From<AttenuationConfig> for Attenuation {
    fn from(config: AttenuationConfig) -> Self {
        Attenuation::new(config.constant, config.linear, config.quadratic)
    }
}

impl From<Attenuation> for AttenuationConfig {
    fn from(attenuation: Attenuation) -> Self {
        Self {
            constant: attenuation.constant,
            linear: attenuation.linear,
            quadratic: attenuation.quadratic,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLightConfig {
    #[serde(flatten)]
    pub light: LightConfig,
    pub direction: [f32; 3],
}

impl Default for DirectionalLightConfig {
    fn default() -> Self {
        Self {
            light: LightConfig::default(),
            direction: [0.0, -1.0, 0.0],
        }
    }
}

/// The scene's positional light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LocalLightConfig {
    Point(PointLightConfig),
    Spot(SpotLightConfig),
}

impl Default for LocalLightConfig {
    fn default() -> Self {
        LocalLightConfig::Spot(SpotLightConfig::default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointLightConfig {
    #[serde(flatten)]
    pub light: LightConfig,
    pub position: [f32; 3],
    pub attenuation: AttenuationConfig,
    /// Mesh drawn at the light's position; a small cube when absent.
    pub marker: Option<ModelConfig>,
}

impl Default for PointLightConfig {
    fn default() -> Self {
        Self {
            light: LightConfig::default(),
            position: [0.0, -5.0, -30.0],
            attenuation: Attenuation::WIDE.into(),
            marker: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpotLightConfig {
    #[serde(flatten)]
    pub light: LightConfig,
    /// Degrees.
    pub cutoff: f32,
    /// Degrees.
    pub outer_cutoff: f32,
    /// Distance ahead of the player.
    pub lead: f32,
    pub attenuation: AttenuationConfig,
}

impl Default for SpotLightConfig {
    fn default() -> Self {
        Self {
            light: LightConfig {
                ambient_strength: 0.05,
                specular_strength: 1.0,
                specular_phong: 16.0,
                color: [1.0; 3],
                intensity: 0.5,
            },
            cutoff: 25.0,
            outer_cutoff: 35.0,
            lead: 1.0,
            attenuation: Attenuation::NARROW.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees for both perspective cameras.
    pub fov: f32,
    pub orbit_distance: f32,
    pub orbit_yaw: f32,
    pub orbit_pitch: f32,
    pub orbit_sensitivity: f32,
    pub offset_sign: OffsetSign,
    pub third_person_near: f32,
    pub third_person_far: f32,
    pub first_person_distance: f32,
    pub first_person_near: f32,
    pub first_person_far: f32,
    pub ortho_pixels_per_unit: f32,
    pub ortho_near: f32,
    pub ortho_far: f32,
    pub top_down_height: f32,
    pub pan_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 45.0,
            orbit_distance: 5.0,
            orbit_yaw: -90.0,
            orbit_pitch: 0.0,
            orbit_sensitivity: 1.0,
            offset_sign: OffsetSign::Negative,
            third_person_near: 0.1,
            third_person_far: 40.0,
            first_person_distance: 5.0,
            first_person_near: 0.1,
            first_person_far: 100.0,
            ortho_pixels_per_unit: 100.0,
            ortho_near: -100.0,
            ortho_far: 100.0,
            top_down_height: 10.0,
            pan_sensitivity: 0.02,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene() {
        let config = SceneConfig::default();
        assert_eq!(config.window.width, 600);
        assert_eq!(config.scenery.len(), 6);
        assert_eq!(config.player.position, [0.0, -10.0, 0.0]);
        assert_eq!(config.scenery[0].obj, PathBuf::from("3D/megalodon.obj"));
        assert_eq!(
            config.scenery[5].albedo,
            Some(PathBuf::from("3D/koi_texture.png"))
        );
        assert_eq!(config.skybox.faces[2], PathBuf::from("Skybox/uw_up.jpg"));
        assert!(matches!(config.local_light, LocalLightConfig::Spot(_)));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SceneConfig::from_json(
            r#"{ "window": { "width": 1024 }, "camera": { "offset_sign": "positive" } }"#,
        )
        .unwrap();
        assert_eq!(config.window.width, 1024);
        assert_eq!(config.window.height, 600);
        assert_eq!(config.camera.offset_sign, OffsetSign::Positive);
        assert_eq!(config.camera.orbit_distance, 5.0);
        assert_eq!(config.scenery.len(), 6);
    }

    #[test]
    fn test_point_light_variant() {
        let config = SceneConfig::from_json(
            r#"{ "local_light": { "kind": "point", "position": [1.0, 2.0, 3.0], "intensity": 2.0 } }"#,
        )
        .unwrap();
        match config.local_light {
            LocalLightConfig::Point(point) => {
                assert_eq!(point.position, [1.0, 2.0, 3.0]);
                assert_eq!(point.light.intensity, 2.0);
                assert_eq!(point.attenuation, AttenuationConfig::from(Attenuation::WIDE));
                assert!(point.marker.is_none());
            }
            other => panic!("expected point light, got {:?}", other),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let config = SceneConfig::default();
        let json = config.to_json().unwrap();
        assert_eq!(SceneConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_asset_resolution() {
        let config = SceneConfig {
            asset_root: PathBuf::from("assets"),
            ..Default::default()
        };
        assert_eq!(
            config.asset(Path::new("3D/koi.obj")),
            PathBuf::from("assets/3D/koi.obj")
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = SceneConfig::load("does/not/exist.json");
        assert!(matches!(result, Err(FathomError::ConfigIo { .. })));
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        assert!(SceneConfig::from_json("{ not json").is_err());
    }
}
