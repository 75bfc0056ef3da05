use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::{
    config::{CameraConfig, LocalLightConfig, SceneConfig},
    error::Result,
    gfx::{
        camera::{
            CameraManager, CameraMode, CameraModel, FirstPersonCamera, OrbitCamera, OrthoCamera,
            Projection,
        },
        geometry::{marker_cube, MeshBuilder},
        input::{KeyAction, SceneKey},
        lighting::{DirectionalLight, LightSet, LocalLight, PointLight, RevolveAxis, SpotLight},
        uniforms::{ShaderSet, UniformSink},
    },
};

use super::{
    frame::{BlendMode, DepthState, DrawStep, DrawTarget, FramePlan, ShaderKind},
    loader::load_obj,
    object::Object,
    player::Player,
    skybox::Skybox,
    transform::Transform,
};

/// Everything on screen plus the cameras looking at it.
///
/// The scene owns all entities for its lifetime. Input handlers mutate it
/// between frames; [`Scene::update`] pushes the resulting state into the
/// shader sinks and [`Scene::frame_plan`] lists the draws in order.
pub struct Scene {
    pub player: Player,
    pub scenery: Vec<Object>,
    pub skybox: Skybox,
    pub lights: LightSet,
    pub cameras: CameraManager,
    /// Mesh drawn at the point light's position, if the scene has one.
    pub light_marker: Option<Object>,
    viewport: (u32, u32),
}

impl Scene {
    pub fn from_parts(
        player: Player,
        scenery: Vec<Object>,
        skybox: Skybox,
        lights: LightSet,
        cameras: CameraManager,
        viewport: (u32, u32),
    ) -> Self {
        Self {
            player,
            scenery,
            skybox,
            lights,
            cameras,
            light_marker: None,
            viewport,
        }
    }

    pub fn with_light_marker(mut self, marker: Object) -> Self {
        self.light_marker = Some(marker);
        self
    }

    /// Loads every model named by `config` and builds the scene around them.
    pub fn load(config: &SceneConfig) -> Result<Self> {
        let player_config = &config.player;
        let source = load_obj(config.asset(&player_config.obj))?;
        let mesh = MeshBuilder::new(&source).build()?;
        let mut player_object =
            Object::new(player_config.name.clone(), mesh, player_config.transform());
        player_object.albedo = player_config.albedo.as_deref().map(|p| config.asset(p));
        player_object.normal_map = player_config.normal_map.as_deref().map(|p| config.asset(p));
        let player = Player::new(player_object, config.movement);

        let mut scenery = Vec::with_capacity(config.scenery.len());
        for model in &config.scenery {
            let source = load_obj(config.asset(&model.obj))?;
            let mesh = MeshBuilder::new(&source).tangents(false).build()?;
            let mut object = Object::new(model.name.clone(), mesh, model.transform());
            object.albedo = model.albedo.as_deref().map(|p| config.asset(p));
            scenery.push(object);
        }

        let skybox = Skybox::new(config.skybox.faces.clone().map(|face| config.asset(&face)));

        let directional = DirectionalLight::new(
            config.directional_light.light.properties(),
            Vector3::from(config.directional_light.direction),
        );

        let anchor = player.anchor();
        let mut light_marker = None;
        let local = match &config.local_light {
            LocalLightConfig::Spot(spot) => {
                let mut light = SpotLight::new(
                    spot.light.properties(),
                    anchor.position,
                    anchor.direction,
                    spot.cutoff,
                    spot.outer_cutoff,
                );
                light.attenuation = spot.attenuation.into();
                light.lead = spot.lead;
                light.follow(anchor.position, anchor.direction);
                LocalLight::Spot(light)
            }
            LocalLightConfig::Point(point) => {
                let position = Vector3::from(point.position);
                let (source, marker_transform, name) = match &point.marker {
                    Some(marker) => (
                        load_obj(config.asset(&marker.obj))?,
                        marker.transform(),
                        marker.name.clone(),
                    ),
                    None => (marker_cube(0.5), Transform::default(), "light".to_string()),
                };
                let mesh = MeshBuilder::new(&source).tangents(false).build()?;
                light_marker = Some(Object::new(name, mesh, marker_transform));

                let light = PointLight::new(
                    point.light.properties(),
                    point.attenuation.into(),
                    position,
                )
                .with_marker(marker_transform);
                LocalLight::Point(light)
            }
        };

        let (width, height) = (config.window.width, config.window.height);
        let cameras = cameras_from_config(&config.camera, width, height);

        let mut scene = Self::from_parts(
            player,
            scenery,
            skybox,
            LightSet::new(directional, local),
            cameras,
            (width, height),
        );
        scene.light_marker = light_marker;

        let statistics = scene.statistics();
        log::info!(
            "Scene ready: {} objects, {} vertices",
            statistics.object_count,
            statistics.total_vertices
        );
        log::info!("Current ocean depth: {:.2}", scene.player.depth());
        Ok(scene)
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn camera_mode(&self) -> CameraMode {
        self.cameras.mode()
    }

    /// Per-frame state push: anchor followers first, then camera and light
    /// uniforms for the lit shaders, then the backdrop's view.
    pub fn update<S: UniformSink>(&mut self, sinks: &mut ShaderSet<S>) {
        let anchor = self.player.anchor();
        self.cameras
            .update_anchor(anchor.position, anchor.direction);
        if let Some(spot) = self.lights.local.as_spot_mut() {
            spot.follow(anchor.position, anchor.direction);
        }

        let camera = self.cameras.active();
        for sink in [&mut sinks.player, &mut sinks.model] {
            camera.write_uniforms(&mut *sink);
            self.lights.write_uniforms(&mut *sink);
        }
        sinks
            .model
            .set_int("useTexture", self.use_texture() as i32);

        sinks.skybox.set_mat4(
            "view",
            Skybox::view_matrix(camera.view_matrix(), self.viewport.1),
        );
        sinks
            .skybox
            .set_mat4("projection", camera.projection_matrix());
    }

    fn use_texture(&self) -> bool {
        self.cameras.mode() != CameraMode::FirstPerson
    }

    /// Draw order for the current state: the player (unless looking out of
    /// it), scenery in insertion order, the light marker, then the skybox.
    pub fn frame_plan(&self) -> FramePlan {
        let first_person = self.cameras.mode() == CameraMode::FirstPerson;
        let mut steps = Vec::with_capacity(self.scenery.len() + 3);

        if !first_person {
            steps.push(DrawStep {
                target: DrawTarget::Player,
                shader: ShaderKind::Player,
                model: self.player.object.model_matrix(),
                tint: None,
                depth: DepthState::Standard,
            });
        }

        for (i, object) in self.scenery.iter().enumerate() {
            steps.push(DrawStep {
                target: DrawTarget::Scenery(i),
                shader: ShaderKind::Model,
                model: object.model_matrix(),
                tint: None,
                depth: DepthState::Standard,
            });
        }

        if let (Some(_), Some(point)) = (&self.light_marker, self.lights.local.as_point()) {
            steps.push(DrawStep {
                target: DrawTarget::LightMarker,
                shader: ShaderKind::Marker,
                model: point.marker.matrix(),
                tint: Some(point.properties.color),
                depth: DepthState::Standard,
            });
        }

        steps.push(DrawStep {
            target: DrawTarget::Skybox,
            shader: ShaderKind::Skybox,
            model: Matrix4::identity(),
            tint: None,
            depth: DepthState::Backdrop,
        });

        FramePlan {
            blend: if first_person {
                BlendMode::ConstantTint(BlendMode::COCKPIT_TINT)
            } else {
                BlendMode::Disabled
            },
            use_texture: !first_person,
            steps,
        }
    }

    /// Routes a key to cameras, lights or the player. Returns false when
    /// nothing in the scene is bound to the key and action.
    pub fn handle_key(&mut self, key: SceneKey, action: KeyAction) -> bool {
        if !action.is_held() {
            return false;
        }
        let pressed = action == KeyAction::Press;

        match key {
            SceneKey::Num1 if pressed => self.cameras.toggle_perspective(),
            SceneKey::Num2 if pressed => {
                let anchor = self.player.anchor();
                self.cameras.toggle_top_down(anchor.position);
            }
            SceneKey::Num1 | SceneKey::Num2 | SceneKey::Escape => return false,
            SceneKey::Right => self.lights.directional.brighten(),
            SceneKey::Left => self.lights.directional.dim(),
            _ => return self.handle_local_key(key, pressed),
        }
        true
    }

    fn handle_local_key(&mut self, key: SceneKey, pressed: bool) -> bool {
        match &mut self.lights.local {
            LocalLight::Point(point) => match key {
                SceneKey::Space if pressed => point.toggle_selected(),
                SceneKey::Up => point.brighten(),
                SceneKey::Down => point.dim(),
                _ => match revolve_binding(key) {
                    Some((axis, sign)) if point.is_selected() => point.revolve(axis, sign),
                    _ => return self.player.handle_key(key),
                },
            },
            LocalLight::Spot(spot) => match key {
                SceneKey::F if pressed => spot.cycle_intensity(),
                _ => return self.player.handle_key(key),
            },
        }
        true
    }

    pub fn handle_pointer_button(&mut self, pressed: bool) {
        self.cameras.process_pointer_button(pressed);
    }

    pub fn handle_pointer_move(&mut self, x: f32, y: f32) {
        self.cameras.process_pointer_move(x, y);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.viewport = (width, height);
        self.cameras.resize(width, height);
    }

    /// Gets statistics about the scene
    pub fn statistics(&self) -> SceneStatistics {
        let objects = std::iter::once(&self.player.object)
            .chain(self.scenery.iter())
            .chain(self.light_marker.iter());

        let mut statistics = SceneStatistics::default();
        for object in objects {
            statistics.object_count += 1;
            statistics.total_vertices += object.mesh.vertex_count();
        }
        statistics
    }
}

/// Axis and direction a movement key revolves a selected point light by.
fn revolve_binding(key: SceneKey) -> Option<(RevolveAxis, f32)> {
    match key {
        SceneKey::W => Some((RevolveAxis::X, -1.0)),
        SceneKey::S => Some((RevolveAxis::X, 1.0)),
        SceneKey::A => Some((RevolveAxis::Y, -1.0)),
        SceneKey::D => Some((RevolveAxis::Y, 1.0)),
        SceneKey::Q => Some((RevolveAxis::Z, -1.0)),
        SceneKey::E => Some((RevolveAxis::Z, 1.0)),
        _ => None,
    }
}

fn cameras_from_config(camera: &CameraConfig, width: u32, height: u32) -> CameraManager {
    let third_person = OrbitCamera::new(
        camera.orbit_distance,
        camera.orbit_yaw,
        camera.orbit_pitch,
        camera.offset_sign,
        Projection::perspective(
            camera.fov,
            width,
            height,
            camera.third_person_near,
            camera.third_person_far,
        ),
    )
    .with_sensitivity(camera.orbit_sensitivity);

    let first_person = FirstPersonCamera::new(
        camera.first_person_distance,
        Projection::perspective(
            camera.fov,
            width,
            height,
            camera.first_person_near,
            camera.first_person_far,
        ),
    );

    let mut top_down = OrthoCamera::new(
        Vector3::new(0.0, camera.top_down_height, OrthoCamera::TILT),
        Vector3::new(0.0, 0.0, 0.0),
        Projection::orthographic(
            camera.ortho_pixels_per_unit,
            width,
            height,
            camera.ortho_near,
            camera.ortho_far,
        ),
    );
    top_down.pan_sensitivity = camera.pan_sensitivity;

    CameraManager::new(third_person, first_person, top_down)
}

/// Scene statistics for logging
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStatistics {
    pub object_count: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::MovementConfig,
        gfx::{
            geometry::MeshData,
            lighting::{Attenuation, LightModel, LightProperties},
            uniforms::UniformTable,
        },
    };
    use cgmath::{InnerSpace, Vector4};
    use std::path::PathBuf;

    fn object(name: &str, position: [f32; 3]) -> Object {
        Object::new(
            name,
            MeshData::default(),
            Transform::from_position(Vector3::from(position)),
        )
    }

    fn player() -> Player {
        let mut transform = Transform::from_position(Vector3::new(0.0, -10.0, 0.0));
        transform.rotation.y = 180.0;
        Player::new(
            Object::new("submarine", MeshData::default(), transform),
            MovementConfig::default(),
        )
    }

    fn spot() -> LocalLight {
        LocalLight::Spot(SpotLight::new(
            LightProperties::new(0.05, 1.0, 16.0, Vector3::new(1.0, 1.0, 1.0), 0.5),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            25.0,
            35.0,
        ))
    }

    fn point() -> LocalLight {
        LocalLight::Point(PointLight::new(
            LightProperties::new(0.1, 0.5, 16.0, Vector3::new(1.0, 1.0, 1.0), 1.0),
            Attenuation::WIDE,
            Vector3::new(0.0, 0.0, -20.0),
        ))
    }

    fn scene(local: LocalLight) -> Scene {
        let faces = ["rt", "lf", "up", "dn", "ft", "bk"].map(PathBuf::from);
        Scene::from_parts(
            player(),
            vec![object("megalodon", [40.0, -30.0, -75.0]), object("koi", [-65.0, 0.0, -50.0])],
            Skybox::new(faces),
            LightSet::new(DirectionalLight::default(), local),
            cameras_from_config(&CameraConfig::default(), 600, 600),
            (600, 600),
        )
    }

    fn press(scene: &mut Scene, key: SceneKey) {
        scene.handle_key(key, KeyAction::Press);
    }

    #[test]
    fn test_update_publishes_camera_and_lights() {
        let mut scene = scene(spot());
        let mut sinks = ShaderSet::<UniformTable>::default();
        scene.update(&mut sinks);

        for sink in [&sinks.player, &sinks.model] {
            assert!(sink.get_mat4("view").is_some());
            assert!(sink.get_mat4("projection").is_some());
            assert!(sink.has_prefix("directionalLight"));
            assert!(sink.has_prefix("spotLight"));
        }
        assert_eq!(sinks.model.get_int("useTexture"), Some(1));

        // The backdrop never sees translation.
        let sky_view = sinks.skybox.get_mat4("view").unwrap();
        assert_eq!(sky_view.w, Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert!(!sinks.skybox.has_prefix("spotLight"));
    }

    #[test]
    fn test_followers_track_the_player() {
        let mut scene = scene(spot());
        for _ in 0..5 {
            press(&mut scene, SceneKey::W);
        }
        let mut sinks = ShaderSet::<UniformTable>::default();
        scene.update(&mut sinks);

        let anchor = scene.player.anchor();
        assert!((anchor.position - Vector3::new(0.0, -10.0, -2.0)).magnitude() < 1e-4);

        let camera = sinks.model.get_vec3("cameraPos").unwrap();
        assert!(((camera - anchor.position).magnitude() - 5.0).abs() < 1e-4);
        // The default orbit sits behind the player.
        assert!((camera - Vector3::new(0.0, -10.0, 3.0)).magnitude() < 1e-4);

        let light = sinks.model.get_vec3("spotLight.position").unwrap();
        assert!((light - Vector3::new(0.0, -10.0, -3.0)).magnitude() < 1e-4);
        assert_eq!(
            sinks.model.get_vec3("spotLight.direction"),
            Some(anchor.direction)
        );
    }

    #[test]
    fn test_top_down_round_trip() {
        let mut scene = scene(spot());
        press(&mut scene, SceneKey::Num2);
        assert_eq!(scene.camera_mode(), CameraMode::TopDown);
        assert_eq!(scene.cameras.last_perspective(), CameraMode::ThirdPerson);

        // Auto-repeat does not toggle back.
        scene.handle_key(SceneKey::Num2, KeyAction::Repeat);
        assert_eq!(scene.camera_mode(), CameraMode::TopDown);

        press(&mut scene, SceneKey::Num2);
        assert_eq!(scene.camera_mode(), CameraMode::ThirdPerson);
    }

    #[test]
    fn test_top_down_snapshot_uses_player_position() {
        let mut scene = scene(spot());
        press(&mut scene, SceneKey::Num2);
        let camera = scene.cameras.active();
        assert_eq!(camera.target(), Vector3::new(0.0, 0.0, 0.0));
        assert!((camera.eye() - Vector3::new(0.0, 10.0, 0.1)).magnitude() < 1e-6);
    }

    #[test]
    fn test_third_person_draw_order() {
        let scene = scene(spot());
        let plan = scene.frame_plan();
        assert_eq!(plan.blend, BlendMode::Disabled);
        assert!(plan.use_texture);
        assert_eq!(
            plan.targets(),
            vec![
                DrawTarget::Player,
                DrawTarget::Scenery(0),
                DrawTarget::Scenery(1),
                DrawTarget::Skybox,
            ]
        );
        assert_eq!(plan.steps[0].shader, ShaderKind::Player);
        assert!(plan.steps[..3]
            .iter()
            .all(|step| step.depth == DepthState::Standard));
        let last = plan.steps.last().unwrap();
        assert_eq!(last.depth, DepthState::Backdrop);
    }

    #[test]
    fn test_first_person_hides_player_and_tints() {
        let mut scene = scene(spot());
        press(&mut scene, SceneKey::Num1);
        assert_eq!(scene.camera_mode(), CameraMode::FirstPerson);

        let plan = scene.frame_plan();
        assert!(!plan.contains(DrawTarget::Player));
        assert_eq!(plan.blend, BlendMode::ConstantTint([0.0, 1.0, 0.25, 1.0]));
        assert!(!plan.use_texture);
        assert_eq!(plan.targets().last(), Some(&DrawTarget::Skybox));

        let mut sinks = ShaderSet::<UniformTable>::default();
        scene.update(&mut sinks);
        assert_eq!(sinks.model.get_int("useTexture"), Some(0));
        assert_eq!(
            sinks.model.get_vec3("cameraPos"),
            Some(scene.player.anchor().position)
        );
    }

    #[test]
    fn test_releases_are_ignored() {
        let mut scene = scene(spot());
        scene.handle_key(SceneKey::Num1, KeyAction::Release);
        scene.handle_key(SceneKey::W, KeyAction::Release);
        assert_eq!(scene.camera_mode(), CameraMode::ThirdPerson);
        assert_eq!(scene.player.anchor().position, Vector3::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn test_directional_intensity_keys() {
        let mut scene = scene(spot());
        scene.handle_key(SceneKey::Left, KeyAction::Press);
        scene.handle_key(SceneKey::Left, KeyAction::Repeat);
        assert!((scene.lights.directional.properties.intensity() - 0.95).abs() < 1e-6);
        scene.handle_key(SceneKey::Right, KeyAction::Press);
        assert!((scene.lights.directional.properties.intensity() - 0.975).abs() < 1e-6);
    }

    #[test]
    fn test_spot_light_cycles_on_press_only() {
        let mut scene = scene(spot());
        press(&mut scene, SceneKey::F);
        scene.handle_key(SceneKey::F, KeyAction::Repeat);
        assert_eq!(scene.lights.local.properties().intensity(), 2.0);

        // Point light keys do nothing to a spot light.
        press(&mut scene, SceneKey::Up);
        assert_eq!(scene.lights.local.properties().intensity(), 2.0);
    }

    #[test]
    fn test_point_light_selection_routes_movement_keys() {
        let mut scene = scene(point());

        press(&mut scene, SceneKey::W);
        assert!((scene.player.anchor().position.z + 0.4).abs() < 1e-5);

        press(&mut scene, SceneKey::Space);
        let before = scene.player.anchor().position;
        press(&mut scene, SceneKey::D);
        scene.handle_key(SceneKey::D, KeyAction::Repeat);
        assert_eq!(scene.player.anchor().position, before);

        let light = scene.lights.local.as_point().unwrap();
        assert!(light.is_selected());
        assert_eq!(light.revolution, Vector3::new(0.0, 10.0, 0.0));
        assert_eq!(light.properties.color, Vector3::new(0.5, 1.0, 0.5));

        press(&mut scene, SceneKey::Space);
        press(&mut scene, SceneKey::S);
        assert!(scene.player.anchor().position.z.abs() < 1e-5);
    }

    #[test]
    fn test_handle_key_reports_unbound_keys() {
        let mut spot_scene = scene(spot());
        assert!(spot_scene.handle_key(SceneKey::W, KeyAction::Press));
        assert!(spot_scene.handle_key(SceneKey::F, KeyAction::Press));
        assert!(!spot_scene.handle_key(SceneKey::F, KeyAction::Repeat));
        assert!(!spot_scene.handle_key(SceneKey::Up, KeyAction::Press));
        assert!(!spot_scene.handle_key(SceneKey::Space, KeyAction::Press));
        assert!(!spot_scene.handle_key(SceneKey::Num1, KeyAction::Repeat));
        assert!(!spot_scene.handle_key(SceneKey::W, KeyAction::Release));

        let mut point_scene = scene(point());
        assert!(!point_scene.handle_key(SceneKey::F, KeyAction::Press));
        assert!(point_scene.handle_key(SceneKey::Space, KeyAction::Press));
        assert!(point_scene.handle_key(SceneKey::Q, KeyAction::Repeat));
        assert_eq!(
            point_scene.lights.local.as_point().unwrap().revolution,
            Vector3::new(0.0, 0.0, -5.0)
        );
    }

    #[test]
    fn test_point_light_intensity_clamps() {
        let mut scene = scene(point());
        for _ in 0..60 {
            scene.handle_key(SceneKey::Down, KeyAction::Repeat);
        }
        assert_eq!(scene.lights.local.properties().intensity(), 0.0);
    }

    #[test]
    fn test_light_marker_drawn_before_skybox() {
        let marker = Object::new("light", MeshData::default(), Transform::default());
        let mut scene = scene(point()).with_light_marker(marker);
        press(&mut scene, SceneKey::Space);

        let plan = scene.frame_plan();
        let targets = plan.targets();
        assert_eq!(targets[targets.len() - 2], DrawTarget::LightMarker);
        assert_eq!(targets[targets.len() - 1], DrawTarget::Skybox);

        let marker_step = plan.steps[targets.len() - 2];
        assert_eq!(marker_step.shader, ShaderKind::Marker);
        assert_eq!(marker_step.tint, Some(Vector3::new(0.5, 1.0, 0.5)));
        let origin = marker_step.model * Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((origin.truncate() - Vector3::new(0.0, 0.0, -20.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_pointer_drag_orbits_only_while_pressed() {
        let mut scene = scene(spot());
        scene.handle_pointer_move(100.0, 100.0);
        scene.handle_pointer_move(200.0, 100.0);
        assert_eq!(scene.cameras.third_person.yaw, -90.0);

        scene.handle_pointer_button(true);
        scene.handle_pointer_move(300.0, 300.0);
        scene.handle_pointer_move(310.0, 300.0);
        assert_eq!(scene.cameras.third_person.yaw, -80.0);

        // A new press never jumps from the old latch.
        scene.handle_pointer_button(false);
        scene.handle_pointer_button(true);
        scene.handle_pointer_move(0.0, 0.0);
        assert_eq!(scene.cameras.third_person.yaw, -80.0);
    }

    #[test]
    fn test_resize_updates_skybox_scale() {
        let mut scene = scene(spot());
        scene.resize(800, 400);
        assert_eq!(scene.viewport(), (800, 400));
        scene.resize(0, 0);
        assert_eq!(scene.viewport(), (800, 400));

        let mut sinks = ShaderSet::<UniformTable>::default();
        scene.update(&mut sinks);
        let sky = sinks.skybox.get_mat4("view").unwrap();
        // Scale 400 / 50 + 2 = 10 on a rotation matrix.
        assert!((sky.x.truncate().magnitude() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_statistics_count_objects() {
        let scene = scene(spot());
        let statistics = scene.statistics();
        assert_eq!(statistics.object_count, 3);
        assert_eq!(statistics.total_vertices, 0);
    }
}
