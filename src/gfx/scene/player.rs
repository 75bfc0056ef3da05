use cgmath::Vector3;

use super::object::Object;
use crate::config::MovementConfig;
use crate::gfx::input::SceneKey;

/// Where the player is and which way it faces on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: Vector3<f32>,
    pub direction: Vector3<f32>,
}

/// The steerable submarine that cameras and the spot light follow.
///
/// Depth is the Y coordinate; the surface is at zero and the player can never
/// rise above it.
#[derive(Debug, Clone)]
pub struct Player {
    pub object: Object,
    pub movement: MovementConfig,
}

impl Player {
    pub fn new(object: Object, movement: MovementConfig) -> Self {
        Self { object, movement }
    }

    pub fn anchor(&self) -> Anchor {
        Anchor {
            position: self.object.transform.position,
            direction: self.object.transform.direction(),
        }
    }

    pub fn depth(&self) -> f32 {
        self.object.transform.position.y
    }

    /// Applies a movement key. Returns false for keys the player ignores.
    pub fn handle_key(&mut self, key: SceneKey) -> bool {
        let transform = &mut self.object.transform;
        let direction = transform.direction();
        match key {
            SceneKey::W => transform.position += direction * self.movement.move_step,
            SceneKey::S => transform.position -= direction * self.movement.move_step,
            SceneKey::A => transform.rotation.y += self.movement.turn_step,
            SceneKey::D => transform.rotation.y -= self.movement.turn_step,
            SceneKey::Q => {
                if transform.position.y != 0.0 {
                    transform.position.y =
                        (transform.position.y + self.movement.depth_step).min(0.0);
                }
                log::info!("Current ocean depth: {:.2}", transform.position.y);
            }
            SceneKey::E => {
                transform.position.y -= self.movement.depth_step;
                log::info!("Current ocean depth: {:.2}", transform.position.y);
            }
            _ => return false,
        }
        true
    }
}
