/// Keyboard camera controller
///
/// Converts held keys into velocities on the controlled entity's move and rotate
/// components; the movement system does the actual integration.

use std::collections::HashSet;

use glam::Vec3;
use winit::keyboard::KeyCode;

use crate::config::InputConfigData;
use crate::ecs::components::{MoveComponent, RotateComponent, TransformComponent};
use crate::ecs::{EcsError, Entity, EntityManager};

/// Source of held-key state
pub trait KeyboardState {
    fn is_pressed(&self, key: KeyCode) -> bool;
}

impl KeyboardState for HashSet<KeyCode> {
    fn is_pressed(&self, key: KeyCode) -> bool {
        self.contains(&key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMappings {
    pub move_left: KeyCode,
    pub move_right: KeyCode,
    pub move_forward: KeyCode,
    pub move_backward: KeyCode,
    pub move_up: KeyCode,
    pub move_down: KeyCode,
    pub look_left: KeyCode,
    pub look_right: KeyCode,
    pub look_up: KeyCode,
    pub look_down: KeyCode,
}

impl Default for KeyMappings {
    fn default() -> Self {
        Self {
            move_left: KeyCode::KeyA,
            move_right: KeyCode::KeyD,
            move_forward: KeyCode::KeyW,
            move_backward: KeyCode::KeyS,
            move_up: KeyCode::KeyE,
            move_down: KeyCode::KeyQ,
            look_left: KeyCode::ArrowLeft,
            look_right: KeyCode::ArrowRight,
            look_up: KeyCode::ArrowUp,
            look_down: KeyCode::ArrowDown,
        }
    }
}

#[derive(Debug, Clone)]
pub struct InputController {
    pub keys: KeyMappings,
    pub move_speed: f32,
    pub look_speed: f32,
}

impl Default for InputController {
    fn default() -> Self {
        Self::new(&InputConfigData::default())
    }
}

impl InputController {
    pub fn new(config: &InputConfigData) -> Self {
        Self {
            keys: KeyMappings::default(),
            move_speed: config.move_speed,
            look_speed: config.look_speed,
        }
    }

    /// Whether `entity` has everything [`update`](Self::update) needs
    pub fn can_control(entities: &EntityManager, entity: Entity) -> bool {
        entities.has_component::<TransformComponent>(entity)
            && entities.has_component::<MoveComponent>(entity)
            && entities.has_component::<RotateComponent>(entity)
    }

    /// Set velocities on `entity` from the held keys. With no key held both velocities
    /// are zeroed.
    pub fn update(
        &self,
        keyboard: &dyn KeyboardState,
        entities: &mut EntityManager,
        entity: Entity,
    ) -> Result<(), EcsError> {
        let yaw = entities.get_component::<TransformComponent>(entity)?.rotation.y;

        let mut rotate = Vec3::ZERO;
        if keyboard.is_pressed(self.keys.look_right) {
            rotate.y += 1.0;
        }
        if keyboard.is_pressed(self.keys.look_left) {
            rotate.y -= 1.0;
        }
        if keyboard.is_pressed(self.keys.look_up) {
            rotate.x += 1.0;
        }
        if keyboard.is_pressed(self.keys.look_down) {
            rotate.x -= 1.0;
        }

        let forward = Vec3::new(yaw.sin(), 0.0, yaw.cos());
        let right = Vec3::new(forward.z, 0.0, -forward.x);
        let up = Vec3::NEG_Y;

        let mut direction = Vec3::ZERO;
        for (key, step) in [
            (self.keys.move_forward, forward),
            (self.keys.move_backward, -forward),
            (self.keys.move_right, right),
            (self.keys.move_left, -right),
            (self.keys.move_up, up),
            (self.keys.move_down, -up),
        ] {
            if keyboard.is_pressed(key) {
                direction += step;
            }
        }

        entities.get_component_mut::<RotateComponent>(entity)?.velocity =
            self.look_speed * rotate.normalize_or_zero();
        entities.get_component_mut::<MoveComponent>(entity)?.velocity =
            self.move_speed * direction.normalize_or_zero();
        Ok(())
    }
}
