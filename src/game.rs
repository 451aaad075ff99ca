/// Frame orchestration
///
/// One call to [`Game::frame`] runs the whole per-frame pipeline in a fixed order:
/// input → movement → cameras → light aggregation → render submit. Everything runs on
/// the calling thread.

use anyhow::Result;
use log::*;

use crate::config::EngineConfig;
use crate::core::{AmbientLight, FrameInfo, FrameStatus, GlobalUbo, RenderTarget};
use crate::ecs::components::{ActiveCameraTag, CameraComponent, PlayerTag};
use crate::ecs::{Entity, EntityManager};
use crate::input::{InputController, KeyboardState};
use crate::systems::{CameraSystem, MovementSystem, PointLightSystem, RenderSystem, SystemError};

/// Result of one [`Game::frame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was recorded and submitted
    Presented { meshes: usize, point_lights: usize },
    /// The render target asked for a resize; nothing was drawn
    Skipped,
}

pub struct Game {
    pub entities: EntityManager,
    input: InputController,
    movement: MovementSystem,
    cameras: CameraSystem,
    point_lights: PointLightSystem,
    render_system: RenderSystem,
    ambient_light: AmbientLight,
    aspect_ratio: f32,
}

impl Game {
    /// Build the systems around an already populated scene. A default camera is
    /// created when the scene has no active camera; more than one is an error.
    pub fn new(config: &EngineConfig, mut entities: EntityManager, aspect_ratio: f32) -> Result<Self, SystemError> {
        let existing = match entities.count::<ActiveCameraTag>() {
            0 => None,
            1 => entities.get_only_entity::<ActiveCameraTag>(),
            found => return Err(SystemError::ActiveCamera { found }),
        };
        let cameras = CameraSystem::new(&mut entities, existing, &config.camera);

        Ok(Self {
            entities,
            input: InputController::new(&config.input),
            movement: MovementSystem::new(),
            cameras,
            point_lights: PointLightSystem::new(),
            render_system: RenderSystem::new(),
            ambient_light: AmbientLight {
                color: config.lighting.ambient_color,
                intensity: config.lighting.ambient_intensity,
            },
            aspect_ratio,
        })
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn input_mut(&mut self) -> &mut InputController {
        &mut self.input
    }

    pub fn camera_system(&self) -> &CameraSystem {
        &self.cameras
    }

    /// The single entity tagged [`ActiveCameraTag`]
    pub fn active_camera(&self) -> Result<Entity, SystemError> {
        self.entities
            .get_only_entity::<ActiveCameraTag>()
            .ok_or(SystemError::ActiveCamera {
                found: self.entities.count::<ActiveCameraTag>(),
            })
    }

    /// Entity steered by the keyboard: the player if there is one, else the active
    /// camera.
    pub fn controlled_entity(&self) -> Option<Entity> {
        self.entities
            .get_only_entity::<PlayerTag>()
            .or_else(|| self.entities.get_only_entity::<ActiveCameraTag>())
    }

    /// Simulation half of the frame: input, movement and camera matrices.
    pub fn update(&mut self, dt: f32, keyboard: &dyn KeyboardState) -> Result<(), SystemError> {
        if let Some(entity) = self.controlled_entity() {
            if InputController::can_control(&self.entities, entity) {
                self.input.update(keyboard, &mut self.entities, entity)?;
            }
        }

        self.movement.update(&mut self.entities, dt);
        self.cameras.update(&mut self.entities, self.aspect_ratio)
    }

    /// Record and submit one frame. Returns [`FrameOutcome::Skipped`] when the target
    /// needs a resize; the new aspect ratio is picked up for the next frame.
    pub fn render(&mut self, target: &mut dyn RenderTarget, dt: f32) -> Result<FrameOutcome> {
        let frame_index = match target.begin_frame()? {
            FrameStatus::Ready { frame_index } => frame_index,
            FrameStatus::NeedsResize => {
                let aspect_ratio = target.aspect_ratio();
                if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
                    self.aspect_ratio = aspect_ratio;
                    debug!("Render target resized, aspect ratio now {aspect_ratio:.3}");
                } else {
                    debug!("Render target reported aspect ratio {aspect_ratio}, keeping {:.3}", self.aspect_ratio);
                }
                return Ok(FrameOutcome::Skipped);
            }
        };

        let camera = self.active_camera()?;
        let frame = FrameInfo {
            frame_index,
            frame_time: dt,
            camera,
        };

        let mut ubo = GlobalUbo::from_camera(
            self.entities.get_component::<CameraComponent>(camera)?,
            self.ambient_light,
        );
        self.point_lights.update(&self.entities, &mut ubo)?;
        target.write_globals(&frame, &ubo)?;

        let meshes = self.render_system.render(&self.entities, target, &frame)?;
        let point_lights = self.point_lights.render(&self.entities, target, &frame)?;
        target.end_frame(&frame)?;

        Ok(FrameOutcome::Presented {
            meshes,
            point_lights,
        })
    }

    /// One full frame: [`update`](Self::update) then [`render`](Self::render).
    pub fn frame(&mut self, target: &mut dyn RenderTarget, dt: f32, keyboard: &dyn KeyboardState) -> Result<FrameOutcome> {
        self.update(dt, keyboard)?;
        self.render(target, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HeadlessRenderer;
    use std::collections::HashSet;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_default_camera_when_scene_has_none() {
        let game = Game::new(&EngineConfig::default(), EntityManager::new(), 1.0).unwrap();
        let camera = game.active_camera().unwrap();

        assert_eq!(camera, game.camera_system().default_camera());
        assert_eq!(game.controlled_entity(), Some(camera));
    }

    #[test]
    fn test_existing_camera_is_used() {
        let mut entities = EntityManager::new();
        let camera = entities.create_named_entity("Scene Camera");
        entities.add_components(
            camera,
            (
                ActiveCameraTag,
                CameraComponent::default(),
                crate::ecs::components::TransformComponent::default(),
            ),
        );

        let game = Game::new(&EngineConfig::default(), entities, 1.0).unwrap();
        assert_eq!(game.active_camera(), Ok(camera));
        assert_eq!(game.entities.entity_count(), 1);
    }

    #[test]
    fn test_keyboard_moves_camera() {
        let mut game = Game::new(&EngineConfig::default(), EntityManager::new(), 1.0).unwrap();
        let camera = game.active_camera().unwrap();
        let mut renderer = HeadlessRenderer::new(100, 100);
        let keys: HashSet<KeyCode> = [KeyCode::KeyW].into_iter().collect();

        game.frame(&mut renderer, 1.0, &keys).unwrap();

        let position = game
            .entities
            .get_component::<CameraComponent>(camera)
            .unwrap()
            .position();
        assert!((position.z - (-5.0 + 3.0)).abs() < 1e-5);
    }

    #[test]
    fn test_two_active_cameras_is_fatal() {
        let mut game = Game::new(&EngineConfig::default(), EntityManager::new(), 1.0).unwrap();
        let second = game.entities.create_entity();
        game.entities.add_component(second, ActiveCameraTag);

        assert_eq!(game.active_camera(), Err(SystemError::ActiveCamera { found: 2 }));
        let mut renderer = HeadlessRenderer::new(100, 100);
        assert!(game.render(&mut renderer, 0.016).is_err());
    }

    #[test]
    fn test_ambiguous_scene_cameras_rejected() {
        let mut entities = EntityManager::new();
        for _ in 0..2 {
            let camera = entities.create_entity();
            entities.add_components(
                camera,
                (
                    ActiveCameraTag,
                    CameraComponent::default(),
                    crate::ecs::components::TransformComponent::default(),
                ),
            );
        }

        let result = Game::new(&EngineConfig::default(), entities, 1.0);
        assert!(matches!(result, Err(SystemError::ActiveCamera { found: 2 })));
    }

    /// Target whose resize reports a degenerate extent
    struct CollapsedTarget;

    impl RenderTarget for CollapsedTarget {
        fn aspect_ratio(&self) -> f32 {
            0.0
        }

        fn begin_frame(&mut self) -> Result<FrameStatus> {
            Ok(FrameStatus::NeedsResize)
        }

        fn write_globals(&mut self, _: &FrameInfo, _: &GlobalUbo) -> Result<()> {
            Ok(())
        }

        fn draw_mesh(&mut self, _: &FrameInfo, _: &std::sync::Arc<crate::mesh::Mesh>, _: &crate::core::MeshPushConstants) -> Result<()> {
            Ok(())
        }

        fn draw_point_light(&mut self, _: &FrameInfo, _: &crate::core::PointLightPushConstants) -> Result<()> {
            Ok(())
        }

        fn end_frame(&mut self, _: &FrameInfo) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_degenerate_aspect_keeps_previous() {
        let mut game = Game::new(&EngineConfig::default(), EntityManager::new(), 1.5).unwrap();

        for _ in 0..3 {
            assert_eq!(game.frame(&mut CollapsedTarget, 0.016, &HashSet::<KeyCode>::new()).unwrap(), FrameOutcome::Skipped);
        }
        assert_eq!(game.aspect_ratio(), 1.5);
    }
}
