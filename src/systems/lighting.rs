use anyhow::Result;

use super::SystemError;
use crate::core::{FrameInfo, GlobalUbo, PointLight, PointLightPushConstants, RenderTarget, MAX_LIGHTS};
use crate::ecs::components::{PointLightComponent, TransformComponent};
use crate::ecs::EntityManager;

/// Collects point lights into the global uniform buffer and draws their billboards.
#[derive(Debug, Default, Clone, Copy)]
pub struct PointLightSystem;

impl PointLightSystem {
    pub fn new() -> Self {
        Self
    }

    /// Copy every point light that has a transform into `ubo`.
    ///
    /// Fails without touching `ubo` when there are more than [`MAX_LIGHTS`] lights.
    pub fn update(&self, entities: &EntityManager, ubo: &mut GlobalUbo) -> Result<(), SystemError> {
        let mut lights = [PointLight::default(); MAX_LIGHTS];
        let mut count = 0;

        for (entity, light) in entities.view::<PointLightComponent>() {
            let Ok(transform) = entities.get_component::<TransformComponent>(entity) else {
                continue;
            };
            if count == MAX_LIGHTS {
                return Err(SystemError::TooManyPointLights {
                    max: MAX_LIGHTS,
                    found: count_placed_lights(entities),
                });
            }
            lights[count] = PointLight::new(transform.translation, light.color);
            count += 1;
        }

        ubo.point_lights = lights;
        ubo.num_lights = count as u32;
        Ok(())
    }

    /// Submit one billboard per light.
    pub fn render(&self, entities: &EntityManager, target: &mut dyn RenderTarget, frame: &FrameInfo) -> Result<usize> {
        let mut drawn = 0;
        for (entity, light) in entities.view::<PointLightComponent>() {
            let Ok(transform) = entities.get_component::<TransformComponent>(entity) else {
                continue;
            };
            let push = PointLightPushConstants {
                position: transform.translation.extend(1.0),
                color: light.color,
                radius: light.radius,
                _padding: [0.0; 3],
            };
            target.draw_point_light(frame, &push)?;
            drawn += 1;
        }
        Ok(drawn)
    }
}

/// Point lights that would be uploaded
fn count_placed_lights(entities: &EntityManager) -> usize {
    entities
        .view::<PointLightComponent>()
        .entities()
        .iter()
        .filter(|&&entity| entities.has_component::<TransformComponent>(entity))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    fn spawn_lights(entities: &mut EntityManager, count: usize) {
        for i in 0..count {
            let light = entities.create_entity();
            entities.add_components(
                light,
                (
                    PointLightComponent::new(Vec3::ONE, 0.5),
                    TransformComponent::from_translation(Vec3::new(i as f32, 0.0, 0.0)),
                ),
            );
        }
    }

    #[test]
    fn test_lights_copied_into_ubo() {
        let mut entities = EntityManager::new();
        spawn_lights(&mut entities, 3);
        // Lights without a transform are not uploaded
        let stray = entities.create_entity();
        entities.add_component(stray, PointLightComponent::default());

        let mut ubo = GlobalUbo::default();
        PointLightSystem::new().update(&entities, &mut ubo).unwrap();

        assert_eq!(ubo.num_lights, 3);
        assert_eq!(ubo.point_lights[2].position, Vec4::new(2.0, 0.0, 0.0, 1.0));
        assert_eq!(ubo.point_lights[0].color, Vec4::new(1.0, 1.0, 1.0, 0.5));
    }

    #[test]
    fn test_exactly_max_lights() {
        let mut entities = EntityManager::new();
        spawn_lights(&mut entities, MAX_LIGHTS);

        let mut ubo = GlobalUbo::default();
        PointLightSystem::new().update(&entities, &mut ubo).unwrap();
        assert_eq!(ubo.active_lights().len(), MAX_LIGHTS);
    }

    #[test]
    fn test_too_many_lights_leaves_ubo_untouched() {
        let mut entities = EntityManager::new();
        spawn_lights(&mut entities, MAX_LIGHTS + 2);

        let mut ubo = GlobalUbo::default();
        let result = PointLightSystem::new().update(&entities, &mut ubo);

        assert_eq!(
            result,
            Err(SystemError::TooManyPointLights { max: MAX_LIGHTS, found: MAX_LIGHTS + 2 })
        );
        assert_eq!(ubo, GlobalUbo::default());
    }
}
