/// Demo scene
///
/// A character stand-in, a floor, a vase stand-in and three coloured point lights.
/// Model files are not loaded; procedural meshes take their place.

use std::sync::Arc;

use glam::Vec3;
use log::*;

use crate::ecs::components::{
    MoveComponent, PointLightComponent, RenderComponent, RotateComponent, TransformComponent,
};
use crate::ecs::{Entity, EntityManager};
use crate::mesh::Mesh;

/// Entities created by [`load_demo_scene`]
#[derive(Debug, Clone)]
pub struct DemoScene {
    pub guy: Entity,
    pub floor: Entity,
    pub vase: Entity,
    pub lights: [Entity; 3],
}

pub fn load_demo_scene(entities: &mut EntityManager) -> DemoScene {
    info!("Loading demo scene");

    let cube = Arc::new(Mesh::create_cube());
    let floor_mesh = Arc::new(Mesh::create_quad(1.0));
    let sphere = Arc::new(Mesh::create_sphere(0.5, 24, 16));

    let guy = spawn_model(entities, "Guy", cube, TransformComponent::from_translation(Vec3::new(1.0, -1.0, 0.0)));
    let floor = spawn_model(
        entities,
        "Floor",
        floor_mesh,
        TransformComponent::from_translation(Vec3::new(0.5, 0.5, 0.0)).with_scale(Vec3::new(10.0, 1.0, 10.0)),
    );
    let vase = spawn_model(entities, "Smooth Vase", sphere, TransformComponent::from_translation(Vec3::new(0.5, 0.0, 0.0)));

    let lights = [
        ("Red Light", Vec3::new(1.0, -2.0, -1.0), Vec3::new(1.0, 0.2, 0.2)),
        ("Green Light", Vec3::new(0.0, -2.0, 1.0), Vec3::new(0.2, 1.0, 0.2)),
        ("Blue Light", Vec3::new(-1.0, -2.0, -1.0), Vec3::new(0.2, 0.2, 1.0)),
    ]
    .map(|(name, position, color)| {
        let light = entities.create_named_entity(name);
        entities.add_components(
            light,
            (
                MoveComponent::default(),
                TransformComponent::from_translation(position).with_scale(Vec3::splat(0.2)),
                PointLightComponent::new(color, 2.0),
            ),
        );
        light
    });

    debug!("Demo scene has {} entities", entities.entity_count());

    DemoScene {
        guy,
        floor,
        vase,
        lights,
    }
}

fn spawn_model(entities: &mut EntityManager, name: &str, mesh: Arc<Mesh>, transform: TransformComponent) -> Entity {
    let entity = entities.create_named_entity(name);
    entities.add_components(
        entity,
        (
            RenderComponent::new(mesh),
            transform,
            MoveComponent::default(),
            RotateComponent::default(),
        ),
    );
    entity
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene_contents() {
        let mut entities = EntityManager::new();
        let scene = load_demo_scene(&mut entities);

        assert_eq!(entities.count::<RenderComponent>(), 3);
        assert_eq!(entities.count::<PointLightComponent>(), 3);
        assert_eq!(entities.entity_name(scene.vase).as_deref(), Some("Smooth Vase"));
        assert_eq!(entities.entity_name(scene.lights[1]).as_deref(), Some("Green Light"));

        let floor = entities.get_component::<TransformComponent>(scene.floor).unwrap();
        assert_eq!(floor.scale, Vec3::new(10.0, 1.0, 10.0));
        assert!(entities.has_component::<RotateComponent>(scene.guy));
    }
}
