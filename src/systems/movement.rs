use std::f32::consts::TAU;

use glam::Vec3;

use crate::ecs::components::{MoveComponent, RotateComponent, TransformComponent};
use crate::ecs::{Entity, EntityManager};

/// Integrates linear and angular velocity into transforms.
///
/// Velocity is advanced first (`v += a * dt`) and the new velocity is applied to the
/// position (`p += v * dt`). Entities without a transform are skipped and their
/// velocity is left untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct MovementSystem;

impl MovementSystem {
    pub fn new() -> Self {
        Self
    }

    pub fn update(&self, entities: &mut EntityManager, dt: f32) {
        let movers: Vec<Entity> = entities.view::<MoveComponent>().entities().to_vec();
        for entity in movers {
            if !entities.has_component::<TransformComponent>(entity) {
                continue;
            }
            let Ok(movement) = entities.get_component_mut::<MoveComponent>(entity) else {
                continue;
            };
            let velocity = integrate(&mut movement.velocity, movement.acceleration, dt);

            if let Ok(transform) = entities.get_component_mut::<TransformComponent>(entity) {
                transform.translation += velocity * dt;
            }
        }

        let rotators: Vec<Entity> = entities.view::<RotateComponent>().entities().to_vec();
        for entity in rotators {
            if !entities.has_component::<TransformComponent>(entity) {
                continue;
            }
            let Ok(rotation) = entities.get_component_mut::<RotateComponent>(entity) else {
                continue;
            };
            let velocity = integrate(&mut rotation.velocity, rotation.acceleration, dt);

            if let Ok(transform) = entities.get_component_mut::<TransformComponent>(entity) {
                let r = transform.rotation + velocity * dt;
                transform.rotation = Vec3::new(wrap_angle(r.x), wrap_angle(r.y), wrap_angle(r.z));
            }
        }
    }
}

fn integrate(velocity: &mut Vec3, acceleration: Vec3, dt: f32) -> Vec3 {
    *velocity += acceleration * dt;
    *velocity
}

/// Bring an angle back into `[0, 2π)`.
///
/// A single turn of overshoot is undone by adding or subtracting `2π`, which keeps
/// small angles exact. Anything further out falls back to a euclidean remainder.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = if angle >= TAU {
        angle - TAU
    } else if angle < 0.0 {
        angle + TAU
    } else {
        angle
    };

    if (0.0..TAU).contains(&wrapped) || wrapped.is_nan() {
        return wrapped;
    }

    // More than a full turn in one step, or -ε + 2π rounding up to 2π
    let wrapped = wrapped.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(1.0), 1.0);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-6);
        assert!((wrap_angle(-0.25) - (TAU - 0.25)).abs() < 1e-6);
    }

    #[test]
    fn test_wrap_angle_multiple_turns() {
        for angle in [3.0 * TAU + 0.5, -5.0 * TAU - 0.5, 1.0e6, -1.0e-9] {
            let wrapped = wrap_angle(angle);
            assert!((0.0..TAU).contains(&wrapped), "{angle} wrapped to {wrapped}");
        }
    }

    #[test]
    fn test_velocity_then_position() {
        let mut entities = EntityManager::new();
        let e = entities.create_entity();
        entities.add_components(
            e,
            (
                TransformComponent::default(),
                MoveComponent {
                    velocity: Vec3::X,
                    acceleration: Vec3::new(0.0, 2.0, 0.0),
                },
            ),
        );

        MovementSystem::new().update(&mut entities, 0.5);

        let movement = entities.get_component::<MoveComponent>(e).unwrap();
        assert_eq!(movement.velocity, Vec3::new(1.0, 1.0, 0.0));
        let transform = entities.get_component::<TransformComponent>(e).unwrap();
        assert_eq!(transform.translation, Vec3::new(0.5, 0.5, 0.0));
    }

    #[test]
    fn test_rotation_wraps_after_step() {
        let mut entities = EntityManager::new();
        let e = entities.create_entity();
        entities.add_components(
            e,
            (
                TransformComponent::default().with_rotation(Vec3::new(TAU - 0.01, 0.0, 0.0)),
                RotateComponent {
                    velocity: Vec3::new(0.04, -0.2, 0.0),
                    acceleration: Vec3::ZERO,
                },
            ),
        );

        MovementSystem::new().update(&mut entities, 0.5);

        let rotation = entities.get_component::<TransformComponent>(e).unwrap().rotation;
        assert!((rotation.x - 0.01).abs() < 1e-4);
        assert!((rotation.y - (TAU - 0.1)).abs() < 1e-4);
        assert_eq!(rotation.z, 0.0);
    }

    #[test]
    fn test_entities_without_transform_are_skipped() {
        let mut entities = EntityManager::new();
        let e = entities.create_entity();
        entities.add_component(
            e,
            MoveComponent {
                velocity: Vec3::ZERO,
                acceleration: Vec3::ONE,
            },
        );

        MovementSystem::new().update(&mut entities, 1.0);

        assert_eq!(entities.get_component::<MoveComponent>(e).unwrap().velocity, Vec3::ZERO);
    }
}
