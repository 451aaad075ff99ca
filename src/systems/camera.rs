/// Camera projection and view matrices
///
/// Conventions: left-handed, +Z forward, +Y down, depth in `[0, 1]`. Camera
/// orientation comes from the transform's YXZ Euler angles; the view matrix is the
/// inverse of the camera's rotation and translation (scale is ignored).

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3, Vec4};
use log::*;

use super::SystemError;
use crate::config::CameraConfigData;
use crate::ecs::components::{
    ActiveCameraTag, CameraComponent, MoveComponent, ProjectionMode, RotateComponent,
    TransformComponent,
};
use crate::ecs::{Entity, EntityManager};

pub struct CameraSystem {
    default_camera: Entity,
}

impl CameraSystem {
    /// Use `camera` as the default camera, or create `"Default Camera"` from `defaults`
    /// when `None` is given.
    pub fn new(entities: &mut EntityManager, camera: Option<Entity>, defaults: &CameraConfigData) -> Self {
        let default_camera = match camera {
            Some(camera) => camera,
            None => {
                let camera = entities.create_named_entity("Default Camera");
                let projection = match defaults.projection {
                    ProjectionMode::Perspective => CameraComponent::perspective(
                        defaults.fov.to_radians(),
                        defaults.near,
                        defaults.far,
                    ),
                    ProjectionMode::Orthographic => CameraComponent::orthographic(
                        defaults.left,
                        defaults.right,
                        defaults.top,
                        defaults.bottom,
                        defaults.near,
                        defaults.far,
                    ),
                };
                entities.add_components(
                    camera,
                    (
                        MoveComponent::default(),
                        RotateComponent::default(),
                        ActiveCameraTag,
                        projection,
                        TransformComponent::from_translation(defaults.position)
                            .with_rotation(defaults.rotation),
                    ),
                );
                info!("Created default camera {camera} at {}", defaults.position);
                camera
            }
        };

        Self { default_camera }
    }

    pub fn default_camera(&self) -> Entity {
        self.default_camera
    }

    /// Recompute projection and view matrices of every camera.
    ///
    /// Every camera records `aspect_ratio`; perspective cameras need it positive and finite.
    pub fn update(&self, entities: &mut EntityManager, aspect_ratio: f32) -> Result<(), SystemError> {
        let cameras: Vec<Entity> = entities.view::<CameraComponent>().entities().to_vec();
        for entity in cameras {
            let transform = *entities
                .get_component::<TransformComponent>(entity)
                .map_err(|_| SystemError::CameraWithoutTransform(entity))?;
            let camera = entities.get_component_mut::<CameraComponent>(entity)?;

            let valid_aspect = aspect_ratio.is_finite() && aspect_ratio > 0.0;
            if camera.mode == ProjectionMode::Perspective && !valid_aspect {
                return Err(SystemError::InvalidAspectRatio(aspect_ratio));
            }

            camera.aspect = aspect_ratio;
            camera.projection_matrix = match camera.mode {
                ProjectionMode::Perspective => perspective_projection(camera),
                ProjectionMode::Orthographic => orthographic_projection(camera),
            };

            let (view, inverse_view) = view_matrices(&transform);
            camera.view_matrix = view;
            camera.inverse_view_matrix = inverse_view;
        }
        Ok(())
    }

    /// Place `camera` at `position` looking along `direction`. `direction` must be
    /// non-zero and not parallel to `up`.
    pub fn set_view_direction(
        &self,
        entities: &mut EntityManager,
        camera: Entity,
        position: Vec3,
        direction: Vec3,
        up: Vec3,
    ) -> Result<(), SystemError> {
        let transform = entities
            .get_component_mut::<TransformComponent>(camera)
            .map_err(|_| SystemError::CameraWithoutTransform(camera))?;
        transform.translation = position;
        transform.rotation = euler_from_direction(direction, up);
        Ok(())
    }

    /// Place `camera` at `position` looking at `target`.
    pub fn set_view_target(
        &self,
        entities: &mut EntityManager,
        camera: Entity,
        position: Vec3,
        target: Vec3,
        up: Vec3,
    ) -> Result<(), SystemError> {
        self.set_view_direction(entities, camera, position, target - position, up)
    }
}

/// Left-handed perspective with depth in `[0, 1]`
pub fn perspective_projection(camera: &CameraComponent) -> Mat4 {
    Mat4::perspective_lh(camera.fovy, camera.aspect, camera.near, camera.far)
}

/// Orthographic projection of the camera's view volume. `top` maps to clip y = -1,
/// so the default volume keeps +Y pointing down the screen.
pub fn orthographic_projection(camera: &CameraComponent) -> Mat4 {
    Mat4::orthographic_lh(
        camera.left,
        camera.right,
        camera.top,
        camera.bottom,
        camera.near,
        camera.far,
    )
}

/// View and inverse-view matrices for a camera at `transform`.
pub fn view_matrices(transform: &TransformComponent) -> (Mat4, Mat4) {
    let rotation = Mat3::from_quat(Quat::from_euler(
        EulerRot::YXZ,
        transform.rotation.y,
        transform.rotation.x,
        transform.rotation.z,
    ));
    let (u, v, w) = (rotation.x_axis, rotation.y_axis, rotation.z_axis);
    let t = transform.translation;

    // Rows of the view matrix are the camera basis
    let view = Mat4::from_cols(
        Vec4::new(u.x, v.x, w.x, 0.0),
        Vec4::new(u.y, v.y, w.y, 0.0),
        Vec4::new(u.z, v.z, w.z, 0.0),
        Vec4::new(-u.dot(t), -v.dot(t), -w.dot(t), 1.0),
    );
    let inverse_view = Mat4::from_cols(u.extend(0.0), v.extend(0.0), w.extend(0.0), t.extend(1.0));

    (view, inverse_view)
}

/// YXZ Euler angles whose forward axis is `direction` and whose up axis leans
/// towards `up`.
pub fn euler_from_direction(direction: Vec3, up: Vec3) -> Vec3 {
    let forward = direction.normalize();
    let yaw = forward.x.atan2(forward.z);
    let pitch = (-forward.y).atan2((forward.x * forward.x + forward.z * forward.z).sqrt());

    // Camera right/down axes before roll
    let (s1, c1) = yaw.sin_cos();
    let (s2, c2) = pitch.sin_cos();
    let right = Vec3::new(c1, 0.0, -s1);
    let down = Vec3::new(s1 * s2, c2, c1 * s2);

    let roll = up.dot(right).atan2(-up.dot(down));

    Vec3::new(pitch, yaw, roll)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn camera_at(translation: Vec3, rotation: Vec3) -> (EntityManager, Entity) {
        let mut entities = EntityManager::new();
        let camera = entities.create_entity();
        entities.add_components(
            camera,
            (
                CameraComponent::default(),
                TransformComponent::from_translation(translation).with_rotation(rotation),
            ),
        );
        (entities, camera)
    }

    #[test]
    fn test_default_camera_created() {
        let mut entities = EntityManager::new();
        let system = CameraSystem::new(&mut entities, None, &CameraConfigData::default());
        let camera = system.default_camera();

        assert_eq!(entities.entity_name(camera).as_deref(), Some("Default Camera"));
        assert_eq!(entities.get_only_entity::<ActiveCameraTag>(), Some(camera));
        assert!(entities.has_component::<MoveComponent>(camera));
        assert!(entities.has_component::<RotateComponent>(camera));
        assert_eq!(
            entities.get_component::<TransformComponent>(camera).unwrap().translation,
            Vec3::new(0.0, -2.5, -5.0)
        );
    }

    #[test]
    fn test_existing_camera_is_kept() {
        let (mut entities, camera) = camera_at(Vec3::ZERO, Vec3::ZERO);
        let system = CameraSystem::new(&mut entities, Some(camera), &CameraConfigData::default());

        assert_eq!(system.default_camera(), camera);
        assert_eq!(entities.entity_count(), 1);
    }

    #[test]
    fn test_perspective_entries() {
        let camera = CameraComponent {
            fovy: FRAC_PI_2,
            aspect: 2.0,
            near: 1.0,
            far: 11.0,
            ..Default::default()
        };
        let m = perspective_projection(&camera);

        assert!((m.x_axis.x - 0.5).abs() < 1e-6);
        assert!((m.y_axis.y - 1.0).abs() < 1e-6);
        assert!((m.z_axis.z - 1.1).abs() < 1e-6);
        assert_eq!(m.z_axis.w, 1.0);
        assert!((m.w_axis.z + 1.1).abs() < 1e-6);
        assert_eq!(m.w_axis.w, 0.0);
    }

    #[test]
    fn test_orthographic_entries() {
        let camera = CameraComponent::orthographic(-2.0, 2.0, 1.0, -1.0, 0.0, 10.0);
        let m = orthographic_projection(&camera);

        assert_eq!(m.x_axis.x, 0.5);
        assert_eq!(m.y_axis.y, -1.0);
        assert_eq!(m.z_axis.z, 0.1);
        assert_eq!(m.w_axis, Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_view_is_inverse_of_camera_transform() {
        let transform = TransformComponent::from_translation(Vec3::new(1.0, -2.0, 3.0))
            .with_rotation(Vec3::new(0.4, 1.1, -0.3));
        let (view, inverse_view) = view_matrices(&transform);

        assert!((view * inverse_view).abs_diff_eq(Mat4::IDENTITY, 1e-5));
        let camera_to_world = Mat4::from_rotation_translation(transform.orientation(), transform.translation);
        assert!(inverse_view.abs_diff_eq(camera_to_world, 1e-5));
    }

    #[test]
    fn test_update_fills_matrices() {
        let (mut entities, camera) = camera_at(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
        let system = CameraSystem::new(&mut entities, Some(camera), &CameraConfigData::default());

        system.update(&mut entities, 1.5).unwrap();

        let component = entities.get_component::<CameraComponent>(camera).unwrap();
        assert_eq!(component.aspect, 1.5);
        assert_eq!(component.position(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(component.view_matrix.transform_point3(Vec3::ZERO), Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_camera_without_transform() {
        let mut entities = EntityManager::new();
        let camera = entities.create_entity();
        entities.add_component(camera, CameraComponent::default());
        let system = CameraSystem::new(&mut entities, Some(camera), &CameraConfigData::default());

        assert_eq!(
            system.update(&mut entities, 1.0),
            Err(SystemError::CameraWithoutTransform(camera))
        );
    }

    #[test]
    fn test_zero_aspect_rejected() {
        let (mut entities, camera) = camera_at(Vec3::ZERO, Vec3::ZERO);
        let system = CameraSystem::new(&mut entities, Some(camera), &CameraConfigData::default());

        assert!(matches!(
            system.update(&mut entities, 0.0),
            Err(SystemError::InvalidAspectRatio(_))
        ));
    }

    #[test]
    fn test_orthographic_records_aspect() {
        let (mut entities, camera) = camera_at(Vec3::ZERO, Vec3::ZERO);
        entities.add_component(camera, CameraComponent::orthographic(-2.0, 2.0, 1.0, -1.0, 0.1, 10.0));
        let system = CameraSystem::new(&mut entities, Some(camera), &CameraConfigData::default());

        system.update(&mut entities, 2.0).unwrap();
        let component = entities.get_component::<CameraComponent>(camera).unwrap();
        assert_eq!(component.aspect, 2.0);
        assert_eq!(component.projection_matrix, orthographic_projection(component));
    }

    #[test]
    fn test_direction_round_trip() {
        for (direction, up) in [
            (Vec3::Z, Vec3::NEG_Y),
            (Vec3::new(1.0, -0.5, 2.0), Vec3::NEG_Y),
            (Vec3::new(-1.0, 0.3, -0.2), Vec3::new(0.3, -1.0, 0.1)),
        ] {
            let rotation = euler_from_direction(direction, up);
            let orientation = Quat::from_euler(EulerRot::YXZ, rotation.y, rotation.x, rotation.z);

            let forward = orientation * Vec3::Z;
            assert!(forward.abs_diff_eq(direction.normalize(), 1e-5));

            // Camera down axis is +Y, so `up` must land in the upper half
            let camera_up = orientation * Vec3::NEG_Y;
            assert!(camera_up.dot(up) > 0.0);
        }
    }

    #[test]
    fn test_straight_ahead_has_no_roll() {
        let rotation = euler_from_direction(Vec3::Z, Vec3::NEG_Y);
        assert!(rotation.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn test_set_view_target() {
        let (mut entities, camera) = camera_at(Vec3::ZERO, Vec3::ZERO);
        let system = CameraSystem::new(&mut entities, Some(camera), &CameraConfigData::default());

        system
            .set_view_target(&mut entities, camera, Vec3::new(0.0, 0.0, -4.0), Vec3::ZERO, Vec3::NEG_Y)
            .unwrap();
        system.update(&mut entities, 1.0).unwrap();

        let component = entities.get_component::<CameraComponent>(camera).unwrap();
        let target_in_view = component.view_matrix.transform_point3(Vec3::ZERO);
        assert!(target_in_view.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-5));
    }
}
