/// Per-frame systems
///
/// Each system is a small stateless (or nearly stateless) struct whose `update` walks
/// the component views it cares about. Systems hold no references into the
/// [`EntityManager`](crate::ecs::EntityManager); entities are always re-resolved by id.

pub mod camera;
pub mod lighting;
pub mod movement;
pub mod render;

pub use camera::CameraSystem;
pub use lighting::PointLightSystem;
pub use movement::MovementSystem;
pub use render::RenderSystem;

use thiserror::Error;

use crate::ecs::{EcsError, Entity};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SystemError {
    #[error(transparent)]
    Ecs(#[from] EcsError),

    #[error("camera {0} has no transform")]
    CameraWithoutTransform(Entity),

    #[error("expected exactly one active camera, found {found}")]
    ActiveCamera { found: usize },

    #[error("{found} point lights in the scene, at most {max} are supported")]
    TooManyPointLights { max: usize, found: usize },

    #[error("invalid aspect ratio {0}")]
    InvalidAspectRatio(f32),
}
