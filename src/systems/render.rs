use anyhow::Result;

use crate::core::{FrameInfo, MeshPushConstants, RenderTarget};
use crate::ecs::components::{RenderComponent, TransformComponent};
use crate::ecs::EntityManager;

/// Submits a draw for every entity with a [`RenderComponent`].
#[derive(Debug, Default, Clone, Copy)]
pub struct RenderSystem;

impl RenderSystem {
    pub fn new() -> Self {
        Self
    }

    /// Entities without a transform are drawn at the origin. Returns the draw count.
    pub fn render(&self, entities: &EntityManager, target: &mut dyn RenderTarget, frame: &FrameInfo) -> Result<usize> {
        let renderables = entities.view::<RenderComponent>();
        for (entity, render) in renderables {
            let push = entities
                .get_component::<TransformComponent>(entity)
                .map(MeshPushConstants::from)
                .unwrap_or_default();
            target.draw_mesh(frame, &render.model, &push)?;
        }
        Ok(renderables.len())
    }
}
