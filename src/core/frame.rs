/// Per-frame data handed to the render target
///
/// Everything here is plain old data so a backend can upload it without conversion.

use glam::{Mat4, Vec4};

use super::lighting::{AmbientLight, PointLight, MAX_LIGHTS};
use crate::ecs::components::{CameraComponent, TransformComponent};
use crate::ecs::Entity;

/// Global uniform buffer, bound once per frame
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUbo {
    pub projection: Mat4,
    pub view: Mat4,
    pub inverse_view: Mat4,
    pub ambient_light_color: Vec4,
    pub point_lights: [PointLight; MAX_LIGHTS],
    pub num_lights: u32,
    pub _padding: [u32; 3],
}

impl Default for GlobalUbo {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            inverse_view: Mat4::IDENTITY,
            ambient_light_color: AmbientLight::default().packed(),
            point_lights: [PointLight::default(); MAX_LIGHTS],
            num_lights: 0,
            _padding: [0; 3],
        }
    }
}

impl GlobalUbo {
    /// Camera matrices and ambient term; point lights are filled in separately.
    pub fn from_camera(camera: &CameraComponent, ambient: AmbientLight) -> Self {
        Self {
            projection: camera.projection_matrix,
            view: camera.view_matrix,
            inverse_view: camera.inverse_view_matrix,
            ambient_light_color: ambient.packed(),
            ..Default::default()
        }
    }

    /// The lights actually in use
    pub fn active_lights(&self) -> &[PointLight] {
        let count = (self.num_lights as usize).min(MAX_LIGHTS);
        &self.point_lights[..count]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    /// Index of the frame-in-flight slot the backend is recording into
    pub frame_index: usize,
    /// Seconds since the previous frame
    pub frame_time: f32,
    /// Entity the frame is rendered from
    pub camera: Entity,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshPushConstants {
    pub model_matrix: Mat4,
    /// Upper 3x3 used, stored as a Mat4 for alignment
    pub normal_matrix: Mat4,
}

impl Default for MeshPushConstants {
    fn default() -> Self {
        Self {
            model_matrix: Mat4::IDENTITY,
            normal_matrix: Mat4::IDENTITY,
        }
    }
}

impl From<&TransformComponent> for MeshPushConstants {
    fn from(transform: &TransformComponent) -> Self {
        Self {
            model_matrix: transform.mat4(),
            normal_matrix: Mat4::from_mat3(transform.normal_matrix()),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightPushConstants {
    pub position: Vec4,
    pub color: Vec4,
    pub radius: f32,
    pub _padding: [f32; 3],
}
