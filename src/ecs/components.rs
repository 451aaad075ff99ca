/// Core components for scene entities
///
/// Rotations are YXZ Tait-Bryan angles in radians (yaw around Y, then pitch around X,
/// then roll around Z). World space follows the Vulkan convention: +Y points down.

use std::sync::Arc;

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;

/// Position, scale and orientation of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformComponent {
    pub translation: Vec3,
    pub scale: Vec3,
    pub rotation: Vec3,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
        }
    }
}

impl TransformComponent {
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    /// Orientation as a quaternion (Ry * Rx * Rz)
    #[inline]
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.rotation.y, self.rotation.x, self.rotation.z)
    }

    /// Model matrix: translate * Ry * Rx * Rz * scale
    pub fn mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation(), self.translation)
    }

    /// Inverse-transpose of the model matrix's upper 3x3, for transforming normals
    pub fn normal_matrix(&self) -> Mat3 {
        Mat3::from_quat(self.orientation()) * Mat3::from_diagonal(self.scale.recip())
    }
}

/// Linear velocity integrated into the translation every frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MoveComponent {
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

/// Angular velocity (radians per second) integrated into the rotation every frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotateComponent {
    pub velocity: Vec3,
    pub acceleration: Vec3,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

/// Projection parameters plus the matrices derived from them each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraComponent {
    pub mode: ProjectionMode,

    /// Vertical field of view in radians (perspective only)
    pub fovy: f32,
    pub aspect: f32,

    /// View volume extents (orthographic only)
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,

    pub near: f32,
    pub far: f32,

    pub projection_matrix: Mat4,
    pub view_matrix: Mat4,
    pub inverse_view_matrix: Mat4,
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            fovy: 50.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
            near: 0.1,
            far: 100.0,
            projection_matrix: Mat4::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            inverse_view_matrix: Mat4::IDENTITY,
        }
    }
}

impl CameraComponent {
    pub fn perspective(fovy: f32, near: f32, far: f32) -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            fovy,
            near,
            far,
            ..Default::default()
        }
    }

    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        Self {
            mode: ProjectionMode::Orthographic,
            left,
            right,
            top,
            bottom,
            near,
            far,
            ..Default::default()
        }
    }

    /// Camera position in world space, taken from the inverse view matrix
    pub fn position(&self) -> Vec3 {
        self.inverse_view_matrix.w_axis.truncate()
    }
}

/// A drawable mesh handle
#[derive(Debug, Clone)]
pub struct RenderComponent {
    pub model: Arc<Mesh>,
}

impl RenderComponent {
    pub fn new(model: Arc<Mesh>) -> Self {
        Self { model }
    }
}

/// Point light. `color.w` is the intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightComponent {
    pub color: Vec4,
    pub radius: f32,
}

impl Default for PointLightComponent {
    fn default() -> Self {
        Self {
            color: Vec4::ZERO,
            radius: 0.1,
        }
    }
}

impl PointLightComponent {
    pub fn new(color: Vec3, intensity: f32) -> Self {
        Self {
            color: color.extend(intensity),
            ..Default::default()
        }
    }
}

/// Marks the entity driven by keyboard input
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerTag;

/// Marks the camera the renderer draws from. Exactly one entity should carry it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActiveCameraTag;

/// Marks entities selected in tooling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectedTag;
