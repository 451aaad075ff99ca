use glam::{Vec3, Vec4};

/// Capacity of the point light array in the global uniform buffer
pub const MAX_LIGHTS: usize = 10;

/// GPU layout of a single point light (std140 compatible)
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLight {
    /// World position, `w = 1`
    pub position: Vec4,
    /// RGB colour, `w` is intensity
    pub color: Vec4,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec4) -> Self {
        Self {
            position: position.extend(1.0),
            color,
        }
    }
}

/// Ambient light term. Packed as `rgb + intensity` when uploaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::new(1.0, 0.7, 0.7),
            intensity: 0.04,
        }
    }
}

impl AmbientLight {
    pub fn packed(&self) -> Vec4 {
        self.color.extend(self.intensity)
    }
}
