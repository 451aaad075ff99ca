use anyhow::{Context, Result};
use glam::Vec3;
use log::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::ecs::components::ProjectionMode;

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfigData,
    pub camera: CameraConfigData,
    pub input: InputConfigData,
    pub lighting: LightingConfigData,
}

impl EngineConfig {
    /// Load configuration from JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to JSON file with pretty formatting
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load the config, or write out and return the defaults if it can't be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|err| {
            warn!("{err:#}, using default configuration");
            let config = Self::default();
            if let Err(err) = config.save(path) {
                warn!("Could not write default config: {err:#}");
            }
            config
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfigData {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfigData {
    fn default() -> Self {
        Self {
            title: "BVE Engine".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// Default camera created when the scene has none (serializable)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfigData {
    #[serde(with = "vec3_serde")]
    pub position: Vec3,

    /// YXZ Euler angles in radians
    #[serde(with = "vec3_serde")]
    pub rotation: Vec3,

    pub projection: ProjectionMode,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,

    /// Orthographic view volume
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Default for CameraConfigData {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, -2.5, -5.0),
            rotation: Vec3::ZERO,
            projection: ProjectionMode::Perspective,
            fov: 50.0,
            near: 0.1,
            far: 100.0,
            left: -1.0,
            right: 1.0,
            top: 1.0,
            bottom: -1.0,
        }
    }
}

/// Keyboard controller tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfigData {
    /// Units per second
    pub move_speed: f32,
    /// Radians per second
    pub look_speed: f32,
}

impl Default for InputConfigData {
    fn default() -> Self {
        Self {
            move_speed: 3.0,
            look_speed: 1.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfigData {
    #[serde(with = "vec3_serde")]
    pub ambient_color: Vec3,
    pub ambient_intensity: f32,
}

impl Default for LightingConfigData {
    fn default() -> Self {
        Self {
            ambient_color: Vec3::new(1.0, 0.7, 0.7),
            ambient_intensity: 0.04,
        }
    }
}

/// Custom serialization for Vec3
mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Vec3Data {
        x: f32,
        y: f32,
        z: f32,
    }

    pub fn serialize<S>(vec: &Vec3, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Vec3Data {
            x: vec.x,
            y: vec.y,
            z: vec.z,
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec3, D::Error>
    where
        D: Deserializer<'de>,
    {
        let data = Vec3Data::deserialize(deserializer)?;
        Ok(Vec3::new(data.x, data.y, data.z))
    }
}
