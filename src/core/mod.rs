pub mod frame;
pub mod lighting;
pub mod renderer;

pub use frame::{FrameInfo, GlobalUbo, MeshPushConstants, PointLightPushConstants};
pub use lighting::{AmbientLight, PointLight, MAX_LIGHTS};
pub use renderer::{FrameStats, FrameStatus, HeadlessRenderer, RenderTarget};
