/// Render boundary
///
/// The frame loop talks to the GPU only through [`RenderTarget`]. A frame is
/// `begin_frame` → `write_globals` → draws → `end_frame`. `begin_frame` may instead
/// report [`FrameStatus::NeedsResize`], in which case the caller skips the frame and
/// re-reads [`RenderTarget::aspect_ratio`].
///
/// [`HeadlessRenderer`] implements the boundary without a device. It tracks swapchain
/// extent and frames in flight the way a real backend would, and records what was
/// submitted so the frame loop can be driven from tests.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use anyhow::{bail, Result};
use log::*;

use super::frame::{FrameInfo, GlobalUbo, MeshPushConstants, PointLightPushConstants};
use crate::mesh::Mesh;

pub const MAX_FRAMES_IN_FLIGHT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Recording may start into the given frame-in-flight slot
    Ready { frame_index: usize },
    /// Swapchain is out of date; skip this frame
    NeedsResize,
}

pub trait RenderTarget {
    /// Width over height of the current swapchain extent
    fn aspect_ratio(&self) -> f32;

    fn begin_frame(&mut self) -> Result<FrameStatus>;

    /// Upload the global uniform buffer for the frame being recorded
    fn write_globals(&mut self, frame: &FrameInfo, ubo: &GlobalUbo) -> Result<()>;

    fn draw_mesh(&mut self, frame: &FrameInfo, mesh: &Arc<Mesh>, push: &MeshPushConstants) -> Result<()>;

    /// Draw a camera-facing billboard for a point light
    fn draw_point_light(&mut self, frame: &FrameInfo, push: &PointLightPushConstants) -> Result<()>;

    fn end_frame(&mut self, frame: &FrameInfo) -> Result<()>;
}

/// What the last finished frame submitted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameStats {
    pub globals: Option<GlobalUbo>,
    pub meshes: Vec<MeshPushConstants>,
    pub point_lights: Vec<PointLightPushConstants>,
}

/// Device-less [`RenderTarget`]
pub struct HeadlessRenderer {
    width: u32,
    height: u32,
    swapchain_dirty: bool,
    current_frame: usize,
    recording: Option<usize>,
    frame_count: u64,
    /// Keyed by allocation address; the `Weak` pins that address while the entry lives
    uploaded_meshes: HashMap<usize, Weak<Mesh>>,
    pending: FrameStats,
    last_frame: FrameStats,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            swapchain_dirty: false,
            current_frame: 0,
            recording: None,
            frame_count: 0,
            uploaded_meshes: HashMap::new(),
            pending: FrameStats::default(),
            last_frame: FrameStats::default(),
        }
    }

    /// Window size changed; the next `begin_frame` reports `NeedsResize`.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.swapchain_dirty = true;
    }

    /// Frames presented so far
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Distinct live meshes that have been drawn at least once
    pub fn uploaded_mesh_count(&self) -> usize {
        self.uploaded_meshes
            .values()
            .filter(|mesh| mesh.strong_count() > 0)
            .count()
    }

    pub fn last_frame(&self) -> &FrameStats {
        &self.last_frame
    }

    fn check_recording(&self, frame: &FrameInfo) -> Result<()> {
        match self.recording {
            Some(index) if index == frame.frame_index => Ok(()),
            Some(index) => bail!(
                "frame slot {} is not being recorded (current slot {index})",
                frame.frame_index
            ),
            None => bail!("draw submitted outside of a frame"),
        }
    }
}

impl RenderTarget for HeadlessRenderer {
    fn aspect_ratio(&self) -> f32 {
        // Minimized or collapsed to a line: no meaningful ratio to report
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        self.width as f32 / self.height as f32
    }

    fn begin_frame(&mut self) -> Result<FrameStatus> {
        if self.recording.is_some() {
            bail!("begin_frame called while a frame is still being recorded");
        }

        // Minimized: keep reporting until the window has an area again
        if self.width == 0 || self.height == 0 {
            return Ok(FrameStatus::NeedsResize);
        }

        if self.swapchain_dirty {
            debug!("Recreating swapchain at {}x{}", self.width, self.height);
            self.swapchain_dirty = false;
            return Ok(FrameStatus::NeedsResize);
        }

        self.recording = Some(self.current_frame);
        self.pending = FrameStats::default();
        Ok(FrameStatus::Ready {
            frame_index: self.current_frame,
        })
    }

    fn write_globals(&mut self, frame: &FrameInfo, ubo: &GlobalUbo) -> Result<()> {
        self.check_recording(frame)?;
        self.pending.globals = Some(*ubo);
        Ok(())
    }

    fn draw_mesh(&mut self, frame: &FrameInfo, mesh: &Arc<Mesh>, push: &MeshPushConstants) -> Result<()> {
        self.check_recording(frame)?;
        let key = Arc::as_ptr(mesh) as usize;
        let uploaded = self
            .uploaded_meshes
            .get(&key)
            .is_some_and(|known| known.strong_count() > 0);
        if !uploaded {
            self.uploaded_meshes.insert(key, Arc::downgrade(mesh));
            trace!(
                "Uploading mesh ({} vertices, {} indices)",
                mesh.vertices.len(),
                mesh.indices.len()
            );
        }
        self.pending.meshes.push(*push);
        Ok(())
    }

    fn draw_point_light(&mut self, frame: &FrameInfo, push: &PointLightPushConstants) -> Result<()> {
        self.check_recording(frame)?;
        self.pending.point_lights.push(*push);
        Ok(())
    }

    fn end_frame(&mut self, frame: &FrameInfo) -> Result<()> {
        self.check_recording(frame)?;
        if self.pending.globals.is_none() {
            bail!("frame {} ended without global uniforms", frame.frame_index);
        }

        let before = self.uploaded_meshes.len();
        self.uploaded_meshes.retain(|_, mesh| mesh.strong_count() > 0);
        if self.uploaded_meshes.len() != before {
            trace!("Released {} mesh uploads", before - self.uploaded_meshes.len());
        }

        self.recording = None;
        self.last_frame = std::mem::take(&mut self.pending);
        self.current_frame = (self.current_frame + 1) % MAX_FRAMES_IN_FLIGHT;
        self.frame_count += 1;
        Ok(())
    }
}
