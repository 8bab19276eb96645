//! Seams between the platform-free engine and the platform that hosts it.
//!
//! The browser front-end implements these with WebGPU and the DOM; tests
//! implement them with in-memory fakes.

use crate::camera::Camera;
use crate::error::EngineError;
use crate::geometry::MeshData;
use crate::input::{InputTracker, Viewport};
use crate::profile::DeviceProfile;
use crate::registry::{Disposer, ResourceHandle};
use crate::scene::{Material, Scene};
use crate::scheduler::FrameDriver;

/// Everything the backend needs to draw one frame.
pub struct FrameView<'a> {
    pub scene: &'a Scene,
    pub camera: Camera,
    pub time: f32,
    pub profile: &'a DeviceProfile,
}

pub trait RenderBackend {
    fn create_geometry(&mut self, handle: ResourceHandle, mesh: &MeshData) -> Result<(), EngineError>;
    fn create_material(&mut self, handle: ResourceHandle, material: &Material) -> Result<(), EngineError>;
    fn create_particle_buffer(&mut self, handle: ResourceHandle, capacity: usize) -> Result<(), EngineError>;
    /// Resize the output surface. `viewport` is in CSS pixels.
    fn resize(&mut self, viewport: Viewport, pixel_ratio: f32);
    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), EngineError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerMove,
    Resize,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 2] = [ListenerKind::PointerMove, ListenerKind::Resize];

    pub fn event_name(self) -> &'static str {
        match self {
            ListenerKind::PointerMove => "pointermove",
            ListenerKind::Resize => "resize",
        }
    }
}

/// Platform operations around the renderer: the mount surface, the rendering
/// context, delegated listeners and the display-refresh callback. Every
/// allocation made through a `Host` is handed back through [`Disposer`].
pub trait Host: RenderBackend + Disposer + FrameDriver {
    /// Attach the drawing surface to the container; returns its size.
    fn attach_surface(&mut self, handle: ResourceHandle) -> Result<Viewport, EngineError>;
    fn create_context(&mut self, handle: ResourceHandle, profile: &DeviceProfile) -> Result<(), EngineError>;
    fn add_listener(&mut self, handle: ResourceHandle, kind: ListenerKind) -> Result<(), EngineError>;
    /// Move input queued by listeners since the last tick into the tracker.
    fn pump_input(&mut self, _tracker: &mut InputTracker) {}
}
