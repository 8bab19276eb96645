// In-memory host used by the engine tests. Records every allocation, disposal,
// listener and frame request so lifecycle properties can be checked.

#![allow(dead_code)]

use backdrop_core::geometry::MeshData;
use backdrop_core::scene::Material;
use backdrop_core::{
    DeviceProfile, Disposer, EngineError, FrameDriver, FrameRequest, FrameView, Host, InputTracker,
    ListenerKind, RenderBackend, ResourceHandle, ResourceKind, Viewport,
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Allocated(ResourceHandle),
    Disposed(ResourceHandle),
    FrameRequested(FrameRequest),
    FrameCancelled(FrameRequest),
    Resized(Viewport, f32),
    Rendered,
}

pub struct FakeHost {
    pub container_present: bool,
    pub context_fails: bool,
    pub render_fails: bool,
    /// Fail the geometry allocation with this zero-based index.
    pub fail_geometry_at: Option<usize>,
    pub viewport: Viewport,

    pub container_children: usize,
    pub context_live: bool,
    pub live: HashSet<ResourceHandle>,
    pub listeners: Vec<(ResourceHandle, ListenerKind)>,
    pub geometries_created: usize,
    pub vertices_uploaded: usize,
    pub particle_capacity: usize,
    pub next_frame: i32,
    pub pending_frame: Option<FrameRequest>,
    pub renders: usize,
    pub last_render_time: Option<f32>,
    pub last_eye: Option<glam::Vec3>,
    pub events: Vec<Event>,

    pub queued_pointer: Option<(f32, f32)>,
    pub queued_resize: Option<(u32, u32)>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            container_present: true,
            context_fails: false,
            render_fails: false,
            fail_geometry_at: None,
            viewport: Viewport::new(1280, 720),
            container_children: 0,
            context_live: false,
            live: HashSet::new(),
            listeners: Vec::new(),
            geometries_created: 0,
            vertices_uploaded: 0,
            particle_capacity: 0,
            next_frame: 1,
            pending_frame: None,
            renders: 0,
            last_render_time: None,
            last_eye: None,
            events: Vec::new(),
            queued_pointer: None,
            queued_resize: None,
        }
    }
}

impl FakeHost {
    pub fn without_container() -> Self {
        Self {
            container_present: false,
            ..Self::default()
        }
    }

    fn record(&mut self, handle: ResourceHandle) {
        assert!(self.live.insert(handle), "handle {:?} allocated twice", handle);
        self.events.push(Event::Allocated(handle));
    }

    fn require_context(&self, kind: ResourceKind) -> Result<(), EngineError> {
        if self.context_live {
            Ok(())
        } else {
            Err(EngineError::allocation(kind, "no context"))
        }
    }

    pub fn disposed(&self) -> Vec<ResourceHandle> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Disposed(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    pub fn allocated(&self) -> Vec<ResourceHandle> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Allocated(h) => Some(*h),
                _ => None,
            })
            .collect()
    }

    pub fn position_of(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.events.iter().position(pred)
    }
}

impl RenderBackend for FakeHost {
    fn create_geometry(&mut self, handle: ResourceHandle, mesh: &MeshData) -> Result<(), EngineError> {
        self.require_context(handle.kind)?;
        if self.fail_geometry_at == Some(self.geometries_created) {
            return Err(EngineError::allocation(handle.kind, "out of memory"));
        }
        self.geometries_created += 1;
        self.vertices_uploaded += mesh.vertex_count();
        self.record(handle);
        Ok(())
    }

    fn create_material(&mut self, handle: ResourceHandle, _material: &Material) -> Result<(), EngineError> {
        self.require_context(handle.kind)?;
        self.record(handle);
        Ok(())
    }

    fn create_particle_buffer(&mut self, handle: ResourceHandle, capacity: usize) -> Result<(), EngineError> {
        self.require_context(handle.kind)?;
        self.particle_capacity += capacity;
        self.record(handle);
        Ok(())
    }

    fn resize(&mut self, viewport: Viewport, pixel_ratio: f32) {
        self.events.push(Event::Resized(viewport, pixel_ratio));
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), EngineError> {
        self.renders += 1;
        self.last_render_time = Some(frame.time);
        self.last_eye = Some(frame.camera.eye);
        self.events.push(Event::Rendered);
        if self.render_fails {
            Err(EngineError::Render("device lost".into()))
        } else {
            Ok(())
        }
    }
}

impl Disposer for FakeHost {
    fn dispose(&mut self, handle: ResourceHandle) {
        assert!(self.live.remove(&handle), "handle {:?} disposed twice or never allocated", handle);
        match handle.kind {
            ResourceKind::Surface => self.container_children -= 1,
            ResourceKind::RenderContext => self.context_live = false,
            ResourceKind::Listener => self.listeners.retain(|(h, _)| *h != handle),
            _ => {}
        }
        self.events.push(Event::Disposed(handle));
    }
}

impl FrameDriver for FakeHost {
    fn request_frame(&mut self) -> Result<FrameRequest, EngineError> {
        let request = FrameRequest(self.next_frame);
        self.next_frame += 1;
        self.pending_frame = Some(request);
        self.events.push(Event::FrameRequested(request));
        Ok(request)
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.pending_frame == Some(request) {
            self.pending_frame = None;
        }
        self.events.push(Event::FrameCancelled(request));
    }
}

impl Host for FakeHost {
    fn attach_surface(&mut self, handle: ResourceHandle) -> Result<Viewport, EngineError> {
        if !self.container_present {
            return Err(EngineError::MissingContainer);
        }
        self.container_children += 1;
        self.record(handle);
        Ok(self.viewport)
    }

    fn create_context(&mut self, handle: ResourceHandle, _profile: &DeviceProfile) -> Result<(), EngineError> {
        if self.context_fails {
            return Err(EngineError::ContextUnavailable("webgpu disabled".into()));
        }
        self.context_live = true;
        self.record(handle);
        Ok(())
    }

    fn add_listener(&mut self, handle: ResourceHandle, kind: ListenerKind) -> Result<(), EngineError> {
        self.listeners.push((handle, kind));
        self.record(handle);
        Ok(())
    }

    fn pump_input(&mut self, tracker: &mut InputTracker) {
        if let Some((w, h)) = self.queued_resize.take() {
            tracker.resized(w, h);
        }
        if let Some((x, y)) = self.queued_pointer.take() {
            tracker.pointer_moved(x, y);
        }
    }
}
