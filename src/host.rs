use crate::core::geometry::MeshData;
use crate::core::scene::Material;
use crate::core::{
    DeviceProfile, Disposer, EngineError, FrameDriver, FrameRequest, FrameView, Host, InputTracker,
    ListenerKind, RenderBackend, ResourceHandle, ResourceKind, Viewport,
};
use crate::dom;
use crate::events::{self, PendingInput, WindowListener};
use crate::frame::FrameLoop;
use crate::render::{GpuContext, Renderer};
use fnv::FnvHashMap;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Browser side of the engine: the mount container and its canvas, the
/// WebGPU renderer, window listeners and the animation-frame loop.
pub struct WebHost {
    container_id: String,
    container: Option<web::HtmlElement>,
    canvas: Option<web::HtmlCanvasElement>,
    pending_gpu: Option<GpuContext>,
    renderer: Option<Renderer>,
    input: Rc<RefCell<PendingInput>>,
    listeners: FnvHashMap<u32, WindowListener>,
    frames: FrameLoop,
}

impl WebHost {
    pub fn new(container_id: &str) -> Self {
        Self {
            container_id: container_id.to_string(),
            container: None,
            canvas: None,
            pending_gpu: None,
            renderer: None,
            input: Rc::new(RefCell::new(PendingInput::default())),
            listeners: FnvHashMap::default(),
            frames: FrameLoop::default(),
        }
    }

    pub fn canvas(&self) -> Option<&web::HtmlCanvasElement> {
        self.canvas.as_ref()
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }

    /// Hand over a device created after mount; consumed by `create_context`.
    pub fn install_gpu(&mut self, gpu: GpuContext) {
        if let Some(stale) = self.pending_gpu.replace(gpu) {
            stale.destroy();
        }
    }

    fn renderer_mut(&mut self) -> Result<&mut Renderer, EngineError> {
        self.renderer
            .as_mut()
            .ok_or_else(|| EngineError::ContextUnavailable("renderer not initialised".into()))
    }
}

impl RenderBackend for WebHost {
    fn create_geometry(&mut self, handle: ResourceHandle, mesh: &MeshData) -> Result<(), EngineError> {
        self.renderer_mut()?.create_geometry(handle, mesh)
    }

    fn create_material(&mut self, handle: ResourceHandle, material: &Material) -> Result<(), EngineError> {
        self.renderer_mut()?.create_material(handle, material)
    }

    fn create_particle_buffer(&mut self, handle: ResourceHandle, capacity: usize) -> Result<(), EngineError> {
        self.renderer_mut()?.create_particle_buffer(handle, capacity)
    }

    fn resize(&mut self, viewport: Viewport, pixel_ratio: f32) {
        let Some(canvas) = self.canvas.as_ref() else {
            return;
        };
        let (w, h) = dom::sync_canvas_backing_size(canvas, viewport, pixel_ratio);
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.resize(w, h, (w as f32 / viewport.width as f32).max(0.1));
        }
    }

    fn render(&mut self, frame: &FrameView<'_>) -> Result<(), EngineError> {
        self.renderer_mut()?.render(frame)
    }
}

impl Disposer for WebHost {
    fn dispose(&mut self, handle: ResourceHandle) {
        match handle.kind {
            ResourceKind::Surface => {
                if let Some(canvas) = self.canvas.take() {
                    canvas.remove();
                }
                self.container = None;
            }
            ResourceKind::RenderContext => {
                if let Some(renderer) = self.renderer.take() {
                    renderer.destroy();
                }
                if let Some(gpu) = self.pending_gpu.take() {
                    gpu.destroy();
                }
            }
            ResourceKind::Listener => {
                if let Some(listener) = self.listeners.remove(&handle.id) {
                    listener.detach();
                }
            }
            ResourceKind::Geometry | ResourceKind::Material | ResourceKind::ParticleBuffer => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.dispose(handle);
                }
            }
        }
    }
}

impl FrameDriver for WebHost {
    fn request_frame(&mut self) -> Result<FrameRequest, EngineError> {
        self.frames
            .request()
            .map(FrameRequest)
            .map_err(|e| EngineError::Frame(e.to_string()))
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.frames.cancel(request.0);
    }
}

impl Host for WebHost {
    fn attach_surface(&mut self, _handle: ResourceHandle) -> Result<Viewport, EngineError> {
        let container = dom::find_container(&self.container_id).ok_or(EngineError::MissingContainer)?;
        let canvas = dom::attach_canvas(&container)
            .map_err(|e| EngineError::allocation(ResourceKind::Surface, e.to_string()))?;
        let viewport = dom::container_viewport(&container);
        self.container = Some(container);
        self.canvas = Some(canvas);
        Ok(viewport)
    }

    fn create_context(&mut self, _handle: ResourceHandle, profile: &DeviceProfile) -> Result<(), EngineError> {
        let gpu = self
            .pending_gpu
            .take()
            .ok_or_else(|| EngineError::ContextUnavailable("WebGPU device not available".into()))?;
        self.renderer = Some(Renderer::new(gpu, profile));
        Ok(())
    }

    fn add_listener(&mut self, handle: ResourceHandle, kind: ListenerKind) -> Result<(), EngineError> {
        let container = self
            .container
            .as_ref()
            .ok_or(EngineError::MissingContainer)?;
        let listener = events::attach(kind, container, self.input.clone()).map_err(|e| {
            EngineError::Listener {
                event: kind.event_name(),
                reason: e.to_string(),
            }
        })?;
        self.listeners.insert(handle.id, listener);
        Ok(())
    }

    fn pump_input(&mut self, tracker: &mut InputTracker) {
        let pending = std::mem::take(&mut *self.input.borrow_mut());
        if let Some((w, h)) = pending.resize {
            tracker.resized(w, h);
        }
        if let Some((x, y)) = pending.pointer {
            tracker.pointer_moved(x, y);
        }
    }
}
