//! Arena of disposable handles.
//!
//! Everything the engine allocates on the host (GPU buffers, the rendering
//! context, the attached canvas, window listeners) is recorded here at the
//! moment it is created. [`ResourceRegistry::release`] is the only path that
//! frees them.

use crate::error::EngineError;
use fnv::FnvHashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Surface,
    RenderContext,
    Geometry,
    Material,
    ParticleBuffer,
    Listener,
}

/// Opaque handle to one host-side resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceHandle {
    pub kind: ResourceKind,
    pub id: u32,
}

/// Receives each registered handle exactly once at release.
pub trait Disposer {
    fn dispose(&mut self, handle: ResourceHandle);
}

#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: Vec<ResourceHandle>,
    live: FnvHashSet<u32>,
    next_id: u32,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a handle, run the allocation under it and record the handle
    /// only if the allocation succeeded. Nothing is recorded on failure.
    pub fn allocate<F>(&mut self, kind: ResourceKind, alloc: F) -> Result<ResourceHandle, EngineError>
    where
        F: FnOnce(ResourceHandle) -> Result<(), EngineError>,
    {
        let handle = ResourceHandle {
            kind,
            id: self.next_id,
        };
        self.next_id = self.next_id.wrapping_add(1);
        alloc(handle)?;
        self.entries.push(handle);
        self.live.insert(handle.id);
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, handle: ResourceHandle) -> bool {
        self.live.contains(&handle.id)
    }

    pub fn count_of(&self, kind: ResourceKind) -> usize {
        self.entries.iter().filter(|h| h.kind == kind).count()
    }

    pub fn handles(&self) -> &[ResourceHandle] {
        &self.entries
    }

    /// Dispose every handle once, newest first, and clear the registry.
    /// Returns the number of handles released.
    pub fn release(&mut self, disposer: &mut dyn Disposer) -> usize {
        let released = self.entries.len();
        while let Some(handle) = self.entries.pop() {
            if self.live.remove(&handle.id) {
                disposer.dispose(handle);
            }
        }
        self.live.clear();
        log::debug!("[registry] released {} resources", released);
        released
    }
}
