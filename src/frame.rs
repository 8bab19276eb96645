use crate::core::Engine;
use crate::host::WebHost;
use instant::Instant;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameCallback = Closure<dyn FnMut()>;

/// Owner of the `requestAnimationFrame` closure. The closure reaches the
/// engine through a `Weak`, so dropping the engine is never blocked by it.
#[derive(Default)]
pub struct FrameLoop {
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    pub fn install(&self, engine: Weak<RefCell<Engine<WebHost>>>) {
        let tick = Closure::wrap(Box::new(move || {
            let Some(engine) = engine.upgrade() else {
                return;
            };
            if let Ok(mut engine) = engine.try_borrow_mut() {
                engine.frame(Instant::now());
            }
        }) as Box<dyn FnMut()>);
        *self.callback.borrow_mut() = Some(tick);
    }

    pub fn request(&self) -> anyhow::Result<i32> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        let slot = self.callback.borrow();
        let tick = slot
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("frame callback not installed"))?;
        window
            .request_animation_frame(tick.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("{:?}", e))
    }

    pub fn cancel(&self, id: i32) {
        if let Some(window) = web::window() {
            _ = window.cancel_animation_frame(id);
        }
    }

    /// Drop the closure. Must not run from inside the callback itself.
    pub fn clear(&self) {
        self.callback.borrow_mut().take();
    }
}
