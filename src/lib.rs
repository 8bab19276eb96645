#![cfg(target_arch = "wasm32")]
use crate::core::{Engine, EngineError};
use crate::host::WebHost;
use crate::render::GpuContext;
use instant::Instant;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod host;
mod render;

type SharedEngine = Rc<RefCell<Engine<WebHost>>>;

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("backdrop-web loaded");
    Ok(())
}

/// Handle the host page keeps for one mount point. Every `mount` builds a
/// fresh engine; `unmount` releases everything the previous one allocated.
#[wasm_bindgen]
#[derive(Default)]
pub struct Backdrop {
    engine: Option<SharedEngine>,
}

#[wasm_bindgen]
impl Backdrop {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Backdrop {
        Backdrop::default()
    }

    /// Attach to the element with `container_id` and start rendering once
    /// WebGPU is ready. Returns `false` if the container does not exist.
    pub fn mount(&mut self, container_id: &str) -> bool {
        self.unmount();

        let hints = dom::device_hints();
        let engine: SharedEngine = Rc::new(RefCell::new(Engine::new(WebHost::new(container_id), &hints)));
        if let Err(e) = engine.borrow_mut().mount() {
            match e {
                EngineError::MissingContainer => {
                    log::warn!("[backdrop] container #{} not found; backdrop disabled", container_id)
                }
                e => log::warn!("[backdrop] mount failed: {}", e),
            }
            return false;
        }

        let weak = Rc::downgrade(&engine);
        let canvas = {
            let engine = engine.borrow();
            engine.host().frames().install(weak.clone());
            engine.host().canvas().cloned()
        };
        self.engine = Some(engine);
        if let Some(canvas) = canvas {
            spawn_local(start_when_ready(weak, canvas));
        }
        true
    }

    /// Stop the loop and release every resource. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        let Some(engine) = self.engine.take() else {
            return;
        };
        let mut engine = engine.borrow_mut();
        let released = engine.deactivate();
        engine.host().frames().clear();
        log::info!("[backdrop] unmounted; {} resources released", released);
    }

    /// Quality tier of the current mount: "high", "low" or "none".
    pub fn tier(&self) -> String {
        self.engine
            .as_ref()
            .map(|e| e.borrow().profile().tier.as_str())
            .unwrap_or("none")
            .to_string()
    }

    pub fn is_running(&self) -> bool {
        self.engine
            .as_ref()
            .is_some_and(|e| e.borrow().is_running())
    }
}

impl Drop for Backdrop {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Bring up WebGPU, then start the engine unless it was unmounted while the
/// device was being created; in that case the device is destroyed instead.
async fn start_when_ready(engine: Weak<RefCell<Engine<WebHost>>>, canvas: web::HtmlCanvasElement) {
    let gpu = match GpuContext::new(canvas).await {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            log::warn!("[gpu] WebGPU unavailable: {:?}; background left blank", e);
            None
        }
    };
    let Some(engine) = engine.upgrade() else {
        if let Some(gpu) = gpu {
            gpu.destroy();
        }
        return;
    };
    let mut engine = engine.borrow_mut();
    if !engine.is_mounted() {
        if let Some(gpu) = gpu {
            gpu.destroy();
        }
        return;
    }
    if let Some(gpu) = gpu {
        engine.host_mut().install_gpu(gpu);
    }
    let mut rng = StdRng::from_entropy();
    if let Err(e) = engine.start(&mut rng, Instant::now()) {
        log::warn!("[backdrop] {}; background left blank", e);
    }
}
