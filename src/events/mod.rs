//! Delegated window listeners.
//!
//! Each listener only writes into the host-owned [`PendingInput`] cell; the
//! frame tick drains it. Closures never hold the engine.

mod pointer;
mod resize;

use crate::core::ListenerKind;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Input observed since the last tick. Only the latest value of each kind
/// is kept.
#[derive(Clone, Copy, Debug, Default)]
pub struct PendingInput {
    pub pointer: Option<(f32, f32)>,
    pub resize: Option<(u32, u32)>,
}

pub struct WindowListener {
    event: &'static str,
    callback: Closure<dyn FnMut(web::Event)>,
}

impl WindowListener {
    fn install(event: &'static str, callback: Closure<dyn FnMut(web::Event)>) -> anyhow::Result<Self> {
        let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
        window
            .add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        Ok(Self { event, callback })
    }

    /// Remove the listener from the window; the closure is freed on drop.
    pub fn detach(self) {
        if let Some(window) = web::window() {
            _ = window.remove_event_listener_with_callback(
                self.event,
                self.callback.as_ref().unchecked_ref(),
            );
        }
    }
}

pub fn attach(
    kind: ListenerKind,
    container: &web::HtmlElement,
    pending: Rc<RefCell<PendingInput>>,
) -> anyhow::Result<WindowListener> {
    let callback = match kind {
        ListenerKind::PointerMove => pointer::pointermove_callback(container.clone(), pending),
        ListenerKind::Resize => resize::resize_callback(container.clone(), pending),
    };
    WindowListener::install(kind.event_name(), callback)
}
