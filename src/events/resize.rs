use super::PendingInput;
use crate::dom;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use web_sys as web;

/// Global `resize`: records the container's new CSS size. Throttling happens
/// in the tick.
pub(super) fn resize_callback(
    container: web::HtmlElement,
    pending: Rc<RefCell<PendingInput>>,
) -> Closure<dyn FnMut(web::Event)> {
    Closure::wrap(Box::new(move |_ev: web::Event| {
        let viewport = dom::container_viewport(&container);
        pending.borrow_mut().resize = Some((viewport.width, viewport.height));
    }) as Box<dyn FnMut(web::Event)>)
}
