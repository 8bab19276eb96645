use super::PendingInput;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Global `pointermove`: records the cursor relative to the container's
/// top-left corner in CSS pixels.
pub(super) fn pointermove_callback(
    container: web::HtmlElement,
    pending: Rc<RefCell<PendingInput>>,
) -> Closure<dyn FnMut(web::Event)> {
    Closure::wrap(Box::new(move |ev: web::Event| {
        let Some(mouse) = ev.dyn_ref::<web::MouseEvent>() else {
            return;
        };
        let rect = container.get_bounding_client_rect();
        let x = (mouse.client_x() as f64 - rect.left()) as f32;
        let y = (mouse.client_y() as f64 - rect.top()) as f32;
        pending.borrow_mut().pointer = Some((x, y));
    }) as Box<dyn FnMut(web::Event)>)
}
