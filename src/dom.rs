use crate::constants::{CANVAS_CLASS, CANVAS_Z_INDEX};
use crate::core::{DeviceHints, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

pub fn find_container(container_id: &str) -> Option<web::HtmlElement> {
    window_document()?
        .get_element_by_id(container_id)?
        .dyn_into::<web::HtmlElement>()
        .ok()
}

/// Create the full-bleed canvas and append it to `container`.
pub fn attach_canvas(container: &web::HtmlElement) -> anyhow::Result<web::HtmlCanvasElement> {
    let document = window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    canvas.set_class_name(CANVAS_CLASS);
    let style = canvas.style();
    for (key, value) in [
        ("position", "absolute"),
        ("inset", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("display", "block"),
        ("pointer-events", "none"),
        ("z-index", CANVAS_Z_INDEX),
    ] {
        _ = style.set_property(key, value);
    }
    container
        .append_child(&canvas)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(canvas)
}

/// CSS-pixel size of the container, falling back to the window when the
/// container has not been laid out yet.
pub fn container_viewport(container: &web::HtmlElement) -> Viewport {
    let (w, h) = (container.client_width(), container.client_height());
    if w > 0 && h > 0 {
        return Viewport::new(w as u32, h as u32);
    }
    let window_size = web::window().and_then(|w| {
        let iw = w.inner_width().ok()?.as_f64()?;
        let ih = w.inner_height().ok()?.as_f64()?;
        Some((iw as u32, ih as u32))
    });
    match window_size {
        Some((w, h)) => Viewport::new(w, h),
        None => Viewport::new(1, 1),
    }
}

/// Set the canvas backing store to the viewport scaled by the capped pixel
/// ratio. Returns the physical size.
pub fn sync_canvas_backing_size(
    canvas: &web::HtmlCanvasElement,
    viewport: Viewport,
    pixel_ratio_cap: f32,
) -> (u32, u32) {
    let dpr = web::window()
        .map(|w| w.device_pixel_ratio() as f32)
        .unwrap_or(1.0);
    let (w_px, h_px) = viewport.physical(dpr.min(pixel_ratio_cap));
    canvas.set_width(w_px);
    canvas.set_height(h_px);
    (w_px, h_px)
}

/// Hardware hints from the navigator. `deviceMemory` is not in every browser,
/// so it is read reflectively.
pub fn device_hints() -> DeviceHints {
    let Some(window) = web::window() else {
        return DeviceHints::default();
    };
    let navigator = window.navigator();
    let cores = navigator.hardware_concurrency();
    let memory = js_sys::Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
        .ok()
        .and_then(|v| v.as_f64());
    DeviceHints {
        cpu_cores: (cores.is_finite() && cores >= 1.0).then_some(cores as u32),
        device_memory_gb: memory.map(|m| m as f32),
        device_pixel_ratio: Some(window.device_pixel_ratio() as f32),
    }
}
