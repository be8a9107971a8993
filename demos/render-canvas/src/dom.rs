use glam::{dvec2, DVec2};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, MouseEvent, Window};

pub type DomResult<T> = Result<T, Box<dyn std::error::Error>>;

pub fn window() -> DomResult<Window> {
	web_sys::window().ok_or_else(|| "no global window".into())
}

pub fn document() -> DomResult<Document> {
	window()?.document().ok_or_else(|| "no document".into())
}

pub fn element<T: JsCast>(id: &str) -> DomResult<T> {
	document()?
		.get_element_by_id(id)
		.ok_or_else(|| format!("no #{id}"))?
		.dyn_into::<T>()
		.map_err(|_| format!("#{id} has an unexpected element type").into())
}

/// Everything after the `#` of the current URL, or nothing.
pub fn location_hash() -> String {
	window()
		.ok()
		.and_then(|w| w.location().hash().ok())
		.unwrap_or_default()
}

/// The current URL without query or fragment.
pub fn page_url() -> DomResult<String> {
	let location = window()?.location();
	let origin = location.origin().map_err(js_err)?;
	let path = location.pathname().map_err(js_err)?;
	Ok(format!("{origin}{path}"))
}

pub fn navigate(url: &str) -> DomResult<()> {
	window()?.location().set_href(url).map_err(js_err)
}

/// Best effort: `navigator.clipboard.writeText(text)`, not awaited.
pub fn copy_to_clipboard(text: &str) -> DomResult<()> {
	let navigator = window()?.navigator();
	let clipboard = js_sys::Reflect::get(&navigator, &"clipboard".into()).map_err(js_err)?;
	let write_text = js_sys::Reflect::get(&clipboard, &"writeText".into())
		.map_err(js_err)?
		.dyn_into::<js_sys::Function>()
		.map_err(|_| "clipboard has no writeText")?;
	write_text.call1(&clipboard, &text.into()).map_err(js_err)?;
	Ok(())
}

/// Pointer position in canvas pixels, which differ from CSS pixels when the canvas is scaled.
pub fn canvas_pos(event: &MouseEvent, canvas: &HtmlCanvasElement) -> DVec2 {
	let bounds = canvas.get_bounding_client_rect();
	let scale = |pixels: u32, css: f64| if css > 0. { pixels as f64 / css } else { 1. };
	dvec2(
		event.offset_x() as f64 * scale(canvas.width(), bounds.width()),
		event.offset_y() as f64 * scale(canvas.height(), bounds.height()),
	)
}

pub fn js_err(value: JsValue) -> Box<dyn std::error::Error> {
	format!("{value:?}").into()
}
