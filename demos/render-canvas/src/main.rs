#[cfg(target_arch = "wasm32")]
mod controls;
#[cfg(target_arch = "wasm32")]
mod dom;

#[cfg(target_arch = "wasm32")]
fn request_animation_frame(f: &wasm_bindgen::prelude::Closure<dyn FnMut()>) {
	use wasm_bindgen::JsCast;
	if let Some(window) = web_sys::window() {
		if let Err(e) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
			tracing::error!("Couldn't register `requestAnimationFrame`: {e:?}");
		}
	}
}

#[cfg(target_arch = "wasm32")]
fn run() -> Result<(), Box<dyn std::error::Error>> {
	use std::cell::RefCell;
	use std::rc::Rc;

	use pendula::{Scene, SceneConfig};
	use pendula_canvas::CanvasRenderer;
	use tracing::info;
	use wasm_bindgen::prelude::Closure;

	use crate::controls::{App, Controls};

	let canvas = dom::element::<web_sys::HtmlCanvasElement>("canvas")?;

	info!("Initializing Pendula canvas renderer");
	let renderer = CanvasRenderer::new(&canvas)?;

	let scene = Scene::from_fragment(SceneConfig::default(), &dom::location_hash());
	info!("Scene with {} pendulums", scene.pendulums().len());

	// Math.random bits, fastrand has no entropy source of its own here
	let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
	let controls = Controls::find()?;
	let app = Rc::new(RefCell::new(App::new(scene, renderer, controls, fastrand::Rng::with_seed(seed))));
	controls::bind(&app, &canvas)?;

	// Continuous animation loop
	{
		let anim_loop_f = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
		let anim_loop_g = anim_loop_f.clone();
		let app = app.clone();

		*anim_loop_g.borrow_mut() = Some(Closure::new(move || {
			app.borrow_mut().frame();

			if let Some(f) = anim_loop_f.borrow().as_ref() {
				request_animation_frame(f);
			}
		}));
		if let Some(g) = anim_loop_g.borrow().as_ref() {
			request_animation_frame(g);
		}
	}

	Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
	console_error_panic_hook::set_once();
	tracing_wasm::set_as_global_default();
	if let Err(e) = run() {
		tracing::error!("Fatal crash: {}", e);
	}
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
	panic!("This is a WASM example. You need to build it for the WASM target.");
}
