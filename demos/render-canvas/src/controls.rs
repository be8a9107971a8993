use std::cell::RefCell;
use std::rc::Rc;

use pendula::color::Channel;
use pendula::interaction::InteractionController;
use pendula::Scene;
use pendula_canvas::CanvasRenderer;
use tracing::{debug, warn};
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::JsCast;
use web_sys::{EventTarget, HtmlCanvasElement, HtmlElement, HtmlInputElement, MouseEvent, WheelEvent};

use crate::dom::{self, DomResult};

/// The settings panel.
#[derive(Clone)]
pub struct Controls {
	settings: HtmlElement,
	selected: HtmlElement,
	none_text: HtmlElement,
	gravity: HtmlInputElement,
	trail: HtmlInputElement,
	channels: [(Channel, HtmlInputElement); 3],
}

impl Controls {
	pub fn find() -> DomResult<Self> {
		Ok(Self {
			settings: dom::element("settings")?,
			selected: dom::element("selected")?,
			none_text: dom::element("noneText")?,
			gravity: dom::element("gravity")?,
			trail: dom::element("trail")?,
			channels: [
				(Channel::Red, dom::element("r")?),
				(Channel::Green, dom::element("g")?),
				(Channel::Blue, dom::element("b")?),
			],
		})
	}
}

pub struct App {
	scene: Scene,
	interaction: InteractionController,
	renderer: CanvasRenderer,
	controls: Controls,
	rng: fastrand::Rng,
}

impl App {
	pub fn new(mut scene: Scene, renderer: CanvasRenderer, controls: Controls, rng: fastrand::Rng) -> Self {
		controls.gravity.set_value(&scene.gravity_slider().to_string());
		controls.settings.set_hidden(scene.is_running());

		let settings = controls.settings.clone();
		scene.subscribe(Box::new(move |paused: bool| settings.set_hidden(!paused)));

		let app = Self {
			scene,
			interaction: InteractionController::new(),
			renderer,
			controls,
			rng,
		};
		app.show_selection();
		app
	}

	pub fn frame(&mut self) {
		self.scene.frame(&self.renderer);
	}

	/// Mirror the selection into the panel.
	fn show_selection(&self) {
		let view = self.scene.selection_view();
		self.controls.selected.set_hidden(view.is_none());
		self.controls.none_text.set_hidden(view.is_some());

		if let Some(view) = view {
			self.controls.trail.set_value(&view.trail_length.to_string());
			for (channel, field) in &self.controls.channels {
				field.set_value(&view.color.channel(*channel).to_string());
			}
		}
	}

	fn share(&self) -> DomResult<()> {
		let url = self.scene.share_url(&dom::page_url()?);
		dom::navigate(&url)?;
		dom::copy_to_clipboard(&url)
	}
}

fn listen<E: JsCast + 'static>(
	target: &EventTarget,
	kind: &str,
	app: &Rc<RefCell<App>>,
	mut handler: impl FnMut(&mut App, E) + 'static,
) -> DomResult<()> {
	let app = app.clone();
	let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
		match event.dyn_into::<E>() {
			Ok(event) => handler(&mut *app.borrow_mut(), event),
			Err(_) => warn!("Unexpected event type"),
		}
	});
	target
		.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
		.map_err(dom::js_err)?;
	// listeners live as long as the page
	closure.forget();
	Ok(())
}

/// Wire the canvas and the settings panel to `app`.
pub fn bind(app: &Rc<RefCell<App>>, canvas: &HtmlCanvasElement) -> DomResult<()> {
	let controls = app.borrow().controls.clone();

	let c = canvas.clone();
	listen(canvas, "mousedown", app, move |app, e: MouseEvent| {
		if e.button() != 0 {
			return;
		}
		let pos = dom::canvas_pos(&e, &c);
		app.interaction.pointer_down(&mut app.scene, pos);
		app.show_selection();
	})?;

	let c = canvas.clone();
	listen(canvas, "mouseup", app, move |app, e: MouseEvent| {
		if e.button() != 0 {
			return;
		}
		let pos = dom::canvas_pos(&e, &c);
		app.interaction.pointer_up(&mut app.scene, pos);
	})?;

	let c = canvas.clone();
	listen(canvas, "mousemove", app, move |app, e: MouseEvent| {
		let pos = dom::canvas_pos(&e, &c);
		app.interaction.pointer_move(&mut app.scene, pos);
	})?;

	listen(canvas, "wheel", app, |app, e: WheelEvent| {
		if app.interaction.scroll(&mut app.scene, e.delta_y()) {
			e.prevent_default();
		}
	})?;

	let field = controls.gravity.clone();
	listen(&controls.gravity, "input", app, move |app, _: web_sys::Event| {
		match field.value().trim().parse::<f64>() {
			Ok(value) => app.scene.set_gravity_slider(value),
			Err(e) => warn!("Bad gravity {:?}: {e}", field.value()),
		}
	})?;

	let field = controls.trail.clone();
	listen(&controls.trail, "input", app, move |app, _: web_sys::Event| {
		let Ok(trail_length) = field.value().trim().parse::<usize>() else {
			return;
		};
		if let Err(e) = app.scene.set_selected_trail_length(trail_length) {
			debug!("{e}");
		}
	})?;

	for (channel, field) in controls.channels.clone() {
		let target = field.clone();
		listen(&target, "input", app, move |app, _: web_sys::Event| {
			match app.scene.set_selected_channel(channel, &field.value()) {
				Ok(val) => field.set_value(&val.to_string()),
				Err(e) => debug!("{e}"),
			}
		})?;
	}

	listen(&dom::element::<HtmlElement>("add")?, "click", app, |app, _: web_sys::Event| {
		let id = app.scene.add_random_pendulum(&mut app.rng);
		debug!("Added {id}");
	})?;

	listen(&dom::element::<HtmlElement>("remove")?, "click", app, |app, _: web_sys::Event| {
		if let Err(e) = app.scene.remove_selected() {
			debug!("{e}");
		}
		app.show_selection();
	})?;

	listen(&dom::element::<HtmlElement>("reset")?, "click", app, |_, _: web_sys::Event| {
		if let Err(e) = dom::page_url().and_then(|url| dom::navigate(&url)) {
			warn!("Reset failed: {e}");
		}
	})?;

	listen(&dom::element::<HtmlElement>("share")?, "click", app, |app, _: web_sys::Event| {
		if let Err(e) = app.share() {
			warn!("Share failed: {e}");
		}
	})?;

	Ok(())
}
