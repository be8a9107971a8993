use glam::{dvec2, DVec2};
use tracing::{debug, info};

use crate::color::{parse_channel, Channel, Rgb};
use crate::formats::snapshot::{self, LinkSnapshot, PendulumSnapshot, Snapshot};
use crate::pendulum::{LinkParams, Pendulum, PendulumId, DEFAULT_TRAIL_LENGTH};
use crate::physics;
use crate::render::{self, PendulaRenderer};
use crate::ui::PauseButton;

/// Layout and scaling of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
	/// Pivot of every pendulum's inner link, in canvas pixels.
	pub anchor: DVec2,
	pub pause_button: PauseButton,
	/// Internal gravity per unit of the gravity slider.
	pub gravity_scale: f64,
	pub default_gravity_slider: f64,
	pub default_trail_length: usize,
}

impl Default for SceneConfig {
	fn default() -> Self {
		Self {
			anchor: dvec2(512., 382.),
			pause_button: PauseButton::default(),
			gravity_scale: 0.05,
			default_gravity_slider: 15.,
			default_trail_length: DEFAULT_TRAIL_LENGTH,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
	#[error("No pendulum is selected")]
	NoSelection,
	#[error("No pendulum with id {0}")]
	UnknownPendulum(PendulumId),
}

/// Gets told about run state changes, synchronously and once per change.
pub trait SceneObserver {
	fn on_pause_toggled(&mut self, paused: bool);
}

impl<F: FnMut(bool)> SceneObserver for F {
	fn on_pause_toggled(&mut self, paused: bool) {
		self(paused)
	}
}

/// What the settings panel shows about the selected pendulum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionView {
	pub color: Rgb,
	pub trail_length: usize,
}

/// All pendulums of a canvas plus the shared run state.
///
/// List order is creation order, which is also draw order and hit-test precedence.
pub struct Scene {
	config: SceneConfig,
	pendulums: Vec<Pendulum>,
	running: bool,
	/// Lookup key only. Always names a pendulum in `pendulums` whose `selected` flag is set.
	selected: Option<PendulumId>,
	gravity_slider: f64,
	observers: Vec<Box<dyn SceneObserver>>,
}

impl Scene {
	/// An empty, running scene.
	pub fn new(config: SceneConfig) -> Self {
		Self {
			gravity_slider: config.default_gravity_slider,
			config,
			pendulums: Vec::new(),
			running: true,
			selected: None,
			observers: Vec::new(),
		}
	}

	/// A running scene with one red pendulum, used when there is nothing to restore.
	pub fn with_default_pendulum(config: SceneConfig) -> Self {
		let mut scene = Self::new(config);
		let trail_length = scene.config.default_trail_length;
		scene.add_pendulum(
			[
				LinkParams {
					length: 250.,
					angle_degrees: 90.,
					mass: 30.,
				},
				LinkParams {
					length: 250.,
					angle_degrees: 120.,
					mass: 10.,
				},
			],
			Rgb::RED,
			trail_length,
		);
		scene
	}

	/// Restores a shared scene from a URL fragment, falling back to the default scene.
	pub fn from_fragment(config: SceneConfig, fragment: &str) -> Self {
		match snapshot::decode_fragment(fragment) {
			Some(snapshot) => {
				let mut scene = Self::new(config);
				scene.import_snapshot(&snapshot);
				scene
			}
			None => Self::with_default_pendulum(config),
		}
	}

	pub fn config(&self) -> &SceneConfig {
		&self.config
	}

	pub fn subscribe(&mut self, observer: Box<dyn SceneObserver>) {
		self.observers.push(observer);
	}

	// pendulums

	pub fn pendulums(&self) -> &[Pendulum] {
		&self.pendulums
	}

	pub(crate) fn pendulums_mut(&mut self) -> &mut [Pendulum] {
		&mut self.pendulums
	}

	pub fn pendulum(&self, id: PendulumId) -> Option<&Pendulum> {
		self.pendulums.iter().find(|p| p.id() == id)
	}

	pub fn pendulum_mut(&mut self, id: PendulumId) -> Option<&mut Pendulum> {
		self.pendulums.iter_mut().find(|p| p.id() == id)
	}

	/// Appends a pendulum on top of the others. It inherits the scene's gravity.
	pub fn add_pendulum(&mut self, links: [LinkParams; 2], color: Rgb, trail_length: usize) -> PendulumId {
		let mut pendulum = Pendulum::new(links, color, trail_length);
		pendulum.gravity = self.gravity();
		let id = pendulum.id();
		debug!("Adding pendulum {id}");
		self.pendulums.push(pendulum);
		id
	}

	/// Appends a pendulum with integer lengths in `[100, 200)`, angles in `[-180, 180)` degrees,
	/// masses in `[10, 50)` and any color.
	pub fn add_random_pendulum(&mut self, rng: &mut fastrand::Rng) -> PendulumId {
		let mut link = || LinkParams {
			length: rng.i32(100..200) as f64,
			angle_degrees: rng.i32(-180..180) as f64,
			mass: rng.i32(10..50) as f64,
		};
		let links = [link(), link()];
		let color = Rgb::new(rng.u8(..), rng.u8(..), rng.u8(..));
		let trail_length = self.config.default_trail_length;
		self.add_pendulum(links, color, trail_length)
	}

	/// Removes and returns the selected pendulum.
	pub fn remove_selected(&mut self) -> Result<Pendulum, SceneError> {
		let id = self.selected.ok_or(SceneError::NoSelection)?;
		self.remove_pendulum(id)
	}

	/// Removes and returns a pendulum, dropping the selection if it was selected.
	pub fn remove_pendulum(&mut self, id: PendulumId) -> Result<Pendulum, SceneError> {
		let index = self
			.pendulums
			.iter()
			.position(|p| p.id() == id)
			.ok_or(SceneError::UnknownPendulum(id))?;

		if self.selected == Some(id) {
			self.selected = None;
		}
		let mut pendulum = self.pendulums.remove(index);
		pendulum.set_selected(false);
		debug!("Removed pendulum {id}");
		Ok(pendulum)
	}

	// selection

	pub fn selected_id(&self) -> Option<PendulumId> {
		self.selected
	}

	pub fn selected(&self) -> Option<&Pendulum> {
		self.selected.and_then(|id| self.pendulum(id))
	}

	fn selected_mut(&mut self) -> Result<&mut Pendulum, SceneError> {
		let id = self.selected.ok_or(SceneError::NoSelection)?;
		self.pendulum_mut(id).ok_or(SceneError::UnknownPendulum(id))
	}

	/// Selects `id`, deselecting whatever was selected before.
	pub fn select(&mut self, id: PendulumId) -> Result<(), SceneError> {
		if self.pendulum(id).is_none() {
			return Err(SceneError::UnknownPendulum(id));
		}

		self.deselect();
		if let Some(pendulum) = self.pendulum_mut(id) {
			pendulum.set_selected(true);
		}
		self.selected = Some(id);
		debug!("Selected pendulum {id}");
		Ok(())
	}

	pub fn deselect(&mut self) {
		if let Some(id) = self.selected.take() {
			if let Some(pendulum) = self.pendulum_mut(id) {
				pendulum.set_selected(false);
			}
		}
	}

	/// Color and trail length of the selection, for reflecting into controls.
	pub fn selection_view(&self) -> Option<SelectionView> {
		self.selected().map(|p| SelectionView {
			color: p.color,
			trail_length: p.trail_length,
		})
	}

	pub fn set_selected_color(&mut self, color: Rgb) -> Result<(), SceneError> {
		self.selected_mut()?.color = color;
		Ok(())
	}

	/// Sets one channel of the selection's color from user text. Returns the value actually used.
	pub fn set_selected_channel(&mut self, channel: Channel, raw: &str) -> Result<u8, SceneError> {
		let val = parse_channel(raw);
		*self.selected_mut()?.color.channel_mut(channel) = val;
		Ok(val)
	}

	pub fn set_selected_trail_length(&mut self, trail_length: usize) -> Result<(), SceneError> {
		self.selected_mut()?.trail_length = trail_length;
		Ok(())
	}

	// global state

	pub fn gravity_slider(&self) -> f64 {
		self.gravity_slider
	}

	/// Internal gravity derived from the slider.
	pub fn gravity(&self) -> f64 {
		self.gravity_slider * self.config.gravity_scale
	}

	/// Overwrites the gravity of every pendulum.
	pub fn set_gravity(&mut self, gravity: f64) {
		for pendulum in &mut self.pendulums {
			pendulum.gravity = gravity;
		}
	}

	/// Moves the gravity slider, which rescales into every pendulum's gravity.
	pub fn set_gravity_slider(&mut self, value: f64) {
		self.gravity_slider = value;
		self.set_gravity(self.gravity());
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Pausing halts every link so resuming starts from rest, and empties every trail.
	///
	/// Only actual transitions have effects, including notifying observers.
	pub fn set_paused(&mut self, paused: bool) {
		if self.running != paused {
			return;
		}
		self.running = !paused;

		if paused {
			for pendulum in &mut self.pendulums {
				pendulum.halt();
				pendulum.trail_mut().clear();
			}
		}
		info!("Simulation {}", if paused { "paused" } else { "resumed" });

		for observer in &mut self.observers {
			observer.on_pause_toggled(paused);
		}
	}

	pub fn toggle_paused(&mut self) {
		self.set_paused(self.running);
	}

	// frame

	/// Integrates every pendulum one step, if running.
	pub fn tick(&mut self) {
		if self.running {
			self.pendulums.iter_mut().for_each(physics::tick);
		}
	}

	/// One animation frame: every pendulum is updated before any is drawn.
	pub fn frame<R: PendulaRenderer>(&mut self, renderer: &R) {
		self.tick();
		render::draw(renderer, self);
	}

	// sharing

	pub fn export_snapshot(&self) -> Snapshot {
		Snapshot {
			gravity_slider: self.gravity_slider,
			pendulums: self
				.pendulums
				.iter()
				.map(|p| PendulumSnapshot {
					color: p.color,
					trail_length: p.trail_length,
					links: p.links.clone().map(|link| LinkSnapshot {
						length: link.length,
						mass: link.mass(),
						angle: link.angle,
					}),
				})
				.collect(),
		}
	}

	/// Replaces all pendulums with the snapshot's and leaves the scene paused.
	pub fn import_snapshot(&mut self, snapshot: &Snapshot) {
		self.deselect();
		self.pendulums.clear();

		self.gravity_slider = snapshot.gravity_slider;
		for p in &snapshot.pendulums {
			let links = p.links.map(|link| LinkParams {
				length: link.length,
				angle_degrees: link.angle.to_degrees(),
				mass: link.mass,
			});
			self.add_pendulum(links, p.color, p.trail_length);
		}
		debug!("Imported {} pendulums", self.pendulums.len());

		self.set_paused(true);
	}

	/// Text to put behind the `#` of a share link.
	pub fn share_fragment(&self) -> String {
		self.export_snapshot().encode()
	}

	pub fn share_url(&self, base: &str) -> String {
		format!("{base}#{}", self.share_fragment())
	}
}
