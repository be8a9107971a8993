//! Geometric editing of a paused scene with the pointer.

use glam::DVec2;
use tracing::debug;

use crate::math;
use crate::pendulum::{Link, PendulumId};
use crate::scene::Scene;

/// Joints smaller than this are still grabbable within this many pixels.
pub const MIN_HIT_RADIUS: f64 = 10.;
/// Mass change per unit of wheel delta.
pub const WHEEL_MASS_FACTOR: f64 = -0.02;

/// A link of a specific pendulum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragTarget {
	pub pendulum: PendulumId,
	/// 0 is the inner link, 1 the outer one.
	pub link: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
	#[default]
	Idle,
	Dragging(DragTarget),
}

/// First joint under `point`, searching pendulums in list order, then links in chain order.
///
/// Uses the joint positions cached by the last draw.
pub fn hit_test(scene: &Scene, point: DVec2) -> Option<DragTarget> {
	scene.pendulums().iter().find_map(|pendulum| {
		pendulum
			.bounding_circles()
			.iter()
			.position(|joint| joint.center.distance(point) < joint.radius.max(MIN_HIT_RADIUS))
			.map(|link| DragTarget {
				pendulum: pendulum.id(),
				link,
			})
	})
}

/// Routes pointer events into the scene. At most one drag exists at a time.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
	state: InteractionState,
	/// Last known pointer position, needed by the wheel.
	pointer: DVec2,
	pressed: bool,
}

impl InteractionController {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn state(&self) -> InteractionState {
		self.state
	}

	pub fn pointer(&self) -> DVec2 {
		self.pointer
	}

	/// Primary button pressed.
	///
	/// Always drops the current selection. While paused, a hit selects that pendulum and starts
	/// dragging the hit link. Returns the newly selected pendulum.
	pub fn pointer_down(&mut self, scene: &mut Scene, pos: DVec2) -> Option<PendulumId> {
		self.pressed = true;
		self.pointer = pos;
		scene.deselect();

		if scene.is_running() {
			return None;
		}

		let target = hit_test(scene, pos)?;
		if scene.select(target.pendulum).is_err() {
			return None;
		}
		debug!("Dragging link {} of {}", target.link, target.pendulum);
		self.state = InteractionState::Dragging(target);
		Some(target.pendulum)
	}

	/// Pointer moved, with or without a button held.
	pub fn pointer_move(&mut self, scene: &mut Scene, pos: DVec2) {
		self.pointer = pos;

		let InteractionState::Dragging(target) = self.state else {
			return;
		};

		if !drag_link(scene, target, pos) {
			// the dragged pendulum is gone
			self.state = InteractionState::Idle;
		}
	}

	/// Primary button released.
	///
	/// Ends a drag if there is one, otherwise toggles pause when released on the pause button.
	/// Returns whether pause was toggled.
	pub fn pointer_up(&mut self, scene: &mut Scene, pos: DVec2) -> bool {
		if !self.pressed {
			return false;
		}
		self.pressed = false;
		self.pointer = pos;

		match self.state {
			InteractionState::Dragging(_) => {
				self.state = InteractionState::Idle;
				false
			}
			InteractionState::Idle if scene.config().pause_button.contains(pos) => {
				scene.toggle_paused();
				true
			}
			InteractionState::Idle => false,
		}
	}

	/// Wheel turned over the canvas. While paused, adjusts the mass of the joint under the pointer.
	///
	/// Returns whether the wheel was consumed, in which case the page must not scroll.
	pub fn scroll(&mut self, scene: &mut Scene, delta_y: f64) -> bool {
		if scene.is_running() {
			return false;
		}
		let Some(target) = hit_test(scene, self.pointer) else {
			return false;
		};
		let Some(pendulum) = scene.pendulum_mut(target.pendulum) else {
			return false;
		};

		let link = &mut pendulum.links[target.link];
		link.set_mass(link.mass() + delta_y * WHEEL_MASS_FACTOR);
		true
	}
}

/// Points `link`, pivoted at `from`, at `to`. On its own pivot it keeps its angle and shrinks to nothing.
fn aim(link: &mut Link, from: DVec2, to: DVec2) {
	match math::link_towards(from, to) {
		Some((angle, length)) => {
			link.angle = angle;
			link.length = length;
		}
		None => link.length = 0.,
	}
}

/// Points the dragged link at `pos` and stretches it to reach.
///
/// Dragging the inner link keeps the absolute position of the outer tip, so the outer link is
/// re-aimed from the new joint. Returns false if the pendulum no longer exists.
fn drag_link(scene: &mut Scene, target: DragTarget, pos: DVec2) -> bool {
	let anchor = scene.config().anchor;
	let Some(pendulum) = scene.pendulum_mut(target.pendulum) else {
		return false;
	};

	let [joint, tip] = pendulum.joint_positions(anchor);
	match target.link {
		0 => {
			aim(&mut pendulum.links[0], anchor, pos);
			let joint = pendulum.joint_positions(anchor)[0];
			aim(&mut pendulum.links[1], joint, tip);
		}
		_ => aim(&mut pendulum.links[1], joint, pos),
	}
	true
}

#[cfg(test)]
mod tests {
	use glam::dvec2;

	use super::*;
	use crate::color::Rgb;
	use crate::pendulum::{LinkParams, MAX_MASS, MIN_MASS};
	use crate::render::{self, tests::Recorder};
	use crate::test_util::assert_close;
	use crate::SceneConfig;

	/// Paused scene with joints cached: a small one first, the default one second.
	fn paused_scene() -> (Scene, PendulumId, PendulumId) {
		let mut scene = Scene::new(SceneConfig::default());
		let small = scene.add_pendulum(
			[
				LinkParams {
					length: 100.,
					angle_degrees: 0.,
					mass: 3.,
				},
				LinkParams {
					length: 100.,
					angle_degrees: 0.,
					mass: 2.,
				},
			],
			Rgb::new(0, 255, 0),
			16,
		);
		let default = scene.add_pendulum(
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
			256,
		);
		scene.set_paused(true);
		render::draw(&Recorder::default(), &mut scene);
		(scene, small, default)
	}

	#[test]
	fn small_masses_have_min_hit_radius() {
		let (scene, small, _) = paused_scene();
		// small joint 0 is at (512, 482) with radius 3
		let hit = hit_test(&scene, dvec2(512. + 9.5, 482.)).unwrap();
		assert_eq!(hit, DragTarget { pendulum: small, link: 0 });
		assert!(hit_test(&scene, dvec2(512. + 10. + 1e-9, 482.)).is_none());
	}

	#[test]
	fn large_masses_use_their_radius() {
		let (scene, _, default) = paused_scene();
		// default joint 0 is at (262, 382) with radius 30
		let joint = scene.pendulum(default).unwrap().bounding_circles()[0].center;
		let hit = hit_test(&scene, joint + dvec2(0., 29.)).unwrap();
		assert_eq!(hit, DragTarget { pendulum: default, link: 0 });
		assert!(hit_test(&scene, joint + dvec2(0., 30. + 1e-9)).is_none());
	}

	#[test]
	fn first_match_wins() {
		let (mut scene, small, _) = paused_scene();
		// stack both small joints on the same spot
		scene.pendulum_mut(small).unwrap().links[1].length = 0.;
		render::draw(&Recorder::default(), &mut scene);
		let hit = hit_test(&scene, dvec2(512., 482.)).unwrap();
		assert_eq!(hit.link, 0);
	}

	#[test]
	fn pointer_down_selects_and_drags() {
		let (mut scene, small, default) = paused_scene();
		let mut ctrl = InteractionController::new();

		assert_eq!(ctrl.pointer_down(&mut scene, dvec2(512., 582.)), Some(small));
		assert_eq!(ctrl.state(), InteractionState::Dragging(DragTarget { pendulum: small, link: 1 }));
		assert_eq!(scene.selected_id(), Some(small));
		ctrl.pointer_up(&mut scene, dvec2(512., 582.));
		assert_eq!(ctrl.state(), InteractionState::Idle);

		// selecting another one deselects the first
		let joint = scene.pendulum(default).unwrap().bounding_circles()[1].center;
		assert_eq!(ctrl.pointer_down(&mut scene, joint), Some(default));
		assert!(!scene.pendulum(small).unwrap().is_selected());
		assert!(scene.pendulum(default).unwrap().is_selected());

		// a miss clears the selection
		ctrl.pointer_up(&mut scene, joint);
		assert_eq!(ctrl.pointer_down(&mut scene, dvec2(5., 700.)), None);
		assert_eq!(scene.selected_id(), None);
	}

	#[test]
	fn pointer_down_while_running_only_deselects() {
		let (mut scene, small, _) = paused_scene();
		scene.select(small).unwrap();
		scene.set_paused(false);

		let mut ctrl = InteractionController::new();
		assert_eq!(ctrl.pointer_down(&mut scene, dvec2(512., 482.)), None);
		assert_eq!(ctrl.state(), InteractionState::Idle);
		assert_eq!(scene.selected_id(), None);
	}

	#[test]
	fn dragging_inner_link_keeps_tip() {
		let (mut scene, _, default) = paused_scene();
		let anchor = scene.config().anchor;
		let mut ctrl = InteractionController::new();

		let joint = scene.pendulum(default).unwrap().bounding_circles()[0].center;
		let tip_before = scene.pendulum(default).unwrap().joint_positions(anchor)[1];
		ctrl.pointer_down(&mut scene, joint);

		for mouse in [
			dvec2(300., 500.),
			dvec2(700., 200.),
			dvec2(512., 900.),
			dvec2(100., 100.),
			dvec2(900., 382.),
		] {
			ctrl.pointer_move(&mut scene, mouse);
			let [joint, tip] = scene.pendulum(default).unwrap().joint_positions(anchor);
			assert_close(joint.x, mouse.x, 1e-9);
			assert_close(joint.y, mouse.y, 1e-9);
			assert_close(tip.x, tip_before.x, 1e-9);
			assert_close(tip.y, tip_before.y, 1e-9);
			assert_close(scene.pendulum(default).unwrap().links[0].length, anchor.distance(mouse), 1e-9);
		}
	}

	#[test]
	fn dragging_onto_pivot_collapses_link() {
		let (mut scene, _, default) = paused_scene();
		let anchor = scene.config().anchor;
		let mut ctrl = InteractionController::new();

		let [joint, tip] = scene.pendulum(default).unwrap().joint_positions(anchor);
		let angle = scene.pendulum(default).unwrap().links[1].angle;
		ctrl.pointer_down(&mut scene, tip);
		ctrl.pointer_move(&mut scene, joint);

		let outer = &scene.pendulum(default).unwrap().links[1];
		assert_eq!(outer.length, 0.);
		assert_eq!(outer.angle, angle);
	}

	#[test]
	fn dragging_inner_onto_anchor_keeps_tip() {
		let (mut scene, _, default) = paused_scene();
		let anchor = scene.config().anchor;
		let mut ctrl = InteractionController::new();

		let [joint, tip_before] = scene.pendulum(default).unwrap().joint_positions(anchor);
		ctrl.pointer_down(&mut scene, joint);
		ctrl.pointer_move(&mut scene, anchor);

		let pendulum = scene.pendulum(default).unwrap();
		assert_eq!(pendulum.links[0].length, 0.);
		let tip = pendulum.joint_positions(anchor)[1];
		assert_close(tip.x, tip_before.x, 1e-9);
		assert_close(tip.y, tip_before.y, 1e-9);
	}

	#[test]
	fn dragging_outer_link_moves_only_it() {
		let (mut scene, _, default) = paused_scene();
		let anchor = scene.config().anchor;
		let mut ctrl = InteractionController::new();

		let before = scene.pendulum(default).unwrap().links.clone();
		let tip = scene.pendulum(default).unwrap().bounding_circles()[1].center;
		ctrl.pointer_down(&mut scene, tip);
		ctrl.pointer_move(&mut scene, dvec2(100., 50.));

		let pendulum = scene.pendulum(default).unwrap();
		assert_eq!(pendulum.links[0], before[0]);
		let [joint, tip] = pendulum.joint_positions(anchor);
		assert_close(tip.x, 100., 1e-9);
		assert_close(tip.y, 50., 1e-9);
		assert_close(pendulum.links[1].length, joint.distance(dvec2(100., 50.)), 1e-9);
	}

	#[test]
	fn moving_without_drag_changes_nothing() {
		let (mut scene, _, default) = paused_scene();
		let before = scene.pendulum(default).unwrap().links.clone();
		let mut ctrl = InteractionController::new();
		ctrl.pointer_move(&mut scene, dvec2(10., 10.));
		assert_eq!(scene.pendulum(default).unwrap().links, before);
		assert_eq!(ctrl.pointer(), dvec2(10., 10.));
	}

	#[test]
	fn scroll_clamps_mass() {
		let (mut scene, _, default) = paused_scene();
		let joint = scene.pendulum(default).unwrap().bounding_circles()[0].center;
		let mut ctrl = InteractionController::new();
		ctrl.pointer_move(&mut scene, joint);

		assert!(ctrl.scroll(&mut scene, -100.));
		assert_close(scene.pendulum(default).unwrap().links[0].mass(), 32., 1e-12);

		for _ in 0..50 {
			ctrl.scroll(&mut scene, -10_000.);
		}
		assert_eq!(scene.pendulum(default).unwrap().links[0].mass(), MAX_MASS);

		for _ in 0..50 {
			ctrl.scroll(&mut scene, 10_000.);
		}
		assert_eq!(scene.pendulum(default).unwrap().links[0].mass(), MIN_MASS);
	}

	#[test]
	fn scroll_ignored_while_running_or_missed() {
		let (mut scene, _, _) = paused_scene();
		let mut ctrl = InteractionController::new();
		ctrl.pointer_move(&mut scene, dvec2(5., 700.));
		assert!(!ctrl.scroll(&mut scene, 100.));

		ctrl.pointer_move(&mut scene, dvec2(512., 482.));
		scene.set_paused(false);
		assert!(!ctrl.scroll(&mut scene, 100.));
	}

	#[test]
	fn release_on_pause_button_toggles() {
		let (mut scene, _, _) = paused_scene();
		let mut ctrl = InteractionController::new();
		let button = dvec2(980., 40.);

		ctrl.pointer_down(&mut scene, button);
		assert!(ctrl.pointer_up(&mut scene, button));
		assert!(scene.is_running());

		// releasing without a press does nothing
		assert!(!ctrl.pointer_up(&mut scene, button));
		assert!(scene.is_running());
	}

	#[test]
	fn drag_of_removed_pendulum_ends() {
		let (mut scene, small, _) = paused_scene();
		let mut ctrl = InteractionController::new();
		ctrl.pointer_down(&mut scene, dvec2(512., 482.));
		scene.remove_selected().unwrap();
		assert!(scene.pendulum(small).is_none());

		ctrl.pointer_move(&mut scene, dvec2(300., 300.));
		assert_eq!(ctrl.state(), InteractionState::Idle);
	}
}
