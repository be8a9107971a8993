use glam::DVec2;

use crate::color::{Rgb, Rgba};
use crate::pendulum::Pendulum;
use crate::scene::Scene;

/// Radius of a trail dot.
pub const TRAIL_DOT_RADIUS: f64 = 4.;
/// Stroke width of links and trail dots.
pub const LINK_WIDTH: f64 = 8.;
/// Stroke width of the selection ghost.
pub const GHOST_WIDTH: f64 = 14.;
/// How much larger the selection ghost's joints are than the masses.
pub const GHOST_PADDING: f64 = 4.;

/// Pendula only decides *what* to draw, in which order. A backend shall implement this trait to
/// decide *how*, be it a browser canvas, a GPU pipeline or a recorder for tests.
///
/// All coordinates are canvas pixels, Y pointing down.
pub trait PendulaRenderer {
	/// Wipe the whole canvas.
	fn clear(&self);
	/// Stroke independent straight segments.
	fn stroke_segments(&self, segments: &[[DVec2; 2]], width: f64, color: Rgba);
	/// Stroke the outline of a circle.
	fn stroke_circle(&self, center: DVec2, radius: f64, width: f64, color: Rgba);
	fn fill_circle(&self, center: DVec2, radius: f64, color: Rgba);
	/// Fill a closed polygon.
	fn fill_polygon(&self, points: &[DVec2], color: Rgba);
}

trait PendulaRendererCommon {
	/// Draw one pendulum, maintaining its trail and joint cache.
	fn draw_pendulum(&self, pendulum: &mut Pendulum, anchor: DVec2, running: bool);

	/// Draw the skeleton: links from `anchor` through `joints`, then a disc at every joint.
	fn draw_skeleton(&self, anchor: DVec2, joints: &[DVec2; 2], radii: [f64; 2], width: f64, color: Rgba);

	/// Clear, then draw all pendulums in list order and the pause button on top.
	fn draw(&self, scene: &mut Scene);
}

impl<T: PendulaRenderer> PendulaRendererCommon for T {
	fn draw_pendulum(&self, pendulum: &mut Pendulum, anchor: DVec2, running: bool) {
		let trail_length = pendulum.trail_length;
		let color = pendulum.color;

		if running {
			let trail = pendulum.trail_mut();
			trail.truncate(trail_length);
			for (i, pos) in trail.iter().enumerate() {
				let alpha = (trail_length - i) as f64 / trail_length as f64;
				self.stroke_circle(*pos, TRAIL_DOT_RADIUS, LINK_WIDTH, color.with_alpha(alpha));
			}
		} else {
			pendulum.trail_mut().clear();
		}

		let [j0, j1] = pendulum.refresh_joints(anchor);
		let joints = [j0.center, j1.center];

		if pendulum.is_selected() {
			let radii = [j0.radius + GHOST_PADDING, j1.radius + GHOST_PADDING];
			self.draw_skeleton(anchor, &joints, radii, GHOST_WIDTH, Rgb::WHITE.opaque());
		}
		self.draw_skeleton(anchor, &joints, [j0.radius, j1.radius], LINK_WIDTH, color.opaque());

		if running {
			// grows after drawing so the fresh tip isn't drawn twice
			let trail = pendulum.trail_mut();
			trail.push_front(j1.center);
			trail.truncate(trail_length);
		}
	}

	fn draw_skeleton(&self, anchor: DVec2, joints: &[DVec2; 2], radii: [f64; 2], width: f64, color: Rgba) {
		self.stroke_segments(&[[anchor, joints[0]], [joints[0], joints[1]]], width, color);
		for (center, radius) in joints.iter().zip(radii) {
			self.fill_circle(*center, radius, color);
		}
	}

	fn draw(&self, scene: &mut Scene) {
		self.clear();

		let anchor = scene.config().anchor;
		let running = scene.is_running();
		for pendulum in scene.pendulums_mut() {
			self.draw_pendulum(pendulum, anchor, running);
		}

		scene.config().pause_button.draw(self, running);
	}
}

/// Dispatches the draw calls of one frame of `scene` to `renderer`.
///
/// Besides drawing, this is where trails advance and where the joint positions used for
/// hit-testing are refreshed:
/// - while running, each trail is cut to its pendulum's trail length and gains the current tip,
/// - while paused, trails are emptied.
pub fn draw<R: PendulaRenderer>(renderer: &R, scene: &mut Scene) {
	renderer.draw(scene);
}
