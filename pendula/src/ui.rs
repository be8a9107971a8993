use glam::{dvec2, DVec2};

use crate::color::{Rgb, Rgba};
use crate::render::PendulaRenderer;

const ICON_COLOR: Rgba = Rgb::WHITE.with_alpha(0.25);

/// The pause/play toggle drawn in the canvas corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PauseButton {
	/// Top left corner.
	pub origin: DVec2,
	pub width: f64,
	pub height: f64,
}

impl PauseButton {
	pub fn new(origin: DVec2, width: f64) -> Self {
		Self {
			origin,
			width,
			height: width * 1.2,
		}
	}

	/// Whether `point` lies strictly inside the button.
	pub fn contains(&self, point: DVec2) -> bool {
		let max = self.origin + dvec2(self.width, self.height);
		point.x > self.origin.x && point.x < max.x && point.y > self.origin.y && point.y < max.y
	}

	/// Two bars while running, a play triangle while paused.
	pub fn draw<R: PendulaRenderer>(&self, renderer: &R, running: bool) {
		let DVec2 { x, y } = self.origin;
		let (w, h) = (self.width, self.height);

		if running {
			let bar = w / 3.;
			for left in [x, x + w * 2. / 3.] {
				renderer.fill_polygon(
					&[
						dvec2(left, y),
						dvec2(left + bar, y),
						dvec2(left + bar, y + h),
						dvec2(left, y + h),
					],
					ICON_COLOR,
				);
			}
		} else {
			renderer.fill_polygon(&[dvec2(x, y), dvec2(x, y + h), dvec2(x + w, y + h / 2.)], ICON_COLOR);
		}
	}
}

impl Default for PauseButton {
	fn default() -> Self {
		Self::new(dvec2(960., 16.), 48.)
	}
}
