//! Angle/length chain geometry.
//!
//! Angles are measured so that `0` hangs straight down: a link at angle `a` points along
//! `(cos(a + π/2), sin(a + π/2))` in screen space, where Y grows downwards.

use std::f64::consts::{FRAC_PI_2, PI};

use glam::{dvec2, DVec2};

/// Unit vector of a link at `angle`.
#[inline]
pub fn link_direction(angle: f64) -> DVec2 {
	let (sin, cos) = (angle + FRAC_PI_2).sin_cos();
	dvec2(cos, sin)
}

/// Free end of a link of `length` at `angle` pivoted at `pivot`.
#[inline]
pub fn link_end(pivot: DVec2, angle: f64, length: f64) -> DVec2 {
	pivot + link_direction(angle) * length
}

/// Walks a chain of `(angle, length)` pairs from `anchor`, returning each joint.
pub fn chain_positions<const N: usize>(anchor: DVec2, links: [(f64, f64); N]) -> [DVec2; N] {
	let mut pos = anchor;
	links.map(|(angle, length)| {
		pos = link_end(pos, angle, length);
		pos
	})
}

/// Angle a link pivoted at `from` needs to point at `to`.
///
/// Quadrants are resolved from the sign of the x offset, so the result lies in `[-π/2, 3π/2)`.
/// `None` when both points coincide.
pub fn angle_towards(from: DVec2, to: DVec2) -> Option<f64> {
	if from == to {
		return None;
	}

	let d = to - from;
	let mut angle = (d.y / d.x).atan() - FRAC_PI_2;
	if to.x < from.x {
		angle += PI;
	}
	Some(angle)
}

/// Inverse of [`link_end`]: angle and length of a link from `from` to `to`.
pub fn link_towards(from: DVec2, to: DVec2) -> Option<(f64, f64)> {
	angle_towards(from, to).map(|angle| (angle, from.distance(to)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::test_util::assert_close;

	#[test]
	fn zero_angle_hangs_down() {
		let end = link_end(DVec2::ZERO, 0.0, 10.0);
		assert_close(end.x, 0.0, 1e-12);
		assert_close(end.y, 10.0, 1e-12);
	}

	#[test]
	fn chain_accumulates() {
		let [a, b] = chain_positions(dvec2(5.0, 5.0), [(0.0, 10.0), (-FRAC_PI_2, 3.0)]);
		assert_close(a.x, 5.0, 1e-12);
		assert_close(a.y, 15.0, 1e-12);
		assert_close(b.x, 8.0, 1e-12);
		assert_close(b.y, 15.0, 1e-12);
	}

	#[test]
	fn angle_towards_covers_all_quadrants() {
		let origin = dvec2(100.0, 100.0);
		for target in [
			dvec2(130.0, 140.0),
			dvec2(70.0, 140.0),
			dvec2(70.0, 60.0),
			dvec2(130.0, 60.0),
			dvec2(100.0, 150.0),
			dvec2(100.0, 50.0),
			dvec2(40.0, 100.0),
		] {
			let (angle, length) = link_towards(origin, target).unwrap();
			let end = link_end(origin, angle, length);
			assert_close(end.x, target.x, 1e-9);
			assert_close(end.y, target.y, 1e-9);
		}
	}

	#[test]
	fn coincident_points_have_no_angle() {
		assert!(angle_towards(dvec2(1.0, 2.0), dvec2(1.0, 2.0)).is_none());
	}
}
