use std::collections::VecDeque;
use std::fmt;

use glam::DVec2;
use uuid::Uuid;

use crate::color::Rgb;
use crate::math;

/// Bounds of a link's mass, which doubles as its drawn radius.
pub const MIN_MASS: f64 = 1.0;
pub const MAX_MASS: f64 = 100.0;

/// Trail length a pendulum starts with when none is given.
pub const DEFAULT_TRAIL_LENGTH: usize = 256;
/// Internal gravity of a fresh pendulum, i.e. a slider value of 15.
pub const DEFAULT_GRAVITY: f64 = 0.75;

/// Process-unique handle of a pendulum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendulumId(pub Uuid);

impl PendulumId {
	pub fn new() -> Self {
		Self(Uuid::new_v4())
	}
}

impl Default for PendulumId {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Display for PendulumId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		self.0.fmt(f)
	}
}

/// Construction parameters of a link. The angle is given in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkParams {
	pub length: f64,
	pub angle_degrees: f64,
	pub mass: f64,
}

/// One rigid segment of the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
	/// radians, 0 = hanging straight down
	pub angle: f64,
	/// pixels
	pub length: f64,
	/// Both the physical point mass and the drawn radius.
	mass: f64,
	/// radians/frame
	pub angular_speed: f64,
	/// radians/frame²
	pub angular_accel: f64,
}

impl Link {
	pub fn new(params: LinkParams) -> Self {
		Self {
			angle: params.angle_degrees.to_radians(),
			length: params.length,
			mass: clamp_mass(params.mass),
			angular_speed: 0.,
			angular_accel: 0.,
		}
	}

	pub fn mass(&self) -> f64 {
		self.mass
	}

	pub fn set_mass(&mut self, mass: f64) {
		self.mass = clamp_mass(mass);
	}

	/// Forget any momentum.
	pub fn halt(&mut self) {
		self.angular_speed = 0.;
		self.angular_accel = 0.;
	}
}

fn clamp_mass(mass: f64) -> f64 {
	mass.clamp(MIN_MASS, MAX_MASS)
}

/// Screen position of a joint together with its mass, for drawing and hit-testing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointCircle {
	pub center: DVec2,
	pub radius: f64,
}

/// A two-link pendulum.
#[derive(Debug, Clone)]
pub struct Pendulum {
	id: PendulumId,
	pub links: [Link; 2],
	pub color: Rgb,
	/// End-effector history, most recent first.
	trail: VecDeque<DVec2>,
	pub trail_length: usize,
	pub gravity: f64,
	selected: bool,
	/// Joint positions as of the last draw. Empty until drawn once.
	joints: Option<[JointCircle; 2]>,
}

impl Pendulum {
	pub fn new(links: [LinkParams; 2], color: Rgb, trail_length: usize) -> Self {
		Self {
			id: PendulumId::new(),
			links: links.map(Link::new),
			color,
			trail: VecDeque::new(),
			trail_length,
			gravity: DEFAULT_GRAVITY,
			selected: false,
			joints: None,
		}
	}

	pub fn id(&self) -> PendulumId {
		self.id
	}

	pub fn is_selected(&self) -> bool {
		self.selected
	}

	pub(crate) fn set_selected(&mut self, selected: bool) {
		self.selected = selected;
	}

	pub fn trail(&self) -> &VecDeque<DVec2> {
		&self.trail
	}

	pub(crate) fn trail_mut(&mut self) -> &mut VecDeque<DVec2> {
		&mut self.trail
	}

	/// Joint circles cached by the last draw, in link order.
	pub fn bounding_circles(&self) -> &[JointCircle] {
		match &self.joints {
			Some(joints) => joints,
			None => &[],
		}
	}

	/// Current joint positions walked from `anchor`. Does not touch the cache.
	pub fn joint_positions(&self, anchor: DVec2) -> [DVec2; 2] {
		let [l0, l1] = &self.links;
		math::chain_positions(anchor, [(l0.angle, l0.length), (l1.angle, l1.length)])
	}

	/// Recomputes and caches the joint circles.
	pub fn refresh_joints(&mut self, anchor: DVec2) -> [JointCircle; 2] {
		let [p0, p1] = self.joint_positions(anchor);
		let joints = [
			JointCircle {
				center: p0,
				radius: self.links[0].mass(),
			},
			JointCircle {
				center: p1,
				radius: self.links[1].mass(),
			},
		];
		self.joints = Some(joints);
		joints
	}

	/// Zero speeds and accelerations of both links.
	pub fn halt(&mut self) {
		self.links.iter_mut().for_each(Link::halt);
	}
}

#[cfg(test)]
mod tests {
	use std::f64::consts::FRAC_PI_2;

	use glam::dvec2;

	use super::*;
	use crate::test_util::assert_close;

	fn params(length: f64, angle_degrees: f64, mass: f64) -> LinkParams {
		LinkParams {
			length,
			angle_degrees,
			mass,
		}
	}

	#[test]
	fn new_converts_degrees() {
		let p = Pendulum::new([params(250., 90., 30.), params(250., 120., 10.)], Rgb::RED, 256);
		assert_close(p.links[0].angle, FRAC_PI_2, 1e-15);
		assert_close(p.links[1].angle, 2. * std::f64::consts::FRAC_PI_3, 1e-15);
		assert_eq!(p.links[0].angular_speed, 0.);
		assert_eq!(p.gravity, DEFAULT_GRAVITY);
		assert!(p.bounding_circles().is_empty());
	}

	#[test]
	fn mass_is_clamped() {
		let mut link = Link::new(params(10., 0., 500.));
		assert_eq!(link.mass(), MAX_MASS);
		link.set_mass(-3.);
		assert_eq!(link.mass(), MIN_MASS);
	}

	#[test]
	fn ids_are_unique() {
		let a = Pendulum::new([params(1., 0., 1.); 2], Rgb::RED, 0);
		let b = Pendulum::new([params(1., 0., 1.); 2], Rgb::RED, 0);
		assert_ne!(a.id(), b.id());
	}

	#[test]
	fn refresh_joints_walks_chain() {
		let mut p = Pendulum::new([params(100., 0., 20.), params(50., 90., 5.)], Rgb::RED, 0);
		let [j0, j1] = p.refresh_joints(dvec2(10., 10.));
		assert_close(j0.center.x, 10., 1e-9);
		assert_close(j0.center.y, 110., 1e-9);
		assert_close(j1.center.x, -40., 1e-9);
		assert_close(j1.center.y, 110., 1e-9);
		assert_eq!(j1.radius, 5.);
		assert_eq!(p.bounding_circles().len(), 2);
	}
}
