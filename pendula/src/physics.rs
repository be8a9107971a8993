use crate::pendulum::{Link, Pendulum};

/// Angular accelerations of both links for the current state.
///
/// Point masses at the end of each massless rod, link 0 pivoted at the anchor,
/// link 1 pivoted at the end of link 0.
/// https://www.myphysicslab.com/pendulum/double-pendulum-en.html
pub fn eval(links: &[Link; 2], g: f64) -> [f64; 2] {
	let [l0, l1] = links;
	let (θ1, θ2) = (l0.angle, l1.angle);
	let (ω1, ω2) = (l0.angular_speed, l1.angular_speed);
	let (m1, m2) = (l0.mass(), l1.mass());
	let (r1, r2) = (l0.length, l1.length);

	let δ = θ1 - θ2;
	let denom = 2. * m1 + m2 - m2 * (2. * θ1 - 2. * θ2).cos();

	// θ1'' = (-g(2m1+m2)sinθ1 - m2 g sin(θ1-2θ2) - 2 sin(θ1-θ2) m2 (ω2² r2 + ω1² r1 cos(θ1-θ2))) / (r1 denom)
	let α1 = (-g * (2. * m1 + m2) * θ1.sin()
		- m2 * g * (θ1 - 2. * θ2).sin()
		- 2. * δ.sin() * m2 * (ω2 * ω2 * r2 + ω1 * ω1 * r1 * δ.cos()))
		/ (r1 * denom);

	// θ2'' = 2 sin(θ1-θ2) (ω1² r1 (m1+m2) + g(m1+m2)cosθ1 + ω2² r2 m2 cos(θ1-θ2)) / (r2 denom)
	let α2 = (2.
		* δ.sin()
		* (ω1 * ω1 * r1 * (m1 + m2) + g * (m1 + m2) * θ1.cos() + ω2 * ω2 * r2 * m2 * δ.cos()))
		/ (r2 * denom);

	[α1, α2]
}

/// Advances the pendulum by one frame.
///
/// Semi-implicit Euler with a timestep of exactly one frame: both accelerations are taken from the
/// old state, then speeds, then angles. Nothing stops a diverging state.
pub fn tick(pendulum: &mut Pendulum) {
	let accels = eval(&pendulum.links, pendulum.gravity);

	for (link, accel) in pendulum.links.iter_mut().zip(accels) {
		link.angular_accel = accel;
		link.angular_speed += accel;
		link.angle += link.angular_speed;
	}
}
