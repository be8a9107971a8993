pub mod color;
pub mod formats;
pub mod interaction;
pub mod math;
pub mod pendulum;
pub mod physics;
pub mod render;
pub mod scene;
pub mod ui;

pub use color::{Rgb, Rgba};
pub use pendulum::{JointCircle, Link, LinkParams, Pendulum, PendulumId};
pub use scene::{Scene, SceneConfig, SceneError, SceneObserver};

#[cfg(test)]
pub(crate) mod test_util {
	/// Float comparison for values that went through trigonometry or text.
	#[track_caller]
	pub fn assert_close(a: f64, b: f64, eps: f64) {
		assert!((a - b).abs() <= eps, "{a} and {b} differ by more than {eps}");
	}
}
