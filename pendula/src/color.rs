use std::fmt;

/// Opaque pendulum color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const RED: Rgb = Rgb::new(255, 0, 0);
	pub const WHITE: Rgb = Rgb::new(255, 255, 255);

	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	pub const fn opaque(self) -> Rgba {
		self.with_alpha(1.0)
	}

	pub const fn with_alpha(self, a: f64) -> Rgba {
		Rgba { rgb: self, a }
	}

	pub fn channel(&self, channel: Channel) -> u8 {
		match channel {
			Channel::Red => self.r,
			Channel::Green => self.g,
			Channel::Blue => self.b,
		}
	}

	pub fn channel_mut(&mut self, channel: Channel) -> &mut u8 {
		match channel {
			Channel::Red => &mut self.r,
			Channel::Green => &mut self.g,
			Channel::Blue => &mut self.b,
		}
	}

	pub fn to_array(self) -> [u8; 3] {
		[self.r, self.g, self.b]
	}
}

impl From<[u8; 3]> for Rgb {
	fn from([r, g, b]: [u8; 3]) -> Self {
		Self::new(r, g, b)
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
	}
}

/// Color with opacity, as handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
	pub rgb: Rgb,
	/// 0 (transparent) ..= 1 (opaque)
	pub a: f64,
}

impl fmt::Display for Rgba {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Rgb { r, g, b } = self.rgb;
		write!(f, "rgba({r}, {g}, {b}, {})", self.a)
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
	Red,
	Green,
	Blue,
}

/// Reads a color channel typed by the user.
///
/// Leading whitespace, an optional sign and the leading digits are honored, anything after is ignored.
/// Input without leading digits reads as 0. The result is clamped into `0..=255`.
pub fn parse_channel(raw: &str) -> u8 {
	let raw = raw.trim_start();
	let (negative, digits) = match raw.as_bytes().first() {
		Some(b'-') => (true, &raw[1..]),
		Some(b'+') => (false, &raw[1..]),
		_ => (false, raw),
	};

	let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
	if end == 0 || negative {
		return 0;
	}

	// Anything too long to parse is certainly above the max.
	digits[..end].parse::<u32>().map_or(u8::MAX, clamp_channel)
}

pub fn clamp_channel(val: u32) -> u8 {
	val.min(u8::MAX as u32) as u8
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parse_channel_clamps() {
		assert_eq!(parse_channel("128"), 128);
		assert_eq!(parse_channel("  42"), 42);
		assert_eq!(parse_channel("300"), 255);
		assert_eq!(parse_channel("99999999999999999999"), 255);
		assert_eq!(parse_channel("-5"), 0);
		assert_eq!(parse_channel("+7"), 7);
	}

	#[test]
	fn parse_channel_non_numeric_is_min() {
		assert_eq!(parse_channel(""), 0);
		assert_eq!(parse_channel("abc"), 0);
		assert_eq!(parse_channel("-"), 0);
		assert_eq!(parse_channel("12abc"), 12);
	}

	#[test]
	fn rgba_display() {
		assert_eq!(Rgb::new(1, 2, 3).with_alpha(0.5).to_string(), "rgba(1, 2, 3, 0.5)");
		assert_eq!(Rgb::RED.to_string(), "rgb(255, 0, 0)");
	}
}
