use std::string::FromUtf8Error;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use json::JsonValue;

use crate::color::{clamp_channel, Rgb};

use super::json::{as_object, JsonError, JsonObject};

/// Serializable description of a whole scene.
///
/// Text form: `{ g, p: [{ c: [r, g, b], t, p: [{ l, m, a }, { l, m, a }] }, ...] }` with angles in
/// radians and `g` being the gravity slider value, not the internal gravity.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
	pub gravity_slider: f64,
	pub pendulums: Vec<PendulumSnapshot>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PendulumSnapshot {
	pub color: Rgb,
	pub trail_length: usize,
	pub links: [LinkSnapshot; 2],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkSnapshot {
	pub length: f64,
	pub mass: f64,
	/// radians
	pub angle: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
	#[error("Fragment is not base64: {0}")]
	Base64(#[from] base64::DecodeError),
	#[error("Fragment is not UTF-8 text: {0}")]
	Utf8(#[from] FromUtf8Error),
	#[error("Fragment is not JSON: {0}")]
	JsonParse(#[from] json::Error),
	#[error("Malformed snapshot\n  - {0}")]
	Json(#[from] JsonError),
	#[error("Expected 2 links per pendulum, got {0}")]
	WrongLinkCount(usize),
	#[error("Expected 3 color channels, got {0}")]
	WrongChannelCount(usize),
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;

fn vals<T>(key: &str, res: SnapshotResult<T>) -> SnapshotResult<T> {
	res.map_err(|e| match e {
		SnapshotError::Json(err) => SnapshotError::Json(err.nested(key)),
		_ => e,
	})
}

fn in_list<T>(index: usize, res: SnapshotResult<T>) -> SnapshotResult<T> {
	res.map_err(|e| match e {
		SnapshotError::Json(err) => SnapshotError::Json(err.in_list(index)),
		_ => e,
	})
}

// serialization

impl Snapshot {
	pub fn to_json(&self) -> JsonValue {
		let mut obj = json::object::Object::new();
		obj.insert("g", self.gravity_slider.into());
		obj.insert(
			"p",
			JsonValue::Array(self.pendulums.iter().map(PendulumSnapshot::to_json).collect()),
		);
		JsonValue::Object(obj)
	}

	/// Text form, ready to be put behind a `#`.
	pub fn encode(&self) -> String {
		STANDARD.encode(json::stringify(self.to_json()))
	}
}

impl PendulumSnapshot {
	fn to_json(&self) -> JsonValue {
		let mut obj = json::object::Object::new();
		obj.insert(
			"c",
			JsonValue::Array(self.color.to_array().into_iter().map(JsonValue::from).collect()),
		);
		obj.insert("t", self.trail_length.into());
		obj.insert("p", JsonValue::Array(self.links.iter().map(LinkSnapshot::to_json).collect()));
		JsonValue::Object(obj)
	}
}

impl LinkSnapshot {
	fn to_json(&self) -> JsonValue {
		let mut obj = json::object::Object::new();
		obj.insert("l", self.length.into());
		obj.insert("m", self.mass.into());
		obj.insert("a", self.angle.into());
		JsonValue::Object(obj)
	}
}

// deserialization

/// Parses the text form of a snapshot. A leading `#` is ignored.
pub fn parse_fragment(fragment: &str) -> SnapshotResult<Snapshot> {
	let fragment = fragment.trim().trim_start_matches('#');
	let text = String::from_utf8(STANDARD.decode(fragment)?)?;
	let payload = json::parse(&text)?;
	deserialize_snapshot(&payload)
}

/// Like [`parse_fragment`], but any malformed input is just "no data".
pub fn decode_fragment(fragment: &str) -> Option<Snapshot> {
	match parse_fragment(fragment) {
		Ok(snapshot) => Some(snapshot),
		Err(e) => {
			tracing::warn!("{e}");
			None
		}
	}
}

pub fn deserialize_snapshot(val: &JsonValue) -> SnapshotResult<Snapshot> {
	let obj = as_object("snapshot", val)?;
	Ok(Snapshot {
		gravity_slider: obj.get_lenient_f64("g")?,
		pendulums: vals(
			"p",
			obj.get_list("p")?
				.iter()
				.enumerate()
				.map(|(i, val)| in_list(i, deserialize_pendulum(val)))
				.collect(),
		)?,
	})
}

fn deserialize_pendulum(val: &JsonValue) -> SnapshotResult<PendulumSnapshot> {
	let obj = as_object("pendulum", val)?;

	let links = vals(
		"p",
		obj.get_list("p")?
			.iter()
			.enumerate()
			.map(|(i, val)| in_list(i, deserialize_link(val)))
			.collect::<SnapshotResult<Vec<_>>>(),
	)?;
	let links: [LinkSnapshot; 2] = links
		.try_into()
		.map_err(|links: Vec<_>| SnapshotError::WrongLinkCount(links.len()))?;

	Ok(PendulumSnapshot {
		color: vals("c", deserialize_color(&obj))?,
		trail_length: obj.get_lenient_usize("t")?,
		links,
	})
}

fn deserialize_color(obj: &JsonObject) -> SnapshotResult<Rgb> {
	let channels = obj.get_list("c")?;
	let channels: [&JsonValue; 3] = channels
		.iter()
		.collect::<Vec<_>>()
		.try_into()
		.map_err(|_| SnapshotError::WrongChannelCount(channels.len()))?;

	let mut rgb = [0_u8; 3];
	for (i, (val, channel)) in channels.into_iter().zip(&mut rgb).enumerate() {
		let num: f64 = val
			.as_number()
			.ok_or_else(|| JsonError::ValueIsNotNumber(i.to_string()))?
			.into();
		// NaN and negatives land on 0
		*channel = clamp_channel(num.max(0.) as u32);
	}
	Ok(Rgb::from(rgb))
}

fn deserialize_link(val: &JsonValue) -> SnapshotResult<LinkSnapshot> {
	let obj = as_object("link", val)?;
	Ok(LinkSnapshot {
		length: obj.get_f64("l")?,
		mass: obj.get_f64("m")?,
		angle: obj.get_f64("a")?,
	})
}
