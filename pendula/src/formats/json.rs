//! Typed access into `json` values, with errors that remember where they happened.

use json::JsonValue;

pub(super) trait SerialExtend {
	fn as_object(&self) -> Option<&json::object::Object>;
}

impl SerialExtend for JsonValue {
	fn as_object(&self) -> Option<&json::object::Object> {
		if let JsonValue::Object(obj) = self {
			Some(obj)
		} else {
			None
		}
	}
}

pub type JsonResult<T> = Result<T, JsonError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JsonError {
	#[error("Key {0:?} does not exist")]
	KeyDoesNotExist(String),
	#[error("Value at {0:?} is not an object")]
	ValueIsNotObject(String),
	#[error("Value at {0:?} is not a list")]
	ValueIsNotList(String),
	#[error("Value at {0:?} is not a number")]
	ValueIsNotNumber(String),
	#[error("Error while parsing int at {0:?}\n  - number out of scope")]
	ParseIntError(String),
	#[error("Error in list at index {index}\n  - {inner}")]
	ErrorInList { index: usize, inner: Box<JsonError> },
	#[error("Error in object at {key:?}\n  - {inner}")]
	ErrorInObject { key: String, inner: Box<JsonError> },
}

impl JsonError {
	pub fn nested(self, key: &str) -> Self {
		Self::ErrorInObject {
			key: key.to_owned(),
			inner: Box::new(self),
		}
	}

	pub fn in_list(self, index: usize) -> Self {
		Self::ErrorInList {
			index,
			inner: Box::new(self),
		}
	}
}

pub struct JsonObject<'a>(pub &'a json::object::Object);

impl<'a> JsonObject<'a> {
	fn get(&self, key: &str) -> JsonResult<&'a JsonValue> {
		match self.0.get(key) {
			Some(value) => Ok(value),
			None => Err(JsonError::KeyDoesNotExist(key.to_owned())),
		}
	}

	pub fn get_list(&self, key: &str) -> JsonResult<&'a [JsonValue]> {
		match self.get(key)? {
			JsonValue::Array(arr) => Ok(arr),
			_ => Err(JsonError::ValueIsNotList(key.to_owned())),
		}
	}

	pub fn get_f64(&self, key: &str) -> JsonResult<f64> {
		match self.get(key)?.as_number() {
			Some(val) => Ok(val.into()),
			None => Err(JsonError::ValueIsNotNumber(key.to_owned())),
		}
	}

	/// Like [`get_f64`](Self::get_f64), but also reads numbers that were written as strings.
	pub fn get_lenient_f64(&self, key: &str) -> JsonResult<f64> {
		let val = self.get(key)?;
		if let Some(num) = val.as_number() {
			return Ok(num.into());
		}
		val.as_str()
			.and_then(|s| s.trim().parse::<f64>().ok())
			.ok_or_else(|| JsonError::ValueIsNotNumber(key.to_owned()))
	}

	/// A non-negative integer, possibly written as a string.
	pub fn get_lenient_usize(&self, key: &str) -> JsonResult<usize> {
		let val = self.get_lenient_f64(key)?;
		if val.is_finite() && val >= 0. && val.fract() == 0. && val <= usize::MAX as f64 {
			Ok(val as usize)
		} else {
			Err(JsonError::ParseIntError(key.to_owned()))
		}
	}
}

/// Views `val` as an object, naming it `msg` in errors.
pub fn as_object<'a>(msg: &str, val: &'a JsonValue) -> JsonResult<JsonObject<'a>> {
	match val.as_object() {
		Some(obj) => Ok(JsonObject(obj)),
		None => Err(JsonError::ValueIsNotObject(msg.to_owned())),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn lenient_numbers() {
		let val = json::parse(r#"{"a": 15, "b": "15", "c": "x", "d": 2.5, "e": [1]}"#).unwrap();
		let obj = as_object("root", &val).unwrap();

		assert_eq!(obj.get_lenient_f64("a"), Ok(15.));
		assert_eq!(obj.get_lenient_f64("b"), Ok(15.));
		assert_eq!(obj.get_lenient_usize("b"), Ok(15));
		assert_eq!(obj.get_lenient_f64("c"), Err(JsonError::ValueIsNotNumber("c".to_owned())));
		assert_eq!(obj.get_lenient_usize("d"), Err(JsonError::ParseIntError("d".to_owned())));
		assert_eq!(obj.get_f64("b"), Err(JsonError::ValueIsNotNumber("b".to_owned())));
		assert_eq!(obj.get_list("e").map(<[_]>::len), Ok(1));
		assert_eq!(obj.get_list("z"), Err(JsonError::KeyDoesNotExist("z".to_owned())));
	}

	#[test]
	fn nested_errors_read_outside_in() {
		let err = JsonError::KeyDoesNotExist("l".to_owned()).in_list(1).nested("p");
		assert_eq!(
			err.to_string(),
			"Error in object at \"p\"\n  - Error in list at index 1\n  - Key \"l\" does not exist"
		);
	}
}
