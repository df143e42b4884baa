//! Concrete attribute values.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::FactoryError;

/// A resolved attribute value.
///
/// Serializes untagged, so a record of values maps onto a plain JSON object
/// (timestamps render as RFC 3339 strings).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	Null,
	Bool(bool),
	Int(i64),
	Float(f64),
	String(String),
	Timestamp(DateTime<Utc>),
	Uuid(Uuid),
	Json(serde_json::Value),
}

impl Value {
	/// Short name of the variant, used in diagnostics.
	pub fn kind(&self) -> &'static str {
		match self {
			Value::Null => "null",
			Value::Bool(_) => "bool",
			Value::Int(_) => "int",
			Value::Float(_) => "float",
			Value::String(_) => "string",
			Value::Timestamp(_) => "timestamp",
			Value::Uuid(_) => "uuid",
			Value::Json(_) => "json",
		}
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Value::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Value::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Value::Float(f) => Some(*f),
			Value::Int(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
		match self {
			Value::Timestamp(dt) => Some(*dt),
			_ => None,
		}
	}

	pub fn as_uuid(&self) -> Option<Uuid> {
		match self {
			Value::Uuid(u) => Some(*u),
			_ => None,
		}
	}

	/// Returns true for nulls and empty strings.
	pub fn is_blank(&self) -> bool {
		match self {
			Value::Null => true,
			Value::String(s) => s.is_empty(),
			_ => false,
		}
	}

	/// Converts into a `serde_json::Value`.
	pub fn to_json(&self) -> serde_json::Value {
		match self {
			Value::Null => serde_json::Value::Null,
			Value::Bool(b) => serde_json::Value::Bool(*b),
			Value::Int(i) => serde_json::Value::from(*i),
			Value::Float(f) => serde_json::Value::from(*f),
			Value::String(s) => serde_json::Value::String(s.clone()),
			Value::Timestamp(dt) => serde_json::Value::String(dt.to_rfc3339()),
			Value::Uuid(u) => serde_json::Value::String(u.to_string()),
			Value::Json(v) => v.clone(),
		}
	}
}

impl std::fmt::Display for Value {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Value::Null => write!(f, "null"),
			Value::Bool(b) => write!(f, "{}", b),
			Value::Int(i) => write!(f, "{}", i),
			Value::Float(x) => write!(f, "{}", x),
			Value::String(s) => write!(f, "{}", s),
			Value::Timestamp(dt) => write!(f, "{}", dt.to_rfc3339()),
			Value::Uuid(u) => write!(f, "{}", u),
			Value::Json(v) => write!(f, "{}", v),
		}
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Value::String(s.to_string())
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::String(s)
	}
}

impl From<&String> for Value {
	fn from(s: &String) -> Self {
		Value::String(s.clone())
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Value::Int(i)
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Value::Int(i as i64)
	}
}

impl From<u32> for Value {
	fn from(i: u32) -> Self {
		Value::Int(i as i64)
	}
}

impl From<u64> for Value {
	fn from(i: u64) -> Self {
		// Sequence counters never get near i64::MAX.
		Value::Int(i as i64)
	}
}

impl From<usize> for Value {
	fn from(i: usize) -> Self {
		Value::Int(i as i64)
	}
}

impl From<f64> for Value {
	fn from(f: f64) -> Self {
		Value::Float(f)
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}

impl From<DateTime<Utc>> for Value {
	fn from(dt: DateTime<Utc>) -> Self {
		Value::Timestamp(dt)
	}
}

impl From<Uuid> for Value {
	fn from(u: Uuid) -> Self {
		Value::Uuid(u)
	}
}

impl From<serde_json::Value> for Value {
	fn from(v: serde_json::Value) -> Self {
		match v {
			serde_json::Value::Null => Value::Null,
			serde_json::Value::Bool(b) => Value::Bool(b),
			serde_json::Value::String(s) => Value::String(s),
			serde_json::Value::Number(n) => match n.as_i64() {
				Some(i) => Value::Int(i),
				None => Value::Float(n.as_f64().unwrap_or_default()),
			},
			other => Value::Json(other),
		}
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(v: Option<T>) -> Self {
		v.map_or(Value::Null, Into::into)
	}
}

fn type_error(value: &Value, target: &str) -> FactoryError {
	FactoryError::Type(format!("Cannot convert {} value to {}", value.kind(), target))
}

impl TryFrom<Value> for String {
	type Error = FactoryError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::String(s) => Ok(s),
			other => Err(type_error(&other, "String")),
		}
	}
}

impl TryFrom<Value> for i64 {
	type Error = FactoryError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Int(i) => Ok(i),
			other => Err(type_error(&other, "i64")),
		}
	}
}

impl TryFrom<Value> for f64 {
	type Error = FactoryError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		value.as_f64().ok_or_else(|| type_error(&value, "f64"))
	}
}

impl TryFrom<Value> for bool {
	type Error = FactoryError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Bool(b) => Ok(b),
			other => Err(type_error(&other, "bool")),
		}
	}
}

impl TryFrom<Value> for DateTime<Utc> {
	type Error = FactoryError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Timestamp(dt) => Ok(dt),
			Value::String(ref s) => DateTime::parse_from_rfc3339(s)
				.map(|dt| dt.with_timezone(&Utc))
				.map_err(|_| type_error(&value, "DateTime<Utc>")),
			other => Err(type_error(&other, "DateTime<Utc>")),
		}
	}
}

impl TryFrom<Value> for Uuid {
	type Error = FactoryError;

	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::Uuid(u) => Ok(u),
			Value::String(ref s) => {
				Uuid::parse_str(s).map_err(|_| FactoryError::Type(format!("Invalid UUID string: {}", s)))
			}
			other => Err(type_error(&other, "Uuid")),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Value::from("jane"), "string")]
	#[case(Value::from(42), "int")]
	#[case(Value::from(1.5), "float")]
	#[case(Value::from(true), "bool")]
	#[case(Value::from(None::<String>), "null")]
	fn test_kind(#[case] value: Value, #[case] kind: &str) {
		assert_eq!(value.kind(), kind);
	}

	#[rstest]
	fn test_serializes_untagged() {
		let json = serde_json::to_value(Value::from("jane@doe.org")).unwrap();
		assert_eq!(json, serde_json::json!("jane@doe.org"));

		let json = serde_json::to_value(Value::Int(7)).unwrap();
		assert_eq!(json, serde_json::json!(7));
	}

	#[rstest]
	fn test_timestamp_parses_from_string() {
		let now = Utc::now();
		let parsed = DateTime::<Utc>::try_from(Value::String(now.to_rfc3339())).unwrap();
		assert_eq!(parsed, now);
	}

	#[rstest]
	fn test_try_from_type_error() {
		let result = i64::try_from(Value::from("not a number"));
		assert!(matches!(result, Err(FactoryError::Type(_))));
	}

	#[rstest]
	fn test_is_blank() {
		assert!(Value::Null.is_blank());
		assert!(Value::from("").is_blank());
		assert!(!Value::from("x").is_blank());
		assert!(!Value::Int(0).is_blank());
	}
}
