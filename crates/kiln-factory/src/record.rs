//! Resolved records and per-call overrides.

use std::ops::Index;

use indexmap::IndexMap;
use indexmap::map::Iter;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::{FactoryError, FactoryResult};
use crate::value::Value;

/// An ordered mapping from attribute name to resolved value.
///
/// Records are produced once per build call. Iteration follows the order in
/// which attributes were resolved (or, for persisted records, the order the
/// adapter returned them in).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
	values: IndexMap<String, Value>,
}

impl Record {
	/// Creates an empty record.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts a value, keeping the original position if the name exists.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
		self.values.insert(name.into(), value.into())
	}

	/// Returns the value of an attribute.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Returns the value of an attribute converted to `T`.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::Type`] if the attribute is missing or holds a
	/// value of another type.
	pub fn get_as<T>(&self, name: &str) -> FactoryResult<T>
	where
		T: TryFrom<Value, Error = FactoryError>,
	{
		self.values
			.get(name)
			.cloned()
			.ok_or_else(|| FactoryError::Type(format!("Attribute not present: {}", name)))
			.and_then(T::try_from)
	}

	/// Returns the string value of an attribute, if it is a string.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.get(name).and_then(Value::as_str)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	pub fn remove(&mut self, name: &str) -> Option<Value> {
		self.values.shift_remove(name)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	/// Attribute names in order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	pub fn iter(&self) -> Iter<'_, String, Value> {
		self.values.iter()
	}

	/// Converts the record into a JSON object.
	pub fn to_json(&self) -> serde_json::Value {
		serde_json::Value::Object(
			self.values
				.iter()
				.map(|(name, value)| (name.clone(), value.to_json()))
				.collect(),
		)
	}

	/// Deserializes the record into a user-defined type.
	///
	/// # Example
	///
	/// ```
	/// use kiln_factory::{Record, Value};
	/// use serde::Deserialize;
	///
	/// #[derive(Deserialize)]
	/// struct User {
	///     id: i64,
	///     email: String,
	/// }
	///
	/// let mut record = Record::new();
	/// record.insert("id", 1);
	/// record.insert("email", "jane@doe.org");
	///
	/// let user: User = record.deserialize().unwrap();
	/// assert_eq!(user.id, 1);
	/// assert_eq!(user.email, "jane@doe.org");
	/// ```
	pub fn deserialize<T: DeserializeOwned>(&self) -> FactoryResult<T> {
		Ok(serde_json::from_value(self.to_json())?)
	}

	pub fn into_inner(self) -> IndexMap<String, Value> {
		self.values
	}
}

impl Index<&str> for Record {
	type Output = Value;

	fn index(&self, name: &str) -> &Value {
		self.values
			.get(name)
			.unwrap_or_else(|| panic!("attribute not present in record: {}", name))
	}
}

impl<'a> IntoIterator for &'a Record {
	type Item = (&'a String, &'a Value);
	type IntoIter = Iter<'a, String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.values.iter()
	}
}

impl IntoIterator for Record {
	type Item = (String, Value);
	type IntoIter = indexmap::map::IntoIter<String, Value>;

	fn into_iter(self) -> Self::IntoIter {
		self.values.into_iter()
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			values: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl<K: Into<String>, V: Into<Value>> Extend<(K, V)> for Record {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
		for (name, value) in iter {
			self.insert(name, value);
		}
	}
}

/// Per-call attribute overrides.
///
/// Overridden attributes take the given value verbatim; their declared
/// source is never evaluated.
///
/// ```
/// use kiln_factory::Overrides;
///
/// let overrides = Overrides::from([("email", "x@y.com")]);
/// assert!(overrides.contains("email"));
///
/// let overrides = Overrides::new().set("first_name", "John").set("age", 42);
/// assert_eq!(overrides.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
	values: IndexMap<String, Value>,
}

impl Overrides {
	/// Creates an empty set of overrides.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an override.
	pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.values.insert(name.into(), value.into());
		self
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.values.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(String::as_str)
	}

	pub fn iter(&self) -> Iter<'_, String, Value> {
		self.values.iter()
	}
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Overrides {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self {
			values: iter
				.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		}
	}
}

impl<K: Into<String>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Overrides {
	fn from(pairs: [(K, V); N]) -> Self {
		pairs.into_iter().collect()
	}
}

impl<K: Into<String>, V: Into<Value>> From<Vec<(K, V)>> for Overrides {
	fn from(pairs: Vec<(K, V)>) -> Self {
		pairs.into_iter().collect()
	}
}

impl From<Record> for Overrides {
	fn from(record: Record) -> Self {
		Self {
			values: record.into_inner(),
		}
	}
}
