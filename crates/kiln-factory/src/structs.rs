//! The struct build strategy: immutable, in-memory value objects.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::adapter::{ColumnType, RelationSchema};
use crate::attribute::AttributeSet;
use crate::error::{FactoryError, FactoryResult};
use crate::inflection::to_pascal_case;
use crate::record::{Overrides, Record};
use crate::registry::Factories;
use crate::value::Value;

struct StructTypeInner {
	name: String,
	factory: String,
	relation: String,
	primary_key: Option<(String, ColumnType)>,
	attributes: Vec<String>,
}

/// The type of the structs produced by one builder.
///
/// Every struct built from the same factory carries a handle to the same
/// type; equality is identity, so two factories with identical attributes
/// still have distinct types.
#[derive(Clone)]
pub struct StructType {
	inner: Arc<StructTypeInner>,
}

impl StructType {
	pub(crate) fn for_builder(factory: &str, schema: &RelationSchema, attributes: &AttributeSet) -> Self {
		// Only a key no attribute populates gets synthesized.
		let primary_key = schema
			.primary_key()
			.filter(|key| !attributes.contains(&key.name))
			.map(|key| (key.name.clone(), key.column_type));

		let attributes = primary_key
			.iter()
			.map(|(name, _)| name.clone())
			.chain(attributes.names().map(str::to_string))
			.collect();

		Self {
			inner: Arc::new(StructTypeInner {
				name: to_pascal_case(factory),
				factory: factory.to_string(),
				relation: schema.name.clone(),
				primary_key,
				attributes,
			}),
		}
	}

	/// PascalCase type name derived from the factory name.
	pub fn name(&self) -> &str {
		&self.inner.name
	}

	pub fn factory(&self) -> &str {
		&self.inner.factory
	}

	pub fn relation(&self) -> &str {
		&self.inner.relation
	}

	/// Primary key synthesized for structs of this type, if any.
	pub fn synthesized_key(&self) -> Option<&str> {
		self.inner.primary_key.as_ref().map(|(name, _)| name.as_str())
	}

	pub(crate) fn synthesized_key_type(&self) -> Option<(&str, ColumnType)> {
		self.inner
			.primary_key
			.as_ref()
			.map(|(name, column_type)| (name.as_str(), *column_type))
	}

	/// Attribute names, synthesized key first.
	pub fn attributes(&self) -> &[String] {
		&self.inner.attributes
	}
}

impl PartialEq for StructType {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for StructType {}

impl fmt::Debug for StructType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("StructType")
			.field("name", &self.inner.name)
			.field("relation", &self.inner.relation)
			.finish()
	}
}

/// An immutable value object produced by the struct strategy.
///
/// Serializes as the plain attribute object.
#[derive(Debug, Clone)]
pub struct FactoryStruct {
	struct_type: StructType,
	record: Record,
}

impl Serialize for FactoryStruct {
	fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.record.serialize(serializer)
	}
}

impl FactoryStruct {
	pub(crate) fn new(struct_type: StructType, record: Record) -> Self {
		Self {
			struct_type,
			record,
		}
	}

	pub fn struct_type(&self) -> &StructType {
		&self.struct_type
	}

	/// Shorthand for `self.struct_type().name()`.
	pub fn type_name(&self) -> &str {
		self.struct_type.name()
	}

	pub fn get(&self, name: &str) -> Option<&Value> {
		self.record.get(name)
	}

	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.record.get_str(name)
	}

	pub fn get_as<T>(&self, name: &str) -> FactoryResult<T>
	where
		T: TryFrom<Value, Error = FactoryError>,
	{
		self.record.get_as(name)
	}

	/// Value of the `id` attribute.
	pub fn id(&self) -> Option<&Value> {
		self.record.get("id")
	}

	pub fn record(&self) -> &Record {
		&self.record
	}

	pub fn into_record(self) -> Record {
		self.record
	}

	/// Deserializes the struct into a user-defined type.
	pub fn deserialize<T: DeserializeOwned>(&self) -> FactoryResult<T> {
		self.record.deserialize()
	}
}

impl Index<&str> for FactoryStruct {
	type Output = Value;

	fn index(&self, name: &str) -> &Value {
		&self.record[name]
	}
}

/// Struct-strategy entry points of a registry, see [`Factories::structs`].
///
/// Nothing built through this handle reaches the persistence adapter.
#[derive(Debug, Clone, Copy)]
pub struct StructFactory<'a> {
	factories: &'a Factories,
}

impl<'a> StructFactory<'a> {
	pub(crate) fn new(factories: &'a Factories) -> Self {
		Self { factories }
	}

	/// Builds a struct with the factory's defaults.
	pub fn build(&self, name: &str) -> FactoryResult<FactoryStruct> {
		self.factories.build_struct(name, Overrides::new())
	}

	/// Builds a struct with per-call overrides.
	///
	/// A failing lazy attribute aborts the build, but sequences resolved
	/// before it stay advanced.
	pub fn build_with(
		&self,
		name: &str,
		overrides: impl Into<Overrides>,
	) -> FactoryResult<FactoryStruct> {
		self.factories.build_struct(name, overrides.into())
	}

	/// Builds `count` structs with the factory's defaults.
	pub fn build_list(&self, name: &str, count: usize) -> FactoryResult<Vec<FactoryStruct>> {
		(0..count)
			.map(|_| self.factories.build_struct(name, Overrides::new()))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::adapter::ColumnSchema;
	use crate::attribute::AttributeSource;
	use rstest::rstest;

	fn schema() -> RelationSchema {
		RelationSchema::new("users")
			.column(ColumnSchema::primary_key("id"))
			.column(ColumnSchema::new("email", ColumnType::String))
	}

	#[rstest]
	fn test_struct_type_identity() {
		let mut attributes = AttributeSet::new();
		attributes.insert("email", AttributeSource::fixed("a@x.com"));

		let a = StructType::for_builder("user", &schema(), &attributes);
		let b = StructType::for_builder("user", &schema(), &attributes);

		assert_eq!(a, a.clone());
		assert_ne!(a, b);
		assert_eq!(a.name(), "User");
	}

	#[rstest]
	fn test_synthesized_key_when_not_declared() {
		let mut attributes = AttributeSet::new();
		attributes.insert("email", AttributeSource::fixed("a@x.com"));
		let ty = StructType::for_builder("admin_user", &schema(), &attributes);

		assert_eq!(ty.name(), "AdminUser");
		assert_eq!(ty.synthesized_key(), Some("id"));
		assert_eq!(ty.attributes(), &["id".to_string(), "email".to_string()]);
	}

	#[rstest]
	fn test_no_synthesized_key_when_declared() {
		let mut attributes = AttributeSet::new();
		attributes.insert("id", AttributeSource::sequence("id", |n| n));
		let ty = StructType::for_builder("user", &schema(), &attributes);

		assert_eq!(ty.synthesized_key(), None);
	}

	#[rstest]
	fn test_struct_serializes_as_object() {
		let ty = StructType::for_builder("user", &schema(), &AttributeSet::new());
		let mut record = Record::new();
		record.insert("id", 1);
		record.insert("email", "a@x.com");
		let user = FactoryStruct::new(ty, record);

		let json = serde_json::to_value(&user).unwrap();
		assert_eq!(json, serde_json::json!({"id": 1, "email": "a@x.com"}));
		assert_eq!(user["email"], Value::from("a@x.com"));
		assert_eq!(user.id(), Some(&Value::Int(1)));
	}
}
