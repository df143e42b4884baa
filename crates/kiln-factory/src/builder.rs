//! Builders: named attribute sets bound to a relation.

use tracing::trace;

use crate::adapter::RelationSchema;
use crate::attribute::{AttributeSet, AttributeSource};
use crate::context::ResolveContext;
use crate::error::FactoryResult;
use crate::faker::FakeProvider;
use crate::record::{Overrides, Record};
use crate::structs::StructType;

/// A registered factory.
///
/// Builders are immutable once defined. Overrides passed to a build call
/// only affect that call's record.
#[derive(Debug)]
pub struct Builder {
	name: String,
	parent: Option<String>,
	schema: RelationSchema,
	attributes: AttributeSet,
	struct_type: StructType,
}

impl Builder {
	pub(crate) fn new(
		name: String,
		parent: Option<String>,
		schema: RelationSchema,
		attributes: AttributeSet,
	) -> Self {
		let struct_type = StructType::for_builder(&name, &schema, &attributes);
		Self {
			name,
			parent,
			schema,
			attributes,
			struct_type,
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Name of the factory this one is a trait of.
	pub fn parent(&self) -> Option<&str> {
		self.parent.as_deref()
	}

	pub fn relation(&self) -> &str {
		&self.schema.name
	}

	pub fn schema(&self) -> &RelationSchema {
		&self.schema
	}

	/// The merged attribute set, own declarations over inherited ones.
	pub fn attributes(&self) -> &AttributeSet {
		&self.attributes
	}

	pub fn struct_type(&self) -> &StructType {
		&self.struct_type
	}

	/// Resolves every attribute into a fresh record.
	///
	/// Attributes resolve in declaration order. An overridden attribute takes
	/// the override verbatim at its declared position and its source is not
	/// evaluated, so an overridden sequence does not tick. Overrides naming
	/// undeclared attributes are appended at the end.
	pub fn resolve(&self, overrides: &Overrides, faker: &dyn FakeProvider) -> FactoryResult<Record> {
		let mut record = Record::new();

		for (name, source) in self.attributes.iter() {
			let value = match overrides.get(name) {
				Some(value) => value.clone(),
				None => {
					let ctx = ResolveContext::new(&self.name, self.relation(), &record, faker);
					source.resolve(&ctx)?
				}
			};
			trace!(factory = %self.name, attribute = name, kind = value.kind(), "resolved attribute");
			record.insert(name, value);
		}

		for (name, value) in overrides.iter() {
			if !record.contains(name) {
				record.insert(name.clone(), value.clone());
			}
		}

		Ok(record)
	}

	/// Rewinds every sequence this builder resolves through.
	///
	/// Inherited sequences are shared with the parent, so the parent is
	/// rewound as well.
	pub(crate) fn reset_sequences(&self) {
		for (_, source) in self.attributes.iter() {
			if let Some(sequence) = source.as_sequence() {
				sequence.reset();
			}
		}
	}

	pub(crate) fn fake_sources(&self) -> impl Iterator<Item = (&str, &str)> {
		self.attributes.iter().filter_map(|(_, source)| match source {
			AttributeSource::Fake { category, field } => Some((category.as_str(), field.as_str())),
			_ => None,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::adapter::{ColumnSchema, ColumnType};
	use crate::faker::FakerProvider;
	use crate::value::Value;
	use rstest::{fixture, rstest};

	#[fixture]
	fn users() -> RelationSchema {
		RelationSchema::new("users")
			.column(ColumnSchema::primary_key("id"))
			.column(ColumnSchema::new("first_name", ColumnType::String))
			.column(ColumnSchema::new("email", ColumnType::String))
	}

	fn builder(schema: RelationSchema) -> Builder {
		let mut attributes = AttributeSet::new();
		attributes.insert("first_name", AttributeSource::fixed("Jane"));
		attributes.insert(
			"email",
			AttributeSource::lazy(|ctx| {
				let first = ctx.get_str("first_name").unwrap_or("nobody");
				format!("{}@doe.org", first.to_lowercase())
			}),
		);
		Builder::new("user".to_string(), None, schema, attributes)
	}

	#[rstest]
	fn test_lazy_reads_earlier_sibling(users: RelationSchema) {
		let builder = builder(users);
		let record = builder
			.resolve(&Overrides::new(), &FakerProvider::new())
			.unwrap();

		assert_eq!(record.get_str("email"), Some("jane@doe.org"));
	}

	#[rstest]
	fn test_override_is_visible_to_later_lazy(users: RelationSchema) {
		let builder = builder(users);
		let overrides = Overrides::from([("first_name", "John")]);
		let record = builder.resolve(&overrides, &FakerProvider::new()).unwrap();

		assert_eq!(record.get_str("first_name"), Some("John"));
		assert_eq!(record.get_str("email"), Some("john@doe.org"));
	}

	#[rstest]
	fn test_lazy_cannot_see_later_attributes(users: RelationSchema) {
		let mut attributes = AttributeSet::new();
		attributes.insert(
			"first_name",
			AttributeSource::lazy(|ctx| ctx.get("email").is_some()),
		);
		attributes.insert("email", AttributeSource::fixed("jane@doe.org"));
		let builder = Builder::new("user".to_string(), None, users, attributes);

		let record = builder
			.resolve(&Overrides::new(), &FakerProvider::new())
			.unwrap();
		assert_eq!(record.get("first_name"), Some(&Value::Bool(false)));
	}

	#[rstest]
	fn test_undeclared_override_is_appended(users: RelationSchema) {
		let builder = builder(users);
		let overrides = Overrides::from([("id", 99)]);
		let record = builder.resolve(&overrides, &FakerProvider::new()).unwrap();

		let names: Vec<&str> = record.names().collect();
		assert_eq!(names, vec!["first_name", "email", "id"]);
	}

	#[rstest]
	fn test_overridden_sequence_does_not_tick(users: RelationSchema) {
		let mut attributes = AttributeSet::new();
		attributes.insert(
			"email",
			AttributeSource::sequence("email", |n| format!("user{}@x.com", n)),
		);
		let builder = Builder::new("user".to_string(), None, users, attributes);
		let faker = FakerProvider::new();

		let first = builder.resolve(&Overrides::new(), &faker).unwrap();
		let second = builder
			.resolve(&Overrides::from([("email", "x@y.com")]), &faker)
			.unwrap();
		let third = builder.resolve(&Overrides::new(), &faker).unwrap();

		assert_eq!(first.get_str("email"), Some("user1@x.com"));
		assert_eq!(second.get_str("email"), Some("x@y.com"));
		assert_eq!(third.get_str("email"), Some("user2@x.com"));
	}
}
