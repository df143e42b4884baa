//! The factory registry.
//!
//! A [`Factories`] instance owns every builder defined through it, the
//! persistence adapter used by persisted builds, and the fake-data provider
//! handed to resolutions. Registries are independent: two instances never
//! share builders or counters.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::adapter::{ColumnType, PersistenceAdapter, RelationSchema};
use crate::builder::Builder;
use crate::config::{FactoryConfig, FactorySettings};
use crate::definition::Definition;
use crate::error::{FactoryError, FactoryResult};
use crate::faker::FakeProvider;
use crate::inflection::relation_candidates;
use crate::inherit::TraitResolver;
use crate::record::{Overrides, Record};
use crate::scaffold::FactoryScaffold;
use crate::structs::{FactoryStruct, StructFactory};
use crate::value::Value;

/// Registry of named factories.
///
/// # Example
///
/// ```ignore
/// let mut factories = Factories::configure(|config| {
///     config.adapter(Arc::new(adapter));
/// })?;
///
/// factories.define("user", |f| {
///     f.set("first_name", "Jane");
///     f.sequence("email", |n| format!("jane{}@doe.org", n));
///     f.timestamps();
/// })?;
///
/// let user = factories.build("user")?;
/// let ephemeral = factories.structs().build("user")?;
/// ```
pub struct Factories {
	builders: IndexMap<String, Builder>,
	adapter: Arc<dyn PersistenceAdapter>,
	faker: Arc<dyn FakeProvider>,
	settings: FactorySettings,
	struct_keys: Mutex<HashMap<String, i64>>,
}

impl Factories {
	/// Creates a registry with default settings.
	pub fn new(adapter: Arc<dyn PersistenceAdapter>) -> Self {
		let settings = FactorySettings::default();
		Self::from_parts(adapter, Arc::new(crate::faker::FakerProvider::new()), settings)
	}

	/// Creates a registry from a configure block.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::Configuration`] if the block sets no adapter.
	pub fn configure<F>(configure: F) -> FactoryResult<Self>
	where
		F: FnOnce(&mut FactoryConfig),
	{
		let mut config = FactoryConfig::new();
		configure(&mut config);
		Self::from_config(config)
	}

	pub fn from_config(config: FactoryConfig) -> FactoryResult<Self> {
		let (adapter, faker, settings) = config.into_parts()?;
		Ok(Self::from_parts(adapter, faker, settings))
	}

	fn from_parts(
		adapter: Arc<dyn PersistenceAdapter>,
		faker: Arc<dyn FakeProvider>,
		settings: FactorySettings,
	) -> Self {
		debug!(?settings, "configured factory registry");
		Self {
			builders: IndexMap::new(),
			adapter,
			faker,
			settings,
			struct_keys: Mutex::new(HashMap::new()),
		}
	}

	/// Defines a factory.
	///
	/// The block declares the factory's attributes. A trait (a definition
	/// with a parent) starts from its parent's attributes and binds to the
	/// parent's relation unless one is given explicitly. Otherwise the
	/// relation is looked up under the pluralized name, then the bare name.
	///
	/// # Errors
	///
	/// - [`FactoryError::DuplicateName`] if the name is taken
	/// - [`FactoryError::UnknownFactory`] if the parent is not registered
	/// - [`FactoryError::UnknownRelation`] if an explicit relation is unknown
	/// - [`FactoryError::AmbiguousRelation`] if no relation can be inferred
	/// - [`FactoryError::UnknownAttribute`] if an attribute is not a column
	/// - [`FactoryError::UnknownFakeField`] if a fake generator is unsupported
	pub fn define<F>(&mut self, definition: impl Into<Definition>, block: F) -> FactoryResult<&Builder>
	where
		F: FnOnce(&mut FactoryScaffold),
	{
		let definition = definition.into();
		let name = definition.name().to_string();
		if self.builders.contains_key(&name) {
			return Err(FactoryError::DuplicateName(name));
		}

		let mut scaffold = FactoryScaffold::new();
		block(&mut scaffold);

		let builder = {
			let resolver = TraitResolver::new(&self.builders);
			let parent = resolver.parent(definition.parent())?;
			let schema = self.relation_schema(&definition, parent)?;
			let attributes = TraitResolver::compose(parent, scaffold.into_attributes());
			Builder::new(
				name.clone(),
				definition.parent().map(str::to_string),
				schema,
				attributes,
			)
		};
		self.validate(&builder)?;

		debug!(
			factory = %name,
			relation = builder.relation(),
			parent = ?builder.parent(),
			attributes = builder.attributes().len(),
			"defined factory"
		);

		let builder: &Builder = self.builders.entry(name).or_insert(builder);
		Ok(builder)
	}

	fn relation_schema(
		&self,
		definition: &Definition,
		parent: Option<&Builder>,
	) -> FactoryResult<RelationSchema> {
		if let Some(relation) = definition.explicit_relation() {
			return self
				.adapter
				.schema_for(relation)
				.ok_or_else(|| FactoryError::UnknownRelation(relation.to_string()));
		}

		if let Some(parent) = parent {
			return Ok(parent.schema().clone());
		}

		if self.settings.infer_relations {
			for candidate in relation_candidates(definition.name()) {
				if let Some(schema) = self.adapter.schema_for(&candidate) {
					return Ok(schema);
				}
			}
		}

		Err(FactoryError::AmbiguousRelation(definition.name().to_string()))
	}

	fn validate(&self, builder: &Builder) -> FactoryResult<()> {
		let schema = builder.schema();
		if let Some(attribute) = builder.attributes().names().find(|name| !schema.contains(name)) {
			return Err(FactoryError::UnknownAttribute {
				relation: schema.name.clone(),
				attribute: attribute.to_string(),
			});
		}

		if let Some((category, field)) = builder
			.fake_sources()
			.find(|(category, field)| !self.faker.supports(category, field))
		{
			return Err(FactoryError::UnknownFakeField {
				category: category.to_string(),
				field: field.to_string(),
			});
		}

		Ok(())
	}

	/// Builds and persists a record with the factory's defaults.
	pub fn build(&self, name: &str) -> FactoryResult<Record> {
		self.build_with(name, Overrides::new())
	}

	/// Builds and persists a record with per-call overrides.
	///
	/// Returns the adapter's stored representation, including generated
	/// fields such as auto-increment keys.
	///
	/// Sequences resolved before a failure stay advanced: a build rejected by
	/// a later lazy attribute or by the adapter still consumes its sequence
	/// values.
	///
	/// # Errors
	///
	/// - [`FactoryError::UnknownFactory`] if the name is not registered
	/// - [`FactoryError::UnknownAttribute`] if an override is not a column
	/// - [`FactoryError::SchemaViolation`] if the adapter rejects the record
	pub fn build_with(&self, name: &str, overrides: impl Into<Overrides>) -> FactoryResult<Record> {
		let builder = self.lookup(name)?;
		let record = self.resolve(builder, &overrides.into())?;

		let stored = self.adapter.validate_and_write(builder.relation(), record)?;
		debug!(factory = name, relation = builder.relation(), "persisted record");
		Ok(stored)
	}

	/// Builds and persists `count` records with the factory's defaults.
	pub fn build_list(&self, name: &str, count: usize) -> FactoryResult<Vec<Record>> {
		(0..count).map(|_| self.build(name)).collect()
	}

	/// Entry points of the struct strategy.
	///
	/// Structs go through the same resolution as persisted builds, sequences
	/// included, but never reach the adapter's write path.
	pub fn structs(&self) -> StructFactory<'_> {
		StructFactory::new(self)
	}

	pub(crate) fn build_struct(&self, name: &str, overrides: Overrides) -> FactoryResult<FactoryStruct> {
		let builder = self.lookup(name)?;
		let record = self.resolve(builder, &overrides)?;
		let struct_type = builder.struct_type().clone();

		let record = match struct_type.synthesized_key_type() {
			Some((key, column_type)) if !record.contains(key) => {
				let mut keyed = Record::new();
				keyed.insert(key, self.next_struct_key(builder.relation(), column_type));
				keyed.extend(record);
				keyed
			}
			_ => record,
		};

		debug!(factory = name, struct_type = struct_type.name(), "built struct");
		Ok(FactoryStruct::new(struct_type, record))
	}

	fn lookup(&self, name: &str) -> FactoryResult<&Builder> {
		self.builders
			.get(name)
			.ok_or_else(|| FactoryError::UnknownFactory(name.to_string()))
	}

	fn resolve(&self, builder: &Builder, overrides: &Overrides) -> FactoryResult<Record> {
		if self.settings.validate_overrides {
			let schema = builder.schema();
			if let Some(attribute) = overrides.names().find(|name| !schema.contains(name)) {
				return Err(FactoryError::UnknownAttribute {
					relation: schema.name.clone(),
					attribute: attribute.to_string(),
				});
			}
		}
		builder.resolve(overrides, self.faker.as_ref())
	}

	fn next_struct_key(&self, relation: &str, column_type: ColumnType) -> Value {
		if column_type == ColumnType::Uuid {
			return Value::Uuid(Uuid::new_v4());
		}

		let mut keys = self.struct_keys.lock();
		let counter = keys
			.entry(relation.to_string())
			.or_insert(self.settings.struct_id_start);
		let key = *counter;
		*counter += 1;

		match column_type {
			ColumnType::String => Value::String(key.to_string()),
			_ => Value::Int(key),
		}
	}

	/// Rewinds every sequence and struct key counter of this registry.
	pub fn reset_sequences(&self) {
		for builder in self.builders.values() {
			builder.reset_sequences();
		}
		self.struct_keys.lock().clear();
		debug!(factories = self.builders.len(), "reset sequences");
	}

	pub fn builder(&self, name: &str) -> Option<&Builder> {
		self.builders.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.builders.contains_key(name)
	}

	/// Names of the factories a trait derives from, nearest first.
	pub fn ancestors(&self, name: &str) -> Vec<&str> {
		TraitResolver::new(&self.builders).ancestry(name)
	}

	/// Factory names in definition order.
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.builders.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.builders.len()
	}

	pub fn is_empty(&self) -> bool {
		self.builders.is_empty()
	}

	pub fn adapter(&self) -> &Arc<dyn PersistenceAdapter> {
		&self.adapter
	}

	pub fn faker(&self) -> &dyn FakeProvider {
		self.faker.as_ref()
	}

	pub fn settings(&self) -> &FactorySettings {
		&self.settings
	}
}

impl fmt::Debug for Factories {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Factories")
			.field("builders", &self.builders.keys().collect::<Vec<_>>())
			.field("settings", &self.settings)
			.finish_non_exhaustive()
	}
}
