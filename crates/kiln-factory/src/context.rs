//! Context handed to lazy attribute computations.

use crate::error::FactoryResult;
use crate::faker::FakeProvider;
use crate::record::Record;
use crate::value::Value;

/// Read-only view of a resolution in progress.
///
/// Lazy attributes see the siblings resolved before them, never the ones
/// declared after them. Fake data is reached through the injected provider.
///
/// ```ignore
/// f.lazy("email", |ctx| {
///     let first = ctx.get_str("first_name").unwrap_or("user");
///     format!("{}@example.com", first.to_lowercase())
/// });
/// f.try_lazy("last_name", |ctx| ctx.fake("name", "last_name"));
/// ```
pub struct ResolveContext<'a> {
	factory: &'a str,
	relation: &'a str,
	resolved: &'a Record,
	faker: &'a dyn FakeProvider,
}

impl<'a> ResolveContext<'a> {
	pub fn new(
		factory: &'a str,
		relation: &'a str,
		resolved: &'a Record,
		faker: &'a dyn FakeProvider,
	) -> Self {
		Self {
			factory,
			relation,
			resolved,
			faker,
		}
	}

	/// Name of the factory being built.
	pub fn factory(&self) -> &str {
		self.factory
	}

	/// Relation the factory is bound to.
	pub fn relation(&self) -> &str {
		self.relation
	}

	/// Value of a previously resolved sibling attribute.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.resolved.get(name)
	}

	pub fn get_str(&self, name: &str) -> Option<&str> {
		self.resolved.get_str(name)
	}

	/// Everything resolved so far.
	pub fn resolved(&self) -> &Record {
		self.resolved
	}

	/// Draws a value from the fake-data provider.
	pub fn fake(&self, category: &str, field: &str) -> FactoryResult<Value> {
		self.faker.generate(category, field)
	}

	/// Like [`fake`](Self::fake), but requires a string value.
	pub fn fake_string(&self, category: &str, field: &str) -> FactoryResult<String> {
		String::try_from(self.fake(category, field)?)
	}

	pub fn faker(&self) -> &dyn FakeProvider {
		self.faker
	}
}
