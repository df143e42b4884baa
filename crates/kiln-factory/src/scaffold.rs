//! The declaration surface handed to `define` blocks.

use chrono::{Duration, Utc};

use crate::attribute::{AttributeSet, AttributeSource};
use crate::context::ResolveContext;
use crate::error::FactoryResult;
use crate::value::Value;

/// Collects attribute declarations for one factory.
///
/// Every declaration goes through [`set_source`](Self::set_source); the other
/// methods are shorthands for the fixed DSL verbs.
///
/// ```ignore
/// factories.define("user", |f| {
///     f.set("first_name", "Jane");
///     f.fake("last_name", "name", "last_name");
///     f.sequence("email", |n| format!("jane{}@doe.org", n));
///     f.timestamps();
/// })?;
/// ```
#[derive(Debug, Default)]
pub struct FactoryScaffold {
	attributes: AttributeSet,
}

impl FactoryScaffold {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Declares an attribute with an explicit source.
	pub fn set_source(&mut self, name: impl Into<String>, source: AttributeSource) -> &mut Self {
		self.attributes.insert(name, source);
		self
	}

	/// Declares an attribute with a fixed value.
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
		self.set_source(name, AttributeSource::fixed(value))
	}

	/// Declares an attribute computed on every build.
	///
	/// The computation may read siblings declared before it through the
	/// context.
	pub fn lazy<F, V>(&mut self, name: impl Into<String>, compute: F) -> &mut Self
	where
		F: Fn(&ResolveContext<'_>) -> V + Send + Sync + 'static,
		V: Into<Value>,
	{
		self.set_source(name, AttributeSource::lazy(compute))
	}

	/// Declares an attribute computed on every build by a fallible computation.
	pub fn try_lazy<F, V>(&mut self, name: impl Into<String>, compute: F) -> &mut Self
	where
		F: Fn(&ResolveContext<'_>) -> FactoryResult<V> + Send + Sync + 'static,
		V: Into<Value>,
	{
		self.set_source(name, AttributeSource::try_lazy(compute))
	}

	/// Declares an attribute drawn from the fake-data provider.
	pub fn fake(
		&mut self,
		name: impl Into<String>,
		category: impl Into<String>,
		field: impl Into<String>,
	) -> &mut Self {
		self.set_source(name, AttributeSource::fake(category, field))
	}

	/// Declares a sequenced attribute.
	///
	/// The generator receives 1 on the first build, 2 on the second, and so
	/// on. The counter belongs to this declaration. It counts resolutions,
	/// not successful builds: a build that fails after this attribute has
	/// resolved still uses up its value.
	pub fn sequence<F, V>(&mut self, name: impl Into<String>, generator: F) -> &mut Self
	where
		F: Fn(u64) -> V + Send + Sync + 'static,
		V: Into<Value>,
	{
		let name = name.into();
		let source = AttributeSource::sequence(name.clone(), generator);
		self.set_source(name, source)
	}

	/// Declares `created_at` and `updated_at`, each read from the clock at
	/// resolution time.
	///
	/// `updated_at` always differs from `created_at`: if the clock has not
	/// advanced since the first read it lands one microsecond later.
	pub fn timestamps(&mut self) -> &mut Self {
		self.lazy("created_at", |_| Utc::now());
		self.lazy("updated_at", |ctx| {
			let now = Utc::now();
			match ctx.get("created_at").and_then(Value::as_timestamp) {
				Some(created) if created >= now => created + Duration::microseconds(1),
				_ => now,
			}
		})
	}

	/// Names declared so far, in order.
	pub fn declared(&self) -> impl Iterator<Item = &str> {
		self.attributes.names()
	}

	pub(crate) fn into_attributes(self) -> AttributeSet {
		self.attributes
	}
}
