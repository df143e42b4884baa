//! Attribute sources: the strategy that produces one attribute's value.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::context::ResolveContext;
use crate::error::FactoryResult;
use crate::value::Value;

/// Computation backing a lazy attribute.
pub type LazyFn = Arc<dyn Fn(&ResolveContext<'_>) -> FactoryResult<Value> + Send + Sync>;

/// Generator backing a sequence; receives the 1-based counter value.
pub type SequenceFn = Arc<dyn Fn(u64) -> Value + Send + Sync>;

/// How a single attribute gets its value.
///
/// Cloning a source is cheap and shares state: a cloned [`AttributeSource::Sequence`]
/// keeps ticking the same counter. This is what lets a trait inherit a
/// sequence from its parent without resetting it.
#[derive(Clone)]
pub enum AttributeSource {
	/// A fixed value reused verbatim.
	Static(Value),
	/// A computation invoked on every resolution.
	Lazy(LazyFn),
	/// A counter-fed generator.
	Sequence(Arc<Sequence>),
	/// A value drawn from the fake-data provider.
	Fake {
		/// Generator category (e.g. `name`).
		category: String,
		/// Generator field (e.g. `first_name`).
		field: String,
	},
}

impl AttributeSource {
	/// Creates a static source.
	pub fn fixed(value: impl Into<Value>) -> Self {
		Self::Static(value.into())
	}

	/// Creates a lazy source from an infallible computation.
	pub fn lazy<F, V>(compute: F) -> Self
	where
		F: Fn(&ResolveContext<'_>) -> V + Send + Sync + 'static,
		V: Into<Value>,
	{
		Self::Lazy(Arc::new(move |ctx: &ResolveContext<'_>| Ok(compute(ctx).into())))
	}

	/// Creates a lazy source from a fallible computation.
	pub fn try_lazy<F, V>(compute: F) -> Self
	where
		F: Fn(&ResolveContext<'_>) -> FactoryResult<V> + Send + Sync + 'static,
		V: Into<Value>,
	{
		Self::Lazy(Arc::new(move |ctx: &ResolveContext<'_>| compute(ctx).map(Into::into)))
	}

	/// Creates a sequence source with a fresh counter.
	pub fn sequence<F, V>(name: impl Into<String>, generator: F) -> Self
	where
		F: Fn(u64) -> V + Send + Sync + 'static,
		V: Into<Value>,
	{
		Self::Sequence(Arc::new(Sequence::new(name, move |n| generator(n).into())))
	}

	/// Creates a fake-data source.
	pub fn fake(category: impl Into<String>, field: impl Into<String>) -> Self {
		Self::Fake {
			category: category.into(),
			field: field.into(),
		}
	}

	/// Produces a value for this source.
	///
	/// Sequences tick on every call.
	pub fn resolve(&self, ctx: &ResolveContext<'_>) -> FactoryResult<Value> {
		match self {
			AttributeSource::Static(value) => Ok(value.clone()),
			AttributeSource::Lazy(compute) => compute(ctx),
			AttributeSource::Sequence(sequence) => Ok(sequence.next_value()),
			AttributeSource::Fake { category, field } => ctx.fake(category, field),
		}
	}

	/// Returns true for sources evaluated anew on every resolution.
	pub fn is_lazy(&self) -> bool {
		matches!(
			self,
			AttributeSource::Lazy(_) | AttributeSource::Fake { .. }
		)
	}

	pub fn as_sequence(&self) -> Option<&Arc<Sequence>> {
		match self {
			AttributeSource::Sequence(sequence) => Some(sequence),
			_ => None,
		}
	}
}

impl fmt::Debug for AttributeSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			AttributeSource::Static(value) => f.debug_tuple("Static").field(value).finish(),
			AttributeSource::Lazy(_) => f.write_str("Lazy(..)"),
			AttributeSource::Sequence(sequence) => f.debug_tuple("Sequence").field(sequence).finish(),
			AttributeSource::Fake { category, field } => f
				.debug_struct("Fake")
				.field("category", category)
				.field("field", field)
				.finish(),
		}
	}
}

/// A monotonically increasing counter feeding a value generator.
///
/// The counter belongs to the declaration that created it. It starts at 0, so
/// the first generated value receives `n = 1`.
pub struct Sequence {
	name: String,
	counter: AtomicU64,
	generator: SequenceFn,
}

impl Sequence {
	/// Creates a sequence whose counter has not been used yet.
	pub fn new<F>(name: impl Into<String>, generator: F) -> Self
	where
		F: Fn(u64) -> Value + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			counter: AtomicU64::new(0),
			generator: Arc::new(generator),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	/// Increments the counter and generates the value for the new count.
	pub fn next_value(&self) -> Value {
		let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
		(self.generator)(n)
	}

	/// Number of values generated so far.
	pub fn current(&self) -> u64 {
		self.counter.load(Ordering::SeqCst)
	}

	/// Rewinds the counter so the next value is generated for `n = 1`.
	pub fn reset(&self) {
		self.counter.store(0, Ordering::SeqCst);
	}
}

impl fmt::Debug for Sequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Sequence")
			.field("name", &self.name)
			.field("current", &self.current())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::faker::FakeProvider;
	use crate::record::Record;
	use rstest::rstest;

	struct StubFaker;

	impl FakeProvider for StubFaker {
		fn generate(&self, category: &str, field: &str) -> FactoryResult<Value> {
			Ok(Value::String(format!("{}:{}", category, field)))
		}
	}

	fn resolve(source: &AttributeSource) -> Value {
		let record = Record::new();
		let ctx = ResolveContext::new("user", "users", &record, &StubFaker);
		source.resolve(&ctx).unwrap()
	}

	#[rstest]
	fn test_static_source_reuses_value() {
		let source = AttributeSource::fixed("Jane");
		assert_eq!(resolve(&source), Value::from("Jane"));
		assert_eq!(resolve(&source), Value::from("Jane"));
		assert!(!source.is_lazy());
	}

	#[rstest]
	fn test_lazy_source_runs_each_time() {
		let calls = Arc::new(AtomicU64::new(0));
		let counted = calls.clone();
		let source = AttributeSource::lazy(move |_| counted.fetch_add(1, Ordering::SeqCst) + 1);

		assert_eq!(resolve(&source), Value::Int(1));
		assert_eq!(resolve(&source), Value::Int(2));
		assert!(source.is_lazy());
	}

	#[rstest]
	fn test_sequence_starts_at_one() {
		let source = AttributeSource::sequence("email", |n| format!("janjiss{}@gmail.com", n));

		assert_eq!(resolve(&source), Value::from("janjiss1@gmail.com"));
		assert_eq!(resolve(&source), Value::from("janjiss2@gmail.com"));
		assert_eq!(source.as_sequence().unwrap().current(), 2);
	}

	#[rstest]
	fn test_cloned_sequence_shares_counter() {
		let source = AttributeSource::sequence("code", |n| n);
		let inherited = source.clone();

		assert_eq!(resolve(&source), Value::Int(1));
		assert_eq!(resolve(&inherited), Value::Int(2));
	}

	#[rstest]
	fn test_sequence_reset() {
		let sequence = Sequence::new("code", |n| Value::from(n));
		sequence.next_value();
		sequence.next_value();
		sequence.reset();

		assert_eq!(sequence.current(), 0);
		assert_eq!(sequence.next_value(), Value::Int(1));
	}

	#[rstest]
	fn test_fake_source_delegates_to_provider() {
		let source = AttributeSource::fake("name", "first_name");
		assert_eq!(resolve(&source), Value::from("name:first_name"));
		assert!(source.is_lazy());
	}
}
