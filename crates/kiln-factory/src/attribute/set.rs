//! Ordered attribute sets and their merge rule.

use indexmap::IndexMap;

use super::source::AttributeSource;

/// An ordered mapping from attribute name to [`AttributeSource`].
///
/// Declaration order is resolution order.
#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
	sources: IndexMap<String, AttributeSource>,
}

impl AttributeSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Declares an attribute.
	///
	/// Redeclaring a name replaces its source but keeps its original position.
	pub fn insert(&mut self, name: impl Into<String>, source: AttributeSource) {
		self.sources.insert(name.into(), source);
	}

	pub fn get(&self, name: &str) -> Option<&AttributeSource> {
		self.sources.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.sources.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.sources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.sources.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeSource)> {
		self.sources.iter().map(|(name, source)| (name.as_str(), source))
	}

	/// Merges `overrides` over `self`.
	///
	/// The result holds every base entry in base order, followed by the
	/// override-only entries in override order. Names present in both keep the
	/// base position but take the override's source.
	pub fn merge(&self, overrides: &AttributeSet) -> AttributeSet {
		let mut merged = self.clone();
		for (name, source) in &overrides.sources {
			merged.sources.insert(name.clone(), source.clone());
		}
		merged
	}
}
