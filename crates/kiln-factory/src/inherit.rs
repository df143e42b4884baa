//! Trait resolution: composing a factory's attributes with its ancestors'.

use indexmap::IndexMap;

use crate::attribute::AttributeSet;
use crate::builder::Builder;
use crate::error::{FactoryError, FactoryResult};

/// Resolves trait declarations against already registered builders.
///
/// A parent must be registered before its traits, so the builder graph is a
/// DAG by construction and no cycle check is needed.
pub(crate) struct TraitResolver<'a> {
	builders: &'a IndexMap<String, Builder>,
}

impl<'a> TraitResolver<'a> {
	pub(crate) fn new(builders: &'a IndexMap<String, Builder>) -> Self {
		Self { builders }
	}

	/// Looks up the parent of a trait.
	pub(crate) fn parent(&self, parent: Option<&str>) -> FactoryResult<Option<&'a Builder>> {
		match parent {
			None => Ok(None),
			Some(name) => self
				.builders
				.get(name)
				.map(Some)
				.ok_or_else(|| FactoryError::UnknownFactory(name.to_string())),
		}
	}

	/// Merges a block's own declarations over the parent's attribute set.
	///
	/// The parent set is already composed with its own ancestors, so chains
	/// of traits compose ancestor-to-descendant.
	pub(crate) fn compose(parent: Option<&Builder>, own: AttributeSet) -> AttributeSet {
		match parent {
			Some(parent) => parent.attributes().merge(&own),
			None => own,
		}
	}

	/// Names of a builder's ancestors, nearest first.
	pub(crate) fn ancestry(&self, name: &str) -> Vec<&'a str> {
		let mut ancestors = Vec::new();
		let mut current = self.builders.get(name).and_then(Builder::parent);
		while let Some(parent) = current {
			match self.builders.get_key_value(parent) {
				Some((key, builder)) => {
					ancestors.push(key.as_str());
					current = builder.parent();
				}
				None => break,
			}
		}
		ancestors
	}
}
