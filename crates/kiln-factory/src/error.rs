//! Error types for the factory engine.
//!
//! Every error here is a programmer or configuration error. Nothing is
//! retried; the error surfaces directly to the calling test.

use thiserror::Error;

/// Errors raised while defining or building factories.
#[derive(Debug, Error)]
pub enum FactoryError {
	/// A factory with the same name is already registered.
	#[error("Duplicate factory name: {0}")]
	DuplicateName(String),

	/// No factory is registered under the requested name.
	#[error("Factory not found: {0}")]
	UnknownFactory(String),

	/// An attribute is not part of the bound relation's schema.
	#[error("Unknown attribute: {relation}.{attribute}")]
	UnknownAttribute {
		/// Relation the attribute was checked against.
		relation: String,
		/// Offending attribute name.
		attribute: String,
	},

	/// No relation was given and none could be inferred from the factory name.
	#[error("Ambiguous relation: cannot infer a relation for factory {0}")]
	AmbiguousRelation(String),

	/// An explicitly named relation is unknown to the persistence adapter.
	#[error("Relation not found: {0}")]
	UnknownRelation(String),

	/// The persistence adapter rejected a write.
	#[error("Schema violation: {0}")]
	SchemaViolation(#[from] SchemaViolation),

	/// The fake-data provider has no generator for the category/field pair.
	#[error("Faker error: no generator for {category}.{field}")]
	UnknownFakeField {
		/// Generator category (e.g. `name`).
		category: String,
		/// Generator field (e.g. `first_name`).
		field: String,
	},

	/// A lazy attribute computation failed.
	#[error("Attribute error: {attribute}: {message}")]
	Attribute {
		/// Attribute being resolved.
		attribute: String,
		/// Failure description.
		message: String,
	},

	/// A value could not be converted to the requested type.
	#[error("Type error: {0}")]
	Type(String),

	/// The registry was configured incorrectly.
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// JSON conversion failed.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),
}

impl FactoryError {
	/// Shorthand for [`FactoryError::Attribute`].
	pub fn attribute(attribute: impl Into<String>, message: impl Into<String>) -> Self {
		Self::Attribute {
			attribute: attribute.into(),
			message: message.into(),
		}
	}
}

/// Write-time failures reported by a persistence adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
	/// The relation does not exist in the backing store.
	#[error("Relation not found: {0}")]
	UnknownRelation(String),

	/// The record carries a column the relation does not have.
	#[error("Unknown column: {relation}.{column}")]
	UnknownColumn {
		/// Target relation.
		relation: String,
		/// Offending column.
		column: String,
	},

	/// A non-null column without a default received no value.
	#[error("Missing value for non-null column: {relation}.{column}")]
	MissingColumn {
		/// Target relation.
		relation: String,
		/// Column left empty.
		column: String,
	},

	/// The value does not fit the column type.
	#[error("Type mismatch for {relation}.{column}: expected {expected}, got {actual}")]
	TypeMismatch {
		/// Target relation.
		relation: String,
		/// Column being written.
		column: String,
		/// Declared column type.
		expected: String,
		/// Kind of the rejected value.
		actual: String,
	},

	/// A primary key value is already taken.
	#[error("Duplicate key for {relation}.{column}: {value}")]
	DuplicateKey {
		/// Target relation.
		relation: String,
		/// Key column.
		column: String,
		/// Rendered key value.
		value: String,
	},

	/// The storage layer failed for another reason.
	#[error("Storage error: {0}")]
	Storage(String),
}

/// Result type alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;
