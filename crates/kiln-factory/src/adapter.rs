//! Persistence adapter interface and relation schema metadata.
//!
//! The engine never talks to storage directly. It asks an adapter for a
//! relation's schema when a factory is defined, and hands resolved records to
//! the adapter when a persisted build is requested.

use serde::{Deserialize, Serialize};

use crate::error::SchemaViolation;
use crate::record::Record;
use crate::value::Value;

/// Backing data-access layer used by persisted builds.
pub trait PersistenceAdapter: Send + Sync {
	/// Returns the schema of a relation, or `None` if the relation is unknown.
	fn schema_for(&self, relation: &str) -> Option<RelationSchema>;

	/// Validates a resolved record against the relation and stores it.
	///
	/// Returns the canonical stored representation, including any
	/// adapter-generated fields such as auto-increment keys.
	fn validate_and_write(&self, relation: &str, record: Record)
	-> Result<Record, SchemaViolation>;

	/// Returns true if the adapter knows the relation.
	fn has_relation(&self, relation: &str) -> bool {
		self.schema_for(relation).is_some()
	}
}

/// Storage type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
	Integer,
	Float,
	Boolean,
	String,
	Timestamp,
	Uuid,
	Json,
}

impl ColumnType {
	/// Returns true if a non-null value can be stored in a column of this type.
	pub fn accepts(&self, value: &Value) -> bool {
		match (self, value) {
			(_, Value::Null) => true,
			(ColumnType::Json, _) => true,
			(ColumnType::Integer, Value::Int(_)) => true,
			(ColumnType::Float, Value::Float(_) | Value::Int(_)) => true,
			(ColumnType::Boolean, Value::Bool(_)) => true,
			(ColumnType::String, Value::String(_)) => true,
			(ColumnType::Timestamp, Value::Timestamp(_)) => true,
			(ColumnType::Uuid, Value::Uuid(_) | Value::String(_)) => true,
			_ => false,
		}
	}
}

impl std::fmt::Display for ColumnType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			ColumnType::Integer => "integer",
			ColumnType::Float => "float",
			ColumnType::Boolean => "boolean",
			ColumnType::String => "string",
			ColumnType::Timestamp => "timestamp",
			ColumnType::Uuid => "uuid",
			ColumnType::Json => "json",
		};
		f.write_str(name)
	}
}

/// Column metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
	/// Column name
	pub name: String,
	/// Column type
	pub column_type: ColumnType,
	/// Whether the column accepts NULL
	pub nullable: bool,
	/// Whether the column is (part of) the primary key
	pub primary_key: bool,
	/// Whether the store generates the value on insert
	pub auto_increment: bool,
	/// Whether the store fills in a default when the value is omitted
	pub has_default: bool,
}

impl ColumnSchema {
	/// Creates a non-null column.
	pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
		Self {
			name: name.into(),
			column_type,
			nullable: false,
			primary_key: false,
			auto_increment: false,
			has_default: false,
		}
	}

	/// Creates an auto-incrementing integer primary key.
	pub fn primary_key(name: impl Into<String>) -> Self {
		Self {
			primary_key: true,
			auto_increment: true,
			..Self::new(name, ColumnType::Integer)
		}
	}

	pub fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}

	/// Marks the column as filled by the store when omitted.
	///
	/// Adapters that cannot compute the default leave a non-null column out
	/// of the stored record instead of writing a null.
	pub fn with_default(mut self) -> Self {
		self.has_default = true;
		self
	}

	/// Returns true if a write may omit this column.
	pub fn is_optional(&self) -> bool {
		self.nullable || self.has_default || self.auto_increment
	}
}

/// Schema of a relation as reported by a persistence adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationSchema {
	/// Relation name
	pub name: String,
	/// Columns in declaration order
	pub columns: Vec<ColumnSchema>,
}

impl RelationSchema {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			columns: Vec::new(),
		}
	}

	/// Adds a column.
	///
	/// ```
	/// use kiln_factory::{ColumnSchema, ColumnType, RelationSchema};
	///
	/// let users = RelationSchema::new("users")
	///     .column(ColumnSchema::primary_key("id"))
	///     .column(ColumnSchema::new("email", ColumnType::String));
	///
	/// assert!(users.contains("email"));
	/// assert_eq!(users.primary_key().map(|c| c.name.as_str()), Some("id"));
	/// ```
	pub fn column(mut self, column: ColumnSchema) -> Self {
		self.columns.push(column);
		self
	}

	pub fn get(&self, name: &str) -> Option<&ColumnSchema> {
		self.columns.iter().find(|c| c.name == name)
	}

	/// Returns true if the relation has a column with this name.
	pub fn contains(&self, name: &str) -> bool {
		self.get(name).is_some()
	}

	/// Column names in declaration order.
	pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
		self.columns.iter().map(|c| c.name.as_str())
	}

	/// The single primary key column, if the relation has exactly one.
	pub fn primary_key(&self) -> Option<&ColumnSchema> {
		let mut keys = self.columns.iter().filter(|c| c.primary_key);
		match (keys.next(), keys.next()) {
			(Some(key), None) => Some(key),
			_ => None,
		}
	}
}
