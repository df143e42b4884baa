//! In-memory persistence adapter.

use indexmap::IndexMap;
use kiln_factory::{
	ColumnType, PersistenceAdapter, Record, RelationSchema, SchemaViolation, Value,
};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{AdapterError, AdapterResult};
use crate::validate::check_record;

struct Table {
	schema: RelationSchema,
	rows: Vec<Record>,
	next_id: i64,
}

impl Table {
	fn new(schema: RelationSchema) -> Self {
		Self {
			schema,
			rows: Vec::new(),
			next_id: 1,
		}
	}

	fn insert(&mut self, record: Record) -> Result<Record, SchemaViolation> {
		check_record(&self.schema, &record)?;

		let mut stored = Record::new();
		for column in &self.schema.columns {
			let value = match record.get(&column.name) {
				Some(value) if !value.is_null() => value.clone(),
				_ if column.auto_increment => Self::generate_key(&mut self.next_id, column.column_type),
				_ if column.has_default && !column.nullable => continue,
				_ => Value::Null,
			};
			stored.insert(column.name.clone(), value);
		}

		if let Some(key) = self.schema.primary_key() {
			if let Some(value) = stored.get(&key.name).filter(|v| !v.is_null()) {
				if self.rows.iter().any(|row| row.get(&key.name) == Some(value)) {
					return Err(SchemaViolation::DuplicateKey {
						relation: self.schema.name.clone(),
						column: key.name.clone(),
						value: value.to_string(),
					});
				}
				if let Some(id) = value.as_i64() {
					self.next_id = self.next_id.max(id + 1);
				}
			}
		}

		self.rows.push(stored.clone());
		Ok(stored)
	}

	fn generate_key(next_id: &mut i64, column_type: ColumnType) -> Value {
		match column_type {
			ColumnType::Uuid => Value::Uuid(Uuid::new_v4()),
			_ => {
				let id = *next_id;
				*next_id += 1;
				Value::Int(id)
			}
		}
	}
}

/// A [`PersistenceAdapter`] keeping rows in process memory.
///
/// Relations are declared up front with their schema. Auto-increment
/// integer keys start at 1 and never repeat within a relation, even after
/// explicit keys are written.
#[derive(Default)]
pub struct MemoryAdapter {
	tables: RwLock<IndexMap<String, Table>>,
}

impl MemoryAdapter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a relation, builder style.
	///
	/// A relation declared twice keeps the later schema.
	pub fn with_relation(self, schema: RelationSchema) -> Self {
		self.tables
			.write()
			.insert(schema.name.clone(), Table::new(schema));
		self
	}

	/// Adds a relation to a shared adapter.
	///
	/// # Errors
	///
	/// Returns [`AdapterError::DuplicateRelation`] if the name is taken.
	pub fn create_relation(&self, schema: RelationSchema) -> AdapterResult<()> {
		let mut tables = self.tables.write();
		if tables.contains_key(&schema.name) {
			return Err(AdapterError::DuplicateRelation(schema.name));
		}
		debug!(relation = %schema.name, columns = schema.columns.len(), "created relation");
		tables.insert(schema.name.clone(), Table::new(schema));
		Ok(())
	}

	/// Relation names in declaration order.
	pub fn relations(&self) -> Vec<String> {
		self.tables.read().keys().cloned().collect()
	}

	/// Number of stored rows; zero for unknown relations.
	pub fn count(&self, relation: &str) -> usize {
		self.tables
			.read()
			.get(relation)
			.map_or(0, |table| table.rows.len())
	}

	/// Snapshot of the stored rows.
	pub fn rows(&self, relation: &str) -> AdapterResult<Vec<Record>> {
		self.tables
			.read()
			.get(relation)
			.map(|table| table.rows.clone())
			.ok_or_else(|| AdapterError::UnknownRelation(relation.to_string()))
	}

	/// Deletes every row and rewinds the key counter.
	pub fn truncate(&self, relation: &str) -> AdapterResult<()> {
		let mut tables = self.tables.write();
		let table = tables
			.get_mut(relation)
			.ok_or_else(|| AdapterError::UnknownRelation(relation.to_string()))?;
		table.rows.clear();
		table.next_id = 1;
		Ok(())
	}
}

impl PersistenceAdapter for MemoryAdapter {
	fn schema_for(&self, relation: &str) -> Option<RelationSchema> {
		self.tables
			.read()
			.get(relation)
			.map(|table| table.schema.clone())
	}

	fn validate_and_write(
		&self,
		relation: &str,
		record: Record,
	) -> Result<Record, SchemaViolation> {
		let mut tables = self.tables.write();
		let table = tables
			.get_mut(relation)
			.ok_or_else(|| SchemaViolation::UnknownRelation(relation.to_string()))?;

		let stored = table.insert(record)?;
		debug!(relation, rows = table.rows.len(), "inserted row");
		Ok(stored)
	}
}

impl std::fmt::Debug for MemoryAdapter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("MemoryAdapter")
			.field("relations", &self.relations())
			.finish()
	}
}
