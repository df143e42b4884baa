//! SQLite persistence adapter.
//!
//! The adapter is synchronous from the factory's point of view: every
//! statement runs to completion on a private current-thread runtime. It must
//! not be used from inside another tokio runtime.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kiln_factory::{
	ColumnSchema, ColumnType, PersistenceAdapter, Record, RelationSchema, SchemaViolation, Value,
};
use parking_lot::RwLock;
use sqlx::sqlite::{SqliteArguments, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as SqlxRow, Sqlite};
use tokio::runtime::{Builder as RuntimeBuilder, Runtime};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::AdapterResult;
use crate::validate::check_record;

type Query<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// A [`PersistenceAdapter`] writing to a SQLite database.
///
/// Relation schemas are read with `PRAGMA table_info` on first use and
/// cached; [`execute`](Self::execute) drops the cache so DDL run through the
/// adapter is picked up.
///
/// ```ignore
/// let adapter = SqliteAdapter::in_memory()?;
/// adapter.execute("CREATE TABLE users (id INTEGER PRIMARY KEY, email TEXT NOT NULL)")?;
/// ```
pub struct SqliteAdapter {
	pool: SqlitePool,
	runtime: Runtime,
	schemas: RwLock<HashMap<String, RelationSchema>>,
}

impl SqliteAdapter {
	/// Connects to a database URL such as `sqlite://tests.db`.
	pub fn connect(url: &str) -> AdapterResult<Self> {
		let runtime = RuntimeBuilder::new_current_thread().enable_all().build()?;

		// A single connection that never expires keeps `sqlite::memory:`
		// databases alive for the adapter's lifetime.
		let pool = runtime.block_on(
			SqlitePoolOptions::new()
				.max_connections(1)
				.idle_timeout(None)
				.max_lifetime(None)
				.connect(url),
		)?;

		debug!(url, "connected sqlite adapter");
		Ok(Self {
			pool,
			runtime,
			schemas: RwLock::new(HashMap::new()),
		})
	}

	/// Opens a private in-memory database.
	pub fn in_memory() -> AdapterResult<Self> {
		Self::connect("sqlite::memory:")
	}

	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Runs a statement and returns the number of affected rows.
	pub fn execute(&self, sql: &str) -> AdapterResult<u64> {
		let result = self
			.runtime
			.block_on(sqlx::query(sql).execute(&self.pool))?;
		self.schemas.write().clear();
		Ok(result.rows_affected())
	}

	/// Number of rows in a relation.
	pub fn count(&self, relation: &str) -> AdapterResult<i64> {
		let sql = format!("SELECT COUNT(*) FROM {}", quote(relation));
		let row = self
			.runtime
			.block_on(sqlx::query(&sql).fetch_one(&self.pool))?;
		Ok(row.try_get::<i64, _>(0)?)
	}

	/// Every row of a relation, decoded with the relation's schema.
	pub fn rows(&self, relation: &str) -> AdapterResult<Vec<Record>> {
		let schema = self.schema_for(relation);
		let sql = format!("SELECT * FROM {}", quote(relation));
		let rows = self
			.runtime
			.block_on(sqlx::query(&sql).fetch_all(&self.pool))?;
		rows.iter()
			.map(|row| convert_row(row, schema.as_ref()).map_err(Into::into))
			.collect()
	}

	fn introspect(&self, relation: &str) -> Result<Option<RelationSchema>, sqlx::Error> {
		let sql = format!("PRAGMA table_info({})", quote(relation));
		let rows = self
			.runtime
			.block_on(sqlx::query(&sql).fetch_all(&self.pool))?;
		if rows.is_empty() {
			return Ok(None);
		}

		let key_count = rows
			.iter()
			.filter(|row| row.try_get::<i64, _>("pk").unwrap_or(0) > 0)
			.count();

		let mut schema = RelationSchema::new(relation);
		for row in &rows {
			let name: String = row.try_get("name")?;
			let declared: String = row.try_get("type")?;
			let not_null: bool = row.try_get::<i64, _>("notnull")? != 0;
			let default: Option<String> = row.try_get("dflt_value")?;
			let primary_key = row.try_get::<i64, _>("pk")? > 0;
			let column_type = column_type(&declared);

			// Only a lone INTEGER PRIMARY KEY aliases the rowid.
			let auto_increment =
				primary_key && key_count == 1 && declared.eq_ignore_ascii_case("INTEGER");

			schema = schema.column(ColumnSchema {
				name,
				column_type,
				nullable: !not_null && !primary_key,
				primary_key,
				auto_increment,
				has_default: default.is_some(),
			});
		}
		Ok(Some(schema))
	}
}

/// Maps a declared SQLite column type to a column type, following SQLite's
/// affinity rules with a few common names recognized first.
fn column_type(declared: &str) -> ColumnType {
	let declared = declared.to_uppercase();
	if declared.contains("BOOL") {
		ColumnType::Boolean
	} else if declared.contains("DATE") || declared.contains("TIME") {
		ColumnType::Timestamp
	} else if declared.contains("UUID") {
		ColumnType::Uuid
	} else if declared.contains("JSON") {
		ColumnType::Json
	} else if declared.contains("INT") {
		ColumnType::Integer
	} else if declared.contains("REAL") || declared.contains("FLOA") || declared.contains("DOUB") {
		ColumnType::Float
	} else {
		ColumnType::String
	}
}

fn quote(identifier: &str) -> String {
	format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn bind_value<'q>(query: Query<'q>, value: &'q Value) -> Query<'q> {
	match value {
		Value::Null => query.bind(None::<i64>),
		Value::Bool(b) => query.bind(b),
		Value::Int(i) => query.bind(i),
		Value::Float(f) => query.bind(f),
		Value::String(s) => query.bind(s),
		Value::Timestamp(dt) => query.bind(dt),
		Value::Uuid(u) => query.bind(u),
		Value::Json(v) => query.bind(v.to_string()),
	}
}

fn convert_row(row: &SqliteRow, schema: Option<&RelationSchema>) -> Result<Record, sqlx::Error> {
	let mut record = Record::new();
	for column in row.columns() {
		let name = column.name();
		let column_type = schema
			.and_then(|schema| schema.get(name))
			.map(|column| column.column_type);
		record.insert(name, decode(row, name, column_type)?);
	}
	Ok(record)
}

fn decode(row: &SqliteRow, name: &str, column_type: Option<ColumnType>) -> Result<Value, sqlx::Error> {
	let value = match column_type {
		Some(ColumnType::Integer) => row.try_get::<Option<i64>, _>(name)?.map(Value::Int),
		Some(ColumnType::Float) => row.try_get::<Option<f64>, _>(name)?.map(Value::Float),
		Some(ColumnType::Boolean) => row.try_get::<Option<bool>, _>(name)?.map(Value::Bool),
		Some(ColumnType::Timestamp) => row
			.try_get::<Option<DateTime<Utc>>, _>(name)?
			.map(Value::Timestamp),
		Some(ColumnType::Uuid) => match row.try_get::<Option<Uuid>, _>(name) {
			Ok(uuid) => uuid.map(Value::Uuid),
			// UUIDs written as text rather than blobs
			Err(_) => row.try_get::<Option<String>, _>(name)?.map(|text| {
				Uuid::parse_str(&text).map_or(Value::String(text), Value::Uuid)
			}),
		},
		Some(ColumnType::Json) => match row.try_get::<Option<String>, _>(name)? {
			Some(text) => Some(
				serde_json::from_str(&text)
					.map(Value::Json)
					.unwrap_or(Value::String(text)),
			),
			None => None,
		},
		Some(ColumnType::String) => row.try_get::<Option<String>, _>(name)?.map(Value::String),
		None => decode_untyped(row, name),
	};
	Ok(value.unwrap_or(Value::Null))
}

fn decode_untyped(row: &SqliteRow, name: &str) -> Option<Value> {
	if let Ok(value) = row.try_get::<Option<i64>, _>(name) {
		return value.map(Value::Int);
	}
	if let Ok(value) = row.try_get::<Option<f64>, _>(name) {
		return value.map(Value::Float);
	}
	row.try_get::<Option<String>, _>(name)
		.ok()
		.flatten()
		.map(Value::String)
}

fn violation(relation: &str, error: sqlx::Error) -> SchemaViolation {
	match &error {
		sqlx::Error::Database(db) if db.is_unique_violation() => SchemaViolation::DuplicateKey {
			relation: relation.to_string(),
			column: db.constraint().unwrap_or("unique").to_string(),
			value: db.message().to_string(),
		},
		_ => SchemaViolation::Storage(error.to_string()),
	}
}

impl PersistenceAdapter for SqliteAdapter {
	fn schema_for(&self, relation: &str) -> Option<RelationSchema> {
		if let Some(schema) = self.schemas.read().get(relation) {
			return Some(schema.clone());
		}

		match self.introspect(relation) {
			Ok(Some(schema)) => {
				self.schemas
					.write()
					.insert(relation.to_string(), schema.clone());
				Some(schema)
			}
			Ok(None) => None,
			Err(error) => {
				warn!(relation, %error, "failed to introspect relation");
				None
			}
		}
	}

	fn validate_and_write(
		&self,
		relation: &str,
		record: Record,
	) -> Result<Record, SchemaViolation> {
		let schema = self
			.schema_for(relation)
			.ok_or_else(|| SchemaViolation::UnknownRelation(relation.to_string()))?;
		check_record(&schema, &record)?;

		let sql = if record.is_empty() {
			format!("INSERT INTO {} DEFAULT VALUES RETURNING *", quote(relation))
		} else {
			let columns: Vec<String> = record.names().map(quote).collect();
			let placeholders = vec!["?"; record.len()].join(", ");
			format!(
				"INSERT INTO {} ({}) VALUES ({}) RETURNING *",
				quote(relation),
				columns.join(", "),
				placeholders
			)
		};

		let mut query = sqlx::query(&sql);
		for (_, value) in record.iter() {
			query = bind_value(query, value);
		}

		let row = self
			.runtime
			.block_on(query.fetch_one(&self.pool))
			.map_err(|error| violation(relation, error))?;
		let stored =
			convert_row(&row, Some(&schema)).map_err(|error| violation(relation, error))?;

		debug!(relation, "inserted row");
		Ok(stored)
	}
}

impl std::fmt::Debug for SqliteAdapter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SqliteAdapter")
			.field("cached_schemas", &self.schemas.read().len())
			.finish_non_exhaustive()
	}
}
