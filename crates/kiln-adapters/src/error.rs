//! Error types for adapter setup and inspection.
//!
//! Write failures are reported as [`SchemaViolation`] through the
//! [`PersistenceAdapter`] trait; this module covers everything around it.
//!
//! [`SchemaViolation`]: kiln_factory::SchemaViolation
//! [`PersistenceAdapter`]: kiln_factory::PersistenceAdapter

use thiserror::Error;

/// Errors raised by adapter operations outside the write path.
#[derive(Debug, Error)]
pub enum AdapterError {
	/// The relation is not known to the adapter.
	#[error("Relation not found: {0}")]
	UnknownRelation(String),

	/// A relation with the same name already exists.
	#[error("Relation already exists: {0}")]
	DuplicateRelation(String),

	/// The async runtime backing a blocking adapter could not start.
	#[error("Runtime error: {0}")]
	Runtime(#[from] std::io::Error),

	/// The database reported an error.
	#[cfg(feature = "sqlite")]
	#[error("Database error: {0}")]
	Database(#[from] sqlx::Error),
}

/// Result type for adapter operations.
pub type AdapterResult<T> = Result<T, AdapterError>;
