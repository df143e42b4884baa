//! Record validation shared by the adapters.

use kiln_factory::{RelationSchema, Record, SchemaViolation};

/// Checks a record against a relation schema before it is written.
///
/// Rejects columns the relation does not have, values whose type the column
/// cannot store, and missing or null values for required columns. Columns
/// that are nullable, defaulted or auto-incremented may be omitted.
pub fn check_record(schema: &RelationSchema, record: &Record) -> Result<(), SchemaViolation> {
	if let Some(column) = record.names().find(|name| !schema.contains(name)) {
		return Err(SchemaViolation::UnknownColumn {
			relation: schema.name.clone(),
			column: column.to_string(),
		});
	}

	for column in &schema.columns {
		match record.get(&column.name) {
			Some(value) if value.is_null() => {
				if !column.nullable && !column.auto_increment {
					return Err(SchemaViolation::MissingColumn {
						relation: schema.name.clone(),
						column: column.name.clone(),
					});
				}
			}
			Some(value) => {
				if !column.column_type.accepts(value) {
					return Err(SchemaViolation::TypeMismatch {
						relation: schema.name.clone(),
						column: column.name.clone(),
						expected: column.column_type.to_string(),
						actual: value.kind().to_string(),
					});
				}
			}
			None if !column.is_optional() => {
				return Err(SchemaViolation::MissingColumn {
					relation: schema.name.clone(),
					column: column.name.clone(),
				});
			}
			None => {}
		}
	}

	Ok(())
}
