//! Convenience re-exports for common usage.
//!
//! ```ignore
//! use kiln_factory::prelude::*;
//! ```

pub use std::sync::Arc;

// Error types
pub use crate::error::{FactoryError, FactoryResult, SchemaViolation};

// Registry and configuration
pub use crate::config::{FactoryConfig, FactorySettings};
pub use crate::definition::Definition;
pub use crate::registry::Factories;
pub use crate::scaffold::FactoryScaffold;

// Values and records
pub use crate::record::{Overrides, Record};
pub use crate::structs::{FactoryStruct, StructType};
pub use crate::value::Value;

// Extension points
pub use crate::adapter::{ColumnSchema, ColumnType, PersistenceAdapter, RelationSchema};
pub use crate::attribute::AttributeSource;
pub use crate::context::ResolveContext;
pub use crate::faker::{FakeProvider, FakerProvider};
