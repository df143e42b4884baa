//! Persistence adapters for Kiln factories.
//!
//! - [`MemoryAdapter`] - in-process relations with declared schemas, the
//!   default for unit tests
//! - `SqliteAdapter` - a SQLite database reached through `sqlx` (feature
//!   `sqlite`)
//!
//! Both validate records against the relation schema before writing, so a
//! factory that drifts from its table fails the same way on either store.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use kiln_adapters::MemoryAdapter;
//! use kiln_factory::{ColumnSchema, ColumnType, Factories, RelationSchema};
//!
//! let adapter = Arc::new(MemoryAdapter::new().with_relation(
//!     RelationSchema::new("users")
//!         .column(ColumnSchema::primary_key("id"))
//!         .column(ColumnSchema::new("email", ColumnType::String)),
//! ));
//!
//! let mut factories = Factories::new(adapter.clone());
//! factories
//!     .define("user", |f| {
//!         f.sequence("email", |n| format!("user{}@example.com", n));
//!     })
//!     .unwrap();
//!
//! let user = factories.build("user").unwrap();
//! assert_eq!(user.get_str("email"), Some("user1@example.com"));
//! assert_eq!(adapter.count("users"), 1);
//! ```

#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod validate;

pub use error::{AdapterError, AdapterResult};
pub use memory::MemoryAdapter;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteAdapter;
