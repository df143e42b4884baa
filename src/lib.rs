//! # Kiln
//!
//! Test-data factories: declare how an entity's attributes are produced
//! once, then build as many records as a test needs.
//!
//! Kiln re-exports the factory engine ([`kiln_factory`]) and the bundled
//! persistence adapters ([`kiln_adapters`]) behind a single dependency.
//!
//! ## Feature Flags
//!
//! - `sqlite` - [`SqliteAdapter`](adapters::SqliteAdapter), backed by `sqlx`
//!
//! ## Quick Example
//!
//! ```
//! use kiln::prelude::*;
//!
//! # fn main() -> FactoryResult<()> {
//! let adapter = Arc::new(MemoryAdapter::new().with_relation(
//!     RelationSchema::new("users")
//!         .column(ColumnSchema::primary_key("id"))
//!         .column(ColumnSchema::new("name", ColumnType::String))
//!         .column(ColumnSchema::new("email", ColumnType::String)),
//! ));
//!
//! let mut factories = Factories::configure(|config| {
//!     config.adapter(adapter.clone());
//! })?;
//!
//! factories.define("user", |f| {
//!     f.set("name", "Jane");
//!     f.sequence("email", |n| format!("jane{}@doe.org", n));
//! })?;
//!
//! let user = factories.build("user")?;
//! assert_eq!(user.get("id"), Some(&Value::Int(1)));
//!
//! let ephemeral = factories.structs().build("user")?;
//! assert_eq!(ephemeral.type_name(), "User");
//! assert_eq!(adapter.count("users"), 1);
//! # Ok(())
//! # }
//! ```

pub use kiln_factory::*;

/// Bundled persistence adapters.
pub mod adapters {
	pub use kiln_adapters::*;
}

/// Convenience re-exports for common usage.
pub mod prelude {
	pub use kiln_adapters::MemoryAdapter;
	#[cfg(feature = "sqlite")]
	pub use kiln_adapters::SqliteAdapter;
	pub use kiln_factory::prelude::*;
}
