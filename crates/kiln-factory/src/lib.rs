//! Test-data factories for Kiln.
//!
//! This crate provides the factory engine: named templates ("builders") that
//! resolve into records, either persisted through a storage adapter or
//! returned as in-memory structs.
//!
//! - **Definitions**: declare attributes as fixed values, lazy computations,
//!   sequences, or fake data
//! - **Traits**: derive a factory from another and override part of it
//! - **Strategies**: persisted builds go through a [`PersistenceAdapter`];
//!   struct builds never touch storage
//!
//! # Quick Start
//!
//! ```ignore
//! use kiln_factory::prelude::*;
//!
//! let mut factories = Factories::configure(|config| {
//!     config.adapter(Arc::new(adapter));
//! })?;
//!
//! factories.define("user", |f| {
//!     f.set("first_name", "Jane");
//!     f.fake("last_name", "name", "last_name");
//!     f.sequence("email", |n| format!("jane{}@doe.org", n));
//!     f.timestamps();
//! })?;
//!
//! factories.define(("john", "user"), |f| {
//!     f.set("first_name", "John");
//! })?;
//!
//! let jane = factories.build("user")?;
//! let john = factories.build_with("john", [("email", "john@doe.org")])?;
//! let ephemeral = factories.structs().build("user")?;
//! ```
//!
//! # Architecture
//!
//! - [`Factories`] - the registry, owner of every builder
//! - [`FactoryScaffold`] - declaration surface handed to `define` blocks
//! - [`Builder`] - a registered factory and its resolution pipeline
//! - [`AttributeSource`] - how one attribute gets its value
//! - [`PersistenceAdapter`] - storage seam used by persisted builds
//! - [`FakeProvider`] - fake-data seam, backed by the `fake` crate by default

#![warn(rustdoc::missing_crate_level_docs)]

pub mod adapter;
pub mod attribute;
pub mod builder;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod faker;
pub mod inflection;
mod inherit;
pub mod prelude;
pub mod record;
pub mod registry;
pub mod scaffold;
pub mod structs;
pub mod value;

// Re-export commonly used types at crate root
pub use adapter::{ColumnSchema, ColumnType, PersistenceAdapter, RelationSchema};
pub use attribute::{AttributeSet, AttributeSource, Sequence};
pub use builder::Builder;
pub use config::{FactoryConfig, FactorySettings};
pub use context::ResolveContext;
pub use definition::Definition;
pub use error::{FactoryError, FactoryResult, SchemaViolation};
pub use faker::{FakeProvider, FakerProvider};
pub use record::{Overrides, Record};
pub use registry::Factories;
pub use scaffold::FactoryScaffold;
pub use structs::{FactoryStruct, StructFactory, StructType};
pub use value::Value;
