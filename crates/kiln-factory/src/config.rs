//! Registry configuration.
//!
//! A registry is configured once, through [`Factories::configure`]:
//!
//! ```ignore
//! let factories = Factories::configure(|config| {
//!     config.adapter(Arc::new(MemoryAdapter::new()));
//!     config.faker_seed(42);
//! })?;
//! ```
//!
//! [`Factories::configure`]: crate::Factories::configure

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::adapter::PersistenceAdapter;
use crate::error::{FactoryError, FactoryResult};
use crate::faker::{FakeProvider, FakerProvider};

/// Plain-data settings of a registry.
///
/// Every field has a default, so hosts can load a partial document from any
/// serde format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactorySettings {
	/// Seed for the default fake-data provider. Unseeded providers draw from
	/// OS entropy.
	pub faker_seed: Option<u64>,
	/// Reject overrides that name columns the relation does not have.
	pub validate_overrides: bool,
	/// Infer a missing relation from the factory name.
	pub infer_relations: bool,
	/// First primary key handed out to structs of each relation.
	pub struct_id_start: i64,
}

impl Default for FactorySettings {
	fn default() -> Self {
		Self {
			faker_seed: None,
			validate_overrides: true,
			infer_relations: true,
			struct_id_start: 1,
		}
	}
}

/// Mutable configuration handed to the configure block.
#[derive(Default)]
pub struct FactoryConfig {
	adapter: Option<Arc<dyn PersistenceAdapter>>,
	faker: Option<Arc<dyn FakeProvider>>,
	settings: FactorySettings,
}

impl FactoryConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the persistence adapter. Required.
	pub fn adapter(&mut self, adapter: Arc<dyn PersistenceAdapter>) -> &mut Self {
		self.adapter = Some(adapter);
		self
	}

	/// Replaces the default fake-data provider.
	///
	/// A custom provider ignores [`faker_seed`](Self::faker_seed).
	pub fn faker(&mut self, faker: Arc<dyn FakeProvider>) -> &mut Self {
		self.faker = Some(faker);
		self
	}

	pub fn faker_seed(&mut self, seed: u64) -> &mut Self {
		self.settings.faker_seed = Some(seed);
		self
	}

	pub fn validate_overrides(&mut self, enabled: bool) -> &mut Self {
		self.settings.validate_overrides = enabled;
		self
	}

	pub fn infer_relations(&mut self, enabled: bool) -> &mut Self {
		self.settings.infer_relations = enabled;
		self
	}

	pub fn struct_id_start(&mut self, start: i64) -> &mut Self {
		self.settings.struct_id_start = start;
		self
	}

	/// Replaces all plain-data settings at once.
	pub fn settings(&mut self, settings: FactorySettings) -> &mut Self {
		self.settings = settings;
		self
	}

	pub(crate) fn into_parts(
		self,
	) -> FactoryResult<(Arc<dyn PersistenceAdapter>, Arc<dyn FakeProvider>, FactorySettings)> {
		let adapter = self.adapter.ok_or_else(|| {
			FactoryError::Configuration("a persistence adapter is required".to_string())
		})?;

		let faker: Arc<dyn FakeProvider> = match self.faker {
			Some(faker) => faker,
			None => match self.settings.faker_seed {
				Some(seed) => Arc::new(FakerProvider::seeded(seed)),
				None => Arc::new(FakerProvider::new()),
			},
		};

		Ok((adapter, faker, self.settings))
	}
}

impl fmt::Debug for FactoryConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FactoryConfig")
			.field("adapter", &self.adapter.is_some())
			.field("faker", &self.faker.is_some())
			.field("settings", &self.settings)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_default_settings() {
		let settings = FactorySettings::default();
		assert_eq!(settings.faker_seed, None);
		assert!(settings.validate_overrides);
		assert!(settings.infer_relations);
		assert_eq!(settings.struct_id_start, 1);
	}

	#[rstest]
	#[case(r#"{}"#, FactorySettings::default())]
	#[case(
		r#"{"faker_seed": 7, "struct_id_start": 100}"#,
		FactorySettings { faker_seed: Some(7), struct_id_start: 100, ..Default::default() }
	)]
	#[case(
		r#"{"validate_overrides": false, "infer_relations": false}"#,
		FactorySettings { validate_overrides: false, infer_relations: false, ..Default::default() }
	)]
	fn test_settings_from_json(#[case] json: &str, #[case] expected: FactorySettings) {
		let settings: FactorySettings = serde_json::from_str(json).unwrap();
		assert_eq!(settings, expected);
	}

	#[rstest]
	fn test_adapter_is_required() {
		let mut config = FactoryConfig::new();
		config.faker_seed(1);

		let result = config.into_parts();
		assert!(matches!(result, Err(FactoryError::Configuration(_))));
	}
}
