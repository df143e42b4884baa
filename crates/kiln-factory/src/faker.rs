//! Fake data generation.
//!
//! Attributes reach fake data through the [`FakeProvider`] carried by the
//! resolution context, so tests can inject a stub provider. The default
//! provider, [`FakerProvider`], is backed by the `fake` crate and keyed by
//! `(category, field)` pairs such as `("name", "first_name")`.

use fake::Fake;
use fake::faker::address::en::{CityName, CountryName, StateName, StreetName, ZipCode};
use fake::faker::boolean::en::Boolean;
use fake::faker::company::en::{Buzzword, CompanyName, Industry};
use fake::faker::internet::en::{DomainSuffix, FreeEmail, IPv4, Password, SafeEmail, Username};
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::{FirstName, LastName, Name, Title};
use fake::faker::number::en::Digit;
use fake::faker::phone_number::en::{CellNumber, PhoneNumber};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::{FactoryError, FactoryResult};
use crate::value::Value;

/// Supplies random, realistic values by category and field.
pub trait FakeProvider: Send + Sync {
	/// Generates a value for the given generator.
	///
	/// # Errors
	///
	/// Returns [`FactoryError::UnknownFakeField`] when no generator exists.
	fn generate(&self, category: &str, field: &str) -> FactoryResult<Value>;

	/// Returns true if [`generate`](Self::generate) knows the generator.
	///
	/// Used to reject unknown generators when a factory is defined. The
	/// default accepts everything and defers the check to resolution time.
	fn supports(&self, category: &str, field: &str) -> bool {
		let _ = (category, field);
		true
	}
}

/// Generators understood by [`FakerProvider`].
pub const SUPPORTED_GENERATORS: &[(&str, &str)] = &[
	("name", "first_name"),
	("name", "last_name"),
	("name", "name"),
	("name", "title"),
	("internet", "email"),
	("internet", "free_email"),
	("internet", "user_name"),
	("internet", "username"),
	("internet", "password"),
	("internet", "ip_v4_address"),
	("internet", "domain_suffix"),
	("address", "city"),
	("address", "street_name"),
	("address", "country"),
	("address", "zip_code"),
	("address", "state"),
	("company", "name"),
	("company", "industry"),
	("company", "buzzword"),
	("lorem", "word"),
	("lorem", "sentence"),
	("lorem", "paragraph"),
	("phone_number", "phone_number"),
	("phone_number", "cell_phone"),
	("number", "number"),
	("number", "digit"),
	("boolean", "boolean"),
];

/// [`FakeProvider`] backed by the `fake` crate.
///
/// A seeded provider produces the same stream of values on every run.
pub struct FakerProvider {
	rng: Mutex<StdRng>,
}

impl FakerProvider {
	/// Creates a provider seeded from system entropy.
	pub fn new() -> Self {
		Self {
			rng: Mutex::new(StdRng::from_entropy()),
		}
	}

	/// Creates a deterministic provider.
	pub fn seeded(seed: u64) -> Self {
		Self {
			rng: Mutex::new(StdRng::seed_from_u64(seed)),
		}
	}
}

impl Default for FakerProvider {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for FakerProvider {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FakerProvider").finish_non_exhaustive()
	}
}

impl FakeProvider for FakerProvider {
	fn generate(&self, category: &str, field: &str) -> FactoryResult<Value> {
		let mut guard = self.rng.lock();
		let rng = &mut *guard;

		let value = match (category, field) {
			("name", "first_name") => Value::String(FirstName().fake_with_rng(rng)),
			("name", "last_name") => Value::String(LastName().fake_with_rng(rng)),
			("name", "name") => Value::String(Name().fake_with_rng(rng)),
			("name", "title") => Value::String(Title().fake_with_rng(rng)),
			("internet", "email") => Value::String(SafeEmail().fake_with_rng(rng)),
			("internet", "free_email") => Value::String(FreeEmail().fake_with_rng(rng)),
			("internet", "user_name") | ("internet", "username") => {
				Value::String(Username().fake_with_rng(rng))
			}
			("internet", "password") => Value::String(Password(8..16).fake_with_rng(rng)),
			("internet", "ip_v4_address") => Value::String(IPv4().fake_with_rng(rng)),
			("internet", "domain_suffix") => Value::String(DomainSuffix().fake_with_rng(rng)),
			("address", "city") => Value::String(CityName().fake_with_rng(rng)),
			("address", "street_name") => Value::String(StreetName().fake_with_rng(rng)),
			("address", "country") => Value::String(CountryName().fake_with_rng(rng)),
			("address", "zip_code") => Value::String(ZipCode().fake_with_rng(rng)),
			("address", "state") => Value::String(StateName().fake_with_rng(rng)),
			("company", "name") => Value::String(CompanyName().fake_with_rng(rng)),
			("company", "industry") => Value::String(Industry().fake_with_rng(rng)),
			("company", "buzzword") => Value::String(Buzzword().fake_with_rng(rng)),
			("lorem", "word") => Value::String(Word().fake_with_rng(rng)),
			("lorem", "sentence") => Value::String(Sentence(3..8).fake_with_rng(rng)),
			("lorem", "paragraph") => Value::String(Paragraph(2..4).fake_with_rng(rng)),
			("phone_number", "phone_number") => Value::String(PhoneNumber().fake_with_rng(rng)),
			("phone_number", "cell_phone") => Value::String(CellNumber().fake_with_rng(rng)),
			("number", "number") => Value::Int((1..100_000i64).fake_with_rng(rng)),
			("number", "digit") => Value::String(Digit().fake_with_rng(rng)),
			("boolean", "boolean") => Value::Bool(Boolean(50).fake_with_rng(rng)),
			_ => {
				return Err(FactoryError::UnknownFakeField {
					category: category.to_string(),
					field: field.to_string(),
				});
			}
		};
		Ok(value)
	}

	fn supports(&self, category: &str, field: &str) -> bool {
		SUPPORTED_GENERATORS
			.iter()
			.any(|(c, f)| *c == category && *f == field)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("name", "first_name")]
	#[case("name", "last_name")]
	#[case("internet", "email")]
	#[case("address", "city")]
	#[case("company", "name")]
	#[case("lorem", "sentence")]
	fn test_generates_non_empty_strings(#[case] category: &str, #[case] field: &str) {
		let faker = FakerProvider::new();
		let value = faker.generate(category, field).unwrap();
		assert!(!value.is_blank(), "{}.{} produced {:?}", category, field, value);
	}

	#[rstest]
	fn test_every_supported_generator_resolves() {
		let faker = FakerProvider::seeded(7);
		for (category, field) in SUPPORTED_GENERATORS {
			assert!(faker.supports(category, field));
			assert!(faker.generate(category, field).is_ok());
		}
	}

	#[rstest]
	fn test_email_looks_like_email() {
		let faker = FakerProvider::new();
		let email = faker.generate("internet", "email").unwrap();
		assert!(email.as_str().unwrap().contains('@'));
	}

	#[rstest]
	fn test_seeded_provider_is_deterministic() {
		let a = FakerProvider::seeded(42);
		let b = FakerProvider::seeded(42);
		for _ in 0..5 {
			assert_eq!(
				a.generate("name", "first_name").unwrap(),
				b.generate("name", "first_name").unwrap()
			);
		}
	}

	#[rstest]
	fn test_unknown_generator() {
		let faker = FakerProvider::new();
		assert!(!faker.supports("name", "nickname"));
		assert!(matches!(
			faker.generate("name", "nickname"),
			Err(FactoryError::UnknownFakeField { .. })
		));
	}
}
