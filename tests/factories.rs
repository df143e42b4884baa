//! End-to-end behavior of factories over the in-memory adapter.

use chrono::{DateTime, Utc};
use kiln::prelude::*;
use rstest::{fixture, rstest};
use serde::Deserialize;

struct Harness {
	adapter: Arc<MemoryAdapter>,
	factories: Factories,
}

#[fixture]
fn harness() -> Harness {
	let adapter = Arc::new(
		MemoryAdapter::new().with_relation(
			RelationSchema::new("users")
				.column(ColumnSchema::primary_key("id"))
				.column(ColumnSchema::new("last_name", ColumnType::String))
				.column(ColumnSchema::new("first_name", ColumnType::String))
				.column(ColumnSchema::new("email", ColumnType::String))
				.column(ColumnSchema::new("created_at", ColumnType::Timestamp))
				.column(ColumnSchema::new("updated_at", ColumnType::Timestamp)),
		),
	);
	let factories = Factories::configure(|config| {
		config.adapter(adapter.clone());
	})
	.unwrap();

	Harness { adapter, factories }
}

#[rstest]
fn test_structs_are_plain_values(mut harness: Harness) {
	harness
		.factories
		.define("user", |f| {
			f.set("first_name", "Jane");
			f.set("last_name", "Doe");
			f.set("email", "jane@doe.org");
			f.timestamps();
		})
		.unwrap();

	let user1 = harness.factories.structs().build("user").unwrap();
	let user2 = harness.factories.structs().build("user").unwrap();

	assert!(user1.id().is_some());
	assert_eq!(user1.get_str("first_name"), Some("Jane"));
	assert!(user1.get("last_name").is_some());
	assert!(user1.get("email").is_some());
	assert!(!user1["created_at"].is_null());
	assert!(!user1["updated_at"].is_null());

	assert_ne!(user1.id(), user2.id());
	assert_eq!(harness.adapter.count("users"), 0);
	assert_eq!(user1.struct_type(), user2.struct_type());
}

#[rstest]
fn test_infers_relation_from_name(mut harness: Harness) {
	harness
		.factories
		.define("user", |f| {
			f.set("first_name", "Janis");
			f.set("last_name", "Miezitis");
			f.set("email", "janjiss@gmail.com");
			f.timestamps();
		})
		.unwrap();

	let user = harness.factories.build("user").unwrap();

	assert!(user.get("id").is_some_and(|id| !id.is_null()));
	assert_eq!(user.get_str("first_name"), Some("Janis"));
}

#[rstest]
fn test_rejects_attributes_outside_schema(mut harness: Harness) {
	let result = harness
		.factories
		.define(Definition::new("user").relation("users"), |f| {
			f.set("boobly", "Janis");
		});

	assert!(matches!(
		result,
		Err(FactoryError::UnknownAttribute { attribute, .. }) if attribute == "boobly"
	));
}

#[rstest]
fn test_creates_records(mut harness: Harness) {
	harness
		.factories
		.define(Definition::new("user").relation("users"), |f| {
			f.set("first_name", "Janis");
			f.set("last_name", "Miezitis");
			f.set("email", "janjiss@gmail.com");
			f.set("created_at", Utc::now());
			f.set("updated_at", Utc::now());
		})
		.unwrap();

	let user = harness.factories.build("user").unwrap();

	assert!(!user["email"].is_blank());
	assert!(!user["first_name"].is_blank());
	assert!(!user["last_name"].is_blank());
	assert_eq!(harness.adapter.rows("users").unwrap(), vec![user]);
}

#[rstest]
fn test_supports_callable_values(mut harness: Harness) {
	harness
		.factories
		.define(Definition::new("user").relation("users"), |f| {
			f.set("first_name", "Janis");
			f.set("last_name", "Miezitis");
			f.set("email", "janjiss@gmail.com");
			f.lazy("created_at", |_| Utc::now());
			f.lazy("updated_at", |_| Utc::now());
		})
		.unwrap();

	let user = harness.factories.build("user").unwrap();

	assert!(user.get_as::<DateTime<Utc>>("created_at").is_ok());
	assert!(user.get_as::<DateTime<Utc>>("updated_at").is_ok());
}

#[rstest]
fn test_lazy_values_read_earlier_attributes(mut harness: Harness) {
	harness
		.factories
		.define("user", |f| {
			f.set("first_name", "Janis");
			f.set("last_name", "Miezitis");
			f.lazy("email", |ctx| {
				let first = ctx.get_str("first_name").unwrap_or("user");
				format!("{}@example.com", first.to_lowercase())
			});
			f.timestamps();
		})
		.unwrap();

	let user = harness
		.factories
		.build_with("user", [("first_name", "Kaspars")])
		.unwrap();
	assert_eq!(user.get_str("email"), Some("kaspars@example.com"));
}

#[rstest]
fn test_overrides_values(mut harness: Harness) {
	harness
		.factories
		.define(Definition::new("user").relation("users"), |f| {
			f.set("first_name", "Janis");
			f.set("last_name", "Miezitis");
			f.set("email", "janjiss@gmail.com");
			f.timestamps();
		})
		.unwrap();

	let user = harness
		.factories
		.build_with("user", [("email", "holla@gmail.com")])
		.unwrap();

	assert_eq!(user.get_str("email"), Some("holla@gmail.com"));
	assert_eq!(user.get_str("first_name"), Some("Janis"));
	assert!(!user["created_at"].is_null());
}

#[rstest]
fn test_duplicate_name_is_an_error(mut harness: Harness) {
	let definition = || Definition::new("user").relation("users");

	harness.factories.define(definition(), |_| {}).unwrap();
	let result = harness.factories.define(definition(), |_| {});

	assert!(matches!(result, Err(FactoryError::DuplicateName(name)) if name == "user"));
}

#[rstest]
fn test_sequences(mut harness: Harness) {
	harness
		.factories
		.define(Definition::new("user").relation("users"), |f| {
			f.sequence("email", |n| format!("janjiss{}@gmail.com", n));
			f.set("first_name", "Janis");
			f.set("last_name", "Miezitis");
			f.timestamps();
		})
		.unwrap();

	let user1 = harness.factories.build("user").unwrap();
	let user2 = harness.factories.build("user").unwrap();

	assert_eq!(user1.get_str("email"), Some("janjiss1@gmail.com"));
	assert_eq!(user2.get_str("email"), Some("janjiss2@gmail.com"));
}

#[rstest]
fn test_overridden_sequence_does_not_advance(mut harness: Harness) {
	harness
		.factories
		.define("user", |f| {
			f.sequence("email", |n| format!("janjiss{}@gmail.com", n));
			f.set("first_name", "Janis");
			f.set("last_name", "Miezitis");
			f.timestamps();
		})
		.unwrap();

	let emails: Vec<String> = [None, Some("holla@gmail.com"), None]
		.into_iter()
		.map(|email| {
			let overrides: Overrides = email.map(|e| ("email", e)).into_iter().collect();
			let user = harness.factories.build_with("user", overrides).unwrap();
			user.get_as::<String>("email").unwrap()
		})
		.collect();

	assert_eq!(
		emails,
		vec!["janjiss1@gmail.com", "holla@gmail.com", "janjiss2@gmail.com"]
	);
}

#[rstest]
fn test_structs_and_builds_share_sequences(mut harness: Harness) {
	harness
		.factories
		.define("user", |f| {
			f.sequence("email", |n| format!("user{}@example.com", n));
			f.set("first_name", "Jane");
			f.set("last_name", "Doe");
			f.timestamps();
		})
		.unwrap();

	let ephemeral = harness.factories.structs().build("user").unwrap();
	let persisted = harness.factories.build("user").unwrap();

	assert_eq!(ephemeral.get_str("email"), Some("user1@example.com"));
	assert_eq!(persisted.get_str("email"), Some("user2@example.com"));
}

#[rstest]
fn test_timestamps(mut harness: Harness) {
	harness
		.factories
		.define(Definition::new("user").relation("users"), |f| {
			f.set("first_name", "Janis");
			f.set("last_name", "Miezitis");
			f.set("email", "janjiss@gmail.com");
			f.timestamps();
		})
		.unwrap();

	let user1 = harness.factories.build("user").unwrap();
	let user2 = harness.factories.build("user").unwrap();

	assert!(matches!(user1["created_at"], Value::Timestamp(_)));
	assert!(matches!(user1["updated_at"], Value::Timestamp(_)));
	assert_ne!(user1["created_at"], user1["updated_at"]);
	assert_ne!(user2["created_at"], user2["updated_at"]);

	assert_ne!(user2["created_at"], user1["created_at"]);
	assert_ne!(user2["updated_at"], user1["updated_at"]);
}

#[rstest]
fn test_traits(mut harness: Harness) {
	harness
		.factories
		.define("user", |f| {
			f.timestamps();
		})
		.unwrap();
	harness
		.factories
		.define(("jane", "user"), |f| {
			f.set("first_name", "Jane");
			f.set("last_name", "Doe");
			f.set("email", "jane@doe.org");
		})
		.unwrap();
	harness
		.factories
		.define(("john", "jane"), |f| {
			f.set("first_name", "John");
			f.set("email", "john@doe.org");
		})
		.unwrap();

	let jane = harness.factories.build("jane").unwrap();
	let john = harness.factories.build("john").unwrap();

	assert_eq!(jane.get_str("first_name"), Some("Jane"));
	assert_eq!(jane.get_str("email"), Some("jane@doe.org"));

	assert_eq!(john.get_str("first_name"), Some("John"));
	assert_eq!(john.get_str("email"), Some("john@doe.org"));
	assert_eq!(john.get_str("last_name"), Some("Doe"));
	assert!(!john["created_at"].is_null());
	assert_eq!(harness.adapter.count("users"), 2);
}

#[rstest]
fn test_trait_inherits_email_when_not_redeclared(mut harness: Harness) {
	harness
		.factories
		.define("user", |f| {
			f.timestamps();
		})
		.unwrap();
	harness
		.factories
		.define(("jane", "user"), |f| {
			f.set("first_name", "Jane");
			f.set("last_name", "Doe");
			f.set("email", "jane@doe.org");
		})
		.unwrap();
	harness
		.factories
		.define(("john", "jane"), |f| {
			f.set("first_name", "John");
		})
		.unwrap();

	let john = harness.factories.structs().build("john").unwrap();
	assert_eq!(john.get_str("first_name"), Some("John"));
	assert_eq!(john.get_str("email"), Some("jane@doe.org"));
	assert_eq!(john.type_name(), "John");
}

#[rstest]
fn test_faker(mut harness: Harness) {
	harness
		.factories
		.define("user", |f| {
			f.try_lazy("first_name", |ctx| ctx.fake("name", "first_name"));
			f.fake("last_name", "name", "last_name");
			f.fake("email", "internet", "email");
			f.timestamps();
		})
		.unwrap();

	let user = harness.factories.build("user").unwrap();

	assert!(user.get("id").is_some());
	assert!(!user["first_name"].is_blank());
	assert!(!user["last_name"].is_blank());
	assert!(user.get_str("email").is_some_and(|email| email.contains('@')));
	assert!(!user["created_at"].is_null());
}

#[rstest]
fn test_seeded_faker_is_reproducible() {
	let define = || {
		let adapter = Arc::new(MemoryAdapter::new().with_relation(
			RelationSchema::new("users")
				.column(ColumnSchema::primary_key("id"))
				.column(ColumnSchema::new("first_name", ColumnType::String)),
		));
		let mut factories = Factories::configure(|config| {
			config.adapter(adapter).faker_seed(2024);
		})
		.unwrap();
		factories
			.define("user", |f| {
				f.fake("first_name", "name", "first_name");
			})
			.unwrap();
		factories
	};

	let a = define().structs().build_list("user", 5).unwrap();
	let b = define().structs().build_list("user", 5).unwrap();

	let names = |users: &[FactoryStruct]| -> Vec<String> {
		users
			.iter()
			.map(|u| u.get_as::<String>("first_name").unwrap())
			.collect()
	};
	assert_eq!(names(&a), names(&b));
}

#[rstest]
fn test_schema_violation_surfaces_from_build(mut harness: Harness) {
	// `email` is required by the relation but never declared.
	harness
		.factories
		.define("user", |f| {
			f.set("first_name", "Jane");
			f.set("last_name", "Doe");
			f.timestamps();
		})
		.unwrap();

	let result = harness.factories.build("user");
	assert!(matches!(
		result,
		Err(FactoryError::SchemaViolation(SchemaViolation::MissingColumn { column, .. }))
			if column == "email"
	));

	// The struct strategy never consults the store.
	assert!(harness.factories.structs().build("user").is_ok());
}

#[rstest]
fn test_structs_deserialize_into_user_types(mut harness: Harness) {
	#[derive(Debug, Deserialize)]
	struct User {
		id: i64,
		first_name: String,
		email: String,
	}

	harness
		.factories
		.define("user", |f| {
			f.set("first_name", "Jane");
			f.set("last_name", "Doe");
			f.sequence("email", |n| format!("jane{}@doe.org", n));
			f.timestamps();
		})
		.unwrap();

	let user: User = harness.factories.structs().build("user").unwrap().deserialize().unwrap();
	assert_eq!(user.id, 1);
	assert_eq!(user.first_name, "Jane");
	assert_eq!(user.email, "jane1@doe.org");

	let json = serde_json::to_value(harness.factories.structs().build("user").unwrap()).unwrap();
	assert_eq!(json["email"], "jane2@doe.org");
}
