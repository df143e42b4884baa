//! Options accepted by `define`.

/// Name, relation and parent of a factory being defined.
///
/// Plain names and `(name, parent)` pairs convert into a definition, so the
/// common cases stay short:
///
/// ```
/// use kiln_factory::Definition;
///
/// let user = Definition::from("user");
/// assert_eq!(user.name(), "user");
/// assert_eq!(user.parent(), None);
///
/// // `jane` is a trait of `user`.
/// let jane = Definition::from(("jane", "user"));
/// assert_eq!(jane.parent(), Some("user"));
///
/// let admin = Definition::new("admin").relation("users");
/// assert_eq!(admin.explicit_relation(), Some("users"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
	name: String,
	relation: Option<String>,
	parent: Option<String>,
}

impl Definition {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			relation: None,
			parent: None,
		}
	}

	/// Binds the factory to an explicit relation.
	pub fn relation(mut self, relation: impl Into<String>) -> Self {
		self.relation = Some(relation.into());
		self
	}

	/// Declares the factory as a trait of an already registered factory.
	pub fn trait_of(mut self, parent: impl Into<String>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn explicit_relation(&self) -> Option<&str> {
		self.relation.as_deref()
	}

	pub fn parent(&self) -> Option<&str> {
		self.parent.as_deref()
	}
}

impl From<&str> for Definition {
	fn from(name: &str) -> Self {
		Self::new(name)
	}
}

impl From<String> for Definition {
	fn from(name: String) -> Self {
		Self::new(name)
	}
}

impl From<(&str, &str)> for Definition {
	fn from((name, parent): (&str, &str)) -> Self {
		Self::new(name).trait_of(parent)
	}
}
