//! Naming helpers for relation inference and struct type names.

/// Irregular plural forms, singular first.
const IRREGULAR: &[(&str, &str)] = &[
	("person", "people"),
	("child", "children"),
	("man", "men"),
	("woman", "women"),
	("mouse", "mice"),
	("goose", "geese"),
	("ox", "oxen"),
];

/// Words whose plural is the word itself.
const UNCOUNTABLE: &[&str] = &["equipment", "information", "money", "series", "species", "sheep", "fish"];

/// Pluralizes an English snake_case noun.
///
/// Only the last segment of a snake_case name is inflected.
///
/// # Examples
///
/// ```
/// use kiln_factory::inflection::pluralize;
///
/// assert_eq!(pluralize("user"), "users");
/// assert_eq!(pluralize("category"), "categories");
/// assert_eq!(pluralize("address"), "addresses");
/// assert_eq!(pluralize("admin_person"), "admin_people");
/// ```
pub fn pluralize(word: &str) -> String {
	if word.is_empty() {
		return String::new();
	}

	let (prefix, last) = match word.rfind('_') {
		Some(idx) => word.split_at(idx + 1),
		None => ("", word),
	};
	let lower = last.to_ascii_lowercase();

	if UNCOUNTABLE.contains(&lower.as_str()) {
		return word.to_string();
	}
	if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
		return format!("{}{}", prefix, plural);
	}
	if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
		return word.to_string();
	}

	let plural = if lower.ends_with("ss")
		|| lower.ends_with("us")
		|| lower.ends_with('x')
		|| lower.ends_with('z')
		|| lower.ends_with("ch")
		|| lower.ends_with("sh")
	{
		format!("{}es", last)
	} else if lower.len() > 2 && lower.ends_with("is") {
		format!("{}es", &last[..last.len() - 2])
	} else if lower.ends_with('s') {
		last.to_string()
	} else if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
		format!("{}ies", &last[..last.len() - 1])
	} else {
		format!("{}s", last)
	};

	format!("{}{}", prefix, plural)
}

fn ends_with_vowel_y(word: &str) -> bool {
	let bytes = word.as_bytes();
	bytes.len() >= 2 && matches!(bytes[bytes.len() - 2], b'a' | b'e' | b'i' | b'o' | b'u')
}

/// Converts a string to PascalCase.
///
/// # Examples
///
/// ```
/// use kiln_factory::inflection::to_pascal_case;
///
/// assert_eq!(to_pascal_case("user"), "User");
/// assert_eq!(to_pascal_case("admin_user"), "AdminUser");
/// assert_eq!(to_pascal_case("ADMIN_USER"), "AdminUser");
/// ```
pub fn to_pascal_case(s: &str) -> String {
	let mut result = String::with_capacity(s.len());
	let mut capitalize_next = true;
	let mut prev_was_upper = false;

	for ch in s.chars() {
		if ch == '_' || ch == '-' || ch == ' ' || ch == '.' {
			capitalize_next = true;
			prev_was_upper = false;
		} else if ch.is_ascii_uppercase() {
			if prev_was_upper {
				result.push(ch.to_ascii_lowercase());
			} else {
				result.push(ch);
			}
			capitalize_next = false;
			prev_was_upper = true;
		} else if capitalize_next {
			result.push(ch.to_ascii_uppercase());
			capitalize_next = false;
			prev_was_upper = false;
		} else {
			result.push(ch.to_ascii_lowercase());
			prev_was_upper = false;
		}
	}

	result
}

/// Candidate relation names for a factory name, most likely first.
pub(crate) fn relation_candidates(factory: &str) -> Vec<String> {
	let plural = pluralize(factory);
	if plural == factory {
		vec![plural]
	} else {
		vec![plural, factory.to_string()]
	}
}
