use crate::{Error, Result};

/// Escapes a user-supplied value for embedding in a quoted SPARQL string
/// literal. Every character that could terminate the literal or smuggle in
/// extra query syntax is escaped, so filter values can never rewrite the
/// query around them.
pub fn escape_literal(value: &str) -> String {
	let mut out = String::with_capacity(value.len());

	for ch in value.chars() {
		match ch {
			'\\' => out.push_str("\\\\"),
			'"' => out.push_str("\\\""),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			_ => out.push(ch),
		}
	}

	out
}

/// Validates that a value can be wrapped in `<...>` as an absolute IRI.
/// Rejects anything that could escape the angle brackets or that lacks a
/// scheme; the check happens before any network call.
pub fn validate_iri(value: &str) -> Result<&str> {
	let trimmed = value.trim();

	if trimmed.is_empty() || !trimmed.contains(':') {
		return Err(Error::InvalidIri { value: value.to_string() });
	}

	let forbidden = trimmed.chars().any(|ch| {
		ch.is_whitespace()
			|| ch.is_control()
			|| matches!(ch, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\')
	});

	if forbidden {
		return Err(Error::InvalidIri { value: value.to_string() });
	}

	Ok(trimmed)
}
