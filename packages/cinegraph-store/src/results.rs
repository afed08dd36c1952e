use std::collections::HashMap;

use serde_json::Value;

use cinegraph_domain::{Candidate, EntityRef};

use crate::{Error, Result};

/// One result row, variable name to plain string value. Type and language
/// annotations are dropped; the queries constrain both already.
pub type BindingRow = HashMap<String, String>;

pub fn parse_select_response(json: &Value) -> Result<Vec<BindingRow>> {
	let bindings = json
		.get("results")
		.and_then(|results| results.get("bindings"))
		.and_then(Value::as_array)
		.ok_or_else(|| Error::MalformedResponse {
			message: "SELECT response is missing results.bindings.".to_string(),
		})?;

	let mut rows = Vec::with_capacity(bindings.len());

	for binding in bindings {
		let Some(object) = binding.as_object() else {
			return Err(Error::MalformedResponse {
				message: "Binding row is not an object.".to_string(),
			});
		};
		let mut row = BindingRow::with_capacity(object.len());

		for (var, cell) in object {
			let Some(value) = cell.get("value").and_then(Value::as_str) else {
				return Err(Error::MalformedResponse {
					message: format!("Binding for ?{var} is missing a value."),
				});
			};

			row.insert(var.clone(), value.to_string());
		}

		rows.push(row);
	}

	Ok(rows)
}

/// Converts similarity/search rows into candidates. Rows without the movie
/// URI or title are dropped with a warning; a missing `graphScore` (the
/// no-target query) scores 0.
pub fn candidates_from_rows(rows: Vec<BindingRow>) -> Vec<Candidate> {
	let mut out = Vec::with_capacity(rows.len());

	for mut row in rows {
		let Some(uri) = row.remove("movie") else {
			tracing::warn!("Result row is missing the movie binding.");

			continue;
		};
		let Some(label) = row.remove("title") else {
			tracing::warn!(uri = %uri, "Result row is missing the title binding.");

			continue;
		};
		let graph_score = match row.get("graphScore") {
			None => 0,
			Some(raw) => match raw.parse::<f64>() {
				Ok(score) => score.round() as i64,
				Err(_) => {
					tracing::warn!(uri = %uri, score = %raw, "Unparseable graph score.");

					0
				},
			},
		};

		out.push(Candidate { uri, label, embedding: row.remove("embedding"), graph_score });
	}

	out
}

pub fn entities_from_rows(rows: Vec<BindingRow>) -> Vec<EntityRef> {
	let mut out = Vec::with_capacity(rows.len());

	for mut row in rows {
		let (Some(uri), Some(label)) = (row.remove("entity"), row.remove("label")) else {
			tracing::warn!("Entity row is missing a binding.");

			continue;
		};

		out.push(EntityRef { uri, label });
	}

	out
}

pub fn first_label(rows: &[BindingRow]) -> Option<&str> {
	rows.iter().find_map(|row| row.get("label")).map(String::as_str)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_response() -> Value {
		serde_json::json!({
			"head": { "vars": ["movie", "title", "embedding", "graphScore"] },
			"results": {
				"bindings": [
					{
						"movie": { "type": "uri", "value": "http://x.test/a" },
						"title": { "type": "literal", "xml:lang": "en", "value": "A" },
						"embedding": { "type": "literal", "value": "[1.0, 0.0]" },
						"graphScore": {
							"type": "literal",
							"datatype": "http://www.w3.org/2001/XMLSchema#integer",
							"value": "15"
						}
					},
					{
						"movie": { "type": "uri", "value": "http://x.test/b" },
						"title": { "type": "literal", "xml:lang": "en", "value": "B" }
					}
				]
			}
		})
	}

	#[test]
	fn parses_rows_and_optional_bindings() {
		let rows = parse_select_response(&sample_response()).unwrap();

		assert_eq!(rows.len(), 2);
		assert_eq!(rows[0].get("graphScore").map(String::as_str), Some("15"));
		assert!(!rows[1].contains_key("graphScore"));
	}

	#[test]
	fn rejects_shapeless_payloads() {
		let err = parse_select_response(&serde_json::json!({ "boolean": true })).unwrap_err();

		assert!(matches!(err, Error::MalformedResponse { .. }));
	}

	#[test]
	fn builds_candidates_with_defaulted_scores() {
		let rows = parse_select_response(&sample_response()).unwrap();
		let candidates = candidates_from_rows(rows);

		assert_eq!(candidates.len(), 2);
		assert_eq!(candidates[0].graph_score, 15);
		assert_eq!(candidates[0].embedding.as_deref(), Some("[1.0, 0.0]"));
		assert_eq!(candidates[1].graph_score, 0);
		assert_eq!(candidates[1].embedding, None);
	}

	#[test]
	fn drops_rows_without_movie_binding() {
		let rows = vec![BindingRow::from([("title".to_string(), "Orphan".to_string())])];

		assert!(candidates_from_rows(rows).is_empty());
	}

	#[test]
	fn extracts_entity_refs() {
		let rows = vec![BindingRow::from([
			("entity".to_string(), "http://x.test/genre/Drama".to_string()),
			("label".to_string(), "drama film".to_string()),
		])];
		let entities = entities_from_rows(rows);

		assert_eq!(entities, vec![EntityRef {
			uri: "http://x.test/genre/Drama".to_string(),
			label: "drama film".to_string(),
		}]);
	}
}
