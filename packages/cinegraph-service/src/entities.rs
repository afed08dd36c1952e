use std::collections::HashSet;

use cinegraph_domain::{EntityKind, EntityRef};
use cinegraph_sparql::entity_search_query;
use cinegraph_store::results;

use crate::{CinegraphService, Error, Result, cache::ResponseCache};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EntitySearchRequest {
	pub kind: String,
	pub name: Option<String>,
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EntitySearchResponse {
	pub items: Vec<EntityRef>,
}

impl CinegraphService {
	/// Label search over one entity class. Labels are capitalized and
	/// deduplicated, so "drama film" and "Drama film" collapse to one entry.
	pub async fn search_entities(&self, request: EntitySearchRequest) -> Result<EntitySearchResponse> {
		let Some(kind) = EntityKind::parse(&request.kind) else {
			return Err(Error::InvalidRequest {
				message: format!("Unknown entity kind: {}.", request.kind),
			});
		};
		let cache_key = ResponseCache::key("search_entities", &request);

		if let Some(cached) = self.cache().get::<EntitySearchResponse>(&cache_key) {
			tracing::debug!("Serving entity search response from cache.");

			return Ok(cached);
		}

		let limit = self.resolve_limit(request.limit)?;
		let query = entity_search_query(
			kind,
			request.name.as_deref(),
			&self.cfg.search.label_language,
			limit,
		)?;
		let rows = self.store.select(&query).await?;
		let mut seen = HashSet::new();
		let mut items = Vec::new();

		for entity in results::entities_from_rows(rows) {
			let label = capitalize(&entity.label);

			if seen.insert(label.clone()) {
				items.push(EntityRef { uri: entity.uri, label });
			}
		}

		let response = EntitySearchResponse { items };

		self.cache().put(cache_key, &response);

		Ok(response)
	}
}

fn capitalize(label: &str) -> String {
	let mut chars = label.chars();

	match chars.next() {
		None => String::new(),
		Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
	}
}
