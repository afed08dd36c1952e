use std::collections::BTreeMap;

use cinegraph_domain::EntityRef;
use cinegraph_sparql::filter_movies_query;
use cinegraph_store::results;

use crate::{CinegraphService, Result, cache::ResponseCache, parse_filters};

/// Plain attribute search, no similarity ranking. The original behavior when
/// no target movie is given: rows come back in label order with no score.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchMoviesRequest {
	#[serde(default)]
	pub filters: BTreeMap<String, Vec<String>>,
	pub start_year: Option<i32>,
	pub end_year: Option<i32>,
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchMoviesResponse {
	pub trace_id: uuid::Uuid,
	pub items: Vec<EntityRef>,
}

impl CinegraphService {
	pub async fn search_movies(&self, request: SearchMoviesRequest) -> Result<SearchMoviesResponse> {
		let cache_key = ResponseCache::key("search_movies", &request);

		if let Some(cached) = self.cache().get::<SearchMoviesResponse>(&cache_key) {
			tracing::debug!("Serving movie search response from cache.");

			return Ok(cached);
		}

		let limit = self.resolve_limit(request.limit)?;
		let filters = parse_filters(&request.filters)?;
		let query = filter_movies_query(
			&filters,
			request.start_year,
			request.end_year,
			&self.cfg.search.label_language,
			limit,
			false,
		)?;
		let rows = self.store.select(&query).await?;
		let items = results::candidates_from_rows(rows)
			.into_iter()
			.map(|candidate| EntityRef { uri: candidate.uri, label: candidate.label })
			.collect();
		let response = SearchMoviesResponse { trace_id: uuid::Uuid::new_v4(), items };

		self.cache().put(cache_key, &response);

		Ok(response)
	}
}
