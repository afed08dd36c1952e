use std::collections::BTreeMap;

use cinegraph_domain::{
	RankedMovie,
	ranking::{assemble, rank_against_target, rank_by_embedding, rank_without_target, sort_ranked},
};
use cinegraph_sparql::{MovieFilter, entity_label_query, filter_movies_query, similar_movies_query};
use cinegraph_store::results;

use crate::{CinegraphService, Error, Result, cache::ResponseCache, parse_filters};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimilarMoviesRequest {
	/// URI of the movie the search is anchored to. Either this or
	/// `description` must be present.
	pub target_uri: Option<String>,
	/// Free-text plot description. When present the ranking anchors on its
	/// embedding instead of a target entity's.
	pub description: Option<String>,
	/// Attribute name to values, e.g. `{"genre": ["drama"]}`. Sorted map so
	/// equivalent requests produce equal cache keys.
	#[serde(default)]
	pub filters: BTreeMap<String, Vec<String>>,
	pub start_year: Option<i32>,
	pub end_year: Option<i32>,
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SimilarMoviesResponse {
	pub trace_id: uuid::Uuid,
	/// False when no usable target embedding was available and results were
	/// ordered by graph score alone.
	pub embedding_applied: bool,
	/// False when scores are raw combined values instead of the
	/// target-relative [0, 10] scale.
	pub normalized: bool,
	pub items: Vec<RankedMovie>,
}

impl CinegraphService {
	pub async fn similar_movies(
		&self,
		request: SimilarMoviesRequest,
	) -> Result<SimilarMoviesResponse> {
		let cache_key = ResponseCache::key("similar_movies", &request);

		if let Some(cached) = self.cache().get::<SimilarMoviesResponse>(&cache_key) {
			tracing::debug!("Serving similar-movies response from cache.");

			return Ok(cached);
		}

		let limit = self.resolve_limit(request.limit)?;
		let filters = parse_filters(&request.filters)?;

		// A plot description, when present, becomes the ranking anchor even
		// if a target movie is also named: scoring is cosine-only because
		// attribute-match weights need a target row, not free text.
		let response = match (&request.target_uri, &request.description) {
			(target_uri, Some(description)) => {
				let target_uri = target_uri.as_deref();

				self.similar_by_description(description, target_uri, &request, &filters, limit)
					.await?
			},
			(Some(target_uri), None) => {
				self.similar_by_target(target_uri, &request, &filters, limit).await?
			},
			(None, None) => {
				return Err(Error::InvalidRequest {
					message: "Either target_uri or description is required.".to_string(),
				});
			},
		};

		self.cache().put(cache_key, &response);

		Ok(response)
	}

	async fn similar_by_target(
		&self,
		target_uri: &str,
		request: &SimilarMoviesRequest,
		filters: &[MovieFilter],
		limit: u32,
	) -> Result<SimilarMoviesResponse> {
		let query = similar_movies_query(
			target_uri,
			filters,
			request.start_year,
			request.end_year,
			&self.cfg.ranking.weights,
			&self.cfg.search.label_language,
			self.candidate_limit(limit),
		)?;

		tracing::debug!(target = %target_uri, "Executing similarity query.");

		let rows = self.store.select(&query).await?;
		let candidates = results::candidates_from_rows(rows);

		match rank_against_target(&candidates, target_uri, self.cfg.ranking.embedding_scale) {
			Some(outcome) => Ok(SimilarMoviesResponse {
				trace_id: uuid::Uuid::new_v4(),
				embedding_applied: outcome.embedding_applied,
				normalized: outcome.normalized,
				items: assemble(outcome.items, limit as usize),
			}),
			// The target shared nothing with itself in the graph (no scored
			// attributes), so the positive-score cut dropped it. Distinguish
			// an attribute-less target from one the store has never seen.
			None => {
				let label = self.fetch_target_label(target_uri).await?;
				let mut items = rank_without_target(&candidates);

				items.push(RankedMovie {
					uri: target_uri.to_string(),
					label,
					graph_score: 0,
					embedding_similarity: None,
					total_score: 0.0,
					is_target: true,
				});
				sort_ranked(&mut items);

				Ok(SimilarMoviesResponse {
					trace_id: uuid::Uuid::new_v4(),
					embedding_applied: false,
					normalized: false,
					items: assemble(items, limit as usize),
				})
			},
		}
	}

	async fn similar_by_description(
		&self,
		description: &str,
		target_uri: Option<&str>,
		request: &SimilarMoviesRequest,
		filters: &[MovieFilter],
		limit: u32,
	) -> Result<SimilarMoviesResponse> {
		if description.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "description must be non-empty.".to_string(),
			});
		}

		let query = filter_movies_query(
			filters,
			request.start_year,
			request.end_year,
			&self.cfg.search.label_language,
			self.candidate_limit(limit),
			true,
		)?;
		let rows = self.store.select(&query).await?;
		let candidates = results::candidates_from_rows(rows);
		let vector =
			self.providers.embedding.embed(&self.cfg.providers.embedding, description).await?;
		let mut items = rank_by_embedding(&candidates, &vector);

		// A target named alongside a description keeps its visibility
		// guarantee, but its score is the description-cosine like everyone
		// else's.
		if let Some(target_uri) = target_uri {
			for item in &mut items {
				if item.uri == target_uri {
					item.is_target = true;
				}
			}
		}

		Ok(SimilarMoviesResponse {
			trace_id: uuid::Uuid::new_v4(),
			embedding_applied: true,
			normalized: false,
			items: assemble(items, limit as usize),
		})
	}

	async fn fetch_target_label(&self, target_uri: &str) -> Result<String> {
		let query = entity_label_query(target_uri, &self.cfg.search.label_language)?;
		let rows = self.store.select(&query).await?;

		results::first_label(&rows).map(str::to_string).ok_or_else(|| Error::NotFound {
			message: format!("Target movie is not in the knowledge base: {target_uri}."),
		})
	}
}
