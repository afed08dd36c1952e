use std::collections::HashSet;

use cinegraph_sparql::movie_details_query;
use cinegraph_store::BindingRow;

use crate::{CinegraphService, Result, cache::ResponseCache};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MovieDetailsRequest {
	pub uris: Vec<String>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct MovieDetails {
	pub uri: String,
	pub title: String,
	#[serde(rename = "abstract")]
	pub abstract_text: String,
	pub runtime: String,
	pub budget: String,
	pub box_office: String,
	pub release_year: String,
	pub country: String,
	pub genres: String,
	pub starring: String,
	pub directors: String,
	pub producers: String,
	pub writers: String,
	pub composers: String,
	pub cinematographers: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MovieDetailsResponse {
	pub items: Vec<MovieDetails>,
}

impl CinegraphService {
	pub async fn movie_details(&self, request: MovieDetailsRequest) -> Result<MovieDetailsResponse> {
		let cache_key = ResponseCache::key("movie_details", &request);

		if let Some(cached) = self.cache().get::<MovieDetailsResponse>(&cache_key) {
			tracing::debug!("Serving movie details response from cache.");

			return Ok(cached);
		}

		let query = movie_details_query(&request.uris, &self.cfg.search.label_language)?;
		let rows = self.store.select(&query).await?;
		let mut seen = HashSet::new();
		let mut items = Vec::new();

		for row in rows {
			let Some(uri) = row.get("movie") else {
				tracing::warn!("Details row is missing the movie binding.");

				continue;
			};

			if !seen.insert(uri.clone()) {
				continue;
			}

			items.push(details_from_row(uri.clone(), &row));
		}

		let response = MovieDetailsResponse { items };

		self.cache().put(cache_key, &response);

		Ok(response)
	}
}

fn details_from_row(uri: String, row: &BindingRow) -> MovieDetails {
	let field = |name: &str| row.get(name).cloned().unwrap_or_default();

	MovieDetails {
		uri,
		title: field("title"),
		abstract_text: field("abstract"),
		runtime: field("runtime"),
		budget: field("budget"),
		box_office: field("boxOffice"),
		release_year: field("releaseYear"),
		country: field("countryLabel"),
		genres: field("genres"),
		starring: field("starring"),
		directors: field("directors"),
		producers: field("producers"),
		writers: field("writers"),
		composers: field("composers"),
		cinematographers: field("cinematographers"),
	}
}
