pub mod cache;
pub mod details;
pub mod entities;
pub mod movies;
pub mod similar;

mod error;

pub use error::{Error, Result};

use std::{future::Future, pin::Pin, sync::Arc};

use cinegraph_config::{Config, EmbeddingProviderConfig};
use cinegraph_providers::embedding;
use cinegraph_sparql::MovieFilter;
use cinegraph_store::SparqlStore;

pub use details::{MovieDetails, MovieDetailsRequest, MovieDetailsResponse};
pub use entities::{EntitySearchRequest, EntitySearchResponse};
pub use movies::{SearchMoviesRequest, SearchMoviesResponse};
pub use similar::{SimilarMoviesRequest, SimilarMoviesResponse};

use crate::cache::ResponseCache;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, cinegraph_providers::Result<Vec<f32>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}

struct DefaultProviders;

impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		text: &'a str,
	) -> BoxFuture<'a, cinegraph_providers::Result<Vec<f32>>> {
		Box::pin(embedding::embed_description(cfg, text))
	}
}

impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}

impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

/// One instance per process; every request pipeline is otherwise stateless,
/// the response cache being the only shared state.
pub struct CinegraphService {
	pub cfg: Config,
	pub store: SparqlStore,
	pub providers: Providers,
	cache: ResponseCache,
}
impl CinegraphService {
	pub fn new(cfg: Config, store: SparqlStore) -> Self {
		Self::with_providers(cfg, store, Providers::default())
	}

	pub fn with_providers(cfg: Config, store: SparqlStore, providers: Providers) -> Self {
		let cache = ResponseCache::new(&cfg.search.cache);

		Self { cfg, store, providers, cache }
	}

	pub(crate) fn cache(&self) -> &ResponseCache {
		&self.cache
	}

	/// Upstream connectivity probe; failures map to `connected = false`
	/// rather than an error, this is a diagnostic.
	pub async fn status(&self) -> StatusResponse {
		match self.store.ask(cinegraph_sparql::ask_probe_query()).await {
			Ok(connected) => StatusResponse { connected },
			Err(err) => {
				tracing::warn!(error = %err, "Connectivity probe failed.");

				StatusResponse { connected: false }
			},
		}
	}

	pub fn clear_cache(&self) -> usize {
		self.cache.clear()
	}

	pub(crate) fn resolve_limit(&self, limit: Option<u32>) -> Result<u32> {
		let limit = limit.unwrap_or(self.cfg.search.default_top_k);

		if limit == 0 {
			return Err(Error::InvalidRequest {
				message: "limit must be greater than zero.".to_string(),
			});
		}

		Ok(limit.min(self.cfg.storage.graphdb.max_results))
	}

	/// Candidate pool size for re-ranked queries: at least the requested
	/// limit, at most the configured result cap.
	pub(crate) fn candidate_limit(&self, limit: u32) -> u32 {
		self.cfg.search.candidate_limit.max(limit).min(self.cfg.storage.graphdb.max_results)
	}
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StatusResponse {
	pub connected: bool,
}

pub(crate) fn parse_filters(
	filters: &std::collections::BTreeMap<String, Vec<String>>,
) -> Result<Vec<MovieFilter>> {
	let mut out = Vec::with_capacity(filters.len());

	for (name, values) in filters {
		let Some(attribute) = cinegraph_domain::MovieAttribute::parse(name) else {
			return Err(Error::InvalidRequest {
				message: format!("Unknown filter attribute: {name}."),
			});
		};

		if values.is_empty() {
			continue;
		}

		out.push(MovieFilter { attribute, values: values.clone() });
	}

	Ok(out)
}
