mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, GraphDb, Providers, Ranking, RankingWeights, Search,
	SearchCache, Security, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.service.admin_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.admin_bind must be non-empty.".to_string(),
		});
	}

	let endpoint = cfg.storage.graphdb.endpoint.trim();

	if endpoint.is_empty() {
		return Err(Error::Validation {
			message: "storage.graphdb.endpoint must be non-empty.".to_string(),
		});
	}
	if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
		return Err(Error::Validation {
			message: "storage.graphdb.endpoint must be an http(s) URL.".to_string(),
		});
	}
	if cfg.storage.graphdb.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "storage.graphdb.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.graphdb.max_results == 0 {
		return Err(Error::Validation {
			message: "storage.graphdb.max_results must be greater than zero.".to_string(),
		});
	}

	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "providers.embedding.api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}

	if cfg.search.default_top_k == 0 {
		return Err(Error::Validation {
			message: "search.default_top_k must be greater than zero.".to_string(),
		});
	}
	if cfg.search.candidate_limit < cfg.search.default_top_k {
		return Err(Error::Validation {
			message: "search.candidate_limit must be at least search.default_top_k.".to_string(),
		});
	}
	if cfg.search.candidate_limit > cfg.storage.graphdb.max_results {
		return Err(Error::Validation {
			message: "search.candidate_limit must not exceed storage.graphdb.max_results."
				.to_string(),
		});
	}
	if cfg.search.label_language.trim().is_empty() {
		return Err(Error::Validation {
			message: "search.label_language must be non-empty.".to_string(),
		});
	}
	if cfg.search.cache.enabled {
		if cfg.search.cache.ttl_secs == 0 {
			return Err(Error::Validation {
				message: "search.cache.ttl_secs must be greater than zero.".to_string(),
			});
		}
		if cfg.search.cache.max_entries == 0 {
			return Err(Error::Validation {
				message: "search.cache.max_entries must be greater than zero.".to_string(),
			});
		}
	}

	let weights = &cfg.ranking.weights;
	let all_zero = weights.genre == 0
		&& weights.actor == 0
		&& weights.director == 0
		&& weights.country == 0
		&& weights.release_year == 0;

	if all_zero {
		return Err(Error::Validation {
			message: "At least one ranking weight must be greater than zero.".to_string(),
		});
	}
	if !cfg.ranking.embedding_scale.is_finite() {
		return Err(Error::Validation {
			message: "ranking.embedding_scale must be a finite number.".to_string(),
		});
	}
	if cfg.ranking.embedding_scale <= 0.0 {
		return Err(Error::Validation {
			message: "ranking.embedding_scale must be greater than zero.".to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let trimmed = cfg.storage.graphdb.endpoint.trim().to_string();

	if trimmed != cfg.storage.graphdb.endpoint {
		cfg.storage.graphdb.endpoint = trimmed;
	}
	if cfg
		.security
		.api_auth_token
		.as_deref()
		.map(|token| token.trim().is_empty())
		.unwrap_or(false)
	{
		cfg.security.api_auth_token = None;
	}
}
