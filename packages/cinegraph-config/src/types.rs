use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	pub search: Search,
	#[serde(default)]
	pub ranking: Ranking,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub graphdb: GraphDb,
}

#[derive(Debug, Deserialize)]
pub struct GraphDb {
	/// Full SPARQL endpoint URL including the repository path, e.g.
	/// "http://localhost:7200/repositories/movies".
	pub endpoint: String,
	pub timeout_ms: u64,
	/// Hard cap applied to every generated query's LIMIT clause.
	pub max_results: u32,
	#[serde(default = "default_retry_attempts")]
	pub retry_attempts: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	/// Pool size fetched for re-ranking; must be at least `default_top_k`
	/// since embedding similarity may promote rows the graph score demoted.
	pub candidate_limit: u32,
	pub default_top_k: u32,
	/// Language tag required on entity labels, e.g. "en".
	#[serde(default = "default_label_language")]
	pub label_language: String,
	#[serde(default)]
	pub cache: SearchCache,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SearchCache {
	pub enabled: bool,
	pub ttl_secs: u64,
	pub max_entries: u32,
}
impl Default for SearchCache {
	fn default() -> Self {
		Self { enabled: true, ttl_secs: 300, max_entries: 1_024 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Ranking {
	pub weights: RankingWeights,
	/// Scale applied to cosine similarity after shifting it into [0, 2]:
	/// `scaled = (cosine + 1) * embedding_scale`.
	pub embedding_scale: f32,
}
impl Default for Ranking {
	fn default() -> Self {
		Self { weights: RankingWeights::default(), embedding_scale: 50.0 }
	}
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
	pub genre: u32,
	pub actor: u32,
	pub director: u32,
	pub country: u32,
	pub release_year: u32,
}
impl Default for RankingWeights {
	fn default() -> Self {
		Self { genre: 10, actor: 6, director: 5, country: 4, release_year: 3 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	pub api_auth_token: Option<String>,
}

fn default_retry_attempts() -> u32 {
	1
}

fn default_label_language() -> String {
	"en".to_string()
}
