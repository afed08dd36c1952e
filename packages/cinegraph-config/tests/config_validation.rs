use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use cinegraph_config::{Config, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

static COUNTER: AtomicU64 = AtomicU64::new(0);

fn parse_sample() -> Value {
	toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.")
}

fn table_mut<'a>(value: &'a mut Value, path: &[&str]) -> &'a mut toml::value::Table {
	let mut current = value;

	for key in path {
		current = current
			.as_table_mut()
			.and_then(|table| table.get_mut(*key))
			.unwrap_or_else(|| panic!("Sample config must include [{key}]."));
	}

	current.as_table_mut().expect("Expected a TOML table.")
}

fn write_temp_config(contents: &str) -> PathBuf {
	let stamp = SystemTime::now().duration_since(UNIX_EPOCH).expect("Clock error.").as_nanos();
	let unique = COUNTER.fetch_add(1, Ordering::SeqCst);
	let path = env::temp_dir().join(format!("cinegraph_config_{stamp}_{unique}.toml"));

	fs::write(&path, contents).expect("Failed to write temp config.");

	path
}

fn load_mutated(mutate: impl FnOnce(&mut Value)) -> Result<Config, Error> {
	let mut value = parse_sample();

	mutate(&mut value);

	let rendered = toml::to_string(&value).expect("Failed to render config.");
	let path = write_temp_config(&rendered);
	let result = cinegraph_config::load(&path);

	fs::remove_file(&path).ok();

	result
}

#[test]
fn sample_config_is_valid() {
	let cfg = load_mutated(|_| ()).expect("Sample config must validate.");

	assert_eq!(cfg.ranking.weights.genre, 10);
	assert_eq!(cfg.ranking.weights.release_year, 3);
	assert_eq!(cfg.search.label_language, "en");
}

#[test]
fn weights_default_when_omitted() {
	let cfg = load_mutated(|value| {
		let ranking = table_mut(value, &["ranking"]);

		ranking.remove("weights");
	})
	.expect("Config without explicit weights must validate.");

	assert_eq!(cfg.ranking.weights.actor, 6);
	assert_eq!(cfg.ranking.weights.country, 4);
}

#[test]
fn rejects_non_http_endpoint() {
	let err = load_mutated(|value| {
		let graphdb = table_mut(value, &["storage", "graphdb"]);

		graphdb.insert("endpoint".to_string(), Value::String("ftp://nope".to_string()));
	})
	.expect_err("Non-http endpoint must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_all_zero_weights() {
	let err = load_mutated(|value| {
		let weights = table_mut(value, &["ranking", "weights"]);

		for key in ["genre", "actor", "director", "country", "release_year"] {
			weights.insert(key.to_string(), Value::Integer(0));
		}
	})
	.expect_err("All-zero weights must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_candidate_limit_below_top_k() {
	let err = load_mutated(|value| {
		let search = table_mut(value, &["search"]);

		search.insert("candidate_limit".to_string(), Value::Integer(5));
		search.insert("default_top_k".to_string(), Value::Integer(10));
	})
	.expect_err("candidate_limit below default_top_k must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_non_positive_embedding_scale() {
	let err = load_mutated(|value| {
		let ranking = table_mut(value, &["ranking"]);

		ranking.insert("embedding_scale".to_string(), Value::Float(0.0));
	})
	.expect_err("Zero embedding_scale must be rejected.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn rejects_zero_cache_ttl_when_enabled() {
	let err = load_mutated(|value| {
		let cache = table_mut(value, &["search", "cache"]);

		cache.insert("ttl_secs".to_string(), Value::Integer(0));
	})
	.expect_err("Zero cache TTL must be rejected while the cache is enabled.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn blank_auth_token_normalizes_to_none() {
	let cfg = load_mutated(|value| {
		let security = table_mut(value, &["security"]);

		security.insert("api_auth_token".to_string(), Value::String("   ".to_string()));
	})
	.expect("Blank auth token must still validate.");

	assert!(cfg.security.api_auth_token.is_none());
}
