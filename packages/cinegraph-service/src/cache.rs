use std::{
	collections::HashMap,
	sync::Mutex,
	time::{Duration, Instant},
};

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use cinegraph_config::SearchCache;

/// In-memory TTL cache for successful responses, keyed by a digest of the
/// normalized request. Errors are never stored, so a hit can never mask a
/// failure as an empty result.
pub struct ResponseCache {
	enabled: bool,
	ttl: Duration,
	max_entries: usize,
	entries: Mutex<HashMap<String, CacheEntry>>,
}

struct CacheEntry {
	inserted_at: Instant,
	payload: Value,
}

impl ResponseCache {
	pub fn new(cfg: &SearchCache) -> Self {
		Self {
			enabled: cfg.enabled,
			ttl: Duration::from_secs(cfg.ttl_secs),
			max_entries: cfg.max_entries as usize,
			entries: Mutex::new(HashMap::new()),
		}
	}

	/// Stable cache key: operation name plus the request serialized with its
	/// struct field order, digested so keys stay short.
	pub fn key(operation: &str, request: &impl Serialize) -> String {
		let payload = serde_json::to_vec(request).unwrap_or_default();
		let mut hasher = blake3::Hasher::new();

		hasher.update(operation.as_bytes());
		hasher.update(b"\x00");
		hasher.update(&payload);

		hasher.finalize().to_hex().to_string()
	}

	pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
		if !self.enabled {
			return None;
		}

		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let entry = entries.get(key)?;

		if entry.inserted_at.elapsed() > self.ttl {
			entries.remove(key);

			return None;
		}

		serde_json::from_value(entry.payload.clone()).ok()
	}

	pub fn put(&self, key: String, value: &impl Serialize) {
		if !self.enabled {
			return;
		}

		let Ok(payload) = serde_json::to_value(value) else { return };
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		if entries.len() >= self.max_entries && !entries.contains_key(&key) {
			let oldest = entries
				.iter()
				.min_by_key(|(_, entry)| entry.inserted_at)
				.map(|(key, _)| key.clone());

			if let Some(oldest) = oldest {
				entries.remove(&oldest);
			}
		}

		entries.insert(key, CacheEntry { inserted_at: Instant::now(), payload });
	}

	/// Drops every entry; returns how many were removed.
	pub fn clear(&self) -> usize {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let removed = entries.len();

		entries.clear();

		removed
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn cache(enabled: bool, max_entries: u32) -> ResponseCache {
		ResponseCache::new(&SearchCache { enabled, ttl_secs: 300, max_entries })
	}

	#[test]
	fn round_trips_serializable_values() {
		let cache = cache(true, 8);
		let key = ResponseCache::key("test", &vec!["a", "b"]);

		assert_eq!(cache.get::<Vec<String>>(&key), None);

		cache.put(key.clone(), &vec!["a".to_string(), "b".to_string()]);

		assert_eq!(
			cache.get::<Vec<String>>(&key),
			Some(vec!["a".to_string(), "b".to_string()])
		);
	}

	#[test]
	fn disabled_cache_stores_nothing() {
		let cache = cache(false, 8);
		let key = ResponseCache::key("test", &1_u32);

		cache.put(key.clone(), &1_u32);

		assert_eq!(cache.get::<u32>(&key), None);
	}

	#[test]
	fn distinct_requests_get_distinct_keys() {
		let left = ResponseCache::key("similar", &("a", 1));
		let right = ResponseCache::key("similar", &("a", 2));
		let other_op = ResponseCache::key("search", &("a", 1));

		assert_ne!(left, right);
		assert_ne!(left, other_op);
	}

	#[test]
	fn evicts_oldest_entry_at_capacity() {
		let cache = cache(true, 2);

		cache.put("first".to_string(), &1_u32);
		cache.put("second".to_string(), &2_u32);
		cache.put("third".to_string(), &3_u32);

		let survivors = [
			cache.get::<u32>("first"),
			cache.get::<u32>("second"),
			cache.get::<u32>("third"),
		];

		assert_eq!(survivors.iter().flatten().count(), 2);
		assert_eq!(cache.get::<u32>("third"), Some(3));
	}

	#[test]
	fn clear_empties_the_cache() {
		let cache = cache(true, 8);

		cache.put("key".to_string(), &1_u32);

		assert_eq!(cache.clear(), 1);
		assert_eq!(cache.get::<u32>("key"), None);
	}
}
