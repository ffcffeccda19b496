use std::{collections::HashMap, sync::Mutex};

use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{Error, Result, search::SearchResponse};

struct CacheEntry {
	response: SearchResponse,
	created_at: OffsetDateTime,
}

/// Memoizes full pipeline output per user + normalized query + options.
/// Values are stored and returned as owned clones on both paths, so a caller
/// mutating a returned response can never corrupt the cached copy. Safe for
/// concurrent use; writes are last-write-wins per key.
pub(crate) struct ResultCache {
	ttl: Duration,
	max_per_user: usize,
	inner: Mutex<HashMap<String, HashMap<String, CacheEntry>>>,
}

impl ResultCache {
	pub(crate) fn new(ttl_secs: i64, max_per_user: u32) -> Self {
		Self {
			ttl: Duration::seconds(ttl_secs),
			max_per_user: max_per_user as usize,
			inner: Mutex::new(HashMap::new()),
		}
	}

	/// Normalized cache key: whitespace and case differences in the query,
	/// and equivalent option values, collapse to the same entry.
	pub(crate) fn key(query: &str, page: u32, per_page: u32, icp_enabled: bool) -> Result<String> {
		let payload = serde_json::json!({
			"query": query.trim().to_lowercase(),
			"page": page,
			"per_page": per_page,
			"icp_enabled": icp_enabled,
		});
		let raw = serde_json::to_vec(&payload).map_err(|err| Error::Internal {
			message: format!("Failed to encode cache key payload: {err}"),
		})?;
		let hash = blake3::hash(&raw).to_hex().to_string();
		let len = hash.len().min(16);

		Ok(hash[..len].to_string())
	}

	pub(crate) fn get(&self, user_id: &str, key: &str, now: OffsetDateTime) -> Option<SearchResponse> {
		let inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
		let entry = inner.get(user_id)?.get(key)?;

		if entry.created_at + self.ttl <= now {
			return None;
		}

		Some(entry.response.clone())
	}

	pub(crate) fn set(
		&self,
		user_id: &str,
		key: String,
		response: &SearchResponse,
		now: OffsetDateTime,
	) {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
		let user_entries = inner.entry(user_id.to_string()).or_default();

		if user_entries.len() >= self.max_per_user && !user_entries.contains_key(&key) {
			let oldest = user_entries
				.iter()
				.min_by_key(|(_, entry)| entry.created_at)
				.map(|(key, _)| key.clone());

			if let Some(oldest) = oldest {
				user_entries.remove(&oldest);

				debug!(user_id, "Result cache at capacity; evicted oldest entry.");
			}
		}

		user_entries.insert(key, CacheEntry { response: response.clone(), created_at: now });
	}

	pub(crate) fn invalidate_user(&self, user_id: &str) {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());

		if inner.remove(user_id).is_some() {
			debug!(user_id, "Invalidated result cache for user.");
		}
	}

	pub(crate) fn invalidate_query(&self, user_id: &str, key: &str) {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());

		if let Some(user_entries) = inner.get_mut(user_id) {
			user_entries.remove(key);
		}
	}

	/// Removes expired entries regardless of access. Returns the number of
	/// entries dropped.
	pub(crate) fn sweep(&self, now: OffsetDateTime) -> usize {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
		let mut removed = 0;

		for user_entries in inner.values_mut() {
			let before = user_entries.len();

			user_entries.retain(|_, entry| entry.created_at + self.ttl > now);

			removed += before - user_entries.len();
		}

		inner.retain(|_, user_entries| !user_entries.is_empty());

		removed
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::search::SearchResponse;

	fn response(query: &str) -> SearchResponse {
		SearchResponse { query: query.to_string(), ..Default::default() }
	}

	#[test]
	fn key_normalizes_query_text() {
		let a = ResultCache::key("  VP of Sales in Austin ", 1, 25, true).expect("key");
		let b = ResultCache::key("vp of sales in austin", 1, 25, true).expect("key");
		let c = ResultCache::key("vp of sales in austin", 2, 25, true).expect("key");

		assert_eq!(a, b);
		assert_ne!(a, c);
		assert_eq!(a.len(), 16);
	}

	#[test]
	fn get_returns_isolated_clones() {
		let cache = ResultCache::new(600, 10);
		let now = OffsetDateTime::now_utc();
		let key = ResultCache::key("q", 1, 25, false).expect("key");

		cache.set("u1", key.clone(), &response("original"), now);

		let mut first = cache.get("u1", &key, now).expect("cache hit");

		first.query = "mutated".to_string();

		let second = cache.get("u1", &key, now).expect("cache hit");

		assert_eq!(second.query, "original");
	}

	#[test]
	fn entries_expire_after_ttl() {
		let cache = ResultCache::new(600, 10);
		let now = OffsetDateTime::now_utc();
		let key = ResultCache::key("q", 1, 25, false).expect("key");

		cache.set("u1", key.clone(), &response("r"), now);

		assert!(cache.get("u1", &key, now + Duration::seconds(599)).is_some());
		assert!(cache.get("u1", &key, now + Duration::seconds(600)).is_none());
	}

	#[test]
	fn per_user_cap_evicts_oldest_created() {
		let cache = ResultCache::new(600, 2);
		let now = OffsetDateTime::now_utc();
		let k1 = ResultCache::key("q1", 1, 25, false).expect("key");
		let k2 = ResultCache::key("q2", 1, 25, false).expect("key");
		let k3 = ResultCache::key("q3", 1, 25, false).expect("key");

		cache.set("u1", k1.clone(), &response("r1"), now);
		cache.set("u1", k2.clone(), &response("r2"), now + Duration::seconds(1));
		cache.set("u1", k3.clone(), &response("r3"), now + Duration::seconds(2));

		let later = now + Duration::seconds(3);

		assert!(cache.get("u1", &k1, later).is_none());
		assert!(cache.get("u1", &k2, later).is_some());
		assert!(cache.get("u1", &k3, later).is_some());
	}

	#[test]
	fn invalidation_is_scoped_per_user() {
		let cache = ResultCache::new(600, 10);
		let now = OffsetDateTime::now_utc();
		let key = ResultCache::key("q", 1, 25, false).expect("key");

		cache.set("u1", key.clone(), &response("r"), now);
		cache.set("u2", key.clone(), &response("r"), now);
		cache.invalidate_user("u1");

		assert!(cache.get("u1", &key, now).is_none());
		assert!(cache.get("u2", &key, now).is_some());
	}

	#[test]
	fn sweep_drops_only_expired_entries() {
		let cache = ResultCache::new(600, 10);
		let now = OffsetDateTime::now_utc();
		let k1 = ResultCache::key("q1", 1, 25, false).expect("key");
		let k2 = ResultCache::key("q2", 1, 25, false).expect("key");

		cache.set("u1", k1.clone(), &response("r1"), now);
		cache.set("u1", k2.clone(), &response("r2"), now + Duration::seconds(300));

		let removed = cache.sweep(now + Duration::seconds(650));

		assert_eq!(removed, 1);
		assert!(cache.get("u1", &k2, now + Duration::seconds(650)).is_some());
	}
}
