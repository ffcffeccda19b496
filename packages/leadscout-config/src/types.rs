use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub providers: Providers,
	pub search: Search,
	#[serde(default)]
	pub icp: Icp,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub nlu: LlmProviderConfig,
	pub people_search: PeopleSearchProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct PeopleSearchProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub search_path: String,
	pub resolve_path: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	pub default_per_page: u32,
	pub max_per_page: u32,
	#[serde(default)]
	pub broadening: Broadening,
	#[serde(default)]
	pub result_cache: ResultCacheConfig,
	#[serde(default)]
	pub provider_cache: ProviderCacheConfig,
	#[serde(default)]
	pub sessions: SessionConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Broadening {
	/// Below this count the fallback strategy starts relaxing filters.
	pub min_results: u64,
	/// At or above this count the strategy stops early.
	pub target_results: u64,
	/// Total provider queries per search, including the initial one.
	pub max_attempts: u32,
}
impl Default for Broadening {
	fn default() -> Self {
		Self { min_results: 5, target_results: 10, max_attempts: 5 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResultCacheConfig {
	pub enabled: bool,
	pub ttl_secs: i64,
	pub max_entries_per_user: u32,
	pub sweep_interval_secs: u64,
}
impl Default for ResultCacheConfig {
	fn default() -> Self {
		Self { enabled: true, ttl_secs: 600, max_entries_per_user: 100, sweep_interval_secs: 60 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ProviderCacheConfig {
	pub ttl_secs: i64,
	pub max_entries: u32,
}
impl Default for ProviderCacheConfig {
	fn default() -> Self {
		Self { ttl_secs: 900, max_entries: 100 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
	/// Sliding expiry; any access to a session extends its lifetime.
	pub ttl_secs: i64,
}
impl Default for SessionConfig {
	fn default() -> Self {
		Self { ttl_secs: 3_600 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Icp {
	/// Profiles below this confidence bypass scoring entirely.
	pub min_confidence: f32,
	/// Flat score assigned when scoring is bypassed.
	pub neutral_score: f32,
}
impl Default for Icp {
	fn default() -> Self {
		Self { min_confidence: 0.2, neutral_score: 50.0 }
	}
}
