//! In-memory fakes for the pipeline's provider seams, so tests exercise the
//! full search flow without a network.

use std::{
	collections::{HashMap, VecDeque},
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use serde_json::{Value, json};

use leadscout_config::{Config, LlmProviderConfig, PeopleSearchProviderConfig};
use leadscout_domain::icp::IcpProfile;
use leadscout_service::{BoxFuture, IcpProfileSource, PeopleSearchProvider, QueryExtractor};

/// A ready-to-use config with fast-test policy values. Provider endpoints are
/// placeholders; fakes never dial them.
pub fn test_config() -> Config {
	Config {
		service: leadscout_config::Service { log_level: "debug".to_string() },
		providers: leadscout_config::Providers {
			nlu: LlmProviderConfig {
				provider_id: "fake-nlu".to_string(),
				api_base: "http://127.0.0.1:0".to_string(),
				api_key: "test-key".to_string(),
				path: "/v1/chat/completions".to_string(),
				model: "test-model".to_string(),
				temperature: 0.0,
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
			people_search: PeopleSearchProviderConfig {
				provider_id: "fake-people".to_string(),
				api_base: "http://127.0.0.1:0".to_string(),
				api_key: "test-key".to_string(),
				search_path: "/v1/people/search".to_string(),
				resolve_path: "/v1/organizations/resolve".to_string(),
				timeout_ms: 1_000,
				default_headers: serde_json::Map::new(),
			},
		},
		search: leadscout_config::Search {
			default_per_page: 25,
			max_per_page: 100,
			broadening: leadscout_config::Broadening::default(),
			result_cache: leadscout_config::ResultCacheConfig::default(),
			provider_cache: leadscout_config::ProviderCacheConfig::default(),
			sessions: leadscout_config::SessionConfig::default(),
		},
		icp: leadscout_config::Icp::default(),
	}
}

/// Extractor that replays queued responses in order. An exhausted queue
/// replays the last response, so cache-hit tests can call search repeatedly.
pub struct CannedExtractor {
	responses: Mutex<VecDeque<Value>>,
	last: Mutex<Option<Value>>,
	calls: Arc<AtomicUsize>,
}

impl CannedExtractor {
	pub fn new(responses: Vec<Value>) -> Self {
		Self {
			responses: Mutex::new(responses.into()),
			last: Mutex::new(None),
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn failing() -> Self {
		Self::new(Vec::new())
	}

	pub fn call_counter(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}
}

impl QueryExtractor for CannedExtractor {
	fn extract<'a>(
		&'a self,
		_cfg: &'a LlmProviderConfig,
		_messages: &'a [Value],
	) -> BoxFuture<'a, leadscout_providers::Result<Value>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let next = {
			let mut responses = self.responses.lock().unwrap_or_else(|err| err.into_inner());

			responses.pop_front()
		};
		let result = match next {
			Some(response) => {
				let mut last = self.last.lock().unwrap_or_else(|err| err.into_inner());

				*last = Some(response.clone());

				Ok(response)
			},
			None => {
				let last = self.last.lock().unwrap_or_else(|err| err.into_inner());

				match last.clone() {
					Some(response) => Ok(response),
					None => Err(leadscout_providers::Error::InvalidResponse {
						message: "Canned extractor has no responses queued.".to_string(),
					}),
				}
			},
		};

		Box::pin(async move { result })
	}
}

/// People-search fake replaying queued pages; `Err` entries simulate provider
/// outages. Company names resolve through a static domain table.
pub struct ScriptedSearch {
	pages: Mutex<VecDeque<Result<Value, String>>>,
	last: Mutex<Option<Value>>,
	domains: HashMap<String, String>,
	calls: Arc<AtomicUsize>,
}

impl ScriptedSearch {
	pub fn new(pages: Vec<Result<Value, String>>) -> Self {
		Self {
			pages: Mutex::new(pages.into()),
			last: Mutex::new(None),
			domains: HashMap::new(),
			calls: Arc::new(AtomicUsize::new(0)),
		}
	}

	pub fn with_domains(mut self, domains: &[(&str, &str)]) -> Self {
		self.domains = domains
			.iter()
			.map(|(company, domain)| (company.to_lowercase(), domain.to_string()))
			.collect();

		self
	}

	pub fn call_counter(&self) -> Arc<AtomicUsize> {
		self.calls.clone()
	}
}

impl PeopleSearchProvider for ScriptedSearch {
	fn search<'a>(
		&'a self,
		_cfg: &'a PeopleSearchProviderConfig,
		_body: &'a Value,
	) -> BoxFuture<'a, leadscout_providers::Result<Value>> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let next = {
			let mut pages = self.pages.lock().unwrap_or_else(|err| err.into_inner());

			pages.pop_front()
		};
		let result = match next {
			Some(Ok(page)) => {
				let mut last = self.last.lock().unwrap_or_else(|err| err.into_inner());

				*last = Some(page.clone());

				Ok(page)
			},
			Some(Err(message)) => Err(leadscout_providers::Error::InvalidResponse { message }),
			None => {
				let last = self.last.lock().unwrap_or_else(|err| err.into_inner());

				match last.clone() {
					Some(page) => Ok(page),
					None => Ok(page_json(Vec::new(), 0)),
				}
			},
		};

		Box::pin(async move { result })
	}

	fn resolve_domain<'a>(
		&'a self,
		_cfg: &'a PeopleSearchProviderConfig,
		company: &'a str,
	) -> BoxFuture<'a, leadscout_providers::Result<Option<String>>> {
		let resolved = self.domains.get(&company.to_lowercase()).cloned();

		Box::pin(async move { Ok(resolved) })
	}
}

/// Profile source returning the same profile for every user.
pub struct StaticProfiles {
	profile: Option<IcpProfile>,
}

impl StaticProfiles {
	pub fn new(profile: Option<IcpProfile>) -> Self {
		Self { profile }
	}
}

impl IcpProfileSource for StaticProfiles {
	fn profile<'a>(
		&'a self,
		_user_id: &'a str,
	) -> BoxFuture<'a, leadscout_service::Result<Option<IcpProfile>>> {
		let profile = self.profile.clone();

		Box::pin(async move { Ok(profile) })
	}
}

/// Extraction payload in the shape the NLU provider returns.
pub fn extraction_json(filters: Value, confidence: f64, explanation: &str) -> Value {
	json!({
		"classification": { "intent": "lead_search" },
		"filters": filters,
		"confidence": confidence,
		"explanation": explanation,
	})
}

/// Minimal person record; override fields by mutating the returned object.
pub fn person_json(id: &str, email: Option<&str>, title: &str) -> Value {
	json!({
		"id": id,
		"first_name": "Test",
		"last_name": "Person",
		"email": email,
		"email_status": if email.is_some() { "verified" } else { "unavailable" },
		"title": title,
		"location": "Austin, Texas",
		"organization": { "name": "Acme", "industry": "software", "size": "51-200" },
	})
}

/// Provider search response page wrapping person records.
pub fn page_json(people: Vec<Value>, total_entries: u64) -> Value {
	json!({
		"people": people,
		"pagination": {
			"total_entries": total_entries,
			"total_pages": total_entries.div_ceil(25),
		},
	})
}
