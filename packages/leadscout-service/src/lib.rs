pub mod broaden;
pub mod error;
pub mod fetch;
pub mod guidance;
pub mod interpret;
pub mod result_cache;
pub mod search;
pub mod session;
pub mod time_serde;

pub use broaden::BroadeningStep;
pub use error::{Error, Result};
pub use fetch::{FetchOutcome, Pagination};
pub use interpret::Interpretation;
pub use search::{
	AdaptiveGuidance, RefineRequest, RefineResponse, SearchMetadata, SearchRequest, SearchResponse,
	UndoRequest, UndoResponse,
};
pub use session::{RefinementEntry, SearchOptions, SearchSession};

use std::{future::Future, pin::Pin, sync::Arc, time::Duration};

use serde_json::Value;
use time::OffsetDateTime;
use tracing::debug;

use crate::{fetch::ProviderCache, result_cache::ResultCache, session::SessionStore};
use leadscout_config::{Config, LlmProviderConfig, PeopleSearchProviderConfig};
use leadscout_domain::icp::IcpProfile;
use leadscout_providers::{extractor, people_search};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait QueryExtractor
where
	Self: Send + Sync,
{
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, leadscout_providers::Result<Value>>;
}

pub trait PeopleSearchProvider
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		cfg: &'a PeopleSearchProviderConfig,
		body: &'a Value,
	) -> BoxFuture<'a, leadscout_providers::Result<Value>>;

	fn resolve_domain<'a>(
		&'a self,
		cfg: &'a PeopleSearchProviderConfig,
		company: &'a str,
	) -> BoxFuture<'a, leadscout_providers::Result<Option<String>>>;
}

/// Read-only view of the learned preference model. Recalculation happens
/// outside the request path; searches never recompute profiles inline.
pub trait IcpProfileSource
where
	Self: Send + Sync,
{
	fn profile<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, Result<Option<IcpProfile>>>;
}

#[derive(Clone)]
pub struct Providers {
	pub extractor: Arc<dyn QueryExtractor>,
	pub people_search: Arc<dyn PeopleSearchProvider>,
	pub profiles: Arc<dyn IcpProfileSource>,
}

struct DefaultProviders;

impl QueryExtractor for DefaultProviders {
	fn extract<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, leadscout_providers::Result<Value>> {
		Box::pin(extractor::extract(cfg, messages))
	}
}

impl PeopleSearchProvider for DefaultProviders {
	fn search<'a>(
		&'a self,
		cfg: &'a PeopleSearchProviderConfig,
		body: &'a Value,
	) -> BoxFuture<'a, leadscout_providers::Result<Value>> {
		Box::pin(people_search::search(cfg, body))
	}

	fn resolve_domain<'a>(
		&'a self,
		cfg: &'a PeopleSearchProviderConfig,
		company: &'a str,
	) -> BoxFuture<'a, leadscout_providers::Result<Option<String>>> {
		Box::pin(people_search::resolve_domain(cfg, company))
	}
}

/// Placeholder profile source for deployments without feedback history yet;
/// every user scores with the neutral default.
struct NoProfiles;

impl IcpProfileSource for NoProfiles {
	fn profile<'a>(&'a self, _user_id: &'a str) -> BoxFuture<'a, Result<Option<IcpProfile>>> {
		Box::pin(async { Ok(None) })
	}
}

impl Providers {
	pub fn new(
		extractor: Arc<dyn QueryExtractor>,
		people_search: Arc<dyn PeopleSearchProvider>,
		profiles: Arc<dyn IcpProfileSource>,
	) -> Self {
		Self { extractor, people_search, profiles }
	}
}

impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { extractor: provider.clone(), people_search: provider, profiles: Arc::new(NoProfiles) }
	}
}

pub struct LeadSearchService {
	pub cfg: Config,
	pub providers: Providers,
	pub(crate) result_cache: Arc<ResultCache>,
	pub(crate) provider_cache: ProviderCache,
	pub(crate) sessions: Arc<SessionStore>,
}

impl LeadSearchService {
	pub fn new(cfg: Config) -> Self {
		Self::with_providers(cfg, Providers::default())
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Self {
		let result_cache = Arc::new(ResultCache::new(
			cfg.search.result_cache.ttl_secs,
			cfg.search.result_cache.max_entries_per_user,
		));
		let provider_cache = ProviderCache::new(
			cfg.search.provider_cache.ttl_secs,
			cfg.search.provider_cache.max_entries,
		);

		let sessions = Arc::new(SessionStore::new(cfg.search.sessions.ttl_secs));

		Self { cfg, providers, result_cache, provider_cache, sessions }
	}

	/// Starts the periodic sweep that drops expired result-cache entries and
	/// idle sessions. Hosts call this once per process and call `abort` on
	/// the handle to stop the loop.
	pub fn spawn_cache_sweeper(&self) -> tokio::task::JoinHandle<()> {
		let interval = Duration::from_secs(self.cfg.search.result_cache.sweep_interval_secs);
		let result_cache = self.result_cache.clone();
		let sessions = self.sessions.clone();

		tokio::spawn(async move {
			let mut ticker = tokio::time::interval(interval);

			// The first tick fires immediately; skip it so fresh state is not
			// swept at startup.
			ticker.tick().await;

			loop {
				ticker.tick().await;

				let now = OffsetDateTime::now_utc();
				let removed = result_cache.sweep(now) + sessions.sweep(now);

				if removed > 0 {
					debug!(removed, "Sweep removed expired cache entries and sessions.");
				}
			}
		})
	}

	/// Synchronous invalidation on ICP profile recalculation, so no cached
	/// result scored with a stale profile outlives the change.
	pub fn notify_profile_changed(&self, user_id: &str) {
		self.result_cache.invalidate_user(user_id);
	}

	/// Drops a single cached search, identified by the same options that
	/// produced it. Finer-grained than [`Self::notify_profile_changed`].
	pub fn invalidate_query(
		&self,
		user_id: &str,
		query: &str,
		page: u32,
		per_page: u32,
		icp_enabled: bool,
	) -> Result<()> {
		let key = ResultCache::key(query.trim(), page, per_page, icp_enabled)?;

		self.result_cache.invalidate_query(user_id, &key);

		Ok(())
	}
}
