use std::{collections::HashMap, sync::Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::{Error, LeadSearchService, Result};
use leadscout_domain::{
	candidate::{self, Candidate, EmailStatus},
	filters::{self, FilterSet},
};

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct Pagination {
	pub page: u32,
	pub per_page: u32,
	pub total_pages: u64,
	pub total_results: u64,
}

#[derive(Clone, Debug)]
pub struct FetchOutcome {
	pub candidates: Vec<Candidate>,
	pub pagination: Pagination,
	/// Filters actually translated into provider-native query parameters.
	pub filters_applied: u32,
}

struct ProviderCacheEntry {
	outcome: FetchOutcome,
	created_at: OffsetDateTime,
}

/// Short-TTL cache in front of the people-search provider. Different
/// phrasings and refinements frequently collapse to the same normalized
/// filter set, so this sits below the result cache.
pub(crate) struct ProviderCache {
	ttl: Duration,
	max_entries: usize,
	entries: Mutex<HashMap<String, ProviderCacheEntry>>,
}

impl ProviderCache {
	pub(crate) fn new(ttl_secs: i64, max_entries: u32) -> Self {
		Self {
			ttl: Duration::seconds(ttl_secs),
			max_entries: max_entries as usize,
			entries: Mutex::new(HashMap::new()),
		}
	}

	fn get(&self, key: &str, now: OffsetDateTime) -> Option<FetchOutcome> {
		let entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());
		let entry = entries.get(key)?;

		if entry.created_at + self.ttl <= now {
			return None;
		}

		Some(entry.outcome.clone())
	}

	fn insert(&self, key: String, outcome: FetchOutcome, now: OffsetDateTime) {
		let mut entries = self.entries.lock().unwrap_or_else(|err| err.into_inner());

		entries.retain(|_, entry| entry.created_at + self.ttl > now);

		if entries.len() >= self.max_entries {
			let oldest = entries
				.iter()
				.min_by_key(|(_, entry)| entry.created_at)
				.map(|(key, _)| key.clone());

			if let Some(oldest) = oldest {
				entries.remove(&oldest);
			}
		}

		entries.insert(key, ProviderCacheEntry { outcome, created_at: now });
	}
}

impl LeadSearchService {
	/// Runs one provider query for a filter set. Company names resolve to
	/// domains first; when none of the named companies resolves the search
	/// fails fast with zero results instead of silently dropping the filter.
	pub(crate) async fn fetch(
		&self,
		user_id: &str,
		filters: &FilterSet,
		page: u32,
		per_page: u32,
	) -> Result<FetchOutcome> {
		let key = provider_cache_key(user_id, filters, page, per_page)?;
		let now = OffsetDateTime::now_utc();

		if let Some(hit) = self.provider_cache.get(&key, now) {
			debug!(%key, "Provider cache hit.");

			return Ok(hit);
		}

		let provider_cfg = &self.cfg.providers.people_search;
		let mut domains = Vec::new();

		if !filters.companies.is_empty() {
			for company in &filters.companies {
				if filters::looks_like_domain(company) {
					domains.push(company.trim().to_lowercase());

					continue;
				}
				if let Some(domain) =
					self.providers.people_search.resolve_domain(provider_cfg, company).await?
				{
					domains.push(domain);
				}
			}

			if domains.is_empty() {
				debug!("No named company resolved to a domain; failing fast with zero results.");

				return Ok(empty_outcome(filters, page, per_page));
			}
		}

		let (body, filters_applied) = build_provider_body(filters, &domains, page, per_page);
		let raw = self.providers.people_search.search(provider_cfg, &body).await?;
		let outcome = parse_provider_response(&raw, page, per_page, filters_applied);

		self.provider_cache.insert(key, outcome.clone(), now);

		Ok(outcome)
	}
}

fn empty_outcome(filters: &FilterSet, page: u32, per_page: u32) -> FetchOutcome {
	FetchOutcome {
		candidates: Vec::new(),
		pagination: Pagination { page, per_page, total_pages: 0, total_results: 0 },
		filters_applied: filters.active_field_count(),
	}
}

/// Keyed by user id at the top level; provider results are never shared
/// across users even when their filters collapse to the same normal form.
fn provider_cache_key(
	user_id: &str,
	filters: &FilterSet,
	page: u32,
	per_page: u32,
) -> Result<String> {
	let payload = serde_json::json!({
		"user": user_id,
		"filters": filters.normalized(),
		"page": page,
		"per_page": per_page,
	});
	let raw = serde_json::to_vec(&payload).map_err(|err| Error::Internal {
		message: format!("Failed to encode provider cache key: {err}"),
	})?;

	Ok(blake3::hash(&raw).to_hex().to_string())
}

/// Translates a FilterSet into the provider's query body, counting how many
/// filters actually became provider parameters.
fn build_provider_body(
	filters: &FilterSet,
	domains: &[String],
	page: u32,
	per_page: u32,
) -> (Value, u32) {
	let mut body = serde_json::Map::new();
	let mut applied = 0;

	body.insert("page".to_string(), Value::from(page));
	body.insert("per_page".to_string(), Value::from(per_page));

	for (param, values) in [
		("person_titles", &filters.job_titles),
		("person_locations", &filters.locations),
		("organization_industries", &filters.industries),
		("organization_num_employees_ranges", &filters.company_sizes),
		("person_seniorities", &filters.seniorities),
		("organization_technologies", &filters.technologies),
		("organization_revenue_ranges", &filters.revenue_ranges),
		("organization_intent_topics", &filters.intent_topics),
		("contact_email_statuses", &filters.email_statuses),
		("person_management_levels", &filters.management_levels),
		("person_past_organizations", &filters.previous_companies),
		("person_schools", &filters.schools),
	] {
		if values.is_empty() {
			continue;
		}

		body.insert(param.to_string(), Value::from(values.clone()));

		applied += 1;
	}

	if !domains.is_empty() {
		body.insert("q_organization_domains".to_string(), Value::from(domains.to_vec()));

		applied += 1;
	}
	if !filters.keywords.is_empty() {
		body.insert("q_keywords".to_string(), Value::from(filters.keywords.join(" ")));

		applied += 1;
	}
	if let Some(recent) = filters.recent_job_change {
		body.insert("recently_changed_jobs".to_string(), Value::from(recent));

		applied += 1;
	}

	(Value::Object(body), applied)
}

/// Maps the provider's raw response into candidates plus pagination.
/// Tolerates missing fields per record; candidates sort best-email-first as a
/// deterministic tie-break before any relevance scoring.
fn parse_provider_response(
	raw: &Value,
	page: u32,
	per_page: u32,
	filters_applied: u32,
) -> FetchOutcome {
	let mut candidates: Vec<Candidate> = raw
		.get("people")
		.and_then(|v| v.as_array())
		.map(|records| records.iter().filter_map(parse_candidate).collect())
		.unwrap_or_default();

	candidate::sort_by_email_tier(&mut candidates);

	let pagination_raw = raw.get("pagination");
	let total_results = pagination_raw
		.and_then(|p| p.get("total_entries"))
		.and_then(|v| v.as_u64())
		.unwrap_or(candidates.len() as u64);
	let total_pages = pagination_raw
		.and_then(|p| p.get("total_pages"))
		.and_then(|v| v.as_u64())
		.unwrap_or_else(|| total_results.div_ceil(per_page.max(1) as u64));

	FetchOutcome {
		candidates,
		pagination: Pagination { page, per_page, total_pages, total_results },
		filters_applied,
	}
}

fn parse_candidate(record: &Value) -> Option<Candidate> {
	let id = record.get("id").and_then(|v| v.as_str())?.to_string();
	let organization = record.get("organization");

	Some(Candidate {
		id,
		first_name: str_field(record, "first_name"),
		last_name: str_field(record, "last_name"),
		email: record
			.get("email")
			.and_then(|v| v.as_str())
			.map(str::trim)
			.filter(|email| !email.is_empty())
			.map(str::to_string),
		title: str_field(record, "title"),
		company: nested_str(organization, "name").unwrap_or_else(|| str_field(record, "company")),
		location: str_field(record, "location"),
		industry: nested_str(organization, "industry")
			.unwrap_or_else(|| str_field(record, "industry")),
		company_size: nested_str(organization, "size")
			.unwrap_or_else(|| str_field(record, "company_size")),
		technologies: record
			.get("technologies")
			.and_then(|v| v.as_array())
			.map(|values| {
				values.iter().filter_map(|v| v.as_str()).map(str::to_string).collect()
			})
			.unwrap_or_default(),
		email_status: record
			.get("email_status")
			.and_then(|v| v.as_str())
			.map(EmailStatus::parse)
			.unwrap_or_default(),
		linkedin_url: record.get("linkedin_url").and_then(|v| v.as_str()).map(str::to_string),
	})
}

fn str_field(record: &Value, key: &str) -> String {
	record.get(key).and_then(|v| v.as_str()).unwrap_or_default().to_string()
}

fn nested_str(parent: Option<&Value>, key: &str) -> Option<String> {
	parent?.get(key).and_then(|v| v.as_str()).map(str::to_string)
}
