use std::time::Instant;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
	Error, LeadSearchService, Result,
	broaden::BroadeningStep,
	fetch::Pagination,
	guidance,
	interpret::Interpretation,
	result_cache::ResultCache,
	session::{SearchOptions, SearchSession},
};
use leadscout_domain::{
	candidate::ScoredLead,
	dedupe,
	filters::FilterSet,
	icp::{self, IcpProfile},
	specificity::{self, SearchCategory},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchRequest {
	pub user_id: String,
	pub query: String,
	pub page: Option<u32>,
	pub per_page: Option<u32>,
	/// Defaults to on; callers opt out per request.
	pub icp_scoring: Option<bool>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchMetadata {
	pub duration_ms: u64,
	pub filters_applied: u32,
	pub icp_scoring_enabled: bool,
	pub cached: bool,
	pub fallback_used: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AdaptiveGuidance {
	pub search_category: SearchCategory,
	pub specificity_score: f32,
	pub tips: Vec<String>,
	pub suggested_additions: Vec<String>,
	pub has_recommendations: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchResponse {
	pub session_id: Uuid,
	pub query: String,
	pub parsed_filters: FilterSet,
	pub explanation: String,
	pub confidence: f32,
	pub needs_clarification: bool,
	pub clarifying_questions: Vec<String>,
	pub leads: Vec<ScoredLead>,
	pub pagination: Pagination,
	pub suggestions: Vec<String>,
	pub search_metadata: SearchMetadata,
	pub adaptive_guidance: AdaptiveGuidance,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefineRequest {
	pub user_id: String,
	pub session_id: Uuid,
	pub command: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefineResponse {
	#[serde(flatten)]
	pub response: SearchResponse,
	pub can_undo: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UndoRequest {
	pub user_id: String,
	pub session_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UndoResponse {
	pub session_id: Uuid,
	pub filters: FilterSet,
	pub can_undo: bool,
}

impl LeadSearchService {
	/// Full pipeline: interpret, gate on specificity, fetch with broadening,
	/// dedupe, score, cache. Provider failures surface as typed errors;
	/// extraction failures degrade to a clarification response.
	pub async fn search(&self, request: SearchRequest) -> Result<SearchResponse> {
		let started = Instant::now();
		let user_id = request.user_id.trim();
		let query = request.query.trim();

		if user_id.is_empty() {
			return Err(Error::InvalidRequest { message: "user_id must not be empty.".to_string() });
		}
		if query.is_empty() {
			return Err(Error::InvalidRequest { message: "query must not be empty.".to_string() });
		}

		let page = request.page.unwrap_or(1).max(1);
		let per_page = request
			.per_page
			.unwrap_or(self.cfg.search.default_per_page)
			.clamp(1, self.cfg.search.max_per_page);
		let icp_enabled = request.icp_scoring.unwrap_or(true);
		let cache_key = ResultCache::key(query, page, per_page, icp_enabled)?;
		let now = OffsetDateTime::now_utc();

		if self.cfg.search.result_cache.enabled {
			if let Some(mut hit) = self.result_cache.get(user_id, &cache_key, now) {
				hit.search_metadata.cached = true;
				hit.search_metadata.duration_ms = started.elapsed().as_millis() as u64;

				info!(user_id, session_id = %hit.session_id, "Served search from result cache.");

				return Ok(hit);
			}
		}

		let interpretation = self.interpret(query).await;
		let adaptive_guidance = guidance::adaptive_guidance(&interpretation.specificity);

		if interpretation.needs_clarification {
			return Ok(self.clarification_response(
				user_id,
				query,
				interpretation,
				adaptive_guidance,
				page,
				per_page,
				icp_enabled,
				started,
				now,
			));
		}

		let (broadened, profile) = tokio::join!(
			self.fetch_with_broadening(user_id, &interpretation.filters, page, per_page),
			self.providers.profiles.profile(user_id),
		);
		let broadened = broadened?;
		let profile = match profile {
			Ok(profile) => profile,
			Err(err) => {
				// A missing profile only costs personalized ranking; never the
				// search itself.
				warn!(error = %err, user_id, "Profile fetch failed; scoring neutrally.");

				None
			},
		};
		let leads = score(
			&self.cfg,
			profile,
			icp_enabled,
			dedupe::dedupe(broadened.outcome.candidates),
		);
		let suggestions = build_suggestions(&leads, &broadened.filters, &broadened.steps);
		let session_id = self.sessions.create(
			user_id,
			query,
			broadened.filters.clone(),
			interpretation.confidence,
			&interpretation.explanation,
			SearchOptions { per_page, icp_scoring_enabled: icp_enabled },
			now,
		);
		let duration_ms = started.elapsed().as_millis() as u64;

		self.sessions.record_result(session_id, broadened.outcome.pagination.total_results, duration_ms);

		let response = SearchResponse {
			session_id,
			query: query.to_string(),
			parsed_filters: broadened.filters,
			explanation: interpretation.explanation,
			confidence: interpretation.confidence,
			needs_clarification: false,
			clarifying_questions: Vec::new(),
			leads,
			pagination: broadened.outcome.pagination,
			suggestions,
			search_metadata: SearchMetadata {
				duration_ms,
				filters_applied: broadened.outcome.filters_applied,
				icp_scoring_enabled: icp_enabled,
				cached: false,
				fallback_used: broadened.fallback_used,
			},
			adaptive_guidance,
		};

		if self.cfg.search.result_cache.enabled {
			self.result_cache.set(user_id, cache_key, &response, now);
		}

		info!(
			user_id,
			session_id = %response.session_id,
			results = response.pagination.total_results,
			fallback_used = response.search_metadata.fallback_used,
			duration_ms,
			"Search completed."
		);

		Ok(response)
	}

	/// Merges a natural-language refinement into the session's filters and
	/// re-runs the fetch half of the pipeline. A command the extractor cannot
	/// understand leaves the session untouched and re-reports current state.
	pub async fn refine(&self, request: RefineRequest) -> Result<RefineResponse> {
		let user_id = request.user_id.trim();
		let command = request.command.trim();

		if command.is_empty() {
			return Err(Error::InvalidRequest { message: "command must not be empty.".to_string() });
		}

		let now = OffsetDateTime::now_utc();
		let session = self.sessions.get(request.session_id, user_id, now)?;
		let filters = match self.interpret_refinement(command).await {
			Some(extracted) if !extracted.is_empty() =>
				self.sessions.refine(request.session_id, user_id, command, &extracted, now)?,
			_ => {
				warn!(session_id = %request.session_id, "Refinement command extracted no filters.");

				session.current_filters().clone()
			},
		};
		let session = self.sessions.get(request.session_id, user_id, now)?;
		let response = self.respond_for_session(&session, filters).await?;

		Ok(RefineResponse { can_undo: session.can_undo(), response })
	}

	/// Steps the session back one refinement and reports the restored filters.
	pub async fn undo(&self, request: UndoRequest) -> Result<UndoResponse> {
		let now = OffsetDateTime::now_utc();
		let session = self.sessions.undo(request.session_id, request.user_id.trim(), now)?;

		Ok(UndoResponse {
			session_id: session.session_id,
			filters: session.current_filters().clone(),
			can_undo: session.can_undo(),
		})
	}

	/// Refined and restored filter sets no longer match their query text, so
	/// these responses bypass the result cache entirely. The per-page and
	/// scoring options the original search ran with carry over; only the page
	/// resets, since changed filters invalidate any page position.
	async fn respond_for_session(
		&self,
		session: &SearchSession,
		filters: FilterSet,
	) -> Result<SearchResponse> {
		let started = Instant::now();
		let page = 1;
		let per_page = session.options.per_page;
		let icp_enabled = session.options.icp_scoring_enabled;
		let report = specificity::analyze(&filters);
		let adaptive_guidance = guidance::adaptive_guidance(&report);
		let (broadened, profile) = tokio::join!(
			self.fetch_with_broadening(&session.user_id, &filters, page, per_page),
			self.providers.profiles.profile(&session.user_id),
		);
		let broadened = broadened?;
		let profile = profile.unwrap_or_else(|err| {
			warn!(error = %err, user_id = %session.user_id, "Profile fetch failed; scoring neutrally.");

			None
		});
		let leads =
			score(&self.cfg, profile, icp_enabled, dedupe::dedupe(broadened.outcome.candidates));
		let suggestions = build_suggestions(&leads, &broadened.filters, &broadened.steps);
		let duration_ms = started.elapsed().as_millis() as u64;

		self.sessions.record_result(
			session.session_id,
			broadened.outcome.pagination.total_results,
			duration_ms,
		);

		Ok(SearchResponse {
			session_id: session.session_id,
			query: session.query.clone(),
			parsed_filters: broadened.filters,
			explanation: session.explanation.clone(),
			confidence: session.confidence,
			needs_clarification: false,
			clarifying_questions: Vec::new(),
			leads,
			pagination: broadened.outcome.pagination,
			suggestions,
			search_metadata: SearchMetadata {
				duration_ms,
				filters_applied: broadened.outcome.filters_applied,
				icp_scoring_enabled: icp_enabled,
				cached: false,
				fallback_used: broadened.fallback_used,
			},
			adaptive_guidance,
		})
	}

	#[allow(clippy::too_many_arguments)]
	fn clarification_response(
		&self,
		user_id: &str,
		query: &str,
		interpretation: Interpretation,
		adaptive_guidance: AdaptiveGuidance,
		page: u32,
		per_page: u32,
		icp_enabled: bool,
		started: Instant,
		now: OffsetDateTime,
	) -> SearchResponse {
		let clarifying_questions = guidance::clarifying_questions(&interpretation.specificity);
		let session_id = self.sessions.create(
			user_id,
			query,
			interpretation.filters.clone(),
			interpretation.confidence,
			&interpretation.explanation,
			SearchOptions { per_page, icp_scoring_enabled: icp_enabled },
			now,
		);

		info!(user_id, %session_id, "Search needs clarification; provider not queried.");

		SearchResponse {
			session_id,
			query: query.to_string(),
			parsed_filters: interpretation.filters,
			explanation: interpretation.explanation,
			confidence: interpretation.confidence,
			needs_clarification: true,
			clarifying_questions,
			leads: Vec::new(),
			pagination: Pagination { page, per_page, total_pages: 0, total_results: 0 },
			suggestions: Vec::new(),
			search_metadata: SearchMetadata {
				duration_ms: started.elapsed().as_millis() as u64,
				filters_applied: 0,
				icp_scoring_enabled: icp_enabled,
				cached: false,
				fallback_used: false,
			},
			adaptive_guidance,
		}
	}
}

fn score(
	cfg: &leadscout_config::Config,
	profile: Option<IcpProfile>,
	icp_enabled: bool,
	candidates: Vec<leadscout_domain::candidate::Candidate>,
) -> Vec<ScoredLead> {
	// A default profile has zero confidence, which routes through the same
	// neutral bypass as an explicit opt-out.
	let profile = if icp_enabled { profile.unwrap_or_default() } else { IcpProfile::default() };

	icp::score_candidates(&profile, candidates, cfg.icp.min_confidence, cfg.icp.neutral_score)
}

fn build_suggestions(
	leads: &[ScoredLead],
	filters: &FilterSet,
	steps: &[BroadeningStep],
) -> Vec<String> {
	let mut suggestions: Vec<String> =
		steps.iter().map(|step| format!("Broadened: {}", step.description)).collect();

	if leads.is_empty() {
		suggestions.extend(guidance::zero_result_suggestions(filters));
	}

	suggestions
}
