use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::LeadSearchService;
use leadscout_domain::{
	expansion,
	filters::FilterSet,
	options,
	specificity::{self, SpecificityReport},
};

/// Confidence assigned when extraction fails outright; low enough to force a
/// clarification prompt, never an error back to the caller.
const FALLBACK_CONFIDENCE: f32 = 0.3;
const DEFAULT_CONFIDENCE: f32 = 0.5;

const SEARCH_SYSTEM_PROMPT: &str = "\
You translate a lead-search request into structured filters. Respond with a \
single JSON object: {\"classification\": {\"intent\": string}, \"filters\": \
{\"job_titles\": [], \"locations\": [], \"industries\": [], \"company_sizes\": [], \
\"companies\": [], \"seniorities\": [], \"technologies\": [], \"keywords\": [], \
\"revenue_ranges\": [], \"intent_topics\": [], \"email_statuses\": [], \
\"management_levels\": [], \"previous_companies\": [], \"schools\": [], \
\"recent_job_change\": null}, \"confidence\": number 0-1, \"explanation\": string}. \
Only use company_sizes from: 1-10, 11-50, 51-200, 201-500, 501-1000, 1001-5000, \
5001-10000, 10001+. Only use seniorities from: intern, entry, senior, manager, \
director, head, vp, c_suite, partner, owner. Only use revenue_ranges from: 0-1M, \
1M-10M, 10M-50M, 50M-100M, 100M-500M, 500M-1B, 1B+. Leave fields the user did \
not ask for empty.";

const REFINEMENT_SYSTEM_PROMPT: &str = "\
You translate a follow-up command that refines an existing lead search. Extract \
only the values the command adds, in the same JSON shape as a search request. \
Never restate filters the command does not mention.";

#[derive(Clone, Debug)]
pub struct Interpretation {
	pub filters: FilterSet,
	pub confidence: f32,
	pub explanation: String,
	pub specificity: SpecificityReport,
	pub needs_clarification: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawExtraction {
	classification: RawClassification,
	filters: RawFilters,
	confidence: Option<f32>,
	explanation: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawClassification {
	intent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFilters {
	#[serde(alias = "jobTitles")]
	job_titles: Vec<String>,
	locations: Vec<String>,
	industries: Vec<String>,
	#[serde(alias = "companySizes")]
	company_sizes: Vec<String>,
	companies: Vec<String>,
	seniorities: Vec<String>,
	technologies: Vec<String>,
	keywords: Vec<String>,
	#[serde(alias = "revenueRanges")]
	revenue_ranges: Vec<String>,
	#[serde(alias = "intentTopics")]
	intent_topics: Vec<String>,
	#[serde(alias = "emailStatuses")]
	email_statuses: Vec<String>,
	#[serde(alias = "managementLevels")]
	management_levels: Vec<String>,
	#[serde(alias = "previousCompanies")]
	previous_companies: Vec<String>,
	schools: Vec<String>,
	#[serde(alias = "recentJobChange")]
	recent_job_change: Option<bool>,
}

impl LeadSearchService {
	/// Free text in, structured intent out. Extraction failures degrade to an
	/// empty low-confidence filter set flagged for clarification.
	pub(crate) async fn interpret(&self, query: &str) -> Interpretation {
		let messages = build_messages(SEARCH_SYSTEM_PROMPT, query);
		let raw = match self.providers.extractor.extract(&self.cfg.providers.nlu, &messages).await {
			Ok(raw) => raw,
			Err(err) => {
				warn!(error = %err, "Query extraction failed; degrading to clarification.");

				return fallback_interpretation(query);
			},
		};
		let Some(extraction) = decode_extraction(raw) else {
			warn!("Query extraction returned an unexpected shape; degrading to clarification.");

			return fallback_interpretation(query);
		};
		let filters = validate_and_expand(extraction.filters);
		let report = specificity::analyze(&filters);
		let needs_clarification = !specificity::is_minimum_viable(&filters, report.score);
		let explanation = extraction
			.explanation
			.filter(|text| !text.trim().is_empty())
			.or(extraction.classification.intent)
			.unwrap_or_else(|| format!("Interpreted \"{}\" as a lead search.", query.trim()));

		Interpretation {
			filters,
			confidence: extraction.confidence.unwrap_or(DEFAULT_CONFIDENCE).clamp(0.0, 1.0),
			explanation,
			specificity: report,
			needs_clarification,
		}
	}

	/// Extraction for refinement commands. `None` means the command could not
	/// be understood; the caller leaves the session untouched.
	pub(crate) async fn interpret_refinement(&self, command: &str) -> Option<FilterSet> {
		let messages = build_messages(REFINEMENT_SYSTEM_PROMPT, command);
		let raw = match self.providers.extractor.extract(&self.cfg.providers.nlu, &messages).await {
			Ok(raw) => raw,
			Err(err) => {
				warn!(error = %err, "Refinement extraction failed.");

				return None;
			},
		};

		decode_extraction(raw).map(|extraction| validate_and_expand(extraction.filters))
	}
}

fn build_messages(system_prompt: &str, user_text: &str) -> Vec<Value> {
	vec![
		serde_json::json!({ "role": "system", "content": system_prompt }),
		serde_json::json!({ "role": "user", "content": user_text }),
	]
}

fn decode_extraction(raw: Value) -> Option<RawExtraction> {
	serde_json::from_value(raw).ok()
}

/// Enum containment plus deterministic expansion: enumerable values outside
/// the canonical lists are dropped silently; broad occupation, seniority, and
/// company-group terms expand before validation.
fn validate_and_expand(raw: RawFilters) -> FilterSet {
	let seniorities = expansion::expand_seniorities(&raw.seniorities);

	FilterSet {
		job_titles: expansion::expand_job_titles(&raw.job_titles),
		locations: clean(raw.locations),
		industries: options::canonicalize(&raw.industries, &options::INDUSTRIES),
		company_sizes: options::canonicalize(&raw.company_sizes, &options::COMPANY_SIZES),
		companies: expansion::expand_companies(&raw.companies),
		seniorities: options::canonicalize(&seniorities, &options::SENIORITIES),
		technologies: clean(raw.technologies),
		keywords: clean(raw.keywords),
		revenue_ranges: options::canonicalize(&raw.revenue_ranges, &options::REVENUE_RANGES),
		intent_topics: clean(raw.intent_topics),
		email_statuses: options::canonicalize(&raw.email_statuses, &options::EMAIL_STATUS_OPTIONS),
		management_levels: options::canonicalize(
			&raw.management_levels,
			&options::MANAGEMENT_LEVELS,
		),
		previous_companies: clean(raw.previous_companies),
		schools: clean(raw.schools),
		recent_job_change: raw.recent_job_change,
	}
}

fn clean(values: Vec<String>) -> Vec<String> {
	let mut out: Vec<String> = Vec::with_capacity(values.len());

	for value in values {
		let trimmed = value.trim();

		if trimmed.is_empty() {
			continue;
		}
		if out.iter().any(|existing| existing.eq_ignore_ascii_case(trimmed)) {
			continue;
		}

		out.push(trimmed.to_string());
	}

	out
}

fn fallback_interpretation(query: &str) -> Interpretation {
	let filters = FilterSet::default();
	let specificity = specificity::analyze(&filters);

	Interpretation {
		filters,
		confidence: FALLBACK_CONFIDENCE,
		explanation: format!("Could not interpret \"{}\".", query.trim()),
		specificity,
		needs_clarification: true,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn validate_drops_out_of_enum_values() {
		let raw = RawFilters {
			company_sizes: vec!["11-50".to_string(), "gigantic".to_string()],
			seniorities: vec!["vp".to_string(), "supreme leader".to_string()],
			..Default::default()
		};
		let filters = validate_and_expand(raw);

		assert_eq!(filters.company_sizes, vec!["11-50"]);
		assert_eq!(filters.seniorities, vec!["vp"]);
	}

	#[test]
	fn validate_expands_before_enum_checks() {
		let raw = RawFilters { seniorities: vec!["executives".to_string()], ..Default::default() };
		let filters = validate_and_expand(raw);

		assert_eq!(filters.seniorities, vec!["vp", "c_suite", "partner", "owner"]);
	}

	#[test]
	fn decode_tolerates_camel_case_keys() {
		let raw = serde_json::json!({
			"filters": { "jobTitles": ["VP of Sales"], "companySizes": ["11-50"] },
			"confidence": 0.9,
		});
		let extraction = decode_extraction(raw).expect("decode failed");

		assert_eq!(extraction.filters.job_titles, vec!["VP of Sales"]);
		assert_eq!(extraction.filters.company_sizes, vec!["11-50"]);
	}

	#[test]
	fn decode_rejects_non_object_payloads() {
		assert!(decode_extraction(serde_json::json!("not filters")).is_none());
	}
}
