use serde::{Deserialize, Serialize};

use crate::filters::FilterSet;

const JOB_TITLE_WEIGHT: f32 = 0.35;
const COMPANY_WEIGHT: f32 = 0.25;
const LOCATION_WEIGHT: f32 = 0.15;
const INDUSTRY_WEIGHT: f32 = 0.15;
const SENIORITY_WEIGHT: f32 = 0.10;

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchCategory {
	Complete,
	JobOnly,
	LocationOnly,
	CompanyOnly,
	IndustryOnly,
	#[default]
	Vague,
}
impl SearchCategory {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Complete => "complete",
			Self::JobOnly => "job_only",
			Self::LocationOnly => "location_only",
			Self::CompanyOnly => "company_only",
			Self::IndustryOnly => "industry_only",
			Self::Vague => "vague",
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
	JobTitle,
	Location,
	Company,
	Industry,
	Seniority,
}
impl SignalKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::JobTitle => "job_title",
			Self::Location => "location",
			Self::Company => "company",
			Self::Industry => "industry",
			Self::Seniority => "seniority",
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SpecificityReport {
	pub score: f32,
	pub category: SearchCategory,
	pub missing: Vec<SignalKind>,
}

/// Scores how searchable a filter set is, independent of extraction
/// confidence. Role and named organizations are the strongest anchors;
/// location and industry narrow rather than anchor.
pub fn analyze(filters: &FilterSet) -> SpecificityReport {
	let has_titles = !filters.job_titles.is_empty();
	let has_companies = !filters.companies.is_empty();
	let has_locations = !filters.locations.is_empty();
	let has_industries = !filters.industries.is_empty();
	let has_seniorities = !filters.seniorities.is_empty();
	let mut score = 0.0;

	if has_titles {
		score += JOB_TITLE_WEIGHT;
	}
	if has_companies {
		score += COMPANY_WEIGHT;
	}
	if has_locations {
		score += LOCATION_WEIGHT;
	}
	if has_industries {
		score += INDUSTRY_WEIGHT;
	}
	if has_seniorities {
		score += SENIORITY_WEIGHT;
	}

	// Secondary narrowing signals nudge the score without changing category.
	if !filters.technologies.is_empty() || !filters.keywords.is_empty() {
		score = (score + 0.05).min(1.0);
	}

	let category = match (has_titles, has_locations, has_companies, has_industries) {
		(true, _, _, _) if has_locations || has_companies || has_industries =>
			SearchCategory::Complete,
		(true, false, false, false) => SearchCategory::JobOnly,
		(false, true, false, false) => SearchCategory::LocationOnly,
		// A named company stays the anchor even when narrowing signals ride
		// along with it.
		(false, _, true, _) => SearchCategory::CompanyOnly,
		(false, false, false, true) => SearchCategory::IndustryOnly,
		_ => SearchCategory::Vague,
	};
	let mut missing = Vec::new();

	if !has_titles {
		missing.push(SignalKind::JobTitle);
	}
	if !has_locations {
		missing.push(SignalKind::Location);
	}
	if !has_companies {
		missing.push(SignalKind::Company);
	}
	if !has_industries {
		missing.push(SignalKind::Industry);
	}
	if !has_seniorities {
		missing.push(SignalKind::Seniority);
	}

	SpecificityReport { score, category, missing }
}

/// A search is viable without clarification when it carries (titles AND
/// locations) OR (titles AND industries) OR any named company, or a lone
/// title set that already scores high enough on its own.
pub fn is_minimum_viable(filters: &FilterSet, score: f32) -> bool {
	let has_titles = !filters.job_titles.is_empty();

	if has_titles && !filters.locations.is_empty() {
		return true;
	}
	if has_titles && !filters.industries.is_empty() {
		return true;
	}
	if !filters.companies.is_empty() {
		return true;
	}

	has_titles && score >= 0.5
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_titles_and_locations() -> FilterSet {
		FilterSet {
			job_titles: vec!["VP of Sales".to_string()],
			locations: vec!["Austin".to_string()],
			..Default::default()
		}
	}

	#[test]
	fn title_plus_location_is_complete_and_viable() {
		let filters = with_titles_and_locations();
		let report = analyze(&filters);

		assert_eq!(report.category, SearchCategory::Complete);
		assert!(is_minimum_viable(&filters, report.score));
	}

	#[test]
	fn named_company_alone_is_viable() {
		let filters = FilterSet { companies: vec!["Acme".to_string()], ..Default::default() };
		let report = analyze(&filters);

		assert_eq!(report.category, SearchCategory::CompanyOnly);
		assert!(is_minimum_viable(&filters, report.score));
	}

	#[test]
	fn company_with_industry_is_still_company_anchored() {
		let filters = FilterSet {
			companies: vec!["Acme".to_string()],
			industries: vec!["Software".to_string()],
			..Default::default()
		};
		let report = analyze(&filters);

		assert_eq!(report.category, SearchCategory::CompanyOnly);
		assert!(is_minimum_viable(&filters, report.score));
	}

	#[test]
	fn lone_vague_title_is_not_viable() {
		let filters =
			FilterSet { job_titles: vec!["Manager".to_string()], ..Default::default() };
		let report = analyze(&filters);

		assert_eq!(report.category, SearchCategory::JobOnly);
		assert!(!is_minimum_viable(&filters, report.score));
	}

	#[test]
	fn empty_filters_are_vague_with_all_signals_missing() {
		let report = analyze(&FilterSet::default());

		assert_eq!(report.category, SearchCategory::Vague);
		assert_eq!(report.missing.len(), 5);
		assert_eq!(report.score, 0.0);
	}
}
