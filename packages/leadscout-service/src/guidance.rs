use crate::search::AdaptiveGuidance;
use leadscout_domain::{
	filters::FilterSet,
	specificity::{SearchCategory, SignalKind, SpecificityReport},
};

/// Search-quality hints derived from the specificity report alone, so they can
/// be computed before, or concurrently with, the provider call.
pub(crate) fn adaptive_guidance(report: &SpecificityReport) -> AdaptiveGuidance {
	let tips = tips_for(report.category);
	let suggested_additions: Vec<String> =
		report.missing.iter().map(|signal| addition_for(*signal).to_string()).collect();
	let has_recommendations = !tips.is_empty() || !suggested_additions.is_empty();

	AdaptiveGuidance {
		search_category: report.category,
		specificity_score: report.score,
		tips,
		suggested_additions,
		has_recommendations,
	}
}

fn tips_for(category: SearchCategory) -> Vec<String> {
	match category {
		SearchCategory::Complete => Vec::new(),
		SearchCategory::JobOnly => vec![
			"Adding a location or industry will narrow this role to a reachable market.".to_string(),
		],
		SearchCategory::LocationOnly => vec![
			"Add a job title so results are not every professional in this area.".to_string(),
		],
		SearchCategory::CompanyOnly => vec![
			"Add a job title to target the right people inside these companies.".to_string(),
		],
		SearchCategory::IndustryOnly => vec![
			"Add a job title or seniority to focus this industry search.".to_string(),
		],
		SearchCategory::Vague => vec![
			"Describe who you are looking for: a role, a place, or a company.".to_string(),
		],
	}
}

fn addition_for(signal: SignalKind) -> &'static str {
	match signal {
		SignalKind::JobTitle => "a job title, such as \"VP of Sales\"",
		SignalKind::Location => "a location, such as a city or state",
		SignalKind::Company => "one or more company names",
		SignalKind::Industry => "an industry, such as \"software\"",
		SignalKind::Seniority => "a seniority level, such as \"director\"",
	}
}

/// Questions returned instead of results when a query is under-specified.
/// Ordered by how much each answer would raise specificity.
pub(crate) fn clarifying_questions(report: &SpecificityReport) -> Vec<String> {
	let mut questions = Vec::new();

	for signal in &report.missing {
		let question = match signal {
			SignalKind::JobTitle => "What role or job title are you looking for?",
			SignalKind::Location => "Which location should the search cover?",
			SignalKind::Company => "Are there specific companies you want to target?",
			SignalKind::Industry => "Which industry are you interested in?",
			SignalKind::Seniority => continue,
		};

		questions.push(question.to_string());

		if questions.len() == 3 {
			break;
		}
	}

	if questions.is_empty() {
		questions
			.push("Could you narrow down who you are looking for a bit more?".to_string());
	}

	questions
}

/// Explanatory suggestions for a search that stayed empty after the
/// broadening budget ran out. Names the filters most likely to blame.
pub(crate) fn zero_result_suggestions(filters: &FilterSet) -> Vec<String> {
	let mut suggestions = Vec::new();

	if filters.job_titles.len() > 2 {
		suggestions.push("Try fewer job titles; start with the one or two that matter most.".to_string());
	}
	if !filters.companies.is_empty() {
		suggestions.push(
			"The named companies may not be in the provider's index; try dropping them.".to_string(),
		);
	}
	if !filters.locations.is_empty() && !filters.industries.is_empty() {
		suggestions
			.push("Location plus industry may be too narrow; try removing one.".to_string());
	}
	if filters.recent_job_change == Some(true) {
		suggestions.push("Drop the recent-job-change requirement to widen the pool.".to_string());
	}
	if suggestions.is_empty() {
		suggestions.push("Try broadening the search with fewer or more general filters.".to_string());
	}

	suggestions
}

#[cfg(test)]
mod tests {
	use super::*;
	use leadscout_domain::specificity;

	#[test]
	fn complete_searches_carry_no_tips() {
		let filters = FilterSet {
			job_titles: vec!["VP of Sales".to_string()],
			locations: vec!["Austin".to_string()],
			..Default::default()
		};
		let guidance = adaptive_guidance(&specificity::analyze(&filters));

		assert_eq!(guidance.search_category, specificity::SearchCategory::Complete);
		assert!(guidance.tips.is_empty());
		// Missing signals still surface as suggested additions.
		assert!(guidance.has_recommendations);
	}

	#[test]
	fn vague_searches_always_get_a_question() {
		let questions = clarifying_questions(&specificity::analyze(&FilterSet::default()));

		assert!(!questions.is_empty());
		assert!(questions.len() <= 3);
	}

	#[test]
	fn zero_result_suggestions_name_the_likely_culprit() {
		let filters = FilterSet {
			job_titles: vec![
				"A".to_string(),
				"B".to_string(),
				"C".to_string(),
				"D".to_string(),
			],
			..Default::default()
		};
		let suggestions = zero_result_suggestions(&filters);

		assert!(suggestions.iter().any(|text| text.contains("fewer job titles")));
	}

	#[test]
	fn empty_filters_still_get_a_generic_suggestion() {
		assert_eq!(zero_result_suggestions(&FilterSet::default()).len(), 1);
	}
}
