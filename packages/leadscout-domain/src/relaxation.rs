use serde::{Deserialize, Serialize};

use crate::filters::FilterSet;

/// How many titles an over-specific title list is reduced to.
const TITLE_SUBSET_SIZE: usize = 2;
/// Title lists longer than this are considered over-specific.
const TITLE_SUBSET_THRESHOLD: usize = 2;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldChange {
	pub field: String,
	pub before: Vec<String>,
	pub after: Vec<String>,
}

/// One relaxed variant of a filter set, with enough detail to explain to the
/// caller what was loosened and why.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Relaxation {
	pub description: String,
	pub filters: FilterSet,
	pub changes: Vec<FieldChange>,
}

/// Ranked relaxation candidates, most-likely-bottleneck first. Never mutates
/// the input; each candidate is derived from the original filters, so the
/// loosening steps are independent alternatives rather than cumulative.
pub fn relaxation_candidates(filters: &FilterSet) -> Vec<Relaxation> {
	let mut out = Vec::new();

	// Seniority is the most restrictive filter in practice: providers match
	// it against inferred fields, so it goes first whenever present.
	if !filters.seniorities.is_empty() {
		let mut relaxed = filters.clone();
		let before = std::mem::take(&mut relaxed.seniorities);

		out.push(Relaxation {
			description: "Removed the seniority requirement".to_string(),
			filters: relaxed,
			changes: vec![FieldChange {
				field: "seniorities".to_string(),
				before,
				after: Vec::new(),
			}],
		});
	}

	if filters.job_titles.len() > TITLE_SUBSET_THRESHOLD {
		let mut relaxed = filters.clone();
		let before = relaxed.job_titles.clone();

		relaxed.job_titles.truncate(TITLE_SUBSET_SIZE);

		out.push(Relaxation {
			description: format!(
				"Narrowed {} job titles down to the {} strongest",
				before.len(),
				relaxed.job_titles.len()
			),
			changes: vec![FieldChange {
				field: "job_titles".to_string(),
				before,
				after: relaxed.job_titles.clone(),
			}],
			filters: relaxed,
		});
	}

	for (field, values, description) in [
		("company_sizes", &filters.company_sizes, "Removed the company size restriction"),
		("technologies", &filters.technologies, "Removed the technology stack restriction"),
		("keywords", &filters.keywords, "Removed keyword constraints"),
		("revenue_ranges", &filters.revenue_ranges, "Removed the revenue range restriction"),
	] {
		if values.is_empty() {
			continue;
		}

		let mut relaxed = filters.clone();
		let before = values.clone();

		clear_field(&mut relaxed, field);

		out.push(Relaxation {
			description: description.to_string(),
			filters: relaxed,
			changes: vec![FieldChange { field: field.to_string(), before, after: Vec::new() }],
		});
	}

	// Industry and location are real search anchors; drop them only when
	// something stronger (a role or a named company) remains to search on.
	let has_anchor = !filters.job_titles.is_empty() || !filters.companies.is_empty();

	if has_anchor && !filters.industries.is_empty() {
		let mut relaxed = filters.clone();
		let before = std::mem::take(&mut relaxed.industries);

		out.push(Relaxation {
			description: "Expanded beyond the requested industries".to_string(),
			filters: relaxed,
			changes: vec![FieldChange { field: "industries".to_string(), before, after: Vec::new() }],
		});
	}
	if has_anchor && !filters.locations.is_empty() {
		let mut relaxed = filters.clone();
		let before = std::mem::take(&mut relaxed.locations);

		out.push(Relaxation {
			description: "Expanded the search to all locations".to_string(),
			filters: relaxed,
			changes: vec![FieldChange { field: "locations".to_string(), before, after: Vec::new() }],
		});
	}

	out
}

fn clear_field(filters: &mut FilterSet, field: &str) {
	match field {
		"company_sizes" => filters.company_sizes.clear(),
		"technologies" => filters.technologies.clear(),
		"keywords" => filters.keywords.clear(),
		"revenue_ranges" => filters.revenue_ranges.clear(),
		_ => {},
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn seniority_is_relaxed_first_when_present() {
		let filters = FilterSet {
			job_titles: vec!["VP of Sales".to_string()],
			seniorities: vec!["vp".to_string()],
			locations: vec!["Austin".to_string()],
			..Default::default()
		};
		let candidates = relaxation_candidates(&filters);

		assert!(candidates[0].filters.seniorities.is_empty());
		assert_eq!(candidates[0].changes[0].field, "seniorities");
	}

	#[test]
	fn over_specific_title_lists_reduce_to_a_subset() {
		let filters = FilterSet {
			job_titles: vec!["A".to_string(), "B".to_string(), "C".to_string(), "D".to_string()],
			..Default::default()
		};
		let candidates = relaxation_candidates(&filters);

		assert_eq!(candidates[0].filters.job_titles, vec!["A".to_string(), "B".to_string()]);
		assert_eq!(candidates[0].changes[0].before.len(), 4);
	}

	#[test]
	fn candidates_never_mutate_the_original() {
		let filters = FilterSet {
			job_titles: vec!["A".to_string(), "B".to_string(), "C".to_string()],
			seniorities: vec!["vp".to_string()],
			..Default::default()
		};
		let snapshot = filters.clone();
		let _ = relaxation_candidates(&filters);

		assert_eq!(filters, snapshot);
	}

	#[test]
	fn locations_are_kept_when_they_are_the_only_signal() {
		let filters = FilterSet { locations: vec!["Austin".to_string()], ..Default::default() };
		let candidates = relaxation_candidates(&filters);

		assert!(candidates.iter().all(|candidate| !candidate.filters.locations.is_empty()));
	}

	#[test]
	fn change_records_survive_serialization() {
		let filters = FilterSet {
			job_titles: vec!["VP of Sales".to_string()],
			seniorities: vec!["vp".to_string()],
			..Default::default()
		};
		let candidates = relaxation_candidates(&filters);
		let raw = serde_json::to_string(&candidates[0]).expect("serialize relaxation");
		let restored: Relaxation = serde_json::from_str(&raw).expect("deserialize relaxation");

		assert_eq!(restored.changes[0].field, "seniorities");
		assert_eq!(restored.changes[0].before, vec!["vp".to_string()]);
	}

	#[test]
	fn every_candidate_carries_a_description() {
		let filters = FilterSet {
			job_titles: vec!["A".to_string(), "B".to_string(), "C".to_string()],
			seniorities: vec!["vp".to_string()],
			technologies: vec!["Salesforce".to_string()],
			locations: vec!["Austin".to_string()],
			..Default::default()
		};

		for candidate in relaxation_candidates(&filters) {
			assert!(!candidate.description.is_empty());
			assert!(!candidate.changes.is_empty());
		}
	}
}
