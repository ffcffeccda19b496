use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structured search intent. Enumerable fields hold only canonical option
/// values; see [`crate::options`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSet {
	pub job_titles: Vec<String>,
	pub locations: Vec<String>,
	pub industries: Vec<String>,
	pub company_sizes: Vec<String>,
	pub companies: Vec<String>,
	pub seniorities: Vec<String>,
	pub technologies: Vec<String>,
	pub keywords: Vec<String>,
	pub revenue_ranges: Vec<String>,
	pub intent_topics: Vec<String>,
	pub email_statuses: Vec<String>,
	pub management_levels: Vec<String>,
	pub previous_companies: Vec<String>,
	pub schools: Vec<String>,
	pub recent_job_change: Option<bool>,
}

impl FilterSet {
	pub fn is_empty(&self) -> bool {
		self.active_field_count() == 0
	}

	/// Number of fields carrying at least one value.
	pub fn active_field_count(&self) -> u32 {
		let mut count = 0;

		for field in self.list_fields() {
			if !field.is_empty() {
				count += 1;
			}
		}
		if self.recent_job_change.is_some() {
			count += 1;
		}

		count
	}

	/// Union-merge: every field only ever gains values. Comparison is
	/// case-insensitive on trimmed values; first spelling wins.
	pub fn merge(&mut self, other: &FilterSet) {
		union_into(&mut self.job_titles, &other.job_titles);
		union_into(&mut self.locations, &other.locations);
		union_into(&mut self.industries, &other.industries);
		union_into(&mut self.company_sizes, &other.company_sizes);
		union_into(&mut self.companies, &other.companies);
		union_into(&mut self.seniorities, &other.seniorities);
		union_into(&mut self.technologies, &other.technologies);
		union_into(&mut self.keywords, &other.keywords);
		union_into(&mut self.revenue_ranges, &other.revenue_ranges);
		union_into(&mut self.intent_topics, &other.intent_topics);
		union_into(&mut self.email_statuses, &other.email_statuses);
		union_into(&mut self.management_levels, &other.management_levels);
		union_into(&mut self.previous_companies, &other.previous_companies);
		union_into(&mut self.schools, &other.schools);

		if other.recent_job_change.is_some() {
			self.recent_job_change = other.recent_job_change;
		}
	}

	/// Lowercased, trimmed, per-field-sorted copy. Used for cache keys so
	/// that spelling and ordering differences collapse to one entry.
	pub fn normalized(&self) -> FilterSet {
		FilterSet {
			job_titles: normalize_values(&self.job_titles),
			locations: normalize_values(&self.locations),
			industries: normalize_values(&self.industries),
			company_sizes: normalize_values(&self.company_sizes),
			companies: normalize_values(&self.companies),
			seniorities: normalize_values(&self.seniorities),
			technologies: normalize_values(&self.technologies),
			keywords: normalize_values(&self.keywords),
			revenue_ranges: normalize_values(&self.revenue_ranges),
			intent_topics: normalize_values(&self.intent_topics),
			email_statuses: normalize_values(&self.email_statuses),
			management_levels: normalize_values(&self.management_levels),
			previous_companies: normalize_values(&self.previous_companies),
			schools: normalize_values(&self.schools),
			recent_job_change: self.recent_job_change,
		}
	}

	fn list_fields(&self) -> [&Vec<String>; 14] {
		[
			&self.job_titles,
			&self.locations,
			&self.industries,
			&self.company_sizes,
			&self.companies,
			&self.seniorities,
			&self.technologies,
			&self.keywords,
			&self.revenue_ranges,
			&self.intent_topics,
			&self.email_statuses,
			&self.management_levels,
			&self.previous_companies,
			&self.schools,
		]
	}
}

fn union_into(target: &mut Vec<String>, additions: &[String]) {
	for addition in additions {
		let trimmed = addition.trim();

		if trimmed.is_empty() {
			continue;
		}
		if target.iter().any(|existing| existing.trim().eq_ignore_ascii_case(trimmed)) {
			continue;
		}

		target.push(trimmed.to_string());
	}
}

fn normalize_values(values: &[String]) -> Vec<String> {
	let mut out: Vec<String> =
		values.iter().map(|value| value.trim().to_lowercase()).filter(|v| !v.is_empty()).collect();

	out.sort();
	out.dedup();

	out
}

/// Whether a company filter value already names a domain ("acme.io") rather
/// than a company ("Acme Corp").
pub fn looks_like_domain(value: &str) -> bool {
	static DOMAIN: OnceLock<Regex> = OnceLock::new();

	let re = DOMAIN.get_or_init(|| {
		Regex::new(r"^[a-z0-9][a-z0-9-]*(\.[a-z0-9][a-z0-9-]*)+$").expect("Domain regex is valid")
	});

	re.is_match(value.trim().to_lowercase().as_str())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn merge_unions_without_replacing() {
		let mut base = FilterSet {
			locations: vec!["Texas".to_string()],
			job_titles: vec!["VP of Sales".to_string()],
			..Default::default()
		};
		let addition =
			FilterSet { locations: vec!["California".to_string()], ..Default::default() };

		base.merge(&addition);

		assert_eq!(base.locations, vec!["Texas".to_string(), "California".to_string()]);
		assert_eq!(base.job_titles, vec!["VP of Sales".to_string()]);
	}

	#[test]
	fn merge_dedupes_case_insensitively() {
		let mut base = FilterSet { locations: vec!["Texas".to_string()], ..Default::default() };
		let addition = FilterSet { locations: vec!["texas ".to_string()], ..Default::default() };

		base.merge(&addition);

		assert_eq!(base.locations, vec!["Texas".to_string()]);
	}

	#[test]
	fn normalized_collapses_ordering_and_case() {
		let a = FilterSet {
			job_titles: vec!["CTO".to_string(), "VP of Sales".to_string()],
			..Default::default()
		};
		let b = FilterSet {
			job_titles: vec!["vp of sales".to_string(), "cto".to_string()],
			..Default::default()
		};

		assert_eq!(a.normalized(), b.normalized());
	}

	#[test]
	fn detects_domains() {
		assert!(looks_like_domain("acme.io"));
		assert!(looks_like_domain("Sub.Acme-Corp.com"));
		assert!(!looks_like_domain("Acme Corp"));
		assert!(!looks_like_domain("acme"));
	}
}
