//! Deterministic expansion of broad query terms into concrete filter values.
//! The tables are intentionally small and literal; anything not listed passes
//! through untouched.

struct OccupationExpansion {
	term: &'static str,
	titles: &'static [&'static str],
}

/// Each occupation expands across common title variants plus the ownership
/// titles people in that occupation tend to carry.
const OCCUPATIONS: [OccupationExpansion; 8] = [
	OccupationExpansion {
		term: "salespeople",
		titles: &[
			"Sales Representative",
			"Account Executive",
			"Sales Manager",
			"VP of Sales",
			"Head of Sales",
		],
	},
	OccupationExpansion {
		term: "marketers",
		titles: &[
			"Marketing Manager",
			"Digital Marketing Manager",
			"VP of Marketing",
			"Head of Marketing",
			"CMO",
		],
	},
	OccupationExpansion {
		term: "engineers",
		titles: &[
			"Software Engineer",
			"Senior Software Engineer",
			"Engineering Manager",
			"VP of Engineering",
			"CTO",
		],
	},
	OccupationExpansion {
		term: "recruiters",
		titles: &["Recruiter", "Technical Recruiter", "Talent Acquisition Manager", "Head of Talent"],
	},
	OccupationExpansion {
		term: "founders",
		titles: &["Founder", "Co-Founder", "CEO", "Owner"],
	},
	OccupationExpansion {
		term: "realtors",
		titles: &["Real Estate Agent", "Realtor", "Real Estate Broker", "Broker Owner"],
	},
	OccupationExpansion {
		term: "dentists",
		titles: &["Dentist", "Dental Practice Owner", "Orthodontist"],
	},
	OccupationExpansion {
		term: "accountants",
		titles: &["Accountant", "CPA", "Controller", "CFO", "Accounting Firm Owner"],
	},
];

struct SeniorityExpansion {
	term: &'static str,
	tiers: &'static [&'static str],
}

/// Adjectives expand into contiguous runs of the ordered seniority tiers in
/// [`crate::options::SENIORITIES`].
const SENIORITY_TERMS: [SeniorityExpansion; 4] = [
	SeniorityExpansion { term: "executives", tiers: &["vp", "c_suite", "partner", "owner"] },
	SeniorityExpansion { term: "leadership", tiers: &["director", "head", "vp", "c_suite"] },
	SeniorityExpansion { term: "junior", tiers: &["intern", "entry"] },
	SeniorityExpansion { term: "mid-level", tiers: &["senior", "manager"] },
];

struct CompanyGroupExpansion {
	term: &'static str,
	companies: &'static [&'static str],
}

const COMPANY_GROUPS: [CompanyGroupExpansion; 3] = [
	CompanyGroupExpansion {
		term: "faang",
		companies: &["Facebook", "Apple", "Amazon", "Netflix", "Google"],
	},
	CompanyGroupExpansion {
		term: "big four",
		companies: &["Deloitte", "PwC", "EY", "KPMG"],
	},
	CompanyGroupExpansion {
		term: "big 4",
		companies: &["Deloitte", "PwC", "EY", "KPMG"],
	},
];

pub fn expand_job_titles(values: &[String]) -> Vec<String> {
	expand(values, |term| {
		OCCUPATIONS
			.iter()
			.find(|occupation| matches_term(term, occupation.term))
			.map(|occupation| occupation.titles)
	})
}

pub fn expand_seniorities(values: &[String]) -> Vec<String> {
	expand(values, |term| {
		SENIORITY_TERMS
			.iter()
			.find(|seniority| matches_term(term, seniority.term))
			.map(|seniority| seniority.tiers)
	})
}

pub fn expand_companies(values: &[String]) -> Vec<String> {
	expand(values, |term| {
		COMPANY_GROUPS.iter().find(|group| matches_term(term, group.term)).map(|group| group.companies)
	})
}

fn expand(values: &[String], lookup: impl Fn(&str) -> Option<&'static [&'static str]>) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for value in values {
		let trimmed = value.trim();

		match lookup(trimmed) {
			Some(expanded) =>
				for item in expanded {
					push_unique(&mut out, item);
				},
			None => push_unique(&mut out, trimmed),
		}
	}

	out
}

fn matches_term(value: &str, term: &str) -> bool {
	let lowered = value.to_lowercase();

	// "salespeople" also covers the singular and the bare profession noun.
	lowered == term || lowered == term.trim_end_matches('s') || lowered == format!("{term}s")
}

fn push_unique(target: &mut Vec<String>, value: &str) {
	if value.is_empty() {
		return;
	}
	if target.iter().any(|existing| existing.eq_ignore_ascii_case(value)) {
		return;
	}

	target.push(value.to_string());
}
