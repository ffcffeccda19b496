/// Canonical option lists. Extraction output is validated against these:
/// values that do not match case-insensitively are dropped, never coerced.
pub const COMPANY_SIZES: [&str; 8] =
	["1-10", "11-50", "51-200", "201-500", "501-1000", "1001-5000", "5001-10000", "10001+"];

/// Ordered from most junior to most senior.
pub const SENIORITIES: [&str; 10] = [
	"intern", "entry", "senior", "manager", "director", "head", "vp", "c_suite", "partner", "owner",
];

pub const REVENUE_RANGES: [&str; 7] =
	["0-1M", "1M-10M", "10M-50M", "50M-100M", "100M-500M", "500M-1B", "1B+"];

pub const INDUSTRIES: [&str; 28] = [
	"Accounting",
	"Agriculture",
	"Automotive",
	"Banking",
	"Biotechnology",
	"Construction",
	"Consulting",
	"Consumer Goods",
	"Education",
	"Energy",
	"Financial Services",
	"Food & Beverage",
	"Government",
	"Healthcare",
	"Hospitality",
	"Insurance",
	"Legal Services",
	"Logistics",
	"Manufacturing",
	"Marketing & Advertising",
	"Media",
	"Nonprofit",
	"Pharmaceuticals",
	"Real Estate",
	"Retail",
	"Software",
	"Telecommunications",
	"Transportation",
];

pub const EMAIL_STATUS_OPTIONS: [&str; 4] = ["verified", "valid", "guessed", "unavailable"];

pub const MANAGEMENT_LEVELS: [&str; 4] = ["individual_contributor", "manager", "director", "executive"];

/// Keeps only values present in `options`, matched case-insensitively on the
/// trimmed value, emitting the canonical spelling. Order follows the input;
/// duplicates collapse to the first occurrence.
pub fn canonicalize(values: &[String], options: &[&str]) -> Vec<String> {
	let mut out: Vec<String> = Vec::new();

	for value in values {
		let trimmed = value.trim();
		let Some(canonical) = options.iter().find(|option| option.eq_ignore_ascii_case(trimmed))
		else {
			continue;
		};

		if out.iter().any(|existing| existing == canonical) {
			continue;
		}

		out.push((*canonical).to_string());
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn canonicalize_drops_unknown_values() {
		let values = vec!["11-50".to_string(), "huge".to_string(), " 10001+ ".to_string()];

		assert_eq!(canonicalize(&values, &COMPANY_SIZES), vec!["11-50", "10001+"]);
	}

	#[test]
	fn canonicalize_restores_canonical_casing() {
		let values = vec!["SOFTWARE".to_string(), "real estate".to_string()];

		assert_eq!(canonicalize(&values, &INDUSTRIES), vec!["Software", "Real Estate"]);
	}

	#[test]
	fn canonicalize_collapses_duplicates() {
		let values = vec!["vp".to_string(), "VP".to_string()];

		assert_eq!(canonicalize(&values, &SENIORITIES), vec!["vp"]);
	}
}
