use std::collections::HashSet;

use crate::candidate::Candidate;

/// Collapses candidates sharing a dedupe key (lowercased email, else record
/// id). First-seen wins; order is preserved; idempotent.
pub fn dedupe(candidates: Vec<Candidate>) -> Vec<Candidate> {
	let mut seen = HashSet::with_capacity(candidates.len());
	let mut out = Vec::with_capacity(candidates.len());

	for candidate in candidates {
		if seen.insert(candidate.dedupe_key()) {
			out.push(candidate);
		}
	}

	out
}
