use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{LeadSearchService, Result, fetch::FetchOutcome};
use leadscout_domain::{
	filters::FilterSet,
	relaxation::{self, FieldChange},
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BroadeningStep {
	pub description: String,
	pub changes: Vec<FieldChange>,
	pub result_count: u64,
}

pub(crate) struct BroadenedFetch {
	pub(crate) outcome: FetchOutcome,
	pub(crate) filters: FilterSet,
	pub(crate) steps: Vec<BroadeningStep>,
	pub(crate) fallback_used: bool,
}

impl LeadSearchService {
	/// Initial fetch plus the fallback broadening loop. Relaxation attempts
	/// run strictly sequentially (each decision compares against the best
	/// count so far), bounded by the attempt budget; a relaxation is kept
	/// only when it strictly improves the result count.
	pub(crate) async fn fetch_with_broadening(
		&self,
		user_id: &str,
		filters: &FilterSet,
		page: u32,
		per_page: u32,
	) -> Result<BroadenedFetch> {
		let policy = &self.cfg.search.broadening;
		let initial = self.fetch(user_id, filters, page, per_page).await?;
		let mut attempts: u32 = 1;

		if initial.pagination.total_results >= policy.min_results {
			return Ok(BroadenedFetch {
				outcome: initial,
				filters: filters.clone(),
				steps: Vec::new(),
				fallback_used: false,
			});
		}

		let mut best = initial;
		let mut best_filters = filters.clone();
		let mut steps = Vec::new();
		let mut fallback_used = false;

		for relaxation in relaxation::relaxation_candidates(filters) {
			if attempts >= policy.max_attempts {
				break;
			}
			if best.pagination.total_results >= policy.target_results {
				break;
			}

			let outcome = match self.fetch(user_id, &relaxation.filters, page, per_page).await {
				Ok(outcome) => outcome,
				Err(err) => {
					// Degrade to the best result so far instead of failing a
					// search that already produced something.
					warn!(error = %err, "Broadening attempt failed; keeping best result so far.");

					break;
				},
			};

			attempts += 1;

			let count = outcome.pagination.total_results;

			debug!(attempt = attempts, count, description = %relaxation.description, "Broadening attempt.");
			steps.push(BroadeningStep {
				description: relaxation.description,
				changes: relaxation.changes,
				result_count: count,
			});

			if count > best.pagination.total_results {
				best = outcome;
				best_filters = relaxation.filters;
				fallback_used = true;
			}
		}

		Ok(BroadenedFetch { outcome: best, filters: best_filters, steps, fallback_used })
	}
}
