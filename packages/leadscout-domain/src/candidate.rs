use serde::{Deserialize, Serialize};

/// Email verification quality, ordered best-first. Used as a deterministic
/// tie-break so higher-trust contacts surface before relevance scoring runs.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmailStatus {
	Verified,
	Valid,
	Guessed,
	Unavailable,
	#[default]
	Unknown,
}
impl EmailStatus {
	pub fn parse(raw: &str) -> Self {
		match raw.trim().to_lowercase().as_str() {
			"verified" => Self::Verified,
			"valid" => Self::Valid,
			"guessed" => Self::Guessed,
			"unavailable" => Self::Unavailable,
			_ => Self::Unknown,
		}
	}

	pub fn tier(self) -> u8 {
		match self {
			Self::Verified => 0,
			Self::Valid => 1,
			Self::Guessed => 2,
			Self::Unavailable => 3,
			Self::Unknown => 4,
		}
	}
}

/// Raw person record as returned by the people-search provider.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Candidate {
	pub id: String,
	pub first_name: String,
	pub last_name: String,
	pub email: Option<String>,
	pub title: String,
	pub company: String,
	pub location: String,
	pub industry: String,
	pub company_size: String,
	pub technologies: Vec<String>,
	pub email_status: EmailStatus,
	pub linkedin_url: Option<String>,
}

impl Candidate {
	/// Identity used to collapse duplicates: lowercased email when present,
	/// else the provider-assigned record id.
	pub fn dedupe_key(&self) -> String {
		match self.email.as_deref().map(str::trim).filter(|email| !email.is_empty()) {
			Some(email) => email.to_lowercase(),
			None => self.id.clone(),
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScoredLead {
	#[serde(flatten)]
	pub candidate: Candidate,
	pub icp_score: f32,
	pub overall_score: f32,
	pub match_reasons: Vec<String>,
	pub unmatch_reasons: Vec<String>,
}

/// Best-email-first ordering, stable within a tier.
pub fn sort_by_email_tier(candidates: &mut [Candidate]) {
	candidates.sort_by_key(|candidate| candidate.email_status.tier());
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn dedupe_key_prefers_lowercased_email() {
		let candidate = Candidate {
			id: "p1".to_string(),
			email: Some("Jane@Acme.IO".to_string()),
			..Default::default()
		};

		assert_eq!(candidate.dedupe_key(), "jane@acme.io");
	}

	#[test]
	fn dedupe_key_falls_back_to_id() {
		let candidate = Candidate { id: "p2".to_string(), email: None, ..Default::default() };

		assert_eq!(candidate.dedupe_key(), "p2");

		let blank =
			Candidate { id: "p3".to_string(), email: Some("  ".to_string()), ..Default::default() };

		assert_eq!(blank.dedupe_key(), "p3");
	}

	#[test]
	fn email_tier_sort_puts_verified_first() {
		let mut candidates = vec![
			Candidate { id: "a".to_string(), email_status: EmailStatus::Unknown, ..Default::default() },
			Candidate {
				id: "b".to_string(),
				email_status: EmailStatus::Verified,
				..Default::default()
			},
			Candidate { id: "c".to_string(), email_status: EmailStatus::Guessed, ..Default::default() },
		];

		sort_by_email_tier(&mut candidates);

		assert_eq!(candidates[0].id, "b");
		assert_eq!(candidates[1].id, "c");
		assert_eq!(candidates[2].id, "a");
	}
}
