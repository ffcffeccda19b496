use serde::{Deserialize, Serialize};

use crate::candidate::{Candidate, ScoredLead};

const TITLE_WEIGHT: f32 = 0.40;
const INDUSTRY_WEIGHT: f32 = 0.25;
const LOCATION_WEIGHT: f32 = 0.20;
const COMPANY_SIZE_WEIGHT: f32 = 0.15;

/// Event-count saturation constant for profile confidence: confidence is
/// n / (n + 15), so ~0.25 at 5 events and ~0.6 at 20.
const CONFIDENCE_HALF_SATURATION: f32 = 15.0;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedValue {
	pub value: String,
	pub weight: f32,
}

/// Learned preference model. Recalculated from outcome feedback outside the
/// request path; read-only during a search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct IcpProfile {
	pub preferred_titles: Vec<WeightedValue>,
	pub preferred_industries: Vec<WeightedValue>,
	pub preferred_locations: Vec<WeightedValue>,
	pub preferred_company_sizes: Vec<WeightedValue>,
	pub confidence: f32,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
	ThumbsUp,
	ThumbsDown,
	Imported,
	Emailed,
	Opened,
	Replied,
	Converted,
	Unsubscribed,
}
impl FeedbackKind {
	/// Signed contribution of one outcome to the attribute weights.
	fn weight(self) -> f32 {
		match self {
			Self::ThumbsUp => 0.6,
			Self::ThumbsDown => -0.6,
			Self::Imported => 0.3,
			Self::Emailed => 0.1,
			Self::Opened => 0.3,
			Self::Replied => 1.0,
			Self::Converted => 1.5,
			Self::Unsubscribed => -1.0,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedbackEvent {
	pub kind: FeedbackKind,
	pub title: String,
	pub industry: String,
	pub location: String,
	pub company_size: String,
}

/// Scores deduplicated candidates against the profile, sorted descending by
/// overall score. Below `min_confidence` scoring is bypassed entirely: every
/// lead gets the flat `neutral_score` and no reasons, rather than
/// explanations the model cannot back.
pub fn score_candidates(
	profile: &IcpProfile,
	candidates: Vec<Candidate>,
	min_confidence: f32,
	neutral_score: f32,
) -> Vec<ScoredLead> {
	if profile.confidence < min_confidence {
		return candidates
			.into_iter()
			.map(|candidate| ScoredLead {
				candidate,
				icp_score: neutral_score,
				overall_score: neutral_score,
				match_reasons: Vec::new(),
				unmatch_reasons: Vec::new(),
			})
			.collect();
	}

	let mut leads: Vec<ScoredLead> =
		candidates.into_iter().map(|candidate| score_one(profile, candidate)).collect();

	leads.sort_by(|a, b| {
		b.overall_score.partial_cmp(&a.overall_score).unwrap_or(std::cmp::Ordering::Equal)
	});

	leads
}

fn score_one(profile: &IcpProfile, candidate: Candidate) -> ScoredLead {
	let mut score = 0.0;
	let mut match_reasons = Vec::new();
	let mut unmatch_reasons = Vec::new();

	match best_title_match(&profile.preferred_titles, &candidate.title) {
		Some(matched) => {
			score += TITLE_WEIGHT * matched.weight.clamp(0.0, 1.0);

			match_reasons.push(format!("Title matches preferred pattern \"{}\"", matched.value));
		},
		None => unmatch_reasons.push(format!("Title \"{}\" is outside your usual targets", candidate.title)),
	}

	match best_exact_match(&profile.preferred_industries, &candidate.industry) {
		Some(matched) => {
			score += INDUSTRY_WEIGHT * matched.weight.clamp(0.0, 1.0);

			match_reasons.push(format!("Industry {} is a frequent win", matched.value));
		},
		None if candidate.industry.is_empty() => {},
		None => unmatch_reasons.push(format!("Industry {} has not converted before", candidate.industry)),
	}

	match best_contains_match(&profile.preferred_locations, &candidate.location) {
		Some(matched) => {
			score += LOCATION_WEIGHT * matched.weight.clamp(0.0, 1.0);

			match_reasons.push(format!("Location matches {}", matched.value));
		},
		None if candidate.location.is_empty() => {},
		None => unmatch_reasons.push(format!("Location {} is outside preferred regions", candidate.location)),
	}

	match best_exact_match(&profile.preferred_company_sizes, &candidate.company_size) {
		Some(matched) => {
			score += COMPANY_SIZE_WEIGHT * matched.weight.clamp(0.0, 1.0);

			match_reasons.push(format!("Company size {} fits your sweet spot", matched.value));
		},
		None if candidate.company_size.is_empty() => {},
		None => unmatch_reasons
			.push(format!("Company size {} is outside your sweet spot", candidate.company_size)),
	}

	let icp_score = (score * 100.0).clamp(0.0, 100.0);

	ScoredLead {
		candidate,
		icp_score,
		overall_score: icp_score,
		match_reasons,
		unmatch_reasons,
	}
}

fn best_title_match<'a>(preferred: &'a [WeightedValue], title: &str) -> Option<&'a WeightedValue> {
	let lowered = title.to_lowercase();

	best_of(preferred.iter().filter(|entry| lowered.contains(&entry.value.to_lowercase())))
}

fn best_exact_match<'a>(preferred: &'a [WeightedValue], value: &str) -> Option<&'a WeightedValue> {
	best_of(preferred.iter().filter(|entry| entry.value.eq_ignore_ascii_case(value.trim())))
}

fn best_contains_match<'a>(preferred: &'a [WeightedValue], value: &str) -> Option<&'a WeightedValue> {
	let lowered = value.to_lowercase();

	best_of(preferred.iter().filter(|entry| lowered.contains(&entry.value.to_lowercase())))
}

fn best_of<'a>(candidates: impl Iterator<Item = &'a WeightedValue>) -> Option<&'a WeightedValue> {
	candidates.max_by(|a, b| a.weight.partial_cmp(&b.weight).unwrap_or(std::cmp::Ordering::Equal))
}

/// Folds accumulated outcome feedback into a fresh profile. Attribute weights
/// are the normalized sum of signed outcome contributions; confidence
/// saturates with event count so a handful of events never unlocks scoring.
pub fn recalculate_profile(events: &[FeedbackEvent]) -> IcpProfile {
	let mut titles: Vec<WeightedValue> = Vec::new();
	let mut industries: Vec<WeightedValue> = Vec::new();
	let mut locations: Vec<WeightedValue> = Vec::new();
	let mut sizes: Vec<WeightedValue> = Vec::new();

	for event in events {
		let weight = event.kind.weight();

		accumulate(&mut titles, &event.title, weight);
		accumulate(&mut industries, &event.industry, weight);
		accumulate(&mut locations, &event.location, weight);
		accumulate(&mut sizes, &event.company_size, weight);
	}

	normalize(&mut titles);
	normalize(&mut industries);
	normalize(&mut locations);
	normalize(&mut sizes);

	let count = events.len() as f32;

	IcpProfile {
		preferred_titles: titles,
		preferred_industries: industries,
		preferred_locations: locations,
		preferred_company_sizes: sizes,
		confidence: count / (count + CONFIDENCE_HALF_SATURATION),
	}
}

fn accumulate(target: &mut Vec<WeightedValue>, value: &str, weight: f32) {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return;
	}

	match target.iter_mut().find(|entry| entry.value.eq_ignore_ascii_case(trimmed)) {
		Some(entry) => entry.weight += weight,
		None => target.push(WeightedValue { value: trimmed.to_string(), weight }),
	}
}

fn normalize(target: &mut Vec<WeightedValue>) {
	target.retain(|entry| entry.weight > 0.0);

	let max = target.iter().map(|entry| entry.weight).fold(0.0_f32, f32::max);

	if max <= 0.0 {
		return;
	}

	for entry in target.iter_mut() {
		entry.weight /= max;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn event(kind: FeedbackKind, title: &str, industry: &str) -> FeedbackEvent {
		FeedbackEvent {
			kind,
			title: title.to_string(),
			industry: industry.to_string(),
			location: "Austin, TX".to_string(),
			company_size: "51-200".to_string(),
		}
	}

	#[test]
	fn low_confidence_profile_yields_flat_neutral_scores() {
		let profile = IcpProfile { confidence: 0.1, ..Default::default() };
		let leads = score_candidates(
			&profile,
			vec![Candidate { id: "a".to_string(), ..Default::default() }],
			0.2,
			50.0,
		);

		assert_eq!(leads[0].icp_score, 50.0);
		assert!(leads[0].match_reasons.is_empty());
		assert!(leads[0].unmatch_reasons.is_empty());
	}

	#[test]
	fn scoring_produces_reasons_and_descending_order() {
		let profile = IcpProfile {
			preferred_titles: vec![WeightedValue { value: "VP of Sales".to_string(), weight: 1.0 }],
			preferred_industries: vec![WeightedValue { value: "Software".to_string(), weight: 1.0 }],
			confidence: 0.8,
			..Default::default()
		};
		let strong = Candidate {
			id: "strong".to_string(),
			title: "VP of Sales".to_string(),
			industry: "Software".to_string(),
			..Default::default()
		};
		let weak = Candidate {
			id: "weak".to_string(),
			title: "Intern".to_string(),
			industry: "Retail".to_string(),
			..Default::default()
		};
		let leads = score_candidates(&profile, vec![weak, strong], 0.2, 50.0);

		assert_eq!(leads[0].candidate.id, "strong");
		assert!(leads[0].icp_score > leads[1].icp_score);
		assert!(!leads[0].match_reasons.is_empty());
		assert!(!leads[1].unmatch_reasons.is_empty());
	}

	#[test]
	fn recalculation_rewards_converting_attributes() {
		let events = vec![
			event(FeedbackKind::Converted, "VP of Sales", "Software"),
			event(FeedbackKind::Replied, "VP of Sales", "Software"),
			event(FeedbackKind::Unsubscribed, "Intern", "Retail"),
		];
		let profile = recalculate_profile(&events);

		assert!(profile.preferred_titles.iter().any(|t| t.value == "VP of Sales"));
		assert!(!profile.preferred_titles.iter().any(|t| t.value == "Intern"));
		assert!(profile.confidence > 0.0 && profile.confidence < 1.0);
	}

	#[test]
	fn confidence_saturates_with_event_count() {
		let few = recalculate_profile(&vec![event(FeedbackKind::Replied, "A", "B"); 2]);
		let many = recalculate_profile(&vec![event(FeedbackKind::Replied, "A", "B"); 40]);

		assert!(few.confidence < 0.2);
		assert!(many.confidence > 0.6);
	}
}
