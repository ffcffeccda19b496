use std::{collections::HashMap, sync::Mutex};

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, Result};
use leadscout_domain::filters::FilterSet;

/// Options the original search ran with, carried on the session so
/// refinements and undos answer with the same shape.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SearchOptions {
	pub per_page: u32,
	pub icp_scoring_enabled: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefinementEntry {
	pub command: String,
	#[serde(with = "crate::time_serde")]
	pub at: OffsetDateTime,
	pub filters_before: FilterSet,
	pub filters_after: FilterSet,
}

/// One user's search thread. `current_step` indexes the refinement history:
/// 0 means the original filters, N means `history[N - 1].filters_after`.
/// Undo only ever moves the pointer backward; history entries are never
/// deleted, so refining again after an undo keeps the older branch visible.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchSession {
	pub session_id: Uuid,
	pub user_id: String,
	pub query: String,
	pub original_filters: FilterSet,
	pub confidence: f32,
	pub explanation: String,
	pub options: SearchOptions,
	pub history: Vec<RefinementEntry>,
	pub current_step: usize,
	pub result_count: u64,
	pub duration_ms: u64,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

impl SearchSession {
	pub fn current_filters(&self) -> &FilterSet {
		if self.current_step == 0 {
			&self.original_filters
		} else {
			&self.history[self.current_step - 1].filters_after
		}
	}

	pub fn can_undo(&self) -> bool {
		self.current_step > 0
	}
}

struct SessionEntry {
	session: SearchSession,
	expires_at: OffsetDateTime,
}

/// Sessions carry a sliding expiry: every access pushes `expires_at` out by
/// the TTL, and the periodic sweep drops whatever went untouched.
pub(crate) struct SessionStore {
	ttl: Duration,
	inner: Mutex<HashMap<Uuid, SessionEntry>>,
}

impl SessionStore {
	pub(crate) fn new(ttl_secs: i64) -> Self {
		Self { ttl: Duration::seconds(ttl_secs), inner: Mutex::new(HashMap::new()) }
	}

	#[allow(clippy::too_many_arguments)]
	pub(crate) fn create(
		&self,
		user_id: &str,
		query: &str,
		filters: FilterSet,
		confidence: f32,
		explanation: &str,
		options: SearchOptions,
		now: OffsetDateTime,
	) -> Uuid {
		let session_id = Uuid::new_v4();
		let session = SearchSession {
			session_id,
			user_id: user_id.to_string(),
			query: query.to_string(),
			original_filters: filters,
			confidence,
			explanation: explanation.to_string(),
			options,
			history: Vec::new(),
			current_step: 0,
			result_count: 0,
			duration_ms: 0,
			created_at: now,
		};
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());

		inner.insert(session_id, SessionEntry { session, expires_at: now + self.ttl });

		session_id
	}

	/// Unknown, foreign, and expired session ids are indistinguishable to the
	/// caller.
	fn live_entry<'a>(
		inner: &'a mut HashMap<Uuid, SessionEntry>,
		session_id: Uuid,
		user_id: &str,
		now: OffsetDateTime,
	) -> Result<&'a mut SessionEntry> {
		inner
			.get_mut(&session_id)
			.filter(|entry| entry.session.user_id == user_id && entry.expires_at > now)
			.ok_or_else(|| Error::NotFound { message: "Unknown session id.".to_string() })
	}

	pub(crate) fn get(
		&self,
		session_id: Uuid,
		user_id: &str,
		now: OffsetDateTime,
	) -> Result<SearchSession> {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
		let entry = Self::live_entry(&mut inner, session_id, user_id, now)?;

		entry.expires_at = now + self.ttl;

		Ok(entry.session.clone())
	}

	pub(crate) fn record_result(&self, session_id: Uuid, result_count: u64, duration_ms: u64) {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());

		if let Some(entry) = inner.get_mut(&session_id) {
			entry.session.result_count = result_count;
			entry.session.duration_ms = duration_ms;
		}
	}

	/// Merges extracted refinement filters into the current set by per-field
	/// union, appends a history entry, and advances the step pointer.
	pub(crate) fn refine(
		&self,
		session_id: Uuid,
		user_id: &str,
		command: &str,
		extracted: &FilterSet,
		now: OffsetDateTime,
	) -> Result<FilterSet> {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
		let entry = Self::live_entry(&mut inner, session_id, user_id, now)?;
		let session = &mut entry.session;
		let filters_before = session.current_filters().clone();
		let mut filters_after = filters_before.clone();

		filters_after.merge(extracted);

		session.history.push(RefinementEntry {
			command: command.to_string(),
			at: now,
			filters_before,
			filters_after: filters_after.clone(),
		});

		session.current_step = session.history.len();
		entry.expires_at = now + self.ttl;

		Ok(filters_after)
	}

	/// Moves the step pointer back one refinement. Fails with the session
	/// unchanged when there is nothing to undo.
	pub(crate) fn undo(
		&self,
		session_id: Uuid,
		user_id: &str,
		now: OffsetDateTime,
	) -> Result<SearchSession> {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
		let entry = Self::live_entry(&mut inner, session_id, user_id, now)?;

		if entry.session.current_step == 0 {
			return Err(Error::Conflict { message: "Nothing to undo.".to_string() });
		}

		entry.session.current_step -= 1;
		entry.expires_at = now + self.ttl;

		Ok(entry.session.clone())
	}

	/// Removes expired sessions regardless of access. Returns the number of
	/// sessions dropped.
	pub(crate) fn sweep(&self, now: OffsetDateTime) -> usize {
		let mut inner = self.inner.lock().unwrap_or_else(|err| err.into_inner());
		let before = inner.len();

		inner.retain(|_, entry| entry.expires_at > now);

		before - inner.len()
	}
}
