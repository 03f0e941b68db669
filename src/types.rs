//! Data structures shared by the ingest, scoring and aggregation stages.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::{
	opt::{Party, QualityWeights, RoundingRule},
	prelude::{AGENCY_SEPARATOR, PartySeats, PartyValues},
};

// ============================================================================
// National poll batch
// ============================================================================

/// One validated row of the national poll batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Poll {
	/// The agency cell as published, e.g. `ABP News-CVoter`.
	pub agency: String,
	/// The individual agencies of a pooled release, in cell order.
	pub agencies: Vec<String>,
	pub published: NaiveDate,
	pub sample_size: u64,
	/// In percentage points.
	pub margin_of_error: f64,
	pub values: PartyValues,
}

impl Poll {
	/// Splits a compound agency cell into its trimmed, non-empty parts.
	pub fn split_agencies(agency: &str) -> Vec<String> {
		agency
			.split(AGENCY_SEPARATOR)
			.map(str::trim)
			.filter(|a| !a.is_empty())
			.map(ToOwned::to_owned)
			.collect()
	}

	/// Whole days between publication and the election, negative for polls published after it.
	pub fn days_to_election(&self, election_date: NaiveDate) -> i64 {
		(election_date - self.published).num_days()
	}
}

/// The four sub-scores and their blend.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct QualityScores {
	pub agency: f64,
	pub sample_size: f64,
	pub margin_of_error: f64,
	pub recency: f64,
	pub overall: f64,
}

/// A poll with the scores derived from the batch it was scored in.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoll {
	pub poll: Poll,
	pub days_to_election: i64,
	pub scores: QualityScores,
}

/// One emitted step of the moving average.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRow {
	/// Index of the poll in the chronological order, skipped polls included.
	pub position: usize,
	pub poll: ScoredPoll,
	/// Snapshot of the running estimate after folding in this poll.
	pub estimate: PartyValues,
	/// Rescaled and rounded seats.
	pub seats: PartySeats,
}

impl ProjectionRow {
	pub fn total_seats(&self) -> i64 {
		self.seats.values().sum()
	}
}

// ============================================================================
// State poll batch
// ============================================================================

/// One row of the state poll batch. `values` is aligned with [`StateBatch::parties`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatePoll {
	pub state: String,
	pub published: NaiveDate,
	pub values: Vec<Option<f64>>,
}

/// The state poll batch with its open-ended party columns, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateBatch {
	pub parties: Vec<String>,
	pub polls: Vec<StatePoll>,
}

/// Recency-weighted scores of one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateLeadResult {
	pub state: String,
	/// Accumulated score per party, in party column order.
	pub scores: Vec<(String, f64)>,
	pub leading_party: String,
}

// ============================================================================
// Outputs
// ============================================================================

/// One seat of the expanded final projection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SeatRow {
	/// Running counter starting at 1.
	pub seat: u32,
	pub party: Party,
}

/// Summary of a projection run, written as JSON.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
	pub generated_at: String,
	pub election_date: NaiveDate,
	pub total_seats: u32,
	pub rounding: RoundingRule,
	pub quality_weights: QualityWeights,
	pub polls_scored: usize,
	pub polls_skipped: usize,
	pub latest_poll: Option<NaiveDate>,
	pub projection: BTreeMap<Party, i64>,
}
