//! Per-state leading party.
//!
//! Within a state every poll is weighted by its age in days relative to the state's latest poll,
//! so the latest poll contributes nothing and older polls count more. A party's score is the sum
//! of its numbers times those weights; the leader is the highest score, and on equal scores the
//! party whose column comes first.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::{
	prelude::LOG_TARGET,
	types::{StateBatch, StateLeadResult, StatePoll},
};

/// Days between the state's latest publish date and each poll's, in input order.
pub fn days_difference(polls: &[&StatePoll]) -> Vec<i64> {
	let Some(latest) = polls.iter().map(|p| p.published).max() else {
		return Vec::new();
	};
	polls.iter().map(|p| (latest - p.published).num_days()).collect()
}

/// Index of the highest score; the first one wins a tie. `None` if there are no scores.
pub fn leading_index(scores: &[f64]) -> Option<usize> {
	let mut best: Option<(usize, f64)> = None;
	for (idx, score) in scores.iter().copied().enumerate() {
		match best {
			Some((_, best_score)) if score <= best_score => {},
			// NaN never leads.
			_ if score.is_nan() => {},
			_ => best = Some((idx, score)),
		}
	}
	best.map(|(idx, _)| idx)
}

/// Score every state of the batch, ordered by state name.
pub fn aggregate(batch: &StateBatch) -> Vec<StateLeadResult> {
	let mut by_state: BTreeMap<&str, Vec<&StatePoll>> = BTreeMap::new();
	for poll in &batch.polls {
		by_state.entry(poll.state.as_str()).or_default().push(poll);
	}

	by_state
		.into_iter()
		.map(|(state, polls)| {
			let weights = days_difference(&polls);
			let mut totals = vec![0.0_f64; batch.parties.len()];
			for (poll, weight) in polls.iter().zip(&weights) {
				for (total, value) in totals.iter_mut().zip(&poll.values) {
					// A missing number contributes nothing for that party only.
					*total += value.unwrap_or(0.0) * *weight as f64;
				}
			}

			let leading_party = leading_index(&totals)
				.and_then(|idx| batch.parties.get(idx))
				.cloned()
				.unwrap_or_default();
			log::debug!(
				target: LOG_TARGET,
				"{state}: {} polls, latest {:?}, leading {leading_party}",
				polls.len(),
				polls.iter().map(|p| p.published).max().unwrap_or(NaiveDate::MIN)
			);

			StateLeadResult {
				state: state.to_string(),
				scores: batch.parties.iter().cloned().zip(totals).collect(),
				leading_party,
			}
		})
		.collect()
}
