//! The weighted moving-average seat projection.
//!
//! Polls are folded in chronological order into one running value per party:
//!
//! ```text
//! estimate[party] = (estimate[party] * i + value[party] * w) / (i + w)
//! ```
//!
//! where `i` is the poll's position and `w` its overall quality. The position acts as the weight
//! of everything folded in before, so the first poll replaces the initial estimate outright and
//! later polls move the average less and less. After every step the estimate is rescaled to the
//! seat total and rounded into one output row; the running estimate itself is never rounded.

use crate::{
	error::Error,
	opt::{Party, RoundingRule},
	prelude::{LOG_TARGET, PartySeats, PartyValues},
	types::{ProjectionRow, ScoredPoll},
};

/// Per-party accumulator of one aggregation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningEstimate {
	values: PartyValues,
}

impl RunningEstimate {
	pub fn new(initial: PartyValues) -> Self {
		Self { values: initial }
	}

	pub fn values(&self) -> &PartyValues {
		&self.values
	}

	/// Fold in one poll at `position` with `weight`. Parties the poll has no number for keep
	/// their current estimate.
	///
	/// Returns `false` and leaves the estimate untouched if the step is undefined: a weight
	/// that cancels the position out, or any party ending up non-finite.
	pub fn update(&mut self, position: usize, weight: f64, poll_values: &PartyValues) -> bool {
		let prior = position as f64;
		let denominator = prior + weight;
		if denominator == 0.0 || !denominator.is_finite() {
			return false;
		}

		let mut next = self.values.clone();
		for (party, estimate) in next.iter_mut() {
			if let Some(value) = poll_values.get(party) {
				*estimate = (*estimate * prior + value * weight) / denominator;
			}
		}
		if next.values().any(|v| !v.is_finite()) {
			return false;
		}

		self.values = next;
		true
	}

	pub fn total(&self) -> f64 {
		self.values.values().sum()
	}
}

/// Rescale `values` so they add up to `total_seats` and round them by `rule`.
pub fn rescale(values: &PartyValues, total_seats: u32, rule: RoundingRule) -> Option<PartySeats> {
	let sum: f64 = values.values().sum();
	if sum == 0.0 || !sum.is_finite() {
		return None;
	}
	let scale = total_seats as f64 / sum;
	let scaled = values.iter().map(|(party, v)| (*party, v * scale));

	Some(match rule {
		RoundingRule::HalfEven => scaled.map(|(party, v)| (party, v.round_ties_even() as i64)).collect(),
		RoundingRule::LargestRemainder => largest_remainder(scaled.collect(), total_seats),
	})
}

fn largest_remainder(scaled: Vec<(Party, f64)>, total_seats: u32) -> PartySeats {
	let mut seats: PartySeats = scaled.iter().map(|(party, v)| (*party, v.floor() as i64)).collect();
	let assigned: i64 = seats.values().sum();
	let remaining = (total_seats as i64 - assigned).clamp(0, scaled.len() as i64) as usize;

	let mut by_remainder: Vec<(Party, f64)> =
		scaled.iter().map(|(party, v)| (*party, v - v.floor())).collect();
	// Stable, so equal remainders keep the canonical party order.
	by_remainder.sort_by(|a, b| b.1.total_cmp(&a.1));

	for (party, _) in by_remainder.into_iter().take(remaining) {
		*seats.entry(party).or_default() += 1;
	}
	seats
}

/// Sort polls chronologically: furthest from the election first. Stable for equal days.
pub fn sort_chronologically(polls: &mut [ScoredPoll]) {
	polls.sort_by(|a, b| b.days_to_election.cmp(&a.days_to_election));
}

/// Runs the moving average over a scored batch.
#[derive(Debug, Clone, Copy)]
pub struct WmaAggregator {
	pub total_seats: u32,
	pub rounding: RoundingRule,
}

impl WmaAggregator {
	pub fn new(total_seats: u32, rounding: RoundingRule) -> Self {
		Self { total_seats, rounding }
	}

	/// One row per poll with a usable weight, in chronological order. Polls with an undefined
	/// weight, or one that makes the update undefined, keep their position in the order but are
	/// otherwise skipped.
	pub fn aggregate(
		&self,
		initial: &PartyValues,
		mut polls: Vec<ScoredPoll>,
	) -> Result<Vec<ProjectionRow>, Error> {
		sort_chronologically(&mut polls);

		let mut estimate = RunningEstimate::new(initial.clone());
		let mut rows = Vec::with_capacity(polls.len());

		for (position, poll) in polls.into_iter().enumerate() {
			let weight = poll.scores.overall;
			if !weight.is_finite() {
				log::warn!(
					target: LOG_TARGET,
					"Skipping poll by {} published {}: undefined quality weight",
					poll.poll.agency,
					poll.poll.published
				);
				continue;
			}

			if !estimate.update(position, weight, &poll.poll.values) {
				log::warn!(
					target: LOG_TARGET,
					"Skipping poll by {} published {}: weight {weight} leaves the average undefined at position {position}",
					poll.poll.agency,
					poll.poll.published
				);
				continue;
			}
			let seats = rescale(estimate.values(), self.total_seats, self.rounding)
				.ok_or(Error::ZeroSeatTotal(position))?;

			log::debug!(
				target: LOG_TARGET,
				"#{position} {} ({}) weight={weight:.4} total={:.2} -> {seats:?}",
				poll.poll.agency,
				poll.poll.published,
				estimate.total()
			);

			rows.push(ProjectionRow { position, poll, estimate: estimate.values().clone(), seats });
		}

		Ok(rows)
	}
}
