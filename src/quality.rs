//! Poll quality scoring.
//!
//! Three of the four sub-scores are relative to the batch a poll arrives in, so scoring is done
//! in two passes: [`BatchStats`] is computed over the whole batch first, and each poll is then
//! mapped through it. The same batch always yields the same scores.

use chrono::NaiveDate;
use std::collections::HashMap;

use crate::{
	opt::QualityWeights,
	prelude::{DEFAULT_AGENCY_RANKING, LOG_TARGET},
	types::{Poll, QualityScores, ScoredPoll},
};

/// Score given to every poll of a batch when a statistic has no spread to discriminate on.
pub const DEGENERATE_SCORE: f64 = 1.0;

/// Credibility rankings of polling agencies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgencyRankings(HashMap<String, f64>);

impl AgencyRankings {
	/// Returns `false` and keeps the existing ranking if `agency` is already ranked.
	pub fn insert(&mut self, agency: &str, ranking: f64) -> bool {
		let agency = agency.trim();
		if self.0.contains_key(agency) {
			return false;
		}
		self.0.insert(agency.to_string(), ranking);
		true
	}

	/// The ranking of `agency`, or [`DEFAULT_AGENCY_RANKING`] for an unranked agency.
	pub fn ranking(&self, agency: &str) -> f64 {
		self.0.get(agency.trim()).copied().unwrap_or(DEFAULT_AGENCY_RANKING)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Mean ranking of the agencies behind a (possibly pooled) release.
	pub fn agency_score(&self, agencies: &[String]) -> f64 {
		if agencies.is_empty() {
			return DEFAULT_AGENCY_RANKING;
		}
		agencies.iter().map(|a| self.ranking(a)).sum::<f64>() / agencies.len() as f64
	}
}

impl<S: AsRef<str>> FromIterator<(S, f64)> for AgencyRankings {
	fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
		let mut rankings = Self::default();
		for (agency, ranking) in iter {
			rankings.insert(agency.as_ref(), ranking);
		}
		rankings
	}
}

/// Batch-wide statistics the relative sub-scores are computed against.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BatchStats {
	pub min_sample_size: u64,
	pub max_sample_size: u64,
	pub median_margin_of_error: f64,
	pub max_days_to_election: i64,
}

impl BatchStats {
	/// `None` for an empty batch.
	pub fn from_polls(polls: &[Poll], election_date: NaiveDate) -> Option<Self> {
		let min_sample_size = polls.iter().map(|p| p.sample_size).min()?;
		let max_sample_size = polls.iter().map(|p| p.sample_size).max()?;
		let max_days_to_election = polls.iter().map(|p| p.days_to_election(election_date)).max()?;
		let median_margin_of_error = median(polls.iter().map(|p| p.margin_of_error).collect())?;

		Some(Self { min_sample_size, max_sample_size, median_margin_of_error, max_days_to_election })
	}

	/// Linear map of the batch's sample size range onto `[0.5, 1.5]`.
	pub fn sample_size_score(&self, sample_size: u64) -> f64 {
		if self.max_sample_size == self.min_sample_size {
			return DEGENERATE_SCORE;
		}
		let range = (self.max_sample_size - self.min_sample_size) as f64;
		0.5 + (sample_size as f64 - self.min_sample_size as f64) / range
	}

	/// `0.5` at the median, higher for a tighter margin.
	pub fn margin_of_error_score(&self, margin_of_error: f64) -> f64 {
		let median = self.median_margin_of_error;
		if median == 0.0 {
			return DEGENERATE_SCORE;
		}
		0.5 + (median - margin_of_error) / median
	}

	/// `0.5` for the poll furthest from the election, growing as polls near it.
	pub fn recency_score(&self, days_to_election: i64) -> f64 {
		let max_days = self.max_days_to_election;
		if max_days == 0 {
			return DEGENERATE_SCORE;
		}
		0.5 + (max_days - days_to_election) as f64 / max_days as f64
	}
}

fn median(mut values: Vec<f64>) -> Option<f64> {
	if values.is_empty() {
		return None;
	}
	values.sort_by(f64::total_cmp);
	let mid = values.len() / 2;
	if values.len() % 2 == 0 {
		Some((values[mid - 1] + values[mid]) / 2.0)
	} else {
		Some(values[mid])
	}
}

/// Scores a whole poll batch.
#[derive(Debug, Clone)]
pub struct PollQualityScorer<'a> {
	rankings: &'a AgencyRankings,
	weights: QualityWeights,
	election_date: NaiveDate,
}

impl<'a> PollQualityScorer<'a> {
	pub fn new(rankings: &'a AgencyRankings, weights: QualityWeights, election_date: NaiveDate) -> Self {
		Self { rankings, weights, election_date }
	}

	pub fn blend(&self, agency: f64, sample_size: f64, margin_of_error: f64, recency: f64) -> f64 {
		let w = &self.weights;
		w.recency * recency +
			w.agency * agency +
			w.sample_size * sample_size +
			w.margin_of_error * margin_of_error
	}

	pub fn score(&self, polls: Vec<Poll>) -> Vec<ScoredPoll> {
		let Some(stats) = BatchStats::from_polls(&polls, self.election_date) else {
			return Vec::new();
		};
		log::debug!(target: LOG_TARGET, "Scoring {} polls against {stats:?}", polls.len());

		polls
			.into_iter()
			.map(|poll| {
				let days_to_election = poll.days_to_election(self.election_date);
				let agency = self.rankings.agency_score(&poll.agencies);
				let sample_size = stats.sample_size_score(poll.sample_size);
				let margin_of_error = stats.margin_of_error_score(poll.margin_of_error);
				let recency = stats.recency_score(days_to_election);
				let overall = self.blend(agency, sample_size, margin_of_error, recency);

				log::trace!(
					target: LOG_TARGET,
					"{} ({}): agency={agency:.4} sample={sample_size:.4} moe={margin_of_error:.4} recency={recency:.4} overall={overall:.4}",
					poll.agency,
					poll.published,
				);

				ScoredPoll {
					poll,
					days_to_election,
					scores: QualityScores { agency, sample_size, margin_of_error, recency, overall },
				}
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{opt::Party, prelude::PartyValues};

	fn election() -> NaiveDate {
		NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
	}

	fn poll(agency: &str, days_before: i64, sample_size: u64, margin_of_error: f64) -> Poll {
		Poll {
			agency: agency.into(),
			agencies: Poll::split_agencies(agency),
			published: election() - chrono::Duration::days(days_before),
			sample_size,
			margin_of_error,
			values: [(Party::Nda, 300.0), (Party::India, 200.0), (Party::Others, 43.0)]
				.into_iter()
				.collect::<PartyValues>(),
		}
	}

	#[test]
	fn pooled_release_averages_agency_rankings() {
		let rankings: AgencyRankings = [("CVoter", 0.80)].into_iter().collect();
		let agencies = Poll::split_agencies("CVoter-Unheard Of");
		assert_eq!(rankings.agency_score(&agencies), (0.80 + 0.95) / 2.0);
		assert_eq!(rankings.agency_score(&agencies), 0.875);
		assert_eq!(rankings.agency_score(&["Unheard Of".to_string()]), DEFAULT_AGENCY_RANKING);
	}

	#[test]
	fn sample_size_score_spans_half_to_one_and_a_half() {
		let polls = vec![poll("A", 10, 1_000, 3.0), poll("B", 5, 2_000, 3.0), poll("C", 1, 50_000, 3.0)];
		let stats = BatchStats::from_polls(&polls, election()).unwrap();

		assert_eq!(stats.sample_size_score(1_000), 0.5);
		assert_eq!(stats.sample_size_score(50_000), 1.5);
		assert_eq!(stats.sample_size_score(25_500), 1.0);
	}

	#[test]
	fn margin_of_error_score_is_half_at_the_median() {
		let polls = vec![poll("A", 10, 1_000, 2.0), poll("B", 5, 2_000, 3.0), poll("C", 1, 3_000, 5.0)];
		let stats = BatchStats::from_polls(&polls, election()).unwrap();

		assert_eq!(stats.median_margin_of_error, 3.0);
		assert_eq!(stats.margin_of_error_score(3.0), 0.5);
		assert_eq!(stats.margin_of_error_score(1.5), 1.0);
		assert_eq!(stats.margin_of_error_score(6.0), -0.5);
	}

	#[test]
	fn median_of_even_batch_is_the_middle_mean() {
		assert_eq!(median(vec![4.0, 1.0, 3.0, 2.0]), Some(2.5));
		assert_eq!(median(vec![]), None);
	}

	#[test]
	fn recency_score_is_half_for_the_oldest_poll() {
		let polls = vec![poll("A", 100, 1_000, 3.0), poll("B", 50, 2_000, 3.0), poll("C", 0, 3_000, 3.0)];
		let stats = BatchStats::from_polls(&polls, election()).unwrap();

		assert_eq!(stats.max_days_to_election, 100);
		assert_eq!(stats.recency_score(100), 0.5);
		assert_eq!(stats.recency_score(50), 1.0);
		assert_eq!(stats.recency_score(0), 1.5);
	}

	#[test]
	fn degenerate_statistics_score_one() {
		let polls = vec![poll("A", 0, 1_000, 0.0), poll("B", 0, 1_000, 0.0)];
		let stats = BatchStats::from_polls(&polls, election()).unwrap();

		assert_eq!(stats.sample_size_score(1_000), DEGENERATE_SCORE);
		assert_eq!(stats.margin_of_error_score(0.0), DEGENERATE_SCORE);
		assert_eq!(stats.recency_score(0), DEGENERATE_SCORE);

		let rankings = AgencyRankings::default();
		let scored = PollQualityScorer::new(&rankings, QualityWeights::default(), election()).score(polls);
		for s in scored {
			assert!(s.scores.overall.is_finite());
		}
	}

	#[test]
	fn overall_quality_blends_with_configured_weights() {
		let rankings: AgencyRankings = [("A", 0.8), ("B", 0.6)].into_iter().collect();
		let scorer = PollQualityScorer::new(&rankings, QualityWeights::default(), election());
		let scored = scorer.score(vec![poll("A", 100, 1_000, 2.0), poll("B", 0, 3_000, 4.0)]);

		// A: recency 0.5, agency 0.8, sample 0.5, moe 0.5 + (3 - 2) / 3.
		let a = &scored[0].scores;
		assert_eq!(scored[0].days_to_election, 100);
		assert_eq!(a.recency, 0.5);
		assert_eq!(a.agency, 0.8);
		assert_eq!(a.sample_size, 0.5);
		assert_eq!(a.margin_of_error, 0.5 + 1.0 / 3.0);
		assert_eq!(a.overall, 0.4 * 0.5 + 0.25 * 0.8 + 0.3 * 0.5 + 0.05 * (0.5 + 1.0 / 3.0));

		let b = &scored[1].scores;
		assert_eq!(b.recency, 1.5);
		assert_eq!(b.sample_size, 1.5);
		assert_eq!(b.overall, scorer.blend(0.6, 1.5, 0.5 - 1.0 / 3.0, 1.5));
	}

	#[test]
	fn scoring_is_a_pure_function_of_the_batch() {
		let rankings: AgencyRankings = [("CVoter", 0.8)].into_iter().collect();
		let scorer = PollQualityScorer::new(&rankings, QualityWeights::default(), election());
		let batch =
			vec![poll("CVoter", 120, 7_000, 3.0), poll("Axis-CVoter", 40, 1_200, 2.0), poll("Lokniti", 9, 35_000, 4.5)];

		let first = scorer.score(batch.clone());
		let second = scorer.score(batch);
		assert_eq!(first, second);
		for (a, b) in first.iter().zip(&second) {
			assert_eq!(a.scores.overall.to_bits(), b.scores.overall.to_bits());
		}
	}
}
