// Copyright 2021-2022 Parity Technologies (UK) Ltd.
// This file is part of Polkadot.

// Polkadot is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Polkadot is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Polkadot.  If not, see <http://www.gnu.org/licenses/>.

//! The `project` command: skew, score and average the national poll batch.

use std::path::Path;

use crate::{
	commands::types::{ProjectConfig, ProjectionParams},
	error::Error,
	ingest,
	opt::Party,
	prelude::*,
	prometheus,
	quality::{AgencyRankings, PollQualityScorer},
	skew::SkewTable,
	types::{Poll, ProjectionRow, ProjectionSummary},
	utils::{format_score, write_csv_file, write_data_to_json_file},
	wma::WmaAggregator,
};

/// The validated inputs of a projection.
#[derive(Debug, Clone)]
pub struct ProjectionInputs {
	pub polls: Vec<Poll>,
	pub rankings: AgencyRankings,
	pub skew: SkewTable,
	pub initial: PartyValues,
}

impl ProjectionInputs {
	/// Load and validate all four tables before anything is computed.
	pub fn load(polls: &Path, rankings: &Path, skew: &Path, initial: &Path) -> Result<Self, Error> {
		Ok(Self {
			polls: ingest::load_polls(polls)?,
			rankings: ingest::load_agency_rankings(rankings)?,
			skew: ingest::load_skew_table(skew)?,
			initial: ingest::load_initial_estimate(initial)?,
		})
	}
}

/// The emitted moving-average rows of one run.
#[derive(Debug, Clone)]
pub struct Projection {
	pub rows: Vec<ProjectionRow>,
	pub polls_scored: usize,
}

impl Projection {
	pub fn polls_skipped(&self) -> usize {
		self.polls_scored - self.rows.len()
	}

	/// Seats of the last emitted row.
	pub fn final_seats(&self) -> Option<&PartySeats> {
		self.rows.last().map(|row| &row.seats)
	}

	pub fn summary(&self, params: &ProjectionParams) -> ProjectionSummary {
		ProjectionSummary {
			generated_at: chrono::Utc::now().to_rfc3339(),
			election_date: params.election_date,
			total_seats: params.total_seats,
			rounding: params.rounding,
			quality_weights: params.quality_weights,
			polls_scored: self.polls_scored,
			polls_skipped: self.polls_skipped(),
			latest_poll: self.rows.iter().map(|r| r.poll.poll.published).max(),
			projection: self.final_seats().cloned().unwrap_or_default(),
		}
	}
}

/// Run the skew, scoring and moving-average stages over validated inputs.
pub fn project(inputs: ProjectionInputs, params: &ProjectionParams) -> Result<Projection, Error> {
	params.quality_weights.validate()?;

	let ProjectionInputs { mut polls, rankings, skew, initial } = inputs;
	if polls.is_empty() {
		return Err(Error::EmptyTable("poll batch".into()));
	}
	prometheus::on_polls_loaded(polls.len());

	skew.apply(&mut polls);

	let scored = PollQualityScorer::new(&rankings, params.quality_weights, params.election_date)
		.score(polls);
	let polls_scored = scored.len();

	let rows = WmaAggregator::new(params.total_seats, params.rounding).aggregate(&initial, scored)?;
	let projection = Projection { rows, polls_scored };

	prometheus::on_polls_skipped(projection.polls_skipped());
	prometheus::on_projection_rows(projection.rows.len());
	if let Some(seats) = projection.final_seats() {
		prometheus::set_final_seats(seats);
		log::info!(target: LOG_TARGET, "Final projection: {}", display_seats(seats));
	}
	if projection.polls_skipped() > 0 {
		log::warn!(
			target: LOG_TARGET,
			"{} of {} polls skipped for an undefined weight or update",
			projection.polls_skipped(),
			polls_scored
		);
	}

	Ok(projection)
}

fn display_seats(seats: &PartySeats) -> String {
	seats.iter().map(|(party, n)| format!("{party}={n}")).collect::<Vec<_>>().join(", ")
}

/// Columns of the projection table.
pub fn projection_headers() -> Vec<&'static str> {
	let mut headers = vec![COL_AGENCY, COL_DATE, COL_SAMPLE_SIZE, COL_MARGIN_OF_ERROR];
	headers.extend(Party::ALL.iter().map(Party::column));
	headers.extend([
		COL_DAYS_TO_ELECTION,
		COL_AGENCY_SCORE,
		COL_SAMPLE_SIZE_SCORE,
		COL_MARGIN_OF_ERROR_SCORE,
		COL_RECENCY_SCORE,
		COL_OVERALL_QUALITY,
	]);
	headers.extend(Party::ALL.iter().map(Party::moving_average_column));
	headers
}

fn projection_record(row: &ProjectionRow) -> Vec<String> {
	let scored = &row.poll;
	let poll = &scored.poll;
	let scores = &scored.scores;

	let mut record = vec![
		poll.agency.clone(),
		poll.published.to_string(),
		poll.sample_size.to_string(),
		poll.margin_of_error.to_string(),
	];
	record.extend(
		Party::ALL.iter().map(|p| poll.values.get(p).map(|v| v.to_string()).unwrap_or_default()),
	);
	record.push(scored.days_to_election.to_string());
	record.extend(
		[scores.agency, scores.sample_size, scores.margin_of_error, scores.recency, scores.overall]
			.into_iter()
			.map(format_score),
	);
	record.extend(
		Party::ALL.iter().map(|p| row.seats.get(p).copied().unwrap_or_default().to_string()),
	);
	record
}

/// Write the projection table, one row per emitted step in chronological order.
pub fn write_projection(path: &Path, projection: &Projection) -> Result<(), Error> {
	write_csv_file(path, &projection_headers(), projection.rows.iter().map(projection_record))
}

pub fn project_cmd(config: ProjectConfig) -> Result<(), Error> {
	log::info!(target: LOG_TARGET, "Generating projections...");

	let inputs =
		ProjectionInputs::load(&config.polls, &config.rankings, &config.skew, &config.initial)?;
	let projection = project(inputs, &config.params)?;

	write_projection(&config.output, &projection)?;
	if let Some(path) = &config.summary {
		write_data_to_json_file(&projection.summary(&config.params), path)?;
	}

	Ok(())
}
