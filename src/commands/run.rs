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

//! The `run` command: every stage in one go, on the conventional file layout.

use crate::{
	commands::{
		project::{ProjectionInputs, project, write_projection},
		seats::write_seats,
		states::write_state_leads,
		types::RunConfig,
	},
	error::Error,
	ingest,
	prelude::*,
	prometheus,
	states,
	utils::write_data_to_json_file,
};

pub fn run_cmd(config: RunConfig) -> Result<(), Error> {
	let input = |file: &str| config.data_dir.join(file);
	let output = |file: &str| config.output_dir.join(file);

	log::info!(target: LOG_TARGET, "Reading inputs from {}", config.data_dir.display());
	let inputs = ProjectionInputs::load(
		&input(POLLS_FILE),
		&input(RANKINGS_FILE),
		&input(SKEW_FILE),
		&input(INITIAL_FILE),
	)?;
	// Validated up front so a bad state table fails the run before anything is written.
	let state_batch =
		if config.skip_states { None } else { Some(ingest::load_state_polls(&input(STATE_POLLS_FILE))?) };

	log::info!(target: LOG_TARGET, "Generating projections...");
	let projection = project(inputs, &config.params)?;
	write_projection(&output(PROJECTION_FILE), &projection)?;
	write_data_to_json_file(&projection.summary(&config.params), &output(SUMMARY_FILE))?;

	log::info!(target: LOG_TARGET, "Converting the final projection into seats...");
	let final_seats = projection
		.final_seats()
		.ok_or_else(|| Error::Other("every poll was skipped, there is no final projection".into()))?;
	write_seats(&output(SEATS_FILE), final_seats)?;

	if let Some(batch) = state_batch {
		log::info!(target: LOG_TARGET, "Computing the leading party by state...");
		let results = states::aggregate(&batch);
		prometheus::on_states_processed(results.len());
		write_state_leads(&output(STATES_FILE), &batch.parties, &results)?;
	}

	log::info!(target: LOG_TARGET, "Done, outputs written to {}", config.output_dir.display());
	Ok(())
}
