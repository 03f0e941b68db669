//! The `states` command: leading party of every state.

use std::path::Path;

use crate::{
	commands::types::StatesConfig,
	error::Error,
	ingest,
	prelude::*,
	prometheus,
	states,
	types::StateLeadResult,
	utils::{format_score, write_csv_file},
};

/// Write one row per state: its name, the score of every party column and the leader.
pub fn write_state_leads(
	path: &Path,
	parties: &[String],
	results: &[StateLeadResult],
) -> Result<(), Error> {
	let headers: Vec<&str> = std::iter::once(COL_STATES)
		.chain(parties.iter().map(String::as_str))
		.chain(std::iter::once(COL_LEADING_PARTY))
		.collect();

	let rows = results.iter().map(|result| {
		std::iter::once(result.state.clone())
			.chain(result.scores.iter().map(|(_, score)| format_score(*score)))
			.chain(std::iter::once(result.leading_party.clone()))
			.collect::<Vec<_>>()
	});

	write_csv_file(path, &headers, rows)
}

pub fn states_cmd(config: StatesConfig) -> Result<(), Error> {
	log::info!(target: LOG_TARGET, "Computing the leading party by state...");

	let batch = ingest::load_state_polls(&config.state_polls)?;
	let results = states::aggregate(&batch);
	prometheus::on_states_processed(results.len());

	write_state_leads(&config.output, &batch.parties, &results)
}
