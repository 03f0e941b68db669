//! Turns the input tables into validated domain values.
//!
//! Each parser checks the table's schema and every required cell before it converts a single
//! row, so a batch is either accepted whole or rejected with the first offending location.

use std::{collections::btree_map::Entry, path::Path, str::FromStr};

use crate::{
	error::Error,
	normalize::{parse_date, parse_margin_of_error, parse_number, parse_party_value, parse_sample_size},
	opt::Party,
	prelude::*,
	quality::AgencyRankings,
	skew::SkewTable,
	types::{Poll, StateBatch, StatePoll},
	utils::Table,
};

const POLL_COLUMNS: [&str; 4] = [COL_AGENCY, COL_DATE, COL_SAMPLE_SIZE, COL_MARGIN_OF_ERROR];

fn party_columns() -> impl Iterator<Item = &'static str> {
	Party::ALL.into_iter().map(|party| party.column())
}

fn ensure_not_empty(table: &Table) -> Result<(), Error> {
	if table.is_empty() {
		return Err(Error::EmptyTable(table.name().to_string()));
	}
	Ok(())
}

/// Read and validate the national poll batch.
pub fn load_polls(path: &Path) -> Result<Vec<Poll>, Error> {
	parse_polls(&Table::from_path(path)?)
}

pub fn parse_polls(table: &Table) -> Result<Vec<Poll>, Error> {
	let required: Vec<&str> = POLL_COLUMNS.into_iter().chain(party_columns()).collect();
	table.require_columns(&required)?;
	table.require_values(&required)?;
	ensure_not_empty(table)?;

	let polls = table
		.rows()
		.map(|row| {
			let agency = row.required(COL_AGENCY)?.to_string();
			let agencies = Poll::split_agencies(&agency);
			if agencies.is_empty() {
				return Err(row.invalid(COL_AGENCY, &agency, "names no agency"));
			}

			let values = Party::ALL
				.iter()
				.map(|party| Ok((*party, row.parse_with(party.column(), parse_party_value)?)))
				.collect::<Result<PartyValues, Error>>()?;

			Ok(Poll {
				agency,
				agencies,
				published: row.parse_with(COL_DATE, parse_date)?,
				sample_size: row.parse_with(COL_SAMPLE_SIZE, parse_sample_size)?,
				margin_of_error: row.parse_with(COL_MARGIN_OF_ERROR, parse_margin_of_error)?,
				values,
			})
		})
		.collect::<Result<Vec<_>, Error>>()?;

	log::info!(target: LOG_TARGET, "Loaded {} polls from {}", polls.len(), table.name());
	Ok(polls)
}

/// Read the `Polling agency → Ranking` reference table.
pub fn load_agency_rankings(path: &Path) -> Result<AgencyRankings, Error> {
	parse_agency_rankings(&Table::from_path(path)?)
}

pub fn parse_agency_rankings(table: &Table) -> Result<AgencyRankings, Error> {
	let required = [COL_AGENCY, COL_RANKING];
	table.require_columns(&required)?;
	table.require_values(&required)?;

	let mut rankings = AgencyRankings::default();
	for row in table.rows() {
		let agency = row.required(COL_AGENCY)?;
		let ranking = row.parse_with(COL_RANKING, parse_number)?;
		if !rankings.insert(agency, ranking) {
			log::debug!(target: LOG_TARGET, "Duplicate ranking for {agency} at line {} ignored", row.line());
		}
	}

	log::debug!(target: LOG_TARGET, "Loaded {} agency rankings", rankings.len());
	Ok(rankings)
}

/// Read the `Party → Adjusted Seat Skew` table.
pub fn load_skew_table(path: &Path) -> Result<SkewTable, Error> {
	parse_skew_table(&Table::from_path(path)?)
}

pub fn parse_skew_table(table: &Table) -> Result<SkewTable, Error> {
	let required = [COL_PARTY, COL_SKEW];
	table.require_columns(&required)?;
	table.require_values(&required)?;

	let mut skew = SkewTable::default();
	for row in table.rows() {
		let name = row.required(COL_PARTY)?;
		let offset = row.parse_with(COL_SKEW, parse_number)?;
		match Party::from_str(name) {
			Ok(party) =>
				if !skew.insert(party, offset) {
					log::warn!(target: LOG_TARGET, "Duplicate skew for {party} at line {} ignored", row.line());
				},
			Err(_) => {
				log::debug!(target: LOG_TARGET, "Skew for untracked party {name} ignored");
			},
		}
	}

	Ok(skew)
}

/// Read the `Party → Seat Projection` baseline; every tracked party needs a row.
pub fn load_initial_estimate(path: &Path) -> Result<PartyValues, Error> {
	parse_initial_estimate(&Table::from_path(path)?)
}

pub fn parse_initial_estimate(table: &Table) -> Result<PartyValues, Error> {
	let required = [COL_PARTY, COL_SEAT_PROJECTION];
	table.require_columns(&required)?;
	table.require_values(&required)?;

	let mut initial = PartyValues::new();
	for row in table.rows() {
		let name = row.required(COL_PARTY)?;
		let seats = row.parse_with(COL_SEAT_PROJECTION, parse_number)?;
		match Party::from_str(name) {
			Ok(party) =>
				if let Entry::Vacant(entry) = initial.entry(party) {
					entry.insert(seats);
				},
			Err(_) => {
				log::warn!(target: LOG_TARGET, "Initial projection for untracked party {name} ignored");
			},
		}
	}

	match Party::ALL.iter().find(|p| !initial.contains_key(p)) {
		Some(party) => Err(Error::MissingInitialEstimate(*party)),
		None => Ok(initial),
	}
}

/// Read the state poll batch. Every column that is not poll metadata is a party column.
pub fn load_state_polls(path: &Path) -> Result<StateBatch, Error> {
	parse_state_polls(&Table::from_path(path)?)
}

pub fn parse_state_polls(table: &Table) -> Result<StateBatch, Error> {
	table.require_columns(&[COL_STATES, COL_DATE])?;

	let parties: Vec<String> = table
		.columns()
		.iter()
		.filter(|c| !c.is_empty() && !STATE_METADATA_COLUMNS.contains(&c.as_str()))
		.cloned()
		.collect();
	if parties.is_empty() {
		return Err(Error::Other(format!("{} has no party columns", table.name())));
	}

	let mut polls = Vec::with_capacity(table.len());
	let mut dropped = 0usize;
	for row in table.rows() {
		if parties.iter().all(|p| row.get(p).is_none()) {
			dropped += 1;
			continue;
		}

		let values = parties
			.iter()
			.map(|party| {
				row.get(party)
					.map(|cell| parse_party_value(cell).map_err(|reason| row.invalid(party, cell, reason)))
					.transpose()
			})
			.collect::<Result<Vec<_>, Error>>()?;

		polls.push(StatePoll {
			state: row.required(COL_STATES)?.to_string(),
			published: row.parse_with(COL_DATE, parse_date)?,
			values,
		});
	}

	if dropped > 0 {
		log::info!(target: LOG_TARGET, "Dropped {dropped} state polls without any party numbers");
	}
	log::info!(
		target: LOG_TARGET,
		"Loaded {} state polls over {} party columns from {}",
		polls.len(),
		parties.len(),
		table.name()
	);

	Ok(StateBatch { parties, polls })
}

/// Read the last row of a projection table written by the `project` command.
pub fn load_final_projection(path: &Path) -> Result<PartySeats, Error> {
	parse_final_projection(&Table::from_path(path)?)
}

pub fn parse_final_projection(table: &Table) -> Result<PartySeats, Error> {
	let required: Vec<&str> = Party::ALL.iter().map(Party::moving_average_column).collect();
	table.require_columns(&required)?;

	let last = table.rows().last().ok_or_else(|| Error::EmptyTable(table.name().to_string()))?;
	Party::ALL
		.iter()
		.map(|party| {
			let seats = last.parse_with(party.moving_average_column(), parse_number)?;
			Ok((*party, seats.round() as i64))
		})
		.collect()
}
