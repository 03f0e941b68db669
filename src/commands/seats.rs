//! The `seats` command: one row per seat of the final projection, for the arc chart.

use std::path::Path;

use crate::{
	commands::types::SeatsConfig,
	error::Error,
	ingest,
	prelude::*,
	prometheus,
	seats::expand_seats,
	utils::write_csv_file,
};

/// Expand `projection` and write it as a `Seat #, Party` table.
pub fn write_seats(path: &Path, projection: &PartySeats) -> Result<(), Error> {
	let rows = expand_seats(projection);
	prometheus::on_seats_emitted(rows.len());

	write_csv_file(
		path,
		&[COL_SEAT_NUMBER, COL_PARTY],
		rows.into_iter().map(|row| vec![row.seat.to_string(), row.party.to_string()]),
	)
}

pub fn seats_cmd(config: SeatsConfig) -> Result<(), Error> {
	log::info!(target: LOG_TARGET, "Converting the final projection into seats...");

	let projection = ingest::load_final_projection(&config.projection)?;
	write_seats(&config.output, &projection)
}
