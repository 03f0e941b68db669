//! Expansion of a final seat projection into one row per seat.

use crate::{
	opt::Party,
	prelude::{LOG_TARGET, PartySeats},
	types::SeatRow,
};

/// Order in which parties' seats are numbered.
pub const SEAT_ORDER: [Party; 3] = [Party::Others, Party::India, Party::Nda];

/// One row per seat, numbered from 1, parties in [`SEAT_ORDER`]. A missing or negative count
/// yields no rows for that party.
pub fn expand_seats(projection: &PartySeats) -> Vec<SeatRow> {
	let mut rows = Vec::new();
	let mut seat = 0u32;

	for party in SEAT_ORDER {
		let count = projection.get(&party).copied().unwrap_or_default();
		if count < 0 {
			log::warn!(target: LOG_TARGET, "Negative seat count {count} for {party}, no seats emitted");
			continue;
		}
		for _ in 0..count {
			seat += 1;
			rows.push(SeatRow { seat, party });
		}
	}

	rows
}
