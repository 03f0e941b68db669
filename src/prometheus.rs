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

//! Run metrics. There is no scrape endpoint; the default registry is dumped in the text
//! exposition format once a command finishes.

use std::path::Path;

use prometheus::{Encoder, TextEncoder};

use crate::{error::Error, prelude::LOG_TARGET, utils::create_parent_dir};

pub use hidden::*;

/// Write every registered metric to `path`.
pub fn write_metrics(path: &Path) -> Result<(), Error> {
	let encoder = TextEncoder::new();
	let metric_families = prometheus::gather();
	let mut buffer = vec![];
	encoder.encode(&metric_families, &mut buffer)?;

	create_parent_dir(path)?;
	std::fs::write(path, buffer)?;

	log::info!(target: LOG_TARGET, "Wrote metrics to {}", path.display());
	Ok(())
}

mod hidden {
	use once_cell::sync::Lazy;
	use prometheus::{Counter, GaugeVec, opts, register_counter, register_gauge_vec};

	use crate::{opt::Party, prelude::PartySeats};

	static POLLS_LOADED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!("seat_projector_polls_loaded", "Number of national polls loaded"))
			.unwrap()
	});

	static POLLS_SKIPPED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"seat_projector_polls_skipped",
			"Number of polls skipped for an undefined weight or update",
		))
		.unwrap()
	});

	static PROJECTION_ROWS: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"seat_projector_projection_rows",
			"Number of moving-average rows emitted",
		))
		.unwrap()
	});

	static STATES_PROCESSED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!(
			"seat_projector_states_processed",
			"Number of states a leading party was computed for",
		))
		.unwrap()
	});

	static SEATS_EMITTED: Lazy<Counter> = Lazy::new(|| {
		register_counter!(opts!("seat_projector_seats_emitted", "Number of per-seat rows emitted"))
			.unwrap()
	});

	static FINAL_SEATS: Lazy<GaugeVec> = Lazy::new(|| {
		register_gauge_vec!(
			opts!("seat_projector_final_seats", "Seats of the final projection row"),
			&["party"]
		)
		.unwrap()
	});

	pub fn on_polls_loaded(count: usize) {
		POLLS_LOADED.inc_by(count as f64);
	}

	pub fn on_polls_skipped(count: usize) {
		POLLS_SKIPPED.inc_by(count as f64);
	}

	pub fn on_projection_rows(count: usize) {
		PROJECTION_ROWS.inc_by(count as f64);
	}

	pub fn on_states_processed(count: usize) {
		STATES_PROCESSED.inc_by(count as f64);
	}

	pub fn on_seats_emitted(count: usize) {
		SEATS_EMITTED.inc_by(count as f64);
	}

	pub fn set_final_seats(seats: &PartySeats) {
		for party in Party::ALL {
			let count = seats.get(&party).copied().unwrap_or_default();
			FINAL_SEATS.with_label_values(&[party.column()]).set(count as f64);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::opt::Party;

	#[test]
	fn metrics_file_contains_registered_metrics() {
		on_polls_loaded(3);
		set_final_seats(&[(Party::Nda, 290), (Party::India, 210), (Party::Others, 43)].into_iter().collect());

		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("out").join("metrics.prom");
		write_metrics(&path).unwrap();

		let text = std::fs::read_to_string(&path).unwrap();
		assert!(text.contains("seat_projector_polls_loaded"));
		assert!(text.contains("seat_projector_final_seats{party=\"I.N.D.I.A.\"} 210"));
	}
}
